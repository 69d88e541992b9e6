//! Scenario files: a named list of interventions in TOML.
//!
//! ```toml
//! name = "Riverside retrofit"
//!
//! [[interventions]]
//! type = "urban_forestry"
//! number_of_trees = 100
//! cost_per_tree_usd = 150.0
//! planting_density_m2_per_tree = 100.0
//! ```

use serde::{Deserialize, Serialize};
use urbanome_intervention_models::InterventionSpec;

use crate::EngineError;

/// A set of interventions analyzed together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Optional display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Interventions in the order they were listed.
    #[serde(default)]
    pub interventions: Vec<InterventionSpec>,
}

impl Scenario {
    /// Parses a scenario file.
    ///
    /// # Errors
    ///
    /// * If the TOML is malformed or an intervention table is not one of
    ///   the known types
    pub fn from_toml_str(toml_str: &str) -> Result<Self, EngineError> {
        Ok(toml::from_str(toml_str)?)
    }
}

#[cfg(test)]
mod tests {
    use urbanome_intervention_models::InterventionKind;

    use super::*;

    #[test]
    fn parses_mixed_scenario() {
        let scenario = Scenario::from_toml_str(
            r#"
name = "Mixed"

[[interventions]]
type = "green_roof"
coverage_area_m2 = 800.0
cost_per_m2_usd = 110.0
roof_area_available_m2 = 900.0

[[interventions]]
type = "urban_wetland"
wetland_area_m2 = 1500.0
average_water_depth_m = 1.0
cost_per_m2_usd = 180.0
"#,
        )
        .unwrap();

        assert_eq!(scenario.name.as_deref(), Some("Mixed"));
        let kinds: Vec<InterventionKind> =
            scenario.interventions.iter().map(InterventionSpec::kind).collect();
        assert_eq!(
            kinds,
            vec![InterventionKind::GreenRoofs, InterventionKind::UrbanWetlands]
        );
    }

    #[test]
    fn empty_scenario_has_no_interventions() {
        assert_eq!(Scenario::from_toml_str("").unwrap(), Scenario::default());
    }

    #[test]
    fn unknown_type_is_rejected() {
        let err = Scenario::from_toml_str(
            r#"
[[interventions]]
type = "bike_lanes"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::ConfigParse(_)));
    }
}
