//! Default parameters for each intervention family, as offered by the
//! dashboard's configuration panel.
//!
//! Each preset is a scenario TOML file under `packages/intervention/presets/`
//! embedded at compile time via [`include_str!`].

use urbanome_intervention_models::{InterventionKind, InterventionSpec};

use crate::EngineError;
use crate::scenario::Scenario;

/// Preset scenario files embedded at compile time.
const PRESET_TOMLS: &[(InterventionKind, &str)] = &[
    (
        InterventionKind::UrbanForestry,
        include_str!("../presets/urban_forestry.toml"),
    ),
    (
        InterventionKind::GreenRoofs,
        include_str!("../presets/green_roofs.toml"),
    ),
    (
        InterventionKind::UrbanWetlands,
        include_str!("../presets/urban_wetlands.toml"),
    ),
    (
        InterventionKind::RooftopSolar,
        include_str!("../presets/rooftop_solar.toml"),
    ),
];

/// Raw preset scenario TOML for `kind`.
#[must_use]
pub fn preset_toml(kind: InterventionKind) -> Option<&'static str> {
    PRESET_TOMLS
        .iter()
        .find(|(preset_kind, _)| *preset_kind == kind)
        .map(|(_, toml)| *toml)
}

/// Parsed preset scenario for `kind`.
///
/// # Errors
///
/// * If the embedded TOML does not parse
/// * If no preset is registered for `kind`
pub fn preset_scenario(kind: InterventionKind) -> Result<Scenario, EngineError> {
    let toml = preset_toml(kind).ok_or_else(|| EngineError::InvalidIntervention {
        kind,
        message: "no preset registered".to_string(),
    })?;
    Scenario::from_toml_str(toml)
}

/// Default intervention for `kind`.
///
/// # Errors
///
/// * If the preset cannot be loaded or does not hold exactly one
///   intervention of `kind`
pub fn default_spec(kind: InterventionKind) -> Result<InterventionSpec, EngineError> {
    let scenario = preset_scenario(kind)?;
    match scenario.interventions.as_slice() {
        [spec] if spec.kind() == kind => Ok(spec.clone()),
        _ => Err(EngineError::InvalidIntervention {
            kind,
            message: "preset must hold exactly one intervention of its kind".to_string(),
        }),
    }
}
