//! Urban forestry.
//!
//! Canopy grows linearly to maturity. Cooling is derived from the NDVI gain
//! through the NDVI/LST coupling coefficient, so it needs local calibration.

use urbanome_intervention_models::{Baseline, BenefitBreakdown, Confidence, ForestryParams};

use super::{EffectModel, EffectOutcome, capital_at, maturity_factor, polygon_fraction};
use crate::config::EngineConfig;

/// Kilograms per tonne.
const KG_PER_TONNE: f64 = 1000.0;

impl EffectModel for ForestryParams {
    fn evaluate(&self, baseline: &Baseline, year: u32, config: &EngineConfig) -> EffectOutcome {
        let forestry = &config.forestry;
        let trees = f64::from(self.number_of_trees);
        let maturity = maturity_factor(year, forestry.maturation_years);

        let canopy_m2 = trees * forestry.canopy_area_per_tree_m2 * maturity;
        let canopy_fraction = polygon_fraction(canopy_m2, baseline).min(1.0);

        let delta_ndvi = canopy_fraction * forestry.ndvi_gain_full_canopy;
        let delta_lst = config.climate.beta_ndvi_lst * delta_ndvi;
        let tco2_year = trees * forestry.kg_co2_per_tree_per_year * maturity / KG_PER_TONNE;

        let mature_trees = trees * maturity;
        let benefits = BenefitBreakdown {
            carbon_sequestration: tco2_year * config.economics.social_cost_of_carbon_usd_per_t,
            energy_savings: mature_trees * forestry.energy_usd_per_tree,
            water_management: mature_trees * forestry.stormwater_usd_per_tree,
            air_quality: mature_trees * forestry.air_quality_usd_per_tree,
            property_value: mature_trees * forestry.property_value_usd_per_tree,
        };

        EffectOutcome {
            delta_ndvi,
            delta_lst,
            runoff_reduction_frac: canopy_fraction * forestry.runoff_factor,
            tco2_year,
            capital_cost: capital_at(year, trees * self.cost_per_tree_usd),
            benefits,
            annual_costs: trees * self.cost_per_tree_usd * forestry.om_fraction_of_capex,
            confidence: Confidence::Medium,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::test_support::hectare_baseline;

    fn hundred_trees() -> ForestryParams {
        ForestryParams {
            number_of_trees: 100,
            cost_per_tree_usd: 150.0,
            planting_density_m2_per_tree: 100.0,
        }
    }

    #[test]
    fn installation_year_is_capital_only() {
        let outcome =
            hundred_trees().evaluate(&hectare_baseline(), 0, &EngineConfig::default());
        assert!((outcome.capital_cost - 15_000.0).abs() < 1e-9);
        assert!(outcome.delta_lst.abs() < f64::EPSILON);
        assert!(outcome.delta_ndvi.abs() < f64::EPSILON);
        assert!(outcome.annual_benefits().abs() < f64::EPSILON);
        assert!((outcome.annual_costs - 300.0).abs() < 1e-9);
    }

    #[test]
    fn mature_canopy_covers_half_the_hectare() {
        let outcome =
            hundred_trees().evaluate(&hectare_baseline(), 10, &EngineConfig::default());
        assert!(outcome.capital_cost.abs() < f64::EPSILON);
        assert!((outcome.delta_ndvi - 0.30).abs() < 1e-12);
        assert!((outcome.delta_lst + 1.05).abs() < 1e-12);
        assert!((outcome.runoff_reduction_frac - 0.05).abs() < 1e-12);
        assert!((outcome.tco2_year - 2.1).abs() < 1e-12);
    }

    #[test]
    fn mature_benefits_use_per_tree_rates() {
        let outcome =
            hundred_trees().evaluate(&hectare_baseline(), 15, &EngineConfig::default());
        let b = outcome.benefits;
        assert!((b.carbon_sequestration - 157.5).abs() < 1e-9);
        assert!((b.energy_savings - 8.0).abs() < 1e-9);
        assert!((b.air_quality - 4.0).abs() < 1e-9);
        assert!((b.water_management - 17.0).abs() < 1e-9);
        assert!((b.property_value - 12.0).abs() < 1e-9);
        assert!((outcome.annual_benefits() - 198.5).abs() < 1e-9);
    }

    #[test]
    fn canopy_fraction_saturates() {
        let params = ForestryParams {
            number_of_trees: 1000,
            ..hundred_trees()
        };
        let outcome = params.evaluate(&hectare_baseline(), 10, &EngineConfig::default());
        assert!((outcome.delta_ndvi - 0.6).abs() < 1e-12);
    }
}
