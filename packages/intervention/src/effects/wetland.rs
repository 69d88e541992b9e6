//! Constructed wetlands.
//!
//! Cooling follows a logarithmic law in wetland size, so each added hectare
//! cools less than the one before. Runoff and flood figures are rough
//! proxies, which is why this model reports low confidence.

use urbanome_intervention_models::{
    Baseline, BenefitBreakdown, Confidence, M2_PER_HECTARE, WetlandParams,
};

use super::{EffectModel, EffectOutcome, capital_at, polygon_fraction};
use crate::config::EngineConfig;

impl EffectModel for WetlandParams {
    fn evaluate(&self, baseline: &Baseline, year: u32, config: &EngineConfig) -> EffectOutcome {
        let wetland = &config.wetland;
        let share = polygon_fraction(self.wetland_area_m2, baseline);
        let area_ha = self.wetland_area_m2 / M2_PER_HECTARE;

        let runoff_reduction_frac = (share * wetland.runoff_factor).min(wetland.max_runoff_reduction);
        let storage_m3 = self.storage_m3(wetland.porosity);

        EffectOutcome {
            delta_ndvi: share * wetland.ndvi_factor,
            delta_lst: -wetland.cooling_scale_c * (1.0 + area_ha).log10(),
            runoff_reduction_frac,
            tco2_year: 0.0,
            capital_cost: capital_at(year, self.wetland_area_m2 * self.cost_per_m2_usd),
            benefits: BenefitBreakdown {
                water_management: storage_m3
                    * wetland.flood_damage_usd_per_m3
                    * runoff_reduction_frac,
                ..BenefitBreakdown::default()
            },
            annual_costs: self.wetland_area_m2 * self.cost_per_m2_usd * wetland.om_fraction_of_capex,
            confidence: Confidence::Low,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::test_support::hectare_baseline;

    fn wetland(area_m2: f64) -> WetlandParams {
        WetlandParams {
            wetland_area_m2: area_m2,
            average_water_depth_m: 1.5,
            cost_per_m2_usd: 200.0,
        }
    }

    #[test]
    fn one_hectare_cools_by_scale_times_log_two() {
        let outcome = wetland(10_000.0).evaluate(&hectare_baseline(), 5, &EngineConfig::default());
        assert!((outcome.delta_lst + 1.2 * 2.0_f64.log10()).abs() < 1e-12);
        assert!((outcome.runoff_reduction_frac - 0.5).abs() < 1e-12);
        assert_eq!(outcome.confidence, Confidence::Low);
    }

    #[test]
    fn cooling_is_strictly_concave_in_area() {
        let config = EngineConfig::default();
        let baseline = hectare_baseline();
        for area in [500.0, 2000.0, 5000.0, 20_000.0] {
            let single = wetland(area).evaluate(&baseline, 5, &config).delta_lst.abs();
            let double = wetland(area * 2.0).evaluate(&baseline, 5, &config).delta_lst.abs();
            assert!(double < 2.0 * single, "area {area}: {double} >= 2 × {single}");
            assert!(double > single);
        }
    }

    #[test]
    fn flood_benefit_uses_storage_and_runoff() {
        let outcome = wetland(2000.0).evaluate(&hectare_baseline(), 10, &EngineConfig::default());
        // storage 1500 m³, runoff reduction 0.1
        assert!((outcome.runoff_reduction_frac - 0.1).abs() < 1e-12);
        assert!((outcome.benefits.water_management - 375.0).abs() < 1e-9);
        assert!((outcome.delta_ndvi - 0.03).abs() < 1e-12);
        assert!((outcome.annual_costs - 4000.0).abs() < 1e-9);
    }

    #[test]
    fn runoff_reduction_is_capped() {
        let outcome = wetland(20_000.0).evaluate(&hectare_baseline(), 5, &EngineConfig::default());
        assert!((outcome.runoff_reduction_frac - 0.6).abs() < 1e-12);
    }
}
