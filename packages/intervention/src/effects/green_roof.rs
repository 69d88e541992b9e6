//! Green roofs.

use urbanome_intervention_models::{Baseline, BenefitBreakdown, Confidence, GreenRoofParams};

use super::{EffectModel, EffectOutcome, capital_at, polygon_fraction};
use crate::config::EngineConfig;

impl EffectModel for GreenRoofParams {
    fn evaluate(&self, baseline: &Baseline, year: u32, config: &EngineConfig) -> EffectOutcome {
        let roof = &config.green_roof;
        let coverage = self.actual_coverage_m2();
        let roof_fraction = if self.roof_area_available_m2 > 0.0 {
            coverage / self.roof_area_available_m2
        } else {
            0.0
        };
        let polygon_share = polygon_fraction(coverage, baseline);

        let energy_kwh = coverage * roof.energy_kwh_per_m2_per_year;

        EffectOutcome {
            delta_ndvi: polygon_share * roof.ndvi_factor,
            delta_lst: -roof.full_coverage_cooling_c * roof_fraction,
            runoff_reduction_frac: polygon_share * roof.runoff_factor,
            tco2_year: 0.0,
            capital_cost: capital_at(year, coverage * self.cost_per_m2_usd),
            benefits: BenefitBreakdown {
                energy_savings: energy_kwh * config.economics.grid_price_usd_per_kwh,
                ..BenefitBreakdown::default()
            },
            annual_costs: coverage * self.cost_per_m2_usd * roof.om_fraction_of_capex,
            confidence: Confidence::Medium,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::test_support::hectare_baseline;

    fn preset_roof() -> GreenRoofParams {
        GreenRoofParams {
            coverage_area_m2: 1000.0,
            cost_per_m2_usd: 120.0,
            roof_area_available_m2: 1200.0,
        }
    }

    #[test]
    fn partial_coverage_scales_cooling() {
        let outcome = preset_roof().evaluate(&hectare_baseline(), 5, &EngineConfig::default());
        assert!((outcome.delta_lst + 1000.0 / 1200.0).abs() < 1e-12);
        assert!((outcome.delta_ndvi - 0.002).abs() < 1e-12);
        assert!((outcome.runoff_reduction_frac - 0.01).abs() < 1e-12);
        assert!((outcome.benefits.energy_savings - 1200.0).abs() < 1e-9);
        assert!((outcome.annual_costs - 6000.0).abs() < 1e-9);
        assert!(outcome.capital_cost.abs() < f64::EPSILON);
    }

    #[test]
    fn oversized_request_is_capped_to_available_roof() {
        let params = GreenRoofParams {
            coverage_area_m2: 1800.0,
            ..preset_roof()
        };
        let outcome = params.evaluate(&hectare_baseline(), 0, &EngineConfig::default());
        assert!((params.actual_coverage_m2() - 1200.0).abs() < f64::EPSILON);
        assert!((outcome.delta_lst + 1.0).abs() < 1e-12);
        assert!((outcome.capital_cost - 144_000.0).abs() < 1e-9);
    }
}
