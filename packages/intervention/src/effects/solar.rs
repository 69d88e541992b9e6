//! Rooftop solar with reflective coating.
//!
//! Panel output degrades geometrically each year. Cooling combines an albedo
//! term for the coated area and a shading term for the panel area, both
//! linear in their share of the polygon.

use urbanome_intervention_models::{Baseline, BenefitBreakdown, Confidence, SolarParams};

use super::{EffectModel, EffectOutcome, capital_at, polygon_fraction};
use crate::config::{EngineConfig, SolarConfig};

/// Kilograms per tonne.
const KG_PER_TONNE: f64 = 1000.0;

/// Electricity generated `year` years after installation (kWh/yr).
#[must_use]
pub fn annual_generation_kwh(params: &SolarParams, year: u32, solar: &SolarConfig) -> f64 {
    let initial = params.solar_panel_area_m2
        * solar.insolation_kwh_m2_year
        * (params.panel_efficiency_pct / 100.0)
        * solar.performance_ratio;
    initial * (1.0 - solar.degradation_per_year).powf(f64::from(year))
}

impl EffectModel for SolarParams {
    fn evaluate(&self, baseline: &Baseline, year: u32, config: &EngineConfig) -> EffectOutcome {
        let solar = &config.solar;
        let kwh = annual_generation_kwh(self, year, solar);

        let reflective_cooling = -solar.albedo_sensitivity_c
            * solar.coating_albedo_increase
            * polygon_fraction(self.reflective_coating_area_m2, baseline);
        let shading = solar.pv_shading_c * polygon_fraction(self.solar_panel_area_m2, baseline);

        let mean_unit_cost = (self.solar_cost_per_m2_usd + self.reflective_cost_per_m2_usd) / 2.0;

        EffectOutcome {
            delta_ndvi: 0.0,
            delta_lst: reflective_cooling + shading,
            runoff_reduction_frac: 0.0,
            tco2_year: kwh * solar.grid_emission_kg_per_kwh / KG_PER_TONNE,
            capital_cost: capital_at(year, self.capital_cost()),
            benefits: BenefitBreakdown {
                energy_savings: kwh * config.economics.grid_price_usd_per_kwh,
                ..BenefitBreakdown::default()
            },
            annual_costs: self.footprint_m2() * mean_unit_cost * solar.om_fraction_of_capex,
            confidence: Confidence::Medium,
        }
    }
}
