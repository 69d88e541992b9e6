//! Per-intervention effect models.
//!
//! Each model maps `(baseline, parameters, elapsed years)` to environmental
//! deltas plus cost and benefit figures for that single intervention. Models
//! are pure: the same inputs always give the same outcome, and no model
//! depends on another year's result.

pub mod forestry;
pub mod green_roof;
pub mod solar;
pub mod wetland;

use urbanome_intervention_models::{Baseline, BenefitBreakdown, Confidence, InterventionSpec};

use crate::config::EngineConfig;

/// Contribution of one intervention at one horizon year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectOutcome {
    /// NDVI change.
    pub delta_ndvi: f64,
    /// LST change (°C, negative is cooler).
    pub delta_lst: f64,
    /// Fraction of baseline runoff removed.
    pub runoff_reduction_frac: f64,
    /// CO2 sequestered or avoided this year (t/yr).
    pub tco2_year: f64,
    /// Capital spent this year (USD). Non-zero only at year 0.
    pub capital_cost: f64,
    /// Monetized benefits by category (USD/yr).
    pub benefits: BenefitBreakdown,
    /// Operation and maintenance (USD/yr).
    pub annual_costs: f64,
    /// Trust in the figures.
    pub confidence: Confidence,
}

impl EffectOutcome {
    /// Total monetized benefits (USD/yr).
    #[must_use]
    pub fn annual_benefits(&self) -> f64 {
        self.benefits.total()
    }
}

/// An intervention whose effect on a baseline can be projected.
pub trait EffectModel {
    /// Evaluates the intervention `year` years after installation.
    fn evaluate(&self, baseline: &Baseline, year: u32, config: &EngineConfig) -> EffectOutcome;
}

/// Linear growth ramp from installation to maturity, capped at 1.
#[must_use]
pub fn maturity_factor(year: u32, maturation_years: f64) -> f64 {
    if maturation_years <= 0.0 {
        return 1.0;
    }
    (f64::from(year) / maturation_years).min(1.0)
}

/// Capital is charged once, at installation.
fn capital_at(year: u32, capital: f64) -> f64 {
    if year == 0 { capital } else { 0.0 }
}

/// Share of the polygon covered by `area_m2`.
fn polygon_fraction(area_m2: f64, baseline: &Baseline) -> f64 {
    area_m2 / baseline.polygon_area_m2
}

/// Dispatches to the model for the spec's variant.
#[must_use]
pub fn evaluate(
    spec: &InterventionSpec,
    baseline: &Baseline,
    year: u32,
    config: &EngineConfig,
) -> EffectOutcome {
    match spec {
        InterventionSpec::UrbanForestry(params) => params.evaluate(baseline, year, config),
        InterventionSpec::GreenRoof(params) => params.evaluate(baseline, year, config),
        InterventionSpec::UrbanWetland(params) => params.evaluate(baseline, year, config),
        InterventionSpec::RooftopSolar(params) => params.evaluate(baseline, year, config),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use urbanome_intervention_models::Baseline;

    /// One-hectare baseline used across the model tests.
    pub fn hectare_baseline() -> Baseline {
        Baseline {
            polygon_id: None,
            polygon_area_m2: 10_000.0,
            lst_mean: 32.5,
            ndvi_mean: 0.30,
            precip_mm_yr: 1200.0,
            elevation_mean: 8.0,
            impervious_fraction: 0.6,
            baseline_year: 2025,
        }
    }
}
