//! Time-series projection records and the financial summary derived from
//! them.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::{Baseline, Confidence, InterventionSpec};

/// Categories that monetized benefits are reported under.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum BenefitCategory {
    /// Carbon sequestered or avoided, valued at the social cost of carbon.
    CarbonSequestration,
    /// Electricity generated or cooling demand avoided.
    EnergySavings,
    /// Stormwater interception and avoided flood damage.
    WaterManagement,
    /// Health benefit of cleaner air.
    AirQuality,
    /// Property value uplift.
    PropertyValue,
}

impl BenefitCategory {
    /// Human-readable name shown in summaries.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CarbonSequestration => "Carbon Sequestration",
            Self::EnergySavings => "Energy Savings",
            Self::WaterManagement => "Water Management",
            Self::AirQuality => "Air Quality",
            Self::PropertyValue => "Property Value",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::CarbonSequestration,
            Self::EnergySavings,
            Self::WaterManagement,
            Self::AirQuality,
            Self::PropertyValue,
        ]
    }
}

/// Annual monetized benefits (USD/yr) split by [`BenefitCategory`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BenefitBreakdown {
    /// Carbon value.
    pub carbon_sequestration: f64,
    /// Energy value.
    pub energy_savings: f64,
    /// Stormwater and flood value.
    pub water_management: f64,
    /// Air quality value.
    pub air_quality: f64,
    /// Property value uplift.
    pub property_value: f64,
}

impl BenefitBreakdown {
    /// Sum over all categories.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.carbon_sequestration
            + self.energy_savings
            + self.water_management
            + self.air_quality
            + self.property_value
    }

    /// Value for a single category.
    #[must_use]
    pub const fn get(&self, category: BenefitCategory) -> f64 {
        match category {
            BenefitCategory::CarbonSequestration => self.carbon_sequestration,
            BenefitCategory::EnergySavings => self.energy_savings,
            BenefitCategory::WaterManagement => self.water_management,
            BenefitCategory::AirQuality => self.air_quality,
            BenefitCategory::PropertyValue => self.property_value,
        }
    }

    /// Category-wise sum of two breakdowns.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        Self {
            carbon_sequestration: self.carbon_sequestration + other.carbon_sequestration,
            energy_savings: self.energy_savings + other.energy_savings,
            water_management: self.water_management + other.water_management,
            air_quality: self.air_quality + other.air_quality,
            property_value: self.property_value + other.property_value,
        }
    }

    /// Every category multiplied by `factor`.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            carbon_sequestration: self.carbon_sequestration * factor,
            energy_savings: self.energy_savings * factor,
            water_management: self.water_management * factor,
            air_quality: self.air_quality * factor,
            property_value: self.property_value * factor,
        }
    }
}

/// One row of the projected time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearProjection {
    /// Years elapsed since installation.
    pub year: u32,
    /// Projected land surface temperature (°C).
    #[serde(rename = "LST_mean")]
    pub lst_mean: f64,
    /// Projected NDVI.
    #[serde(rename = "NDVI_mean")]
    pub ndvi_mean: f64,
    /// Combined temperature change against the baseline (°C).
    #[serde(rename = "delta_LST")]
    pub delta_lst: f64,
    /// Combined NDVI change against the baseline.
    #[serde(rename = "delta_NDVI")]
    pub delta_ndvi: f64,
    /// Fraction of baseline runoff still leaving the polygon (0..1).
    pub runoff_index: f64,
    /// Annual CO2 sequestered or avoided (t/yr).
    #[serde(rename = "tCO2_sequestered")]
    pub tco2_sequestered: f64,
    /// Capital spent in this year (USD).
    pub capital_cost_total: f64,
    /// Annual monetized benefits (USD/yr).
    pub annual_benefits_usd: f64,
    /// Per-category split of `annual_benefits_usd`.
    pub benefits: BenefitBreakdown,
    /// Annual operation and maintenance costs (USD/yr).
    pub annual_costs_usd: f64,
    /// `annual_benefits_usd - annual_costs_usd - capital_cost_total`.
    pub cashflow_usd: f64,
    /// Discounted cash flow accumulated up to and including this year.
    #[serde(rename = "NPV_usd_cumulative")]
    pub npv_usd_cumulative: f64,
    /// Weakest confidence among the contributing interventions.
    pub confidence: Confidence,
    /// Soft-constraint notes attached to the run.
    pub warnings: Vec<String>,
}

/// Coarse risk grade derived from NPV and payback.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum RiskLevel {
    /// Positive NPV, payback within 5 years.
    Low,
    /// Positive NPV, payback within 10 years.
    Medium,
    /// Positive NPV but slow or no payback.
    High,
    /// Non-positive NPV.
    VeryHigh,
}

/// Financial indicators computed over a cash-flow series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    /// Fractional year at which undiscounted cash flow turns non-negative.
    pub payback_year: Option<f64>,
    /// Sum of capital spent across the horizon (USD).
    pub total_capital_cost: f64,
    /// Cumulative NPV at the final horizon year (USD).
    pub final_npv: f64,
    /// ROI in percent, bounded to the configured sanity range.
    pub roi_percentage: f64,
    /// ROI in percent before bounding.
    pub roi_unclamped_percentage: f64,
    /// Mean of `benefits - costs` over operational (non-zero) years.
    pub average_annual_net_benefit: f64,
    /// Internal rate of return in percent, if Newton iteration converged.
    pub irr_percentage: Option<f64>,
    /// Σ benefits ÷ (capital + Σ O&M) over the horizon rows.
    pub benefit_cost_ratio: f64,
    /// Σ annual benefits over the horizon rows (USD).
    pub total_benefits: f64,
    /// Capital plus Σ annual costs over the horizon rows (USD).
    pub total_costs: f64,
    /// `total_benefits - total_costs`.
    pub net_benefit: f64,
    /// Positive NPV and payback inside the horizon.
    pub is_viable: bool,
    /// Risk grade.
    pub risk_level: RiskLevel,
}

/// Headline figures for one aggregator run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    /// Last horizon year.
    pub horizon_years: u32,
    /// LST change at year 5 (0 if year 5 is not projected).
    #[serde(rename = "delta_LST_5yr")]
    pub delta_lst_5yr: f64,
    /// LST change at year 10.
    #[serde(rename = "delta_LST_10yr")]
    pub delta_lst_10yr: f64,
    /// NDVI change at year 10.
    #[serde(rename = "delta_NDVI_10yr")]
    pub delta_ndvi_10yr: f64,
    /// Payback year, if reached.
    pub payback_year: Option<f64>,
    /// Total capital cost (USD).
    pub total_capital_cost_usd: f64,
    /// Caveats that must travel with the numbers.
    pub notes: Vec<String>,
}

/// Complete output of one aggregator run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRun {
    /// Baseline the run was computed against.
    pub baseline: Baseline,
    /// Interventions after spatial clipping.
    pub interventions: Vec<InterventionSpec>,
    /// One row per horizon year, in increasing year order.
    pub projections: Vec<YearProjection>,
    /// Financial indicators over `projections`.
    pub financial: FinancialSummary,
    /// Headline figures.
    pub summary: ProjectionSummary,
    /// Soft-constraint warnings raised while validating the inputs.
    pub warnings: Vec<String>,
}

impl ProjectionRun {
    /// Row for `year`, if that year is part of the horizon.
    #[must_use]
    pub fn projection(&self, year: u32) -> Option<&YearProjection> {
        self.projections.iter().find(|p| p.year == year)
    }
}
