//! Report structures consumed by the dashboard and PDF export.
//!
//! Per-year quantities are maps keyed by horizon year, which serialize to
//! JSON objects such as `{ "5": ..., "10": ..., "15": ... }`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::{
    Baseline, BenefitBreakdown, BenefitCategory, FinancialSummary, InterventionKind,
    InterventionSpec, YearProjection,
};

/// Values keyed by horizon year.
pub type YearMap<T> = BTreeMap<u32, T>;

/// Identifying information for a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    /// Display name of the intervention (or "Mixed Interventions").
    pub name: String,
    /// One-sentence description.
    pub description: String,
    /// Polygon area in square metres.
    #[serde(rename = "area")]
    pub area_m2: f64,
    /// Families that contributed to the report.
    pub interventions: Vec<InterventionKind>,
}

/// Temperature outcome for one horizon year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemperatureImpact {
    /// Cooling against the baseline (°C, positive means cooler).
    pub reduction: f64,
    /// Projected LST (°C).
    pub new_temperature: f64,
    /// `|reduction| / baseline LST × 100`.
    pub percent_improvement: f64,
}

/// Vegetation outcome for one horizon year, on the NDVI × 100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VegetationImpact {
    /// Change against the baseline.
    pub improvement: f64,
    /// Projected value.
    pub total: f64,
}

/// Carbon outcome for one horizon year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarbonImpact {
    /// Annual rate at this year (tCO2/yr).
    pub annual_sequestration: f64,
    /// Annual rate × elapsed years (tCO2).
    pub total_sequestration: f64,
    /// `total_sequestration` at the social cost of carbon (USD).
    pub monetary_value: f64,
}

/// Solar generation outcome for one horizon year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyImpact {
    /// Mean generation over the elapsed years (kWh/yr).
    pub annual_generation: f64,
    /// Generation summed over the elapsed years (kWh).
    pub total_generation: f64,
    /// `total_generation` at the grid price (USD).
    pub monetary_value: f64,
}

/// Stormwater outcome for one horizon year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterImpact {
    /// Runoff volume retained over the elapsed years (m³).
    pub total_stormwater_managed: f64,
    /// Cumulative water management benefit (USD).
    pub monetary_value: f64,
}

/// Environmental outcomes per horizon year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentalProjections {
    /// Temperature.
    pub temperature: YearMap<TemperatureImpact>,
    /// Vegetation.
    pub vegetation: YearMap<VegetationImpact>,
    /// Carbon.
    pub carbon_sequestration: YearMap<CarbonImpact>,
    /// Solar generation.
    pub energy_generation: YearMap<EnergyImpact>,
    /// Stormwater.
    pub water_management: YearMap<WaterImpact>,
}

/// Cost schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostSchedule {
    /// Up-front capital (USD).
    pub implementation: f64,
    /// Inflation-compounded cumulative maintenance up to each year (USD).
    pub maintenance: YearMap<f64>,
    /// `implementation + maintenance[year]`.
    pub total: YearMap<f64>,
}

/// Cumulative benefit schedule per category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenefitSchedule {
    /// Carbon value.
    pub carbon_sequestration: YearMap<f64>,
    /// Energy value.
    pub energy_savings: YearMap<f64>,
    /// Stormwater value.
    pub water_management: YearMap<f64>,
    /// Air quality value.
    pub air_quality: YearMap<f64>,
    /// Property value uplift.
    pub property_value: YearMap<f64>,
    /// Sum of the categories.
    pub total: YearMap<f64>,
}

impl BenefitSchedule {
    /// Schedule for a single category.
    #[must_use]
    pub const fn category(&self, category: BenefitCategory) -> &YearMap<f64> {
        match category {
            BenefitCategory::CarbonSequestration => &self.carbon_sequestration,
            BenefitCategory::EnergySavings => &self.energy_savings,
            BenefitCategory::WaterManagement => &self.water_management,
            BenefitCategory::AirQuality => &self.air_quality,
            BenefitCategory::PropertyValue => &self.property_value,
        }
    }

    /// Records the cumulative breakdown for `year`, keeping `total` in sync.
    pub fn insert(&mut self, year: u32, breakdown: &BenefitBreakdown) {
        self.carbon_sequestration
            .insert(year, breakdown.carbon_sequestration);
        self.energy_savings.insert(year, breakdown.energy_savings);
        self.water_management
            .insert(year, breakdown.water_management);
        self.air_quality.insert(year, breakdown.air_quality);
        self.property_value.insert(year, breakdown.property_value);
        self.total.insert(year, breakdown.total());
    }

    /// Breakdown stored for `year` (zero for missing categories).
    #[must_use]
    pub fn at(&self, year: u32) -> BenefitBreakdown {
        let value = |map: &YearMap<f64>| map.get(&year).copied().unwrap_or_default();
        BenefitBreakdown {
            carbon_sequestration: value(&self.carbon_sequestration),
            energy_savings: value(&self.energy_savings),
            water_management: value(&self.water_management),
            air_quality: value(&self.air_quality),
            property_value: value(&self.property_value),
        }
    }
}

/// Return indicators for the horizon prefix ending at one year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoiSnapshot {
    /// Bounded ROI (%).
    pub roi: f64,
    /// ROI before bounding (%).
    pub roi_unclamped: f64,
    /// Payback year, if reached by this year.
    pub payback_period: Option<f64>,
    /// Cumulative NPV at this year (USD).
    pub net_present_value: f64,
}

/// Go / no-go verdict.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Recommendation {
    /// Best ROI is positive.
    #[serde(rename = "Recommended")]
    #[strum(serialize = "Recommended")]
    Recommended,
    /// Best ROI is zero or negative.
    #[serde(rename = "Not Recommended")]
    #[strum(serialize = "Not Recommended")]
    NotRecommended,
}

/// A benefit category and its value at the best timeframe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyBenefit {
    /// Category.
    pub category: BenefitCategory,
    /// Display name of the category.
    pub name: String,
    /// Cumulative value at the best timeframe (USD).
    pub value: f64,
}

/// Financial figures at the best timeframe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialHighlights {
    /// `costs.total[best]`.
    pub total_cost: f64,
    /// `benefits.total[best]`.
    pub total_benefit: f64,
    /// `roi[best].roi`.
    pub roi: f64,
    /// `roi[best].paybackPeriod`.
    pub payback_period: Option<f64>,
}

/// Environmental figures at the best timeframe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentalHighlights {
    /// Cooling (°C).
    pub temperature_reduction: f64,
    /// NDVI × 100 change.
    pub vegetation_increase: f64,
    /// Cumulative tCO2.
    pub carbon_sequestered: f64,
}

/// Ranked takeaways for a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    /// Verdict.
    pub recommendation: Recommendation,
    /// Horizon year with the highest ROI.
    pub best_timeframe: Option<u32>,
    /// ROI at the best timeframe (%).
    pub best_roi: f64,
    /// Top benefit categories at the best timeframe, highest first.
    pub key_benefits: Vec<KeyBenefit>,
    /// Financial figures at the best timeframe.
    pub financial_highlights: Option<FinancialHighlights>,
    /// Environmental figures at the best timeframe.
    pub environmental_impact: Option<EnvironmentalHighlights>,
    /// Warnings plus heuristic risk flags.
    pub risk_factors: Vec<String>,
}

/// Full analysis of one intervention set against one baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactReport {
    /// Name, description and area.
    pub metadata: ReportMetadata,
    /// Baseline the report was computed against.
    pub baseline: Baseline,
    /// Interventions after spatial clipping.
    pub interventions: Vec<InterventionSpec>,
    /// Operational horizon years present in the per-year maps.
    pub years: Vec<u32>,
    /// Environmental outcomes.
    pub projections: EnvironmentalProjections,
    /// Cost schedule.
    pub costs: CostSchedule,
    /// Benefit schedule.
    pub benefits: BenefitSchedule,
    /// Return indicators per year.
    pub roi: YearMap<RoiSnapshot>,
    /// Underlying time series, including year 0.
    pub timeline: Vec<YearProjection>,
    /// Indicators over the whole horizon.
    pub financial: FinancialSummary,
    /// Ranked takeaways.
    pub summary: AnalysisSummary,
    /// De-duplicated soft-constraint warnings.
    pub warnings: Vec<String>,
}

/// Cumulative impact of several independently analyzed interventions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedReport {
    /// Number of reports merged.
    pub intervention_count: usize,
    /// Name, description and area.
    pub metadata: ReportMetadata,
    /// Union of the operational horizon years.
    pub years: Vec<u32>,
    /// Temperature/vegetation averaged, carbon/water summed.
    pub projections: EnvironmentalProjections,
    /// Summed costs.
    pub costs: CostSchedule,
    /// Summed benefits.
    pub benefits: BenefitSchedule,
    /// Indicators recomputed on the summed cash flows.
    pub roi: YearMap<RoiSnapshot>,
    /// Indicators over the summed horizon.
    pub financial: FinancialSummary,
    /// Ranked takeaways.
    pub summary: AnalysisSummary,
    /// Warnings from every merged report.
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_maps_serialize_with_string_keys() {
        let mut costs = CostSchedule {
            implementation: 1000.0,
            ..CostSchedule::default()
        };
        costs.maintenance.insert(5, 50.0);
        costs.total.insert(5, 1050.0);

        let json = serde_json::to_value(&costs).unwrap();
        assert_eq!(json["maintenance"]["5"], 50.0);
        assert_eq!(json["total"]["5"], 1050.0);
    }

    #[test]
    fn schedule_insert_keeps_total_in_sync() {
        let mut schedule = BenefitSchedule::default();
        let breakdown = BenefitBreakdown {
            energy_savings: 40.0,
            air_quality: 2.0,
            ..BenefitBreakdown::default()
        };
        schedule.insert(10, &breakdown);

        assert_eq!(schedule.total.get(&10), Some(&42.0));
        assert_eq!(schedule.at(10), breakdown);
        assert_eq!(schedule.at(15), BenefitBreakdown::default());
        assert_eq!(
            schedule.category(BenefitCategory::EnergySavings).get(&10),
            Some(&40.0)
        );
    }

    #[test]
    fn recommendation_uses_display_strings() {
        assert_eq!(Recommendation::Recommended.to_string(), "Recommended");
        assert_eq!(Recommendation::NotRecommended.to_string(), "Not Recommended");
        let json = serde_json::to_string(&Recommendation::NotRecommended).unwrap();
        assert_eq!(json, "\"Not Recommended\"");
    }
}
