#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Green infrastructure intervention data model.
//!
//! Defines the canonical baseline record, the closed set of intervention
//! families and their parameters, and the projection/report types produced
//! by the impact engine. Everything here is plain serializable data; the
//! computation lives in `urbanome_intervention`.

pub mod projection;
pub mod report;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use projection::{
    BenefitBreakdown, BenefitCategory, FinancialSummary, ProjectionRun, ProjectionSummary,
    RiskLevel, YearProjection,
};

/// Square metres per hectare.
pub const M2_PER_HECTARE: f64 = 10_000.0;

/// Environmental state of the target area before any intervention.
///
/// Built once per analysis run (usually by the baseline adapter) and only
/// ever read afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    /// Identifier of the drawn polygon, when the caller has one.
    #[serde(default)]
    pub polygon_id: Option<String>,
    /// Polygon area in square metres. Must be positive.
    pub polygon_area_m2: f64,
    /// Mean land surface temperature in °C.
    #[serde(rename = "LST_mean")]
    pub lst_mean: f64,
    /// Mean NDVI (unitless, roughly -1..1).
    #[serde(rename = "NDVI_mean")]
    pub ndvi_mean: f64,
    /// Annual precipitation in millimetres.
    pub precip_mm_yr: f64,
    /// Mean elevation in metres.
    pub elevation_mean: f64,
    /// Impervious surface fraction (0..1).
    pub impervious_fraction: f64,
    /// Calendar year the baseline describes.
    pub baseline_year: i32,
}

impl Baseline {
    /// Polygon area in hectares.
    #[must_use]
    pub fn area_ha(&self) -> f64 {
        self.polygon_area_m2 / M2_PER_HECTARE
    }
}

/// Broad grouping used by the intervention catalog.
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
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum InterventionCategory {
    /// Planting-based interventions.
    Vegetation,
    /// Interventions that store or slow stormwater.
    WaterManagement,
    /// Generation and reflective-surface interventions.
    Energy,
}

/// The four intervention families the engine knows how to model.
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
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum InterventionKind {
    /// Street and park tree planting.
    UrbanForestry,
    /// Extensive vegetated roofs.
    GreenRoofs,
    /// Constructed wetlands and retention ponds.
    UrbanWetlands,
    /// Rooftop photovoltaics combined with reflective coatings.
    RooftopSolar,
}

impl InterventionKind {
    /// Human-readable name shown in reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::UrbanForestry => "Urban Forestry",
            Self::GreenRoofs => "Green Roofs",
            Self::UrbanWetlands => "Urban Wetlands",
            Self::RooftopSolar => "Rooftop Solar + Reflective Coating",
        }
    }

    /// One-sentence description of the intervention.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::UrbanForestry => {
                "Strategic tree planting to reduce urban heat and improve air quality"
            }
            Self::GreenRoofs => "Rooftop vegetation for temperature reduction and energy savings",
            Self::UrbanWetlands => "Water bodies for flood control and biodiversity enhancement",
            Self::RooftopSolar => "Solar energy generation with reflective surfaces for cooling",
        }
    }

    /// Catalog grouping for this family.
    #[must_use]
    pub const fn category(self) -> InterventionCategory {
        match self {
            Self::UrbanForestry | Self::GreenRoofs => InterventionCategory::Vegetation,
            Self::UrbanWetlands => InterventionCategory::WaterManagement,
            Self::RooftopSolar => InterventionCategory::Energy,
        }
    }

    /// Headline benefits advertised for this family.
    #[must_use]
    pub const fn headline_benefits(self) -> &'static [&'static str] {
        match self {
            Self::UrbanForestry => &[
                "Air quality improvement",
                "Carbon sequestration",
                "Temperature reduction",
            ],
            Self::GreenRoofs => &[
                "Temperature reduction",
                "Energy savings",
                "Stormwater management",
            ],
            Self::UrbanWetlands => &[
                "Flood prevention",
                "Water quality improvement",
                "Biodiversity",
            ],
            Self::RooftopSolar => &[
                "Clean energy generation",
                "Temperature reduction",
                "Energy savings",
            ],
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::UrbanForestry,
            Self::GreenRoofs,
            Self::UrbanWetlands,
            Self::RooftopSolar,
        ]
    }
}

/// Tree planting parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestryParams {
    /// Number of trees planted at year 0.
    pub number_of_trees: u32,
    /// Planting cost per tree (USD).
    pub cost_per_tree_usd: f64,
    /// Ground area reserved per tree (m²).
    pub planting_density_m2_per_tree: f64,
}

impl ForestryParams {
    /// Ground area the planting plan needs (m²).
    #[must_use]
    pub fn required_area_m2(&self) -> f64 {
        f64::from(self.number_of_trees) * self.planting_density_m2_per_tree
    }
}

/// Green roof parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GreenRoofParams {
    /// Requested vegetated roof area (m²).
    pub coverage_area_m2: f64,
    /// Installation cost (USD/m²).
    pub cost_per_m2_usd: f64,
    /// Roof area physically available for greening (m²).
    pub roof_area_available_m2: f64,
}

impl GreenRoofParams {
    /// Coverage actually installed: the request, capped to the available roof.
    #[must_use]
    pub fn actual_coverage_m2(&self) -> f64 {
        self.coverage_area_m2.min(self.roof_area_available_m2)
    }
}

/// Constructed wetland parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WetlandParams {
    /// Open water and marsh area (m²).
    pub wetland_area_m2: f64,
    /// Average water depth (m).
    pub average_water_depth_m: f64,
    /// Construction cost (USD/m²).
    pub cost_per_m2_usd: f64,
}

impl WetlandParams {
    /// Water volume available to hold stormwater (m³).
    #[must_use]
    pub fn storage_m3(&self, porosity: f64) -> f64 {
        self.wetland_area_m2 * self.average_water_depth_m * porosity
    }
}

/// Rooftop solar and reflective coating parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarParams {
    /// Photovoltaic panel area (m²).
    pub solar_panel_area_m2: f64,
    /// Panel conversion efficiency in percent (e.g. `20.0`).
    pub panel_efficiency_pct: f64,
    /// Area painted with a high-albedo coating (m²).
    pub reflective_coating_area_m2: f64,
    /// Panel installation cost (USD/m²).
    pub solar_cost_per_m2_usd: f64,
    /// Coating cost (USD/m²).
    pub reflective_cost_per_m2_usd: f64,
}

impl SolarParams {
    /// Combined panel and coating footprint (m²).
    #[must_use]
    pub fn footprint_m2(&self) -> f64 {
        self.solar_panel_area_m2 + self.reflective_coating_area_m2
    }

    /// Installation cost of panels and coating (USD).
    #[must_use]
    pub fn capital_cost(&self) -> f64 {
        self.solar_panel_area_m2 * self.solar_cost_per_m2_usd
            + self.reflective_coating_area_m2 * self.reflective_cost_per_m2_usd
    }
}

/// One configured intervention.
///
/// Tagged by `type` so scenario files and JSON requests read as
/// `{ "type": "urban_forestry", "number_of_trees": 100, ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InterventionSpec {
    /// Tree planting.
    UrbanForestry(ForestryParams),
    /// Green roofs.
    GreenRoof(GreenRoofParams),
    /// Constructed wetland.
    UrbanWetland(WetlandParams),
    /// Rooftop solar with reflective coating.
    RooftopSolar(SolarParams),
}

impl InterventionSpec {
    /// Catalog family of this intervention.
    #[must_use]
    pub const fn kind(&self) -> InterventionKind {
        match self {
            Self::UrbanForestry(_) => InterventionKind::UrbanForestry,
            Self::GreenRoof(_) => InterventionKind::GreenRoofs,
            Self::UrbanWetland(_) => InterventionKind::UrbanWetlands,
            Self::RooftopSolar(_) => InterventionKind::RooftopSolar,
        }
    }
}

/// How much trust to place in a projected figure.
///
/// Ordered from least to most confident so that the weakest contributor
/// can be selected with `min`.
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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Confidence {
    /// Simplified proxies.
    Low,
    /// Needs local calibration.
    Medium,
    /// Well-established relationships.
    High,
}

impl Confidence {
    /// Returns the less confident of the two levels.
    #[must_use]
    pub fn weakest(self, other: Self) -> Self {
        self.min(other)
    }
}
