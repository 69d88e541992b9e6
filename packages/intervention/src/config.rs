//! Engine configuration.
//!
//! Every coefficient the effect models and the financial analyzer use lives
//! here. [`EngineConfig::default`] reproduces the prototype values; a TOML
//! file may override any subset of them.
//!
//! Most per-unit benefit and O&M coefficients are uncalibrated placeholders
//! carried over from the prototype dashboard. They need local calibration
//! before the outputs are used for anything beyond screening.

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Years (since installation) to project, strictly increasing.
    /// default: [0, 5, 10, 15]
    pub horizon_years: Vec<u32>,
    /// Discounting, prices and carbon value.
    pub economics: EconomicsConfig,
    /// Vegetation/temperature coupling and overlap penalty.
    pub climate: ClimateConfig,
    /// Urban forestry coefficients.
    pub forestry: ForestryConfig,
    /// Green roof coefficients.
    pub green_roof: GreenRoofConfig,
    /// Wetland coefficients.
    pub wetland: WetlandConfig,
    /// Solar and reflective coating coefficients.
    pub solar: SolarConfig,
    /// Financial analyzer settings.
    pub financial: FinancialConfig,
    /// Summary heuristics.
    pub summary: SummaryConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            horizon_years: vec![0, 5, 10, 15],
            economics: EconomicsConfig::default(),
            climate: ClimateConfig::default(),
            forestry: ForestryConfig::default(),
            green_roof: GreenRoofConfig::default(),
            wetland: WetlandConfig::default(),
            solar: SolarConfig::default(),
            financial: FinancialConfig::default(),
            summary: SummaryConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parses a TOML override file on top of the defaults and validates it.
    ///
    /// # Errors
    ///
    /// * If the TOML cannot be parsed
    /// * If the resulting configuration fails [`EngineConfig::validate`]
    pub fn from_toml_str(toml_str: &str) -> Result<Self, EngineError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks internal consistency.
    ///
    /// # Errors
    ///
    /// * If the horizon is empty or not strictly increasing
    /// * If a rate, period or bound is out of its usable range
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.horizon_years.is_empty() {
            return Err(invalid("horizon_years must not be empty"));
        }
        if self.horizon_years.windows(2).any(|w| w[0] >= w[1]) {
            return Err(invalid("horizon_years must be strictly increasing"));
        }
        if !self.economics.discount_rate.is_finite() || self.economics.discount_rate <= -1.0 {
            return Err(invalid("discount_rate must be finite and greater than -1"));
        }
        if !self.economics.inflation_rate.is_finite() || self.economics.inflation_rate <= -1.0 {
            return Err(invalid("inflation_rate must be finite and greater than -1"));
        }
        if !is_positive(self.forestry.maturation_years) {
            return Err(invalid("forestry.maturation_years must be positive"));
        }
        if !is_positive(self.climate.interaction_penalty) || self.climate.interaction_penalty > 1.0 {
            return Err(invalid("climate.interaction_penalty must be in (0, 1]"));
        }
        if self.financial.roi_min_pct.is_nan() || self.financial.roi_min_pct >= self.financial.roi_max_pct {
            return Err(invalid("financial.roi_min_pct must be below roi_max_pct"));
        }
        if self.financial.irr_max_iterations == 0 {
            return Err(invalid("financial.irr_max_iterations must be at least 1"));
        }
        if !is_positive(self.financial.irr_tolerance) {
            return Err(invalid("financial.irr_tolerance must be positive"));
        }
        Ok(())
    }

    /// Last horizon year.
    #[must_use]
    pub fn final_year(&self) -> u32 {
        self.horizon_years.last().copied().unwrap_or_default()
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn invalid(message: &str) -> EngineError {
    EngineError::InvalidConfig {
        message: message.to_string(),
    }
}

/// Prices, discounting and carbon valuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomicsConfig {
    /// Annual discount rate for NPV.
    /// default: 0.045
    pub discount_rate: f64,
    /// Annual inflation applied to cumulative maintenance in reports.
    /// default: 0.03
    pub inflation_rate: f64,
    /// Social cost of carbon.
    /// unit: USD/tCO2
    /// default: 75.0
    pub social_cost_of_carbon_usd_per_t: f64,
    /// Retail electricity price.
    /// unit: USD/kWh
    /// default: 0.08
    pub grid_price_usd_per_kwh: f64,
}

impl Default for EconomicsConfig {
    fn default() -> Self {
        Self {
            discount_rate: 0.045,
            inflation_rate: 0.03,
            social_cost_of_carbon_usd_per_t: 75.0,
            grid_price_usd_per_kwh: 0.08,
        }
    }
}

/// Cross-intervention climate coefficients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimateConfig {
    /// LST response to NDVI change (negative: greener is cooler).
    /// unit: °C per NDVI unit
    /// default: -3.5
    pub beta_ndvi_lst: f64,
    /// Multiplier on summed ΔLST and ΔNDVI when forestry and green roofs
    /// share a footprint.
    /// default: 0.9
    pub interaction_penalty: f64,
}

impl Default for ClimateConfig {
    fn default() -> Self {
        Self {
            beta_ndvi_lst: -3.5,
            interaction_penalty: 0.9,
        }
    }
}

/// Urban forestry coefficients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestryConfig {
    /// Canopy area of one mature tree.
    /// unit: m²
    /// default: 50.0
    pub canopy_area_per_tree_m2: f64,
    /// Years until a tree reaches full canopy.
    /// default: 10.0
    pub maturation_years: f64,
    /// Sequestration of one mature tree.
    /// unit: kgCO2/yr
    /// default: 21.0
    pub kg_co2_per_tree_per_year: f64,
    /// NDVI gain at full canopy cover.
    /// default: 0.6
    pub ndvi_gain_full_canopy: f64,
    /// Runoff reduction per unit canopy fraction.
    /// default: 0.1
    pub runoff_factor: f64,
    /// Annual O&M as a fraction of the per-tree cost.
    /// default: 0.02
    pub om_fraction_of_capex: f64,
    /// Cooling energy benefit.
    /// unit: USD/tree/yr
    /// default: 0.08
    pub energy_usd_per_tree: f64,
    /// Air quality benefit.
    /// unit: USD/tree/yr
    /// default: 0.04
    pub air_quality_usd_per_tree: f64,
    /// Stormwater benefit.
    /// unit: USD/tree/yr
    /// default: 0.17
    pub stormwater_usd_per_tree: f64,
    /// Property value benefit.
    /// unit: USD/tree/yr
    /// default: 0.12
    pub property_value_usd_per_tree: f64,
}

impl Default for ForestryConfig {
    fn default() -> Self {
        Self {
            canopy_area_per_tree_m2: 50.0,
            maturation_years: 10.0,
            kg_co2_per_tree_per_year: 21.0,
            ndvi_gain_full_canopy: 0.6,
            runoff_factor: 0.1,
            om_fraction_of_capex: 0.02,
            energy_usd_per_tree: 0.08,
            air_quality_usd_per_tree: 0.04,
            stormwater_usd_per_tree: 0.17,
            property_value_usd_per_tree: 0.12,
        }
    }
}

/// Green roof coefficients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GreenRoofConfig {
    /// Cooling when the whole available roof is greened.
    /// unit: °C
    /// default: 1.0
    pub full_coverage_cooling_c: f64,
    /// Building energy saved per greened square metre.
    /// unit: kWh/m²/yr
    /// default: 15.0
    pub energy_kwh_per_m2_per_year: f64,
    /// NDVI gain per unit polygon coverage fraction.
    /// default: 0.02
    pub ndvi_factor: f64,
    /// Runoff reduction per unit polygon coverage fraction.
    /// default: 0.1
    pub runoff_factor: f64,
    /// Annual O&M as a fraction of the per-m² cost.
    /// default: 0.05
    pub om_fraction_of_capex: f64,
}

impl Default for GreenRoofConfig {
    fn default() -> Self {
        Self {
            full_coverage_cooling_c: 1.0,
            energy_kwh_per_m2_per_year: 15.0,
            ndvi_factor: 0.02,
            runoff_factor: 0.1,
            om_fraction_of_capex: 0.05,
        }
    }
}

/// Wetland coefficients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WetlandConfig {
    /// Scale of the logarithmic cooling model.
    /// unit: °C per log10(1 + ha)
    /// default: 1.2
    pub cooling_scale_c: f64,
    /// Fraction of the water volume available for storage.
    /// default: 0.5
    pub porosity: f64,
    /// Avoided flood damage per stored cubic metre.
    /// unit: USD/m³
    /// default: 2.5
    pub flood_damage_usd_per_m3: f64,
    /// Upper bound on runoff reduction.
    /// default: 0.6
    pub max_runoff_reduction: f64,
    /// Runoff reduction per unit polygon coverage fraction.
    /// default: 0.5
    pub runoff_factor: f64,
    /// NDVI gain per unit polygon coverage fraction.
    /// default: 0.15
    pub ndvi_factor: f64,
    /// Annual O&M as a fraction of the per-m² cost.
    /// default: 0.01
    pub om_fraction_of_capex: f64,
}

impl Default for WetlandConfig {
    fn default() -> Self {
        Self {
            cooling_scale_c: 1.2,
            porosity: 0.5,
            flood_damage_usd_per_m3: 2.5,
            max_runoff_reduction: 0.6,
            runoff_factor: 0.5,
            ndvi_factor: 0.15,
            om_fraction_of_capex: 0.01,
        }
    }
}

/// Rooftop solar and reflective coating coefficients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolarConfig {
    /// Annual insolation.
    /// unit: kWh/m²/yr
    /// default: 1800.0
    pub insolation_kwh_m2_year: f64,
    /// System performance ratio.
    /// default: 0.78
    pub performance_ratio: f64,
    /// Fractional output loss per year.
    /// default: 0.006
    pub degradation_per_year: f64,
    /// Grid emission factor.
    /// unit: kgCO2/kWh
    /// default: 0.7
    pub grid_emission_kg_per_kwh: f64,
    /// LST response to albedo change.
    /// unit: °C per albedo unit
    /// default: 6.0
    pub albedo_sensitivity_c: f64,
    /// Albedo increase from the coating.
    /// default: 0.2
    pub coating_albedo_increase: f64,
    /// LST change from panel shading at full polygon coverage.
    /// unit: °C
    /// default: -1.0
    pub pv_shading_c: f64,
    /// Annual O&M as a fraction of the mean of the two unit costs.
    /// default: 0.01
    pub om_fraction_of_capex: f64,
}

impl Default for SolarConfig {
    fn default() -> Self {
        Self {
            insolation_kwh_m2_year: 1800.0,
            performance_ratio: 0.78,
            degradation_per_year: 0.006,
            grid_emission_kg_per_kwh: 0.7,
            albedo_sensitivity_c: 6.0,
            coating_albedo_increase: 0.2,
            pv_shading_c: -1.0,
            om_fraction_of_capex: 0.01,
        }
    }
}

/// Financial analyzer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialConfig {
    /// Lower ROI bound (%).
    /// default: -100.0
    pub roi_min_pct: f64,
    /// Upper ROI bound (%).
    /// default: 50.0
    pub roi_max_pct: f64,
    /// Newton-Raphson starting rate.
    /// default: 0.10
    pub irr_seed: f64,
    /// Newton-Raphson iteration cap.
    /// default: 100
    pub irr_max_iterations: u32,
    /// Convergence threshold on the rate step.
    /// default: 1e-4
    pub irr_tolerance: f64,
    /// Iterates at or below this rate are treated as divergent.
    /// default: -0.99
    pub irr_min_rate: f64,
    /// Iterates above this rate are treated as divergent.
    /// default: 5.0
    pub irr_max_rate: f64,
}

impl Default for FinancialConfig {
    fn default() -> Self {
        Self {
            roi_min_pct: -100.0,
            roi_max_pct: 50.0,
            irr_seed: 0.10,
            irr_max_iterations: 100,
            irr_tolerance: 1e-4,
            irr_min_rate: -0.99,
            irr_max_rate: 5.0,
        }
    }
}

/// Thresholds for the summary's heuristic risk flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Payback periods beyond this are flagged.
    /// unit: years
    /// default: 10.0
    pub long_payback_years: f64,
    /// Tree counts above this are flagged for maintenance burden.
    /// default: 1000
    pub large_tree_count: u32,
    /// Cumulative solar generation below this is flagged.
    /// unit: kWh
    /// default: 50000.0
    pub min_solar_generation_kwh: f64,
    /// Number of key benefits to list.
    /// default: 3
    pub key_benefit_count: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            long_payback_years: 10.0,
            large_tree_count: 1000,
            min_solar_generation_kwh: 50_000.0,
            key_benefit_count: 3,
        }
    }
}
