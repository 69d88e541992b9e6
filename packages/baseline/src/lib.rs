#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Baseline adapter.
//!
//! Turns whatever the upstream satellite analysis returned into a fully
//! populated [`Baseline`]. Missing or unusable fields are replaced with
//! documented defaults and logged; an incomplete payload is never an error.

pub mod shape;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use urbanome_intervention_models::Baseline;

pub use shape::PayloadShape;

/// Offset between Kelvin and degrees Celsius.
pub const KELVIN_OFFSET: f64 = 273.15;

/// Square metres per square kilometre.
const M2_PER_KM2: f64 = 1_000_000.0;

/// Errors that can occur while reading a baseline payload.
#[derive(Debug, Error)]
pub enum BaselineError {
    /// The payload text is not JSON.
    #[error("JSON error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Fallback values used when the payload does not provide a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaselineDefaults {
    /// Land surface temperature. Default: 32.5 °C
    pub lst_celsius: f64,
    /// Mean NDVI. Default: 0.30
    pub ndvi: f64,
    /// Polygon area. Default: 10 000 m² (one hectare)
    pub polygon_area_m2: f64,
    /// Annual precipitation. Default: 1200 mm
    pub precip_mm_yr: f64,
    /// Mean elevation. Default: 10 m
    pub elevation_m: f64,
    /// Impervious surface fraction. Default: 0.6
    pub impervious_fraction: f64,
    /// Year the baseline describes. Default: 2025
    pub baseline_year: i32,
}

impl Default for BaselineDefaults {
    fn default() -> Self {
        Self {
            lst_celsius: 32.5,
            ndvi: 0.30,
            polygon_area_m2: 10_000.0,
            precip_mm_yr: 1200.0,
            elevation_m: 10.0,
            impervious_fraction: 0.6,
            baseline_year: 2025,
        }
    }
}

/// Caller-supplied overrides for a single adaptation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdapterOptions {
    /// Identifier of the drawn polygon.
    pub polygon_id: Option<String>,
    /// Area measured from the drawn polygon; wins over the payload.
    pub polygon_area_m2: Option<f64>,
    /// Year override.
    pub baseline_year: Option<i32>,
    /// Fallback values.
    pub defaults: BaselineDefaults,
}

/// Baseline fields that can be substituted with a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaselineField {
    /// `LST_mean`
    LstMean,
    /// `NDVI_mean`
    NdviMean,
    /// `polygon_area_m2`
    PolygonArea,
    /// `precip_mm_yr`
    Precipitation,
    /// `elevation_mean`
    Elevation,
    /// `impervious_fraction`
    ImperviousFraction,
}

/// Result of adapting a payload, with provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct AdaptedBaseline {
    /// The normalized baseline.
    pub baseline: Baseline,
    /// Layout the analysis object was found under, if any.
    pub shape: Option<PayloadShape>,
    /// Fields that fell back to defaults.
    pub defaulted: Vec<BaselineField>,
}

/// Adapts a parsed payload into a [`Baseline`].
#[must_use]
pub fn adapt(payload: &Value, options: &AdapterOptions) -> Baseline {
    adapt_detailed(payload, options).baseline
}

/// Parses payload text and adapts it.
///
/// # Errors
///
/// * If `json` is not valid JSON
pub fn from_json_str(json: &str, options: &AdapterOptions) -> Result<Baseline, BaselineError> {
    let payload: Value = serde_json::from_str(json)?;
    Ok(adapt(&payload, options))
}

/// Adapts a parsed payload and reports which fields were defaulted.
#[must_use]
pub fn adapt_detailed(payload: &Value, options: &AdapterOptions) -> AdaptedBaseline {
    let resolved = shape::resolve(payload);
    if resolved.is_none() {
        log::warn!("No analysis object found in baseline payload, using defaults");
    }
    let shape = resolved.map(|(shape, _)| shape);
    let analysis = resolved.map(|(_, analysis)| analysis);

    let defaults = &options.defaults;
    let mut defaulted = Vec::new();
    let mut pick = |value: Option<f64>, field: BaselineField, fallback: f64| {
        value.unwrap_or_else(|| {
            log::warn!("Baseline {field:?} missing from payload, defaulting to {fallback}");
            defaulted.push(field);
            fallback
        })
    };

    let area_override = options
        .polygon_area_m2
        .filter(|area| area.is_finite() && *area > 0.0);
    let polygon_area_m2 = pick(
        area_override.or_else(|| analysis.and_then(area_m2)),
        BaselineField::PolygonArea,
        defaults.polygon_area_m2,
    );
    let lst_mean = pick(
        analysis.and_then(lst_celsius),
        BaselineField::LstMean,
        defaults.lst_celsius,
    );
    let ndvi_mean = pick(
        analysis.and_then(ndvi),
        BaselineField::NdviMean,
        defaults.ndvi,
    );
    let precip_mm_yr = pick(
        analysis
            .and_then(|a| number_at(a, "/precipitation/annual_mm"))
            .filter(|mm| *mm > 0.0),
        BaselineField::Precipitation,
        defaults.precip_mm_yr,
    );
    let elevation_mean = pick(
        analysis.and_then(|a| number_at(a, "/elevation/mean")),
        BaselineField::Elevation,
        defaults.elevation_m,
    );
    let impervious_fraction = pick(
        analysis
            .and_then(|a| number_at(a, "/urban/impervious_fraction"))
            .filter(|f| (0.0..=1.0).contains(f)),
        BaselineField::ImperviousFraction,
        defaults.impervious_fraction,
    );

    let baseline = Baseline {
        polygon_id: options.polygon_id.clone(),
        polygon_area_m2,
        lst_mean,
        ndvi_mean,
        precip_mm_yr,
        elevation_mean,
        impervious_fraction,
        baseline_year: options.baseline_year.unwrap_or(defaults.baseline_year),
    };

    log::debug!(
        "Adapted baseline from {shape:?}: area={polygon_area_m2} m², LST={lst_mean:.2} °C, NDVI={ndvi_mean:.3}"
    );

    AdaptedBaseline {
        baseline,
        shape,
        defaulted,
    }
}

// ── Field extraction ─────────────────────────────────────────────────────

/// Reads a finite number at `pointer`, accepting numeric strings.
fn number_at(analysis: &Value, pointer: &str) -> Option<f64> {
    let value = analysis.pointer(pointer)?;
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
        .filter(|n: &f64| n.is_finite())
}

/// Mean temperature, reported in Kelvin upstream.
fn lst_celsius(analysis: &Value) -> Option<f64> {
    number_at(analysis, "/temperature/mean")
        .filter(|kelvin| *kelvin > 0.0)
        .map(|kelvin| kelvin - KELVIN_OFFSET)
}

/// NDVI from the vegetation section, the analysis root, or the green area
/// percentage, in that order.
fn ndvi(analysis: &Value) -> Option<f64> {
    number_at(analysis, "/vegetation/ndvi_mean")
        .or_else(|| number_at(analysis, "/ndvi_mean"))
        .or_else(|| number_at(analysis, "/vegetation/green_area_percent").map(|pct| pct / 100.0))
}

fn area_m2(analysis: &Value) -> Option<f64> {
    number_at(analysis, "/geometry_info/area_m2")
        .filter(|m2| *m2 > 0.0)
        .or_else(|| {
            number_at(analysis, "/geometry_info/area_km2")
                .filter(|km2| *km2 > 0.0)
                .map(|km2| km2 * M2_PER_KM2)
        })
}
