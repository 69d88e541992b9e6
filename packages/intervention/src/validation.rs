//! Input validation and spatial clipping.
//!
//! Hard violations (bad polygon, no trees, negative costs or sizes) fail the
//! run before any model executes. Spatial overruns are clipped to what fits
//! and reported as warnings.

use urbanome_intervention_models::{
    Baseline, ForestryParams, GreenRoofParams, InterventionKind, InterventionSpec, SolarParams,
    WetlandParams,
};

use crate::EngineError;

/// Interventions after clipping, with the warnings clipping produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedInputs {
    /// Interventions in request order, clipped to fit.
    pub interventions: Vec<InterventionSpec>,
    /// One entry per clipped parameter.
    pub warnings: Vec<String>,
}

/// Validates a baseline on its own.
///
/// # Errors
///
/// * If the polygon area is not a positive finite number
/// * If the baseline LST or NDVI is not finite
pub fn validate_baseline(baseline: &Baseline) -> Result<(), EngineError> {
    if !baseline.polygon_area_m2.is_finite() || baseline.polygon_area_m2 <= 0.0 {
        return Err(EngineError::InvalidBaseline {
            message: format!(
                "polygon area must be positive, got {}",
                baseline.polygon_area_m2
            ),
        });
    }
    if !baseline.lst_mean.is_finite() || !baseline.ndvi_mean.is_finite() {
        return Err(EngineError::InvalidBaseline {
            message: "LST and NDVI must be finite".to_string(),
        });
    }
    Ok(())
}

/// Validates the baseline and every intervention, clipping spatial overruns.
///
/// # Errors
///
/// * If the baseline is invalid
/// * If any intervention has a zero tree count, a negative or non-finite
///   size, or a negative cost
pub fn validate(
    baseline: &Baseline,
    specs: &[InterventionSpec],
) -> Result<ValidatedInputs, EngineError> {
    validate_baseline(baseline)?;

    for spec in specs {
        check_spec(spec)?;
        check_planting_capacity(spec, baseline.polygon_area_m2)?;
    }

    let mut warnings = Vec::new();
    let interventions = specs
        .iter()
        .map(|spec| clip_spec(spec, baseline.polygon_area_m2, &mut warnings))
        .collect();

    for warning in &warnings {
        log::warn!("{warning}");
    }

    Ok(ValidatedInputs {
        interventions,
        warnings,
    })
}

// ── Hard checks ──────────────────────────────────────────────────────────

fn check_spec(spec: &InterventionSpec) -> Result<(), EngineError> {
    let kind = spec.kind();
    match spec {
        InterventionSpec::UrbanForestry(p) => {
            if p.number_of_trees == 0 {
                return Err(EngineError::InvalidIntervention {
                    kind,
                    message: "number of trees must be positive".to_string(),
                });
            }
            check_cost(kind, "cost_per_tree_usd", p.cost_per_tree_usd)?;
            if !p.planting_density_m2_per_tree.is_finite() || p.planting_density_m2_per_tree <= 0.0
            {
                return Err(EngineError::InvalidIntervention {
                    kind,
                    message: "planting density must be positive".to_string(),
                });
            }
        }
        InterventionSpec::GreenRoof(p) => {
            check_size(kind, "coverage_area_m2", p.coverage_area_m2)?;
            check_size(kind, "roof_area_available_m2", p.roof_area_available_m2)?;
            check_cost(kind, "cost_per_m2_usd", p.cost_per_m2_usd)?;
        }
        InterventionSpec::UrbanWetland(p) => {
            check_size(kind, "wetland_area_m2", p.wetland_area_m2)?;
            check_size(kind, "average_water_depth_m", p.average_water_depth_m)?;
            check_cost(kind, "cost_per_m2_usd", p.cost_per_m2_usd)?;
        }
        InterventionSpec::RooftopSolar(p) => {
            check_size(kind, "solar_panel_area_m2", p.solar_panel_area_m2)?;
            check_size(kind, "panel_efficiency_pct", p.panel_efficiency_pct)?;
            check_size(kind, "reflective_coating_area_m2", p.reflective_coating_area_m2)?;
            check_cost(kind, "solar_cost_per_m2_usd", p.solar_cost_per_m2_usd)?;
            check_cost(kind, "reflective_cost_per_m2_usd", p.reflective_cost_per_m2_usd)?;
            if p.panel_efficiency_pct > 100.0 {
                return Err(EngineError::InvalidIntervention {
                    kind,
                    message: format!(
                        "panel efficiency cannot exceed 100%, got {}",
                        p.panel_efficiency_pct
                    ),
                });
            }
        }
    }
    Ok(())
}

fn check_cost(kind: InterventionKind, field: &'static str, value: f64) -> Result<(), EngineError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(EngineError::NegativeCost { kind, field, value })
    }
}

fn check_size(kind: InterventionKind, field: &'static str, value: f64) -> Result<(), EngineError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(EngineError::InvalidIntervention {
            kind,
            message: format!("{field} must be a non-negative number, got {value}"),
        })
    }
}

/// Clipping a planting to the polygon must leave at least one tree.
fn check_planting_capacity(spec: &InterventionSpec, polygon_m2: f64) -> Result<(), EngineError> {
    match spec {
        InterventionSpec::UrbanForestry(p) if polygon_m2 < p.planting_density_m2_per_tree => {
            Err(EngineError::InvalidIntervention {
                kind: InterventionKind::UrbanForestry,
                message: format!(
                    "polygon of {polygon_m2:.0} m² cannot hold one tree at {:.0} m² per tree",
                    p.planting_density_m2_per_tree
                ),
            })
        }
        _ => Ok(()),
    }
}

// ── Spatial clipping ─────────────────────────────────────────────────────

fn clip_spec(spec: &InterventionSpec, polygon_m2: f64, warnings: &mut Vec<String>) -> InterventionSpec {
    match spec {
        InterventionSpec::UrbanForestry(p) => {
            InterventionSpec::UrbanForestry(clip_forestry(p, polygon_m2, warnings))
        }
        InterventionSpec::GreenRoof(p) => {
            InterventionSpec::GreenRoof(clip_green_roof(p, polygon_m2, warnings))
        }
        InterventionSpec::UrbanWetland(p) => {
            InterventionSpec::UrbanWetland(clip_wetland(p, polygon_m2, warnings))
        }
        InterventionSpec::RooftopSolar(p) => {
            InterventionSpec::RooftopSolar(clip_solar(p, polygon_m2, warnings))
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clip_forestry(
    params: &ForestryParams,
    polygon_m2: f64,
    warnings: &mut Vec<String>,
) -> ForestryParams {
    let required = params.required_area_m2();
    if required <= polygon_m2 {
        return params.clone();
    }
    let capacity = (polygon_m2 / params.planting_density_m2_per_tree)
        .floor()
        .min(f64::from(u32::MAX)) as u32;
    warnings.push(format!(
        "Tree planting requires {required:.0} m² but polygon is only {polygon_m2:.0} m²; \
         tree count reduced from {} to {capacity}",
        params.number_of_trees
    ));
    ForestryParams {
        number_of_trees: capacity,
        ..params.clone()
    }
}

fn clip_green_roof(
    params: &GreenRoofParams,
    polygon_m2: f64,
    warnings: &mut Vec<String>,
) -> GreenRoofParams {
    let mut coverage = params.coverage_area_m2;
    if coverage > params.roof_area_available_m2 {
        warnings.push("Green roof coverage capped to available roof area".to_string());
        coverage = params.roof_area_available_m2;
    }
    if coverage > polygon_m2 {
        warnings.push("Green roof coverage capped to polygon area".to_string());
        coverage = polygon_m2;
    }
    GreenRoofParams {
        coverage_area_m2: coverage,
        ..params.clone()
    }
}

fn clip_wetland(
    params: &WetlandParams,
    polygon_m2: f64,
    warnings: &mut Vec<String>,
) -> WetlandParams {
    if params.wetland_area_m2 <= polygon_m2 {
        return params.clone();
    }
    warnings.push("Wetland area capped to polygon area".to_string());
    WetlandParams {
        wetland_area_m2: polygon_m2,
        ..params.clone()
    }
}

fn clip_solar(params: &SolarParams, polygon_m2: f64, warnings: &mut Vec<String>) -> SolarParams {
    let footprint = params.footprint_m2();
    if footprint <= polygon_m2 {
        return params.clone();
    }
    warnings.push("Solar + reflective coating area capped to polygon area".to_string());
    let scale = polygon_m2 / footprint;
    SolarParams {
        solar_panel_area_m2: params.solar_panel_area_m2 * scale,
        reflective_coating_area_m2: params.reflective_coating_area_m2 * scale,
        ..params.clone()
    }
}
