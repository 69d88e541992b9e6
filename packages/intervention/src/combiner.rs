//! Merges independently analyzed interventions into one cumulative report.
//!
//! Carbon, energy and water figures add up, as do costs and benefits. Temperature and vegetation
//! figures are averaged over the reports that cover a year. Return
//! indicators are recomputed on the summed cash flows.

use std::collections::{BTreeMap, BTreeSet};

use urbanome_intervention_models::report::{
    BenefitSchedule, CarbonImpact, CombinedReport, CostSchedule, EnergyImpact,
    EnvironmentalProjections, ImpactReport, TemperatureImpact, VegetationImpact, WaterImpact,
};
use urbanome_intervention_models::{BenefitBreakdown, InterventionSpec};

use crate::config::EngineConfig;
use crate::financial::{self, CashFlowRow};
use crate::report::{dedup_warnings, metadata, roi_by_year};
use crate::summary::{self, SummaryInput};
use crate::EngineError;

/// Combines at least two reports.
///
/// # Errors
///
/// * If fewer than two reports are supplied
pub fn combine(
    reports: &[ImpactReport],
    config: &EngineConfig,
) -> Result<CombinedReport, EngineError> {
    if reports.len() < 2 {
        return Err(EngineError::InsufficientInterventions {
            count: reports.len(),
        });
    }

    let years: Vec<u32> = reports
        .iter()
        .flat_map(|r| r.years.iter().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let projections = combine_projections(reports, &years);
    let costs = combine_costs(reports, &years);

    let mut benefits = BenefitSchedule::default();
    for &year in &years {
        let summed = reports
            .iter()
            .fold(BenefitBreakdown::default(), |acc, r| acc.add(&r.benefits.at(year)));
        benefits.insert(year, &summed);
    }

    let rows = combined_cash_flows(reports);
    let roi = roi_by_year(&rows, &years, config);
    let financial = financial::analyze(&rows, config);

    let interventions: Vec<InterventionSpec> = reports
        .iter()
        .flat_map(|r| r.interventions.iter().cloned())
        .collect();
    let warnings = dedup_warnings(reports.iter().flat_map(|r| r.warnings.iter()));

    let summary = summary::generate(
        &SummaryInput {
            years: &years,
            projections: &projections,
            costs: &costs,
            benefits: &benefits,
            roi: &roi,
            warnings: &warnings,
            interventions: &interventions,
        },
        config,
    );

    log::info!(
        "Combined {} reports: capital {:.0} USD, NPV {:.0} USD, {}",
        reports.len(),
        financial.total_capital_cost,
        financial.final_npv,
        summary.recommendation,
    );

    Ok(CombinedReport {
        intervention_count: reports.len(),
        metadata: metadata(&interventions, reports[0].metadata.area_m2),
        years,
        projections,
        costs,
        benefits,
        roi,
        financial,
        summary,
        warnings,
    })
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn combine_projections(reports: &[ImpactReport], years: &[u32]) -> EnvironmentalProjections {
    let mut combined = EnvironmentalProjections::default();

    for &year in years {
        let temperatures: Vec<&TemperatureImpact> = reports
            .iter()
            .filter_map(|r| r.projections.temperature.get(&year))
            .collect();
        if !temperatures.is_empty() {
            let field = |f: fn(&TemperatureImpact) -> f64| {
                mean(&temperatures.iter().map(|t| f(t)).collect::<Vec<_>>())
            };
            combined.temperature.insert(
                year,
                TemperatureImpact {
                    reduction: field(|t| t.reduction),
                    new_temperature: field(|t| t.new_temperature),
                    percent_improvement: field(|t| t.percent_improvement),
                },
            );
        }

        let vegetation: Vec<&VegetationImpact> = reports
            .iter()
            .filter_map(|r| r.projections.vegetation.get(&year))
            .collect();
        if !vegetation.is_empty() {
            combined.vegetation.insert(
                year,
                VegetationImpact {
                    improvement: mean(&vegetation.iter().map(|v| v.improvement).collect::<Vec<_>>()),
                    total: mean(&vegetation.iter().map(|v| v.total).collect::<Vec<_>>()),
                },
            );
        }

        let carbon = reports
            .iter()
            .filter_map(|r| r.projections.carbon_sequestration.get(&year))
            .fold(None, |acc: Option<CarbonImpact>, c| {
                Some(acc.map_or(*c, |a| CarbonImpact {
                    annual_sequestration: a.annual_sequestration + c.annual_sequestration,
                    total_sequestration: a.total_sequestration + c.total_sequestration,
                    monetary_value: a.monetary_value + c.monetary_value,
                }))
            });
        if let Some(carbon) = carbon {
            combined.carbon_sequestration.insert(year, carbon);
        }

        let energy = reports
            .iter()
            .filter_map(|r| r.projections.energy_generation.get(&year))
            .fold(None, |acc: Option<EnergyImpact>, e| {
                Some(acc.map_or(*e, |a| EnergyImpact {
                    annual_generation: a.annual_generation + e.annual_generation,
                    total_generation: a.total_generation + e.total_generation,
                    monetary_value: a.monetary_value + e.monetary_value,
                }))
            });
        if let Some(energy) = energy {
            combined.energy_generation.insert(year, energy);
        }

        let water = reports
            .iter()
            .filter_map(|r| r.projections.water_management.get(&year))
            .fold(None, |acc: Option<WaterImpact>, w| {
                Some(acc.map_or(*w, |a| WaterImpact {
                    total_stormwater_managed: a.total_stormwater_managed
                        + w.total_stormwater_managed,
                    monetary_value: a.monetary_value + w.monetary_value,
                }))
            });
        if let Some(water) = water {
            combined.water_management.insert(year, water);
        }
    }

    combined
}

fn combine_costs(reports: &[ImpactReport], years: &[u32]) -> CostSchedule {
    let implementation: f64 = reports.iter().map(|r| r.costs.implementation).sum();
    let mut costs = CostSchedule {
        implementation,
        ..CostSchedule::default()
    };
    for &year in years {
        let maintenance: f64 = reports
            .iter()
            .filter_map(|r| r.costs.maintenance.get(&year))
            .sum();
        costs.maintenance.insert(year, maintenance);
        costs.total.insert(year, implementation + maintenance);
    }
    costs
}

/// Per-year sum of every report's cash flows, in year order.
fn combined_cash_flows(reports: &[ImpactReport]) -> Vec<CashFlowRow> {
    let mut by_year: BTreeMap<u32, CashFlowRow> = BTreeMap::new();
    for row in reports.iter().flat_map(|r| financial::cash_flows(&r.timeline)) {
        by_year
            .entry(row.year)
            .and_modify(|existing| *existing = existing.add(&row))
            .or_insert(row);
    }
    by_year.into_values().collect()
}
