//! Builds the downstream [`ImpactReport`] from a projection run.
//!
//! Per-year figures cover the operational horizon years (year > 0).
//! Cumulative quantities multiply the annual rate at a year by the years
//! elapsed, matching how the dashboard presents them.

use urbanome_intervention_models::report::{
    BenefitSchedule, CarbonImpact, CostSchedule, EnergyImpact, EnvironmentalProjections,
    ImpactReport, ReportMetadata, RoiSnapshot, TemperatureImpact, VegetationImpact, WaterImpact, YearMap,
};
use urbanome_intervention_models::{Baseline, InterventionKind, InterventionSpec, ProjectionRun};

use crate::config::EngineConfig;
use crate::effects::solar::annual_generation_kwh;
use crate::financial::{self, CashFlowRow};
use crate::summary::{self, SummaryInput};

/// Millimetres per metre.
const MM_PER_M: f64 = 1000.0;

/// Builds the report for one projection run.
#[must_use]
pub fn build_report(run: &ProjectionRun, config: &EngineConfig) -> ImpactReport {
    let baseline = &run.baseline;
    let operational: Vec<_> = run.projections.iter().filter(|p| p.year > 0).collect();
    let years: Vec<u32> = operational.iter().map(|p| p.year).collect();

    let mut projections = EnvironmentalProjections::default();
    let mut costs = CostSchedule {
        implementation: run.financial.total_capital_cost,
        ..CostSchedule::default()
    };
    let mut benefits = BenefitSchedule::default();

    for p in &operational {
        let year = p.year;
        let elapsed = f64::from(year);

        let reduction = -p.delta_lst;
        projections.temperature.insert(
            year,
            TemperatureImpact {
                reduction,
                new_temperature: p.lst_mean,
                percent_improvement: percent_of(reduction.abs(), baseline.lst_mean),
            },
        );
        projections.vegetation.insert(
            year,
            VegetationImpact {
                improvement: p.delta_ndvi * 100.0,
                total: p.ndvi_mean * 100.0,
            },
        );

        let total_sequestration = p.tco2_sequestered * elapsed;
        projections.carbon_sequestration.insert(
            year,
            CarbonImpact {
                annual_sequestration: p.tco2_sequestered,
                total_sequestration,
                monetary_value: total_sequestration
                    * config.economics.social_cost_of_carbon_usd_per_t,
            },
        );
        projections
            .energy_generation
            .insert(year, energy_generation(&run.interventions, year, config));
        projections.water_management.insert(
            year,
            WaterImpact {
                total_stormwater_managed: stormwater_m3(baseline, p.runoff_index) * elapsed,
                monetary_value: p.benefits.water_management * elapsed,
            },
        );

        let maintenance = p.annual_costs_usd
            * elapsed
            * (1.0 + config.economics.inflation_rate).powf(elapsed);
        costs.maintenance.insert(year, maintenance);
        costs.total.insert(year, costs.implementation + maintenance);

        benefits.insert(year, &p.benefits.scaled(elapsed));
    }

    let rows = financial::cash_flows(&run.projections);
    let roi = roi_by_year(&rows, &years, config);
    let warnings = dedup_warnings(run.warnings.iter());

    let summary = summary::generate(
        &SummaryInput {
            years: &years,
            projections: &projections,
            costs: &costs,
            benefits: &benefits,
            roi: &roi,
            warnings: &warnings,
            interventions: &run.interventions,
        },
        config,
    );

    ImpactReport {
        metadata: metadata(&run.interventions, baseline.polygon_area_m2),
        baseline: baseline.clone(),
        interventions: run.interventions.clone(),
        years,
        projections,
        costs,
        benefits,
        roi,
        timeline: run.projections.clone(),
        financial: run.financial.clone(),
        summary,
        warnings,
    }
}

/// Solar output from installation through `year`, summed over every
/// rooftop solar intervention.
fn energy_generation(interventions: &[InterventionSpec], year: u32, config: &EngineConfig) -> EnergyImpact {
    let total_generation: f64 = interventions
        .iter()
        .filter_map(|spec| match spec {
            InterventionSpec::RooftopSolar(p) => Some(p),
            _ => None,
        })
        .flat_map(|p| (1..=year).map(move |y| annual_generation_kwh(p, y, &config.solar)))
        .sum();
    let annual_generation = if year > 0 {
        total_generation / f64::from(year)
    } else {
        0.0
    };
    EnergyImpact {
        annual_generation,
        total_generation,
        monetary_value: total_generation * config.economics.grid_price_usd_per_kwh,
    }
}

/// Annual stormwater volume kept out of the drains (m³/yr).
fn stormwater_m3(baseline: &Baseline, runoff_index: f64) -> f64 {
    (1.0 - runoff_index) * baseline.precip_mm_yr * baseline.polygon_area_m2 / MM_PER_M
}

fn percent_of(value: f64, reference: f64) -> f64 {
    if reference.abs() > 0.0 {
        value / reference.abs() * 100.0
    } else {
        0.0
    }
}

/// Financial indicators on each horizon prefix ending at one of `years`.
pub(crate) fn roi_by_year(
    rows: &[CashFlowRow],
    years: &[u32],
    config: &EngineConfig,
) -> YearMap<RoiSnapshot> {
    years
        .iter()
        .map(|&year| {
            let end = rows.iter().take_while(|r| r.year <= year).count();
            let summary = financial::analyze(&rows[..end], config);
            (
                year,
                RoiSnapshot {
                    roi: summary.roi_percentage,
                    roi_unclamped: summary.roi_unclamped_percentage,
                    payback_period: summary.payback_year,
                    net_present_value: summary.final_npv,
                },
            )
        })
        .collect()
}

/// Distinct kinds in first-seen order.
pub(crate) fn distinct_kinds<'a>(
    interventions: impl IntoIterator<Item = &'a InterventionSpec>,
) -> Vec<InterventionKind> {
    let mut kinds = Vec::new();
    for spec in interventions {
        let kind = spec.kind();
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    kinds
}

/// Report metadata for an intervention set.
pub(crate) fn metadata(interventions: &[InterventionSpec], area_m2: f64) -> ReportMetadata {
    let kinds = distinct_kinds(interventions);
    let (name, description) = match (kinds.as_slice(), interventions.len()) {
        ([], _) => (
            "No Intervention".to_string(),
            "Baseline conditions without any intervention".to_string(),
        ),
        ([kind], 1) => (kind.label().to_string(), kind.description().to_string()),
        (_, count) => (
            "Mixed Interventions".to_string(),
            format!("Combined analysis of {count} interventions"),
        ),
    };
    ReportMetadata {
        name,
        description,
        area_m2,
        interventions: kinds,
    }
}

/// Removes repeated warnings, keeping the first occurrence of each.
pub(crate) fn dedup_warnings<'a>(warnings: impl IntoIterator<Item = &'a String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::new();
    for warning in warnings {
        if !unique.contains(warning) {
            unique.push(warning.clone());
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use urbanome_intervention_models::{
        BenefitCategory, ForestryParams, GreenRoofParams, SolarParams,
    };

    use super::*;
    use crate::aggregator::project;
    use crate::effects::test_support::hectare_baseline;

    fn trees() -> InterventionSpec {
        InterventionSpec::UrbanForestry(ForestryParams {
            number_of_trees: 100,
            cost_per_tree_usd: 150.0,
            planting_density_m2_per_tree: 100.0,
        })
    }

    fn forestry_report() -> ImpactReport {
        let config = EngineConfig::default();
        let run = project(&hectare_baseline(), &[trees()], &config).unwrap();
        build_report(&run, &config)
    }

    #[test]
    fn covers_operational_years_only() {
        let report = forestry_report();
        assert_eq!(report.years, vec![5, 10, 15]);
        assert!(!report.projections.temperature.contains_key(&0));
        assert_eq!(report.roi.len(), 3);
        assert_eq!(report.timeline.len(), 4);
    }

    #[test]
    fn temperature_and_vegetation_at_maturity() {
        let report = forestry_report();
        let temperature = report.projections.temperature[&10];
        assert!((temperature.reduction - 1.05).abs() < 1e-12);
        assert!((temperature.new_temperature - 31.45).abs() < 1e-12);
        assert!((temperature.percent_improvement - 1.05 / 32.5 * 100.0).abs() < 1e-9);

        let vegetation = report.projections.vegetation[&10];
        assert!((vegetation.improvement - 30.0).abs() < 1e-9);
        assert!((vegetation.total - 60.0).abs() < 1e-9);
    }

    #[test]
    fn carbon_accumulates_over_elapsed_years() {
        let report = forestry_report();
        let carbon = report.projections.carbon_sequestration[&10];
        assert!((carbon.annual_sequestration - 2.1).abs() < 1e-12);
        assert!((carbon.total_sequestration - 21.0).abs() < 1e-9);
        assert!((carbon.monetary_value - 1575.0).abs() < 1e-9);
    }

    #[test]
    fn stormwater_volume_uses_precipitation_and_area() {
        let report = forestry_report();
        // runoff reduction 0.05 × 1200 mm × 1 ha = 600 m³/yr
        let water = report.projections.water_management[&10];
        assert!((water.total_stormwater_managed - 6000.0).abs() < 1e-6);
        assert!((water.monetary_value - 170.0).abs() < 1e-9);
    }

    #[test]
    fn energy_generation_sums_degraded_output() {
        let config = EngineConfig::default();
        let solar = InterventionSpec::RooftopSolar(SolarParams {
            solar_panel_area_m2: 500.0,
            panel_efficiency_pct: 20.0,
            reflective_coating_area_m2: 300.0,
            solar_cost_per_m2_usd: 300.0,
            reflective_cost_per_m2_usd: 50.0,
        });
        let run = project(&hectare_baseline(), &[solar], &config).unwrap();
        let report = build_report(&run, &config);

        // 500 m² × 1800 kWh/m² × 0.20 × 0.78 = 140 400 kWh/yr before degradation
        let expected: f64 = (1..=5).map(|y| 140_400.0 * 0.994_f64.powi(y)).sum();
        let energy = report.projections.energy_generation[&5];
        assert!((energy.total_generation - expected).abs() < 1e-6);
        assert!((energy.annual_generation - expected / 5.0).abs() < 1e-6);
        assert!((energy.monetary_value - expected * 0.08).abs() < 1e-6);
        assert!(report.projections.energy_generation[&15].total_generation > energy.total_generation);

        assert!(forestry_report().projections.energy_generation[&10].total_generation.abs() < f64::EPSILON);
    }

    #[test]
    fn maintenance_is_inflation_compounded() {
        let report = forestry_report();
        assert!((report.costs.implementation - 15_000.0).abs() < 1e-9);
        let expected = 300.0 * 5.0 * 1.03_f64.powi(5);
        assert!((report.costs.maintenance[&5] - expected).abs() < 1e-9);
        assert!((report.costs.total[&5] - (15_000.0 + expected)).abs() < 1e-9);
    }

    #[test]
    fn benefit_schedule_is_cumulative_per_category() {
        let report = forestry_report();
        let energy = report.benefits.category(BenefitCategory::EnergySavings);
        assert!((energy[&10] - 80.0).abs() < 1e-9);
        let sum: f64 = BenefitCategory::all()
            .iter()
            .map(|c| report.benefits.category(*c)[&15])
            .sum();
        assert!((report.benefits.total[&15] - sum).abs() < 1e-9);
    }

    #[test]
    fn roi_snapshots_use_horizon_prefixes() {
        let report = forestry_report();
        let full = &report.financial;
        let last = report.roi[&15];
        assert!((last.roi - full.roi_percentage).abs() < 1e-12);
        assert!((last.net_present_value - full.final_npv).abs() < 1e-9);
        assert!((report.roi[&5].net_present_value - report.timeline[1].npv_usd_cumulative).abs() < 1e-9);
    }

    #[test]
    fn metadata_names() {
        let single = metadata(&[trees()], 10_000.0);
        assert_eq!(single.name, "Urban Forestry");
        assert_eq!(single.interventions, vec![InterventionKind::UrbanForestry]);

        let roof = InterventionSpec::GreenRoof(GreenRoofParams {
            coverage_area_m2: 100.0,
            cost_per_m2_usd: 100.0,
            roof_area_available_m2: 100.0,
        });
        let mixed = metadata(&[trees(), roof], 10_000.0);
        assert_eq!(mixed.name, "Mixed Interventions");
        assert_eq!(mixed.interventions.len(), 2);

        assert_eq!(metadata(&[trees(), trees()], 1.0).name, "Mixed Interventions");
    }

    #[test]
    fn warnings_are_deduplicated_in_order() {
        let raw = ["b".to_string(), "a".to_string(), "b".to_string()];
        assert_eq!(dedup_warnings(raw.iter()), vec!["b".to_string(), "a".to_string()]);
    }
}
