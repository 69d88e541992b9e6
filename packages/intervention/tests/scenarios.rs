//! End-to-end scenarios: payload → baseline → projection → report →
//! combined report.

use serde_json::json;
use urbanome_baseline::{AdapterOptions, adapt};
use urbanome_intervention::presets::default_spec;
use urbanome_intervention::{EngineConfig, EngineError, analyze, combine, project};
use urbanome_intervention_models::report::Recommendation;
use urbanome_intervention_models::{
    Baseline, ForestryParams, GreenRoofParams, InterventionKind, InterventionSpec, SolarParams,
    WetlandParams,
};

const TOLERANCE: f64 = 1e-9;

fn reference_baseline() -> Baseline {
    Baseline {
        polygon_id: Some("reference".to_string()),
        polygon_area_m2: 10_000.0,
        lst_mean: 32.5,
        ndvi_mean: 0.30,
        precip_mm_yr: 1200.0,
        elevation_mean: 8.0,
        impervious_fraction: 0.6,
        baseline_year: 2025,
    }
}

fn hundred_trees() -> InterventionSpec {
    InterventionSpec::UrbanForestry(ForestryParams {
        number_of_trees: 100,
        cost_per_tree_usd: 150.0,
        planting_density_m2_per_tree: 100.0,
    })
}

#[test]
fn forestry_reference_scenario() {
    let run = project(&reference_baseline(), &[hundred_trees()], &EngineConfig::default()).unwrap();

    let year0 = run.projection(0).unwrap();
    assert!((year0.capital_cost_total - 15_000.0).abs() < TOLERANCE);
    assert!(year0.annual_benefits_usd.abs() < TOLERANCE);
    assert!(year0.delta_lst.abs() < TOLERANCE);
    assert!((year0.lst_mean - 32.5).abs() < TOLERANCE);

    let year10 = run.projection(10).unwrap();
    assert!((year10.delta_ndvi - 0.30).abs() < TOLERANCE);
    assert!((year10.delta_lst + 1.05).abs() < TOLERANCE);
    assert!((year10.lst_mean - 31.45).abs() < TOLERANCE);
    assert!((year10.ndvi_mean - 0.60).abs() < TOLERANCE);
    assert!(year10.warnings.is_empty());
}

#[test]
fn no_interventions_leave_baseline_unchanged() {
    let baseline = reference_baseline();
    let run = project(&baseline, &[], &EngineConfig::default()).unwrap();

    assert_eq!(run.projections.len(), 4);
    for p in &run.projections {
        assert!(p.delta_lst.abs() < f64::EPSILON);
        assert!(p.delta_ndvi.abs() < f64::EPSILON);
        assert!((p.lst_mean - baseline.lst_mean).abs() < f64::EPSILON);
        assert!((p.ndvi_mean - baseline.ndvi_mean).abs() < f64::EPSILON);
        assert!((p.runoff_index - 1.0).abs() < f64::EPSILON);
    }
    assert_eq!(run.financial.payback_year, None);
    assert!(run.financial.roi_percentage.abs() < f64::EPSILON);
}

#[test]
fn roi_bounded_for_every_preset() {
    let config = EngineConfig::default();
    for kind in InterventionKind::all() {
        let report = analyze(&reference_baseline(), &[default_spec(*kind).unwrap()], &config).unwrap();
        let roi = report.financial.roi_percentage;
        assert!((-100.0..=50.0).contains(&roi), "{kind}: {roi}");
        for snapshot in report.roi.values() {
            assert!((-100.0..=50.0).contains(&snapshot.roi));
        }
    }
}

#[test]
fn payback_brackets_zero_crossing_on_annual_horizon() {
    let config = EngineConfig {
        horizon_years: (0..=30).collect(),
        ..EngineConfig::default()
    };
    let solar = default_spec(InterventionKind::RooftopSolar).unwrap();
    let run = project(&reference_baseline(), &[solar], &config).unwrap();

    let payback = run.financial.payback_year.expect("solar preset pays back within 30 years");
    let cumulative_at = |year: f64| -> f64 {
        run.projections
            .iter()
            .filter(|p| f64::from(p.year) <= year)
            .map(|p| p.cashflow_usd)
            .sum()
    };
    assert!(cumulative_at(payback.floor()) <= 0.0);
    assert!(cumulative_at(payback.ceil()) >= 0.0);
}

#[test]
fn payback_brackets_zero_crossing_on_default_horizon() {
    let cheap_solar = InterventionSpec::RooftopSolar(SolarParams {
        solar_panel_area_m2: 500.0,
        panel_efficiency_pct: 20.0,
        reflective_coating_area_m2: 300.0,
        solar_cost_per_m2_usd: 30.0,
        reflective_cost_per_m2_usd: 5.0,
    });
    let run = project(&reference_baseline(), &[cheap_solar], &EngineConfig::default()).unwrap();

    let cumulative_at = |year: f64| -> f64 {
        run.projections
            .iter()
            .filter(|p| f64::from(p.year) <= year)
            .map(|p| p.cashflow_usd)
            .sum()
    };
    // Cumulative cash is still negative at year 5 and positive by year 10.
    assert!(cumulative_at(5.0) < 0.0);
    assert!(cumulative_at(10.0) > 0.0);

    let payback = run.financial.payback_year.unwrap();
    assert!(payback > 9.0 && payback < 10.0, "payback {payback}");
    assert!(cumulative_at(payback.floor()) <= 0.0);
    assert!(cumulative_at(payback.ceil()) >= 0.0);
}

#[test]
fn green_roof_over_request_is_capped_with_warning() {
    let spec = InterventionSpec::GreenRoof(GreenRoofParams {
        coverage_area_m2: 1500.0,
        cost_per_m2_usd: 120.0,
        roof_area_available_m2: 1000.0,
    });
    let report = analyze(&reference_baseline(), &[spec], &EngineConfig::default()).unwrap();

    let InterventionSpec::GreenRoof(applied) = &report.interventions[0] else {
        panic!("expected green roof");
    };
    assert!((applied.coverage_area_m2 - 1000.0).abs() < f64::EPSILON);
    assert!((report.costs.implementation - 120_000.0).abs() < TOLERANCE);
    assert!(report
        .warnings
        .iter()
        .any(|w| w == "Green roof coverage capped to available roof area"));
    assert!(report.timeline.iter().all(|p| !p.warnings.is_empty()));
    assert!(report.summary.risk_factors.iter().any(|r| r.contains("capped")));
}

#[test]
fn wetland_cooling_is_concave_in_area() {
    let config = EngineConfig::default();
    let baseline = Baseline {
        polygon_area_m2: 100_000.0,
        ..reference_baseline()
    };
    let cooling = |area: f64| {
        let spec = InterventionSpec::UrbanWetland(WetlandParams {
            wetland_area_m2: area,
            average_water_depth_m: 1.5,
            cost_per_m2_usd: 200.0,
        });
        project(&baseline, &[spec], &config)
            .unwrap()
            .projection(5)
            .unwrap()
            .delta_lst
            .abs()
    };
    assert!(cooling(10_000.0) < 2.0 * cooling(5000.0));
    assert!(cooling(40_000.0) < 2.0 * cooling(20_000.0));
}

#[test]
fn combining_two_interventions_sums_and_averages() {
    let config = EngineConfig::default();
    let baseline = reference_baseline();
    let trees = analyze(&baseline, &[hundred_trees()], &config).unwrap();
    let wetland = analyze(
        &baseline,
        &[default_spec(InterventionKind::UrbanWetlands).unwrap()],
        &config,
    )
    .unwrap();

    let combined = combine(&[trees.clone(), wetland.clone()], &config).unwrap();
    assert_eq!(combined.years, vec![5, 10, 15]);

    for year in [5, 10, 15] {
        let sum = |a: f64, b: f64| a + b;
        let avg = |a: f64, b: f64| (a + b) / 2.0;

        let (t, w, c) = (
            &trees.projections,
            &wetland.projections,
            &combined.projections,
        );
        assert!(
            (c.carbon_sequestration[&year].total_sequestration
                - sum(
                    t.carbon_sequestration[&year].total_sequestration,
                    w.carbon_sequestration[&year].total_sequestration
                ))
            .abs()
                < TOLERANCE
        );
        assert!(
            (c.water_management[&year].total_stormwater_managed
                - sum(
                    t.water_management[&year].total_stormwater_managed,
                    w.water_management[&year].total_stormwater_managed
                ))
            .abs()
                < 1e-6
        );
        assert!(
            (c.temperature[&year].reduction
                - avg(t.temperature[&year].reduction, w.temperature[&year].reduction))
            .abs()
                < TOLERANCE
        );
        assert!(
            (c.vegetation[&year].improvement
                - avg(t.vegetation[&year].improvement, w.vegetation[&year].improvement))
            .abs()
                < TOLERANCE
        );
        assert!(
            (combined.costs.total[&year] - sum(trees.costs.total[&year], wetland.costs.total[&year]))
                .abs()
                < 1e-6
        );
        assert!(
            (combined.benefits.total[&year]
                - sum(trees.benefits.total[&year], wetland.benefits.total[&year]))
            .abs()
                < 1e-6
        );
    }

    assert!(
        (combined.financial.total_capital_cost
            - (trees.financial.total_capital_cost + wetland.financial.total_capital_cost))
            .abs()
            < TOLERANCE
    );
}

#[test]
fn combining_a_single_report_fails() {
    let config = EngineConfig::default();
    let report = analyze(&reference_baseline(), &[hundred_trees()], &config).unwrap();
    let err = combine(&[report], &config).unwrap_err();
    assert!(matches!(err, EngineError::InsufficientInterventions { count: 1 }));
}

#[test]
fn fatal_inputs_are_rejected_before_projection() {
    let config = EngineConfig::default();
    let no_area = Baseline {
        polygon_area_m2: -1.0,
        ..reference_baseline()
    };
    assert!(matches!(
        analyze(&no_area, &[hundred_trees()], &config),
        Err(EngineError::InvalidBaseline { .. })
    ));

    let no_trees = InterventionSpec::UrbanForestry(ForestryParams {
        number_of_trees: 0,
        cost_per_tree_usd: 150.0,
        planting_density_m2_per_tree: 100.0,
    });
    assert!(matches!(
        analyze(&reference_baseline(), &[no_trees], &config),
        Err(EngineError::InvalidIntervention { .. })
    ));
}

#[test]
fn adapted_payload_feeds_the_engine() {
    let payload = json!({
        "data": {
            "analysis_results": [{
                "analysis": {
                    "temperature": { "mean": 305.65 },
                    "vegetation": { "ndvi_mean": 0.30 },
                    "geometry_info": { "area_km2": 0.01 },
                    "elevation": { "mean": 8.0 }
                }
            }]
        }
    });
    let baseline = adapt(&payload, &AdapterOptions::default());
    assert!((baseline.polygon_area_m2 - 10_000.0).abs() < 1e-6);

    let report = analyze(&baseline, &[hundred_trees()], &EngineConfig::default()).unwrap();
    assert!((report.projections.temperature[&10].new_temperature - 31.45).abs() < 1e-6);
}

#[test]
fn report_json_exposes_downstream_shape() {
    let report = analyze(&reference_baseline(), &[hundred_trees()], &EngineConfig::default()).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert!(json["projections"]["temperature"]["10"]["reduction"].is_f64());
    assert!(json["projections"]["vegetation"]["10"]["improvement"].is_f64());
    assert!(json["projections"]["carbonSequestration"]["10"]["annualSequestration"].is_f64());
    assert!(json["projections"]["waterManagement"]["10"]["totalStormwaterManaged"].is_f64());
    assert!(json["projections"]["energyGeneration"]["10"]["totalGeneration"].is_f64());
    assert!(json["costs"]["implementation"].is_f64());
    assert!(json["costs"]["maintenance"]["5"].is_f64());
    assert!(json["costs"]["total"]["15"].is_f64());
    assert!(json["benefits"]["carbonSequestration"]["10"].is_f64());
    assert!(json["benefits"]["total"]["10"].is_f64());
    assert!(json["roi"]["10"]["roi"].is_f64());
    assert!(json["roi"]["10"].get("paybackPeriod").is_some());
    assert_eq!(json["metadata"]["name"], "Urban Forestry");

    let row = &json["timeline"][2];
    assert_eq!(row["year"], 10);
    for field in [
        "LST_mean",
        "NDVI_mean",
        "runoff_index",
        "tCO2_sequestered",
        "capital_cost_total",
        "annual_benefits_usd",
        "annual_costs_usd",
        "cashflow_usd",
        "NPV_usd_cumulative",
    ] {
        assert!(row[field].is_f64(), "{field} missing from timeline row");
    }
    assert_eq!(row["confidence"], "medium");
}

#[test]
fn forestry_preset_is_not_recommended() {
    let report = analyze(&reference_baseline(), &[hundred_trees()], &EngineConfig::default()).unwrap();
    // Mature benefits (198.50 USD/yr) never cover 300 USD/yr of upkeep.
    assert_eq!(report.summary.recommendation, Recommendation::NotRecommended);
    assert_eq!(report.financial.payback_year, None);
    assert_eq!(report.financial.irr_percentage, None);
}
