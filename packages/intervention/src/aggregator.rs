//! Projection aggregator.
//!
//! Runs every effect model for every horizon year, sums their contributions
//! and produces one [`YearProjection`] per year together with the financial
//! indicators over the whole series.

use urbanome_intervention_models::{
    Baseline, BenefitBreakdown, Confidence, FinancialSummary, InterventionKind, InterventionSpec,
    ProjectionRun, ProjectionSummary, YearProjection,
};

use crate::config::EngineConfig;
use crate::effects;
use crate::financial::{self, CashFlowRow};
use crate::validation;
use crate::EngineError;

/// Warning recorded whenever the overlap penalty is applied.
pub const INTERACTION_PENALTY_WARNING: &str =
    "Interaction penalty applied due to overlapping interventions";

/// Caveats attached to every projection summary.
pub const PROTOTYPE_NOTES: &[&str] = &[
    "Prototype estimate, not a substitute for full microclimate or hydrologic modelling.",
    "Confidence levels: high (well-established), medium (needs local calibration), low (simplified proxies).",
];

/// Sums of the effect outcomes for one horizon year.
#[derive(Debug, Clone, Copy, PartialEq)]
struct YearTotals {
    year: u32,
    delta_lst: f64,
    delta_ndvi: f64,
    runoff_reduction: f64,
    tco2: f64,
    capital: f64,
    benefits: BenefitBreakdown,
    costs: f64,
    confidence: Confidence,
}

impl YearTotals {
    const fn new(year: u32) -> Self {
        Self {
            year,
            delta_lst: 0.0,
            delta_ndvi: 0.0,
            runoff_reduction: 0.0,
            tco2: 0.0,
            capital: 0.0,
            benefits: BenefitBreakdown {
                carbon_sequestration: 0.0,
                energy_savings: 0.0,
                water_management: 0.0,
                air_quality: 0.0,
                property_value: 0.0,
            },
            costs: 0.0,
            confidence: Confidence::High,
        }
    }

    fn cash_flow(&self) -> CashFlowRow {
        CashFlowRow {
            year: self.year,
            benefits: self.benefits.total(),
            costs: self.costs,
            capital: self.capital,
        }
    }
}

/// Whether the overlap penalty applies to this intervention set.
///
/// Only forestry and green roofs are treated as sharing a footprint.
#[must_use]
pub fn interaction_penalty_applies(interventions: &[InterventionSpec]) -> bool {
    let has = |kind: InterventionKind| interventions.iter().any(|spec| spec.kind() == kind);
    has(InterventionKind::UrbanForestry) && has(InterventionKind::GreenRoofs)
}

/// Projects `specs` against `baseline` over the configured horizon.
///
/// # Errors
///
/// * If the configuration is invalid
/// * If the baseline or any intervention fails validation
pub fn project(
    baseline: &Baseline,
    specs: &[InterventionSpec],
    config: &EngineConfig,
) -> Result<ProjectionRun, EngineError> {
    config.validate()?;
    let validated = validation::validate(baseline, specs)?;
    let interventions = validated.interventions;
    let mut warnings = validated.warnings;

    let penalty = interaction_penalty_applies(&interventions);
    if penalty {
        log::warn!("{INTERACTION_PENALTY_WARNING}");
        warnings.push(INTERACTION_PENALTY_WARNING.to_string());
    }

    let totals: Vec<YearTotals> = config
        .horizon_years
        .iter()
        .map(|&year| year_totals(baseline, &interventions, year, penalty, config))
        .collect();

    let rows: Vec<CashFlowRow> = totals.iter().map(YearTotals::cash_flow).collect();
    for warning in financial::input_warnings(&rows) {
        log::warn!("{warning}");
        warnings.push(warning);
    }

    let npv = financial::cumulative_npv(&rows, config.economics.discount_rate);
    let projections: Vec<YearProjection> = totals
        .iter()
        .zip(&rows)
        .zip(npv)
        .map(|((t, row), npv)| YearProjection {
            year: t.year,
            lst_mean: baseline.lst_mean + t.delta_lst,
            ndvi_mean: baseline.ndvi_mean + t.delta_ndvi,
            delta_lst: t.delta_lst,
            delta_ndvi: t.delta_ndvi,
            runoff_index: (1.0 - t.runoff_reduction).max(0.0),
            tco2_sequestered: t.tco2,
            capital_cost_total: t.capital,
            annual_benefits_usd: row.benefits,
            benefits: t.benefits,
            annual_costs_usd: row.costs,
            cashflow_usd: row.benefits - row.costs - row.capital,
            npv_usd_cumulative: npv,
            confidence: t.confidence,
            warnings: warnings.clone(),
        })
        .collect();

    let financial = financial::analyze(&rows, config);
    let summary = summarize(baseline, &projections, &financial, config);

    log::info!(
        "Projected {} intervention(s) over {} years: ΔLST {:.2} °C at year {}, NPV {:.0} USD",
        interventions.len(),
        summary.horizon_years,
        projections.last().map_or(0.0, |p| p.delta_lst),
        summary.horizon_years,
        financial.final_npv,
    );

    Ok(ProjectionRun {
        baseline: baseline.clone(),
        interventions,
        projections,
        financial,
        summary,
        warnings,
    })
}

fn year_totals(
    baseline: &Baseline,
    interventions: &[InterventionSpec],
    year: u32,
    penalty: bool,
    config: &EngineConfig,
) -> YearTotals {
    let mut totals = YearTotals::new(year);

    for spec in interventions {
        let outcome = effects::evaluate(spec, baseline, year, config);
        log::debug!("Year {year} {}: {outcome:?}", spec.kind());

        totals.delta_lst += outcome.delta_lst;
        totals.delta_ndvi += outcome.delta_ndvi;
        totals.runoff_reduction += outcome.runoff_reduction_frac;
        totals.tco2 += outcome.tco2_year;
        totals.capital += outcome.capital_cost;
        totals.benefits = totals.benefits.add(&outcome.benefits);
        totals.costs += outcome.annual_costs;
        totals.confidence = totals.confidence.weakest(outcome.confidence);
    }

    if penalty {
        totals.delta_lst *= config.climate.interaction_penalty;
        totals.delta_ndvi *= config.climate.interaction_penalty;
    }

    if year == 0 {
        totals.benefits = BenefitBreakdown::default();
        totals.costs = 0.0;
    }

    totals
}

fn summarize(
    baseline: &Baseline,
    projections: &[YearProjection],
    financial: &FinancialSummary,
    config: &EngineConfig,
) -> ProjectionSummary {
    let at = |year: u32| projections.iter().find(|p| p.year == year);

    ProjectionSummary {
        horizon_years: config.final_year(),
        delta_lst_5yr: at(5).map_or(0.0, |p| p.lst_mean - baseline.lst_mean),
        delta_lst_10yr: at(10).map_or(0.0, |p| p.lst_mean - baseline.lst_mean),
        delta_ndvi_10yr: at(10).map_or(0.0, |p| p.ndvi_mean - baseline.ndvi_mean),
        payback_year: financial.payback_year,
        total_capital_cost_usd: financial.total_capital_cost,
        notes: PROTOTYPE_NOTES.iter().map(ToString::to_string).collect(),
    }
}
