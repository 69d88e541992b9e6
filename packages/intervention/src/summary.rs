//! Summary generator: best timeframe, key benefits, recommendation and risk
//! flags for a report.

use urbanome_intervention_models::report::{
    AnalysisSummary, BenefitSchedule, CostSchedule, EnvironmentalHighlights,
    EnvironmentalProjections, FinancialHighlights, KeyBenefit, Recommendation, RoiSnapshot,
    YearMap,
};
use urbanome_intervention_models::{BenefitCategory, InterventionSpec};

use crate::config::EngineConfig;

/// Risk flag for slow payback.
pub const LONG_PAYBACK_RISK: &str = "Long payback period may affect financing";

/// Risk flag when capital is never recovered within the horizon.
pub const NO_PAYBACK_RISK: &str = "Investment is not recovered within the projection horizon";

/// Risk flag for very large plantings.
pub const LARGE_PLANTING_RISK: &str =
    "Large tree planting may require significant maintenance resources";

/// Risk flag for small solar arrays.
pub const LIMITED_SOLAR_RISK: &str = "Solar generation may be limited by available roof space";

/// Everything the generator reads from a report under construction.
#[derive(Debug, Clone, Copy)]
pub struct SummaryInput<'a> {
    /// Operational horizon years, increasing.
    pub years: &'a [u32],
    /// Environmental outcomes.
    pub projections: &'a EnvironmentalProjections,
    /// Cost schedule.
    pub costs: &'a CostSchedule,
    /// Benefit schedule.
    pub benefits: &'a BenefitSchedule,
    /// Return indicators per year.
    pub roi: &'a YearMap<RoiSnapshot>,
    /// Warnings collected so far.
    pub warnings: &'a [String],
    /// Interventions behind the report.
    pub interventions: &'a [InterventionSpec],
}

/// Horizon year with the highest ROI; the earliest wins ties.
#[must_use]
pub fn best_timeframe(years: &[u32], roi: &YearMap<RoiSnapshot>) -> Option<(u32, f64)> {
    years
        .iter()
        .filter_map(|year| roi.get(year).map(|snapshot| (*year, snapshot.roi)))
        .fold(None, |best, (year, value)| match best {
            Some((_, best_value)) if best_value >= value => best,
            _ => Some((year, value)),
        })
}

/// The `count` largest benefit categories at `year`, highest first.
#[must_use]
pub fn key_benefits(benefits: &BenefitSchedule, year: u32, count: usize) -> Vec<KeyBenefit> {
    let at_year = benefits.at(year);
    let mut ranked: Vec<KeyBenefit> = BenefitCategory::all()
        .iter()
        .map(|category| KeyBenefit {
            category: *category,
            name: category.label().to_string(),
            value: at_year.get(*category),
        })
        .collect();
    ranked.sort_by(|a, b| b.value.total_cmp(&a.value));
    ranked.truncate(count);
    ranked
}

/// Warnings plus heuristic flags.
#[must_use]
pub fn risk_factors(
    input: &SummaryInput<'_>,
    best: Option<u32>,
    config: &EngineConfig,
) -> Vec<String> {
    let thresholds = &config.summary;
    let mut risks: Vec<String> = input.warnings.to_vec();

    let payback = best
        .and_then(|year| input.roi.get(&year))
        .map(|snapshot| snapshot.payback_period);
    match payback {
        Some(Some(years)) if years > thresholds.long_payback_years => {
            risks.push(LONG_PAYBACK_RISK.to_string());
        }
        Some(None) if input.costs.implementation > 0.0 => {
            risks.push(NO_PAYBACK_RISK.to_string());
        }
        _ => {}
    }

    let trees: u64 = input
        .interventions
        .iter()
        .filter_map(|spec| match spec {
            InterventionSpec::UrbanForestry(p) => Some(u64::from(p.number_of_trees)),
            _ => None,
        })
        .sum();
    if trees > u64::from(thresholds.large_tree_count) {
        risks.push(LARGE_PLANTING_RISK.to_string());
    }

    let has_solar = input
        .interventions
        .iter()
        .any(|spec| matches!(spec, InterventionSpec::RooftopSolar(_)));
    if has_solar {
        let generated = input
            .years
            .last()
            .and_then(|year| input.projections.energy_generation.get(year))
            .map_or(0.0, |energy| energy.total_generation);
        if generated < thresholds.min_solar_generation_kwh {
            risks.push(LIMITED_SOLAR_RISK.to_string());
        }
    }

    risks
}

/// Builds the summary for a report.
#[must_use]
pub fn generate(input: &SummaryInput<'_>, config: &EngineConfig) -> AnalysisSummary {
    let best = best_timeframe(input.years, input.roi);
    let best_year = best.map(|(year, _)| year);
    let best_roi = best.map_or(0.0, |(_, roi)| roi);

    let recommendation = if best_roi > 0.0 {
        Recommendation::Recommended
    } else {
        Recommendation::NotRecommended
    };

    let financial_highlights = best_year.and_then(|year| {
        let roi = input.roi.get(&year)?;
        Some(FinancialHighlights {
            total_cost: input.costs.total.get(&year).copied().unwrap_or_default(),
            total_benefit: input.benefits.total.get(&year).copied().unwrap_or_default(),
            roi: roi.roi,
            payback_period: roi.payback_period,
        })
    });

    let environmental_impact = best_year.map(|year| {
        let projections = input.projections;
        EnvironmentalHighlights {
            temperature_reduction: projections
                .temperature
                .get(&year)
                .map_or(0.0, |t| t.reduction),
            vegetation_increase: projections
                .vegetation
                .get(&year)
                .map_or(0.0, |v| v.improvement),
            carbon_sequestered: projections
                .carbon_sequestration
                .get(&year)
                .map_or(0.0, |c| c.total_sequestration),
        }
    });

    let ranked = best_year.map_or_else(Vec::new, |year| {
        key_benefits(input.benefits, year, config.summary.key_benefit_count)
    });

    log::debug!("Best timeframe {best_year:?} with ROI {best_roi:.1}%: {recommendation}");

    AnalysisSummary {
        recommendation,
        best_timeframe: best_year,
        best_roi,
        key_benefits: ranked,
        financial_highlights,
        environmental_impact,
        risk_factors: risk_factors(input, best_year, config),
    }
}
