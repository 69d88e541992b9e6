//! Financial analyzer.
//!
//! Works on the projected rows including year 0. Year 0 carries capital only;
//! every later row contributes `benefits - costs - capital`, discounted at
//! the configured rate for NPV and undiscounted for payback.

use urbanome_intervention_models::{FinancialSummary, RiskLevel, YearProjection};

use crate::config::{EngineConfig, FinancialConfig};

/// Payback within this many years grades as low risk.
const LOW_RISK_PAYBACK_YEARS: f64 = 5.0;

/// Payback within this many years grades as medium risk.
const MEDIUM_RISK_PAYBACK_YEARS: f64 = 10.0;

/// Average annual benefit above this share of capital is flagged.
const HIGH_ROI_BENEFIT_SHARE: f64 = 0.5;

/// The cash-flow view of one projected year.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CashFlowRow {
    /// Years since installation.
    pub year: u32,
    /// Annual benefits (USD/yr).
    pub benefits: f64,
    /// Annual O&M (USD/yr).
    pub costs: f64,
    /// Capital spent this year (USD).
    pub capital: f64,
}

impl CashFlowRow {
    /// Net cash flow. Year 0 is capital only.
    #[must_use]
    pub fn net(&self) -> f64 {
        if self.year == 0 {
            -self.capital
        } else {
            self.benefits - self.costs - self.capital
        }
    }

    /// Whether benefits accrue in this row.
    #[must_use]
    pub const fn is_operational(&self) -> bool {
        self.year > 0
    }

    /// Category-wise sum of two rows for the same year.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        Self {
            year: self.year,
            benefits: self.benefits + other.benefits,
            costs: self.costs + other.costs,
            capital: self.capital + other.capital,
        }
    }
}

impl From<&YearProjection> for CashFlowRow {
    fn from(projection: &YearProjection) -> Self {
        Self {
            year: projection.year,
            benefits: projection.annual_benefits_usd,
            costs: projection.annual_costs_usd,
            capital: projection.capital_cost_total,
        }
    }
}

/// Cash-flow rows for a projected time series.
#[must_use]
pub fn cash_flows(projections: &[YearProjection]) -> Vec<CashFlowRow> {
    projections.iter().map(CashFlowRow::from).collect()
}

/// Running NPV after each row.
#[must_use]
pub fn cumulative_npv(rows: &[CashFlowRow], discount_rate: f64) -> Vec<f64> {
    rows.iter()
        .scan(0.0, |npv, row| {
            *npv += row.net() / (1.0 + discount_rate).powf(f64::from(row.year));
            Some(*npv)
        })
        .collect()
}

/// Fractional year at which undiscounted cumulative cash flow turns
/// non-negative.
///
/// The crossing row's net flow is treated as the cash of its own year, so
/// the result is `row.year - 1 + fraction` whatever the spacing of the
/// horizon rows.
///
/// `None` when there is no capital to recover or the horizon ends first.
#[must_use]
pub fn payback_year(rows: &[CashFlowRow]) -> Option<f64> {
    let total_capital: f64 = rows.iter().map(|r| r.capital).sum();
    if total_capital <= 0.0 {
        return None;
    }

    let mut cumulative = 0.0;
    for row in rows {
        let net = row.net();
        let prev_cumulative = cumulative;
        cumulative += net;
        if row.is_operational() && cumulative >= 0.0 {
            let fraction = if prev_cumulative < 0.0 && net > 0.0 {
                prev_cumulative.abs() / net
            } else {
                0.0
            };
            return Some(f64::from(row.year - 1) + fraction);
        }
    }
    None
}

/// Mean of `benefits - costs` over the operational rows.
#[must_use]
pub fn average_annual_net_benefit(rows: &[CashFlowRow]) -> f64 {
    let operational: Vec<f64> = rows
        .iter()
        .filter(|r| r.is_operational())
        .map(|r| r.benefits - r.costs)
        .collect();
    if operational.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let count = operational.len() as f64;
    operational.iter().sum::<f64>() / count
}

/// ROI in percent before bounding; 0 when there is no capital.
#[must_use]
pub fn roi_unclamped(average_net_benefit: f64, total_capital: f64) -> f64 {
    if total_capital > 0.0 {
        average_net_benefit / total_capital * 100.0
    } else {
        0.0
    }
}

/// Bounds an ROI to the configured sanity range.
#[must_use]
pub fn bound_roi(roi: f64, financial: &FinancialConfig) -> f64 {
    roi.clamp(financial.roi_min_pct, financial.roi_max_pct)
}

/// Internal rate of return in percent, rounded to one decimal.
///
/// Newton-Raphson on `Σ net_t / (1 + r)^t = 0`. Returns `None` when the
/// series never changes sign, the derivative vanishes, an iterate leaves
/// the configured rate range, or the iteration cap is reached.
#[must_use]
pub fn irr_percentage(rows: &[CashFlowRow], financial: &FinancialConfig) -> Option<f64> {
    let flows: Vec<(f64, f64)> = rows.iter().map(|r| (f64::from(r.year), r.net())).collect();
    let has_outflow = flows.iter().any(|(_, cf)| *cf < 0.0);
    let has_inflow = flows.iter().any(|(_, cf)| *cf > 0.0);
    if !has_outflow || !has_inflow {
        return None;
    }

    let mut rate = financial.irr_seed;
    for _ in 0..financial.irr_max_iterations {
        let (npv, dnpv) = flows.iter().fold((0.0, 0.0), |(npv, dnpv), (t, cf)| {
            let factor = (1.0 + rate).powf(*t);
            (npv + cf / factor, dnpv - t * cf / (factor * (1.0 + rate)))
        });
        if !dnpv.is_finite() || dnpv.abs() < f64::MIN_POSITIVE {
            log::debug!("IRR derivative vanished at rate {rate}");
            return None;
        }

        let next = rate - npv / dnpv;
        if !next.is_finite() || next <= financial.irr_min_rate || next > financial.irr_max_rate {
            log::debug!("IRR iteration diverged to {next}");
            return None;
        }
        if (next - rate).abs() < financial.irr_tolerance {
            return Some((next * 1000.0).round() / 10.0);
        }
        rate = next;
    }

    log::debug!(
        "IRR did not converge within {} iterations",
        financial.irr_max_iterations
    );
    None
}

/// Grades risk from NPV and payback.
#[must_use]
pub fn risk_level(final_npv: f64, payback: Option<f64>) -> RiskLevel {
    if final_npv <= 0.0 {
        return RiskLevel::VeryHigh;
    }
    match payback {
        Some(years) if years <= LOW_RISK_PAYBACK_YEARS => RiskLevel::Low,
        Some(years) if years <= MEDIUM_RISK_PAYBACK_YEARS => RiskLevel::Medium,
        _ => RiskLevel::High,
    }
}

/// Computes every indicator over a cash-flow series.
#[must_use]
pub fn analyze(rows: &[CashFlowRow], config: &EngineConfig) -> FinancialSummary {
    let total_capital_cost: f64 = rows.iter().map(|r| r.capital).sum();
    let final_npv = cumulative_npv(rows, config.economics.discount_rate)
        .last()
        .copied()
        .unwrap_or_default();
    let payback = payback_year(rows);
    let average = average_annual_net_benefit(rows);
    let roi_raw = roi_unclamped(average, total_capital_cost);

    let operational = rows.iter().filter(|r| r.is_operational());
    let total_benefits: f64 = operational.clone().map(|r| r.benefits).sum();
    let total_costs = total_capital_cost + operational.map(|r| r.costs).sum::<f64>();
    let benefit_cost_ratio = if total_costs > 0.0 {
        total_benefits / total_costs
    } else {
        0.0
    };

    FinancialSummary {
        payback_year: payback,
        total_capital_cost,
        final_npv,
        roi_percentage: bound_roi(roi_raw, &config.financial),
        roi_unclamped_percentage: roi_raw,
        average_annual_net_benefit: average,
        irr_percentage: irr_percentage(rows, &config.financial),
        benefit_cost_ratio,
        total_benefits,
        total_costs,
        net_benefit: total_benefits - total_costs,
        is_viable: final_npv > 0.0 && payback.is_some(),
        risk_level: risk_level(final_npv, payback),
    }
}

/// Sanity checks on the figures going into the analyzer.
#[must_use]
pub fn input_warnings(rows: &[CashFlowRow]) -> Vec<String> {
    let mut warnings = Vec::new();

    if rows.iter().any(|r| r.benefits < 0.0) {
        warnings.push("Negative benefit figures detected".to_string());
    }
    if rows.iter().any(|r| r.costs < 0.0 || r.capital < 0.0) {
        warnings.push("Negative cost figures detected".to_string());
    }

    let total_capital: f64 = rows.iter().map(|r| r.capital).sum();
    let operational: Vec<f64> = rows
        .iter()
        .filter(|r| r.is_operational())
        .map(|r| r.benefits)
        .collect();
    if total_capital > 0.0 && !operational.is_empty() {
        #[allow(clippy::cast_precision_loss)]
        let average_benefit = operational.iter().sum::<f64>() / operational.len() as f64;
        if average_benefit > total_capital * HIGH_ROI_BENEFIT_SHARE {
            warnings.push("ROI appears unusually high, verify inputs".to_string());
        }
    }

    warnings
}
