#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Intervention impact and financial projection engine.
//!
//! Given a [`Baseline`] and a set of [`InterventionSpec`]s, projects
//! environmental deltas (temperature, vegetation, carbon, stormwater) over a
//! fixed horizon, and derives NPV, payback, bounded ROI and IRR from the
//! resulting cash flows.
//!
//! The engine is a prototype estimator. Its coefficients are approximations
//! documented in [`config`], not calibrated physical models.
//!
//! Pipeline: [`aggregator::project`] → [`financial::analyze`] →
//! [`report::build_report`] → [`summary::generate`]. [`combiner::combine`]
//! merges several independently built reports.

pub mod aggregator;
pub mod combiner;
pub mod config;
pub mod effects;
pub mod financial;
pub mod presets;
pub mod report;
pub mod scenario;
pub mod summary;
pub mod validation;

use thiserror::Error;
use urbanome_intervention_models::report::ImpactReport;
use urbanome_intervention_models::{Baseline, InterventionKind, InterventionSpec};

pub use aggregator::project;
pub use combiner::combine;
pub use config::EngineConfig;
pub use report::build_report;
pub use scenario::Scenario;

/// Errors that can occur while running the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The baseline cannot be projected.
    #[error("Invalid baseline: {message}")]
    InvalidBaseline {
        /// Description of what went wrong.
        message: String,
    },

    /// An intervention's parameters are unusable.
    #[error("Invalid {kind} intervention: {message}")]
    InvalidIntervention {
        /// Intervention family.
        kind: InterventionKind,
        /// Description of what went wrong.
        message: String,
    },

    /// A unit cost is negative.
    #[error("Invalid {kind} intervention: {field} cannot be negative (got {value})")]
    NegativeCost {
        /// Intervention family.
        kind: InterventionKind,
        /// Offending parameter.
        field: &'static str,
        /// Offending value.
        value: f64,
    },

    /// The engine configuration is inconsistent.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what went wrong.
        message: String,
    },

    /// A configuration or scenario file could not be parsed.
    #[error("TOML error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Combining needs at least two analyzed interventions.
    #[error("At least 2 interventions are required to combine, got {count}")]
    InsufficientInterventions {
        /// Number of reports supplied.
        count: usize,
    },
}

/// Projects, analyzes and summarizes `specs` against `baseline` in one call.
///
/// # Errors
///
/// * If the configuration, baseline or any intervention fails validation
pub fn analyze(
    baseline: &Baseline,
    specs: &[InterventionSpec],
    config: &EngineConfig,
) -> Result<ImpactReport, EngineError> {
    let run = project(baseline, specs, config)?;
    Ok(build_report(&run, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_the_intervention() {
        let err = EngineError::NegativeCost {
            kind: InterventionKind::GreenRoofs,
            field: "cost_per_m2_usd",
            value: -5.0,
        };
        assert_eq!(
            err.to_string(),
            "Invalid green-roofs intervention: cost_per_m2_usd cannot be negative (got -5)"
        );

        let err = EngineError::InsufficientInterventions { count: 1 };
        assert_eq!(
            err.to_string(),
            "At least 2 interventions are required to combine, got 1"
        );
    }
}
