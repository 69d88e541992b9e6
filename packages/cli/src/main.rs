#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line driver for the intervention engine.
//!
//! ```text
//! urbanome analyze --baseline payload.json --scenario trees.toml [--config engine.toml] [--area 12000] [--pretty]
//! urbanome combine --baseline payload.json --scenario trees.toml --scenario roofs.toml
//! urbanome catalog
//! urbanome preset urban-forestry
//! ```
//!
//! Reports are written to stdout as JSON. Set `RUST_LOG=info` to see run
//! summaries and every default substitution or soft-constraint warning.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;
use urbanome_baseline::AdapterOptions;
use urbanome_intervention::presets::preset_toml;
use urbanome_intervention::{EngineConfig, Scenario, analyze, combine};
use urbanome_intervention_models::{Baseline, InterventionKind};

#[derive(Parser)]
#[command(
    name = "urbanome",
    about = "Project the impact and financial return of urban climate interventions"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one scenario against a baseline payload
    Analyze {
        /// Environmental analysis payload (JSON)
        #[arg(long)]
        baseline: PathBuf,
        /// Scenario file (TOML)
        #[arg(long)]
        scenario: PathBuf,
        /// Engine coefficient overrides (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Polygon area in m², overriding the payload
        #[arg(long)]
        area: Option<f64>,
        /// Pretty-print the JSON report
        #[arg(long)]
        pretty: bool,
    },
    /// Analyze several scenarios independently and combine the results
    Combine {
        /// Environmental analysis payload (JSON)
        #[arg(long)]
        baseline: PathBuf,
        /// Scenario files (TOML), at least two
        #[arg(long = "scenario", required = true)]
        scenarios: Vec<PathBuf>,
        /// Engine coefficient overrides (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Polygon area in m², overriding the payload
        #[arg(long)]
        area: Option<f64>,
        /// Pretty-print the JSON report
        #[arg(long)]
        pretty: bool,
    },
    /// List the intervention families
    Catalog,
    /// Print the default scenario for an intervention family
    Preset {
        /// Intervention kind, e.g. `urban-forestry`
        kind: String,
    },
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(EngineConfig::from_toml_str(&std::fs::read_to_string(path)?)?),
        None => Ok(EngineConfig::default()),
    }
}

fn load_baseline(path: &Path, area: Option<f64>) -> Result<Baseline, Box<dyn std::error::Error>> {
    let options = AdapterOptions {
        polygon_area_m2: area,
        ..AdapterOptions::default()
    };
    Ok(urbanome_baseline::from_json_str(
        &std::fs::read_to_string(path)?,
        &options,
    )?)
}

fn load_scenario(path: &Path) -> Result<Scenario, Box<dyn std::error::Error>> {
    let scenario = Scenario::from_toml_str(&std::fs::read_to_string(path)?)?;
    log::info!(
        "Loaded scenario {} with {} intervention(s)",
        scenario.name.as_deref().unwrap_or("(unnamed)"),
        scenario.interventions.len()
    );
    Ok(scenario)
}

fn parse_kind(kind: &str) -> Result<InterventionKind, String> {
    kind.parse::<InterventionKind>()
        .map_err(|e| format!("Unknown intervention kind '{kind}': {e:?}"))
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), serde_json::Error> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{json}");
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            baseline,
            scenario,
            config,
            area,
            pretty,
        } => {
            let config = load_config(config.as_deref())?;
            let baseline = load_baseline(&baseline, area)?;
            let scenario = load_scenario(&scenario)?;

            let report = analyze(&baseline, &scenario.interventions, &config)?;
            print_json(&report, pretty)?;
        }
        Commands::Combine {
            baseline,
            scenarios,
            config,
            area,
            pretty,
        } => {
            let config = load_config(config.as_deref())?;
            let baseline = load_baseline(&baseline, area)?;

            let reports = scenarios
                .iter()
                .map(|path| -> Result<_, Box<dyn std::error::Error>> {
                    let scenario = load_scenario(path)?;
                    Ok(analyze(&baseline, &scenario.interventions, &config)?)
                })
                .collect::<Result<Vec<_>, Box<dyn std::error::Error>>>()?;

            let combined = combine(&reports, &config)?;
            print_json(&combined, pretty)?;
        }
        Commands::Catalog => {
            println!("{:<16} {:<36} {:<18} DESCRIPTION", "KIND", "NAME", "CATEGORY");
            println!("{}", "-".repeat(120));

            for kind in InterventionKind::all() {
                println!(
                    "{:<16} {:<36} {:<18} {}",
                    kind.as_ref(),
                    kind.label(),
                    kind.category().as_ref(),
                    kind.description()
                );
                for benefit in kind.headline_benefits() {
                    println!("{:<16} - {benefit}", "");
                }
            }
        }
        Commands::Preset { kind } => {
            let kind = parse_kind(&kind)?;
            match preset_toml(kind) {
                Some(toml) => print!("{toml}"),
                None => {
                    eprintln!("No preset registered for {kind}");
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
