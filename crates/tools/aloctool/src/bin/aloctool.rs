//! aloctool - Inspect ALOC collision files and place them into scenarios

use aloc::LayerFilter;
use aloctool::config::ToolConfig;
use aloctool::inspect::inspect_files;
use aloctool::scenario::{aloc_dir_for, load_scenario, ScenarioReport};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "aloctool")]
#[command(about = "Inspect Glacier ALOC collision files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode files and print a summary of each
    Inspect {
        /// ALOC files to decode
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        /// Layers to treat as non-collidable, e.g. "CLIP,HERO_PROXY,28"
        #[arg(long, value_name = "LAYERS")]
        exclude: Option<LayerFilter>,
    },

    /// Pair a scenario's entities with their collidable ALOC files
    Scenario {
        /// Scenario JSON exported alongside the aloc directory
        scenario: PathBuf,

        /// Directory holding the .aloc files (default: next to the scenario)
        #[arg(long)]
        aloc_dir: Option<PathBuf>,

        /// Layers to treat as non-collidable
        #[arg(long, value_name = "LAYERS")]
        exclude: Option<LayerFilter>,

        /// Print the full placement report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ToolConfig::from_env()?;

    match cli.command {
        Commands::Inspect {
            files,
            json,
            exclude,
        } => {
            let config = config.with_overrides(exclude);
            let failed = inspect_command(&files, json, &config)?;
            if failed > 0 {
                eprintln!("{failed} of {} files failed to decode", files.len());
                process::exit(1);
            }
        }
        Commands::Scenario {
            scenario,
            aloc_dir,
            exclude,
            json,
        } => {
            let config = config.with_overrides(exclude);
            let aloc_dir = aloc_dir.unwrap_or_else(|| aloc_dir_for(&scenario, &config.aloc_dir_name));
            let report = load_scenario(&scenario, &aloc_dir, &config.excluded_layers)?;
            print_report(&report, json)?;
        }
    }

    Ok(())
}

/// Returns the number of files that failed
fn inspect_command(files: &[PathBuf], json: bool, config: &ToolConfig) -> Result<usize> {
    let outcomes = inspect_files(files, &config.excluded_layers);

    if json {
        println!("{}", serde_json::to_string_pretty(&outcomes)?);
    } else {
        for outcome in &outcomes {
            print!("{outcome}");
        }
    }

    Ok(outcomes.iter().filter(|outcome| outcome.is_failure()).count())
}

fn print_report(report: &ScenarioReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    for placement in report.placements() {
        let t = placement.transform;
        println!(
            "{} #{}: {} records, position {:?}, rotation {:?}, scale {:?}",
            placement.hash,
            placement.instance,
            placement.container.record_count(),
            t.translation.to_array(),
            t.rotation.to_array(),
            t.scale.to_array(),
        );
    }
    for skipped in &report.skipped {
        println!("{} skipped: {:?}", skipped.hash, skipped.reason);
    }
    println!(
        "{} assets, {} instances, {} skipped",
        report.assets.len(),
        report.instance_count(),
        report.skipped.len()
    );
    Ok(())
}
