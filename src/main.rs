use anyhow::Context;
use clap::Parser;
use log::info;
use std::path::PathBuf;

mod config;
mod models;
mod dosing;
mod simulation;
mod output;
mod error;

use crate::config::Config;
use crate::simulation::Simulator;

#[derive(Parser)]
#[command(name = "glucodyn_sim")]
#[command(about = "Blood glucose simulation from insulin and carbohydrate events")]
struct Cli {
    /// Scenario file path (JSON)
    #[arg(short, long)]
    config: PathBuf,

    /// Output directory
    #[arg(short, long)]
    output: PathBuf,

    /// Also write a Markdown report
    #[arg(short, long)]
    report: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    let config = Config::from_file(&cli.config)
        .with_context(|| format!("failed to load scenario {:?}", cli.config))?;
    info!("Loaded scenario from {:?}", cli.config);

    let simulator = Simulator::new(&config)?;
    let request = simulator.request();
    info!(
        "Insulin duration {} h, basal {} U/h, start BG {} mg/dL",
        request.profile.insulin_duration.hours(),
        request.basal.units_per_hour,
        request.profile.initial_bg
    );
    let result = simulator.run()?;

    match result.recommendation.display_text() {
        Some(text) => info!("{}", text),
        None => info!("No correction needed"),
    }

    std::fs::create_dir_all(&cli.output)
        .with_context(|| format!("failed to create output directory {:?}", cli.output))?;

    crate::output::save_results(&result, &cli.output)?;
    if cli.report {
        crate::output::generate_report(&result, &cli.output)?;
    }
    info!("Results saved to {:?}", cli.output);

    Ok(())
}
