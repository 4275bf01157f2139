//! UBS Dashboard - Brazilian basic health units from a CSV export
//!
//! Loads the `;`-separated UBS file, counts units per state and municipality
//! and shows them as interactive charts and a map.

mod charts;
mod config;
mod data;
mod gui;
mod report;
mod stats;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use config::DashboardConfig;
use data::DataLoader;
use eframe::egui;
use gui::UbsDashboardApp;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON config file (defaults to ./ubs_dashboard.json when present)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// UBS CSV export, overrides the config file
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive dashboard (default)
    Dashboard,
    /// Print the frequency tables and optionally export charts
    Report {
        /// Minimum units per municipality
        #[arg(long)]
        min_count: Option<u32>,
        /// State shown on the map (defaults to the first one in the file)
        #[arg(long)]
        state: Option<String>,
        /// Directory for PNG charts
        #[arg(long, value_name = "DIR")]
        charts_dir: Option<PathBuf>,
        /// Write the tables as JSON
        #[arg(long, value_name = "FILE")]
        json: Option<PathBuf>,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = DashboardConfig::load(cli.config.as_deref())?;
    if let Some(csv) = cli.csv {
        config.csv_path = csv;
    }

    // A missing or malformed input file aborts the run
    let loader = DataLoader::from_config(&config)?;
    let dataset = loader
        .load_dataset(&config.csv_path)
        .with_context(|| format!("Failed to load {:?}", config.csv_path))?;
    if dataset.is_empty() {
        warn!(path = %config.csv_path.display(), "CSV has a header but no rows");
    }

    match cli.command.unwrap_or(Commands::Dashboard) {
        Commands::Dashboard => run_dashboard(config, loader, dataset),
        Commands::Report {
            min_count,
            state,
            charts_dir,
            json,
        } => {
            let options = report::ReportOptions {
                min_count,
                state,
                charts_dir,
                json,
            };
            report::run(&dataset, &config, &options)
        }
    }
}

fn run_dashboard(config: DashboardConfig, loader: DataLoader, dataset: data::Dataset) -> Result<()> {
    info!(rows = dataset.len(), "Opening dashboard");

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1100.0, 700.0])
            .with_title("UBS Dashboard"),
        ..Default::default()
    };

    eframe::run_native(
        "UBS Dashboard",
        options,
        Box::new(move |cc| Ok(Box::new(UbsDashboardApp::new(cc, &config, loader, dataset)))),
    )
    .map_err(|e| anyhow!("Dashboard failed: {}", e))
}
