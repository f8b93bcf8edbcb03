//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod clusters;
pub mod config;
pub mod nearby;
pub mod serve;

use crate::cluster::ClusterStrategy;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::get_formatter;
use crate::report::OverlapReport;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Nearby GNSS station overlap detection and clustering
#[derive(Parser)]
#[command(name = "gnss-nearby")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch stations near a station and report overlapping markers
    Nearby(nearby::NearbyArgs),

    /// Report overlapping markers for a saved station list
    Clusters(clusters::ClustersArgs),

    /// Start web server (foreground)
    Serve(serve::ServeArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

/// Overlap settings shared by the report commands
#[derive(Args, Debug, Clone, Default)]
pub struct OverlapArgs {
    /// Fixed overlap distance in meters (negative to use the map scale)
    #[arg(long = "override", allow_negative_numbers = true)]
    pub override_distance: Option<f64>,

    /// Clustering strategy: seed or transitive
    #[arg(long, short = 's')]
    pub strategy: Option<String>,

    /// Zoom level the threshold is evaluated at
    #[arg(long, short = 'z')]
    pub zoom: Option<u8>,

    /// Output format (json, text, geojson)
    #[arg(long, short = 'f')]
    pub format: Option<String>,

    /// Write output to file
    #[arg(long, short = 'o')]
    pub output: Option<String>,
}

impl OverlapArgs {
    /// Command-line override, falling back to config; negative means none
    pub fn override_distance(&self, config: &Config) -> Option<f64> {
        match self.override_distance {
            Some(distance) => Some(distance).filter(|d| *d >= 0.0),
            None => config.overlap.override_distance(),
        }
    }

    pub fn strategy(&self, config: &Config) -> Result<ClusterStrategy> {
        match &self.strategy {
            Some(s) => s.parse().map_err(Error::Config),
            None => config.overlap.strategy(),
        }
    }

    pub fn zoom(&self, config: &Config) -> u8 {
        self.zoom.unwrap_or(config.overlap.reference_zoom)
    }

    /// Format the report and print it or write it to `--output`
    pub fn emit(&self, report: &OverlapReport, config: &Config) -> Result<()> {
        let format = self.format.clone().unwrap_or(config.output.format.clone());
        let formatter = get_formatter(&format)
            .ok_or_else(|| Error::Config(format!("Unknown format: {}", format)))?;
        let output = formatter.format(report)?;

        if let Some(path) = &self.output {
            std::fs::write(path, &output)?;
            eprintln!("Output written to {}", path);
        } else {
            println!("{}", output);
        }
        Ok(())
    }
}

/// Initialize logging to stderr, honouring RUST_LOG
fn init_logging(default_level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .try_init();
}

/// Run the CLI
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Nearby(args) => {
            init_logging("warn");
            nearby::run(args).await
        }
        Commands::Clusters(args) => {
            init_logging("warn");
            clusters::run(args)
        }
        Commands::Serve(args) => {
            init_logging("info");
            serve::run(args).await
        }
        Commands::Config(args) => config::run(args),
    }
}
