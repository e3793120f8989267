//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod clusters;
pub mod config;
pub mod distance;
pub mod geohash;
pub mod nearby;
pub mod reports;
pub mod serve;
pub mod status;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::{available_formats, get_formatter, OutputFormatter};
use clap::{Parser, Subcommand};

/// Infrastructure issue reporting with geospatial dedup
#[derive(Parser)]
#[command(name = "infra-beacon")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start web server (foreground)
    Serve(serve::ServeArgs),

    /// Manage configuration
    Config(config::ConfigArgs),

    /// Show store/classifier status
    Status(status::StatusArgs),

    /// Encode a point as a geohash
    Geohash(geohash::GeohashArgs),

    /// Great-circle distance between two points
    Distance(distance::DistanceArgs),

    /// Find reports near a point
    Nearby(nearby::NearbyArgs),

    /// Group reports into map grid clusters
    Clusters(clusters::ClustersArgs),

    /// View and manage stored reports
    Reports(reports::ReportsArgs),
}

/// Run the CLI
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => serve::run(args).await,
        Commands::Config(args) => config::run(args),
        Commands::Status(args) => status::run(args).await,
        Commands::Geohash(args) => geohash::run(args),
        Commands::Distance(args) => distance::run(args),
        Commands::Nearby(args) => nearby::run(args),
        Commands::Clusters(args) => clusters::run(args),
        Commands::Reports(args) => reports::run(args),
    }
}

/// Look up an output formatter, listing the valid names on failure
pub(crate) fn formatter(name: &str) -> Result<Box<dyn OutputFormatter>> {
    get_formatter(name).ok_or_else(|| {
        let names: Vec<String> = available_formats().into_iter().map(|f| f.name).collect();
        Error::Validation(format!(
            "Unknown format: {} (available: {})",
            name,
            names.join(", ")
        ))
    })
}

/// Load config with optional store overrides from the command line
pub(crate) fn load_config(store: Option<String>, store_path: Option<String>) -> Result<Config> {
    let mut config = Config::load()?;
    if let Some(backend) = store {
        config.store.backend = backend;
    }
    if let Some(path) = store_path {
        config.store.path = Some(path);
    }
    Ok(config)
}
