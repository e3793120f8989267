//! Nearby command handler
//!
//! Runs a proximity search against the configured store.

use crate::cli::{formatter, load_config};
use crate::error::Result;
use crate::report::Status;
use crate::service::ReportService;
use clap::Args;

/// Nearby command arguments
#[derive(Args)]
pub struct NearbyArgs {
    /// Latitude in degrees
    #[arg(allow_negative_numbers = true)]
    pub lat: f64,

    /// Longitude in degrees
    #[arg(allow_negative_numbers = true)]
    pub lng: f64,

    /// Search radius in meters (default from config)
    #[arg(long, short = 'r')]
    pub radius: Option<f64>,

    /// Only include these statuses (repeatable; default all)
    #[arg(long, short = 's')]
    pub status: Vec<Status>,

    /// Also search the 8 neighbouring geohash cells
    #[arg(long)]
    pub neighbors: bool,

    /// Output format (json, text, geojson)
    #[arg(long, short = 'f', default_value = "text")]
    pub format: String,

    /// Report store backend override
    #[arg(long)]
    pub store: Option<String>,

    /// Report store path override
    #[arg(long)]
    pub store_path: Option<String>,
}

/// Run the nearby command
pub fn run(args: NearbyArgs) -> Result<()> {
    let formatter = formatter(&args.format)?;
    let mut config = load_config(args.store, args.store_path)?;
    if args.neighbors {
        config.proximity.search_neighbors = true;
    }

    let service = ReportService::from_config(&config)?;
    let statuses = (!args.status.is_empty()).then_some(args.status.as_slice());
    let matches = service.nearby(args.lat, args.lng, args.radius, statuses)?;

    print!("{}", formatter.format_matches(&matches, &config)?);
    Ok(())
}
