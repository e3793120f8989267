//! Clusters command handler

use crate::cli::{formatter, load_config};
use crate::error::Result;
use crate::service::ReportService;
use clap::Args;

/// Clusters command arguments
#[derive(Args)]
pub struct ClustersArgs {
    /// Map zoom level (default from config)
    #[arg(long, short = 'z', allow_negative_numbers = true)]
    pub zoom: Option<i32>,

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

/// Run the clusters command
pub fn run(args: ClustersArgs) -> Result<()> {
    let formatter = formatter(&args.format)?;
    let config = load_config(args.store, args.store_path)?;
    let service = ReportService::from_config(&config)?;

    let (clusters, grid_size) = service.clusters(args.zoom)?;
    print!("{}", formatter.format_clusters(&clusters, grid_size, &config)?);
    Ok(())
}
