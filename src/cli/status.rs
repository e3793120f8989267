//! Status command handler
//!
//! Shows the configured store and classifier, and optionally whether a
//! server is answering.

use crate::classify::available_classifiers;
use crate::config::Config;
use crate::error::Result;
use crate::service::ReportService;
use crate::store::available_stores;
use clap::Args;

/// Status command arguments
#[derive(Args)]
pub struct StatusArgs {
    /// Check if server is running (tries to connect)
    #[arg(long)]
    pub server: bool,

    /// List available stores and classifiers
    #[arg(long)]
    pub backends: bool,
}

/// Run the status command
pub async fn run(args: StatusArgs) -> Result<()> {
    let config = Config::load()?;

    if args.server {
        check_server_status(&config).await;
    }

    println!("infra-beacon v{}", env!("CARGO_PKG_VERSION"));
    println!();

    match ReportService::from_config(&config).and_then(|service| service.status()) {
        Ok(status) => {
            println!("Store:      {}", status.store);
            println!("Classifier: {}", status.classifier);
            println!("Reports:    {}", status.reports);
        }
        Err(e) => {
            println!("  Error: {}", e);
        }
    }
    println!(
        "Search:     precision {}, {}",
        config.proximity.search_precision,
        if config.proximity.search_neighbors {
            "with neighbours"
        } else {
            "single cell"
        }
    );

    if args.backends {
        println!();
        println!("Stores:");
        for info in available_stores() {
            println!("  {:<12} {}", info.name, info.description);
        }
        println!("Classifiers:");
        for info in available_classifiers() {
            println!("  {:<12} {}", info.name, info.description);
        }
    }

    Ok(())
}

/// Check if the server is running
async fn check_server_status(config: &Config) {
    let url = format!("http://{}/api/status", config.server_addr());

    match reqwest::get(&url).await {
        Ok(response) => {
            if response.status().is_success() {
                println!("Server: RUNNING on {}", config.server_addr());
                if let Ok(status) = response.json::<serde_json::Value>().await {
                    if let Some(version) = status.get("version").and_then(|v| v.as_str()) {
                        println!("  Version: {}", version);
                    }
                    if let Some(reports) = status.get("reports").and_then(|v| v.as_u64()) {
                        println!("  Reports: {}", reports);
                    }
                }
            } else {
                println!("Server: ERROR (status {})", response.status());
            }
        }
        Err(_) => {
            println!("Server: NOT RUNNING on {}", config.server_addr());
        }
    }
    println!();
}
