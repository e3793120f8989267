//! Serve command handler
//!
//! Starts the HTTP server in foreground mode.

use crate::config::Config;
use crate::error::Result;
use crate::server;
use clap::Args;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Serve command arguments
#[derive(Args)]
pub struct ServeArgs {
    /// Host address to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, short = 'p')]
    pub port: Option<u16>,

    /// Report store backend (memory, file)
    #[arg(long)]
    pub store: Option<String>,

    /// Image classifier backend (placeholder, gemini)
    #[arg(long)]
    pub classifier: Option<String>,

    /// Also search the 8 neighbouring geohash cells
    #[arg(long)]
    pub neighbors: bool,
}

/// Run the serve command
pub async fn run(args: ServeArgs) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = Config::load()?;

    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(store) = args.store {
        config.store.backend = store;
    }
    if let Some(classifier) = args.classifier {
        config.classifier.backend = classifier;
    }
    if args.neighbors {
        config.proximity.search_neighbors = true;
    }
    config.validate()?;

    let addr = config.server_addr();
    info!(
        "Starting infra-beacon server v{} on {}",
        env!("CARGO_PKG_VERSION"),
        addr
    );

    server::run_on(&addr, config).await
}
