//! infra-beacon CLI entry point
//!
//! Infrastructure issue reporting - CLI + web API

use infra_beacon::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
