//! Server shared state
//!
//! Holds configuration and the report service shared by all handlers.

use crate::config::Config;
use crate::error::Result;
use crate::service::ReportService;
use std::sync::Arc;

/// Shared state for the HTTP server
pub struct AppState {
    /// Configuration the server was started with
    pub config: Config,

    /// Report workflows over the configured store and classifier
    pub service: Arc<ReportService>,
}

impl AppState {
    /// Create application state, opening the configured store and classifier
    pub fn new(config: Config) -> Result<Self> {
        let service = ReportService::from_config(&config)?;
        Ok(Self::with_service(config, service))
    }

    /// Create application state around an existing service
    pub fn with_service(config: Config, service: ReportService) -> Self {
        Self {
            config,
            service: Arc::new(service),
        }
    }
}
