//! Error types for infra-beacon

use thiserror::Error;

/// Main error type for infra-beacon operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Invalid geohash precision: {0}")]
    InvalidPrecision(String),

    #[error("Invalid geohash: {0}")]
    InvalidGeohash(String),

    #[error("Invalid radius: {0}")]
    InvalidRadius(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Report store unavailable or query failed. Never used for "no results".
    #[error("Store error: {0}")]
    Store(String),

    #[error("Classifier error: {0}")]
    Classifier(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),
}

impl Error {
    /// Whether this error comes from bad caller input rather than infrastructure
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidCoordinates(_)
                | Self::InvalidPrecision(_)
                | Self::InvalidGeohash(_)
                | Self::InvalidRadius(_)
                | Self::Validation(_)
        )
    }
}

/// Result type alias for infra-beacon operations
pub type Result<T> = std::result::Result<T, Error>;
