//! Default configuration values
//!
//! Named constants for all tunable parameters

use crate::constants::geo::SEARCH_PRECISION;
use crate::constants::proximity::{DUPLICATE_RADIUS_METERS, NEARBY_RADIUS_METERS};

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 8080;

/// Default report store
pub const DEFAULT_STORE: &str = "file";

/// Default duplicate check radius in meters
pub const DEFAULT_DUPLICATE_RADIUS: f64 = DUPLICATE_RADIUS_METERS;

/// Default nearby search radius in meters
pub const DEFAULT_NEARBY_RADIUS: f64 = NEARBY_RADIUS_METERS;

/// Default geohash prefix length for candidate searches
pub const DEFAULT_SEARCH_PRECISION: usize = SEARCH_PRECISION;

/// Default image classifier
pub const DEFAULT_CLASSIFIER: &str = "placeholder";

/// Default Gemini model
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Default cap on reports fetched for markers, heatmap and clusters
pub const DEFAULT_REPORT_LIMIT: usize = 500;

/// Default map zoom for clustering
pub const DEFAULT_ZOOM: i32 = 10;

/// Default URL provider
pub const DEFAULT_URL_PROVIDER: &str = "google";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "infra-beacon";
