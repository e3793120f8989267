//! Centralized constants for the infra-beacon crate
//!
//! This module consolidates constants that are used across multiple modules
//! to avoid duplication and ensure consistency.

/// Geographic constants
pub mod geo {
    /// Mean Earth radius in meters
    pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

    /// Geohash base-32 alphabet (no a, i, l, o)
    pub const GEOHASH_ALPHABET: &[u8; 32] = b"0123456789bcdefghjkmnpqrstuvwxyz";

    /// Precision of the geohash stored on every report (~150m cell)
    pub const INDEX_PRECISION: usize = 7;

    /// Precision of the prefix used for candidate searches (~5km cell)
    pub const SEARCH_PRECISION: usize = 5;

    /// Largest precision the codec accepts
    pub const MAX_PRECISION: usize = 12;

    /// Appended to a geohash prefix to form the exclusive upper bound of a
    /// lexicographic range scan
    pub const RANGE_SENTINEL: char = '\u{ffff}';
}

/// Duplicate detection and nearby search
pub mod proximity {
    /// Radius used when checking a new submission for duplicates
    pub const DUPLICATE_RADIUS_METERS: f64 = 15.0;

    /// Default radius for the public nearby endpoint
    pub const NEARBY_RADIUS_METERS: f64 = 50.0;
}

/// Map rendering
pub mod map {
    /// Maximum member ids carried by a cluster summary
    pub const MAX_CLUSTER_REPORT_IDS: usize = 10;

    /// Heatmap multiplier for reports that are not yet resolved
    pub const UNRESOLVED_HEAT_MULTIPLIER: f64 = 1.5;

    /// Report fetch cap for the stats endpoint
    pub const STATS_REPORT_LIMIT: usize = 1000;
}

/// External API endpoints
pub mod api {
    /// Google Generative Language API base
    pub const GEMINI_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
}
