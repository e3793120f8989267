//! Output formatters
//!
//! Provides trait-based output formatting for reports, nearby matches and
//! clusters printed by the CLI.

pub mod geojson;
pub mod json;
pub mod text;

use crate::config::Config;
use crate::error::Result;
use crate::map::ClusterSummary;
use crate::proximity::ProximityMatch;
use crate::report::Report;
use serde::{Deserialize, Serialize};

/// Information about an output format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatInfo {
    /// Format name
    pub name: String,
    /// Format description
    pub description: String,
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Get the format name
    fn name(&self) -> &str;

    /// Get the format description
    fn description(&self) -> &str;

    /// Format a list of reports
    fn format_reports(&self, reports: &[Report], config: &Config) -> Result<String>;

    /// Format nearby search results, closest first
    fn format_matches(&self, matches: &[ProximityMatch], config: &Config) -> Result<String>;

    /// Format grid clusters
    ///
    /// # Arguments
    /// * `clusters` - Occupied cells
    /// * `grid_size` - Cell size in degrees
    /// * `config` - Application config (for url providers, etc.)
    fn format_clusters(
        &self,
        clusters: &[ClusterSummary],
        grid_size: f64,
        config: &Config,
    ) -> Result<String>;
}

/// Get a formatter by name
pub fn get_formatter(name: &str) -> Option<Box<dyn OutputFormatter>> {
    match name.to_lowercase().as_str() {
        "json" => Some(Box::new(json::JsonFormatter)),
        "text" => Some(Box::new(text::TextFormatter)),
        "geojson" => Some(Box::new(geojson::GeoJsonFormatter)),
        _ => None,
    }
}

/// List all available formatters
pub fn available_formats() -> Vec<FormatInfo> {
    vec![
        FormatInfo {
            name: "json".to_string(),
            description: "Full JSON response".to_string(),
        },
        FormatInfo {
            name: "text".to_string(),
            description: "Human-readable text".to_string(),
        },
        FormatInfo {
            name: "geojson".to_string(),
            description: "GeoJSON FeatureCollection".to_string(),
        },
    ]
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::geo::Coordinates;
    use crate::report::{IssueType, Severity};

    pub(crate) fn sample_report() -> Report {
        let mut report = Report::new(
            Coordinates::new(12.9716, 77.5946),
            IssueType::Pothole,
            Severity::High,
        )
        .unwrap()
        .with_description("Deep pothole near bus stop");
        report.id = "r-1".to_string();
        report
    }

    pub(crate) fn sample_matches() -> Vec<ProximityMatch> {
        vec![ProximityMatch {
            report: sample_report(),
            distance: 11.12,
        }]
    }

    pub(crate) fn sample_clusters() -> Vec<ClusterSummary> {
        vec![ClusterSummary {
            lat: 13.0,
            lng: 77.6,
            count: 2,
            avg_severity: 2.0,
            report_ids: vec!["a".to_string(), "b".to_string()],
        }]
    }

    #[test]
    fn test_get_formatter() {
        assert!(get_formatter("json").is_some());
        assert!(get_formatter("text").is_some());
        assert!(get_formatter("geojson").is_some());
        assert!(get_formatter("gpx").is_none());
    }

    #[test]
    fn test_get_formatter_case_insensitive() {
        assert!(get_formatter("JSON").is_some());
        assert!(get_formatter("GeoJSON").is_some());
    }

    #[test]
    fn test_available_formats() {
        let formats = available_formats();
        assert_eq!(formats.len(), 3);
        for info in &formats {
            assert_eq!(get_formatter(&info.name).unwrap().name(), info.name);
        }
    }
}
