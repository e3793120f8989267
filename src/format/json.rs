//! JSON output formatter

use crate::config::Config;
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::map::ClusterSummary;
use crate::proximity::ProximityMatch;
use crate::report::Report;
use serde_json::json;

/// JSON formatter - outputs pretty-printed JSON
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Full JSON response"
    }

    fn format_reports(&self, reports: &[Report], _config: &Config) -> Result<String> {
        Ok(serde_json::to_string_pretty(reports)?)
    }

    fn format_matches(&self, matches: &[ProximityMatch], _config: &Config) -> Result<String> {
        Ok(serde_json::to_string_pretty(matches)?)
    }

    fn format_clusters(
        &self,
        clusters: &[ClusterSummary],
        grid_size: f64,
        _config: &Config,
    ) -> Result<String> {
        let value = json!({
            "clusters": clusters,
            "count": clusters.len(),
            "grid_size": grid_size,
        });
        Ok(serde_json::to_string_pretty(&value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::tests::{sample_clusters, sample_matches};

    #[test]
    fn test_matches_are_flat() {
        let output = JsonFormatter
            .format_matches(&sample_matches(), &Config::default())
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed[0]["id"], "r-1");
        assert_eq!(parsed[0]["distance"], 11.12);
        assert!(parsed[0].get("report").is_none());
    }

    #[test]
    fn test_clusters() {
        let output = JsonFormatter
            .format_clusters(&sample_clusters(), 0.1, &Config::default())
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["count"], 1);
        assert_eq!(parsed["grid_size"], 0.1);
        assert_eq!(parsed["clusters"][0]["avg_severity"], 2.0);
    }
}
