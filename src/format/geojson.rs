//! GeoJSON output formatter
//!
//! Every item becomes a Point feature. GeoJSON positions are
//! `[longitude, latitude]`.

use crate::config::Config;
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::map::ClusterSummary;
use crate::proximity::ProximityMatch;
use crate::report::Report;
use serde_json::{json, Value};

/// GeoJSON formatter - outputs a FeatureCollection
pub struct GeoJsonFormatter;

fn point(lat: f64, lng: f64, properties: Value) -> Value {
    json!({
        "type": "Feature",
        "geometry": {
            "type": "Point",
            "coordinates": [lng, lat],
        },
        "properties": properties,
    })
}

fn report_properties(report: &Report) -> Value {
    json!({
        "id": report.id,
        "issue_type": report.issue_type,
        "severity": report.severity,
        "status": report.status,
        "geohash": report.geohash,
        "description": report.description,
        "color": report.severity.color(),
    })
}

fn collection(features: Vec<Value>) -> Result<String> {
    let value = json!({
        "type": "FeatureCollection",
        "features": features,
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

impl OutputFormatter for GeoJsonFormatter {
    fn name(&self) -> &str {
        "geojson"
    }

    fn description(&self) -> &str {
        "GeoJSON FeatureCollection"
    }

    fn format_reports(&self, reports: &[Report], _config: &Config) -> Result<String> {
        collection(
            reports
                .iter()
                .map(|r| point(r.latitude, r.longitude, report_properties(r)))
                .collect(),
        )
    }

    fn format_matches(&self, matches: &[ProximityMatch], _config: &Config) -> Result<String> {
        collection(
            matches
                .iter()
                .map(|m| {
                    let mut properties = report_properties(&m.report);
                    properties["distance"] = json!(m.distance);
                    point(m.report.latitude, m.report.longitude, properties)
                })
                .collect(),
        )
    }

    fn format_clusters(
        &self,
        clusters: &[ClusterSummary],
        grid_size: f64,
        _config: &Config,
    ) -> Result<String> {
        collection(
            clusters
                .iter()
                .map(|c| {
                    point(
                        c.lat,
                        c.lng,
                        json!({
                            "count": c.count,
                            "avg_severity": c.avg_severity,
                            "report_ids": c.report_ids,
                            "grid_size": grid_size,
                        }),
                    )
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::tests::{sample_clusters, sample_matches};

    #[test]
    fn test_matches_feature_collection() {
        let output = GeoJsonFormatter
            .format_matches(&sample_matches(), &Config::default())
            .unwrap();
        let parsed: Value = serde_json::from_str(&output).unwrap();

        assert_eq!(parsed["type"], "FeatureCollection");
        let feature = &parsed["features"][0];
        assert_eq!(feature["geometry"]["coordinates"][0], 77.5946);
        assert_eq!(feature["geometry"]["coordinates"][1], 12.9716);
        assert_eq!(feature["properties"]["distance"], 11.12);
        assert_eq!(feature["properties"]["color"], "#dc3545");
    }

    #[test]
    fn test_clusters_feature_collection() {
        let output = GeoJsonFormatter
            .format_clusters(&sample_clusters(), 0.1, &Config::default())
            .unwrap();
        let parsed: Value = serde_json::from_str(&output).unwrap();

        assert_eq!(parsed["features"].as_array().unwrap().len(), 1);
        assert_eq!(parsed["features"][0]["properties"]["count"], 2);
    }

    #[test]
    fn test_empty_collection() {
        let output = GeoJsonFormatter.format_reports(&[], &Config::default()).unwrap();
        let parsed: Value = serde_json::from_str(&output).unwrap();
        assert!(parsed["features"].as_array().unwrap().is_empty());
    }
}
