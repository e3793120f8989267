//! Map markers

use crate::report::{IssueType, Report, Severity, Status};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single report pin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    pub issue_type: IssueType,
    pub severity: Severity,
    pub status: Status,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Pin colour by severity
    pub color: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Report> for Marker {
    fn from(report: &Report) -> Self {
        Self {
            id: report.id.clone(),
            lat: report.latitude,
            lng: report.longitude,
            issue_type: report.issue_type,
            severity: report.severity,
            status: report.status,
            description: report.description.clone(),
            image_url: report.image_url.clone(),
            color: report.severity.color().to_string(),
            created_at: report.created_at,
        }
    }
}

/// Markers for every report with a valid position
pub fn markers(reports: &[Report]) -> Vec<Marker> {
    reports
        .iter()
        .filter(|r| r.coordinates().is_valid())
        .map(Marker::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinates;

    #[test]
    fn test_marker_colors() {
        let at = Coordinates::new(12.97, 77.59);
        let reports: Vec<Report> = Severity::all()
            .iter()
            .map(|s| Report::new(at, IssueType::BrokenLight, *s).unwrap())
            .collect();

        let colors: Vec<String> = markers(&reports).into_iter().map(|m| m.color).collect();
        assert_eq!(colors, vec!["#dc3545", "#ffc107", "#28a745"]);
    }

    #[test]
    fn test_marker_fields() {
        let report = Report::new(Coordinates::new(12.97, 77.59), IssueType::Garbage, Severity::Low)
            .unwrap()
            .with_description("Dumped sofa")
            .with_image_url("https://img.example/1.jpg");
        let marker = Marker::from(&report);

        assert_eq!(marker.lat, 12.97);
        assert_eq!(marker.description, "Dumped sofa");
        assert_eq!(marker.image_url.as_deref(), Some("https://img.example/1.jpg"));
        assert_eq!(marker.status, Status::New);
    }
}
