//! Infrastructure report model
//!
//! A report is one geotagged citizen submission. Its geohash is derived from
//! the coordinate and is recomputed every time the coordinate is set.

use crate::classify::Classification;
use crate::constants::geo::INDEX_PRECISION;
use crate::error::{Error, Result};
use crate::geo::geohash::encode_coords;
use crate::geo::Coordinates;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of infrastructure problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    Pothole,
    BrokenLight,
    Garbage,
    Waterlogging,
    Other,
}

impl IssueType {
    pub fn all() -> [IssueType; 5] {
        [
            Self::Pothole,
            Self::BrokenLight,
            Self::Garbage,
            Self::Waterlogging,
            Self::Other,
        ]
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Pothole => "Road damage with holes or depressions",
            Self::BrokenLight => "Non-functioning street lights or traffic signals",
            Self::Garbage => "Accumulated waste, litter, or illegal dumping",
            Self::Waterlogging => "Standing water, flooding, or drainage issues",
            Self::Other => "Other infrastructure issues",
        }
    }
}

impl Default for IssueType {
    fn default() -> Self {
        Self::Other
    }
}

impl std::fmt::Display for IssueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pothole => write!(f, "pothole"),
            Self::BrokenLight => write!(f, "broken_light"),
            Self::Garbage => write!(f, "garbage"),
            Self::Waterlogging => write!(f, "waterlogging"),
            Self::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for IssueType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pothole" => Ok(Self::Pothole),
            "broken_light" | "broken-light" | "brokenlight" => Ok(Self::BrokenLight),
            "garbage" => Ok(Self::Garbage),
            "waterlogging" => Ok(Self::Waterlogging),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown issue type: {}", s)),
        }
    }
}

/// How urgently a report needs attention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn all() -> [Severity; 3] {
        [Self::High, Self::Medium, Self::Low]
    }

    /// Numeric weight used for cluster averages (high=3, medium=2, low=1)
    pub fn weight(&self) -> u32 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }

    /// Heatmap intensity before the unresolved multiplier
    pub fn heat_weight(&self) -> f64 {
        match self {
            Self::Low => 0.3,
            Self::Medium => 0.6,
            Self::High => 1.0,
        }
    }

    /// Marker colour on the map
    pub fn color(&self) -> &'static str {
        match self {
            Self::Low => "#28a745",
            Self::Medium => "#ffc107",
            Self::High => "#dc3545",
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Self::Medium
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(format!("Unknown severity: {}", s)),
        }
    }
}

/// Review state of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    New,
    Verified,
    Resolved,
}

impl Status {
    pub fn all() -> [Status; 3] {
        [Self::New, Self::Verified, Self::Resolved]
    }

    /// Statuses a duplicate can still be filed against
    pub fn open() -> [Status; 2] {
        [Self::New, Self::Verified]
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::New
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::Verified => write!(f, "verified"),
            Self::Resolved => write!(f, "resolved"),
        }
    }
}

impl std::str::FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "new" => Ok(Self::New),
            "verified" => Ok(Self::Verified),
            "resolved" => Ok(Self::Resolved),
            _ => Err(format!("Unknown status: {}", s)),
        }
    }
}

/// A persisted infrastructure report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Store-assigned identifier (empty until inserted)
    #[serde(default)]
    pub id: String,

    pub latitude: f64,
    pub longitude: f64,

    /// Precision-7 geohash of (latitude, longitude)
    pub geohash: String,

    pub issue_type: IssueType,
    pub severity: Severity,
    #[serde(default)]
    pub status: Status,

    #[serde(default)]
    pub description: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Raw classifier output, kept even when the user overrode the type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai: Option<Classification>,

    /// Whether the submitter confirmed or changed the issue type
    #[serde(default)]
    pub user_confirmed: bool,

    /// Closest open report found within the duplicate radius at submission
    #[serde(skip_serializing_if = "Option::is_none")]
    pub potential_duplicate_of: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution_notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Report {
    /// Create an unsaved report at `coords`
    pub fn new(coords: Coordinates, issue_type: IssueType, severity: Severity) -> Result<Self> {
        let geohash = encode_coords(coords, INDEX_PRECISION)?;
        let now = Utc::now();
        Ok(Self {
            id: String::new(),
            latitude: coords.lat,
            longitude: coords.lng,
            geohash,
            issue_type,
            severity,
            status: Status::New,
            description: String::new(),
            image_url: None,
            ai: None,
            user_confirmed: false,
            potential_duplicate_of: None,
            notes: None,
            resolution_notes: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// Move the report, re-deriving its geohash
    pub fn set_coordinates(&mut self, coords: Coordinates) -> Result<()> {
        self.geohash = encode_coords(coords, INDEX_PRECISION)?;
        self.latitude = coords.lat;
        self.longitude = coords.lng;
        self.touch();
        Ok(())
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Apply an admin update, bumping `updated_at`
    pub fn apply(&mut self, update: &ReportUpdate) {
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(severity) = update.severity {
            self.severity = severity;
        }
        if let Some(issue_type) = update.issue_type {
            self.issue_type = issue_type;
        }
        if let Some(notes) = &update.notes {
            self.notes = Some(notes.clone());
        }
        if let Some(notes) = &update.resolution_notes {
            self.resolution_notes = Some(notes.clone());
        }
        self.touch();
    }
}

/// Fields an admin may change on an existing report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_type: Option<IssueType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution_notes: Option<String>,
}

impl ReportUpdate {
    pub fn status(status: Status) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.severity.is_none()
            && self.issue_type.is_none()
            && self.notes.is_none()
            && self.resolution_notes.is_none()
    }

    /// Reject updates that would change nothing
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(Error::Validation("No valid fields to update".to_string()));
        }
        Ok(())
    }
}

/// Equality filters for listing reports
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    pub status: Option<Status>,
    pub issue_type: Option<IssueType>,
    pub severity: Option<Severity>,
    pub limit: Option<usize>,
}

impl ReportFilter {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Default::default()
        }
    }

    pub fn matches(&self, report: &Report) -> bool {
        self.status.map_or(true, |s| report.status == s)
            && self.issue_type.map_or(true, |t| report.issue_type == t)
            && self.severity.map_or(true, |s| report.severity == s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_new_report_derives_geohash() {
        let report = Report::new(
            Coordinates::new(12.9716, 77.5946),
            IssueType::Pothole,
            Severity::High,
        )
        .unwrap();

        assert_eq!(report.geohash, "tdr1v9q");
        assert_eq!(report.geohash.len(), INDEX_PRECISION);
        assert_eq!(report.status, Status::New);
    }

    #[test]
    fn test_set_coordinates_recomputes_geohash() {
        let mut report = Report::new(
            Coordinates::new(12.9716, 77.5946),
            IssueType::Garbage,
            Severity::Low,
        )
        .unwrap();
        let before = report.updated_at;

        report
            .set_coordinates(Coordinates::new(42.6, -5.6))
            .unwrap();
        assert!(report.geohash.starts_with("ezs42"));
        assert_eq!(report.latitude, 42.6);
        assert!(report.updated_at >= before);
    }

    #[test]
    fn test_set_invalid_coordinates_keeps_report() {
        let mut report = Report::new(
            Coordinates::new(12.9716, 77.5946),
            IssueType::Garbage,
            Severity::Low,
        )
        .unwrap();

        assert!(report.set_coordinates(Coordinates::new(120.0, 0.0)).is_err());
        assert_eq!(report.geohash, "tdr1v9q");
        assert_eq!(report.latitude, 12.9716);
    }

    #[test]
    fn test_new_rejects_invalid_coordinates() {
        let result = Report::new(Coordinates::new(f64::NAN, 0.0), IssueType::Other, Severity::Low);
        assert!(matches!(result, Err(Error::InvalidCoordinates(_))));
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!(IssueType::from_str("broken_light").unwrap(), IssueType::BrokenLight);
        assert_eq!(IssueType::from_str("Pothole").unwrap(), IssueType::Pothole);
        assert!(IssueType::from_str("volcano").is_err());

        assert_eq!(Severity::from_str("HIGH").unwrap(), Severity::High);
        assert_eq!(Status::from_str("resolved").unwrap(), Status::Resolved);
        assert!(Status::from_str("closed").is_err());
    }

    #[test]
    fn test_severity_weights() {
        assert_eq!(Severity::High.weight(), 3);
        assert_eq!(Severity::Medium.weight(), 2);
        assert_eq!(Severity::Low.weight(), 1);
    }

    #[test]
    fn test_apply_update() {
        let mut report = Report::new(
            Coordinates::new(12.9716, 77.5946),
            IssueType::Pothole,
            Severity::Medium,
        )
        .unwrap();

        let update = ReportUpdate {
            status: Some(Status::Verified),
            notes: Some("crew dispatched".to_string()),
            ..Default::default()
        };
        report.apply(&update);

        assert_eq!(report.status, Status::Verified);
        assert_eq!(report.severity, Severity::Medium);
        assert_eq!(report.notes.as_deref(), Some("crew dispatched"));
    }

    #[test]
    fn test_empty_update_rejected() {
        assert!(ReportUpdate::default().validate().is_err());
        assert!(ReportUpdate::status(Status::Resolved).validate().is_ok());
    }

    #[test]
    fn test_serialization_uses_snake_case() {
        let report = Report::new(
            Coordinates::new(12.9716, 77.5946),
            IssueType::BrokenLight,
            Severity::High,
        )
        .unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["issue_type"], "broken_light");
        assert_eq!(json["severity"], "high");
        assert_eq!(json["status"], "new");
        assert!(json.get("ai").is_none());
    }

    #[test]
    fn test_filter_matches() {
        let report = Report::new(
            Coordinates::new(12.9716, 77.5946),
            IssueType::Garbage,
            Severity::Low,
        )
        .unwrap();

        assert!(ReportFilter::default().matches(&report));
        let filter = ReportFilter {
            issue_type: Some(IssueType::Garbage),
            status: Some(Status::New),
            ..Default::default()
        };
        assert!(filter.matches(&report));

        let filter = ReportFilter {
            severity: Some(Severity::High),
            ..Default::default()
        };
        assert!(!filter.matches(&report));
    }
}
