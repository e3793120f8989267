//! Dashboard counts

use crate::report::{IssueType, Report, Severity, Status};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Report counts by status, issue type and severity
///
/// Every known key is present, zero when unused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportStats {
    pub total: usize,
    pub by_status: BTreeMap<String, usize>,
    pub by_type: BTreeMap<String, usize>,
    pub by_severity: BTreeMap<String, usize>,
}

impl ReportStats {
    pub fn from_reports(reports: &[Report]) -> Self {
        let mut by_status: BTreeMap<String, usize> =
            Status::all().iter().map(|s| (s.to_string(), 0)).collect();
        let mut by_type: BTreeMap<String, usize> =
            IssueType::all().iter().map(|t| (t.to_string(), 0)).collect();
        let mut by_severity: BTreeMap<String, usize> =
            Severity::all().iter().map(|s| (s.to_string(), 0)).collect();

        for report in reports {
            *by_status.entry(report.status.to_string()).or_default() += 1;
            *by_type.entry(report.issue_type.to_string()).or_default() += 1;
            *by_severity.entry(report.severity.to_string()).or_default() += 1;
        }

        Self {
            total: reports.len(),
            by_status,
            by_type,
            by_severity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinates;

    #[test]
    fn test_counts() {
        let at = Coordinates::new(12.97, 77.59);
        let reports = vec![
            Report::new(at, IssueType::Pothole, Severity::High).unwrap(),
            Report::new(at, IssueType::Pothole, Severity::Low)
                .unwrap()
                .with_status(Status::Resolved),
            Report::new(at, IssueType::Garbage, Severity::High).unwrap(),
        ];
        let stats = ReportStats::from_reports(&reports);

        assert_eq!(stats.total, 3);
        assert_eq!(stats.by_status["new"], 2);
        assert_eq!(stats.by_status["resolved"], 1);
        assert_eq!(stats.by_status["verified"], 0);
        assert_eq!(stats.by_type["pothole"], 2);
        assert_eq!(stats.by_type["waterlogging"], 0);
        assert_eq!(stats.by_severity["high"], 2);
        assert_eq!(stats.by_severity["medium"], 0);
    }

    #[test]
    fn test_empty() {
        let stats = ReportStats::from_reports(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.by_type.len(), 5);
        assert!(stats.by_type.values().all(|&n| n == 0));
    }
}
