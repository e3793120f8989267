//! Duplicate detection for new submissions
//!
//! A submission is a potential duplicate of the closest open report within
//! the duplicate radius. Nothing is merged; the caller records the link and
//! shows the warning.

use crate::error::Result;
use crate::geo::Coordinates;
use crate::proximity::{find_nearby, NearbyQuery, SearchScope};
use crate::report::{IssueType, Status};
use crate::store::ReportStore;
use serde::{Deserialize, Serialize};

/// Summary of the existing report a submission may duplicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExistingReport {
    pub id: String,
    pub issue_type: IssueType,
    pub status: Status,
    /// Meters from the submission
    pub distance: f64,
}

/// Warning returned alongside a submission near an open report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateWarning {
    pub message: String,
    pub existing_report: ExistingReport,
}

/// Closest new or verified report within `radius_meters` of `coords`
///
/// `precision` and `scope` select the geohash cells scanned, as for
/// [`find_nearby`].
pub fn check_duplicate(
    store: &dyn ReportStore,
    coords: Coordinates,
    radius_meters: f64,
    precision: usize,
    scope: SearchScope,
) -> Result<Option<DuplicateWarning>> {
    let query = NearbyQuery::new(coords, radius_meters)
        .with_statuses(&Status::open())
        .with_precision(precision)
        .with_scope(scope);

    let closest = find_nearby(store, &query)?.into_iter().next();

    Ok(closest.map(|m| DuplicateWarning {
        message: format!("Similar report found {:.1}m away", m.distance),
        existing_report: ExistingReport {
            id: m.report.id,
            issue_type: m.report.issue_type,
            status: m.report.status,
            distance: m.distance,
        },
    }))
}
