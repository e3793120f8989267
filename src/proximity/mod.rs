//! Proximity search over stored reports
//!
//! Two stages:
//! 1. Narrow candidates with a geohash prefix range scan on the store index
//! 2. Keep candidates whose great-circle distance is within the radius
//!
//! Results are sorted by ascending distance. By default only the cell that
//! contains the centre is scanned, so a match just across a cell edge can be
//! missed; `SearchScope::WithNeighbors` also scans the 8 surrounding cells.

pub mod duplicate;

use crate::constants::geo::SEARCH_PRECISION;
use crate::error::{Error, Result};
use crate::geo::distance::haversine_distance;
use crate::geo::geohash::{encode_coords, neighbors, prefix_range};
use crate::geo::Coordinates;
use crate::report::{Report, Status};
use crate::store::{IndexField, ReportStore};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Which geohash cells a search scans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchScope {
    /// Only the cell containing the centre
    #[default]
    SingleCell,
    /// The centre cell plus its 8 neighbours
    WithNeighbors,
}

impl SearchScope {
    pub fn from_flag(neighbors: bool) -> Self {
        if neighbors {
            Self::WithNeighbors
        } else {
            Self::SingleCell
        }
    }
}

/// A report found near a point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProximityMatch {
    #[serde(flatten)]
    pub report: Report,
    /// Distance from the search centre in meters
    pub distance: f64,
}

/// Parameters of a proximity search
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyQuery {
    pub center: Coordinates,
    pub radius_meters: f64,
    /// Only reports in one of these statuses; `None` for all
    pub statuses: Option<Vec<Status>>,
    /// Geohash prefix length used for the range scan
    pub precision: usize,
    pub scope: SearchScope,
}

impl NearbyQuery {
    pub fn new(center: Coordinates, radius_meters: f64) -> Self {
        Self {
            center,
            radius_meters,
            statuses: None,
            precision: SEARCH_PRECISION,
            scope: SearchScope::default(),
        }
    }

    pub fn with_statuses(mut self, statuses: &[Status]) -> Self {
        self.statuses = Some(statuses.to_vec());
        self
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_scope(mut self, scope: SearchScope) -> Self {
        self.scope = scope;
        self
    }

    /// Validate the query parameters
    pub fn validate(&self) -> Result<()> {
        self.center.validate()?;
        if !self.radius_meters.is_finite() || self.radius_meters < 0.0 {
            return Err(Error::InvalidRadius(format!(
                "Radius {} must be a finite, non-negative number of meters",
                self.radius_meters
            )));
        }
        Ok(())
    }
}

/// Find reports within `query.radius_meters` of `query.center`
///
/// # Errors
/// `InvalidCoordinates`, `InvalidRadius` or `InvalidPrecision` for bad
/// input; `Store` when the backing store fails. An empty area is `Ok(vec![])`.
pub fn find_nearby(store: &dyn ReportStore, query: &NearbyQuery) -> Result<Vec<ProximityMatch>> {
    query.validate()?;

    let cell = encode_coords(query.center, query.precision)?;
    let mut cells = vec![cell.clone()];
    if query.scope == SearchScope::WithNeighbors {
        cells.extend(neighbors(&cell)?);
    }

    let statuses = query.statuses.as_deref();
    let mut seen = HashSet::new();
    let mut matches = Vec::new();

    for prefix in &cells {
        let (low, high) = prefix_range(prefix);
        let candidates = store.range_query(IndexField::Geohash, &low, &high, statuses)?;
        debug!(
            prefix = %prefix,
            candidates = candidates.len(),
            store = store.name(),
            "scanned geohash cell"
        );

        for report in candidates {
            // Stores without filtered range support return every status
            if let Some(allowed) = statuses {
                if !allowed.contains(&report.status) {
                    continue;
                }
            }
            if !seen.insert(report.id.clone()) {
                continue;
            }

            let distance = haversine_distance(query.center, report.coordinates());
            if distance <= query.radius_meters {
                matches.push(ProximityMatch { report, distance });
            }
        }
    }

    // Stable: equal distances keep store order
    matches.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    Ok(matches)
}

/// Convenience wrapper over [`find_nearby`] with the default precision and
/// single-cell scope
pub fn find_nearby_reports(
    store: &dyn ReportStore,
    lat: f64,
    lng: f64,
    radius_meters: f64,
    statuses: Option<&[Status]>,
) -> Result<Vec<ProximityMatch>> {
    let mut query = NearbyQuery::new(Coordinates::new(lat, lng), radius_meters);
    if let Some(statuses) = statuses {
        query = query.with_statuses(statuses);
    }
    find_nearby(store, &query)
}
