//! Grid clustering for map rendering
//!
//! Snaps each report to the nearest centre of a lat/lng grid whose cell size
//! depends on the map zoom, then summarises each occupied cell.

use crate::constants::map::MAX_CLUSTER_REPORT_IDS;
use crate::report::Report;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One occupied grid cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSummary {
    /// Cell centre
    pub lat: f64,
    pub lng: f64,
    /// Reports in the cell
    pub count: usize,
    /// Mean severity weight (high 3, medium 2, low 1)
    pub avg_severity: f64,
    /// First ids in encounter order, at most 10
    pub report_ids: Vec<String>,
}

/// Grid cell size in degrees for a map zoom level
pub fn cell_size_for_zoom(zoom: i32) -> f64 {
    match zoom {
        ..=4 => 5.0,
        5..=7 => 1.0,
        8..=10 => 0.1,
        11..=13 => 0.01,
        _ => 0.001,
    }
}

/// Index of the grid centre nearest to `value`
///
/// Exact halves go to the even index, so 2.5 snaps to 2 and -0.5 to 0.
fn cell_index(value: f64, cell_size: f64) -> i64 {
    (value / cell_size).round_ties_even() as i64
}

struct Accumulator {
    lat: f64,
    lng: f64,
    count: usize,
    severity_sum: u32,
    report_ids: Vec<String>,
}

/// Group reports into grid cells for `zoom`
///
/// Reports with invalid coordinates are skipped. Cells appear in the order
/// their first report was seen.
pub fn cluster(reports: &[Report], zoom: i32) -> Vec<ClusterSummary> {
    let cell_size = cell_size_for_zoom(zoom);

    let mut order: Vec<(i64, i64)> = Vec::new();
    let mut cells: HashMap<(i64, i64), Accumulator> = HashMap::new();

    for report in reports {
        if !report.coordinates().is_valid() {
            continue;
        }

        let key = (
            cell_index(report.latitude, cell_size),
            cell_index(report.longitude, cell_size),
        );

        let cell = cells.entry(key).or_insert_with(|| {
            order.push(key);
            Accumulator {
                lat: key.0 as f64 * cell_size,
                lng: key.1 as f64 * cell_size,
                count: 0,
                severity_sum: 0,
                report_ids: Vec::new(),
            }
        });

        cell.count += 1;
        cell.severity_sum += report.severity.weight();
        if cell.report_ids.len() < MAX_CLUSTER_REPORT_IDS {
            cell.report_ids.push(report.id.clone());
        }
    }

    order
        .into_iter()
        .filter_map(|key| cells.remove(&key))
        .map(|cell| ClusterSummary {
            lat: cell.lat,
            lng: cell.lng,
            count: cell.count,
            avg_severity: cell.severity_sum as f64 / cell.count as f64,
            report_ids: cell.report_ids,
        })
        .collect()
}
