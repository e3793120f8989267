//! Weighted heatmap points

use crate::constants::map::UNRESOLVED_HEAT_MULTIPLIER;
use crate::geo::BoundingBox;
use crate::report::{Report, Status};
use serde::{Deserialize, Serialize};

/// A weighted point for a heatmap layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatPoint {
    pub lat: f64,
    pub lng: f64,
    pub weight: f64,
}

/// Heat weight of one report: severity weight, boosted while unresolved
pub fn heat_weight(report: &Report) -> f64 {
    let weight = report.severity.heat_weight();
    if report.status == Status::Resolved {
        weight
    } else {
        weight * UNRESOLVED_HEAT_MULTIPLIER
    }
}

/// Heat points for `reports`, optionally restricted to `bounds`
pub fn heatmap_points(reports: &[Report], bounds: Option<&BoundingBox>) -> Vec<HeatPoint> {
    reports
        .iter()
        .filter(|r| r.coordinates().is_valid())
        .filter(|r| bounds.map_or(true, |b| b.contains(r.coordinates())))
        .map(|r| HeatPoint {
            lat: r.latitude,
            lng: r.longitude,
            weight: heat_weight(r),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinates;
    use crate::report::{IssueType, Severity};
    use approx::assert_relative_eq;

    fn report(lat: f64, lng: f64, severity: Severity, status: Status) -> Report {
        Report::new(Coordinates::new(lat, lng), IssueType::Garbage, severity)
            .unwrap()
            .with_status(status)
    }

    #[test]
    fn test_weights() {
        assert_relative_eq!(
            heat_weight(&report(0.0, 0.0, Severity::High, Status::New)),
            1.5
        );
        assert_relative_eq!(
            heat_weight(&report(0.0, 0.0, Severity::Medium, Status::Verified)),
            0.9,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            heat_weight(&report(0.0, 0.0, Severity::Low, Status::Resolved)),
            0.3
        );
    }

    #[test]
    fn test_bounds_filter() {
        let reports = vec![
            report(12.97, 77.59, Severity::High, Status::New),
            report(28.61, 77.21, Severity::High, Status::New),
        ];
        let bounds = BoundingBox::new(13.5, 12.5, 78.0, 77.0);

        assert_eq!(heatmap_points(&reports, None).len(), 2);
        let points = heatmap_points(&reports, Some(&bounds));
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].lat, 12.97);
    }
}
