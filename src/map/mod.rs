//! Map rendering data
//!
//! This module handles:
//! - Zoom-dependent grid clustering
//! - Weighted heatmap points
//! - Marker lists
//! - Dashboard counts

pub mod cluster;
pub mod heatmap;
pub mod markers;
pub mod stats;

pub use cluster::{cell_size_for_zoom, cluster, ClusterSummary};
pub use heatmap::{heatmap_points, HeatPoint};
pub use markers::{markers, Marker};
pub use stats::ReportStats;
