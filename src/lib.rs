//! infra-beacon: geotagged infrastructure issue reports
//!
//! A library and CLI for collecting citizen reports of potholes, garbage,
//! broken streetlights and similar issues, detecting near-duplicate
//! submissions, and summarising reports for map views.
//!
//! ## Features
//!
//! - Geohash indexing with prefix range scans
//! - Haversine proximity search and duplicate detection
//! - Grid clustering, heatmap and marker views
//! - Pluggable report stores and image classifiers
//! - HTTP API + CLI interface
//!
//! ## Quick Start
//!
//! ```rust
//! use infra_beacon::proximity::find_nearby_reports;
//! use infra_beacon::report::{IssueType, Report, Severity};
//! use infra_beacon::store::{memory::MemoryStore, ReportStore};
//! use infra_beacon::Coordinates;
//!
//! let store = MemoryStore::new();
//! let report = Report::new(
//!     Coordinates::new(12.9716, 77.5946),
//!     IssueType::Pothole,
//!     Severity::High,
//! )
//! .unwrap();
//! store.insert(report).unwrap();
//!
//! let nearby = find_nearby_reports(&store, 12.9717, 77.5946, 50.0, None).unwrap();
//! assert_eq!(nearby.len(), 1);
//! println!("{:.1}m away", nearby[0].distance);
//! ```

pub mod classify;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod format;
pub mod geo;
pub mod map;
pub mod proximity;
pub mod report;
pub mod server;
pub mod service;
pub mod store;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use geo::{BoundingBox, Coordinates};
pub use proximity::{ProximityMatch, SearchScope};
pub use report::{IssueType, Report, Severity, Status};
pub use service::ReportService;
