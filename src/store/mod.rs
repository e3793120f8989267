//! Report persistence backends
//!
//! This module defines the `ReportStore` trait and its implementations. The
//! geospatial core only needs two things from a store: a lexicographic range
//! scan over the geohash index, and (optionally) equality filtering on status
//! alongside that scan.
//!
//! ## Flex Point
//! Adding a new store requires:
//! 1. Create `src/store/{store_name}.rs` implementing `ReportStore`
//! 2. Add `pub mod {store_name};` below
//! 3. Register it in `open_store` and `available_stores`

pub mod file;
pub mod memory;

use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::report::{Report, ReportFilter, ReportUpdate, Status};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Indexed report fields that support range scans
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexField {
    Geohash,
}

impl IndexField {
    /// The indexed value of `report`
    pub fn value<'a>(&self, report: &'a Report) -> &'a str {
        match self {
            Self::Geohash => &report.geohash,
        }
    }
}

/// Trait for report storage backends
///
/// Implementations must be thread-safe (Send + Sync) to be shared by the
/// async server.
pub trait ReportStore: Send + Sync {
    /// Returns the store name (e.g., "memory", "file")
    fn name(&self) -> &'static str;

    /// Returns a human-readable description of this store
    fn description(&self) -> &'static str;

    /// Persist a new report, assigning its id
    fn insert(&self, report: Report) -> Result<Report>;

    /// Fetch a report by id
    fn get(&self, id: &str) -> Result<Option<Report>>;

    /// List reports matching `filter`, newest first
    fn list(&self, filter: &ReportFilter) -> Result<Vec<Report>>;

    /// All reports whose `field` lies in the half-open range `[low, high)`
    ///
    /// `statuses` is only honoured when `supports_filtered_range` returns
    /// true; otherwise callers must filter the result themselves.
    fn range_query(
        &self,
        field: IndexField,
        low: &str,
        high: &str,
        statuses: Option<&[Status]>,
    ) -> Result<Vec<Report>>;

    /// Whether `range_query` can apply a status filter in the same query
    fn supports_filtered_range(&self) -> bool {
        false
    }

    /// Apply `update` to a stored report, returning the new version
    fn update(&self, id: &str, update: &ReportUpdate) -> Result<Option<Report>>;

    /// Remove a report; false if it did not exist
    fn delete(&self, id: &str) -> Result<bool>;

    /// Number of stored reports
    fn count(&self) -> Result<usize> {
        Ok(self.list(&ReportFilter::default())?.len())
    }
}

/// Information about a store backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreInfo {
    /// Store name (used in config)
    pub name: String,
    /// Human-readable description
    pub description: String,
}

/// Open the store named in `config`
pub fn open_store(config: &StoreConfig) -> Result<Arc<dyn ReportStore>> {
    match config.backend.as_str() {
        "memory" => Ok(Arc::new(memory::MemoryStore::new())),
        "file" => {
            let path = match &config.path {
                Some(path) => path.into(),
                None => file::JsonFileStore::default_path()?,
            };
            Ok(Arc::new(file::JsonFileStore::open(path)?))
        }
        other => Err(Error::Config(format!("Unknown store backend: {}", other))),
    }
}

/// List all available stores with their info
pub fn available_stores() -> Vec<StoreInfo> {
    vec![
        StoreInfo {
            name: "memory".to_string(),
            description: "In-process store, lost on restart".to_string(),
        },
        StoreInfo {
            name: "file".to_string(),
            description: "JSON file in the user data directory".to_string(),
        },
    ]
}

pub(crate) fn new_report_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub(crate) fn in_range(value: &str, low: &str, high: &str) -> bool {
    value >= low && value < high
}

/// Sort newest first and apply the filter's limit
pub(crate) fn finish_listing(mut reports: Vec<Report>, filter: &ReportFilter) -> Vec<Report> {
    reports.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
    if let Some(limit) = filter.limit {
        reports.truncate(limit);
    }
    reports
}
