//! In-memory report store
//!
//! Keeps reports in a map keyed by id plus an ordered `(geohash, id)` index,
//! both behind one `RwLock`. Range scans walk the index and apply the status
//! filter in the same pass.

use crate::error::{Error, Result};
use crate::report::{Report, ReportFilter, ReportUpdate, Status};
use crate::store::{finish_listing, new_report_id, IndexField, ReportStore};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

#[derive(Debug, Default)]
struct Tables {
    reports: BTreeMap<String, Report>,
    /// Ordered by geohash, then id
    by_geohash: BTreeSet<(String, String)>,
}

/// In-process report store
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| Error::Store("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| Error::Store("memory store lock poisoned".to_string()))
    }
}

impl ReportStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn description(&self) -> &'static str {
        "In-process store, lost on restart"
    }

    fn insert(&self, mut report: Report) -> Result<Report> {
        if report.id.is_empty() {
            report.id = new_report_id();
        }
        let mut tables = self.write()?;
        if tables.reports.contains_key(&report.id) {
            return Err(Error::Store(format!("Report {} already exists", report.id)));
        }
        tables
            .by_geohash
            .insert((report.geohash.clone(), report.id.clone()));
        tables.reports.insert(report.id.clone(), report.clone());
        debug!(id = %report.id, geohash = %report.geohash, "inserted report");
        Ok(report)
    }

    fn get(&self, id: &str) -> Result<Option<Report>> {
        Ok(self.read()?.reports.get(id).cloned())
    }

    fn list(&self, filter: &ReportFilter) -> Result<Vec<Report>> {
        let reports: Vec<Report> = self
            .read()?
            .reports
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        Ok(finish_listing(reports, filter))
    }

    fn range_query(
        &self,
        field: IndexField,
        low: &str,
        high: &str,
        statuses: Option<&[Status]>,
    ) -> Result<Vec<Report>> {
        if low >= high {
            return Ok(Vec::new());
        }
        let tables = self.read()?;
        let index = match field {
            IndexField::Geohash => &tables.by_geohash,
        };

        // Ids are never empty, so (high, "") excludes every entry at `high`
        let start = (low.to_string(), String::new());
        let end = (high.to_string(), String::new());
        let hits = index
            .range(start..end)
            .filter_map(|(_, id)| tables.reports.get(id))
            .filter(|r| statuses.map_or(true, |s| s.contains(&r.status)))
            .cloned()
            .collect();
        Ok(hits)
    }

    fn supports_filtered_range(&self) -> bool {
        true
    }

    fn update(&self, id: &str, update: &ReportUpdate) -> Result<Option<Report>> {
        // Updates never move a report, so the geohash index is unchanged
        let mut tables = self.write()?;
        Ok(tables.reports.get_mut(id).map(|report| {
            report.apply(update);
            report.clone()
        }))
    }

    fn delete(&self, id: &str) -> Result<bool> {
        let mut tables = self.write()?;
        match tables.reports.remove(id) {
            Some(report) => {
                tables.by_geohash.remove(&(report.geohash, report.id));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn count(&self) -> Result<usize> {
        Ok(self.read()?.reports.len())
    }
}
