//! JSON file report store
//!
//! Stores reports as a JSON array in the XDG data directory
//! (~/.local/share/infra-beacon/reports.json). Every mutation rewrites the
//! file. Range scans cannot be combined with a status filter, so the
//! proximity query filters statuses itself.

use crate::error::{Error, Result};
use crate::report::{Report, ReportFilter, ReportUpdate, Status};
use crate::store::{finish_listing, in_range, new_report_id, IndexField, ReportStore};
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

const APP_DIR_NAME: &str = "infra-beacon";
const REPORTS_FILE_NAME: &str = "reports.json";

/// File-backed report store
#[derive(Debug)]
pub struct JsonFileStore {
    reports: Mutex<Vec<Report>>,
    path: PathBuf,
}

impl JsonFileStore {
    /// Get the data directory path
    pub fn data_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine data directory".to_string()))
    }

    /// Get the default reports file path
    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join(REPORTS_FILE_NAME))
    }

    /// Open the store at `path`, loading existing reports if the file exists
    pub fn open(path: PathBuf) -> Result<Self> {
        let reports: Vec<Report> = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| {
                Error::Store(format!("Failed to read reports file: {}", e))
            })?;

            serde_json::from_str(&content).map_err(|e| {
                Error::Store(format!("Failed to parse reports file: {}", e))
            })?
        } else {
            Vec::new()
        };

        info!(path = %path.display(), count = reports.len(), "opened report file");

        Ok(Self {
            reports: Mutex::new(reports),
            path,
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Report>>> {
        self.reports
            .lock()
            .map_err(|_| Error::Store("file store lock poisoned".to_string()))
    }

    /// Write all reports to disk
    fn save(&self, reports: &[Report]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Store(format!("Failed to create data directory: {}", e))
            })?;
        }

        let content = serde_json::to_string_pretty(reports).map_err(|e| {
            Error::Store(format!("Failed to serialize reports: {}", e))
        })?;

        fs::write(&self.path, content).map_err(|e| {
            Error::Store(format!("Failed to write reports file: {}", e))
        })?;

        Ok(())
    }
}

impl ReportStore for JsonFileStore {
    fn name(&self) -> &'static str {
        "file"
    }

    fn description(&self) -> &'static str {
        "JSON file in the user data directory"
    }

    fn insert(&self, mut report: Report) -> Result<Report> {
        if report.id.is_empty() {
            report.id = new_report_id();
        }

        let mut reports = self.lock()?;
        if reports.iter().any(|r| r.id == report.id) {
            return Err(Error::Store(format!("Report {} already exists", report.id)));
        }
        reports.push(report.clone());

        if let Err(e) = self.save(&reports) {
            reports.pop();
            return Err(e);
        }

        debug!(id = %report.id, geohash = %report.geohash, "inserted report");
        Ok(report)
    }

    fn get(&self, id: &str) -> Result<Option<Report>> {
        Ok(self.lock()?.iter().find(|r| r.id == id).cloned())
    }

    fn list(&self, filter: &ReportFilter) -> Result<Vec<Report>> {
        let reports: Vec<Report> = self
            .lock()?
            .iter()
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
        _statuses: Option<&[Status]>,
    ) -> Result<Vec<Report>> {
        Ok(self
            .lock()?
            .iter()
            .filter(|r| in_range(field.value(r), low, high))
            .cloned()
            .collect())
    }

    fn update(&self, id: &str, update: &ReportUpdate) -> Result<Option<Report>> {
        let mut reports = self.lock()?;
        let Some(idx) = reports.iter().position(|r| r.id == id) else {
            return Ok(None);
        };

        let previous = reports[idx].clone();
        reports[idx].apply(update);
        let updated = reports[idx].clone();

        if let Err(e) = self.save(&reports) {
            reports[idx] = previous;
            return Err(e);
        }
        Ok(Some(updated))
    }

    fn delete(&self, id: &str) -> Result<bool> {
        let mut reports = self.lock()?;
        let Some(idx) = reports.iter().position(|r| r.id == id) else {
            return Ok(false);
        };

        let removed = reports.remove(idx);
        if let Err(e) = self.save(&reports) {
            reports.insert(idx, removed);
            return Err(e);
        }
        Ok(true)
    }

    fn count(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::geohash::prefix_range;
    use crate::geo::Coordinates;
    use crate::report::{IssueType, Severity};
    use tempfile::TempDir;

    fn report_at(lat: f64, lng: f64, status: Status) -> Report {
        Report::new(Coordinates::new(lat, lng), IssueType::Garbage, Severity::High)
            .unwrap()
            .with_status(status)
    }

    fn create_test_store() -> (JsonFileStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test_reports.json");
        let store = JsonFileStore::open(path).unwrap();
        (store, temp_dir)
    }

    #[test]
    fn test_empty_store() {
        let (store, _temp) = create_test_store();
        assert_eq!(store.count().unwrap(), 0);
        assert!(store.list(&ReportFilter::default()).unwrap().is_empty());
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("reports.json");

        let id = {
            let store = JsonFileStore::open(path.clone()).unwrap();
            store
                .insert(report_at(12.9716, 77.5946, Status::New))
                .unwrap()
                .id
        };

        let store = JsonFileStore::open(path).unwrap();
        let report = store.get(&id).unwrap().unwrap();
        assert_eq!(report.geohash, "tdr1v9q");
        assert_eq!(report.issue_type, IssueType::Garbage);
    }

    #[test]
    fn test_range_query_ignores_status_filter() {
        let (store, _temp) = create_test_store();
        store.insert(report_at(12.9716, 77.5946, Status::New)).unwrap();
        store.insert(report_at(12.9740, 77.5990, Status::Resolved)).unwrap();

        let (low, high) = prefix_range("tdr1v");
        let hits = store
            .range_query(IndexField::Geohash, &low, &high, Some(&[Status::New][..]))
            .unwrap();

        // Filtering is the caller's job for this store
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_update_persists() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("reports.json");

        let store = JsonFileStore::open(path.clone()).unwrap();
        let saved = store.insert(report_at(12.9716, 77.5946, Status::New)).unwrap();
        store
            .update(&saved.id, &ReportUpdate::status(Status::Verified))
            .unwrap();

        let reloaded = JsonFileStore::open(path).unwrap();
        assert_eq!(
            reloaded.get(&saved.id).unwrap().unwrap().status,
            Status::Verified
        );
    }

    #[test]
    fn test_delete() {
        let (store, _temp) = create_test_store();
        let saved = store.insert(report_at(12.9716, 77.5946, Status::New)).unwrap();

        assert!(store.delete(&saved.id).unwrap());
        assert!(!store.delete(&saved.id).unwrap());
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_corrupt_file_is_store_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("reports.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(JsonFileStore::open(path), Err(Error::Store(_))));
    }
}
