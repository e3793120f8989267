//! Report workflows
//!
//! `ReportService` ties the store, the classifier and the geospatial core
//! together. The CLI and the HTTP server both go through it; neither talks to
//! a store directly.

use crate::classify::{
    decode_image_payload, placeholder::PlaceholderClassifier, Classification, Classifier,
};
use crate::config::{Config, MapConfig, ProximityConfig};
use crate::constants::map::STATS_REPORT_LIMIT;
use crate::error::{Error, Result};
use crate::geo::{BoundingBox, Coordinates};
use crate::map::{self, ClusterSummary, HeatPoint, Marker, ReportStats};
use crate::proximity::duplicate::{check_duplicate, DuplicateWarning};
use crate::proximity::{find_nearby, NearbyQuery, ProximityMatch};
use crate::report::{IssueType, Report, ReportFilter, ReportUpdate, Severity, Status};
use crate::store::ReportStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

const DEFAULT_RESOLUTION_NOTES: &str = "Marked as resolved by admin";

/// A citizen submission before it becomes a report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewReport {
    pub latitude: f64,
    pub longitude: f64,
    /// User-confirmed issue type; overrides the classifier's label
    #[serde(default)]
    pub issue_type: Option<IssueType>,
    /// Overrides the classifier's severity
    #[serde(default)]
    pub severity: Option<Severity>,
    #[serde(default)]
    pub description: Option<String>,
    /// Base64 image or data URL to classify
    #[serde(default)]
    pub image: Option<String>,
    /// Where the caller stored the image
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Result of a submission
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub report: Report,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Classification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicate_warning: Option<DuplicateWarning>,
}

/// Update applied to many reports at once; only status and severity
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkUpdate {
    #[serde(default)]
    pub report_ids: Vec<String>,
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default)]
    pub severity: Option<Severity>,
}

/// Outcome of a bulk update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkUpdateResult {
    pub updated_count: usize,
    pub failed_ids: Vec<String>,
}

/// Summary of the running service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub version: String,
    pub store: String,
    pub classifier: String,
    pub reports: usize,
}

/// Report workflows over an injected store and classifier
pub struct ReportService {
    store: Arc<dyn ReportStore>,
    classifier: Arc<dyn Classifier>,
    proximity: ProximityConfig,
    map: MapConfig,
}

impl ReportService {
    pub fn new(
        store: Arc<dyn ReportStore>,
        classifier: Arc<dyn Classifier>,
        proximity: ProximityConfig,
        map: MapConfig,
    ) -> Self {
        Self {
            store,
            classifier,
            proximity,
            map,
        }
    }

    /// Build the store and classifier named in `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let store = crate::store::open_store(&config.store)?;
        let classifier = crate::classify::get_classifier(&config.classifier, config.gemini_key())?;
        Ok(Self::new(
            store,
            classifier,
            config.proximity.clone(),
            config.map.clone(),
        ))
    }

    pub fn store(&self) -> &dyn ReportStore {
        self.store.as_ref()
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn proximity_config(&self) -> &ProximityConfig {
        &self.proximity
    }

    pub fn map_config(&self) -> &MapConfig {
        &self.map
    }

    pub fn status(&self) -> Result<ServiceStatus> {
        Ok(ServiceStatus {
            version: env!("CARGO_PKG_VERSION").to_string(),
            store: self.store.name().to_string(),
            classifier: self.classifier.name().to_string(),
            reports: self.store.count()?,
        })
    }

    /// Classify a base64 image without storing anything
    pub fn analyze(&self, image: &str) -> Result<Classification> {
        let payload = decode_image_payload(image)?;
        self.classifier.classify(&payload.bytes, payload.mime_type)
    }

    /// Run the classifier, falling back to the placeholder on failure
    fn classify_or_placeholder(&self, image: &str) -> Result<Classification> {
        let payload = decode_image_payload(image)?;
        match self.classifier.classify(&payload.bytes, payload.mime_type) {
            Ok(result) => Ok(result),
            Err(e) => {
                warn!(
                    classifier = self.classifier.name(),
                    error = %e,
                    "classification failed, using placeholder"
                );
                PlaceholderClassifier::new().classify(&payload.bytes, payload.mime_type)
            }
        }
    }

    /// Check for duplicates, classify and store a new report
    ///
    /// A nearby open report does not block the submission; it is linked via
    /// `potential_duplicate_of` and returned as a warning.
    pub fn submit(&self, new: NewReport) -> Result<Submission> {
        let coords = Coordinates::checked(new.latitude, new.longitude)?;

        let duplicate_warning = check_duplicate(
            self.store.as_ref(),
            coords,
            self.proximity.duplicate_radius,
            self.proximity.search_precision,
            self.proximity.scope(),
        )?;

        let analysis = match new.image.as_deref() {
            Some(image) if !image.is_empty() => Some(self.classify_or_placeholder(image)?),
            _ => None,
        };

        let issue_type = new
            .issue_type
            .or_else(|| analysis.as_ref().map(|a| a.issue_type_or_other()))
            .unwrap_or_default();
        let severity = new
            .severity
            .or_else(|| analysis.as_ref().map(|a| a.severity))
            .unwrap_or_default();
        let description = new
            .description
            .filter(|d| !d.trim().is_empty())
            .or_else(|| analysis.as_ref().map(|a| a.description.clone()))
            .unwrap_or_default();

        let mut report = Report::new(coords, issue_type, severity)?.with_description(description);
        if let Some(url) = new.image_url {
            report = report.with_image_url(url);
        }
        report.user_confirmed = new.issue_type.is_some();
        report.ai = analysis.clone();
        report.potential_duplicate_of = duplicate_warning
            .as_ref()
            .map(|w| w.existing_report.id.clone());

        let report = self.store.insert(report)?;
        info!(
            id = %report.id,
            issue_type = %report.issue_type,
            severity = %report.severity,
            user_confirmed = report.user_confirmed,
            duplicate = report.potential_duplicate_of.is_some(),
            "created report"
        );

        Ok(Submission {
            report,
            analysis,
            duplicate_warning,
        })
    }

    pub fn get(&self, id: &str) -> Result<Report> {
        self.store
            .get(id)?
            .ok_or_else(|| Error::NotFound(format!("Report {} not found", id)))
    }

    pub fn list(&self, filter: &ReportFilter) -> Result<Vec<Report>> {
        self.store.list(filter)
    }

    /// Reports near a point, closest first
    ///
    /// `radius` defaults to the configured nearby radius.
    pub fn nearby(
        &self,
        lat: f64,
        lng: f64,
        radius: Option<f64>,
        statuses: Option<&[Status]>,
    ) -> Result<Vec<ProximityMatch>> {
        let mut query = NearbyQuery::new(
            Coordinates::new(lat, lng),
            radius.unwrap_or(self.proximity.nearby_radius),
        )
        .with_precision(self.proximity.search_precision)
        .with_scope(self.proximity.scope());
        if let Some(statuses) = statuses {
            query = query.with_statuses(statuses);
        }
        find_nearby(self.store.as_ref(), &query)
    }

    pub fn update(&self, id: &str, update: &ReportUpdate) -> Result<Report> {
        update.validate()?;
        let report = self
            .store
            .update(id, update)?
            .ok_or_else(|| Error::NotFound(format!("Report {} not found", id)))?;
        info!(id = %id, status = %report.status, "updated report");
        Ok(report)
    }

    pub fn resolve(&self, id: &str, notes: Option<String>) -> Result<Report> {
        let update = ReportUpdate {
            status: Some(Status::Resolved),
            resolution_notes: Some(
                notes
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_RESOLUTION_NOTES.to_string()),
            ),
            ..Default::default()
        };
        self.update(id, &update)
    }

    pub fn verify(&self, id: &str) -> Result<Report> {
        self.update(id, &ReportUpdate::status(Status::Verified))
    }

    /// Apply a status/severity change to each listed report
    ///
    /// Missing ids are reported in `failed_ids`; a store failure aborts.
    pub fn bulk_update(&self, bulk: &BulkUpdate) -> Result<BulkUpdateResult> {
        if bulk.report_ids.is_empty() {
            return Err(Error::Validation("No report IDs provided".to_string()));
        }
        let update = ReportUpdate {
            status: bulk.status,
            severity: bulk.severity,
            ..Default::default()
        };
        update.validate()?;

        let mut result = BulkUpdateResult {
            updated_count: 0,
            failed_ids: Vec::new(),
        };
        for id in &bulk.report_ids {
            match self.store.update(id, &update)? {
                Some(_) => result.updated_count += 1,
                None => result.failed_ids.push(id.clone()),
            }
        }

        info!(
            updated = result.updated_count,
            requested = bulk.report_ids.len(),
            "bulk updated reports"
        );
        Ok(result)
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        if self.store.delete(id)? {
            info!(id = %id, "deleted report");
            Ok(())
        } else {
            Err(Error::NotFound(format!("Report {} not found", id)))
        }
    }

    fn map_reports(&self, filter: ReportFilter) -> Result<Vec<Report>> {
        self.store.list(&ReportFilter {
            limit: Some(self.map.report_limit),
            ..filter
        })
    }

    pub fn markers(&self, status: Option<Status>, issue_type: Option<IssueType>) -> Result<Vec<Marker>> {
        let reports = self.map_reports(ReportFilter {
            status,
            issue_type,
            ..Default::default()
        })?;
        Ok(map::markers(&reports))
    }

    pub fn heatmap(&self, bounds: Option<&BoundingBox>) -> Result<Vec<HeatPoint>> {
        let reports = self.map_reports(ReportFilter::default())?;
        Ok(map::heatmap_points(&reports, bounds))
    }

    /// Clusters for `zoom`, or the configured default zoom
    pub fn clusters(&self, zoom: Option<i32>) -> Result<(Vec<ClusterSummary>, f64)> {
        let zoom = zoom.unwrap_or(self.map.default_zoom);
        let reports = self.map_reports(ReportFilter::default())?;
        Ok((map::cluster(&reports, zoom), map::cell_size_for_zoom(zoom)))
    }

    pub fn stats(&self) -> Result<ReportStats> {
        let reports = self.store.list(&ReportFilter::with_limit(STATS_REPORT_LIMIT))?;
        Ok(ReportStats::from_reports(&reports))
    }
}
