//! HTTP API routes
//!
//! Defines all REST API endpoints for the server. Handlers are thin: they
//! parse input, call `ReportService` and map errors to `ApiError`.

use crate::classify::Classification;
use crate::error::Error;
use crate::geo::distance::calculate_distance;
use crate::geo::geohash::encode;
use crate::geo::BoundingBox;
use crate::map::{ClusterSummary, HeatPoint, Marker, ReportStats};
use crate::proximity::ProximityMatch;
use crate::report::{Report, ReportFilter, ReportUpdate};
use crate::server::state::AppState;
use crate::service::{BulkUpdate, BulkUpdateResult, NewReport, ServiceStatus, Submission};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

const DEFAULT_LIST_LIMIT: usize = 100;

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/api/status", get(status_handler))
        .route("/api/geohash", get(geohash_handler))
        .route("/api/distance", get(distance_handler))
        .route("/api/analyze", post(analyze_handler))
        .route("/api/reports", get(list_handler).post(submit_handler))
        .route("/api/reports/nearby", get(nearby_handler))
        .route("/api/reports/:id", get(report_handler))
        .route("/map/api/markers", get(markers_handler))
        .route("/map/api/heatmap", get(heatmap_handler))
        .route("/map/api/stats", get(stats_handler))
        .route("/map/api/clusters", get(clusters_handler))
        .route(
            "/admin/api/reports/:id",
            patch(update_handler).delete(delete_handler),
        )
        .route("/admin/api/reports/:id/resolve", post(resolve_handler))
        .route("/admin/api/reports/:id/verify", post(verify_handler))
        .route("/admin/api/bulk/update", post(bulk_update_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.code.as_str() {
            "INVALID_COORDINATES" | "INVALID_PRECISION" | "INVALID_GEOHASH"
            | "INVALID_RADIUS" | "VALIDATION_ERROR" => StatusCode::BAD_REQUEST,
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "CLASSIFIER_ERROR" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::InvalidCoordinates(_) => "INVALID_COORDINATES",
            Error::InvalidPrecision(_) => "INVALID_PRECISION",
            Error::InvalidGeohash(_) => "INVALID_GEOHASH",
            Error::InvalidRadius(_) => "INVALID_RADIUS",
            Error::Validation(_) => "VALIDATION_ERROR",
            Error::NotFound(_) => "NOT_FOUND",
            Error::Classifier(_) => "CLASSIFIER_ERROR",
            Error::Store(_) => "STORE_ERROR",
            Error::Config(_) => "CONFIG_ERROR",
            _ => "INTERNAL_ERROR",
        };
        let api_error = ApiError {
            error: err.to_string(),
            code: code.to_string(),
        };
        if api_error.status().is_server_error() {
            tracing::error!(code, error = %err, "request failed");
        }
        api_error
    }
}

type ApiResult<T> = Result<T, ApiError>;

/// Parse an optional enum query parameter; empty counts as absent
fn parse_param<T: FromStr<Err = String>>(value: Option<&str>) -> ApiResult<Option<T>> {
    value
        .filter(|v| !v.is_empty())
        .map(|v| v.parse::<T>().map_err(|e| ApiError::from(Error::Validation(e))))
        .transpose()
}

/// Run service work that may block (file IO, model calls) off the runtime
async fn blocking<T, F>(work: F) -> ApiResult<T>
where
    F: FnOnce() -> crate::error::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError::from(Error::Server(format!("Worker task failed: {}", e))))?
        .map_err(ApiError::from)
}

/// Liveness response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// GET /healthz
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// GET /api/status
async fn status_handler(State(state): State<Arc<AppState>>) -> ApiResult<Json<ServiceStatus>> {
    Ok(Json(state.service.status()?))
}

#[derive(Debug, Deserialize)]
pub struct GeohashQuery {
    pub lat: f64,
    pub lng: f64,
    #[serde(default = "default_precision")]
    pub precision: usize,
}

fn default_precision() -> usize {
    crate::constants::geo::INDEX_PRECISION
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GeohashResponse {
    pub geohash: String,
    pub lat: f64,
    pub lng: f64,
    pub precision: usize,
}

/// GET /api/geohash
async fn geohash_handler(Query(q): Query<GeohashQuery>) -> ApiResult<Json<GeohashResponse>> {
    let geohash = encode(q.lat, q.lng, q.precision)?;
    Ok(Json(GeohashResponse {
        geohash,
        lat: q.lat,
        lng: q.lng,
        precision: q.precision,
    }))
}

#[derive(Debug, Deserialize)]
pub struct DistanceQuery {
    pub lat1: f64,
    pub lng1: f64,
    pub lat2: f64,
    pub lng2: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DistanceResponse {
    /// Meters
    pub distance: f64,
}

/// GET /api/distance
async fn distance_handler(Query(q): Query<DistanceQuery>) -> ApiResult<Json<DistanceResponse>> {
    let distance = calculate_distance(q.lat1, q.lng1, q.lat2, q.lng2)?;
    Ok(Json(DistanceResponse { distance }))
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// Base64 image or data URL
    pub image: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub analysis: Classification,
}

/// Classify an image without creating a report
///
/// POST /api/analyze
async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> ApiResult<Json<AnalyzeResponse>> {
    if req.image.is_empty() {
        return Err(Error::Validation("Image is required".to_string()).into());
    }
    let service = state.service.clone();
    let analysis = blocking(move || service.analyze(&req.image)).await?;
    Ok(Json(AnalyzeResponse { analysis }))
}

/// Submit a new report
///
/// POST /api/reports
async fn submit_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewReport>,
) -> ApiResult<(StatusCode, Json<Submission>)> {
    let service = state.service.clone();
    let submission = blocking(move || service.submit(req)).await?;
    Ok((StatusCode::CREATED, Json(submission)))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub issue_type: Option<String>,
    pub severity: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReportsResponse {
    pub reports: Vec<Report>,
    pub count: usize,
}

/// List reports, newest first
///
/// GET /api/reports
async fn list_handler(
    State(state): State<Arc<AppState>>,
    Query(q): Query<ListQuery>,
) -> ApiResult<Json<ReportsResponse>> {
    let filter = ReportFilter {
        status: parse_param(q.status.as_deref())?,
        issue_type: parse_param(q.issue_type.as_deref())?,
        severity: parse_param(q.severity.as_deref())?,
        limit: Some(q.limit.unwrap_or(DEFAULT_LIST_LIMIT)),
    };
    let reports = state.service.list(&filter)?;
    Ok(Json(ReportsResponse {
        count: reports.len(),
        reports,
    }))
}

#[derive(Debug, Deserialize)]
pub struct NearbyParams {
    pub lat: f64,
    pub lng: f64,
    pub radius: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct NearbyResponse {
    pub reports: Vec<ProximityMatch>,
    pub count: usize,
    pub radius: f64,
}

/// Reports near a point, closest first
///
/// GET /api/reports/nearby
async fn nearby_handler(
    State(state): State<Arc<AppState>>,
    Query(q): Query<NearbyParams>,
) -> ApiResult<Json<NearbyResponse>> {
    let radius = q
        .radius
        .unwrap_or(state.service.proximity_config().nearby_radius);
    let reports = state.service.nearby(q.lat, q.lng, Some(radius), None)?;
    Ok(Json(NearbyResponse {
        count: reports.len(),
        reports,
        radius,
    }))
}

/// GET /api/reports/:id
async fn report_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Report>> {
    Ok(Json(state.service.get(&id)?))
}

#[derive(Debug, Deserialize)]
pub struct MarkersQuery {
    pub status: Option<String>,
    pub issue_type: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MarkersResponse {
    pub markers: Vec<Marker>,
    pub count: usize,
}

/// GET /map/api/markers
async fn markers_handler(
    State(state): State<Arc<AppState>>,
    Query(q): Query<MarkersQuery>,
) -> ApiResult<Json<MarkersResponse>> {
    let markers = state.service.markers(
        parse_param(q.status.as_deref())?,
        parse_param(q.issue_type.as_deref())?,
    )?;
    Ok(Json(MarkersResponse {
        count: markers.len(),
        markers,
    }))
}

#[derive(Debug, Deserialize)]
pub struct HeatmapQuery {
    /// `north,south,east,west`; ignored when malformed
    pub bounds: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HeatmapResponse {
    pub data: Vec<HeatPoint>,
    pub count: usize,
}

/// GET /map/api/heatmap
async fn heatmap_handler(
    State(state): State<Arc<AppState>>,
    Query(q): Query<HeatmapQuery>,
) -> ApiResult<Json<HeatmapResponse>> {
    let bounds = q.bounds.as_deref().and_then(BoundingBox::parse);
    let data = state.service.heatmap(bounds.as_ref())?;
    Ok(Json(HeatmapResponse {
        count: data.len(),
        data,
    }))
}

/// GET /map/api/stats
async fn stats_handler(State(state): State<Arc<AppState>>) -> ApiResult<Json<ReportStats>> {
    Ok(Json(state.service.stats()?))
}

#[derive(Debug, Deserialize)]
pub struct ClustersQuery {
    pub zoom: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClustersResponse {
    pub clusters: Vec<ClusterSummary>,
    pub count: usize,
    pub zoom: i32,
    /// Cell size in degrees
    pub grid_size: f64,
}

/// GET /map/api/clusters
async fn clusters_handler(
    State(state): State<Arc<AppState>>,
    Query(q): Query<ClustersQuery>,
) -> ApiResult<Json<ClustersResponse>> {
    let zoom = q.zoom.unwrap_or(state.service.map_config().default_zoom);
    let (clusters, grid_size) = state.service.clusters(Some(zoom))?;
    Ok(Json(ClustersResponse {
        count: clusters.len(),
        clusters,
        zoom,
        grid_size,
    }))
}

/// Update status, severity, issue type or notes
///
/// PATCH /admin/api/reports/:id
async fn update_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(update): Json<ReportUpdate>,
) -> ApiResult<Json<Report>> {
    let service = state.service.clone();
    Ok(Json(blocking(move || service.update(&id, &update)).await?))
}

/// DELETE /admin/api/reports/:id
async fn delete_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let service = state.service.clone();
    blocking(move || service.delete(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Default, Deserialize)]
pub struct ResolveRequest {
    pub notes: Option<String>,
}

/// POST /admin/api/reports/:id/resolve
async fn resolve_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Option<Json<ResolveRequest>>,
) -> ApiResult<Json<Report>> {
    let notes = body.and_then(|Json(req)| req.notes);
    let service = state.service.clone();
    Ok(Json(blocking(move || service.resolve(&id, notes)).await?))
}

/// POST /admin/api/reports/:id/verify
async fn verify_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Report>> {
    let service = state.service.clone();
    Ok(Json(blocking(move || service.verify(&id)).await?))
}

/// POST /admin/api/bulk/update
async fn bulk_update_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BulkUpdate>,
) -> ApiResult<Json<BulkUpdateResult>> {
    let service = state.service.clone();
    Ok(Json(blocking(move || service.bulk_update(&req)).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Classifier;
    use crate::config::{Config, MapConfig, ProximityConfig};
    use crate::service::tests::{FailingClassifier, FixedClassifier};
    use crate::service::ReportService;
    use crate::store::memory::MemoryStore;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn create_test_state_with(classifier: Arc<dyn Classifier>) -> Arc<AppState> {
        let service = ReportService::new(
            Arc::new(MemoryStore::new()),
            classifier,
            ProximityConfig::default(),
            MapConfig::default(),
        );
        Arc::new(AppState::with_service(Config::default(), service))
    }

    fn create_test_state() -> Arc<AppState> {
        create_test_state_with(Arc::new(FixedClassifier))
    }

    async fn send(state: &Arc<AppState>, request: Request<Body>) -> (StatusCode, Value) {
        let response = create_router(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, value)
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn json_req(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn submit(state: &Arc<AppState>, lat: f64, lng: f64) -> Value {
        let (status, body) = send(
            state,
            json_req(
                "POST",
                "/api/reports",
                json!({"latitude": lat, "longitude": lng, "image": "aGVsbG8="}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body
    }

    #[tokio::test]
    async fn test_health_and_status() {
        let state = create_test_state();

        let (status, body) = send(&state, get_req("/healthz")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        let (status, body) = send(&state, get_req("/api/status")).await;
        assert_eq!(status, StatusCode::OK);
        let info: ServiceStatus = serde_json::from_value(body).unwrap();
        assert_eq!(info.store, "memory");
        assert_eq!(info.classifier, "fixed");
        assert_eq!(info.reports, 0);
    }

    #[tokio::test]
    async fn test_geohash_endpoint() {
        let state = create_test_state();

        let (status, body) = send(&state, get_req("/api/geohash?lat=12.9716&lng=77.5946")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["geohash"], "tdr1v9q");

        let (status, body) = send(
            &state,
            get_req("/api/geohash?lat=12.9716&lng=77.5946&precision=13"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let err: ApiError = serde_json::from_value(body).unwrap();
        assert_eq!(err.code, "INVALID_PRECISION");
    }

    #[tokio::test]
    async fn test_distance_endpoint() {
        let state = create_test_state();

        let (status, body) = send(
            &state,
            get_req("/api/distance?lat1=0&lng1=0&lat2=0&lng2=1"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let distance = body["distance"].as_f64().unwrap();
        assert!((distance - 111_195.0).abs() < 1_112.0);

        let (status, body) = send(
            &state,
            get_req("/api/distance?lat1=100&lng1=0&lat2=0&lng2=1"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_COORDINATES");
    }

    #[tokio::test]
    async fn test_submit_and_fetch() {
        let state = create_test_state();
        let body = submit(&state, 12.9716, 77.5946).await;

        assert_eq!(body["report"]["issue_type"], "garbage");
        assert_eq!(body["report"]["geohash"], "tdr1v9q");
        assert!(body.get("duplicate_warning").is_none());

        let id = body["report"]["id"].as_str().unwrap().to_string();
        let (status, fetched) = send(&state, get_req(&format!("/api/reports/{}", id))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["id"], id.as_str());

        let (status, body) = send(&state, get_req("/api/reports/does-not-exist")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_submit_duplicate_warning() {
        let state = create_test_state();
        let first = submit(&state, 12.9716, 77.5946).await;
        let second = submit(&state, 12.9717, 77.5946).await;

        let warning = &second["duplicate_warning"];
        assert_eq!(warning["existing_report"]["id"], first["report"]["id"]);
        assert_eq!(warning["message"], "Similar report found 11.1m away");
        assert_eq!(
            second["report"]["potential_duplicate_of"],
            first["report"]["id"]
        );
    }

    #[tokio::test]
    async fn test_submit_invalid_coordinates() {
        let state = create_test_state();
        let (status, body) = send(
            &state,
            json_req(
                "POST",
                "/api/reports",
                json!({"latitude": 91.0, "longitude": 0.0}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_COORDINATES");
    }

    #[tokio::test]
    async fn test_nearby_endpoint() {
        let state = create_test_state();
        submit(&state, 12.9720, 77.5946).await; // ~44m
        submit(&state, 12.9717, 77.5946).await; // ~11m
        submit(&state, 12.9740, 77.5990).await; // ~546m

        let (status, body) = send(
            &state,
            get_req("/api/reports/nearby?lat=12.9716&lng=77.5946"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 2);
        assert_eq!(body["radius"], 50.0);
        let first = body["reports"][0]["distance"].as_f64().unwrap();
        let second = body["reports"][1]["distance"].as_f64().unwrap();
        assert!(first <= second);

        let (status, body) = send(
            &state,
            get_req("/api/reports/nearby?lat=12.9716&lng=77.5946&radius=-5"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_RADIUS");
    }

    #[tokio::test]
    async fn test_list_filters() {
        let state = create_test_state();
        submit(&state, 12.9716, 77.5946).await;
        submit(&state, 28.6139, 77.2090).await;

        let (status, body) = send(&state, get_req("/api/reports?status=new&limit=1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 1);

        let (status, body) = send(&state, get_req("/api/reports?status=closed")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_analyze_endpoint() {
        let state = create_test_state();
        let (status, body) = send(
            &state,
            json_req("POST", "/api/analyze", json!({"image": "data:image/png;base64,aGVsbG8="})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["analysis"]["issue_type"], "garbage");

        let failing = create_test_state_with(Arc::new(FailingClassifier));
        let (status, body) = send(
            &failing,
            json_req("POST", "/api/analyze", json!({"image": "aGVsbG8="})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["code"], "CLASSIFIER_ERROR");
    }

    #[tokio::test]
    async fn test_admin_workflow() {
        let state = create_test_state();
        let id = submit(&state, 12.9716, 77.5946).await["report"]["id"]
            .as_str()
            .unwrap()
            .to_string();

        let (status, body) = send(
            &state,
            json_req(
                "PATCH",
                &format!("/admin/api/reports/{}", id),
                json!({"severity": "low", "notes": "crew assigned"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["severity"], "low");
        assert_eq!(body["notes"], "crew assigned");

        let (status, _) = send(
            &state,
            json_req("PATCH", &format!("/admin/api/reports/{}", id), json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &state,
            json_req("POST", &format!("/admin/api/reports/{}/verify", id), json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "verified");

        let (status, body) = send(
            &state,
            json_req(
                "POST",
                &format!("/admin/api/reports/{}/resolve", id),
                json!({"notes": "patched"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "resolved");
        assert_eq!(body["resolution_notes"], "patched");

        let delete = Request::builder()
            .method("DELETE")
            .uri(format!("/admin/api/reports/{}", id))
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&state, delete).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&state, get_req(&format!("/api/reports/{}", id))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_bulk_update_endpoint() {
        let state = create_test_state();
        let a = submit(&state, 12.9716, 77.5946).await["report"]["id"].clone();
        let b = submit(&state, 28.6139, 77.2090).await["report"]["id"].clone();

        let (status, body) = send(
            &state,
            json_req(
                "POST",
                "/admin/api/bulk/update",
                json!({"report_ids": [a, "missing", b], "status": "resolved"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["updated_count"], 2);
        assert_eq!(body["failed_ids"], json!(["missing"]));
    }

    #[tokio::test]
    async fn test_map_endpoints() {
        let state = create_test_state();
        submit(&state, 12.9716, 77.5946).await;
        submit(&state, 12.9717, 77.5947).await;
        submit(&state, 40.7128, -74.0060).await;

        let (status, body) = send(&state, get_req("/map/api/clusters?zoom=10")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 2);
        assert_eq!(body["grid_size"], 0.1);

        let (status, body) = send(&state, get_req("/map/api/clusters?zoom=-1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["zoom"], -1);
        assert_eq!(body["grid_size"], 5.0);

        let (_, body) = send(&state, get_req("/map/api/stats")).await;
        assert_eq!(body["total"], 3);
        assert_eq!(body["by_severity"]["high"], 3);

        let (_, body) = send(&state, get_req("/map/api/markers?status=new")).await;
        assert_eq!(body["count"], 3);
        assert_eq!(body["markers"][0]["color"], "#dc3545");

        let (_, body) = send(&state, get_req("/map/api/heatmap?bounds=13,12,78,77")).await;
        assert_eq!(body["count"], 2);
        assert_eq!(body["data"][0]["weight"], 1.5);

        // Malformed bounds are ignored
        let (_, body) = send(&state, get_req("/map/api/heatmap?bounds=north")).await;
        assert_eq!(body["count"], 3);
    }
}
