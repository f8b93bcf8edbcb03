//! HTTP API routes
//!
//! Defines all REST API endpoints for the server.

use crate::client::NearbySource;
use crate::cluster::ClusterStrategy;
use crate::error::Error;
use crate::format::{available_formats, FormatInfo};
use crate::geo::{Coordinates, MapView};
use crate::overlap::OverlapDetector;
use crate::report::{build_report, OverlapReport, ReportInput};
use crate::server::state::AppState;
use crate::station::{NearbyQuery, Station};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/status", get(status_handler))
        .route("/api/formats", get(formats_handler))
        .route("/api/overlaps", post(overlaps_handler))
        .route("/api/nearby/:station_id", get(nearby_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.code.as_str() {
            "BACKEND_ERROR" => StatusCode::BAD_GATEWAY,
            "INTERNAL_ERROR" => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        };
        (status, Json(self)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::InvalidCoordinates(_) => "INVALID_COORDINATES",
            Error::InvalidRadius(_) => "INVALID_RADIUS",
            Error::Config(_) => "CONFIG_ERROR",
            Error::Backend(_) | Error::Http(_) => "BACKEND_ERROR",
            _ => "INTERNAL_ERROR",
        };
        ApiError {
            error: err.to_string(),
            code: code.to_string(),
        }
    }
}

/// Status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub running: bool,
    pub version: String,
    /// Station-metadata backend this server queries
    pub backend_url: String,
}

/// Server status endpoint
///
/// GET /api/status
async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        backend_url: state.client().base_url().to_string(),
    })
}

/// Formats list response
#[derive(Debug, Serialize, Deserialize)]
pub struct FormatsResponse {
    pub formats: Vec<FormatInfo>,
}

/// List available output formats
///
/// GET /api/formats
async fn formats_handler() -> Json<FormatsResponse> {
    Json(FormatsResponse {
        formats: available_formats(),
    })
}

/// Overlap request body
#[derive(Debug, Deserialize)]
pub struct OverlapRequest {
    pub stations: Vec<Station>,
    /// Map center (defaults to the stations' mean)
    pub center: Option<Coordinates>,
    pub zoom: Option<u8>,
    pub override_distance: Option<f64>,
    pub strategy: Option<ClusterStrategy>,
}

/// Compute an overlap report for a posted station list
///
/// POST /api/overlaps
async fn overlaps_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<OverlapRequest>,
) -> Result<Json<OverlapReport>, ApiError> {
    let config = state.config().await;

    let center = match req.center {
        Some(center) => {
            center.validate()?;
            Some(center)
        }
        None => {
            let coords: Vec<Coordinates> = req.stations.iter().filter_map(Station::coordinates).collect();
            Coordinates::centroid(coords.iter())
        }
    };

    let zoom = req.zoom.unwrap_or(config.overlap.reference_zoom);
    let override_distance = match req.override_distance {
        Some(distance) => Some(distance),
        None => config.overlap.override_distance(),
    };
    let strategy = match req.strategy {
        Some(strategy) => strategy,
        None => config.overlap.strategy()?,
    };

    let detector = OverlapDetector::new(center.map(|c| MapView::new(c).with_zoom(zoom)))
        .with_override(override_distance);

    Ok(Json(build_report(
        ReportInput::new(&req.stations, detector).with_strategy(strategy),
    )))
}

/// Nearby query parameters
#[derive(Debug, Deserialize)]
pub struct NearbyParams {
    /// Radius in kilometers
    pub radius: Option<u32>,
    #[serde(rename = "override")]
    pub override_distance: Option<f64>,
    pub strategy: Option<ClusterStrategy>,
}

/// Fetch stations near a station from the backend and report overlaps
///
/// GET /api/nearby/:station_id
async fn nearby_handler(
    State(state): State<Arc<AppState>>,
    Path(station_id): Path<String>,
    Query(params): Query<NearbyParams>,
) -> Result<Json<OverlapReport>, ApiError> {
    let config = state.config().await;

    let radius = params.radius.unwrap_or(config.nearby.radius_km);
    let query = NearbyQuery::new(station_id, radius)?;

    let stations = state.client().nearby_stations(&query).await.map_err(|e| {
        warn!("Nearby fetch for {} failed: {}", query.station_id, e);
        ApiError::from(e)
    })?;

    let center = stations
        .iter()
        .find(|s| s.api_id == query.station_id)
        .and_then(Station::coordinates)
        .or_else(|| {
            let coords: Vec<Coordinates> = stations.iter().filter_map(Station::coordinates).collect();
            Coordinates::centroid(coords.iter())
        });

    let override_distance = match params.override_distance {
        Some(distance) => Some(distance),
        None => config.overlap.override_distance(),
    };
    let strategy = match params.strategy {
        Some(strategy) => strategy,
        None => config.overlap.strategy()?,
    };

    let map = center.map(|c| MapView::new(c).with_zoom(config.overlap.reference_zoom));
    let detector = OverlapDetector::new(map).with_override(override_distance);

    Ok(Json(build_report(
        ReportInput::new(&stations, detector)
            .with_strategy(strategy)
            .with_query(query.station_id.clone(), query.radius_km),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tokio::net::TcpListener;
    use tower::ServiceExt;

    fn create_test_state(base_url: &str) -> Arc<AppState> {
        let mut config = Config::default();
        config.api.base_url = base_url.to_string();
        config.api.timeout_secs = 5;
        Arc::new(AppState::new(config).unwrap())
    }

    /// Backend stub: two stations 4 m apart plus one 1 km away
    async fn stub_backend() -> String {
        async fn nearby(Path(id): Path<String>) -> Result<Json<serde_json::Value>, StatusCode> {
            if id == "down" {
                return Err(StatusCode::INTERNAL_SERVER_ERROR);
            }
            Ok(Json(serde_json::json!({
                "nearby_stations": [
                    {"api_id": id, "lat": -12.0, "lon": -77.0, "has_gaps": false, "has_stationinfo": true},
                    {"api_id": "twin", "lat": -11.999964, "lon": -77.0, "has_gaps": true, "has_stationinfo": true},
                    {"api_id": "far", "lat": -11.991, "lon": -77.0, "has_gaps": false, "has_stationinfo": true}
                ]
            })))
        }

        let app = Router::new().route("/api/stations/:id/nearby", get(nearby));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_status_endpoint() {
        let app = create_router(create_test_state("http://backend.test"));

        let response = app
            .oneshot(Request::builder().uri("/api/status").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let status: StatusResponse = body_json(response).await;
        assert!(status.running);
        assert_eq!(status.backend_url, "http://backend.test");
    }

    #[tokio::test]
    async fn test_formats_endpoint() {
        let app = create_router(create_test_state("http://backend.test"));

        let response = app
            .oneshot(Request::builder().uri("/api/formats").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let formats: FormatsResponse = body_json(response).await;
        assert_eq!(formats.formats.len(), 3);
    }

    #[tokio::test]
    async fn test_overlaps_endpoint() {
        let app = create_router(create_test_state("http://backend.test"));

        let request_body = serde_json::json!({
            "stations": [
                {"api_id": "a", "lat": 0.0, "lon": 0.0},
                {"api_id": "b", "lat": 0.0, "lon": 0.0, "has_stationinfo": false},
                {"api_id": "c", "lat": 1.0, "lon": 1.0}
            ],
            "center": {"lat": 0.0, "lon": 0.0}
        });

        let response = app.oneshot(post_json("/api/overlaps", request_body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let report: OverlapReport = body_json(response).await;
        assert_eq!(report.clusters.len(), 1);
        assert_eq!(report.clusters[0].icon.class_name, "marker-cluster-dangerous");
        assert_eq!(report.markers.len(), 1);
        assert!(report.threshold.unwrap() > 27.0);
    }

    #[tokio::test]
    async fn test_overlaps_zero_override() {
        let app = create_router(create_test_state("http://backend.test"));

        let request_body = serde_json::json!({
            "stations": [
                {"api_id": "a", "lat": 0.0, "lon": 0.0},
                {"api_id": "b", "lat": 0.00001, "lon": 0.0}
            ],
            "override_distance": 0.0
        });

        let response = app.oneshot(post_json("/api/overlaps", request_body)).await.unwrap();
        let report: OverlapReport = body_json(response).await;
        assert!(report.pairs.is_empty());
        assert!(report.clusters.is_empty());
    }

    #[tokio::test]
    async fn test_overlaps_invalid_center() {
        let app = create_router(create_test_state("http://backend.test"));

        let request_body = serde_json::json!({
            "stations": [],
            "center": {"lat": 91.0, "lon": 0.0}
        });

        let response = app.oneshot(post_json("/api/overlaps", request_body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let err: ApiError = body_json(response).await;
        assert_eq!(err.code, "INVALID_COORDINATES");
    }

    #[tokio::test]
    async fn test_nearby_endpoint() {
        let base = stub_backend().await;
        let app = create_router(create_test_state(&base));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/nearby/lim.per?radius=150")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let report: OverlapReport = body_json(response).await;
        assert_eq!(report.request.focal_station.as_deref(), Some("lim.per"));
        assert_eq!(report.request.radius_km, Some(150));
        assert_eq!(report.clusters.len(), 1);
        assert!(report.clusters[0].cluster.has_problem);
        assert_eq!(report.markers.len(), 1);
        assert_eq!(report.markers[0].api_id, "far");
    }

    #[tokio::test]
    async fn test_nearby_invalid_radius() {
        let app = create_router(create_test_state("http://backend.test"));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/nearby/lim.per?radius=250")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let err: ApiError = body_json(response).await;
        assert_eq!(err.code, "INVALID_RADIUS");
    }

    #[tokio::test]
    async fn test_nearby_backend_failure() {
        let base = stub_backend().await;
        let app = create_router(create_test_state(&base));

        let response = app
            .oneshot(Request::builder().uri("/api/nearby/down").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let err: ApiError = body_json(response).await;
        assert_eq!(err.code, "BACKEND_ERROR");
    }
}
