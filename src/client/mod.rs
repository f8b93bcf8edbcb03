//! Station-metadata backend client
//!
//! Fetches nearby stations from the REST backend:
//! `GET {base_url}/api/stations/{station_id}/nearby?radius={km}`

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::station::{NearbyQuery, NearbyResponse, Station};
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("gnss-nearby/", env!("CARGO_PKG_VERSION"));

/// Anything that can answer a nearby-stations query
pub trait NearbySource: Send + Sync {
    /// Stations within `query.radius_km` of the focal station
    fn nearby_stations(
        &self,
        query: &NearbyQuery,
    ) -> impl std::future::Future<Output = Result<Vec<Station>>> + Send;
}

/// HTTP client for the station-metadata backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a client from the `[api]` config section
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let token = Some(config.token.clone()).filter(|t| !t.is_empty());

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the nearby-stations endpoint for a query
    pub fn nearby_url(&self, query: &NearbyQuery) -> String {
        format!(
            "{}/api/stations/{}/nearby?radius={}",
            self.base_url,
            urlencoding::encode(&query.station_id),
            query.radius_km
        )
    }
}

impl NearbySource for ApiClient {
    async fn nearby_stations(&self, query: &NearbyQuery) -> Result<Vec<Station>> {
        let url = self.nearby_url(query);
        debug!("GET {}", url);

        let mut request = self.client.get(&url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Backend(format!("Nearby stations request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Backend(format!(
                "Backend returned status: {}",
                response.status()
            )));
        }

        let body: NearbyResponse = response
            .json()
            .await
            .map_err(|e| Error::Backend(format!("Failed to parse nearby stations: {}", e)))?;

        debug!(
            "Backend returned {} stations near {}",
            body.nearby_stations.len(),
            query.station_id
        );
        Ok(body.nearby_stations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Path, Query};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::get;
    use axum::{Json, Router};
    use std::collections::HashMap;
    use tokio::net::TcpListener;

    async fn stub_backend() -> String {
        async fn nearby(
            Path(id): Path<String>,
            Query(params): Query<HashMap<String, String>>,
            headers: HeaderMap,
        ) -> std::result::Result<Json<serde_json::Value>, StatusCode> {
            if id == "missing" {
                return Err(StatusCode::NOT_FOUND);
            }
            let auth = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
                .to_string();
            Ok(Json(serde_json::json!({
                "nearby_stations": [
                    {"api_id": id, "lat": 1.0, "lon": 2.0, "has_gaps": false, "has_stationinfo": true},
                    {"api_id": format!("r{}", params["radius"]), "lat": 1.0, "lon": 2.0},
                    {"api_id": auth, "lat": null, "lon": null}
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

    fn client_for(base_url: &str, token: &str) -> ApiClient {
        ApiClient::new(&ApiConfig {
            base_url: base_url.to_string(),
            token: token.to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_nearby_url() {
        let client = client_for("http://example.org/", "");
        let query = NearbyQuery::new("lim per", 150).unwrap();
        assert_eq!(
            client.nearby_url(&query),
            "http://example.org/api/stations/lim%20per/nearby?radius=150"
        );
    }

    #[tokio::test]
    async fn test_fetch_nearby() {
        let base = stub_backend().await;
        let client = client_for(&base, "secret");
        let query = NearbyQuery::new("lim.per", 120).unwrap();

        let stations = client.nearby_stations(&query).await.unwrap();
        assert_eq!(stations.len(), 3);
        assert_eq!(stations[0].api_id, "lim.per");
        assert_eq!(stations[1].api_id, "r120");
        assert_eq!(stations[2].api_id, "Bearer secret");
        assert!(stations[2].coordinates().is_none());
    }

    #[tokio::test]
    async fn test_fetch_error_status() {
        let base = stub_backend().await;
        let client = client_for(&base, "");
        let query = NearbyQuery::new("missing", 100).unwrap();

        let err = client.nearby_stations(&query).await.unwrap_err();
        assert!(matches!(err, Error::Backend(_)));
        assert!(err.to_string().contains("404"));
    }
}
