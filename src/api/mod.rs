//! HTTP API serving geo boundary files and their metadata.

mod error;
mod handlers;

use std::sync::Arc;

use axum::{
    http::{header::InvalidHeaderValue, HeaderValue},
    routing::get,
    Router,
};
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::data::DataStore;

pub use error::ApiError;
pub use handlers::{AdminListResponse, HealthResponse, MetaResponse, GEO_MEDIA_TYPE};

/// Application state shared across handlers
pub struct AppState {
    pub store: DataStore,
}

impl AppState {
    pub fn new(store: DataStore) -> Self {
        Self { store }
    }
}

/// Build the router with all routes, CORS and request tracing
pub fn router(state: Arc<AppState>, cors: CorsLayer) -> Router {
    let geo = Router::new()
        .route("/world", get(handlers::world_handler))
        .route("/admin/{country}", get(handlers::admin_handler))
        .route("/meta/world", get(handlers::world_meta_handler))
        .route("/meta/admin/{country}", get(handlers::admin_meta_handler))
        .route("/list/admins", get(handlers::list_admins_handler));

    Router::new()
        .route("/health", get(handlers::health_handler))
        .nest("/api/geo", geo)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS layer for a list of allowed origins; `"*"` anywhere means permissive.
///
/// Explicit origins allow credentials and mirror the requested method and headers.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer, InvalidHeaderValue> {
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return Ok(CorsLayer::permissive());
    }

    let origins = origins
        .iter()
        .map(|o| HeaderValue::from_str(o))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use serde_json::{json, Value};
    use std::fs;
    use std::io::Write;
    use tempfile::TempDir;
    use tower::ServiceExt;

    const FRANCE: &str = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","geometry":{"type":"Polygon","coordinates":[[[0,0],[0,5],[5,5],[5,0],[0,0]]]},"properties":{}}
    ]}"#;

    fn fixture() -> TempDir {
        let dir = tempfile::Builder::new()
            .prefix("geo-api-router-")
            .tempdir()
            .unwrap();
        let admin = dir.path().join("admin-by-country");
        fs::create_dir_all(&admin).unwrap();
        fs::write(admin.join("fr-admin.json"), FRANCE).unwrap();
        fs::write(admin.join("xx-admin.json"), "{broken").unwrap();
        fs::write(admin.join("topo-admin.json"), r#"{"type":"Topology","objects":{}}"#).unwrap();
        dir
    }

    fn app(dir: &TempDir) -> Router {
        let state = Arc::new(AppState::new(DataStore::new(dir.path())));
        router(state, cors_layer(&["*".to_string()]).unwrap())
    }

    async fn fetch(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, body.to_vec())
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let (status, _, body) = fetch(app, uri).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let dir = fixture();
        let (status, body) = get_json(app(&dir), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok", "service": "geo-api"}));
    }

    #[tokio::test]
    async fn test_admin_meta() {
        let dir = fixture();
        let (status, body) = get_json(app(&dir), "/api/geo/meta/admin/fr").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "path": "admin-by-country/fr-admin.json",
                "size": FRANCE.len(),
                "featureCount": 1,
                "bbox": [0.0, 0.0, 5.0, 5.0]
            })
        );
    }

    #[tokio::test]
    async fn test_meta_for_non_collection_and_broken_file() {
        let dir = fixture();

        let (status, body) = get_json(app(&dir), "/api/geo/meta/admin/topo").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["featureCount"], Value::Null);
        assert!(body.get("bbox").is_none());

        let (status, body) = get_json(app(&dir), "/api/geo/meta/admin/xx").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["path"], "admin-by-country/xx-admin.json");
        assert_eq!(body["featureCount"], Value::Null);
    }

    #[tokio::test]
    async fn test_unknown_country_is_404() {
        let dir = fixture();
        for uri in ["/api/geo/admin/zz", "/api/geo/meta/admin/zz", "/api/geo/admin/...."] {
            let (status, body) = get_json(app(&dir), uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(body["detail"], "admin geo file not found");
        }
    }

    #[tokio::test]
    async fn test_missing_world_is_404() {
        let dir = fixture();
        let (status, body) = get_json(app(&dir), "/api/geo/meta/world").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "world geo file not found");
    }

    #[tokio::test]
    async fn test_admin_plain_json() {
        let dir = fixture();
        let (status, headers, body) = fetch(app(&dir), "/api/geo/admin/fr").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "application/json");
        assert!(headers.get(header::CONTENT_ENCODING).is_none());
        assert_eq!(body, FRANCE.as_bytes());
    }

    #[tokio::test]
    async fn test_broken_json_is_500() {
        let dir = fixture();
        let (status, body) = get_json(app(&dir), "/api/geo/admin/xx").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["detail"].as_str().unwrap().contains("failed to parse"));
    }

    #[tokio::test]
    async fn test_world_gzip_passthrough() {
        let dir = fixture();
        fs::write(dir.path().join("world-110m.json"), FRANCE).unwrap();

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(FRANCE.as_bytes()).unwrap();
        let compressed = encoder.finish().unwrap();
        fs::write(dir.path().join("world-110m.json.gz"), &compressed).unwrap();

        let (status, headers, body) = fetch(app(&dir), "/api/geo/world").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_ENCODING], "gzip");
        assert_eq!(headers[header::CONTENT_TYPE], GEO_MEDIA_TYPE);
        assert_eq!(body, compressed);

        let (status, body) = get_json(app(&dir), "/api/geo/meta/world").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["path"], "world-110m.json");
        assert_eq!(body["featureCount"], 1);
    }

    #[tokio::test]
    async fn test_list_admins() {
        let dir = fixture();
        let (status, body) = get_json(app(&dir), "/api/geo/list/admins").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"countries": ["fr", "topo", "xx"]}));
    }

    #[test]
    fn test_cors_layer_origins() {
        assert!(cors_layer(&[]).is_ok());
        assert!(cors_layer(&["http://localhost:5173".to_string()]).is_ok());
        assert!(cors_layer(&["bad\norigin".to_string()]).is_err());
    }
}
