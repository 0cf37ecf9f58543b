//! Route handlers.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use tracing::{debug, warn};

use super::{ApiError, AppState};
use crate::data::DataStore;
use crate::summary::{summarize, CollectionSummary};

/// Media type of pre-compressed GeoJSON responses
pub const GEO_MEDIA_TYPE: &str = "application/geo+json";

pub const SERVICE_NAME: &str = "geo-api";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

/// File metadata plus the collection summary, if the file is a FeatureCollection
#[derive(Debug, Serialize)]
pub struct MetaResponse {
    pub path: String,
    pub size: u64,
    #[serde(flatten)]
    pub summary: CollectionSummary,
}

#[derive(Debug, Serialize)]
pub struct AdminListResponse {
    pub countries: Vec<String>,
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: SERVICE_NAME,
    })
}

pub async fn world_handler(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let path = state.store.world_file_path().await?;
    serve_geo_file(&state.store, path).await
}

pub async fn admin_handler(
    State(state): State<Arc<AppState>>,
    Path(country): Path<String>,
) -> Result<Response, ApiError> {
    let path = state.store.admin_file_path(&country).await?;
    serve_geo_file(&state.store, path).await
}

pub async fn world_meta_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MetaResponse>, ApiError> {
    let path = state.store.world_file_path().await?;
    build_meta(&state.store, path).await.map(Json)
}

pub async fn admin_meta_handler(
    State(state): State<Arc<AppState>>,
    Path(country): Path<String>,
) -> Result<Json<MetaResponse>, ApiError> {
    let path = state.store.admin_file_path(&country).await?;
    build_meta(&state.store, path).await.map(Json)
}

pub async fn list_admins_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AdminListResponse>, ApiError> {
    let countries = state.store.list_admin_countries().await?;
    Ok(Json(AdminListResponse { countries }))
}

/// Serve the gzip sibling verbatim if one exists, else the validated JSON file
async fn serve_geo_file(store: &DataStore, path: PathBuf) -> Result<Response, ApiError> {
    if let Some(gz) = store.gzip_sibling(&path).await {
        debug!("Serving pre-compressed {}", gz.display());
        let bytes = store.read_bytes(&gz).await?;
        return Ok((
            [
                (header::CONTENT_TYPE, GEO_MEDIA_TYPE),
                (header::CONTENT_ENCODING, "gzip"),
            ],
            bytes,
        )
            .into_response());
    }

    let bytes = store
        .read_validated_json(&path)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(([(header::CONTENT_TYPE, "application/json")], bytes).into_response())
}

async fn build_meta(store: &DataStore, path: PathBuf) -> Result<MetaResponse, ApiError> {
    let size = store.file_size(&path).await?;

    // Unreadable content still yields path and size
    let summary = match store.read_json(&path).await {
        Ok(document) => summarize(&document),
        Err(e) => {
            warn!("No metadata for {}: {}", path.display(), e);
            CollectionSummary::default()
        }
    };

    Ok(MetaResponse {
        path: store.relative_path(&path),
        size,
        summary,
    })
}
