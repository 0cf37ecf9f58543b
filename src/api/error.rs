use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::data::DataError;

/// Error returned by HTTP handlers, rendered as `{"detail": "..."}`
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    Internal(String),
}

impl From<DataError> for ApiError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::NotFound(message) => ApiError::NotFound(message),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, detail),
            ApiError::Internal(detail) => {
                tracing::error!("Request failed: {}", detail);
                (StatusCode::INTERNAL_SERVER_ERROR, detail)
            }
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
