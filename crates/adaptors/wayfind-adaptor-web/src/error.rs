//! HTTP error mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::warn;
use wayfind_core::WayfindError;

/// Handler-level error carrying its HTTP mapping
#[derive(Debug)]
pub struct ApiError(pub WayfindError);

impl From<WayfindError> for ApiError {
    fn from(err: WayfindError) -> Self {
        Self(err)
    }
}

/// Convert validator output into a boundary validation error
pub fn validation_error(errors: validator::ValidationErrors) -> ApiError {
    ApiError(WayfindError::validation(errors.to_string()))
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            WayfindError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            WayfindError::Conflict(_) => StatusCode::CONFLICT,
            WayfindError::Auth(_) => StatusCode::UNAUTHORIZED,
            WayfindError::NotFound(_) => StatusCode::NOT_FOUND,
            WayfindError::Embedding(_) | WayfindError::Timeout(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            warn!("Request failed: {}", self.0);
        }

        (status, Json(json!({ "detail": self.0.to_string() }))).into_response()
    }
}
