//! Typed error-to-status mapping for the REST boundary.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use stickerbox_core::RegistryError;

/// Wrapper giving every [`RegistryError`] kind exactly one status code.
///
/// Clients can rely on the status alone; message text is informational and
/// never needs to be matched.
#[derive(Debug)]
pub struct ApiError(RegistryError);

impl From<RegistryError> for ApiError {
    fn from(e: RegistryError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            RegistryError::NotFound(_) => (StatusCode::NOT_FOUND, self.0.to_string()),
            RegistryError::InvalidInput(_) => (StatusCode::BAD_REQUEST, self.0.to_string()),
            RegistryError::Unauthorized => (StatusCode::UNAUTHORIZED, self.0.to_string()),
            RegistryError::Persistence(_) | RegistryError::Io(_) => {
                tracing::error!("request failed: {:?}", self.0);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".into())
            }
        };
        (
            status,
            Json(serde_json::json!({ "message": message })),
        )
            .into_response()
    }
}
