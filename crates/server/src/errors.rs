use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

/// Error response rendered as `{"error": title, "message": detail}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub title: &'static str,
    pub detail: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: &'static str, detail: Option<String>) -> Self {
        Self { status, title, detail }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({"error": self.title, "message": self.detail});
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        let detail = Some(e.to_string());
        match e {
            ServiceError::Validation(_) | ServiceError::Model(_) => {
                JsonApiError::new(StatusCode::UNPROCESSABLE_ENTITY, "Validation Error", detail)
            }
            ServiceError::NotFound(_) => JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", detail),
            ServiceError::Conflict(_) => JsonApiError::new(StatusCode::BAD_REQUEST, "Conflict", detail),
            ServiceError::Storage(_) => {
                error!(err = %e, "stock storage failure");
                JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Storage Error", detail)
            }
            ServiceError::Db(_) => {
                error!(err = %e, "stock database failure");
                JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Database Error", detail)
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("storage initialization failed: {0}")]
    Storage(#[from] ServiceError),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
