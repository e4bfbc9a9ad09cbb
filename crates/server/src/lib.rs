//! RectifAI Server
//!
//! HTTP entry point for the correction service.

pub mod http;
pub mod metrics;
pub mod service;
pub mod state;

pub use http::create_router;
pub use metrics::{init_metrics, metrics_handler};
pub use service::{CorrectionResponse, CorrectionService, SubmissionView};
pub use state::AppState;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ServerError> for StatusCode {
    fn from(err: ServerError) -> Self {
        match err {
            ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Persistence(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<rectifai_core::Error> for ServerError {
    fn from(err: rectifai_core::Error) -> Self {
        if err.is_user_facing() {
            ServerError::InvalidRequest(err.to_string())
        } else {
            ServerError::Internal(err.to_string())
        }
    }
}

impl From<rectifai_persistence::PersistenceError> for ServerError {
    fn from(err: rectifai_persistence::PersistenceError) -> Self {
        ServerError::Persistence(err.to_string())
    }
}

impl From<rectifai_llm::LlmError> for ServerError {
    fn from(err: rectifai_llm::LlmError) -> Self {
        ServerError::Internal(err.to_string())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let status = StatusCode::from(self);
        if status.is_server_error() {
            tracing::error!(status = %status, error = %message, "Request failed");
        }
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
