//! Boot server errors

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use boot_core::CoreError;
use boot_store::StoreError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// JSON body of error responses
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

// Documents read back from the store are not caller input, so a store that
// cannot decode them is faulty. Submitted documents are validated by the
// handlers before they reach the store.
fn store_status(err: &StoreError) -> StatusCode {
    match err {
        StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
        StoreError::InvalidId(_) => StatusCode::BAD_REQUEST,
        StoreError::Model(_) | StoreError::Serialization(_) | StoreError::Io(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl ServerError {
    /// HTTP status the error maps to.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Core(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            ServerError::Core(CoreError::Store(e)) if e.is_not_found() => StatusCode::NOT_FOUND,
            ServerError::Core(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::Store(e) => store_status(e),
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Metrics(_) | ServerError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = match status {
            StatusCode::NOT_FOUND => "not_found",
            StatusCode::BAD_REQUEST => "bad_request",
            _ => "internal",
        };
        // Selection failures are already reported by the match observer
        if status.is_server_error() && !matches!(self, ServerError::Core(_)) {
            error!("Request failed: {}", self);
        }

        let body = ErrorBody {
            error: code,
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
