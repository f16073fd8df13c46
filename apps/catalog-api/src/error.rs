//! # API Error Type
//!
//! Unified error type for the HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Catalog API                        │
//! │                                                                         │
//! │  Handler                                                               │
//! │  Result<T, ApiError>                                                   │
//! │       │                                                                 │
//! │       ├── CoreError::Validation(Fields) ──► 400 [{"campo","mensagem"}] │
//! │       ├── CoreError::Validation(_)      ──► 400 {"mensagem"}           │
//! │       ├── CoreError::*NotFound / No*    ──► 404 {"mensagem"}           │
//! │       ├── CoreError::Persistence        ──► 500 {"mensagem"}           │
//! │       │     (cause already logged by the service, never sent)          │
//! │       └── Json/Query/Path rejection     ──► 400 {"mensagem"}           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use catalog_core::error::FieldError;
use catalog_core::{CoreError, ErrorKind, ValidationError};
use serde::Serialize;
use tracing::debug;

/// Body of every single-message error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorMessage {
    pub mensagem: String,
}

/// What goes on the wire when a request fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ErrorBody {
    Message(ErrorMessage),

    /// One entry per invalid field.
    Fields(Vec<FieldError>),
}

/// API error returned from the handlers.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError {
            status,
            body: ErrorBody::Message(ErrorMessage {
                mensagem: message.into(),
            }),
        }
    }

    /// Malformed request that never reached the services.
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::new(StatusCode::BAD_REQUEST, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let status = match err.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Persistence => StatusCode::INTERNAL_SERVER_ERROR,
        };

        match err {
            CoreError::Validation(ValidationError::Fields(errors)) => ApiError {
                status,
                body: ErrorBody::Fields(errors.into_vec()),
            },
            other => ApiError::new(status, other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        debug!(status = %self.status, body = ?self.body, "Request failed");
        (self.status, Json(self.body)).into_response()
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Unit Tests
// =============================================================================
