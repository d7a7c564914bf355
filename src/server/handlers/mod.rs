// src/server/handlers/mod.rs
//! HTTP request handlers and the problem-details error body

pub mod recipes;

use crate::server::SharedState;
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

/// Error response body (RFC 7807)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    /// Error type URI
    #[serde(rename = "type")]
    pub error_type: String,
    /// Human-readable title
    pub title: String,
    /// HTTP status code
    pub status: u16,
    /// Detailed description
    pub detail: String,
    /// Instance URI (the request that caused the error)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    /// Additional error-specific data (per-field messages for validation)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Value>,
}

impl ProblemDetails {
    pub fn new(error_type: &str, title: &str, status: u16, detail: &str) -> Self {
        Self {
            error_type: format!("urn:recipebook:error:{}", error_type),
            title: title.to_string(),
            status,
            detail: detail.to_string(),
            instance: None,
            extensions: None,
        }
    }

    pub fn not_found(resource: &str) -> Self {
        Self::new("not_found", "Not Found", 404, &format!("{} not found", resource))
    }

    pub fn bad_request(detail: &str) -> Self {
        Self::new("bad_request", "Bad Request", 400, detail)
    }

    /// Field-level validation failure
    pub fn validation(errors: &crate::ValidationErrors) -> Self {
        Self::new("validation", "Validation Failed", 400, &errors.to_string())
            .with_extensions(serde_json::json!({ "errors": errors }))
    }

    pub fn integrity(detail: &str) -> Self {
        Self::new("integrity", "Integrity Error", 500, detail)
    }

    pub fn internal(detail: &str) -> Self {
        Self::new("internal", "Internal Error", 500, detail)
    }

    pub fn with_instance(mut self, instance: String) -> Self {
        self.instance = Some(instance);
        self
    }

    pub fn with_extensions(mut self, extensions: serde_json::Value) -> Self {
        self.extensions = Some(extensions);
        self
    }
}

/// Error wrapper returned by handlers
#[derive(Debug)]
pub struct ApiError(pub ProblemDetails);

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Attach the request URI the error refers to
    pub fn with_instance(self, instance: String) -> Self {
        ApiError(self.0.with_instance(instance))
    }
}

impl From<ProblemDetails> for ApiError {
    fn from(problem: ProblemDetails) -> Self {
        ApiError(problem)
    }
}

impl From<crate::Error> for ApiError {
    fn from(err: crate::Error) -> Self {
        use crate::Error;

        let problem = match &err {
            Error::ValidationError(errors) => ProblemDetails::validation(errors),
            Error::NotFound(resource) => ProblemDetails::not_found(resource),
            Error::IntegrityError(detail) => ProblemDetails::integrity(detail),
            other => ProblemDetails::internal(&other.to_string()),
        };

        if err.is_client_error() {
            tracing::debug!("Request rejected: {}", err);
        } else {
            tracing::error!("Request failed: {}", err);
        }
        ApiError(problem)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(ProblemDetails::bad_request(&rejection.body_text()))
    }
}

/// A path segment that is not a valid id cannot name a resource
impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!("Unmatched resource path: {}", rejection.body_text());
        ApiError(ProblemDetails::not_found("Resource"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (
            status,
            [("content-type", "application/problem+json")],
            Json(self.0),
        )
            .into_response()
    }
}

/// Run a storage operation on a fresh connection in a blocking task
pub(crate) async fn with_db<T, F>(state: &SharedState, f: F) -> ApiResult<T>
where
    F: FnOnce(&mut Connection) -> crate::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();

    tokio::task::spawn_blocking(move || {
        let mut conn = state.open_db()?;
        f(&mut conn)
    })
    .await
    .map_err(|e| ApiError(ProblemDetails::internal(&format!("Task join error: {}", e))))?
    .map_err(ApiError::from)
}
