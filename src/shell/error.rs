// API error body mapping for the HTTP shell.
//
// Mirrors the original service's error contract: every failure renders as
// `{timestamp, status, error, message, path}` with the matching HTTP status.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use serde_json::json;

use crate::modules::orders::use_cases::errors::ApplicationError;

/// Renders the standard error body for an explicit status and message.
pub fn error_response(status: StatusCode, message: String, path: &str) -> Response {
    let body = json!({
        "timestamp": Utc::now().to_rfc3339(),
        "status": status.as_u16(),
        "error": status.canonical_reason().unwrap_or(""),
        "message": message,
        "path": path,
    });
    (status, Json(body)).into_response()
}

/// Maps an application error to its HTTP status and renders the error body.
pub fn application_error_response(err: ApplicationError, path: &str) -> Response {
    let status = match err {
        ApplicationError::NotFound(_) => StatusCode::NOT_FOUND,
        ApplicationError::Conflict(_) => StatusCode::CONFLICT,
        ApplicationError::Domain(_) => StatusCode::CONFLICT,
        ApplicationError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        ApplicationError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, err.to_string(), path)
}
