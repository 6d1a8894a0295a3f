//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use nestmate_core::ErrorKind;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
///
/// Core errors carry their own failure kind; every kind maps to its own
/// status and wire tag so callers can tell a blocked interaction from a
/// missing record.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error(transparent)]
  Core(#[from] nestmate_core::Error),
}

fn status_for(kind: ErrorKind) -> StatusCode {
  match kind {
    ErrorKind::NotFound => StatusCode::NOT_FOUND,
    ErrorKind::Forbidden | ErrorKind::Blocked => StatusCode::FORBIDDEN,
    ErrorKind::InvalidOperation | ErrorKind::InvalidArgument => {
      StatusCode::BAD_REQUEST
    }
    ErrorKind::Conflict => StatusCode::CONFLICT,
    ErrorKind::Dependency => StatusCode::BAD_GATEWAY,
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, kind, message) = match &self {
      ApiError::NotFound(m) => {
        (StatusCode::NOT_FOUND, ErrorKind::NotFound.as_str(), m.clone())
      }
      ApiError::Conflict(m) => {
        (StatusCode::CONFLICT, ErrorKind::Conflict.as_str(), m.clone())
      }
      ApiError::Core(e) => {
        (status_for(e.kind()), e.kind().as_str(), e.to_string())
      }
    };
    (status, Json(json!({ "error": message, "kind": kind }))).into_response()
  }
}
