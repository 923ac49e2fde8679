//! API error type and its HTTP mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use badgedex_core::{BadgeError, LookupFailure};
use serde::Serialize;
use thiserror::Error;

/// Errors returned by API handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("missing or invalid bearer token")]
    Unauthorized,

    /// The local lookup quota is spent.
    #[error("too many lookups; try again in a minute")]
    TooManyLookups,

    /// The upstream profile lookup failed.
    #[error("{}", .0.message())]
    Lookup(LookupFailure),

    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized"),
            Self::TooManyLookups => (StatusCode::TOO_MANY_REQUESTS, "rate_limited"),
            Self::Lookup(LookupFailure::NotFound) => (StatusCode::NOT_FOUND, "user_not_found"),
            Self::Lookup(LookupFailure::RateLimited) => {
                (StatusCode::TOO_MANY_REQUESTS, "upstream_rate_limited")
            }
            Self::Lookup(LookupFailure::Failed) => (StatusCode::BAD_GATEWAY, "lookup_failed"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl From<BadgeError> for ApiError {
    fn from(err: BadgeError) -> Self {
        match err {
            BadgeError::UnknownBadge(_) => Self::NotFound(err.to_string()),
            BadgeError::InvalidFilter { .. } => Self::BadRequest(err.to_string()),
            other => {
                tracing::error!(error = %other, "internal failure");
                Self::Internal(other.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let body = ErrorBody {
            code,
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
