//! Service error types with HTTP status code mapping.
//!
//! [`WatchError`] is the central error type. Each variant maps to a
//! specific HTTP status code and structured JSON error response.
//! Collaborator failures have their own types ([`FetchError`],
//! [`EnrichmentError`]) so callers can decide how to recover.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1001,
///     "message": "invalid request: competitorId and url are required",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Failure to retrieve a competitor page.
///
/// Never retried inside the snapshot builder; the caller decides whether
/// to abort the check or report it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The server answered with a non-2xx status.
    #[error("failed to fetch {url}: HTTP {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status code returned.
        status: u16,
    },

    /// Connection, timeout, or body read failure.
    #[error("failed to fetch {url}: {message}")]
    Transport {
        /// Requested URL.
        url: String,
        /// Transport error description.
        message: String,
    },

    /// The HTTP client could not be constructed or the URL is unusable.
    #[error("invalid fetch target: {0}")]
    InvalidUrl(String),
}

/// Failure of the optional classification enrichment call.
///
/// Always recovered by the caller: the heuristic classification is kept.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnrichmentError {
    /// Enrichment is switched off (no API key configured).
    #[error("enrichment disabled")]
    Disabled,

    /// Network or timeout failure.
    #[error("enrichment transport error: {0}")]
    Transport(String),

    /// The classification service answered with a non-2xx status.
    #[error("enrichment service returned HTTP {0}")]
    Status(u16),

    /// The response could not be interpreted as a classification.
    #[error("malformed enrichment response: {0}")]
    Malformed(String),
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status                 |
/// |-----------|-----------------|-----------------------------|
/// | 1000–1999 | Validation      | 400 Bad Request             |
/// | 2000–2999 | Not Found       | 404 Not Found               |
/// | 3000–3999 | Server/Upstream | 500 / 502                   |
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    /// Request validation failed (missing competitor id, url, ...).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// No competitor matched the request.
    #[error("competitor not found: {0}")]
    CompetitorNotFound(String),

    /// No snapshot exists for the requested competitor and url.
    #[error("no snapshot found for {competitor_id} at {url}")]
    SnapshotNotFound {
        /// Competitor identifier.
        competitor_id: String,
        /// Monitored URL.
        url: String,
    },

    /// Competitor page could not be fetched.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    PersistenceError(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl WatchError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::CompetitorNotFound(_) => 2001,
            Self::SnapshotNotFound { .. } => 2002,
            Self::Internal(_) => 3000,
            Self::PersistenceError(_) => 3001,
            Self::Fetch(_) => 3002,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::CompetitorNotFound(_) | Self::SnapshotNotFound { .. } => StatusCode::NOT_FOUND,
            Self::Fetch(_) => StatusCode::BAD_GATEWAY,
            Self::PersistenceError(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for WatchError {
    fn from(err: sqlx::Error) -> Self {
        Self::PersistenceError(err.to_string())
    }
}

impl From<serde_json::Error> for WatchError {
    fn from(err: serde_json::Error) -> Self {
        Self::PersistenceError(format!("record encoding: {err}"))
    }
}

impl IntoResponse for WatchError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let details = match &self {
            Self::Fetch(FetchError::Status { status, .. }) => {
                Some(format!("upstream status {status}"))
            }
            _ => None,
        };
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
