//! Request-level error kinds and their HTTP mapping.
//!
//! # Design Decisions
//! - Three kinds only; upstream non-2xx statuses are relayed, not errors
//! - Each kind maps to a fixed status code
//! - Only `ExtractionNotFound` is a deliberate user-facing answer

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::observability::metrics;

/// Body returned when no font source could be extracted.
pub const NOT_FOUND_MESSAGE: &str = "No resource found";

/// Why an upstream fetch produced nothing usable.
#[derive(Debug, Error)]
pub enum FetchFailure {
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("no response within {0:?}")]
    TimedOut(Duration),
}

impl FetchFailure {
    pub fn is_timeout(&self) -> bool {
        match self {
            FetchFailure::Transport(e) => e.is_timeout(),
            FetchFailure::TimedOut(_) => true,
        }
    }
}

/// Errors that can occur while serving a request.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The upstream could not be reached (connect, timeout, bad URL).
    #[error("upstream request to {url} failed: {source}")]
    UpstreamUnavailable {
        url: String,
        #[source]
        source: FetchFailure,
    },

    /// The font stylesheet contained no usable source URL.
    #[error("No resource found")]
    ExtractionNotFound,

    /// The upstream answered but its body could not be read.
    #[error("failed to read body from {url}: {source}")]
    BodyReadFailure {
        url: String,
        #[source]
        source: FetchFailure,
    },
}

/// Result type for request handling.
pub type ProxyResult<T> = Result<T, ProxyError>;

impl ProxyError {
    /// Status code sent to the client for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::UpstreamUnavailable { source, .. } if source.is_timeout() => {
                StatusCode::GATEWAY_TIMEOUT
            }
            ProxyError::UpstreamUnavailable { .. } => StatusCode::BAD_GATEWAY,
            ProxyError::ExtractionNotFound => StatusCode::NOT_FOUND,
            ProxyError::BodyReadFailure { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProxyError::UpstreamUnavailable { .. } => "upstream_unavailable",
            ProxyError::ExtractionNotFound => "extraction_not_found",
            ProxyError::BodyReadFailure { .. } => "body_read_failure",
        }
    }

    fn client_message(&self) -> &'static str {
        match self.status_code() {
            StatusCode::NOT_FOUND => NOT_FOUND_MESSAGE,
            StatusCode::GATEWAY_TIMEOUT => "Upstream request timed out",
            _ => "Upstream request failed",
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, kind = self.kind(), "Upstream error");
            metrics::record_upstream_error(self.kind());
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }
        (status, self.client_message()).into_response()
    }
}
