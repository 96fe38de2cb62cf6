//! Response relay.
//!
//! # Responsibilities
//! - Turn an upstream response into the client response
//! - Copy `Content-Type`, set `Cache-Control`
//! - Stream the body without buffering or transformation
//!
//! # Design Decisions
//! - Upstream status is passed through, including 4xx/5xx
//! - Other upstream headers are dropped
//! - No deadline on the body stream; only a failing copy truncates it

use axum::{
    body::Body,
    http::{header, HeaderValue},
    response::Response,
};
use futures_util::TryStreamExt;

use crate::error::ProxyError;
use crate::observability::metrics;

/// Relay `upstream` to the client with the given `Cache-Control` value.
pub fn relay(upstream: reqwest::Response, cache_control: &str) -> Response {
    let status = upstream.status();
    let content_type = upstream.headers().get(header::CONTENT_TYPE).cloned();
    let url = upstream.url().to_string();

    let stream = upstream.bytes_stream().map_err(move |source| {
        tracing::warn!(url = %url, error = %source, "Upstream body stream failed");
        metrics::record_upstream_error("body_read_failure");
        ProxyError::BodyReadFailure {
            url: url.clone(),
            source: source.into(),
        }
    });

    let mut response = Response::new(Body::from_stream(stream));
    *response.status_mut() = status;

    let headers = response.headers_mut();
    if let Some(content_type) = content_type {
        headers.insert(header::CONTENT_TYPE, content_type);
    }
    if let Ok(directive) = HeaderValue::from_str(cache_control) {
        headers.insert(header::CACHE_CONTROL, directive);
    }
    response
}
