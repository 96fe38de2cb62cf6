//! Favicon proxy.

use axum::response::Response;

use crate::config::{CacheConfig, UpstreamConfig};
use crate::error::ProxyResult;
use crate::http::response::relay;
use crate::upstream::client::UpstreamClient;

/// Relay the configured favicon image.
pub async fn proxy_favicon(
    client: &UpstreamClient,
    upstreams: &UpstreamConfig,
    cache: &CacheConfig,
) -> ProxyResult<Response> {
    let upstream = client.fetch(&upstreams.favicon_url).await?;
    Ok(relay(upstream, &cache.content_directive()))
}
