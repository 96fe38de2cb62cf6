//! Raw asset proxy.
//!
//! Maps an inbound path and optional `branch` query parameter onto the
//! asset origin: `/<path>?branch=<b>` → `<origin>/<b>/<path>`.

use axum::response::Response;

use crate::config::{CacheConfig, UpstreamConfig};
use crate::error::ProxyResult;
use crate::http::response::relay;
use crate::upstream::client::UpstreamClient;

/// Path fetched when the root is requested.
pub const INDEX_PATH: &str = "/README.md";

/// Where a content request points upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentTarget {
    pub branch: String,
    pub path: String,
}

impl ContentTarget {
    /// Resolve branch and path from the raw request path and query string.
    pub fn resolve(path: &str, query: Option<&str>, default_branch: &str) -> Self {
        let path = if path == "/" { INDEX_PATH } else { path };
        let branch = query
            .and_then(branch_param)
            .filter(|branch| !branch.is_empty())
            .unwrap_or_else(|| default_branch.to_string());

        Self {
            branch,
            path: path.to_string(),
        }
    }

    /// Full upstream URL under `origin`.
    pub fn url(&self, origin: &str) -> String {
        format!("{}/{}{}", origin.trim_end_matches('/'), self.branch, self.path)
    }
}

fn branch_param(query: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "branch")
        .map(|(_, value)| value.into_owned())
}

/// Proxy one asset request.
pub async fn proxy_content(
    client: &UpstreamClient,
    upstreams: &UpstreamConfig,
    cache: &CacheConfig,
    path: &str,
    query: Option<&str>,
) -> ProxyResult<Response> {
    let target = ContentTarget::resolve(path, query, &upstreams.default_branch);
    let url = target.url(&upstreams.asset_origin);
    tracing::debug!(branch = %target.branch, path = %target.path, url = %url, "Proxying asset");

    let upstream = client.fetch(&url).await?;
    Ok(relay(upstream, &cache.content_directive()))
}
