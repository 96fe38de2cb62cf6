//! Pooled HTTP client for upstream fetches.
//!
//! # Responsibilities
//! - Own the single connection pool shared by every handler
//! - Bound connect and time-to-response-head; relayed bodies may stream as long as they need
//! - Turn transport failures into `ProxyError`
//!
//! # Design Decisions
//! - No retries; a failed fetch fails the request
//! - Non-2xx responses are returned as-is
//! - Futures are dropped with the inbound request, which aborts the fetch

use std::future::Future;
use std::time::Duration;

use axum::body::Bytes;
use axum::http::header::USER_AGENT;
use tokio::time::timeout;

use crate::config::TimeoutConfig;
use crate::error::{FetchFailure, ProxyError, ProxyResult};

const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Cheaply cloneable handle to the upstream connection pool.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    fetch_timeout: Duration,
}

impl UpstreamClient {
    /// Build a client with the configured timeouts.
    pub fn new(timeouts: &TimeoutConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()?;
        Ok(Self {
            http,
            fetch_timeout: Duration::from_secs(timeouts.upstream_secs),
        })
    }

    /// GET `url` with the default agent.
    pub async fn fetch(&self, url: &str) -> ProxyResult<reqwest::Response> {
        self.send(url, self.http.get(url)).await
    }

    /// GET `url` presenting `user_agent`.
    pub async fn fetch_as(&self, url: &str, user_agent: &str) -> ProxyResult<reqwest::Response> {
        self.send(url, self.http.get(url).header(USER_AGENT, user_agent))
            .await
    }

    /// The deadline covers connect and response head only; streamed bodies are unbounded.
    async fn send(
        &self,
        url: &str,
        request: reqwest::RequestBuilder,
    ) -> ProxyResult<reqwest::Response> {
        tracing::debug!(url = %url, "Fetching upstream");
        let unavailable = |source: FetchFailure| ProxyError::UpstreamUnavailable {
            url: url.to_string(),
            source,
        };

        let response = timeout(self.fetch_timeout, request.send())
            .await
            .map_err(|_| unavailable(FetchFailure::TimedOut(self.fetch_timeout)))?
            .map_err(|e| unavailable(e.into()))?;

        tracing::debug!(url = %url, status = %response.status(), "Upstream responded");
        Ok(response)
    }

    /// Read a whole response body into memory.
    pub async fn read_bytes(&self, response: reqwest::Response) -> ProxyResult<Bytes> {
        let url = response.url().to_string();
        self.buffered(url, response.bytes()).await
    }

    /// Read a whole response body as text.
    pub async fn read_text(&self, response: reqwest::Response) -> ProxyResult<String> {
        let url = response.url().to_string();
        self.buffered(url, response.text()).await
    }

    async fn buffered<T>(
        &self,
        url: String,
        read: impl Future<Output = Result<T, reqwest::Error>>,
    ) -> ProxyResult<T> {
        match timeout(self.fetch_timeout, read).await {
            Ok(Ok(body)) => Ok(body),
            Ok(Err(e)) => Err(ProxyError::BodyReadFailure {
                url,
                source: e.into(),
            }),
            Err(_) => Err(ProxyError::BodyReadFailure {
                url,
                source: FetchFailure::TimedOut(self.fetch_timeout),
            }),
        }
    }
}
