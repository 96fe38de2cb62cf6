//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the dispatch handler
//! - Wire up middleware (request ID, tracing, timeout)
//! - Dispatch requests through the route table
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::Instrument;

use crate::config::{CacheConfig, ProxyConfig, UpstreamConfig};
use crate::error::{ProxyError, ProxyResult};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, RequestIdExt};
use crate::observability::metrics;
use crate::routing::{RouteKind, RouteMatch, Router as RouteTable};
use crate::upstream::client::UpstreamClient;
use crate::upstream::content::proxy_content;
use crate::upstream::favicon::proxy_favicon;
use crate::upstream::font::{font_response, resolve_font, FontRequest};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<RouteTable>,
    pub client: UpstreamClient,
    pub upstreams: Arc<UpstreamConfig>,
    pub cache: Arc<CacheConfig>,
}

/// HTTP server for the asset router.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, reqwest::Error> {
        let client = UpstreamClient::new(&config.timeouts)?;

        let state = AppState {
            routes: Arc::new(RouteTable::standard()),
            client,
            upstreams: Arc::new(config.upstreams.clone()),
            cache: Arc::new(config.cache.clone()),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        Router::new()
            .route("/", get(dispatch))
            .route("/{*path}", get(dispatch))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http())
                    .layer(propagate_request_id_layer())
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs,
                    ))),
            )
    }

    /// The configured axum router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// Main handler: looks up the route and runs it.
async fn dispatch(State(state): State<AppState>, uri: Uri, headers: HeaderMap) -> Response {
    let start = Instant::now();
    let request_id = headers.request_id().to_string();
    let path = uri.path();

    let route = state.routes.match_path(path);

    let span = tracing::debug_span!("route", request_id = %request_id, route = route.name);
    let response = handle(&state, &route, &uri)
        .instrument(span)
        .await
        .into_response();

    tracing::debug!(
        request_id = %request_id,
        route = route.name,
        status = %response.status(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Request handled"
    );
    metrics::record_request(route.name, response.status().as_u16(), start);
    response
}

async fn handle(state: &AppState, route: &RouteMatch, uri: &Uri) -> ProxyResult<Response> {
    match route.kind {
        RouteKind::ViewSource => Ok((
            StatusCode::MOVED_PERMANENTLY,
            [(header::LOCATION, state.upstreams.source_url.as_str())],
        )
            .into_response()),
        RouteKind::Favicon => proxy_favicon(&state.client, &state.upstreams, &state.cache).await,
        RouteKind::Font => {
            // `/api/font//{weight}` names no family.
            let request = FontRequest::from_params(&route.params).ok_or(ProxyError::ExtractionNotFound)?;
            let bytes = resolve_font(&state.client, &state.upstreams, &request).await?;
            Ok(font_response(bytes, &state.cache))
        }
        RouteKind::Content => {
            proxy_content(
                &state.client,
                &state.upstreams,
                &state.cache,
                uri.path(),
                uri.query(),
            )
            .await
        }
    }
}
