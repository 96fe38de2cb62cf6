//! Asset router.
//!
//! Serves a fixed set of routes in front of three upstreams: a raw file
//! repository, a font stylesheet API and a favicon image service.
//!
//! ```text
//!     Client Request      ┌────────────────────────────────────────────┐
//!     ────────────────────┼─▶ http::server ──▶ routing::Router         │
//!                         │                        │                   │
//!                         │        ┌───────────────┼───────────────┐   │
//!                         │        ▼               ▼               ▼   │
//!                         │  upstream::content  upstream::font  favicon│──▶ origins
//!                         │        │               │               │   │
//!     Client Response     │        ▼               ▼               ▼   │
//!     ◀───────────────────┼── http::response (relay / font bytes)      │
//!                         └────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod upstream;

pub use config::schema::ProxyConfig;
pub use error::ProxyError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
