//! Upstream content sources.
//!
//! # Data Flow
//! ```text
//! RouteKind::Content → content.rs → asset origin   → relay (streamed)
//! RouteKind::Favicon → favicon.rs → image service  → relay (streamed)
//! RouteKind::Font    → font.rs    → stylesheet API → font host → bytes
//! ```
//!
//! All fetches go through the pooled client in client.rs.

pub mod client;
pub mod content;
pub mod favicon;
pub mod font;

pub use client::UpstreamClient;
pub use content::ContentTarget;
pub use font::{find_font_source, normalize_family, FontRequest};
