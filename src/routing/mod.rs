//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → router.rs (route lookup, most specific first)
//!     → matcher.rs (evaluate match conditions, capture params)
//!     → Return: RouteMatch { kind, params }, or the fallback route
//!
//! Route table (at startup):
//!     static (name, kind, matcher) list
//!     → Sort by specificity (exact > pattern)
//!     → Freeze as immutable Router
//! ```
//!
//! # Design Decisions
//! - Routes fixed at startup, immutable at runtime
//! - Deterministic: same path always matches same route
//! - First match wins; unmatched paths get the fallback

pub mod matcher;
pub mod router;

pub use matcher::{Matcher, PathParams};
pub use router::{Route, RouteKind, RouteMatch, Router};
