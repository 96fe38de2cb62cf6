//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store the route table
//! - Look up the route for a request path
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Routes sorted by matcher specificity; ties keep declaration order
//! - Every table has a fallback route, so lookup always succeeds

use crate::routing::matcher::{ExactMatcher, Matcher, PathParams, SegmentMatcher};

/// What a matched route does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    Favicon,
    ViewSource,
    Font,
    Content,
}

/// A named route: matcher plus handler kind.
#[derive(Debug)]
pub struct Route {
    pub name: &'static str,
    pub kind: RouteKind,
    matcher: Box<dyn Matcher>,
}

impl Route {
    pub fn new(name: &'static str, kind: RouteKind, matcher: impl Matcher + 'static) -> Self {
        Self {
            name,
            kind,
            matcher: Box::new(matcher),
        }
    }
}

/// Result of a successful lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub name: &'static str,
    pub kind: RouteKind,
    pub params: PathParams,
}

/// Ordered route table.
#[derive(Debug)]
pub struct Router {
    routes: Vec<Route>,
    fallback: (&'static str, RouteKind),
}

impl Router {
    /// Build a table from routes, ordering them most specific first.
    ///
    /// Paths no route matches go to `fallback`.
    pub fn new(mut routes: Vec<Route>, fallback: (&'static str, RouteKind)) -> Self {
        routes.sort_by_key(|route| std::cmp::Reverse(route.matcher.specificity()));
        Self { routes, fallback }
    }

    /// The fixed table served by the asset router.
    pub fn standard() -> Self {
        let routes = vec![
            Route::new("favicon", RouteKind::Favicon, ExactMatcher::new("/favicon.ico")),
            Route::new("view_source", RouteKind::ViewSource, ExactMatcher::new("/view-source")),
            Route::new(
                "font",
                RouteKind::Font,
                SegmentMatcher::new("/api/font/{family}/{weight}"),
            ),
            Route::new(
                "font_text",
                RouteKind::Font,
                SegmentMatcher::new("/api/font/{family}/{weight}/{text}"),
            ),
        ];
        Self::new(routes, ("content", RouteKind::Content))
    }

    /// Find the first route matching `path`, or the fallback.
    pub fn match_path(&self, path: &str) -> RouteMatch {
        self.routes
            .iter()
            .find_map(|route| {
                route.matcher.matches(path).map(|params| RouteMatch {
                    name: route.name,
                    kind: route.kind,
                    params,
                })
            })
            .unwrap_or_else(|| RouteMatch {
                name: self.fallback.0,
                kind: self.fallback.1,
                params: PathParams::default(),
            })
    }

    /// Route names in evaluation order.
    pub fn route_names(&self) -> Vec<&'static str> {
        self.routes.iter().map(|route| route.name).collect()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::standard()
    }
}
