//! Route matching logic.
//!
//! # Responsibilities
//! - Match exact paths
//! - Match segment patterns with named parameters (`/api/font/{family}`)
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - Parameters may be empty; handlers decide what an empty value means
//! - Parameters are percent-decoded; literals are compared raw
//! - No regex to guarantee O(n) matching

use percent_encoding::percent_decode_str;

/// Parameters captured by a matcher, in pattern order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams(Vec<(&'static str, String)>);

impl PathParams {
    /// Value of the named parameter, if captured.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// How specific a matcher is; higher ranks are tried first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Specificity {
    Pattern = 1,
    Exact = 2,
}

/// Trait for matching request paths.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns the captured parameters if the path matches.
    fn matches(&self, path: &str) -> Option<PathParams>;

    fn specificity(&self) -> Specificity;
}

/// Matches one path exactly.
#[derive(Debug, Clone)]
pub struct ExactMatcher {
    path: &'static str,
}

impl ExactMatcher {
    pub fn new(path: &'static str) -> Self {
        Self { path }
    }
}

impl Matcher for ExactMatcher {
    fn matches(&self, path: &str) -> Option<PathParams> {
        (path == self.path).then(PathParams::default)
    }

    fn specificity(&self) -> Specificity {
        Specificity::Exact
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(&'static str),
    Param(&'static str),
}

/// Matches a fixed number of `/`-separated segments, capturing `{name}` ones.
#[derive(Debug, Clone)]
pub struct SegmentMatcher {
    segments: Vec<Segment>,
}

impl SegmentMatcher {
    /// Compile a pattern such as `/api/font/{family}/{weight}`.
    pub fn new(pattern: &'static str) -> Self {
        let segments = pattern
            .trim_start_matches('/')
            .split('/')
            .map(|segment| {
                match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                    Some(name) => Segment::Param(name),
                    None => Segment::Literal(segment),
                }
            })
            .collect();
        Self { segments }
    }
}

impl Matcher for SegmentMatcher {
    fn matches(&self, path: &str) -> Option<PathParams> {
        let parts: Vec<&str> = path.strip_prefix('/')?.split('/').collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = Vec::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) if *literal == part => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => {
                    let value = percent_decode_str(part).decode_utf8_lossy().into_owned();
                    params.push((*name, value));
                }
            }
        }
        Some(PathParams(params))
    }

    fn specificity(&self) -> Specificity {
        Specificity::Pattern
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_matcher() {
        let matcher = ExactMatcher::new("/favicon.ico");
        assert_eq!(matcher.matches("/favicon.ico"), Some(PathParams::default()));
        assert_eq!(matcher.matches("/favicon.ico/"), None);
        assert_eq!(matcher.matches("/FAVICON.ICO"), None); // Case sensitive
    }

    #[test]
    fn test_segment_matcher_captures() {
        let matcher = SegmentMatcher::new("/api/font/{family}/{weight}");

        let params = matcher.matches("/api/font/inter/400").unwrap();
        assert_eq!(params.get("family"), Some("inter"));
        assert_eq!(params.get("weight"), Some("400"));
        assert_eq!(params.get("text"), None);

        assert_eq!(matcher.matches("/api/font/inter"), None);
        assert_eq!(matcher.matches("/api/font/inter/400/hi"), None);
        assert_eq!(matcher.matches("/api/fonts/inter/400"), None);
    }

    #[test]
    fn test_segment_matcher_captures_empty_params() {
        let matcher = SegmentMatcher::new("/api/font/{family}/{weight}/{text}");

        let params = matcher.matches("/api/font/inter/400/").unwrap();
        assert_eq!(params.get("weight"), Some("400"));
        assert_eq!(params.get("text"), Some(""));

        let params = matcher.matches("/api/font/inter//x").unwrap();
        assert_eq!(params.get("weight"), Some(""));

        let params = matcher.matches("/api/font//400/x").unwrap();
        assert_eq!(params.get("family"), Some(""));
    }

    #[test]
    fn test_segment_matcher_decodes_params() {
        let matcher = SegmentMatcher::new("/api/font/{family}/{weight}/{text}");
        let params = matcher.matches("/api/font/roboto%20mono/700/Hello%20World").unwrap();
        assert_eq!(params.get("family"), Some("roboto mono"));
        assert_eq!(params.get("text"), Some("Hello World"));
    }

    #[test]
    fn test_specificity_order() {
        assert!(Specificity::Exact > Specificity::Pattern);
        assert_eq!(ExactMatcher::new("/x").specificity(), Specificity::Exact);
        assert_eq!(SegmentMatcher::new("/{x}").specificity(), Specificity::Pattern);
    }
}
