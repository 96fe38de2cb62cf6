//! Font resolver.
//!
//! # Data Flow
//! ```text
//! FontRequest { family, weight, text? }
//!     → stylesheet URL (family title-cased, text query-escaped)
//!     → stylesheet fetch with desktop User-Agent
//!     → first `src: url(..) format('opentype'|'truetype')`
//!     → font file fetch
//!     → bytes served as font/ttf
//! ```
//!
//! # Design Decisions
//! - One regex scan over the stylesheet, no CSS parsing
//! - No match is a 404 and no font fetch happens
//! - The font host's content type is ignored

use std::sync::LazyLock;

use axum::{
    body::Bytes,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;

use crate::config::{CacheConfig, UpstreamConfig};
use crate::error::{ProxyError, ProxyResult};
use crate::routing::PathParams;
use crate::upstream::client::UpstreamClient;

/// Content type of every font response.
pub const FONT_CONTENT_TYPE: &str = "font/ttf";

/// Bytes left as-is in the text hint: alphanumerics and `-_.~`.
const QUERY_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

static FONT_SOURCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"src: url\((.+)\) format\('(opentype|truetype)'\)").expect("valid font source pattern")
});

/// Parameters of a font lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontRequest {
    pub family: String,
    pub weight: String,
    pub text: Option<String>,
}

impl FontRequest {
    /// Build from captured route parameters. `None` without a family.
    ///
    /// Weight is passed through even when empty; empty text means no subset.
    pub fn from_params(params: &PathParams) -> Option<Self> {
        let family = params.get("family").filter(|family| !family.is_empty())?;
        let weight = params.get("weight")?;
        Some(Self {
            family: family.to_string(),
            weight: weight.to_string(),
            text: params
                .get("text")
                .filter(|text| !text.is_empty())
                .map(str::to_string),
        })
    }

    /// Stylesheet query URL under `base`.
    pub fn stylesheet_url(&self, base: &str) -> String {
        let mut url = format!(
            "{}?family={}:wght@{}",
            base,
            normalize_family(&self.family),
            self.weight
        );
        if let Some(text) = &self.text {
            url.push_str("&text=");
            url.push_str(&query_escape(text));
        }
        url
    }
}

/// Query-component escaping with spaces as `+`.
fn query_escape(text: &str) -> String {
    text.split(' ')
        .map(|part| utf8_percent_encode(part, QUERY_ESCAPE).to_string())
        .collect::<Vec<_>>()
        .join("+")
}

/// Uppercase the first character and lowercase the rest.
///
/// Multi-word names are not title-cased per word: `OPEN-SANS` → `Open-sans`.
pub fn normalize_family(family: &str) -> String {
    let mut chars = family.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// First TrueType/OpenType source URL declared in a stylesheet.
pub fn find_font_source(stylesheet: &str) -> Option<&str> {
    FONT_SOURCE
        .captures(stylesheet)
        .and_then(|captures| captures.get(1))
        .map(|url| url.as_str())
}

/// Resolve a font request to the bytes of the font file.
pub async fn resolve_font(
    client: &UpstreamClient,
    upstreams: &UpstreamConfig,
    request: &FontRequest,
) -> ProxyResult<Bytes> {
    let stylesheet_url = request.stylesheet_url(&upstreams.font_stylesheet_url);
    tracing::debug!(
        family = %request.family,
        weight = %request.weight,
        url = %stylesheet_url,
        "Fetching font stylesheet"
    );

    let stylesheet = client
        .fetch_as(&stylesheet_url, &upstreams.font_user_agent)
        .await?;
    let css = client.read_text(stylesheet).await?;

    let Some(source) = find_font_source(&css) else {
        tracing::info!(family = %request.family, weight = %request.weight, "No font source in stylesheet");
        return Err(ProxyError::ExtractionNotFound);
    };

    tracing::debug!(source = %source, "Fetching font file");
    let font = client.fetch(source).await?;
    client.read_bytes(font).await
}

/// Serve resolved font bytes.
pub fn font_response(bytes: Bytes, cache: &CacheConfig) -> Response {
    let mut response = (StatusCode::OK, bytes).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(FONT_CONTENT_TYPE));
    if let Ok(directive) = HeaderValue::from_str(&cache.font_directive()) {
        headers.insert(header::CACHE_CONTROL, directive);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(family: &str, weight: &str, text: Option<&str>) -> FontRequest {
        FontRequest {
            family: family.into(),
            weight: weight.into(),
            text: text.map(Into::into),
        }
    }

    #[test]
    fn test_normalize_family() {
        assert_eq!(normalize_family("inter"), "Inter");
        assert_eq!(normalize_family("OPEN-SANS"), "Open-sans");
        assert_eq!(normalize_family("roboto mono"), "Roboto mono");
        assert_eq!(normalize_family("x"), "X");
        assert_eq!(normalize_family(""), "");
    }

    #[test]
    fn test_stylesheet_url() {
        let base = "https://fonts.googleapis.com/css2";
        assert_eq!(
            request("inter", "400", None).stylesheet_url(base),
            "https://fonts.googleapis.com/css2?family=Inter:wght@400"
        );
        assert_eq!(
            request("LATO", "700", Some("Hello World&more")).stylesheet_url(base),
            "https://fonts.googleapis.com/css2?family=Lato:wght@700&text=Hello+World%26more"
        );
        assert_eq!(
            request("inter", "400", Some("a*b~c")).stylesheet_url(base),
            "https://fonts.googleapis.com/css2?family=Inter:wght@400&text=a%2Ab~c"
        );
    }

    #[test]
    fn test_text_escaping_keeps_tilde_and_escapes_star() {
        assert_eq!(query_escape("a*b~c d"), "a%2Ab~c+d");
        assert_eq!(query_escape("-_."), "-_.");
        assert_eq!(query_escape("é+/"), "%C3%A9%2B%2F");
        assert_eq!(query_escape("  "), "++");
    }

    #[test]
    fn test_from_params() {
        let router = crate::routing::Router::standard();

        let params = router.match_path("/api/font/inter/400").params;
        assert_eq!(FontRequest::from_params(&params), Some(request("inter", "400", None)));

        let params = router.match_path("/api/font/inter/400/abc").params;
        assert_eq!(
            FontRequest::from_params(&params),
            Some(request("inter", "400", Some("abc")))
        );

        let params = router.match_path("/api/font/inter/400/").params;
        assert_eq!(FontRequest::from_params(&params), Some(request("inter", "400", None)));

        let params = router.match_path("/api/font/inter//x").params;
        assert_eq!(FontRequest::from_params(&params), Some(request("inter", "", Some("x"))));

        let params = router.match_path("/api/font//400").params;
        assert_eq!(FontRequest::from_params(&params), None);

        assert_eq!(FontRequest::from_params(&PathParams::default()), None);
    }

    #[test]
    fn test_find_truetype_source() {
        let css = "@font-face {\n  font-family: 'Inter';\n  src: url(https://fonts.gstatic.com/s/inter/v13/a.ttf) format('truetype');\n}\n";
        assert_eq!(
            find_font_source(css),
            Some("https://fonts.gstatic.com/s/inter/v13/a.ttf")
        );
    }

    #[test]
    fn test_find_first_opentype_source() {
        let css = "src: url(https://x/one.otf) format('opentype');\nsrc: url(https://x/two.ttf) format('truetype');";
        assert_eq!(find_font_source(css), Some("https://x/one.otf"));
    }

    #[test]
    fn test_no_source_for_woff2() {
        let css = "src: url(https://fonts.gstatic.com/s/inter/v13/a.woff2) format('woff2');";
        assert_eq!(find_font_source(css), None);
        assert_eq!(find_font_source(""), None);
    }

    #[tokio::test]
    async fn test_font_response_headers() {
        let response = font_response(Bytes::from_static(b"\0\x01\0\0"), &CacheConfig::default());
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "font/ttf");
        assert_eq!(response.headers()[header::CACHE_CONTROL], "public, max-age=86400");

        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"\0\x01\0\0");
    }
}
