//! Regex fallback extraction
//!
//! Some pages are malformed enough that the DOM parser drops their `<link>`
//! elements, and some only advertise an image through Open Graph or Twitter
//! card metadata. These patterns scan the raw text instead.

use html_escape::decode_html_entities;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Fallback patterns in the order they are tried
///
/// Each declaration is matched with its attributes in either order. Capture
/// group 1 is the URL.
const ICON_PATTERN_SOURCES: &[&str] = &[
    r#"<link[^>]*rel=["'](?:shortcut\s+)?icon["'][^>]*href=["']([^"']+)["']"#,
    r#"<link[^>]*href=["']([^"']+)["'][^>]*rel=["'](?:shortcut\s+)?icon["']"#,
    r#"<link[^>]*rel=["']apple-touch-icon[^"']*["'][^>]*href=["']([^"']+)["']"#,
    r#"<link[^>]*href=["']([^"']+)["'][^>]*rel=["']apple-touch-icon[^"']*["']"#,
    r#"<meta[^>]*property=["']og:image["'][^>]*content=["']([^"']+)["']"#,
    r#"<meta[^>]*content=["']([^"']+)["'][^>]*property=["']og:image["']"#,
    r#"<meta[^>]*name=["']twitter:image["'][^>]*content=["']([^"']+)["']"#,
    r#"<meta[^>]*content=["']([^"']+)["'][^>]*name=["']twitter:image["']"#,
];

static ICON_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    ICON_PATTERN_SOURCES
        .iter()
        .filter_map(|source| match Regex::new(&format!("(?i){}", source)) {
            Ok(regex) => Some(regex),
            Err(e) => {
                tracing::error!("Skipping invalid icon pattern {}: {}", source, e);
                None
            }
        })
        .collect()
});

/// Finds an icon URL in raw HTML text
///
/// Patterns are tried in order and the first one that matches decides; a
/// match whose URL cannot be resolved moves on to the next pattern. Matches
/// are raw markup, so HTML entities are decoded before resolving.
///
/// # Arguments
///
/// * `html` - The page body
/// * `base_url` - The final page URL, for resolving relative matches
///
/// # Returns
///
/// * `Some(Url)` - The absolute URL of the first match
/// * `None` - No pattern matched
pub fn find_icon_url(html: &str, base_url: &Url) -> Option<Url> {
    for pattern in ICON_PATTERNS.iter() {
        let Some(href) = pattern.captures(html).and_then(|caps| caps.get(1)) else {
            continue;
        };

        let decoded = decode_html_entities(href.as_str().trim());
        match base_url.join(&decoded) {
            Ok(url) => return Some(url),
            Err(e) => tracing::debug!("Ignoring unresolvable icon match {:?}: {}", href.as_str(), e),
        }
    }

    None
}
