//! HTML icon candidate extraction
//!
//! This module reads `<link>` elements from a fetched page and ranks the ones
//! that declare an icon.
//!
//! # Ranking
//!
//! | rel | priority |
//! |-----|----------|
//! | `icon` | 1 |
//! | `shortcut icon` | 2 |
//! | `apple-touch-icon` | 3 |
//! | `apple-touch-icon-precomposed` | 4 |
//! | `fluid-icon` | 5 |
//! | `mask-icon` | 6 |
//! | `alternate icon` | 7 |
//!
//! A `sizes` attribute mentioning 32x32, 64x64 or 128x128 improves the
//! priority by one. Lower is tried first; ties keep document order.

use scraper::{Html, Selector};
use url::Url;

/// Recognised `rel` values and their base priority
pub const REL_PRIORITIES: &[(&str, u32)] = &[
    ("icon", 1),
    ("shortcut icon", 2),
    ("apple-touch-icon", 3),
    ("apple-touch-icon-precomposed", 4),
    ("fluid-icon", 5),
    ("mask-icon", 6),
    ("alternate icon", 7),
];

/// Declared sizes that make a candidate preferable
pub const PREFERRED_SIZES: &[&str] = &["32x32", "64x64", "128x128"];

/// An icon URL declared by the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconCandidate {
    /// Absolute icon URL
    pub url: Url,
    /// Lower is preferred
    pub priority: u32,
}

/// Looks up the base priority of a normalized `rel` value
pub fn rel_priority(rel: &str) -> Option<u32> {
    REL_PRIORITIES
        .iter()
        .find(|(name, _)| *name == rel)
        .map(|(_, priority)| *priority)
}

/// Extracts and ranks the icon candidates of a page
///
/// # Arguments
///
/// * `html` - The page body
/// * `base_url` - The final page URL, for resolving relative hrefs
///
/// # Returns
///
/// Candidates sorted by ascending priority, document order within a priority
///
/// # Example
///
/// ```
/// use bookmark_icons::resolver::extract_icon_candidates;
/// use url::Url;
///
/// let html = r#"<link rel="apple-touch-icon" href="/touch.png"><link rel="icon" href="/i.png">"#;
/// let base = Url::parse("https://example.com/page").unwrap();
/// let candidates = extract_icon_candidates(html, &base);
/// assert_eq!(candidates[0].url.as_str(), "https://example.com/i.png");
/// ```
pub fn extract_icon_candidates(html: &str, base_url: &Url) -> Vec<IconCandidate> {
    let document = Html::parse_document(html);
    let Ok(link_selector) = Selector::parse("link") else {
        return Vec::new();
    };

    let mut candidates: Vec<IconCandidate> = document
        .select(&link_selector)
        .filter_map(|element| {
            let link = element.value();
            let rel = link.attr("rel")?.trim().to_lowercase();
            let mut priority = rel_priority(&rel)?;

            let href = link.attr("href")?.trim();
            if href.is_empty() {
                return None;
            }

            let sizes = link.attr("sizes").unwrap_or("").trim().to_lowercase();
            if PREFERRED_SIZES.iter().any(|size| sizes.contains(size)) {
                priority = priority.saturating_sub(1);
            }

            let url = base_url.join(href).ok()?;
            Some(IconCandidate { url, priority })
        })
        .collect();

    // Stable, so equal priorities keep document order
    candidates.sort_by_key(|candidate| candidate.priority);
    candidates
}
