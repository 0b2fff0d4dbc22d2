//! Bookmark file parsing

use super::{Bookmark, BookmarkError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Selector};

/// Parses every `<A HREF>` entry of a bookmark file
///
/// Folder structure is flattened; entries come back in document order.
/// Anchors with an empty `HREF` are dropped.
///
/// # Arguments
///
/// * `html` - The bookmark file contents
///
/// # Returns
///
/// The bookmarks found, possibly none
pub fn parse_bookmarks_html(html: &str) -> Vec<Bookmark> {
    let document = Html::parse_document(html);

    let selector = match Selector::parse("a[href]") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    let bookmarks: Vec<Bookmark> = document
        .select(&selector)
        .filter_map(parse_anchor)
        .collect();

    tracing::debug!("Parsed {} bookmarks", bookmarks.len());
    bookmarks
}

/// Decodes a base64 wrapped bookmark file and parses it
pub fn parse_bookmarks_base64(data: &str) -> Result<Vec<Bookmark>, BookmarkError> {
    let compact: String = data.split_ascii_whitespace().collect();
    let bytes = STANDARD.decode(compact)?;
    let html = String::from_utf8(bytes)?;
    Ok(parse_bookmarks_html(&html))
}

fn parse_anchor(anchor: ElementRef<'_>) -> Option<Bookmark> {
    let element = anchor.value();

    let url = element.attr("href")?.trim();
    if url.is_empty() {
        return None;
    }

    let title = anchor.text().collect::<String>().trim().to_string();
    let icon = element
        .attr("icon_uri")
        .or_else(|| element.attr("icon"))
        .unwrap_or_default()
        .trim()
        .to_string();

    Some(Bookmark {
        title,
        url: url.to_string(),
        icon,
        add_date: element.attr("add_date").and_then(parse_timestamp),
        last_modified: element.attr("last_modified").and_then(parse_timestamp),
    })
}

/// Unix seconds; anything unparseable counts as absent
fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let secs = value.trim().parse::<i64>().ok()?;
    DateTime::from_timestamp(secs, 0)
}
