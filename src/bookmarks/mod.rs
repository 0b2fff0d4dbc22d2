//! Netscape bookmark files
//!
//! This module reads and writes the `NETSCAPE-Bookmark-file-1` format that
//! browsers use for bookmark import and export:
//! - `import` parses the `<A HREF>` entries of a file, optionally base64 wrapped
//! - `export` writes bookmarks back out with their icons embedded
//!
//! [`Bookmark`] implements [`IconTarget`], so a parsed file can be handed
//! straight to [`FaviconResolver::resolve_batch`](crate::FaviconResolver::resolve_batch).

mod export;
mod import;

pub use export::{export_bookmarks_base64, export_bookmarks_html};
pub use import::{parse_bookmarks_base64, parse_bookmarks_html};

use crate::config::ExportConfig;
use crate::resolver::IconTarget;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors from decoding a wrapped bookmark file
#[derive(Debug, Error)]
pub enum BookmarkError {
    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Bookmark file is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// A single bookmark entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bookmark {
    pub title: String,
    pub url: String,

    /// A data URI, a plain icon URL, or empty
    pub icon: String,

    pub add_date: Option<DateTime<Utc>>,
    pub last_modified: Option<DateTime<Utc>>,
}

impl Bookmark {
    /// Creates a bookmark with no icon and no dates
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            icon: String::new(),
            add_date: None,
            last_modified: None,
        }
    }

    /// Returns true if the icon is already an embedded data URI
    pub fn has_embedded_icon(&self) -> bool {
        self.icon.starts_with("data:")
    }
}

impl IconTarget for Bookmark {
    fn url(&self) -> &str {
        &self.url
    }

    fn set_icon(&mut self, icon: String) {
        self.icon = icon;
    }
}

/// Folder headings written into an export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub menu_heading: String,
    pub toolbar_heading: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::from(&ExportConfig::default())
    }
}

impl From<&ExportConfig> for ExportOptions {
    fn from(config: &ExportConfig) -> Self {
        Self {
            menu_heading: config.menu_heading.clone(),
            toolbar_heading: config.toolbar_heading.clone(),
        }
    }
}
