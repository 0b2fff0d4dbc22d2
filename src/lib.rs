//! Bookmark Icons: favicon resolution and caching for bookmark collections
//!
//! This crate turns arbitrary user-supplied URLs into embeddable site icons.
//! A single resolution walks a fixed cascade (cache, known services, standard
//! icon paths, page `<link>` metadata, a regex fallback, and finally the
//! default `/favicon.ico`), and batch resolution fans that cascade out over a
//! bounded number of concurrent requests while importing Netscape bookmark
//! files.

pub mod bookmarks;
pub mod cache;
pub mod config;
pub mod resolver;
pub mod url;

use thiserror::Error;

/// Main error type for bookmark-icons operations
#[derive(Debug, Error)]
pub enum IconError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Cache error: {0}")]
    Cache(#[from] cache::CacheError),

    #[error("Bookmark file error: {0}")]
    Bookmarks(#[from] bookmarks::BookmarkError),

    #[error("Resolution error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Terminal outcomes of a single icon resolution
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("No usable icon found for {origin}")]
    NotFound { origin: String },

    #[error("Icon resolution for {origin} exceeded the {seconds}s deadline")]
    DeadlineExceeded { origin: String, seconds: u64 },
}

impl ResolveError {
    /// The origin the failed resolution was keyed by
    pub fn origin(&self) -> &str {
        match self {
            Self::NotFound { origin } | Self::DeadlineExceeded { origin, .. } => origin,
        }
    }
}

/// Result type alias for bookmark-icons operations
pub type Result<T> = std::result::Result<T, IconError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for single icon resolutions
pub type ResolveResult<T> = std::result::Result<T, ResolveError>;

// Re-export commonly used types
pub use bookmarks::Bookmark;
pub use cache::{IconCache, MemoryCache, SqliteCache};
pub use config::Config;
pub use resolver::{BatchReport, FaviconResolver, IconTarget, ResolvedIcon, Stage};
pub use url::{bare_domain, ensure_scheme, normalize_origin};
