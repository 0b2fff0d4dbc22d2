use serde::Deserialize;
use std::time::Duration;

/// Browser identity sent with page fetches unless the configuration overrides it
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Main configuration structure for bookmark-icons
///
/// Every section and key is optional; a missing file section falls back to
/// the defaults documented on each field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

/// Resolution behavior configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Timeout for fetching the target HTML page, in seconds (default 30)
    #[serde(rename = "page-timeout-secs")]
    pub page_timeout_secs: u64,

    /// Timeout for each HEAD probe of a standard icon path, in seconds (default 10)
    #[serde(rename = "probe-timeout-secs")]
    pub probe_timeout_secs: u64,

    /// Timeout for downloading an icon asset, in seconds (default 15)
    #[serde(rename = "download-timeout-secs")]
    pub download_timeout_secs: u64,

    /// Maximum number of redirects followed when fetching the page (default 10)
    #[serde(rename = "max-redirects")]
    pub max_redirects: u32,

    /// Maximum number of resolutions in flight during a batch (default 10)
    #[serde(rename = "max-concurrent-resolutions")]
    pub max_concurrent_resolutions: usize,

    /// Optional bound on a whole single-URL cascade, in seconds
    #[serde(rename = "overall-deadline-secs")]
    pub overall_deadline_secs: Option<u64>,

    /// Optional replacement for the browser User-Agent
    #[serde(rename = "user-agent")]
    pub user_agent: Option<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            page_timeout_secs: 30,
            probe_timeout_secs: 10,
            download_timeout_secs: 15,
            max_redirects: 10,
            max_concurrent_resolutions: 10,
            overall_deadline_secs: None,
            user_agent: None,
        }
    }
}

impl ResolverConfig {
    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }

    pub fn overall_deadline(&self) -> Option<Duration> {
        self.overall_deadline_secs.map(Duration::from_secs)
    }

    /// The User-Agent header value for page fetches
    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }
}

/// Which cache backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Process-local map, lost on exit
    #[default]
    Memory,
    /// SQLite database at `database-path`
    Sqlite,
    /// No caching at all
    None,
}

/// Longest accepted icon lifetime, in hours (ten years)
pub const MAX_TTL_HOURS: u64 = 87_600;

/// Cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub backend: CacheBackend,

    /// Path to the SQLite database file (sqlite backend only)
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Lifetime of a cached icon, in hours (default 168, one week)
    #[serde(rename = "ttl-hours")]
    pub ttl_hours: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::Memory,
            database_path: "favicons.db".to_string(),
            ttl_hours: 168,
        }
    }
}

impl CacheConfig {
    /// The icon lifetime, capped at [`MAX_TTL_HOURS`]
    pub fn ttl(&self) -> Duration {
        let hours = self.ttl_hours.min(MAX_TTL_HOURS);
        Duration::from_secs(hours.saturating_mul(60 * 60))
    }
}

/// Bookmark export configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Text of the top-level `<H1>` heading
    #[serde(rename = "menu-heading")]
    pub menu_heading: String,

    /// Name of the toolbar folder holding the bookmarks
    #[serde(rename = "toolbar-heading")]
    pub toolbar_heading: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            menu_heading: "Bookmarks Menu".to_string(),
            toolbar_heading: "Bookmarks Toolbar".to_string(),
        }
    }
}
