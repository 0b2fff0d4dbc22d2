//! Icon cache gateway
//!
//! This module stores resolved icons keyed by origin:
//! - the [`IconCache`] trait every backend implements
//! - a process-local [`MemoryCache`]
//! - a persistent [`SqliteCache`]
//!
//! Entries expire after a TTL (seven days unless configured otherwise). Only
//! successful resolutions are ever written; failures are not cached.

mod entry;
mod memory;
mod schema;
mod sqlite;
mod traits;

pub use entry::CachedIcon;
pub use memory::MemoryCache;
pub use sqlite::SqliteCache;
pub use traits::{CacheError, CacheResult, IconCache};

use crate::config::{CacheBackend, CacheConfig, MAX_TTL_HOURS};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Default lifetime of a cached icon: seven days
pub const DEFAULT_ICON_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Longest lifetime an entry is stored with; longer TTLs are capped
///
/// Keeps expiry timestamps within four-digit years.
pub const MAX_ICON_TTL: Duration = Duration::from_secs(MAX_TTL_HOURS * 60 * 60);

/// Opens the cache backend selected by the configuration
///
/// # Arguments
///
/// * `config` - The cache section of the configuration
///
/// # Returns
///
/// * `Ok(Some(cache))` - The configured backend
/// * `Ok(None)` - Caching is disabled (`backend = "none"`)
/// * `Err(CacheError)` - The SQLite database could not be opened
pub fn open_cache(config: &CacheConfig) -> CacheResult<Option<Arc<dyn IconCache>>> {
    match config.backend {
        CacheBackend::Memory => Ok(Some(Arc::new(MemoryCache::new()))),
        CacheBackend::Sqlite => {
            tracing::info!("Opening icon cache database: {}", config.database_path);
            let cache = SqliteCache::new(Path::new(&config.database_path))?;
            Ok(Some(Arc::new(cache)))
        }
        CacheBackend::None => {
            tracing::info!("Icon cache disabled");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_ttl_is_seven_days() {
        assert_eq!(DEFAULT_ICON_TTL.as_secs(), 604_800);
    }

    #[test]
    fn test_open_memory_backend() {
        let config = CacheConfig::default();
        assert!(open_cache(&config).unwrap().is_some());
    }

    #[test]
    fn test_open_disabled_backend() {
        let config = CacheConfig {
            backend: CacheBackend::None,
            ..CacheConfig::default()
        };
        assert!(open_cache(&config).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_open_sqlite_backend() {
        let dir = TempDir::new().unwrap();
        let config = CacheConfig {
            backend: CacheBackend::Sqlite,
            database_path: dir.path().join("icons.db").display().to_string(),
            ..CacheConfig::default()
        };

        let cache = open_cache(&config).unwrap().unwrap();
        cache
            .put("https://example.com", "data:,x", DEFAULT_ICON_TTL)
            .await
            .unwrap();
        assert_eq!(
            cache.get("https://example.com").await.unwrap(),
            Some("data:,x".to_string())
        );
    }
}
