//! Process-local icon cache
//!
//! Entries live in a `HashMap` behind a mutex and are dropped lazily when a
//! read finds them expired.

use crate::cache::entry::CachedIcon;
use crate::cache::traits::{CacheError, CacheResult, IconCache};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// In-memory icon cache
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CachedIcon>>,
}

impl MemoryCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included
    pub fn len(&self) -> usize {
        self.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    /// Returns true if nothing is stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every expired entry
    ///
    /// # Returns
    ///
    /// The number of entries removed
    pub fn purge_expired(&self) -> CacheResult<usize> {
        let now = Utc::now();
        let mut entries = self.lock()?;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired_at(now));
        Ok(before - entries.len())
    }

    fn lock(&self) -> CacheResult<MutexGuard<'_, HashMap<String, CachedIcon>>> {
        self.entries
            .lock()
            .map_err(|_| CacheError::Unavailable("memory cache lock poisoned".to_string()))
    }
}

#[async_trait]
impl IconCache for MemoryCache {
    async fn get(&self, origin: &str) -> CacheResult<Option<String>> {
        let mut entries = self.lock()?;

        match entries.get(origin) {
            Some(entry) if entry.is_expired() => {
                tracing::debug!("Cache entry for {} expired", origin);
                entries.remove(origin);
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.data_uri.clone())),
            None => Ok(None),
        }
    }

    async fn put(&self, origin: &str, data_uri: &str, ttl: Duration) -> CacheResult<()> {
        let entry = CachedIcon::new(data_uri, ttl)?;
        self.lock()?.insert(origin.to_string(), entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::DEFAULT_ICON_TTL;

    const ORIGIN: &str = "https://example.com";
    const ICON: &str = "data:image/png;base64,iVBORw0KGgo=";

    #[tokio::test]
    async fn test_round_trip() {
        let cache = MemoryCache::new();
        cache.put(ORIGIN, ICON, DEFAULT_ICON_TTL).await.unwrap();

        assert_eq!(cache.get(ORIGIN).await.unwrap(), Some(ICON.to_string()));
    }

    #[tokio::test]
    async fn test_miss() {
        let cache = MemoryCache::new();
        assert_eq!(cache.get(ORIGIN).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let cache = MemoryCache::new();
        cache.put(ORIGIN, "data:,old", DEFAULT_ICON_TTL).await.unwrap();
        cache.put(ORIGIN, ICON, DEFAULT_ICON_TTL).await.unwrap();

        assert_eq!(cache.get(ORIGIN).await.unwrap(), Some(ICON.to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_expired_entry_misses_and_is_dropped() {
        let cache = MemoryCache::new();
        cache.put(ORIGIN, ICON, Duration::from_millis(20)).await.unwrap();

        tokio::time::sleep(Duration::from_millis(60)).await;

        assert_eq!(cache.get(ORIGIN).await.unwrap(), None);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let cache = MemoryCache::new();
        cache.put("https://a.example", ICON, Duration::ZERO).await.unwrap();
        cache.put("https://b.example", ICON, DEFAULT_ICON_TTL).await.unwrap();

        assert_eq!(cache.purge_expired().unwrap(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_origins_are_independent() {
        let cache = MemoryCache::new();
        cache.put("https://a.example", "data:,a", DEFAULT_ICON_TTL).await.unwrap();

        assert_eq!(cache.get("https://b.example").await.unwrap(), None);
        assert_eq!(cache.get("http://a.example").await.unwrap(), None);
    }
}
