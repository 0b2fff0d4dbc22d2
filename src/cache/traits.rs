//! Cache gateway trait and error types
//!
//! This module defines the contract every icon cache backend implements. The
//! resolver only ever talks to a cache through [`IconCache`], so a host
//! application can plug in its own store (Redis, a shared database) next to
//! the built-in memory and SQLite backends.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur in a cache backend
///
/// None of these are fatal to a resolution: the resolver logs them at `warn`
/// and carries on without the cache.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache backend unavailable: {0}")]
    Unavailable(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Invalid cache TTL: {0}")]
    InvalidTtl(String),
}

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// Key-value store of resolved icons, keyed by origin
///
/// Implementations must be shareable across concurrent resolutions.
#[async_trait]
pub trait IconCache: Send + Sync {
    /// Looks up the data URI cached for an origin
    ///
    /// # Returns
    ///
    /// * `Ok(Some(data_uri))` - A live entry exists
    /// * `Ok(None)` - Miss, including entries whose TTL has passed
    /// * `Err(CacheError)` - The backend could not be reached
    async fn get(&self, origin: &str) -> CacheResult<Option<String>>;

    /// Stores (or refreshes) the data URI for an origin
    ///
    /// # Arguments
    ///
    /// * `origin` - The cache key (`scheme://host[:port]`)
    /// * `data_uri` - The encoded icon
    /// * `ttl` - How long the entry stays valid
    async fn put(&self, origin: &str, data_uri: &str, ttl: Duration) -> CacheResult<()>;
}
