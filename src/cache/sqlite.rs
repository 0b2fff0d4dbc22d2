//! SQLite icon cache
//!
//! This module provides a persistent implementation of the IconCache trait.
//! Timestamps are stored as fixed-width RFC 3339 strings (millisecond
//! precision, `Z` suffix) so expiry checks can be done in SQL with plain
//! string comparison.

use crate::cache::entry::CachedIcon;
use crate::cache::schema::initialize_schema;
use crate::cache::traits::{CacheError, CacheResult, IconCache};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// SQLite cache backend
pub struct SqliteCache {
    conn: Mutex<Connection>,
}

impl SqliteCache {
    /// Opens (or creates) a cache database
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteCache)` - Successfully opened/created database
    /// * `Err(CacheError)` - Failed to open database
    pub fn new(path: &Path) -> CacheResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> CacheResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Deletes every expired row
    ///
    /// # Returns
    ///
    /// The number of rows removed
    pub fn purge_expired(&self) -> CacheResult<usize> {
        let now = to_db_timestamp(Utc::now());
        let removed = self
            .lock()?
            .execute("DELETE FROM favicons WHERE expires_at <= ?1", params![now])?;
        Ok(removed)
    }

    /// Number of stored rows, expired ones included
    pub fn len(&self) -> CacheResult<usize> {
        let count: i64 = self
            .lock()?
            .query_row("SELECT COUNT(*) FROM favicons", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Stores a prepared entry
    pub fn insert_entry(&self, origin: &str, entry: &CachedIcon) -> CacheResult<()> {
        self.lock()?.execute(
            "INSERT INTO favicons (origin, data_uri, stored_at, expires_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(origin) DO UPDATE SET
                data_uri = excluded.data_uri,
                stored_at = excluded.stored_at,
                expires_at = excluded.expires_at",
            params![
                origin,
                entry.data_uri,
                to_db_timestamp(entry.stored_at),
                to_db_timestamp(entry.expires_at)
            ],
        )?;
        Ok(())
    }

    fn lock(&self) -> CacheResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| CacheError::Unavailable("sqlite cache lock poisoned".to_string()))
    }
}

#[async_trait]
impl IconCache for SqliteCache {
    async fn get(&self, origin: &str) -> CacheResult<Option<String>> {
        let now = to_db_timestamp(Utc::now());
        let conn = self.lock()?;

        let live: Option<String> = conn
            .query_row(
                "SELECT data_uri FROM favicons WHERE origin = ?1 AND expires_at > ?2",
                params![origin, now],
                |row| row.get(0),
            )
            .optional()?;

        if live.is_none() {
            let purged = conn.execute(
                "DELETE FROM favicons WHERE origin = ?1 AND expires_at <= ?2",
                params![origin, now],
            )?;
            if purged > 0 {
                tracing::debug!("Cache entry for {} expired", origin);
            }
        }

        Ok(live)
    }

    async fn put(&self, origin: &str, data_uri: &str, ttl: Duration) -> CacheResult<()> {
        let entry = CachedIcon::new(data_uri, ttl)?;
        self.insert_entry(origin, &entry)
    }
}

fn to_db_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
