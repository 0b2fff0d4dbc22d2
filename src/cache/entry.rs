use crate::cache::traits::{CacheError, CacheResult};
use crate::cache::MAX_ICON_TTL;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// A cached icon together with its validity window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedIcon {
    /// The encoded icon (`data:<type>;base64,...`)
    pub data_uri: String,

    /// When the icon was stored
    pub stored_at: DateTime<Utc>,

    /// When the entry stops being served
    pub expires_at: DateTime<Utc>,
}

impl CachedIcon {
    /// Creates an entry stored now that lives for `ttl`
    ///
    /// TTLs beyond [`MAX_ICON_TTL`] are capped.
    ///
    /// # Arguments
    ///
    /// * `data_uri` - The encoded icon
    /// * `ttl` - Time to live
    ///
    /// # Returns
    ///
    /// * `Ok(CachedIcon)` - The new entry
    /// * `Err(CacheError::InvalidTtl)` - The expiry does not fit in a timestamp
    pub fn new(data_uri: impl Into<String>, ttl: Duration) -> CacheResult<Self> {
        Self::stored_at(data_uri, Utc::now(), ttl)
    }

    /// Creates an entry with an explicit storage time
    pub fn stored_at(
        data_uri: impl Into<String>,
        stored_at: DateTime<Utc>,
        ttl: Duration,
    ) -> CacheResult<Self> {
        let ttl = chrono::Duration::from_std(ttl.min(MAX_ICON_TTL))
            .map_err(|e| CacheError::InvalidTtl(e.to_string()))?;
        let expires_at = stored_at
            .checked_add_signed(ttl)
            .ok_or_else(|| CacheError::InvalidTtl("expiry overflows the calendar".to_string()))?;

        Ok(Self {
            data_uri: data_uri.into(),
            stored_at,
            expires_at,
        })
    }

    /// Checks if the entry has expired as of now
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Checks if the entry has expired as of `now`
    ///
    /// An entry is dead from its expiry instant onward, so a zero TTL is
    /// never served.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
