//! Short-lived read cache.
//!
//! Readers may see a snapshot up to `ttl` old. Writers must call
//! [`ReadCache::invalidate`] after any mutation they want reflected
//! immediately.

use crate::error::Result;
use crate::types::Timestamp;
use std::time::Duration;
use tracing::trace;

/// A single cached value with a load time.
#[derive(Debug, Clone)]
pub struct ReadCache<T> {
    ttl_ms: i64,
    entry: Option<(Timestamp, T)>,
}

impl<T> ReadCache<T> {
    /// Creates an empty cache. A zero `ttl` disables caching.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl_ms: i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX),
            entry: None,
        }
    }

    /// The cached value if it was loaded less than `ttl` before `now`.
    pub fn get(&self, now: Timestamp) -> Option<&T> {
        match &self.entry {
            Some((loaded_at, value)) if now.saturating_sub(*loaded_at) < self.ttl_ms => Some(value),
            _ => None,
        }
    }

    /// Stores `value` as loaded at `now`.
    pub fn put(&mut self, now: Timestamp, value: T) {
        self.entry = Some((now, value));
    }

    /// Returns the fresh cached value or loads, caches and returns a new one.
    ///
    /// A failed load leaves the cache empty.
    pub fn get_or_try_load(
        &mut self,
        now: Timestamp,
        load: impl FnOnce() -> Result<T>,
    ) -> Result<&T> {
        let fresh = self.get(now).is_some();
        let entry = match self.entry.take() {
            Some(entry) if fresh => entry,
            _ => {
                trace!("read cache miss");
                (now, load()?)
            }
        };
        let (_, value) = self.entry.insert(entry);
        Ok(value)
    }

    /// Drops the cached value.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// Whether a value is cached, fresh or not.
    pub fn is_populated(&self) -> bool {
        self.entry.is_some()
    }
}
