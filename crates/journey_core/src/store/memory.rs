//! In-process store.

use super::KvStore;
use crate::error::{JourneyError, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// Store keeping values in memory. Used by tests and embedders that
/// persist through their own mechanism.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<BTreeMap<String, Value>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys held.
    pub fn len(&self) -> usize {
        self.values.read().map(|v| v.len()).unwrap_or(0)
    }

    /// Whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KvStore for MemoryStore {
    fn get(&self, keys: &[&str]) -> Result<BTreeMap<String, Value>> {
        let values = self
            .values
            .read()
            .map_err(|_| JourneyError::Backend("memory store lock poisoned".to_string()))?;

        Ok(keys
            .iter()
            .filter_map(|key| values.get(*key).map(|v| (key.to_string(), v.clone())))
            .collect())
    }

    fn set(&self, entries: BTreeMap<String, Value>) -> Result<()> {
        let mut values = self
            .values
            .write()
            .map_err(|_| JourneyError::Backend("memory store lock poisoned".to_string()))?;
        values.extend(entries);
        Ok(())
    }
}
