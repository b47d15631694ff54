//! Key-value persistence for visits and their aggregates.
//!
//! The core only needs two primitives: read a set of keys and write a set
//! of keys. Backends make no multi-key transactional promise through this
//! interface; callers treat a combined `{visits, domains, transitions}`
//! write as logically atomic and accept the backend's guarantee.

mod memory;
mod disk;

pub use self::memory::MemoryStore;
pub use self::disk::RedbStore;

use crate::error::{JourneyError, Result};
use crate::types::{ClosedTab, JourneyData, TabId};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Key holding the visit list.
pub const VISITS_KEY: &str = "visits";
/// Key holding domain aggregates.
pub const DOMAINS_KEY: &str = "domains";
/// Key holding transition aggregates.
pub const TRANSITIONS_KEY: &str = "transitions";
/// Key holding the closed-tab journal.
pub const CLOSED_TABS_KEY: &str = "closedTabs";

/// Minimal key-value store.
pub trait KvStore: Send + Sync {
    /// Reads `keys`. Missing keys are absent from the result, not errors.
    fn get(&self, keys: &[&str]) -> Result<BTreeMap<String, Value>>;

    /// Writes every entry of `entries`.
    fn set(&self, entries: BTreeMap<String, Value>) -> Result<()>;
}

fn decode<T: DeserializeOwned + Default>(
    values: &mut BTreeMap<String, Value>,
    key: &str,
) -> Result<T> {
    match values.remove(key) {
        Some(Value::Null) | None => Ok(T::default()),
        Some(value) => serde_json::from_value(value).map_err(|e| JourneyError::Deserialization {
            key: key.to_string(),
            reason: e.to_string(),
        }),
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| JourneyError::Serialization(e.to_string()))
}

/// Loads the three journey collections, defaulting missing ones to empty.
pub fn load_data(store: &dyn KvStore) -> Result<JourneyData> {
    let mut values = store.get(&[VISITS_KEY, DOMAINS_KEY, TRANSITIONS_KEY])?;
    Ok(JourneyData {
        visits: decode(&mut values, VISITS_KEY)?,
        domains: decode(&mut values, DOMAINS_KEY)?,
        transitions: decode(&mut values, TRANSITIONS_KEY)?,
    })
}

/// Writes the three journey collections in one `set` call.
pub fn save_data(store: &dyn KvStore, data: &JourneyData) -> Result<()> {
    let mut entries = BTreeMap::new();
    entries.insert(VISITS_KEY.to_string(), encode(&data.visits)?);
    entries.insert(DOMAINS_KEY.to_string(), encode(&data.domains)?);
    entries.insert(TRANSITIONS_KEY.to_string(), encode(&data.transitions)?);
    store.set(entries)
}

/// Loads the closed-tab journal.
///
/// Tab IDs are stored as object keys, so they come back as strings.
pub fn load_closed_tabs(store: &dyn KvStore) -> Result<BTreeMap<TabId, ClosedTab>> {
    let mut values = store.get(&[CLOSED_TABS_KEY])?;
    let raw: BTreeMap<String, ClosedTab> = decode(&mut values, CLOSED_TABS_KEY)?;
    raw.into_iter()
        .map(|(key, entry)| {
            key.parse::<TabId>()
                .map(|tab_id| (tab_id, entry))
                .map_err(|e| JourneyError::Deserialization {
                    key: CLOSED_TABS_KEY.to_string(),
                    reason: format!("invalid tab id '{}': {}", key, e),
                })
        })
        .collect()
}

/// Writes the closed-tab journal.
pub fn save_closed_tabs(store: &dyn KvStore, closed: &BTreeMap<TabId, ClosedTab>) -> Result<()> {
    let raw: BTreeMap<String, &ClosedTab> = closed
        .iter()
        .map(|(tab_id, entry)| (tab_id.to_string(), entry))
        .collect();
    let mut entries = BTreeMap::new();
    entries.insert(CLOSED_TABS_KEY.to_string(), encode(&raw)?);
    store.set(entries)
}
