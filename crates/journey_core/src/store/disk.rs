//! Durable store backed by redb.
//!
//! Each value is kept as a 32-byte blake3 checksum of its JSON encoding
//! followed by the zstd-compressed JSON. Reads verify the checksum so a
//! damaged value surfaces as `CorruptedValue` instead of garbage.

use super::KvStore;
use crate::error::{JourneyError, Result};
use redb::{Database, TableDefinition, TableError};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

const VALUES_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("values");

const CHECKSUM_LEN: usize = 32;

/// Store persisting values in a single redb database file.
///
/// A `set` call is one redb write transaction, so the combined journey
/// write is atomic on this backend.
pub struct RedbStore {
    db: Database,
    path: PathBuf,
    compression_level: i32,
}

impl RedbStore {
    /// Opens the database at `path`, creating it if missing.
    pub fn open(path: impl AsRef<Path>, compression_level: i32) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::create(&path)?;
        debug!(path = %path.display(), "opened journey store");

        Ok(Self {
            db,
            path,
            compression_level,
        })
    }

    /// Path of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn encode_value(&self, value: &Value) -> Result<Vec<u8>> {
        let json =
            serde_json::to_vec(value).map_err(|e| JourneyError::Serialization(e.to_string()))?;
        let checksum = blake3::hash(&json);
        let compressed = zstd::encode_all(json.as_slice(), self.compression_level)
            .map_err(|e| JourneyError::Compression(e.to_string()))?;

        let mut bytes = Vec::with_capacity(CHECKSUM_LEN + compressed.len());
        bytes.extend_from_slice(checksum.as_bytes());
        bytes.extend_from_slice(&compressed);
        Ok(bytes)
    }

    fn decode_value(key: &str, bytes: &[u8]) -> Result<Value> {
        if bytes.len() < CHECKSUM_LEN {
            return Err(JourneyError::CorruptedValue {
                key: key.to_string(),
                expected: "32-byte checksum".to_string(),
                actual: format!("{} bytes", bytes.len()),
            });
        }

        let (expected, compressed) = bytes.split_at(CHECKSUM_LEN);
        let json = zstd::decode_all(compressed).map_err(|e| JourneyError::Compression(e.to_string()))?;

        let actual = blake3::hash(&json);
        if actual.as_bytes().as_slice() != expected {
            return Err(JourneyError::CorruptedValue {
                key: key.to_string(),
                expected: hex::encode(expected),
                actual: actual.to_hex().to_string(),
            });
        }

        serde_json::from_slice(&json).map_err(|e| JourneyError::Deserialization {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }
}

impl KvStore for RedbStore {
    fn get(&self, keys: &[&str]) -> Result<BTreeMap<String, Value>> {
        let read_txn = self.db.begin_read()?;
        let table = match read_txn.open_table(VALUES_TABLE) {
            Ok(table) => table,
            // Nothing has been written yet.
            Err(TableError::TableDoesNotExist(_)) => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };

        let mut values = BTreeMap::new();
        for key in keys {
            if let Some(bytes) = table.get(*key)? {
                values.insert(key.to_string(), Self::decode_value(key, bytes.value())?);
            }
        }
        Ok(values)
    }

    fn set(&self, entries: BTreeMap<String, Value>) -> Result<()> {
        let encoded = entries
            .iter()
            .map(|(key, value)| Ok((key.as_str(), self.encode_value(value)?)))
            .collect::<Result<Vec<_>>>()?;

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(VALUES_TABLE)?;
            for (key, bytes) in &encoded {
                table.insert(*key, bytes.as_slice())?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }
}
