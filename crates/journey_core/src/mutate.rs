//! Destructive edits to the visit log.

use crate::compact::rebuild;
use crate::error::Result;
use crate::graph::Path;
use crate::store::{self, KvStore};
use std::collections::HashSet;
use tracing::info;

/// Deletes every visit whose URL is in `urls` and rebuilds the aggregates.
///
/// Returns the number of visits removed. Nothing is written when no visit
/// matches.
pub fn delete_urls(store: &dyn KvStore, urls: &HashSet<&str>) -> Result<usize> {
    let data = store::load_data(store)?;
    let rebuilt = rebuild(&data, |v| !urls.contains(v.url.as_str()));
    let deleted = data.visits.len() - rebuilt.visits.len();

    if deleted > 0 {
        store::save_data(store, &rebuilt)?;
    }
    info!(urls = urls.len(), deleted, "deleted visits by URL");
    Ok(deleted)
}

/// Deletes all visits belonging to `path`.
pub fn delete_path(store: &dyn KvStore, path: &Path) -> Result<usize> {
    delete_urls(store, &path.urls())
}
