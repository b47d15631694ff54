//! Retention compaction.
//!
//! Visits are filtered by a time window and the domain and transition
//! aggregates are then rebuilt from the survivors. Aggregates are never
//! patched in place on deletion; this module and path deletion both go
//! through [`rebuild`].

use crate::aggregate::fold_visits;
use crate::error::{JourneyError, Result};
use crate::store::{self, KvStore};
use crate::types::{JourneyData, Timestamp, Visit};
use serde::Serialize;
use tracing::info;

/// Which visits a compaction keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetentionWindow {
    /// Keep visits newer than `now - horizon_ms`.
    Horizon {
        /// Reference instant.
        now: Timestamp,
        /// Retention horizon in milliseconds.
        horizon_ms: i64,
    },
    /// Drop visits in `[start, end)`, keep everything before or after.
    Exclude {
        /// First excluded instant.
        start: Timestamp,
        /// First instant kept again.
        end: Timestamp,
    },
    /// Keep every visit; only the aggregates are rebuilt.
    KeepAll,
}

impl RetentionWindow {
    /// Horizon-based pruning relative to `now`.
    pub fn horizon(now: Timestamp, horizon_ms: i64) -> Self {
        Self::Horizon { now, horizon_ms }
    }

    /// Exclusion of `[start, end)`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidWindow` when `start > end`.
    pub fn exclude(start: Timestamp, end: Timestamp) -> Result<Self> {
        if start > end {
            return Err(JourneyError::InvalidWindow { start, end });
        }
        Ok(Self::Exclude { start, end })
    }

    /// Whether a visit at `timestamp` survives.
    pub fn keeps(&self, timestamp: Timestamp) -> bool {
        match *self {
            Self::Horizon { now, horizon_ms } => timestamp > now.saturating_sub(horizon_ms),
            Self::Exclude { start, end } => timestamp < start || timestamp >= end,
            Self::KeepAll => true,
        }
    }
}

/// Report from a compaction run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompactReport {
    /// Visits examined.
    pub visits_scanned: usize,
    /// Visits removed.
    pub visits_removed: usize,
    /// Domains before the rebuild.
    pub domains_before: usize,
    /// Domains after the rebuild.
    pub domains_after: usize,
    /// Transitions before the rebuild.
    pub transitions_before: usize,
    /// Transitions after the rebuild.
    pub transitions_after: usize,
    /// Whether the result was written back.
    pub written: bool,
}

impl CompactReport {
    /// Visits that survived.
    pub fn visits_kept(&self) -> usize {
        self.visits_scanned - self.visits_removed
    }
}

/// Rebuilds `data` keeping only the visits `keep` accepts.
///
/// Visit order is preserved. Favicons carry over from the prior domain map.
pub fn rebuild(data: &JourneyData, keep: impl Fn(&Visit) -> bool) -> JourneyData {
    let visits: Vec<Visit> = data.visits.iter().filter(|v| keep(*v)).cloned().collect();
    let aggregates = fold_visits(&visits, Some(&data.domains));
    JourneyData {
        visits,
        domains: aggregates.domains,
        transitions: aggregates.transitions,
    }
}

/// Runs a compaction against `store`.
///
/// With `dry_run` the report is computed but nothing is written. Otherwise
/// the rebuilt collections are persisted in a single write, even when no
/// visit was removed, so stale aggregates get repaired as a side effect.
pub fn compact(store: &dyn KvStore, window: RetentionWindow, dry_run: bool) -> Result<CompactReport> {
    let data = store::load_data(store)?;
    let rebuilt = rebuild(&data, |v| window.keeps(v.timestamp));

    let mut report = CompactReport {
        visits_scanned: data.visits.len(),
        visits_removed: data.visits.len() - rebuilt.visits.len(),
        domains_before: data.domains.len(),
        domains_after: rebuilt.domains.len(),
        transitions_before: data.transitions.len(),
        transitions_after: rebuilt.transitions.len(),
        written: false,
    };

    if !dry_run {
        store::save_data(store, &rebuilt)?;
        report.written = true;
    }

    info!(
        ?window,
        removed = report.visits_removed,
        kept = report.visits_kept(),
        dry_run,
        "compaction finished"
    );
    Ok(report)
}

/// Removes every visit and aggregate. Returns the number of visits removed.
pub fn clear_all(store: &dyn KvStore) -> Result<usize> {
    let data = store::load_data(store)?;
    store::save_data(store, &JourneyData::default())?;
    info!(removed = data.visits.len(), "history cleared");
    Ok(data.visits.len())
}
