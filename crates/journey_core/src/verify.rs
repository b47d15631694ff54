//! Store verification and repair.
//!
//! Domain and transition maps are derived data. Verification refolds the
//! visit log and reports where the persisted aggregates disagree; repair
//! is a compaction that keeps every visit.

use crate::aggregate::{check_drift, AggregateDrift};
use crate::compact::{compact, CompactReport, RetentionWindow};
use crate::domain::extract_domain;
use crate::error::Result;
use crate::store::{self, KvStore};
use serde::Serialize;
use std::collections::HashSet;

/// Report from store verification.
#[derive(Debug, Default, Clone, Serialize)]
pub struct VerifyReport {
    /// Number of visits checked.
    pub visits_checked: usize,

    /// Visit ids occurring more than once.
    pub duplicate_ids: Vec<String>,

    /// Ids of visits whose domain does not match their URL.
    pub mismatched_domains: Vec<String>,

    /// Aggregates that differ from a refold of the visits.
    pub drift: AggregateDrift,
}

impl VerifyReport {
    /// Returns true if any issues were found.
    pub fn has_issues(&self) -> bool {
        !self.duplicate_ids.is_empty()
            || !self.mismatched_domains.is_empty()
            || !self.drift.is_consistent()
    }

    /// Whether `repair` can fix every reported issue.
    pub fn repairable(&self) -> bool {
        self.duplicate_ids.is_empty() && self.mismatched_domains.is_empty()
    }

    /// Returns a summary message.
    pub fn summary(&self) -> String {
        if !self.has_issues() {
            "Store is healthy. No issues found.".to_string()
        } else {
            let mut issues = Vec::new();
            if !self.duplicate_ids.is_empty() {
                issues.push(format!("{} duplicate visit ids", self.duplicate_ids.len()));
            }
            if !self.mismatched_domains.is_empty() {
                issues.push(format!("{} visits with mismatched domain", self.mismatched_domains.len()));
            }
            if !self.drift.domains.is_empty() {
                issues.push(format!("{} drifted domains", self.drift.domains.len()));
            }
            if !self.drift.transitions.is_empty() {
                issues.push(format!("{} drifted transitions", self.drift.transitions.len()));
            }
            format!("Store has issues: {}", issues.join(", "))
        }
    }
}

/// Verifies the visit log and its aggregates.
pub fn verify(store: &dyn KvStore) -> Result<VerifyReport> {
    let data = store::load_data(store)?;
    let mut report = VerifyReport {
        visits_checked: data.visits.len(),
        drift: check_drift(&data.visits, &data.domains, &data.transitions),
        ..VerifyReport::default()
    };

    let mut seen = HashSet::new();
    for visit in &data.visits {
        if !seen.insert(visit.id.as_str()) {
            report.duplicate_ids.push(visit.id.clone());
        }
        if extract_domain(&visit.url).as_deref() != Some(visit.domain.as_str()) {
            report.mismatched_domains.push(visit.id.clone());
        }
    }

    Ok(report)
}

/// Rewrites the aggregates from the visit log.
pub fn repair(store: &dyn KvStore) -> Result<CompactReport> {
    compact(store, RetentionWindow::KeepAll, false)
}
