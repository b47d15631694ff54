//! Domain and transition aggregation over visits.
//!
//! Two entry points share the same bookkeeping rules: `record_visit` is the
//! append path used by ingestion, `fold_visits` rebuilds both maps from
//! scratch and is used by compaction, path deletion and filtered queries.

use crate::domain::favicon_url;
use crate::types::{DomainMap, DomainStats, Transition, TransitionMap, Visit};
use serde::Serialize;

/// Freshly derived aggregates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregates {
    /// Domain aggregates.
    pub domains: DomainMap,
    /// Transition aggregates.
    pub transitions: TransitionMap,
}

/// Folds a newly ingested visit into existing aggregates.
///
/// Counts only ever grow here and `last_visit` is overwritten with the new
/// timestamp; `first_visit` and `favicon` keep the values they were
/// created with.
pub fn record_visit(domains: &mut DomainMap, transitions: &mut TransitionMap, visit: &Visit) {
    let stats = domains
        .entry(visit.domain.clone())
        .or_insert_with(|| DomainStats {
            visit_count: 0,
            first_visit: visit.timestamp,
            last_visit: visit.timestamp,
            favicon: favicon_url(&visit.domain),
        });
    stats.visit_count += 1;
    stats.last_visit = visit.timestamp;

    if let Some(key) = visit.transition_key() {
        let transition = transitions.entry(key).or_insert(Transition {
            count: 0,
            last_visit: visit.timestamp,
        });
        transition.count += 1;
        transition.last_visit = visit.timestamp;
    }
}

/// Rebuilds domain and transition aggregates from `visits`.
///
/// Favicons are carried over from `prior` by domain when present and
/// derived otherwise. Stored attribution is reused as-is; nothing is
/// re-attributed.
pub fn fold_visits<'a>(
    visits: impl IntoIterator<Item = &'a Visit>,
    prior: Option<&DomainMap>,
) -> Aggregates {
    let mut aggregates = Aggregates::default();

    for visit in visits {
        let stats = aggregates
            .domains
            .entry(visit.domain.clone())
            .or_insert_with(|| DomainStats {
                visit_count: 0,
                first_visit: visit.timestamp,
                last_visit: visit.timestamp,
                favicon: prior
                    .and_then(|domains| domains.get(&visit.domain))
                    .map(|stats| stats.favicon.clone())
                    .unwrap_or_else(|| favicon_url(&visit.domain)),
            });
        stats.visit_count += 1;
        stats.first_visit = stats.first_visit.min(visit.timestamp);
        stats.last_visit = stats.last_visit.max(visit.timestamp);

        if let Some(key) = visit.transition_key() {
            let transition = aggregates.transitions.entry(key).or_insert(Transition {
                count: 0,
                last_visit: visit.timestamp,
            });
            transition.count += 1;
            transition.last_visit = transition.last_visit.max(visit.timestamp);
        }
    }

    aggregates
}

/// Differences between persisted aggregates and a fresh fold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregateDrift {
    /// Domains whose persisted stats differ from the fold (or exist on one side only).
    pub domains: Vec<String>,
    /// Transition keys whose persisted stats differ from the fold.
    pub transitions: Vec<String>,
}

impl AggregateDrift {
    /// Whether the persisted aggregates match the visits.
    pub fn is_consistent(&self) -> bool {
        self.domains.is_empty() && self.transitions.is_empty()
    }

    /// Returns a summary message.
    pub fn summary(&self) -> String {
        if self.is_consistent() {
            "Aggregates are consistent with the visit log.".to_string()
        } else {
            format!(
                "Aggregates drifted: {} domains, {} transitions",
                self.domains.len(),
                self.transitions.len()
            )
        }
    }
}

/// Compares persisted aggregates against a fold of `visits`.
///
/// `first_visit` of a domain is not compared: the append path never lowers
/// it, so a persisted value earlier than the fold is legitimate after a
/// prune. Counts, `last_visit` and transition stats must match exactly.
pub fn check_drift(visits: &[Visit], domains: &DomainMap, transitions: &TransitionMap) -> AggregateDrift {
    let fresh = fold_visits(visits, Some(domains));
    let mut drift = AggregateDrift::default();

    for (domain, stats) in &fresh.domains {
        match domains.get(domain) {
            Some(stored)
                if stored.visit_count == stats.visit_count
                    && stored.last_visit == stats.last_visit => {}
            _ => drift.domains.push(domain.clone()),
        }
    }
    for domain in domains.keys() {
        if !fresh.domains.contains_key(domain) {
            drift.domains.push(domain.clone());
        }
    }

    for (key, transition) in &fresh.transitions {
        if transitions.get(key) != Some(transition) {
            drift.transitions.push(key.clone());
        }
    }
    for key in transitions.keys() {
        if !fresh.transitions.contains_key(key) {
            drift.transitions.push(key.clone());
        }
    }

    drift.domains.sort();
    drift.transitions.sort();
    drift
}
