//! Filtered reads over the persisted journey data.
//!
//! Reads go through the tracker's [`ReadCache`]. A failed load is logged
//! and treated as an empty store, so every query returns a value.

use crate::aggregate::fold_visits;
use crate::cache::ReadCache;
use crate::config::QueryConfig;
use crate::error::{JourneyError, Result};
use crate::graph::{build_graph, JourneyGraph};
use crate::store::{self, KvStore};
use crate::types::{
    split_transition_key, DomainMap, ExportBundle, JourneyData, Stats, Timestamp, TransitionMap,
    Visit,
};
use chrono::{Local, SecondsFormat, TimeZone, Utc};
use tracing::error;

/// Composable query filters. Unset fields do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryFilter {
    /// Inclusive lower timestamp bound.
    pub start: Option<Timestamp>,
    /// Inclusive upper timestamp bound.
    pub end: Option<Timestamp>,
    /// Case-insensitive substring of the visit domain.
    pub domain: Option<String>,
    /// Minimum domain visit count, for domain queries.
    pub min_visits: Option<u64>,
    /// Case-insensitive substring of the domain name, for domain queries.
    pub search: Option<String>,
}

impl QueryFilter {
    /// Filter with only date bounds set.
    pub fn between(start: Option<Timestamp>, end: Option<Timestamp>) -> Self {
        Self {
            start,
            end,
            ..Self::default()
        }
    }

    /// Whether a date bound is set.
    pub fn has_date_bounds(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    fn in_range(&self, timestamp: Timestamp) -> bool {
        self.start.map_or(true, |s| timestamp >= s) && self.end.map_or(true, |e| timestamp <= e)
    }

    fn matches_visit(&self, visit: &Visit) -> bool {
        self.in_range(visit.timestamp)
            && self
                .domain
                .as_deref()
                .map_or(true, |needle| contains_ignore_case(&visit.domain, needle))
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Read-only view over a store and its read cache at a given instant.
pub struct QueryLayer<'a> {
    store: &'a dyn KvStore,
    cache: &'a mut ReadCache<JourneyData>,
    defaults: &'a QueryConfig,
    now: Timestamp,
}

impl<'a> QueryLayer<'a> {
    /// Creates a view. `now` drives cache freshness, today's count and the
    /// export date.
    pub fn new(
        store: &'a dyn KvStore,
        cache: &'a mut ReadCache<JourneyData>,
        defaults: &'a QueryConfig,
        now: Timestamp,
    ) -> Self {
        Self {
            store,
            cache,
            defaults,
            now,
        }
    }

    /// Loads (or reuses) the full snapshot, propagating store errors.
    pub fn try_snapshot(&mut self) -> Result<&JourneyData> {
        let kv = self.store;
        self.cache.get_or_try_load(self.now, || store::load_data(kv))
    }

    /// Full snapshot; empty when the store cannot be read.
    pub fn snapshot(&mut self) -> JourneyData {
        match self.try_snapshot() {
            Ok(data) => data.clone(),
            Err(e) => {
                error!(error = %e, "failed to load journey data");
                JourneyData::default()
            }
        }
    }

    /// Visits matching the date and domain filters, in store order.
    pub fn visits(&mut self, filter: &QueryFilter) -> Vec<Visit> {
        self.snapshot()
            .visits
            .into_iter()
            .filter(|v| filter.matches_visit(v))
            .collect()
    }

    /// Domain aggregates.
    ///
    /// With date bounds the aggregates are refolded from the matching
    /// visits instead of read from the all-time map. `min_visits` and
    /// `search` then apply to the result.
    pub fn domains(&mut self, filter: &QueryFilter) -> DomainMap {
        let data = self.snapshot();
        let mut domains = if filter.has_date_bounds() {
            let visits: Vec<&Visit> = data.visits.iter().filter(|v| filter.matches_visit(v)).collect();
            fold_visits(visits, Some(&data.domains)).domains
        } else {
            data.domains
        };

        if let Some(needle) = filter.domain.as_deref() {
            domains.retain(|domain, _| contains_ignore_case(domain, needle));
        }
        if let Some(min) = filter.min_visits {
            domains.retain(|_, stats| stats.visit_count >= min);
        }
        if let Some(needle) = filter.search.as_deref() {
            domains.retain(|domain, _| contains_ignore_case(domain, needle));
        }
        domains
    }

    /// Transition aggregates, refolded from matching visits under date bounds.
    ///
    /// A domain filter keeps transitions with either endpoint matching.
    pub fn transitions(&mut self, filter: &QueryFilter) -> TransitionMap {
        let data = self.snapshot();
        let mut transitions = if filter.has_date_bounds() {
            let visits: Vec<&Visit> = data.visits.iter().filter(|v| filter.matches_visit(v)).collect();
            fold_visits(visits, None).transitions
        } else {
            data.transitions
        };

        if let Some(needle) = filter.domain.as_deref() {
            transitions.retain(|key, _| match split_transition_key(key) {
                Some((from, to)) => {
                    contains_ignore_case(from, needle) || contains_ignore_case(to, needle)
                }
                None => false,
            });
        }
        transitions
    }

    /// Visits to exactly `domain`, newest first, at most `limit`
    /// (the configured default when `None`).
    pub fn visits_for_domain(&mut self, domain: &str, limit: Option<usize>) -> Vec<Visit> {
        let limit = limit.unwrap_or(self.defaults.domain_visit_limit);
        let mut visits: Vec<Visit> = self
            .snapshot()
            .visits
            .into_iter()
            .filter(|v| v.domain == domain)
            .collect();
        visits.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        visits.truncate(limit);
        visits
    }

    /// Navigation graph over the filtered visits.
    pub fn graph(&mut self, filter: &QueryFilter) -> JourneyGraph {
        build_graph(&self.visits(filter))
    }

    /// Summary counters.
    pub fn stats(&mut self) -> Stats {
        let data = self.snapshot();
        let midnight = local_midnight(self.now);

        let mut most_visited = None;
        let mut most_visited_count = 0;
        for (domain, stats) in &data.domains {
            if stats.visit_count > most_visited_count {
                most_visited_count = stats.visit_count;
                most_visited = Some(domain.clone());
            }
        }

        Stats {
            total_domains: data.domains.len(),
            total_visits: data.visits.len(),
            total_transitions: data.transitions.len(),
            today_visits: data.visits.iter().filter(|v| v.timestamp >= midnight).count(),
            most_visited,
            most_visited_count,
            first_visit: data.visits.iter().map(|v| v.timestamp).min(),
            last_visit: data.visits.iter().map(|v| v.timestamp).max(),
        }
    }

    /// Backup document of everything stored.
    ///
    /// Reads the store directly so an unreadable store is reported rather
    /// than exported as empty.
    pub fn export(&mut self) -> Result<ExportBundle> {
        let data = self.try_snapshot()?.clone();
        Ok(ExportBundle {
            visits: data.visits,
            domains: data.domains,
            transitions: data.transitions,
            export_date: iso_timestamp(self.now)?,
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }
}

/// Start of the local calendar day containing `now`.
pub fn local_midnight(now: Timestamp) -> Timestamp {
    Local
        .timestamp_millis_opt(now)
        .single()
        .and_then(|dt| dt.date_naive().and_hms_opt(0, 0, 0))
        .and_then(|midnight| midnight.and_local_timezone(Local).earliest())
        .map(|midnight| midnight.timestamp_millis())
        .unwrap_or(now)
}

/// ISO-8601 UTC rendering with millisecond precision.
pub fn iso_timestamp(ms: Timestamp) -> Result<String> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .ok_or_else(|| JourneyError::Serialization(format!("timestamp out of range: {}", ms)))
}
