//! Core data types for browsing journeys.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Browser tab identifier.
pub type TabId = u32;

/// Milliseconds since the Unix epoch.
pub type Timestamp = i64;

/// Separator between the two domains of a transition key.
pub const TRANSITION_SEPARATOR: &str = "->";

/// Builds the `fromDomain->domain` key used by the transition map.
pub fn transition_key(from_domain: &str, domain: &str) -> String {
    format!("{}{}{}", from_domain, TRANSITION_SEPARATOR, domain)
}

/// Splits a transition key back into `(from_domain, domain)`.
///
/// Hostnames never contain `->`, so the first occurrence is the separator.
pub fn split_transition_key(key: &str) -> Option<(&str, &str)> {
    key.split_once(TRANSITION_SEPARATOR)
}

/// One recorded instance of a tab navigating to a URL.
///
/// Visits are immutable once created; they disappear only through
/// compaction or path deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visit {
    /// Time-based identifier with a random suffix.
    pub id: String,
    /// Hostname of `url`.
    pub domain: String,
    /// Full navigated URL.
    pub url: String,
    /// Page title, the domain when the page reported none.
    pub title: String,
    /// Creation instant.
    pub timestamp: Timestamp,
    /// Domain of the causal predecessor.
    #[serde(default)]
    pub from_domain: Option<String>,
    /// URL of the causal predecessor.
    #[serde(default)]
    pub from_url: Option<String>,
    /// Originating tab.
    pub tab_id: TabId,
}

impl Visit {
    /// Returns the transition key this visit contributes to, if any.
    ///
    /// Same-domain navigations never produce a transition.
    pub fn transition_key(&self) -> Option<String> {
        match self.from_domain.as_deref() {
            Some(from) if from != self.domain => Some(transition_key(from, &self.domain)),
            _ => None,
        }
    }
}

/// Per-domain aggregate, always re-derivable from the visit set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainStats {
    /// Number of retained visits to the domain.
    pub visit_count: u64,
    /// Earliest visit timestamp.
    pub first_visit: Timestamp,
    /// Latest visit timestamp.
    pub last_visit: Timestamp,
    /// Favicon URL, stable once set.
    pub favicon: String,
}

/// Aggregate for an ordered pair of distinct domains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    /// Number of visits attributed across this pair.
    pub count: u64,
    /// Latest contributing visit.
    pub last_visit: Timestamp,
}

/// Journal entry written when a tab with recorded visits is closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosedTab {
    /// When the tab was closed.
    pub closed_at: Timestamp,
    /// URL of the tab's last recorded visit.
    pub last_url: String,
    /// Domain of the tab's last recorded visit.
    pub last_domain: String,
}

/// Domain aggregates keyed by hostname.
pub type DomainMap = BTreeMap<String, DomainStats>;

/// Transition aggregates keyed by `fromDomain->domain`.
pub type TransitionMap = BTreeMap<String, Transition>;

/// The three persisted collections that move together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JourneyData {
    /// All retained visits in insertion order.
    pub visits: Vec<Visit>,
    /// Derived domain aggregates.
    pub domains: DomainMap,
    /// Derived transition aggregates.
    pub transitions: TransitionMap,
}

/// Backup document handed to export collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    /// All visits.
    pub visits: Vec<Visit>,
    /// Domain aggregates.
    pub domains: DomainMap,
    /// Transition aggregates.
    pub transitions: TransitionMap,
    /// ISO-8601 UTC instant the export was produced.
    pub export_date: String,
    /// Format version.
    pub version: String,
}

impl ExportBundle {
    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> crate::Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| crate::JourneyError::Serialization(e.to_string()))
    }
}

/// Summary counters over the whole store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// Number of distinct domains.
    pub total_domains: usize,
    /// Number of visits.
    pub total_visits: usize,
    /// Number of distinct transitions.
    pub total_transitions: usize,
    /// Visits since local midnight.
    pub today_visits: usize,
    /// Domain with the highest visit count.
    pub most_visited: Option<String>,
    /// Visit count of `most_visited`.
    pub most_visited_count: u64,
    /// Earliest visit timestamp.
    pub first_visit: Option<Timestamp>,
    /// Latest visit timestamp.
    pub last_visit: Option<Timestamp>,
}
