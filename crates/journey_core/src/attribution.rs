//! Causal attribution of navigations to their predecessor page.
//!
//! The resolver owns the ephemeral per-tab state: the last URL recorded
//! in each tab and, for tabs spawned from a link, the URL of the page that
//! opened them. Nothing here is persisted; a restart starts from empty maps.

use crate::domain::extract_domain;
use crate::events::TabLookup;
use crate::types::TabId;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Predecessor of a navigation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attribution {
    /// URL of the predecessor page.
    pub from_url: Option<String>,
    /// Domain of `from_url`, absent when it has none.
    pub from_domain: Option<String>,
}

impl Attribution {
    fn from_url(url: String) -> Self {
        let from_domain = extract_domain(&url);
        Self {
            from_url: Some(url),
            from_domain,
        }
    }
}

/// Per-tab navigation state used to attribute visits.
#[derive(Debug, Default, Clone)]
pub struct AttributionResolver {
    /// Last recorded URL per tab.
    last_visited: HashMap<TabId, String>,
    /// Opener URL per tab, consumed by the tab's first attributed navigation.
    pending_openers: HashMap<TabId, String>,
}

impl AttributionResolver {
    /// Creates a resolver with no tab state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Determines the predecessor of the next navigation in `tab_id`.
    ///
    /// Same-tab history wins. Only when the tab has none is a pending opener
    /// used, and using it removes it, so a tab's opener contributes to at
    /// most one navigation.
    pub fn resolve(&mut self, tab_id: TabId) -> Attribution {
        if let Some(url) = self.last_visited.get(&tab_id) {
            return Attribution::from_url(url.clone());
        }

        match self.pending_openers.remove(&tab_id) {
            Some(opener) => {
                debug!(tab_id, opener = %opener, "consumed opener attribution");
                Attribution::from_url(opener)
            }
            None => Attribution::default(),
        }
    }

    /// Last URL recorded for `tab_id`.
    pub fn last_url(&self, tab_id: TabId) -> Option<&str> {
        self.last_visited.get(&tab_id).map(String::as_str)
    }

    /// Whether `tab_id` still has an unconsumed opener.
    pub fn has_pending_opener(&self, tab_id: TabId) -> bool {
        self.pending_openers.contains_key(&tab_id)
    }

    /// Records `url` as the tab's latest page after a successful ingestion.
    pub fn record_navigation(&mut self, tab_id: TabId, url: &str) {
        self.last_visited.insert(tab_id, url.to_string());
    }

    /// Registers `opener_url` as the origin of a newly created tab.
    pub fn register_opener(&mut self, new_tab_id: TabId, opener_url: impl Into<String>) {
        self.pending_openers.insert(new_tab_id, opener_url.into());
    }

    /// Registers the current page of `source_tab_id` as the opener of
    /// `new_tab_id`.
    ///
    /// Best effort: when the source tab can no longer be looked up the
    /// registration is skipped. Returns whether an opener was recorded.
    pub fn register_opener_from(
        &mut self,
        lookup: &dyn TabLookup,
        source_tab_id: TabId,
        new_tab_id: TabId,
    ) -> bool {
        match lookup.current_url(source_tab_id) {
            Some(url) if !url.is_empty() => {
                self.register_opener(new_tab_id, url);
                true
            }
            _ => {
                trace!(source_tab_id, new_tab_id, "source tab unavailable, opener skipped");
                false
            }
        }
    }

    /// Drops all state for a closed tab.
    pub fn forget_tab(&mut self, tab_id: TabId) {
        self.last_visited.remove(&tab_id);
        self.pending_openers.remove(&tab_id);
    }

    /// Number of tabs with recorded history.
    pub fn tracked_tabs(&self) -> usize {
        self.last_visited.len()
    }
}
