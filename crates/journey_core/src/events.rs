//! Browser events consumed by the tracker.

use crate::types::TabId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A tab lifecycle event delivered by the browser integration.
///
/// Serialized with an internal `type` tag so recorded streams can be
/// replayed from JSON lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NavigationEvent {
    /// A tab finished (or progressed) loading a page.
    PageLoad {
        /// Tab that navigated.
        tab_id: TabId,
        /// URL now shown in the tab.
        url: String,
        /// Title reported by the page.
        #[serde(default)]
        title: Option<String>,
        /// Whether the load reached the `complete` status.
        #[serde(default = "default_true")]
        status_complete: bool,
    },

    /// A tab was closed.
    TabRemoved {
        /// Closed tab.
        tab_id: TabId,
    },

    /// A link in `source_tab_id` opened a new tab `tab_id`.
    NavigationTargetCreated {
        /// Tab containing the clicked link.
        source_tab_id: TabId,
        /// Newly created tab.
        tab_id: TabId,
    },

    /// A tab was brought to the foreground without navigating.
    TabActivated {
        /// Activated tab.
        tab_id: TabId,
    },
}

fn default_true() -> bool {
    true
}

impl NavigationEvent {
    /// The tab this event is about.
    pub fn tab_id(&self) -> TabId {
        match self {
            Self::PageLoad { tab_id, .. }
            | Self::TabRemoved { tab_id }
            | Self::NavigationTargetCreated { tab_id, .. }
            | Self::TabActivated { tab_id } => *tab_id,
        }
    }
}

/// Best-effort lookup of a tab's currently displayed URL.
///
/// Returns `None` when the tab is gone or has no URL yet.
pub trait TabLookup {
    /// Current URL of `tab_id`.
    fn current_url(&self, tab_id: TabId) -> Option<String>;
}

impl<F> TabLookup for F
where
    F: Fn(TabId) -> Option<String>,
{
    fn current_url(&self, tab_id: TabId) -> Option<String> {
        self(tab_id)
    }
}

/// Tracks what each open tab displays, built from the event stream itself.
///
/// Used when replaying recorded events, where no live browser can answer
/// the lookup. Every page load updates the tab's URL, including pages
/// that are never recorded as visits.
#[derive(Debug, Default, Clone)]
pub struct TabRegistry {
    current: HashMap<TabId, String>,
}

impl TabRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies an event to the registry.
    pub fn observe(&mut self, event: &NavigationEvent) {
        match event {
            NavigationEvent::PageLoad { tab_id, url, .. } => {
                self.current.insert(*tab_id, url.clone());
            }
            NavigationEvent::TabRemoved { tab_id } => {
                self.current.remove(tab_id);
            }
            NavigationEvent::NavigationTargetCreated { .. }
            | NavigationEvent::TabActivated { .. } => {}
        }
    }

    /// Number of tabs currently known.
    pub fn open_tabs(&self) -> usize {
        self.current.len()
    }
}

impl TabLookup for TabRegistry {
    fn current_url(&self, tab_id: TabId) -> Option<String> {
        self.current.get(&tab_id).cloned()
    }
}
