//! Journey tracker handle providing the main API.

use crate::attribution::AttributionResolver;
use crate::cache::ReadCache;
use crate::compact::{self, CompactReport, RetentionWindow};
use crate::config::Config;
use crate::error::{JourneyError, Result};
use crate::events::{NavigationEvent, TabLookup};
use crate::graph::Path as JourneyPath;
use crate::ingest::{self, PageLoad};
use crate::lock::WriterLock;
use crate::mutate;
use crate::query::{QueryFilter, QueryLayer};
use crate::store::{self, KvStore, RedbStore};
use crate::types::{ClosedTab, JourneyData, TabId, Timestamp, Visit};
use crate::verify::{self, VerifyReport};
use crate::TimeProvider;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, error, info, trace, warn};

/// Directory holding a journey store, relative to its root.
pub const JOURNEY_DIR: &str = ".journey";

const STORE_FILE: &str = "store.redb";
const LOCK_FILE: &str = "LOCK";

/// Result of a history clear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClearOutcome {
    /// Whether the store was updated.
    pub success: bool,
    /// Human-readable result.
    pub message: String,
    /// Visits removed.
    pub cleared: usize,
}

/// Journey tracker handle.
///
/// Owns the store, the per-tab attribution state and the query cache.
/// Every mutation takes `&mut self`, so one tracker is one writer. Failures
/// during ingestion, compaction and mutation are logged and reported as
/// `None` or an unsuccessful outcome rather than returned as errors.
pub struct JourneyTracker {
    /// Root directory (parent of .journey), when opened from disk.
    root: Option<PathBuf>,
    store: Box<dyn KvStore>,
    config: Config,
    resolver: AttributionResolver,
    cache: ReadCache<JourneyData>,
    /// Time provider for testing (None = use system time).
    time_provider: Option<Arc<dyn TimeProvider>>,
    /// Writer lock, released after the store is closed.
    _lock: Option<WriterLock>,
}

impl JourneyTracker {
    /// Creates a tracker over an arbitrary store.
    ///
    /// # Examples
    ///
    /// ```
    /// use journey_core::{Config, JourneyTracker, MemoryStore};
    ///
    /// let mut tracker = JourneyTracker::new(MemoryStore::new(), Config::default())
    ///     .with_time_provider(|| 1_000i64);
    /// let visit = tracker.on_page_complete(1, "https://example.com/", Some("Example"));
    /// assert_eq!(visit.unwrap().domain, "example.com");
    /// ```
    pub fn new(store: impl KvStore + 'static, config: Config) -> Self {
        let cache = ReadCache::new(config.cache.ttl());
        Self {
            root: None,
            store: Box::new(store),
            config,
            resolver: AttributionResolver::new(),
            cache,
            time_provider: None,
            _lock: None,
        }
    }

    /// Sets a custom time provider for testing.
    pub fn with_time_provider(mut self, provider: impl TimeProvider + 'static) -> Self {
        self.time_provider = Some(Arc::new(provider));
        self
    }

    /// Initializes a new journey store under `path`.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyInitialized` if `.journey` exists, or any error from
    /// [`JourneyTracker::open`].
    pub fn init(path: impl AsRef<Path>) -> Result<Self> {
        let root = path.as_ref();
        let journey_dir = root.join(JOURNEY_DIR);

        if journey_dir.exists() {
            return Err(JourneyError::AlreadyInitialized(journey_dir));
        }

        fs::create_dir_all(&journey_dir)?;
        Config::default().save(&journey_dir)?;
        fs::write(journey_dir.join(".gitignore"), format!("{}\n", LOCK_FILE))?;
        info!(path = %journey_dir.display(), "initialized journey store");

        Self::open(root)
    }

    /// Opens an existing journey store and takes its writer lock.
    ///
    /// # Errors
    ///
    /// Returns `NotAJourneyDir` if `.journey` is missing, a lock error if
    /// another process has it open, or a config/backend error.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use journey_core::JourneyTracker;
    ///
    /// let tracker = JourneyTracker::open(".").unwrap();
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let root = path.as_ref().to_path_buf();
        let journey_dir = root.join(JOURNEY_DIR);

        if !journey_dir.is_dir() {
            return Err(JourneyError::NotAJourneyDir(root));
        }

        let lock = WriterLock::acquire(journey_dir.join(LOCK_FILE))?;
        let config = Config::load(&journey_dir)?;
        let store = RedbStore::open(
            journey_dir.join(STORE_FILE),
            config.storage.compression_level,
        )?;

        let compact_on_open = config.retention.compact_on_open;
        let mut tracker = Self::new(store, config);
        tracker.root = Some(root);
        tracker._lock = Some(lock);

        if compact_on_open {
            tracker.compact_retention();
        }
        Ok(tracker)
    }

    /// Root directory, when opened from disk.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Path to the `.journey` directory, when opened from disk.
    pub fn journey_dir(&self) -> Option<PathBuf> {
        self.root.as_ref().map(|r| r.join(JOURNEY_DIR))
    }

    /// Active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Per-tab attribution state.
    pub fn resolver(&self) -> &AttributionResolver {
        &self.resolver
    }

    /// Underlying store.
    pub fn store(&self) -> &dyn KvStore {
        self.store.as_ref()
    }

    /// Current time in milliseconds.
    pub fn now(&self) -> Timestamp {
        match &self.time_provider {
            Some(provider) => provider.now(),
            None => SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as Timestamp)
                .unwrap_or_default(),
        }
    }

    /// Applies one browser event.
    ///
    /// `lookup` answers "what is tab N showing" for opener registration.
    /// Returns the visit recorded by a completed page load, if any.
    pub fn handle_event(&mut self, event: &NavigationEvent, lookup: &dyn TabLookup) -> Option<Visit> {
        match event {
            NavigationEvent::PageLoad {
                tab_id,
                url,
                title,
                status_complete,
            } => {
                if !status_complete {
                    trace!(tab_id, "page load not complete, ignored");
                    return None;
                }
                self.on_page_complete(*tab_id, url, title.as_deref())
            }
            NavigationEvent::TabRemoved { tab_id } => {
                self.on_tab_removed(*tab_id);
                None
            }
            NavigationEvent::NavigationTargetCreated {
                source_tab_id,
                tab_id,
            } => {
                self.on_navigation_target_created(*source_tab_id, *tab_id, lookup);
                None
            }
            NavigationEvent::TabActivated { tab_id } => {
                // Activation alone is not a navigation.
                trace!(tab_id, "tab activated");
                None
            }
        }
    }

    /// Records a completed page load.
    pub fn on_page_complete(&mut self, tab_id: TabId, url: &str, title: Option<&str>) -> Option<Visit> {
        let now = self.now();
        let load = PageLoad { tab_id, url, title };
        match ingest::ingest(self.store.as_ref(), &mut self.resolver, now, load) {
            Ok(Some(visit)) => {
                self.cache.invalidate();
                Some(visit)
            }
            Ok(None) => None,
            Err(e) => {
                error!(tab_id, url, error = %e, "failed to record visit");
                None
            }
        }
    }

    /// Handles a tab close.
    ///
    /// Journals the tab's last recorded visit under `closedTabs`, then drops
    /// the tab's attribution state whether or not the journal write worked.
    /// Returns whether a journal entry was written.
    pub fn on_tab_removed(&mut self, tab_id: TabId) -> bool {
        let written = match self.journal_closed_tab(tab_id) {
            Ok(written) => written,
            Err(e) => {
                warn!(tab_id, error = %e, "failed to journal closed tab");
                false
            }
        };
        self.resolver.forget_tab(tab_id);
        written
    }

    fn journal_closed_tab(&mut self, tab_id: TabId) -> Result<bool> {
        let data = store::load_data(self.store.as_ref())?;
        let Some(last) = data.visits.iter().rev().find(|v| v.tab_id == tab_id) else {
            return Ok(false);
        };

        let mut closed = store::load_closed_tabs(self.store.as_ref())?;
        closed.insert(
            tab_id,
            ClosedTab {
                closed_at: self.now(),
                last_url: last.url.clone(),
                last_domain: last.domain.clone(),
            },
        );
        store::save_closed_tabs(self.store.as_ref(), &closed)?;
        debug!(tab_id, domain = %last.domain, "journaled closed tab");
        Ok(true)
    }

    /// Registers `source_tab_id`'s current page as the opener of `new_tab_id`.
    pub fn on_navigation_target_created(
        &mut self,
        source_tab_id: TabId,
        new_tab_id: TabId,
        lookup: &dyn TabLookup,
    ) -> bool {
        self.resolver
            .register_opener_from(lookup, source_tab_id, new_tab_id)
    }

    /// Closed-tab journal; empty when it cannot be read.
    pub fn closed_tabs(&self) -> BTreeMap<TabId, ClosedTab> {
        store::load_closed_tabs(self.store.as_ref()).unwrap_or_else(|e| {
            error!(error = %e, "failed to load closed tabs");
            BTreeMap::new()
        })
    }

    /// Prunes visits older than the configured horizon.
    pub fn compact_retention(&mut self) -> Option<CompactReport> {
        let window = RetentionWindow::horizon(self.now(), self.config.retention.horizon_ms());
        self.compact(window, false)
    }

    /// Runs a compaction with an explicit window.
    pub fn compact(&mut self, window: RetentionWindow, dry_run: bool) -> Option<CompactReport> {
        let result = compact::compact(self.store.as_ref(), window, dry_run);
        self.cache.invalidate();
        result
            .map_err(|e| error!(error = %e, "compaction failed"))
            .ok()
    }

    /// Clears history.
    ///
    /// Without bounds everything is removed. With bounds the visits in
    /// `[start, end)` are removed, a missing start meaning the epoch. A
    /// missing end includes visits stamped at the current instant.
    pub fn clear_history(&mut self, start: Option<Timestamp>, end: Option<Timestamp>) -> ClearOutcome {
        let result = if start.is_none() && end.is_none() {
            compact::clear_all(self.store.as_ref()).map(|cleared| (cleared, "All history cleared".to_string()))
        } else {
            let start = start.unwrap_or(0);
            let end = end.unwrap_or_else(|| self.now().saturating_add(1));
            RetentionWindow::exclude(start, end)
                .and_then(|window| compact::compact(self.store.as_ref(), window, false))
                .map(|report| {
                    let cleared = report.visits_removed;
                    (cleared, format!("Cleared {} visits", cleared))
                })
        };
        self.cache.invalidate();

        match result {
            Ok((cleared, message)) => ClearOutcome {
                success: true,
                message,
                cleared,
            },
            Err(e) => {
                error!(error = %e, "failed to clear history");
                ClearOutcome {
                    success: false,
                    message: format!("Error clearing history: {}", e),
                    cleared: 0,
                }
            }
        }
    }

    /// Looks up path `index` in the graph of the visits matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns `PathNotFound` when the index is out of range.
    pub fn path_at(&mut self, filter: &QueryFilter, index: usize) -> Result<JourneyPath> {
        let mut graph = self.query().graph(filter);
        let count = graph.paths.len();
        if index >= count {
            return Err(JourneyError::PathNotFound { index, count });
        }
        Ok(graph.paths.swap_remove(index))
    }

    /// Deletes every visit to a URL of `path`. Returns the count removed.
    pub fn delete_path(&mut self, path: &JourneyPath) -> Option<usize> {
        let result = mutate::delete_path(self.store.as_ref(), path);
        self.cache.invalidate();
        match result {
            Ok(deleted) => {
                info!(
                    deleted,
                    domain = path.primary_domain().unwrap_or_default(),
                    "deleted path"
                );
                Some(deleted)
            }
            Err(e) => {
                error!(error = %e, "failed to delete path");
                None
            }
        }
    }

    /// Checks the persisted aggregates against the visit log.
    pub fn verify(&self) -> Result<VerifyReport> {
        verify::verify(self.store.as_ref())
    }

    /// Rewrites the aggregates from the visit log.
    pub fn repair(&mut self) -> Result<CompactReport> {
        let report = verify::repair(self.store.as_ref());
        self.cache.invalidate();
        report
    }

    /// Read access through the cache.
    pub fn query(&mut self) -> QueryLayer<'_> {
        let now = self.now();
        QueryLayer::new(self.store.as_ref(), &mut self.cache, &self.config.query, now)
    }

    /// Drops cached reads.
    pub fn invalidate_cache(&mut self) {
        self.cache.invalidate();
    }
}
