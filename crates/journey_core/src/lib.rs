//! Journey Core Library
//!
//! Builds a directed browsing graph from tab navigation events:
//! - Causal attribution of each page visit to its predecessor
//! - Domain and domain-transition aggregates, rebuilt on every deletion
//! - Partitioning of visited pages into connected browsing journeys
//! - Retention compaction, path deletion and filtered queries
//!
//! # Quick Start
//!
//! ```
//! use journey_core::{Config, JourneyTracker, MemoryStore, QueryFilter};
//! use std::sync::atomic::{AtomicI64, Ordering};
//!
//! let clock = AtomicI64::new(1_000);
//! let mut tracker = JourneyTracker::new(MemoryStore::new(), Config::default())
//!     .with_time_provider(move || clock.fetch_add(1, Ordering::SeqCst));
//!
//! tracker.on_page_complete(1, "https://a.com/", None);
//! tracker.on_page_complete(1, "https://b.com/", None);
//! tracker.on_page_complete(1, "https://a.com/", None);
//!
//! let graph = tracker.query().graph(&QueryFilter::default());
//! assert_eq!(graph.nodes.len(), 2);
//! assert_eq!(graph.edges.len(), 2);
//! assert_eq!(graph.paths.len(), 1);
//! ```
//!
//! # Features
//!
//! ## Attribution
//!
//! Same-tab history wins over the tab's opener, and an opener is used for
//! at most one navigation:
//!
//! ```
//! use journey_core::AttributionResolver;
//!
//! let mut resolver = AttributionResolver::new();
//! resolver.register_opener(2, "https://x.com/");
//!
//! assert_eq!(resolver.resolve(2).from_domain.as_deref(), Some("x.com"));
//! assert_eq!(resolver.resolve(2).from_domain, None);
//! ```
//!
//! ## Durable Storage
//!
//! `JourneyTracker::init` creates a `.journey/` directory holding a redb
//! database whose values are zstd-compressed and blake3-checksummed, a
//! `config.toml`, and a writer lock:
//!
//! ```no_run
//! use journey_core::JourneyTracker;
//!
//! let mut tracker = JourneyTracker::init(".").unwrap();
//! tracker.compact_retention();
//! ```

mod aggregate;
mod attribution;
mod cache;
mod compact;
mod config;
mod domain;
mod error;
mod events;
mod graph;
mod ingest;
mod lock;
mod mutate;
mod query;
mod store;
mod tracker;
mod types;
mod verify;

pub use aggregate::{check_drift, fold_visits, record_visit, AggregateDrift, Aggregates};
pub use attribution::{Attribution, AttributionResolver};
pub use cache::ReadCache;
pub use compact::{clear_all, compact, rebuild, CompactReport, RetentionWindow};
pub use config::{
    CacheConfig, Config, QueryConfig, RetentionConfig, StorageConfig, DAY_MS,
    DEFAULT_CACHE_TTL_MS, DEFAULT_DOMAIN_VISIT_LIMIT, DEFAULT_RETENTION_MS,
};
pub use domain::{extract_domain, favicon_url};
pub use error::{JourneyError, Result};
pub use events::{NavigationEvent, TabLookup, TabRegistry};
pub use graph::{build_graph, Edge, JourneyGraph, Node, Path};
pub use ingest::{ingest, new_visit_id, PageLoad};
pub use lock::WriterLock;
pub use mutate::{delete_path, delete_urls};
pub use query::{iso_timestamp, local_midnight, QueryFilter, QueryLayer};
pub use store::{
    load_closed_tabs, load_data, save_closed_tabs, save_data, KvStore, MemoryStore, RedbStore,
    CLOSED_TABS_KEY, DOMAINS_KEY, TRANSITIONS_KEY, VISITS_KEY,
};
pub use tracker::{ClearOutcome, JourneyTracker, JOURNEY_DIR};
pub use types::*;
pub use verify::{repair, verify, VerifyReport};

/// Time provider trait for testing.
///
/// Allows injecting controlled time into the tracker for deterministic
/// timestamps, retention and cache expiry. Only used when explicitly set via
/// `with_time_provider()`.
pub trait TimeProvider: Send + Sync {
    /// Returns the current Unix timestamp in milliseconds.
    fn now(&self) -> i64;
}

impl<F> TimeProvider for F
where
    F: Fn() -> i64 + Send + Sync,
{
    fn now(&self) -> i64 {
        self()
    }
}
