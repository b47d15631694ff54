//! Converts attributed navigations into persisted visits.

use crate::aggregate::record_visit;
use crate::attribution::AttributionResolver;
use crate::domain::extract_domain;
use crate::error::Result;
use crate::store::{self, KvStore};
use crate::types::{TabId, Timestamp, Visit};
use tracing::{debug, trace};
use uuid::Uuid;

const ID_SUFFIX_LEN: usize = 9;

/// A completed page load ready for ingestion.
#[derive(Debug, Clone, Copy)]
pub struct PageLoad<'a> {
    /// Tab the page loaded in.
    pub tab_id: TabId,
    /// Navigated URL.
    pub url: &'a str,
    /// Page title, if the page reported one.
    pub title: Option<&'a str>,
}

/// Generates a visit id: the creation time followed by a random suffix.
pub fn new_visit_id(now: Timestamp) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}", now, &suffix[..ID_SUFFIX_LEN])
}

/// Records `load` as a visit at `now`.
///
/// Returns `Ok(None)` when the load is filtered out. On a store failure the
/// error is returned and the tab's history is left untouched, although a
/// pending opener, once resolved, stays consumed.
pub fn ingest(
    store: &dyn KvStore,
    resolver: &mut AttributionResolver,
    now: Timestamp,
    load: PageLoad<'_>,
) -> Result<Option<Visit>> {
    let Some(domain) = extract_domain(load.url) else {
        trace!(tab_id = load.tab_id, url = load.url, "no web domain, skipped");
        return Ok(None);
    };
    if resolver.last_url(load.tab_id) == Some(load.url) {
        trace!(tab_id = load.tab_id, url = load.url, "same URL as last tracked, skipped");
        return Ok(None);
    }

    let attribution = resolver.resolve(load.tab_id);

    let visit = Visit {
        id: new_visit_id(now),
        title: load
            .title
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| domain.clone()),
        domain,
        url: load.url.to_string(),
        timestamp: now,
        from_domain: attribution.from_domain,
        from_url: attribution.from_url,
        tab_id: load.tab_id,
    };

    let mut data = store::load_data(store)?;
    data.visits.push(visit.clone());
    record_visit(&mut data.domains, &mut data.transitions, &visit);
    store::save_data(store, &data)?;

    resolver.record_navigation(load.tab_id, load.url);
    debug!(
        tab_id = visit.tab_id,
        domain = %visit.domain,
        from = ?visit.from_domain,
        visits = data.visits.len(),
        "recorded visit"
    );

    Ok(Some(visit))
}
