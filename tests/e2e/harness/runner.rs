use super::assertions::Assertion;
use super::clock::MockClock;
use super::steps::ScenarioStep;
use super::workspace::TestWorkspace;
use anyhow::{anyhow, bail, ensure, Context, Result};
use journey_core::{transition_key, JourneyTracker, NavigationEvent, QueryFilter, TabRegistry};
use std::collections::HashMap;
use std::time::Duration;

/// Clock advance after every browser event, so consecutive visits never
/// share a timestamp.
const EVENT_SPACING: Duration = Duration::from_secs(1);

/// Executes scenarios against a real disk-backed store
pub struct ScenarioRunner {
    workspace: TestWorkspace,
    tracker: Option<JourneyTracker>,
    clock: MockClock,
    tabs: TabRegistry,
    current_step: usize,
}

impl ScenarioRunner {
    /// Create a runner with a fresh store, optionally reconfigured
    pub fn new(config: Option<&str>) -> Result<Self> {
        let workspace = TestWorkspace::empty()?;
        let clock = MockClock::new();

        let mut tracker = workspace.init_tracker()?;
        if let Some(config) = config {
            // Release the writer lock before reopening with the new config.
            drop(tracker);
            workspace.write_config(config)?;
            tracker = workspace.open_tracker()?;
        }

        Ok(Self {
            tracker: Some(tracker.with_time_provider(clock.as_provider())),
            workspace,
            clock,
            tabs: TabRegistry::new(),
            current_step: 0,
        })
    }

    /// Get current step number
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// Execute all steps in sequence
    pub fn execute(&mut self, steps: &[ScenarioStep]) -> Result<()> {
        for (i, step) in steps.iter().enumerate() {
            self.current_step = i;
            self.execute_step(step)
                .with_context(|| format!("Step {}: {:?}", i, step))?;
        }
        Ok(())
    }

    fn tracker(&mut self) -> Result<&mut JourneyTracker> {
        self.tracker
            .as_mut()
            .ok_or_else(|| anyhow!("tracker not available"))
    }

    /// Execute a single step
    fn execute_step(&mut self, step: &ScenarioStep) -> Result<()> {
        match step {
            ScenarioStep::PageLoad { tab_id, url, title } => {
                self.handle_event(NavigationEvent::PageLoad {
                    tab_id: *tab_id,
                    url: url.clone(),
                    title: title.clone(),
                    status_complete: true,
                })
            }
            ScenarioStep::PageLoading { tab_id, url } => {
                self.handle_event(NavigationEvent::PageLoad {
                    tab_id: *tab_id,
                    url: url.clone(),
                    title: None,
                    status_complete: false,
                })
            }
            ScenarioStep::OpenTab {
                source_tab_id,
                tab_id,
            } => self.handle_event(NavigationEvent::NavigationTargetCreated {
                source_tab_id: *source_tab_id,
                tab_id: *tab_id,
            }),
            ScenarioStep::CloseTab { tab_id } => {
                self.handle_event(NavigationEvent::TabRemoved { tab_id: *tab_id })
            }
            ScenarioStep::ActivateTab { tab_id } => {
                self.handle_event(NavigationEvent::TabActivated { tab_id: *tab_id })
            }

            ScenarioStep::CompactRetention => {
                self.tracker()?
                    .compact_retention()
                    .ok_or_else(|| anyhow!("compaction failed"))?;
                Ok(())
            }
            ScenarioStep::DeletePath { index } => self.handle_delete_path(*index),
            ScenarioStep::ClearAll => self.handle_clear(None),
            ScenarioStep::ClearLast { duration } => {
                let start = self.clock.now() - duration.as_millis() as i64;
                self.handle_clear(Some(start))
            }
            ScenarioStep::Repair => {
                self.tracker()?.repair()?;
                Ok(())
            }

            ScenarioStep::Wait { duration } => {
                self.clock.advance(*duration);
                Ok(())
            }
            ScenarioStep::WaitDays { days } => {
                self.clock.advance_days(*days);
                Ok(())
            }

            ScenarioStep::Restart => self.handle_restart(),

            ScenarioStep::Assert { assertion } => self.handle_assertion(assertion),
        }
    }

    // ===== Event handlers =====

    fn handle_event(&mut self, event: NavigationEvent) -> Result<()> {
        let tracker = self
            .tracker
            .as_mut()
            .ok_or_else(|| anyhow!("tracker not available"))?;

        // The opener lookup must see the tab's page before this event.
        tracker.handle_event(&event, &self.tabs);
        self.tabs.observe(&event);
        self.clock.advance(EVENT_SPACING);
        Ok(())
    }

    fn handle_delete_path(&mut self, index: usize) -> Result<()> {
        let tracker = self.tracker()?;
        let path = tracker.path_at(&QueryFilter::default(), index)?;
        tracker
            .delete_path(&path)
            .ok_or_else(|| anyhow!("failed to delete path {}", index))?;
        Ok(())
    }

    fn handle_clear(&mut self, start: Option<i64>) -> Result<()> {
        let outcome = self.tracker()?.clear_history(start, None);
        ensure!(outcome.success, "clear failed: {}", outcome.message);
        Ok(())
    }

    fn handle_restart(&mut self) -> Result<()> {
        // Drop first so the writer lock and database handle are released.
        self.tracker = None;
        let tracker = self
            .workspace
            .open_tracker()
            .context("Failed to reopen store")?;
        self.tracker = Some(tracker.with_time_provider(self.clock.as_provider()));
        Ok(())
    }

    // ===== Assertions =====

    fn handle_assertion(&mut self, assertion: &Assertion) -> Result<()> {
        let tracker = self.tracker()?;
        let all = QueryFilter::default();

        match assertion {
            Assertion::VisitCount(expected) => {
                let actual = tracker.query().visits(&all).len();
                ensure!(actual == *expected, "expected {} visits, got {}", expected, actual);
            }
            Assertion::LatestVisitFrom { url, from_domain } => {
                let visits = tracker.query().visits(&all);
                let visit = visits
                    .iter()
                    .rev()
                    .find(|v| &v.url == url)
                    .ok_or_else(|| anyhow!("no visit to {}", url))?;
                ensure!(
                    &visit.from_domain == from_domain,
                    "visit to {} attributed to {:?}, expected {:?}",
                    url,
                    visit.from_domain,
                    from_domain
                );
            }
            Assertion::LatestVisitTitle { url, title } => {
                let visits = tracker.query().visits(&all);
                let visit = visits
                    .iter()
                    .rev()
                    .find(|v| &v.url == url)
                    .ok_or_else(|| anyhow!("no visit to {}", url))?;
                ensure!(&visit.title == title, "title {:?}, expected {:?}", visit.title, title);
            }
            Assertion::DomainVisits { domain, count } => {
                let domains = tracker.query().domains(&all);
                let stats = domains
                    .get(domain)
                    .ok_or_else(|| anyhow!("domain {} not recorded", domain))?;
                ensure!(
                    stats.visit_count == *count,
                    "{} has {} visits, expected {}",
                    domain,
                    stats.visit_count,
                    count
                );
            }
            Assertion::NoDomain(domain) => {
                ensure!(
                    !tracker.query().domains(&all).contains_key(domain),
                    "domain {} still recorded",
                    domain
                );
            }
            Assertion::TransitionCount { from, to, count } => {
                let key = transition_key(from, to);
                let transitions = tracker.query().transitions(&all);
                let transition = transitions
                    .get(&key)
                    .ok_or_else(|| anyhow!("transition {} not recorded", key))?;
                ensure!(
                    transition.count == *count,
                    "{} counted {}, expected {}",
                    key,
                    transition.count,
                    count
                );
            }
            Assertion::NoTransition { from, to } => {
                let key = transition_key(from, to);
                ensure!(
                    !tracker.query().transitions(&all).contains_key(&key),
                    "transition {} still recorded",
                    key
                );
            }
            Assertion::AggregatesConsistent => {
                let report = tracker.verify()?;
                ensure!(!report.has_issues(), "{}", report.summary());
            }
            Assertion::NodeCount(expected) => {
                let actual = tracker.query().graph(&all).nodes.len();
                ensure!(actual == *expected, "expected {} nodes, got {}", expected, actual);
            }
            Assertion::EdgeCount(expected) => {
                let actual = tracker.query().graph(&all).edges.len();
                ensure!(actual == *expected, "expected {} edges, got {}", expected, actual);
            }
            Assertion::PathCount(expected) => {
                let actual = tracker.query().graph(&all).paths.len();
                ensure!(actual == *expected, "expected {} paths, got {}", expected, actual);
            }
            Assertion::EdgeExists { from, to } => {
                let graph = tracker.query().graph(&all);
                ensure!(
                    graph.edges.iter().any(|e| &e.source == from && &e.target == to),
                    "no edge {} -> {}",
                    from,
                    to
                );
            }
            Assertion::PathsPartitionGraph => {
                let graph = tracker.query().graph(&all);
                let mut owner: HashMap<&str, usize> = HashMap::new();
                for (i, path) in graph.paths.iter().enumerate() {
                    for node in &path.nodes {
                        if let Some(prev) = owner.insert(node.id.as_str(), i) {
                            bail!("node {} in paths {} and {}", node.id, prev, i);
                        }
                    }
                }
                ensure!(
                    owner.len() == graph.nodes.len(),
                    "{} of {} nodes placed in paths",
                    owner.len(),
                    graph.nodes.len()
                );

                let path_edges: usize = graph.paths.iter().map(|p| p.edges.len()).sum();
                ensure!(
                    path_edges == graph.edges.len(),
                    "{} of {} edges placed in paths",
                    path_edges,
                    graph.edges.len()
                );
                for edge in &graph.edges {
                    let source = owner.get(edge.source.as_str());
                    ensure!(
                        source.is_some() && source == owner.get(edge.target.as_str()),
                        "edge {} -> {} crosses paths",
                        edge.source,
                        edge.target
                    );
                }
            }
            Assertion::ClosedTab { tab_id, url } => {
                let closed = tracker.closed_tabs();
                let entry = closed
                    .get(tab_id)
                    .ok_or_else(|| anyhow!("tab {} not journaled", tab_id))?;
                ensure!(&entry.last_url == url, "tab {} closed on {}", tab_id, entry.last_url);
            }
            Assertion::NoClosedTab(tab_id) => {
                ensure!(
                    !tracker.closed_tabs().contains_key(tab_id),
                    "tab {} unexpectedly journaled",
                    tab_id
                );
            }
            Assertion::Custom(f) => f(tracker)?,
        }
        Ok(())
    }
}
