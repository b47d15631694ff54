use anyhow::Result;
use journey_core::JourneyTracker;

/// Declarative assertions on journey state
pub enum Assertion {
    // Visit log
    VisitCount(usize),
    LatestVisitFrom {
        url: String,
        from_domain: Option<String>,
    },
    LatestVisitTitle {
        url: String,
        title: String,
    },

    // Aggregates
    DomainVisits {
        domain: String,
        count: u64,
    },
    NoDomain(String),
    TransitionCount {
        from: String,
        to: String,
        count: u64,
    },
    NoTransition {
        from: String,
        to: String,
    },
    AggregatesConsistent,

    // Graph
    NodeCount(usize),
    EdgeCount(usize),
    PathCount(usize),
    EdgeExists {
        from: String,
        to: String,
    },
    PathsPartitionGraph,

    // Closed tabs
    ClosedTab {
        tab_id: u32,
        url: String,
    },
    NoClosedTab(u32),

    // Custom (takes mutable reference to allow queries through the cache)
    Custom(Box<dyn Fn(&mut JourneyTracker) -> Result<()> + Send + Sync>),
}

impl std::fmt::Debug for Assertion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::VisitCount(n) => write!(f, "VisitCount({})", n),
            Self::LatestVisitFrom { url, from_domain } => {
                write!(f, "LatestVisitFrom {{ url: {:?}, from_domain: {:?} }}", url, from_domain)
            }
            Self::LatestVisitTitle { url, title } => {
                write!(f, "LatestVisitTitle {{ url: {:?}, title: {:?} }}", url, title)
            }
            Self::DomainVisits { domain, count } => {
                write!(f, "DomainVisits {{ domain: {:?}, count: {} }}", domain, count)
            }
            Self::NoDomain(d) => write!(f, "NoDomain({:?})", d),
            Self::TransitionCount { from, to, count } => {
                write!(f, "TransitionCount {{ from: {:?}, to: {:?}, count: {} }}", from, to, count)
            }
            Self::NoTransition { from, to } => {
                write!(f, "NoTransition {{ from: {:?}, to: {:?} }}", from, to)
            }
            Self::AggregatesConsistent => write!(f, "AggregatesConsistent"),
            Self::NodeCount(n) => write!(f, "NodeCount({})", n),
            Self::EdgeCount(n) => write!(f, "EdgeCount({})", n),
            Self::PathCount(n) => write!(f, "PathCount({})", n),
            Self::EdgeExists { from, to } => {
                write!(f, "EdgeExists {{ from: {:?}, to: {:?} }}", from, to)
            }
            Self::PathsPartitionGraph => write!(f, "PathsPartitionGraph"),
            Self::ClosedTab { tab_id, url } => {
                write!(f, "ClosedTab {{ tab_id: {}, url: {:?} }}", tab_id, url)
            }
            Self::NoClosedTab(t) => write!(f, "NoClosedTab({})", t),
            Self::Custom(_) => write!(f, "Custom(<fn>)"),
        }
    }
}
