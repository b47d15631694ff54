//! Navigation graph construction and path partitioning.
//!
//! Visits to the same URL merge into one [`Node`]. Edges follow stored
//! attribution back to the nearest earlier visit of the source domain in
//! the same tab. The graph is then split into weakly-connected components,
//! the browsing [`Path`]s.

use crate::types::{TabId, Timestamp, Visit};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// One unique URL among a visit set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Stable identifier, equal to `url`.
    pub id: String,
    /// Page URL.
    pub url: String,
    /// Domain of the first visit to the URL.
    pub domain: String,
    /// Title of the first visit to the URL.
    pub title: String,
    /// Number of merged visits.
    pub visit_count: usize,
    /// Earliest merged visit.
    pub first_visit: Timestamp,
    /// Latest merged visit.
    pub last_visit: Timestamp,
}

/// Directed page-to-page connection, by URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Edge {
    /// Source URL.
    pub source: String,
    /// Target URL.
    pub target: String,
}

/// A weakly-connected component: one browsing journey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Path {
    /// Nodes ordered by `first_visit`.
    pub nodes: Vec<Node>,
    /// Edges with both endpoints in `nodes`.
    pub edges: Vec<Edge>,
}

/// Full graph plus its path partition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JourneyGraph {
    /// Every node, in order of first appearance in the visit list.
    pub nodes: Vec<Node>,
    /// Every edge, deduplicated.
    pub edges: Vec<Edge>,
    /// Components ordered by their earliest node.
    pub paths: Vec<Path>,
}

/// Index-based adjacency over the node list.
struct AdjacencyList {
    outgoing: Vec<Vec<usize>>,
    incoming: Vec<Vec<usize>>,
}

impl AdjacencyList {
    fn new(node_count: usize, edges: &[(usize, usize)]) -> Self {
        let mut outgoing = vec![Vec::new(); node_count];
        let mut incoming = vec![Vec::new(); node_count];
        for &(source, target) in edges {
            outgoing[source].push(target);
            incoming[target].push(source);
        }
        Self { outgoing, incoming }
    }
}

/// Builds the navigation graph for `visits`.
pub fn build_graph(visits: &[Visit]) -> JourneyGraph {
    let (nodes, node_index) = merge_nodes(visits);
    let edge_indices = derive_edges(visits, &node_index);
    let edges: Vec<Edge> = edge_indices
        .iter()
        .map(|&(s, t)| Edge {
            source: nodes[s].url.clone(),
            target: nodes[t].url.clone(),
        })
        .collect();

    let adjacency = AdjacencyList::new(nodes.len(), &edge_indices);
    let mut paths: Vec<Path> = components(&adjacency)
        .into_iter()
        .map(|members| {
            let member_set: HashSet<usize> = members.iter().copied().collect();
            let mut path_nodes: Vec<Node> = members.iter().map(|&i| nodes[i].clone()).collect();
            path_nodes.sort_by_key(|n| n.first_visit);
            let path_edges = edge_indices
                .iter()
                .zip(&edges)
                .filter(|((s, t), _)| member_set.contains(s) && member_set.contains(t))
                .map(|(_, edge)| edge.clone())
                .collect();
            Path {
                nodes: path_nodes,
                edges: path_edges,
            }
        })
        .collect();
    paths.sort_by_key(|p| p.first_visit());

    JourneyGraph {
        nodes,
        edges,
        paths,
    }
}

fn merge_nodes(visits: &[Visit]) -> (Vec<Node>, HashMap<&str, usize>) {
    let mut nodes: Vec<Node> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for visit in visits {
        match index.get(visit.url.as_str()) {
            Some(&i) => {
                let node = &mut nodes[i];
                node.visit_count += 1;
                node.first_visit = node.first_visit.min(visit.timestamp);
                node.last_visit = node.last_visit.max(visit.timestamp);
            }
            None => {
                index.insert(visit.url.as_str(), nodes.len());
                nodes.push(Node {
                    id: visit.url.clone(),
                    url: visit.url.clone(),
                    domain: visit.domain.clone(),
                    title: visit.title.clone(),
                    visit_count: 1,
                    first_visit: visit.timestamp,
                    last_visit: visit.timestamp,
                });
            }
        }
    }

    (nodes, index)
}

/// Derives deduplicated `(source, target)` node index pairs in visit order.
///
/// For each visit attributed to another domain the source is the latest
/// strictly earlier visit in the same tab whose domain is the attributed
/// domain. Among candidates sharing that timestamp the one listed first
/// wins. Same-domain navigations never produce an edge.
fn derive_edges(visits: &[Visit], node_index: &HashMap<&str, usize>) -> Vec<(usize, usize)> {
    // (tab, domain) -> [(timestamp, visit position)], sorted by timestamp
    // ascending and position descending so the last candidate below a
    // bound is the earliest-listed among the latest.
    let mut by_tab_domain: HashMap<(TabId, &str), Vec<(Timestamp, usize)>> = HashMap::new();
    for (pos, visit) in visits.iter().enumerate() {
        by_tab_domain
            .entry((visit.tab_id, visit.domain.as_str()))
            .or_default()
            .push((visit.timestamp, pos));
    }
    for candidates in by_tab_domain.values_mut() {
        candidates.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));
    }

    let mut seen = HashSet::new();
    let mut edges = Vec::new();

    for visit in visits {
        let Some(from_domain) = visit.from_domain.as_deref() else {
            continue;
        };
        if from_domain == visit.domain {
            continue;
        }
        let Some(candidates) = by_tab_domain.get(&(visit.tab_id, from_domain)) else {
            continue;
        };
        let below = candidates.partition_point(|&(ts, _)| ts < visit.timestamp);
        if below == 0 {
            continue;
        }
        let source = &visits[candidates[below - 1].1];
        if source.url == visit.url {
            continue;
        }

        let (Some(&s), Some(&t)) = (
            node_index.get(source.url.as_str()),
            node_index.get(visit.url.as_str()),
        ) else {
            continue;
        };
        if seen.insert((s, t)) {
            edges.push((s, t));
        }
    }

    edges
}

/// Weakly-connected components, discovered in node order.
fn components(adjacency: &AdjacencyList) -> Vec<Vec<usize>> {
    let node_count = adjacency.outgoing.len();
    let mut visited = vec![false; node_count];
    let mut result = Vec::new();

    for start in 0..node_count {
        if visited[start] {
            continue;
        }
        let mut members = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if visited[current] {
                continue;
            }
            visited[current] = true;
            members.push(current);
            for &next in adjacency.incoming[current]
                .iter()
                .chain(&adjacency.outgoing[current])
            {
                if !visited[next] {
                    stack.push(next);
                }
            }
        }
        result.push(members);
    }

    result
}

impl Path {
    /// Earliest first-visit among the nodes.
    pub fn first_visit(&self) -> Timestamp {
        self.nodes.first().map(|n| n.first_visit).unwrap_or_default()
    }

    /// Latest last-visit among the nodes.
    pub fn last_visit(&self) -> Timestamp {
        self.nodes.iter().map(|n| n.last_visit).max().unwrap_or_default()
    }

    /// Total visits merged into this path.
    pub fn visit_count(&self) -> usize {
        self.nodes.iter().map(|n| n.visit_count).sum()
    }

    /// Whether the path is a single page.
    pub fn is_single_page(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Node URLs, the set path deletion removes.
    pub fn urls(&self) -> HashSet<&str> {
        self.nodes.iter().map(|n| n.url.as_str()).collect()
    }

    /// Domain shared by the most nodes. Ties go to the domain seen first.
    pub fn primary_domain(&self) -> Option<&str> {
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for node in &self.nodes {
            match counts.iter_mut().find(|(d, _)| *d == node.domain) {
                Some((_, count)) => *count += 1,
                None => counts.push((node.domain.as_str(), 1)),
            }
        }
        let best = counts.iter().map(|(_, c)| *c).max()?;
        counts.into_iter().find(|(_, c)| *c == best).map(|(d, _)| d)
    }

    /// Nodes with no incoming edge, in node order.
    ///
    /// A component without such a node (a cycle) uses its earliest node.
    pub fn roots(&self) -> Vec<&Node> {
        let targets: HashSet<&str> = self.edges.iter().map(|e| e.target.as_str()).collect();
        let roots: Vec<&Node> = self
            .nodes
            .iter()
            .filter(|n| !targets.contains(n.url.as_str()))
            .collect();
        if roots.is_empty() {
            self.nodes.first().into_iter().collect()
        } else {
            roots
        }
    }

    /// Depth of every node below the roots.
    ///
    /// Depth-first from each root in turn, following edges in order; a node
    /// keeps the depth at which it was first reached. Unreached nodes get 0.
    pub fn depths(&self) -> HashMap<&str, usize> {
        let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
        for edge in &self.edges {
            children
                .entry(edge.source.as_str())
                .or_default()
                .push(edge.target.as_str());
        }

        let mut depths: HashMap<&str, usize> = HashMap::new();
        for root in self.roots() {
            let mut stack = vec![(root.url.as_str(), 0usize)];
            while let Some((url, depth)) = stack.pop() {
                if depths.contains_key(url) {
                    continue;
                }
                depths.insert(url, depth);
                if let Some(next) = children.get(url) {
                    for child in next.iter().rev() {
                        stack.push((*child, depth + 1));
                    }
                }
            }
        }

        for node in &self.nodes {
            depths.entry(node.url.as_str()).or_insert(0);
        }
        depths
    }
}

impl JourneyGraph {
    /// Paths, optionally without single-page ones.
    pub fn visible_paths(&self, hide_single_page: bool) -> impl Iterator<Item = (usize, &Path)> {
        self.paths
            .iter()
            .enumerate()
            .filter(move |(_, p)| !(hide_single_page && p.is_single_page()))
    }

    /// Renders the graph in DOT format, one cluster per path.
    pub fn to_dot(&self) -> String {
        let mut output = String::from("digraph Journeys {\n");
        output.push_str("  rankdir=LR;\n");
        output.push_str("  node [shape=box];\n\n");

        let mut ids: HashMap<&str, String> = HashMap::new();
        for (i, path) in self.paths.iter().enumerate() {
            output.push_str(&format!("  subgraph cluster_{} {{\n", i));
            output.push_str(&format!(
                "    label=\"{}\";\n",
                escape_dot_label(path.primary_domain().unwrap_or_default())
            ));
            for node in &path.nodes {
                let id = format!("n{}", ids.len());
                output.push_str(&format!(
                    "    {} [label=\"{}\\n{}\"];\n",
                    id,
                    escape_dot_label(&node.title),
                    node.visit_count
                ));
                ids.insert(node.url.as_str(), id);
            }
            output.push_str("  }\n");
        }

        output.push('\n');

        for edge in &self.edges {
            if let (Some(from), Some(to)) = (ids.get(edge.source.as_str()), ids.get(edge.target.as_str())) {
                output.push_str(&format!("  {} -> {};\n", from, to));
            }
        }

        output.push_str("}\n");
        output
    }
}

/// Escape special characters in DOT labels.
fn escape_dot_label(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
