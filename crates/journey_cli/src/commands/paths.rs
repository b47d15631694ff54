//! List browsing paths.

use anyhow::Result;
use console::style;
use journey_core::{JourneyGraph, Path};

/// Print the journeys in the selected date range.
///
/// With `all` the graph is printed as one unsplit set of pages and links
/// instead of per-path listings.
pub fn run(
    all: bool,
    pages: bool,
    hide_single: bool,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<()> {
    let filter = super::date_filter(from, to)?;
    let mut tracker = super::open()?;
    let graph = tracker.query().graph(&filter);

    if all {
        if graph.nodes.is_empty() {
            println!("No pages recorded.");
        } else {
            for line in render_all(&graph) {
                println!("{}", line);
            }
        }
        return Ok(());
    }

    let mut shown = 0;
    for (index, path) in graph.visible_paths(hide_single) {
        shown += 1;
        print_path(index, path, pages);
    }

    if graph.paths.is_empty() {
        println!("No browsing paths recorded.");
        return Ok(());
    }

    let hidden = graph.paths.len() - shown;
    println!();
    println!(
        "{} paths, {} pages, {} links",
        graph.paths.len(),
        graph.nodes.len(),
        graph.edges.len()
    );
    if hidden > 0 {
        println!(
            "  {} single-page paths hidden by {}",
            hidden,
            style("--hide-single").cyan()
        );
    }

    Ok(())
}

/// Lines for the unsplit view: every page, then every link.
fn render_all(graph: &JourneyGraph) -> Vec<String> {
    let mut lines = Vec::with_capacity(graph.nodes.len() + graph.edges.len() + 2);
    lines.push(format!("Pages ({})", graph.nodes.len()));
    for node in &graph.nodes {
        lines.push(format!(
            "  {} [{}] {}x  {}",
            node.url, node.domain, node.visit_count, node.title
        ));
    }
    lines.push(format!("Links ({})", graph.edges.len()));
    for edge in &graph.edges {
        lines.push(format!("  {} -> {}", edge.source, edge.target));
    }
    lines
}

fn print_path(index: usize, path: &Path, show_pages: bool) {
    println!(
        "{} {}  {} pages, {} visits  ({} - {})",
        style(format!("[{}]", index)).bold(),
        style(path.primary_domain().unwrap_or("-")).cyan(),
        path.nodes.len(),
        path.visit_count(),
        super::format_ts(path.first_visit()),
        super::format_ts(path.last_visit()),
    );

    if !show_pages {
        return;
    }
    let depths = path.depths();
    for node in &path.nodes {
        let depth = depths.get(node.id.as_str()).copied().unwrap_or(0);
        println!(
            "  {}{} {} {}",
            "  ".repeat(depth),
            style("•").dim(),
            node.title,
            style(format!("({}x {})", node.visit_count, node.url)).dim()
        );
    }
}
