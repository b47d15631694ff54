//! Delete one browsing path.

use anyhow::{bail, Result};
use console::style;

/// Delete every visit to the pages of path `index`.
///
/// The index refers to the listing produced by `journey paths` with the
/// same date range.
pub fn run(index: usize, from: Option<&str>, to: Option<&str>, yes: bool) -> Result<()> {
    let filter = super::date_filter(from, to)?;
    let mut tracker = super::open()?;
    let path = tracker.path_at(&filter, index).map_err(super::with_hint)?;

    println!(
        "{} Path [{}] on {}: {} pages, {} visits",
        style("→").cyan(),
        index,
        style(path.primary_domain().unwrap_or("-")).cyan(),
        path.nodes.len(),
        path.visit_count()
    );
    for node in path.nodes.iter().take(5) {
        println!("    {}", style(&node.url).dim());
    }
    if path.nodes.len() > 5 {
        println!("    ... and {} more", path.nodes.len() - 5);
    }

    if !yes {
        println!();
        println!(
            "{} Every visit to these pages will be removed, including visits outside this path.",
            style("⚠").yellow().bold()
        );
        if !super::confirm("Delete this path?")? {
            println!("{} Deletion cancelled.", style("✓").green());
            return Ok(());
        }
    }

    let Some(deleted) = tracker.delete_path(&path) else {
        bail!("Failed to delete path {}", index);
    };
    println!("{} Deleted {} visits", style("✓").green(), deleted);

    Ok(())
}
