//! Replay recorded navigation events into the store.

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use journey_core::{NavigationEvent, TabRegistry};
use std::fs;
use std::path::Path;
use tracing::warn;

/// Apply every event in a JSON-lines file, in order.
pub fn run(file: &Path) -> Result<()> {
    let mut tracker = super::open()?;
    let content = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let lines: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    println!(
        "{} Replaying {} events from {}...",
        style("→").cyan(),
        lines.len(),
        file.display()
    );

    let pb = ProgressBar::new(lines.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} {msg:20} [{bar:40.cyan/blue}] {pos}/{len}")
            .unwrap()
            .progress_chars("█▓▒░  "),
    );
    pb.set_message("Replaying");

    let mut registry = TabRegistry::new();
    let mut recorded = 0usize;
    let mut malformed = 0usize;

    for (lineno, line) in lines.iter().enumerate() {
        pb.inc(1);
        let event: NavigationEvent = match serde_json::from_str(line) {
            Ok(event) => event,
            Err(e) => {
                warn!(line = lineno + 1, error = %e, "skipping malformed event");
                malformed += 1;
                continue;
            }
        };

        // Openers are looked up before this event changes the tab's page.
        if tracker.handle_event(&event, &registry).is_some() {
            recorded += 1;
        }
        registry.observe(&event);
    }

    pb.finish_and_clear();

    println!();
    println!("{}", style("Replay Report:").bold());
    println!("  Events read:     {}", style(lines.len()).cyan());
    println!("  Visits recorded: {}", style(recorded).green());
    println!("  Tabs still open: {}", style(registry.open_tabs()).cyan());
    if malformed > 0 {
        println!("  Malformed lines: {}", style(malformed).yellow());
    }

    Ok(())
}
