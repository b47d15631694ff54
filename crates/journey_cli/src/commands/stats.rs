//! Summary statistics.

use anyhow::Result;
use console::style;

/// Print summary counters.
pub fn run() -> Result<()> {
    let mut tracker = super::open()?;
    let stats = tracker.query().stats();

    println!("{}", style("Journey Statistics:").bold());
    println!("  Visits:       {}", style(stats.total_visits).cyan());
    println!("  Today:        {}", style(stats.today_visits).cyan());
    println!("  Domains:      {}", style(stats.total_domains).cyan());
    println!("  Transitions:  {}", style(stats.total_transitions).cyan());
    match &stats.most_visited {
        Some(domain) => println!(
            "  Most visited: {} ({} visits)",
            style(domain).green(),
            stats.most_visited_count
        ),
        None => println!("  Most visited: -"),
    }
    if let (Some(first), Some(last)) = (stats.first_visit, stats.last_visit) {
        println!(
            "  Range:        {} - {}",
            super::format_ts(first),
            super::format_ts(last)
        );
    }

    let closed = tracker.closed_tabs();
    if !closed.is_empty() {
        println!("  Closed tabs:  {}", closed.len());
    }

    Ok(())
}
