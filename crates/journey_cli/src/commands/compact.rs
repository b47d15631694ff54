//! Retention compaction command.

use anyhow::{bail, Result};
use console::style;
use journey_core::{RetentionWindow, DAY_MS};

/// Drop visits older than the horizon and rebuild aggregates.
pub fn run(horizon_days: Option<u32>, dry_run: bool) -> Result<()> {
    let mut tracker = super::open()?;
    let days = horizon_days.unwrap_or(tracker.config().retention.horizon_days);
    let window = RetentionWindow::horizon(tracker.now(), i64::from(days) * DAY_MS);

    if dry_run {
        println!(
            "{} Running compaction in dry-run mode (nothing will be written)...",
            style("→").cyan()
        );
    } else {
        println!(
            "{} Compacting with a {}-day horizon...",
            style("→").cyan(),
            days
        );
    }

    let Some(report) = tracker.compact(window, dry_run) else {
        bail!("Compaction failed");
    };

    println!();
    println!("{}", style("Compaction Report:").bold());
    println!("  Visits scanned: {}", style(report.visits_scanned).cyan());
    println!("  Visits kept:    {}", style(report.visits_kept()).green());
    println!(
        "  Visits removed: {}",
        if report.visits_removed > 0 {
            style(report.visits_removed).yellow()
        } else {
            style(report.visits_removed).green()
        }
    );
    println!(
        "  Domains:        {} → {}",
        report.domains_before, report.domains_after
    );
    println!(
        "  Transitions:    {} → {}",
        report.transitions_before, report.transitions_after
    );

    if dry_run && report.visits_removed > 0 {
        println!();
        println!("This was a dry run. To actually remove visits, run:");
        println!("  {}", style("journey compact").cyan());
    } else if report.written {
        println!();
        println!("{} Store rewritten", style("✓").green());
    }

    Ok(())
}
