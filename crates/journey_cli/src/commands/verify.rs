//! Store verification command.

use anyhow::{bail, Result};
use console::style;
use indicatif::ProgressBar;
use std::time::Duration;

/// Verify aggregates against the visit log, optionally repairing them.
pub fn run(repair: bool) -> Result<()> {
    let mut tracker = super::open()?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_message("Verifying store...");
    spinner.enable_steady_tick(Duration::from_millis(80));
    let report = tracker.verify();
    spinner.finish_and_clear();
    let report = report.map_err(super::with_hint)?;

    println!("{}", style("Verification Report:").bold());
    println!("  Visits checked: {}", style(report.visits_checked).cyan());

    if !report.has_issues() {
        println!();
        println!("{} {}", style("✓").green(), report.summary());
        return Ok(());
    }

    for id in &report.duplicate_ids {
        println!("  {} duplicate visit id {}", style("×").red(), id);
    }
    for id in &report.mismatched_domains {
        println!("  {} visit {} has a domain not matching its URL", style("×").red(), id);
    }
    for domain in &report.drift.domains {
        println!("  {} domain {} drifted", style("⚠").yellow(), domain);
    }
    for key in &report.drift.transitions {
        println!("  {} transition {} drifted", style("⚠").yellow(), key);
    }
    println!();
    println!("{} {}", style("⚠").yellow().bold(), report.summary());

    if !repair {
        if report.repairable() {
            println!("Run {} to rebuild the aggregates.", style("journey verify --repair").cyan());
        }
        bail!("Verification found issues");
    }

    if !report.repairable() {
        bail!("Visit log issues cannot be repaired automatically");
    }

    let fixed = tracker.repair().map_err(super::with_hint)?;
    println!(
        "{} Rebuilt aggregates: {} domains, {} transitions",
        style("✓").green(),
        fixed.domains_after,
        fixed.transitions_after
    );

    Ok(())
}
