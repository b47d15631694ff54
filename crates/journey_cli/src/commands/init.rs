//! Initialize a new journey store.

use anyhow::{Context, Result};
use journey_core::{JourneyTracker, JOURNEY_DIR};

/// Initialize a journey store in the current directory.
pub fn run() -> Result<()> {
    let tracker = JourneyTracker::init(".").context("Failed to initialize journey store")?;
    let config = tracker.config();

    println!("Initialized journey store in {}/", JOURNEY_DIR);
    println!();
    println!("Directory structure:");
    println!("  {}/store.redb   - Visits, aggregates and closed tabs", JOURNEY_DIR);
    println!("  {}/config.toml  - Retention, cache and query settings", JOURNEY_DIR);
    println!("  {}/LOCK         - Writer lock (gitignored)", JOURNEY_DIR);
    println!();
    println!(
        "Retention horizon: {} days",
        config.retention.horizon_days
    );

    Ok(())
}
