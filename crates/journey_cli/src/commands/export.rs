//! Export the store as JSON.

use anyhow::{Context, Result};
use console::style;
use std::fs;
use std::path::Path;

/// Write the export document to `output`, or stdout.
pub fn run(output: Option<&Path>) -> Result<()> {
    let mut tracker = super::open()?;
    let bundle = tracker.query().export().map_err(super::with_hint)?;
    let json = bundle.to_json()?;

    match output {
        Some(path) => {
            fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "{} Exported {} visits to {}",
                style("✓").green(),
                bundle.visits.len(),
                path.display()
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}
