//! Print the journey graph.

use anyhow::{bail, Result};

/// Print the graph as DOT or JSON.
pub fn run(format: &str, from: Option<&str>, to: Option<&str>) -> Result<()> {
    let filter = super::date_filter(from, to)?;
    let mut tracker = super::open()?;
    let graph = tracker.query().graph(&filter);

    match format {
        "dot" => print!("{}", graph.to_dot()),
        "json" => println!("{}", serde_json::to_string_pretty(&graph)?),
        other => bail!("Unknown format '{}', expected dot or json", other),
    }

    Ok(())
}
