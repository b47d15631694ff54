//! Clear history.

use anyhow::{bail, Result};
use console::style;

/// Clear all history, or the visits within the given dates.
pub fn run(from: Option<&str>, to: Option<&str>, yes: bool) -> Result<()> {
    let filter = super::date_filter(from, to)?;
    let mut tracker = super::open()?;

    if !yes {
        let question = if filter.has_date_bounds() {
            format!(
                "Remove visits from {} to {}?",
                from.unwrap_or("the beginning"),
                to.unwrap_or("now")
            )
        } else {
            "Remove ALL browsing history?".to_string()
        };
        if !super::confirm(&question)? {
            println!("{} Clear cancelled.", style("✓").green());
            return Ok(());
        }
    }

    // The clear window excludes its end; move it past the last millisecond.
    let end = filter.end.map(|end| end + 1);
    let outcome = tracker.clear_history(filter.start, end);
    if !outcome.success {
        bail!(outcome.message);
    }
    println!("{} {}", style("✓").green(), outcome.message);

    Ok(())
}
