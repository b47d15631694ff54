//! Show visits to one domain.

use anyhow::Result;
use console::style;

/// Print the most recent visits to `domain`.
pub fn run(domain: &str, limit: Option<usize>) -> Result<()> {
    let mut tracker = super::open()?;
    let visits = tracker.query().visits_for_domain(domain, limit);

    if visits.is_empty() {
        println!("No visits to {}.", domain);
        return Ok(());
    }

    println!("{}", style(format!("Recent visits to {}:", domain)).bold());
    for visit in &visits {
        let origin = match &visit.from_domain {
            Some(from) => format!(" {} {}", style("←").cyan(), from),
            None => String::new(),
        };
        println!(
            "  {}  {}{}",
            style(super::format_ts(visit.timestamp)).dim(),
            visit.title,
            origin
        );
        println!("      {}", style(&visit.url).dim());
    }

    Ok(())
}
