//! List domains.

use anyhow::Result;
use console::style;

/// Print domains, most visited first.
pub fn run(
    min_visits: Option<u64>,
    search: Option<String>,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<()> {
    let mut filter = super::date_filter(from, to)?;
    filter.min_visits = min_visits;
    filter.search = search;

    let mut tracker = super::open()?;
    let domains = tracker.query().domains(&filter);

    if domains.is_empty() {
        println!("No domains match.");
        return Ok(());
    }

    let mut rows: Vec<_> = domains.iter().collect();
    rows.sort_by(|a, b| b.1.visit_count.cmp(&a.1.visit_count).then(a.0.cmp(b.0)));

    println!("{}", style("Domains:").bold());
    for (domain, stats) in rows {
        println!(
            "  {:>6}  {}  {}",
            style(stats.visit_count).green(),
            domain,
            style(format!("last {}", super::format_ts(stats.last_visit))).dim()
        );
    }

    Ok(())
}
