//! List domain transitions.

use anyhow::Result;
use console::style;
use journey_core::split_transition_key;

/// Print transitions, most frequent first.
pub fn run(domain: Option<String>, from: Option<&str>, to: Option<&str>) -> Result<()> {
    let mut filter = super::date_filter(from, to)?;
    filter.domain = domain;

    let mut tracker = super::open()?;
    let transitions = tracker.query().transitions(&filter);

    if transitions.is_empty() {
        println!("No transitions match.");
        return Ok(());
    }

    let mut rows: Vec<_> = transitions.iter().collect();
    rows.sort_by(|a, b| b.1.count.cmp(&a.1.count).then(a.0.cmp(b.0)));

    println!("{}", style("Transitions:").bold());
    for (key, transition) in rows {
        let (from_domain, to_domain) = split_transition_key(key).unwrap_or((key.as_str(), ""));
        println!(
            "  {:>6}  {} {} {}",
            style(transition.count).green(),
            from_domain,
            style("→").cyan(),
            to_domain
        );
    }

    Ok(())
}
