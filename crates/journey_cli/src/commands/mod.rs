//! CLI commands.

pub mod clear;
pub mod compact;
pub mod delete_path;
pub mod domains;
pub mod export;
pub mod graph;
pub mod init;
pub mod paths;
pub mod replay;
pub mod stats;
pub mod transitions;
pub mod verify;
pub mod visits;

use anyhow::{bail, Context, Result};
use chrono::{Local, LocalResult, NaiveDate, NaiveDateTime, TimeZone};
use console::style;
use journey_core::{JourneyError, JourneyTracker, QueryFilter, Timestamp};
use std::io::{self, Write};

/// Opens the journey store in the current directory.
pub fn open() -> Result<JourneyTracker> {
    JourneyTracker::open(".").map_err(with_hint)
}

/// Prints the recovery suggestion for `err`, if any, and converts it.
pub fn with_hint(err: JourneyError) -> anyhow::Error {
    if let Some(suggestion) = err.recovery_suggestion() {
        eprintln!("{} {}", style("Hint:").cyan(), suggestion);
    }
    err.into()
}

/// Builds a date filter from optional `--from`/`--to` arguments.
pub fn date_filter(from: Option<&str>, to: Option<&str>) -> Result<QueryFilter> {
    let start = from.map(start_of_day).transpose()?;
    let end = to.map(end_of_day).transpose()?;
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            bail!("--from must not be after --to");
        }
    }
    Ok(QueryFilter::between(start, end))
}

/// Local midnight of a `YYYY-MM-DD` date, in milliseconds.
pub fn start_of_day(date: &str) -> Result<Timestamp> {
    let day = parse_date(date)?;
    local_millis(day.and_hms_milli_opt(0, 0, 0, 0), date)
}

/// Last millisecond of a `YYYY-MM-DD` date in local time.
pub fn end_of_day(date: &str) -> Result<Timestamp> {
    let day = parse_date(date)?;
    local_millis(day.and_hms_milli_opt(23, 59, 59, 999), date)
}

fn parse_date(date: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", date))
}

fn local_millis(naive: Option<NaiveDateTime>, date: &str) -> Result<Timestamp> {
    let naive = naive.with_context(|| format!("Invalid time on {}", date))?;
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Ok(dt.timestamp_millis()),
        LocalResult::None => bail!("{} does not exist in the local time zone", naive),
    }
}

/// Formats a millisecond timestamp as local date and time.
pub fn format_ts(ms: Timestamp) -> String {
    match Local.timestamp_millis_opt(ms) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => {
            dt.format("%Y-%m-%d %H:%M").to_string()
        }
        LocalResult::None => ms.to_string(),
    }
}

/// Asks a yes/no question on stdout; anything but `y` is a no.
pub fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N]: ", question);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}
