//! Journey CLI - Command-line interface for browsing journey stores.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "journey")]
#[command(about = "Track and explore browsing journeys", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new journey store
    Init,
    /// Replay recorded navigation events (JSON lines) into the store
    Replay {
        /// Event file, one JSON event per line
        file: std::path::PathBuf,
    },
    /// List browsing paths
    Paths {
        /// Show all pages and links as one graph, not split into paths
        #[arg(long)]
        all: bool,
        /// Show every page of each path with its depth
        #[arg(long)]
        pages: bool,
        /// Omit paths consisting of a single page
        #[arg(long)]
        hide_single: bool,
        /// Start date (YYYY-MM-DD, local time)
        #[arg(long)]
        from: Option<String>,
        /// End date, inclusive (YYYY-MM-DD, local time)
        #[arg(long)]
        to: Option<String>,
    },
    /// List domains with visit counts
    Domains {
        /// Only domains visited at least this many times
        #[arg(long)]
        min_visits: Option<u64>,
        /// Substring to match against domain names
        #[arg(long)]
        search: Option<String>,
        /// Start date (YYYY-MM-DD, local time)
        #[arg(long)]
        from: Option<String>,
        /// End date, inclusive (YYYY-MM-DD, local time)
        #[arg(long)]
        to: Option<String>,
    },
    /// List domain-to-domain transitions
    Transitions {
        /// Only transitions touching this domain
        #[arg(long)]
        domain: Option<String>,
        /// Start date (YYYY-MM-DD, local time)
        #[arg(long)]
        from: Option<String>,
        /// End date, inclusive (YYYY-MM-DD, local time)
        #[arg(long)]
        to: Option<String>,
    },
    /// Show recent visits to a domain
    Visits {
        /// Exact domain name
        domain: String,
        /// Maximum number of visits to show
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Delete every visit to the pages of a path
    DeletePath {
        /// Path index as shown by `journey paths`
        index: usize,
        /// Start date used when listing paths (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// End date used when listing paths (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Drop visits older than the retention horizon and rebuild aggregates
    Compact {
        /// Override the configured horizon in days
        #[arg(long)]
        horizon_days: Option<u32>,
        /// Report without writing
        #[arg(long)]
        dry_run: bool,
    },
    /// Clear all history, or the visits within a date range
    Clear {
        /// Start date (YYYY-MM-DD, local time)
        #[arg(long)]
        from: Option<String>,
        /// End date, inclusive (YYYY-MM-DD, local time)
        #[arg(long)]
        to: Option<String>,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Export visits and aggregates as JSON
    Export {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,
    },
    /// Show summary statistics
    Stats,
    /// Print the journey graph
    Graph {
        /// Output format (dot, json)
        #[arg(long, default_value = "dot")]
        format: String,
        /// Start date (YYYY-MM-DD, local time)
        #[arg(long)]
        from: Option<String>,
        /// End date, inclusive (YYYY-MM-DD, local time)
        #[arg(long)]
        to: Option<String>,
    },
    /// Check that aggregates match the visit log
    Verify {
        /// Rebuild aggregates when drift is found
        #[arg(long)]
        repair: bool,
    },
}

fn main() -> Result<()> {
    // Respects RUST_LOG environment variable (e.g., RUST_LOG=debug)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => commands::init::run(),
        Commands::Replay { file } => commands::replay::run(&file),
        Commands::Paths {
            all,
            pages,
            hide_single,
            from,
            to,
        } => commands::paths::run(all, pages, hide_single, from.as_deref(), to.as_deref()),
        Commands::Domains {
            min_visits,
            search,
            from,
            to,
        } => commands::domains::run(min_visits, search, from.as_deref(), to.as_deref()),
        Commands::Transitions { domain, from, to } => {
            commands::transitions::run(domain, from.as_deref(), to.as_deref())
        }
        Commands::Visits { domain, limit } => commands::visits::run(&domain, limit),
        Commands::DeletePath {
            index,
            from,
            to,
            yes,
        } => commands::delete_path::run(index, from.as_deref(), to.as_deref(), yes),
        Commands::Compact {
            horizon_days,
            dry_run,
        } => commands::compact::run(horizon_days, dry_run),
        Commands::Clear { from, to, yes } => {
            commands::clear::run(from.as_deref(), to.as_deref(), yes)
        }
        Commands::Export { output } => commands::export::run(output.as_deref()),
        Commands::Stats => commands::stats::run(),
        Commands::Graph { format, from, to } => {
            commands::graph::run(&format, from.as_deref(), to.as_deref())
        }
        Commands::Verify { repair } => commands::verify::run(repair),
    }
}
