//! Trust engine CLI
//!
//! Local driver for the contributor trust engine. Reads histories and
//! configuration from JSON files, runs a single engine call and prints JSON:
//! - Scoring a history
//! - Replaying a score curve
//! - Converting between full and compact history encodings
//! - Appending events with the retention cap applied

mod commands;
mod settings;

use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::AddEventArgs;
use settings::Settings;

#[derive(Debug, Parser)]
#[command(name = "trust-cli", version, about = "Contributor trust scoring")]
struct Cli {
    /// Scoring configuration (JSON)
    #[arg(long, global = true, env = "TRUST_CONFIG_PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score a contributor history
    Score {
        history: PathBuf,
        /// Reference time (RFC 3339); defaults to the current time
        #[arg(long)]
        now: Option<DateTime<Utc>>,
        /// Input is in compact form
        #[arg(long)]
        compact: bool,
    },
    /// Score after every event, oldest first
    Replay {
        history: PathBuf,
        #[arg(long)]
        now: Option<DateTime<Utc>>,
        #[arg(long)]
        compact: bool,
    },
    /// Convert a full history to compact form
    Compact { history: PathBuf },
    /// Convert a compact history to full form
    Expand { history: PathBuf },
    /// Append an event to a history file
    Add {
        history: PathBuf,
        /// approve, reject, close or selfClose
        #[arg(long = "type")]
        event_type: String,
        #[arg(long)]
        pr: i64,
        #[arg(long)]
        lines: Option<i64>,
        #[arg(long = "label")]
        labels: Vec<String>,
        #[arg(long)]
        severity: Option<String>,
        #[arg(long)]
        files: Option<i64>,
        /// Event time (RFC 3339); defaults to the current time
        #[arg(long)]
        at: Option<DateTime<Utc>>,
        /// Retention cap
        #[arg(long, env = "TRUST_MAX_EVENTS")]
        max_events: Option<usize>,
        #[arg(long)]
        compact: bool,
    },
    /// Print the configured tier table
    Tiers,
}

fn main() -> Result<()> {
    // Log to stderr (stdout carries the JSON output)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,trust_engine=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    settings::load_dotenv();
    let cli = Cli::parse();
    let settings = Settings::from_env()?.with_config_path(cli.config);
    let config = settings.load_trust_config()?;

    let output = match cli.command {
        Command::Score {
            history,
            now,
            compact,
        } => commands::score(&config, &history, compact, now)?,
        Command::Replay {
            history,
            now,
            compact,
        } => commands::replay(&config, &history, compact, now)?,
        Command::Compact { history } => commands::compact(&history)?,
        Command::Expand { history } => commands::expand(&history)?,
        Command::Add {
            history,
            event_type,
            pr,
            lines,
            labels,
            severity,
            files,
            at,
            max_events,
            compact,
        } => {
            let settings = settings.with_max_events(max_events);
            let args = AddEventArgs {
                event_type,
                pr_number: pr,
                lines_changed: lines,
                labels,
                severity,
                files_changed: files,
                at,
            };
            commands::add(&settings, &history, compact, args)?
        }
        Command::Tiers => commands::tiers(&config)?,
    };

    println!("{}", output);
    Ok(())
}
