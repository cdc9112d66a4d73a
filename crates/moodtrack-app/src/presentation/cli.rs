use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "moodtrack",
    about = "Record mood, stress and journal check-ins and track streaks",
    version
)]
pub struct Cli {
    /// Config file (default: <config dir>/moodtrack/config.json)
    #[arg(long, global = true, env = "MOODTRACK_CONFIG")]
    pub config: Option<PathBuf>,

    /// SQLite database file for this run, overriding the config file
    #[arg(long, global = true, env = "MOODTRACK_DB")]
    pub db: Option<PathBuf>,

    /// Evaluate streaks and trends as of this date (YYYY-MM-DD)
    #[arg(long, global = true)]
    pub today: Option<NaiveDate>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(flatten)]
    Store(StoreCommand),

    /// Compute metrics over a JSON array of check-ins without touching the database
    Compute {
        /// JSON file to read; stdin when omitted or `-`
        input: Option<PathBuf>,
    },

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Subcommands that read or write the check-in store
#[derive(Subcommand, Debug)]
pub enum StoreCommand {
    /// Record a check-in
    Record {
        /// Subject the check-in belongs to
        subject: String,

        /// mood, stress or journal
        #[arg(short, long, default_value = "mood")]
        kind: String,

        /// Numeric score
        #[arg(short, long, allow_negative_numbers = true)]
        value: Option<f64>,

        /// Free text, required for journal entries
        #[arg(short, long)]
        note: Option<String>,

        /// RFC 3339 timestamp (default: now)
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },

    /// Streak, average and trend for one subject
    Metrics {
        subject: String,

        #[arg(short, long)]
        kind: Option<String>,
    },

    /// Metrics for every subject, longest current streak first
    Leaderboard {
        #[arg(short, long)]
        kind: Option<String>,
    },

    /// Per-day check-in calendar for a month (default: the current month)
    Calendar {
        subject: String,

        #[arg(short, long)]
        year: Option<i32>,

        #[arg(short, long)]
        month: Option<u32>,

        #[arg(short, long)]
        kind: Option<String>,
    },

    /// Daily series for the last N days
    Trend {
        subject: String,

        #[arg(short, long, default_value_t = 30)]
        days: u32,

        #[arg(short, long)]
        kind: Option<String>,
    },

    /// Entries recorded on one day
    Day {
        subject: String,

        /// YYYY-MM-DD
        date: String,

        #[arg(short, long)]
        kind: Option<String>,
    },

    /// Store check-ins that were queued while the database was unavailable
    Sync,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print effective configuration and resolved paths
    Show,

    /// Persist a new log level (error, warn, info, debug, trace)
    SetLogLevel { level: String },
}
