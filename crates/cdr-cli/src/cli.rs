//! CLI argument definitions

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use cdr_db::CdrQuery;

/// Search call detail records and play call recordings
#[derive(Parser, Debug)]
#[command(name = "cdr")]
#[command(version)]
#[command(about = "Search call detail records and play call recordings")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Custom database path
    #[arg(long, global = true, env = "CDR_DB_PATH")]
    pub db_path: Option<PathBuf>,

    /// Directory holding call recordings (<anything>_<uuid>.wav)
    #[arg(long, global = true, env = "CDR_RECORDINGS_DIR")]
    pub recordings_dir: Option<PathBuf>,

    /// Output format (auto-detects based on TTY if not specified)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Output JSON (alias for --format json)
    #[arg(long, global = true)]
    pub json: bool,

    /// Pretty-print JSON with indentation
    #[arg(long, short = 'p', global = true)]
    pub pretty: bool,

    /// Force color output
    #[arg(long, global = true)]
    pub color: bool,

    /// Disable color output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Get the effective output format
    pub fn effective_format(&self) -> OutputFormat {
        if self.json {
            return OutputFormat::Json;
        }
        if let Some(f) = self.format {
            return f;
        }
        if atty::is(atty::Stream::Stdout) {
            OutputFormat::Human
        } else {
            OutputFormat::Json
        }
    }

    /// Check if colors should be used
    pub fn use_color(&self) -> bool {
        if self.no_color {
            return false;
        }
        if self.color {
            return true;
        }
        atty::is(atty::Stream::Stdout)
    }
}

/// Output format for commands
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output with colors
    #[default]
    Human,
    /// JSON output
    Json,
    /// Minimal text output (one call per line)
    Minimal,
}

/// Record filters shared by search and stats
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Destination number contains this text (case-insensitive)
    #[arg(short, long)]
    pub destination: Option<String>,

    /// Calls starting at or after (YYYY-MM-DD or YYYY-MM-DD HH:MM:SS)
    #[arg(long, value_parser = parse_start_bound)]
    pub from: Option<NaiveDateTime>,

    /// Calls ending at or before (a bare date includes the whole day)
    #[arg(long, value_parser = parse_end_bound)]
    pub to: Option<NaiveDateTime>,
}

impl FilterArgs {
    pub fn to_query(&self) -> CdrQuery {
        CdrQuery {
            destination: self.destination.clone(),
            from: self.from,
            to: self.to,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search calls, transferred legs folded into one call
    Search {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Show one call with its transfer leg and recording
    Show {
        /// Record id
        id: i64,
    },

    /// Resolve a call recording and optionally copy it out
    Audio {
        /// Call UUID
        uuid: String,

        /// Write the recording here ("-" for stdout) instead of printing its path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export matching calls as CSV
    Export {
        #[command(flatten)]
        filters: FilterArgs,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Call statistics and distributions
    Stats {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Watch the recordings directory and answer UUID lookups from stdin
    Watch {
        /// Capacity of the watch event queue
        #[arg(long, default_value = "1024")]
        queue: usize,
    },

    /// Diagnose database and recordings configuration
    Doctor,
}

fn parse_bound(input: &str, day_time: NaiveTime) -> Result<NaiveDateTime, String> {
    let input = input.trim();
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(value) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(value);
        }
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map(|date| date.and_time(day_time))
        .map_err(|_| format!("invalid date {input:?} (expected YYYY-MM-DD[ HH:MM:SS])"))
}

/// A bare date starts at midnight
pub fn parse_start_bound(input: &str) -> Result<NaiveDateTime, String> {
    parse_bound(input, NaiveTime::MIN)
}

/// A bare date ends at the last second of the day
pub fn parse_end_bound(input: &str) -> Result<NaiveDateTime, String> {
    let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
    parse_bound(input, end_of_day)
}
