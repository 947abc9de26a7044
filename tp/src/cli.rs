//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Trainplan - week-by-week training plan synthesis
#[derive(Debug, Parser)]
#[command(
    name = "tp",
    about = "Generate multi-week training plans one cached week at a time",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build a full plan from a request file
    Build {
        /// Plan request (YAML or JSON)
        #[arg(short, long, value_name = "FILE")]
        request: PathBuf,

        /// Resume or name a run; a fresh id is generated when omitted
        #[arg(long)]
        run_id: Option<String>,

        /// Cache root directory (overrides config)
        #[arg(long, value_name = "DIR")]
        cache_dir: Option<PathBuf>,

        /// Write the plan JSON here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Ignore cached responses and regenerate every week
        #[arg(long)]
        refresh: bool,
    },

    /// Print the directive for one week without calling the generator
    Prompt {
        /// Plan request (YAML or JSON)
        #[arg(short, long, value_name = "FILE")]
        request: PathBuf,

        /// Week number, starting at 1
        #[arg(short, long, default_value_t = 1)]
        week: u32,

        /// Summary of the previous week
        #[arg(short, long)]
        summary: Option<String>,
    },

    /// Parse a raw generator response or cache entry
    Parse {
        /// Raw response text or a cached week file
        file: PathBuf,

        /// Parse as a complete plan and print it as JSON
        #[arg(long)]
        plan: bool,
    },

    /// Print per-week summaries of a saved plan
    Summarize {
        /// Plan JSON file
        file: PathBuf,
    },
}
