//! CLI argument parsing for workoutindex

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "wi")]
#[command(author, version, about = "Reference workout index", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the index path from config
    #[arg(short, long)]
    pub index: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Find stored workouts similar to a query
    Search {
        /// Free-text query (e.g. goals joined by commas)
        #[arg(required = true)]
        query: String,

        /// Maximum hits to return
        #[arg(short, long)]
        k: Option<usize>,

        /// Keep warmups in the main results
        #[arg(long)]
        no_warmups: bool,

        /// Keep cooldowns in the main results
        #[arg(long)]
        no_cooldowns: bool,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show statistics for the index
    Stats,
}
