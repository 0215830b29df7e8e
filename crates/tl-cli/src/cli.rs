//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Business journeys from Google location history.
///
/// Reads a year of Semantic Location History from a Takeout export, groups it
/// into journeys between places, and keeps those made during working hours.
#[derive(Debug, Parser)]
#[command(name = "tl", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Find journeys and write bins.json and bins.csv.
    Bins {
        /// The Semantic Location History folder of the export.
        #[arg(long)]
        folder: Option<PathBuf>,

        /// Year to read.
        #[arg(long)]
        year: Option<i32>,

        /// Directory to write the output files to.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Print the effective configuration.
    Config,
}
