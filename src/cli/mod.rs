//! CLI module for Reelpage.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Reelpage - static pages from transcribed videos
///
/// Turns a directory of downloaded video folders (metadata, description and
/// transcript) into cleaned-up HTML pages plus an index.
#[derive(Parser, Debug)]
#[command(name = "reelpage")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build pages for the video folders in the input directory
    Build {
        /// Input directory (overrides config)
        #[arg(short, long)]
        input: Option<String>,

        /// Output directory (overrides config)
        #[arg(short, long)]
        output: Option<String>,

        /// Only process the first N folders (sorted by name)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Process a single folder by name
        #[arg(short, long, conflicts_with = "limit")]
        folder: Option<String>,

        /// Number of folders processed concurrently (1-20)
        #[arg(short, long)]
        workers: Option<usize>,

        /// Write the run report as JSON to this file
        #[arg(long)]
        report: Option<String>,

        /// Do not regenerate index.html afterwards
        #[arg(long)]
        no_index: bool,
    },

    /// Regenerate index.html from the pages in the output directory
    Index {
        /// Output directory (overrides config)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Check configuration, API key and directories
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write a configuration file with the default settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
