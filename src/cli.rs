// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "image-retention")]
#[command(about = "Keep the newest OpenStack images of a family and delete the rest")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print the final result
    #[arg(long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print JSON lines instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to the config file (default: discover in the current directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new image-retention.yml configuration file
    Init {
        /// Image name to manage
        #[arg(long)]
        identifier: Option<String>,

        /// Number of images to keep
        #[arg(long, allow_negative_numbers = true)]
        keep: Option<i64>,

        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },

    /// Show which images would be kept and which deleted
    Plan,

    /// Enforce the retention policy against the image catalog
    Run {
        /// Identifier of the image the build just produced
        #[arg(short, long)]
        artifact: Option<String>,
    },
}
