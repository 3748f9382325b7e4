//! CLI argument parsing for the task list host

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::task::FilterMode;

#[derive(Parser, Debug)]
#[command(name = "tl")]
#[command(author, version, about = "Single-user task list", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the data directory from config
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new task
    Add {
        /// Task text (blank input adds nothing)
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Toggle completion on a task
    Toggle {
        /// Task id (unique prefix accepted)
        #[arg(required = true)]
        id: String,
    },

    /// Delete a task
    Rm {
        /// Task id (unique prefix accepted)
        #[arg(required = true)]
        id: String,
    },

    /// List tasks with summary counts
    List {
        /// Which tasks to show
        #[arg(short, long, value_enum, default_value_t = FilterMode::All)]
        filter: FilterMode,

        /// Sort newest first instead of insertion order
        #[arg(long)]
        newest_first: bool,
    },

    /// Delete all completed tasks
    Clear,
}
