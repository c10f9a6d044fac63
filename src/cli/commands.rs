//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "chain")]
#[command(about = "Dated journal entries kept in a notes vault", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Entry date (e.g., today, yesterday, last monday, 2023-05-15)
    #[arg(value_name = "DATE")]
    pub date: Option<String>,

    /// Log what is happening to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new journal vault
    Init {
        /// Directory to initialize (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Also create the default template file
        #[arg(long)]
        with_template: bool,
    },

    /// View or modify settings
    Config {
        /// Setting to get or set
        key: Option<String>,

        /// Value to set (if provided, sets the key)
        value: Option<String>,

        /// List all settings
        #[arg(short, long)]
        list: bool,
    },

    /// Print where the entry for a date lives, without creating it
    Path {
        /// Entry date (default: today)
        #[arg(value_name = "DATE")]
        date: Option<String>,
    },

    /// Sync host options and open today's entry if enabled
    Startup,
}
