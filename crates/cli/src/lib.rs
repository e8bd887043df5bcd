//! # Studio CLI
//!
//! Command-line interface for Schema Studio.
//!
//! ## Commands
//!
//! - `new` - Create a new schema file
//! - `info` - Display information about a schema
//! - `validate` - Validate a schema file
//! - `signature` - Print the change-detection signature of a schema
//! - `replay` - Run an edit script through an editor session with autosave
//!

pub mod commands;
pub mod output;
pub mod script;

use clap::{Parser, Subcommand};
use commands::ReplayOptions;
use std::path::PathBuf;

/// CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// CLI name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[derive(Debug, Parser)]
#[command(name = "schema-studio")]
#[command(version, about = "Schema Studio - design database schemas with undo/redo and autosave", long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new schema file
    New {
        /// Schema name
        name: String,

        /// Schema description
        #[arg(short, long)]
        description: Option<String>,

        /// Output path (defaults to a file named after the schema)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Display information about a schema
    Info {
        /// Schema file
        file: PathBuf,
    },

    /// Validate a schema file
    Validate {
        /// Schema file
        file: PathBuf,
    },

    /// Print the change-detection signature of a schema
    Signature {
        /// Schema file
        file: PathBuf,
    },

    /// Replay an edit script against a schema, autosaving to the same file
    Replay {
        /// Schema file
        file: PathBuf,

        /// JSON script of edit/undo/redo/wait/flush steps
        #[arg(short, long)]
        script: PathBuf,

        /// Editor config (TOML)
        #[arg(short, long, env = "SCHEMA_STUDIO_CONFIG")]
        config: Option<PathBuf>,

        /// Autosave debounce delay in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Maximum number of history entries
        #[arg(long)]
        max_history: Option<usize>,

        /// Disable autosave
        #[arg(long)]
        no_autosave: bool,
    },
}

/// Run a parsed command line
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::New {
            name,
            description,
            output,
            force,
        } => commands::new_schema(&name, description, output, force),
        Commands::Info { file } => commands::info(&file),
        Commands::Validate { file } => commands::validate(&file),
        Commands::Signature { file } => commands::print_signature(&file),
        Commands::Replay {
            file,
            script,
            config,
            delay_ms,
            max_history,
            no_autosave,
        } => {
            let options = ReplayOptions {
                config,
                delay_ms,
                max_history,
                no_autosave,
            };
            commands::replay(&file, &script, &options).await
        }
    }
}
