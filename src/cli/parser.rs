// Command-line interface definition

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Ask questions about a vault of notes.
#[derive(Debug, Parser)]
#[command(name = "vaultchat", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Send a prompt, with note context assembled under the token budget
    Ask {
        /// The question to ask
        prompt: String,

        /// Use every note directly inside this folder as context
        #[arg(long, conflicts_with = "file")]
        folder: Option<PathBuf>,

        /// Use a single note file as context
        #[arg(long)]
        file: Option<PathBuf>,

        /// Override the configured model for this request
        #[arg(long)]
        model: Option<String>,

        /// Send the prompt without any note context
        #[arg(long, conflicts_with_all = ["folder", "file"])]
        no_context: bool,
    },

    /// Show recent request/response history
    History {
        /// Number of entries to show
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Show or change persistent settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective settings (API key redacted)
    Show,

    /// Set a field: api-key, model, base-url, note-file, note-folder
    Set {
        /// Field name
        field: String,
        /// New value
        value: String,
    },
}
