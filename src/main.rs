// Vaultchat - note-vault chat assistant
// Main entry point

use anyhow::Result;
use clap::Parser;

use vaultchat::cli::{self, Cli, Commands, ConfigAction};

#[tokio::main]
async fn main() -> Result<()> {
    // Diagnostics go to stderr so the reply on stdout stays pipeable.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();

    match args.command {
        Commands::Ask {
            prompt,
            folder,
            file,
            model,
            no_context,
        } => cli::run_ask(prompt, folder, file, model, no_context).await,
        Commands::History { limit } => cli::run_history(limit),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Set { field, value } => cli::run_config_set(&field, &value),
        },
    }
}
