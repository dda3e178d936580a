// Command handlers

use anyhow::Result;
use std::path::PathBuf;

use crate::config::{load_settings, Settings};
use crate::history::RequestLog;
use crate::provider::OpenAiProvider;
use crate::session::{resolve_source, ContextSource, Session};

/// `vaultchat ask` — assemble context, send one request, print the reply.
pub async fn run_ask(
    prompt: String,
    folder: Option<PathBuf>,
    file: Option<PathBuf>,
    model: Option<String>,
    no_context: bool,
) -> Result<()> {
    let mut settings = load_settings()?;
    if let Some(model) = model {
        settings.model = model;
    }

    // Only validate configured paths when they are actually about to be
    // used; an override skips the stored ones entirely.
    if folder.is_none() && file.is_none() && !no_context {
        settings.validate()?;
    }

    let provider = OpenAiProvider::new(settings.api_key.clone(), settings.base_url.clone())?;
    let log = RequestLog::new(Settings::history_path()?)?;

    let source = if no_context {
        ContextSource::None
    } else {
        resolve_source(&settings, folder, file)
    };

    let mut session = Session::new(settings, provider, log);
    let outcome = session.ask(&prompt, &source).await?;

    if outcome.dropped > 0 {
        eprintln!(
            "Note: {} file(s) left out of the context to stay under the token budget",
            outcome.dropped
        );
    }

    println!("{}", outcome.reply);

    session.close()?;
    Ok(())
}

/// `vaultchat history` — print the most recent exchanges.
pub fn run_history(limit: usize) -> Result<()> {
    let log = RequestLog::new(Settings::history_path()?)?;
    let entries = log.recent(limit)?;

    if entries.is_empty() {
        println!("No history yet.");
        return Ok(());
    }

    for entry in entries {
        println!(
            "[{}] {}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.model
        );
        println!("  > {}", entry.prompt);
        println!("  {}", entry.reply.replace('\n', "\n  "));
        println!();
    }

    Ok(())
}

/// `vaultchat config show` — print effective settings, key redacted.
pub fn run_config_show() -> Result<()> {
    let settings = load_settings()?;

    println!("config file: {}", Settings::config_path()?.display());
    println!("history log: {}", Settings::history_path()?.display());
    println!("model:       {}", settings.model);
    println!("base-url:    {}", settings.base_url);
    println!("api-key:     {}", redact_key(&settings.api_key));
    println!(
        "note-file:   {}",
        settings
            .note_file
            .as_ref()
            .map_or_else(|| "(not set)".to_string(), |p| p.display().to_string())
    );
    println!(
        "note-folder: {}",
        settings
            .note_folder
            .as_ref()
            .map_or_else(|| "(not set)".to_string(), |p| p.display().to_string())
    );

    Ok(())
}

/// `vaultchat config set` — update one field and save.
pub fn run_config_set(field: &str, value: &str) -> Result<()> {
    let mut settings = load_settings()?;
    settings.set(field, value)?;
    settings.save()?;
    println!("Set {field}");
    Ok(())
}

fn redact_key(key: &str) -> String {
    let key = key.trim();
    if key.is_empty() {
        "(not set)".to_string()
    } else if key.chars().count() <= 8 {
        "set".to_string()
    } else {
        let head: String = key.chars().take(4).collect();
        let tail: String = key.chars().rev().take(4).collect::<Vec<_>>().iter().rev().collect();
        format!("set ({head}…{tail})")
    }
}
