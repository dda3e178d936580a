// Configuration loader
// Loads settings from ~/.vaultchat/config.toml with environment fallback
// for the API key.

use std::fs;
use tracing::debug;

use super::settings::Settings;
use crate::error::{Error, Result};

/// Environment variables consulted for the API key, in priority order.
const API_KEY_ENV_VARS: &[&str] = &["VAULTCHAT_API_KEY", "OPENAI_API_KEY"];

/// Load settings from the config file, or defaults when none exists.
///
/// A missing API key is not an error here: the key is only required once a
/// request is actually attempted, so `config` and `history` commands work
/// on a fresh install.
pub fn load_settings() -> Result<Settings> {
    let config_path = Settings::config_path()?;

    let mut settings = if config_path.exists() {
        let contents = fs::read_to_string(&config_path)?;
        toml::from_str(&contents).map_err(|e| {
            Error::Config(format!(
                "failed to parse {}: {e}",
                config_path.display()
            ))
        })?
    } else {
        debug!("No config file at {}, using defaults", config_path.display());
        Settings::default()
    };

    // Environment key fills in when the config has none.
    if settings.api_key.trim().is_empty() {
        for var in API_KEY_ENV_VARS {
            if let Ok(key) = std::env::var(var) {
                if !key.trim().is_empty() {
                    debug!("Using API key from {var}");
                    settings.api_key = key;
                    break;
                }
            }
        }
    }

    Ok(settings)
}
