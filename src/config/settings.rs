// Configuration structs

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use super::constants::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::error::{Error, Result};

/// Persistent settings, stored as TOML at `~/.vaultchat/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Bearer key for the chat-completion API.
    #[serde(default)]
    pub api_key: String,

    /// Model identifier sent with every request.
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the OpenAI-compatible endpoint.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Note file used as context when no folder is chosen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note_file: Option<PathBuf>,

    /// Folder of notes used as context; takes precedence over `note_file`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note_folder: Option<PathBuf>,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            base_url: default_base_url(),
            note_file: None,
            note_folder: None,
        }
    }
}

impl Settings {
    /// Directory holding the config file and the history log.
    pub fn config_dir() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(".vaultchat"))
            .ok_or_else(|| Error::Config("could not determine home directory".to_string()))
    }

    /// Path of the persistent settings file.
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Path of the append-only request/response log.
    pub fn history_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("history.jsonl"))
    }

    /// Return the API key, or the missing-key error. Called before any
    /// network activity.
    pub fn require_api_key(&self) -> Result<&str> {
        let key = self.api_key.trim();
        if key.is_empty() {
            Err(Error::MissingApiKey)
        } else {
            Ok(key)
        }
    }

    /// Validate configured paths and return pointed errors.
    pub fn validate(&self) -> Result<()> {
        if let Some(ref folder) = self.note_folder {
            if !folder.is_dir() {
                return Err(Error::Config(format!(
                    "note folder does not exist: {}\n\
                     Update it:\n  vaultchat config set note-folder <DIR>",
                    folder.display()
                )));
            }
        }

        if let Some(ref file) = self.note_file {
            if !file.is_file() {
                return Err(Error::Config(format!(
                    "note file does not exist: {}\n\
                     Update it:\n  vaultchat config set note-file <FILE>",
                    file.display()
                )));
            }
        }

        Ok(())
    }

    /// Save settings as pretty TOML, creating `~/.vaultchat` if needed.
    pub fn save(&self) -> Result<()> {
        let config_dir = Self::config_dir()?;
        let config_path = Self::config_path()?;

        fs::create_dir_all(&config_dir)?;

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize settings: {e}")))?;
        fs::write(&config_path, toml_string)?;

        tracing::info!("Configuration saved to {}", config_path.display());
        Ok(())
    }

    /// Set a field by its CLI name (`vaultchat config set <field> <value>`).
    pub fn set(&mut self, field: &str, value: &str) -> Result<()> {
        match field {
            "api-key" => self.api_key = value.to_string(),
            "model" => self.model = value.to_string(),
            "base-url" => self.base_url = value.trim_end_matches('/').to_string(),
            "note-file" => self.note_file = Some(PathBuf::from(value)),
            "note-folder" => self.note_folder = Some(PathBuf::from(value)),
            _ => {
                return Err(Error::Config(format!(
                    "unknown field '{field}'. Valid fields: \
                     api-key, model, base-url, note-file, note-folder"
                )))
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(settings.api_key.is_empty());
        assert_eq!(settings.model, DEFAULT_MODEL);
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert!(settings.note_file.is_none());
        assert!(settings.note_folder.is_none());
    }

    #[test]
    fn test_require_api_key_rejects_blank() {
        let mut settings = Settings::default();
        assert!(matches!(
            settings.require_api_key(),
            Err(Error::MissingApiKey)
        ));

        settings.api_key = "   ".to_string();
        assert!(matches!(
            settings.require_api_key(),
            Err(Error::MissingApiKey)
        ));

        settings.api_key = "sk-test".to_string();
        assert_eq!(settings.require_api_key().unwrap(), "sk-test");
    }

    #[test]
    fn test_toml_roundtrip_with_missing_fields() {
        // Old config files may carry only the key; everything else defaults.
        let settings: Settings = toml::from_str(r#"api_key = "sk-abc""#).unwrap();
        assert_eq!(settings.api_key, "sk-abc");
        assert_eq!(settings.model, DEFAULT_MODEL);

        let rendered = toml::to_string_pretty(&settings).unwrap();
        let reparsed: Settings = toml::from_str(&rendered).unwrap();
        assert_eq!(reparsed.api_key, settings.api_key);
        assert_eq!(reparsed.model, settings.model);
    }

    #[test]
    fn test_set_known_and_unknown_fields() {
        let mut settings = Settings::default();
        settings.set("model", "gpt-4o").unwrap();
        assert_eq!(settings.model, "gpt-4o");

        settings.set("base-url", "https://example.test/").unwrap();
        assert_eq!(settings.base_url, "https://example.test");

        settings.set("note-folder", "/tmp/notes").unwrap();
        assert_eq!(settings.note_folder, Some(PathBuf::from("/tmp/notes")));

        assert!(matches!(
            settings.set("temperature", "0.7"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_validate_rejects_missing_paths() {
        let settings = Settings {
            note_folder: Some(PathBuf::from("/definitely/not/a/real/dir")),
            ..Settings::default()
        };
        assert!(matches!(settings.validate(), Err(Error::Config(_))));
    }
}
