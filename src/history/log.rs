// Append-only request/response history, one JSON object per line

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// A single logged exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Unique ID for this entry
    pub id: String,

    /// When this exchange occurred
    pub timestamp: DateTime<Utc>,

    /// The user's prompt
    pub prompt: String,

    /// The model's reply
    pub reply: String,

    /// Which model produced the reply
    pub model: String,
}

impl HistoryEntry {
    pub fn new(prompt: String, reply: String, model: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            prompt,
            reply,
            model,
        }
    }
}

/// History log that appends JSONL entries.
///
/// Entries are buffered and flushed in batches; `flush` runs on drop so a
/// short-lived CLI invocation still lands on disk.
pub struct RequestLog {
    log_path: PathBuf,
    buffer: Vec<HistoryEntry>,
    flush_threshold: usize,
}

impl RequestLog {
    /// Create a logger, making the parent directory if needed.
    pub fn new(log_path: PathBuf) -> Result<Self> {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        Ok(Self {
            log_path,
            buffer: Vec::new(),
            flush_threshold: 10,
        })
    }

    /// Append one exchange; returns the entry id.
    pub fn append(&mut self, prompt: &str, reply: &str, model: &str) -> Result<String> {
        let entry = HistoryEntry::new(
            prompt.to_string(),
            reply.to_string(),
            model.to_string(),
        );

        let id = entry.id.clone();
        self.buffer.push(entry);

        if self.buffer.len() >= self.flush_threshold {
            self.flush()?;
        }

        Ok(id)
    }

    /// Flush buffered entries to disk.
    pub fn flush(&mut self) -> Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        debug!("Flushing {} history entries to disk", self.buffer.len());

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;

        for entry in &self.buffer {
            let json = serde_json::to_string(entry)
                .map_err(|e| Error::History(format!("failed to serialize entry: {e}")))?;
            writeln!(file, "{json}")?;
        }

        self.buffer.clear();
        Ok(())
    }

    /// The most recent `limit` entries, oldest first.
    ///
    /// Unparseable lines (hand-edited files) are skipped with a warning
    /// rather than poisoning the whole log.
    pub fn recent(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        let mut entries: Vec<HistoryEntry> = Vec::new();

        if self.log_path.exists() {
            let contents = std::fs::read_to_string(&self.log_path)?;
            for line in contents.lines() {
                if line.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str(line) {
                    Ok(entry) => entries.push(entry),
                    Err(e) => warn!("Skipping malformed history line: {e}"),
                }
            }
        }

        entries.extend(self.buffer.iter().cloned());

        let skip = entries.len().saturating_sub(limit);
        Ok(entries.split_off(skip))
    }

    /// The log file path.
    pub fn path(&self) -> &Path {
        &self.log_path
    }
}

impl Drop for RequestLog {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            eprintln!("Failed to flush history on drop: {e}");
        }
    }
}
