// Token-budgeted context assembly
//
// Concatenates note files into a single context string, stopping before the
// estimated token count of the context plus the pending prompt would cross
// the ceiling. Files that don't make it are counted so the caller can tell
// the user what was left out.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::config::constants::{
    CHARS_PER_TOKEN, CONTEXT_TOKEN_CEILING, DOCUMENT_SEPARATOR, NOTE_EXTENSIONS,
};
use crate::error::Result;

/// Estimate the token cost of `text`: `ceil(chars / 3.5)`.
pub fn estimate_tokens(text: &str) -> usize {
    estimate_chars(text.chars().count())
}

/// Same estimate from a character count. Character counts add under
/// concatenation, so running totals stay exact without rebuilding strings.
fn estimate_chars(chars: usize) -> usize {
    (chars as f64 / CHARS_PER_TOKEN).ceil() as usize
}

/// Result of one assembly pass.
#[derive(Debug, Clone, Default)]
pub struct Assembly {
    /// Concatenated document text.
    pub text: String,
    /// Files whose content made it into the context, in inclusion order.
    pub included: Vec<PathBuf>,
    /// Files left out because the ceiling would have been crossed.
    pub dropped: usize,
}

/// Transient buffer holding the context for the next request.
///
/// Rebuilding always replaces the previous content; callers never see stale
/// text from an earlier source.
#[derive(Debug, Default)]
pub struct ContextBuffer {
    assembly: Assembly,
}

impl ContextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assembled context text.
    pub fn text(&self) -> &str {
        &self.assembly.text
    }

    /// Files included by the last rebuild, in order.
    pub fn included(&self) -> &[PathBuf] {
        &self.assembly.included
    }

    /// Files left out by the last rebuild.
    pub fn dropped(&self) -> usize {
        self.assembly.dropped
    }

    /// Rebuild from the notes directly inside `folder`, sorted by file name.
    pub fn rebuild_from_folder(&mut self, folder: &Path, prompt: &str) -> Result<()> {
        self.assembly = assemble_folder(folder, prompt)?;
        Ok(())
    }

    /// Rebuild from a single note file (the no-folder fallback).
    pub fn rebuild_from_file(&mut self, file: &Path, prompt: &str) -> Result<()> {
        self.assembly = assemble_file(file, prompt);
        Ok(())
    }

    /// Drop any assembled context.
    pub fn clear(&mut self) {
        self.assembly = Assembly::default();
    }
}

/// Token budget left for context once the prompt is accounted for.
fn context_budget(prompt: &str) -> usize {
    CONTEXT_TOKEN_CEILING.saturating_sub(estimate_tokens(prompt))
}

fn assemble_folder(folder: &Path, prompt: &str) -> Result<Assembly> {
    let budget = context_budget(prompt);
    let files = note_files(folder)?;
    let separator_chars = DOCUMENT_SEPARATOR.chars().count();

    let mut assembly = Assembly::default();
    let mut running_chars = 0usize;

    for (index, path) in files.iter().enumerate() {
        let Some(content) = read_non_empty(path) else {
            continue;
        };

        let candidate_chars = if assembly.text.is_empty() {
            content.chars().count()
        } else {
            running_chars + separator_chars + content.chars().count()
        };

        if estimate_chars(candidate_chars) > budget {
            // The rest of the (name-sorted) list can't be reordered in, so
            // everything from here on is left out.
            assembly.dropped = files.len() - index;
            debug!(
                "Context budget reached at {}: leaving out {} file(s)",
                path.display(),
                assembly.dropped
            );
            break;
        }

        if !assembly.text.is_empty() {
            assembly.text.push_str(DOCUMENT_SEPARATOR);
        }
        assembly.text.push_str(&content);
        assembly.included.push(path.clone());
        running_chars = candidate_chars;
    }

    Ok(assembly)
}

fn assemble_file(file: &Path, prompt: &str) -> Assembly {
    let budget = context_budget(prompt);

    let Some(content) = read_non_empty(file) else {
        return Assembly::default();
    };

    if estimate_tokens(&content) > budget {
        warn!(
            "Note file {} exceeds the context budget on its own",
            file.display()
        );
        return Assembly {
            dropped: 1,
            ..Assembly::default()
        };
    }

    Assembly {
        text: content,
        included: vec![file.to_path_buf()],
        dropped: 0,
    }
}

/// Note files directly inside `folder`, sorted by file name.
fn note_files(folder: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(folder)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && has_note_extension(path))
        .collect();

    files.sort_by_key(|path| path.file_name().map(|name| name.to_os_string()));
    Ok(files)
}

fn has_note_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            NOTE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// Read a file and return its contents if non-empty, otherwise `None`.
fn read_non_empty(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(content) if !content.trim().is_empty() => Some(content),
        Ok(_) => None,
        Err(e) => {
            warn!("Failed to read {}: {}", path.display(), e);
            None
        }
    }
}
