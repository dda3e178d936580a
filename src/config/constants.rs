// Project-wide constants
//
// Centralised here so token budgets and other magic values have one
// source of truth. Import via `use crate::config::constants::*;`.

/// Ceiling on the estimated token count of an assembled context plus the
/// pending prompt. Documents that would cross it are left out.
pub const CONTEXT_TOKEN_CEILING: usize = 15_000;

/// Characters per estimated token. Crude, but close enough for budgeting.
pub const CHARS_PER_TOKEN: f64 = 3.5;

/// Default base URL of the chat-completion endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Default model identifier sent with requests.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Separator inserted between documents in an assembled context.
pub const DOCUMENT_SEPARATOR: &str = "\n\n---\n\n";

/// File extensions treated as notes when assembling a folder context.
pub const NOTE_EXTENSIONS: &[&str] = &["md", "markdown", "txt"];

/// System instruction sent with every request.
pub const SYSTEM_INSTRUCTION: &str =
    "You are a helpful assistant. Answer using the provided note context when it is relevant.";
