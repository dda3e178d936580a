// Library error types
//
// Two failure categories reach the user before anything else: a missing API
// key (caught before any network activity) and an API/network failure
// carrying the underlying message. The rest cover local concerns.

use thiserror::Error;

/// Errors surfaced by the vaultchat library.
#[derive(Debug, Error)]
pub enum Error {
    /// No API key configured; checked before any network call.
    #[error(
        "No API key configured. Set one with:\n\n  \
         vaultchat config set api-key <KEY>\n\n\
         or export VAULTCHAT_API_KEY."
    )]
    MissingApiKey,

    /// Empty or whitespace-only prompt; rejected before any network call.
    #[error("Prompt is empty")]
    EmptyPrompt,

    /// HTTP failure or malformed response from the chat-completion endpoint.
    #[error("API request failed: {0}")]
    Api(String),

    /// Configuration file problems (unreadable, unparseable, bad field).
    #[error("Configuration error: {0}")]
    Config(String),

    /// History log problems other than plain I/O.
    #[error("History log error: {0}")]
    History(String),

    /// Filesystem errors from context assembly or the history log.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
