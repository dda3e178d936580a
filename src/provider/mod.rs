// Chat-completion provider abstraction
//
// One trait so the session can be pointed at any OpenAI-compatible backend
// (or a mock server in tests) while the rest of the crate works with a
// unified interface.

use async_trait::async_trait;

mod openai;

pub use openai::OpenAiProvider;

use crate::error::Result;

/// A chat-completion backend.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send one system + user exchange and return the reply text, trimmed.
    ///
    /// No retry, no streaming: exactly one request goes out per call.
    async fn complete(&self, model: &str, system: &str, user: &str) -> Result<String>;

    /// Provider name for logs (e.g. "openai").
    fn name(&self) -> &str;
}
