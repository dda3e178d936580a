// Session lifecycle: explicit init / ask / close
//
// The open and close hooks the original note-app host provided become a
// constructor and a `close` call. One request is in flight at a time:
// `ask` takes `&mut self` and the CLI is sequential.

use std::path::PathBuf;
use tracing::debug;

use crate::config::constants::SYSTEM_INSTRUCTION;
use crate::config::Settings;
use crate::context::ContextBuffer;
use crate::error::{Error, Result};
use crate::history::RequestLog;
use crate::provider::ChatProvider;

/// Where the context for a request comes from.
#[derive(Debug, Clone)]
pub enum ContextSource {
    /// Every note directly inside a folder, sorted by name.
    Folder(PathBuf),
    /// A single note file.
    File(PathBuf),
    /// No context; the prompt goes out alone.
    None,
}

/// Pick the context source: CLI overrides win, then the configured folder,
/// then the configured file.
pub fn resolve_source(
    settings: &Settings,
    folder_override: Option<PathBuf>,
    file_override: Option<PathBuf>,
) -> ContextSource {
    if let Some(folder) = folder_override {
        return ContextSource::Folder(folder);
    }
    if let Some(file) = file_override {
        return ContextSource::File(file);
    }
    if let Some(ref folder) = settings.note_folder {
        return ContextSource::Folder(folder.clone());
    }
    if let Some(ref file) = settings.note_file {
        return ContextSource::File(file.clone());
    }
    ContextSource::None
}

/// Outcome of one ask: the reply plus what context assembly did.
#[derive(Debug)]
pub struct AskOutcome {
    /// The model's reply, trimmed.
    pub reply: String,
    /// How many note files made it into the context.
    pub included: usize,
    /// How many note files were left out to stay under the token budget.
    pub dropped: usize,
}

/// One user session: settings, a provider, the context buffer, and the
/// history log.
pub struct Session<P: ChatProvider> {
    settings: Settings,
    provider: P,
    context: ContextBuffer,
    log: RequestLog,
}

impl<P: ChatProvider> Session<P> {
    pub fn new(settings: Settings, provider: P, log: RequestLog) -> Self {
        Self {
            settings,
            provider,
            context: ContextBuffer::new(),
            log,
        }
    }

    /// Run one request: validate, rebuild the context buffer, call the
    /// provider, log the exchange.
    ///
    /// Rejects empty prompts and a missing API key before any filesystem or
    /// network work happens.
    pub async fn ask(&mut self, prompt: &str, source: &ContextSource) -> Result<AskOutcome> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(Error::EmptyPrompt);
        }
        self.settings.require_api_key()?;

        // Rebuilding replaces whatever an earlier ask assembled.
        match source {
            ContextSource::Folder(folder) => {
                self.context.rebuild_from_folder(folder, prompt)?;
            }
            ContextSource::File(file) => {
                self.context.rebuild_from_file(file, prompt)?;
            }
            ContextSource::None => self.context.clear(),
        }

        debug!(
            included = self.context.included().len(),
            dropped = self.context.dropped(),
            "Context assembled"
        );

        let user_message = if self.context.text().is_empty() {
            prompt.to_string()
        } else {
            format!(
                "Context:\n{}\n\nQuestion: {}",
                self.context.text(),
                prompt
            )
        };

        let reply = self
            .provider
            .complete(&self.settings.model, SYSTEM_INSTRUCTION, &user_message)
            .await?;

        self.log.append(prompt, &reply, &self.settings.model)?;

        Ok(AskOutcome {
            reply,
            included: self.context.included().len(),
            dropped: self.context.dropped(),
        })
    }

    /// Recent history entries, oldest first.
    pub fn history(&self, limit: usize) -> Result<Vec<crate::history::HistoryEntry>> {
        self.log.recent(limit)
    }

    /// Flush the history log and end the session.
    pub fn close(mut self) -> Result<()> {
        self.log.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    /// Returns a canned reply and counts calls, so tests can assert that
    /// rejected prompts never reach the network.
    struct FixedProvider {
        reply: String,
        calls: Arc<AtomicUsize>,
    }

    impl FixedProvider {
        fn new(reply: &str) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    reply: reply.to_string(),
                    calls: calls.clone(),
                },
                calls,
            )
        }
    }

    #[async_trait]
    impl ChatProvider for FixedProvider {
        async fn complete(&self, _model: &str, _system: &str, _user: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.clone())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn test_settings() -> Settings {
        Settings {
            api_key: "test-key".to_string(),
            ..Settings::default()
        }
    }

    fn test_session(
        settings: Settings,
        provider: FixedProvider,
        dir: &TempDir,
    ) -> Session<FixedProvider> {
        let log = RequestLog::new(dir.path().join("history.jsonl")).unwrap();
        Session::new(settings, provider, log)
    }

    #[tokio::test]
    async fn empty_prompt_is_rejected_without_a_call() {
        let tmp = TempDir::new().unwrap();
        let (provider, calls) = FixedProvider::new("unused");
        let mut session = test_session(test_settings(), provider, &tmp);

        let result = session.ask("   \n\t ", &ContextSource::None).await;
        assert!(matches!(result, Err(Error::EmptyPrompt)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_api_key_is_rejected_without_a_call() {
        let tmp = TempDir::new().unwrap();
        let (provider, calls) = FixedProvider::new("unused");
        let mut session = test_session(Settings::default(), provider, &tmp);

        let result = session.ask("a real question", &ContextSource::None).await;
        assert!(matches!(result, Err(Error::MissingApiKey)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn ask_logs_the_exchange() {
        let tmp = TempDir::new().unwrap();
        let (provider, _) = FixedProvider::new("the answer");
        let mut session = test_session(test_settings(), provider, &tmp);

        let outcome = session.ask("a question", &ContextSource::None).await.unwrap();
        assert_eq!(outcome.reply, "the answer");

        let entries = session.history(10).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].prompt, "a question");
        assert_eq!(entries[0].reply, "the answer");

        session.close().unwrap();
        let contents = fs::read_to_string(tmp.path().join("history.jsonl")).unwrap();
        assert_eq!(contents.lines().count(), 1);
    }

    #[tokio::test]
    async fn switching_folders_replaces_context() {
        let tmp = TempDir::new().unwrap();
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        fs::write(first.path().join("a.md"), "alpha note").unwrap();
        fs::write(second.path().join("b.md"), "beta note").unwrap();

        let (provider, _) = FixedProvider::new("ok");
        let mut session = test_session(test_settings(), provider, &tmp);

        let one = session
            .ask("q", &ContextSource::Folder(first.path().to_path_buf()))
            .await
            .unwrap();
        assert_eq!(one.included, 1);

        let two = session
            .ask("q", &ContextSource::Folder(second.path().to_path_buf()))
            .await
            .unwrap();
        assert_eq!(two.included, 1);
        assert_eq!(two.dropped, 0);
    }

    #[test]
    fn resolve_source_prefers_overrides_then_folder() {
        let mut settings = Settings::default();
        settings.note_file = Some(PathBuf::from("/notes/a.md"));
        settings.note_folder = Some(PathBuf::from("/notes"));

        // Configured folder beats configured file.
        assert!(matches!(
            resolve_source(&settings, None, None),
            ContextSource::Folder(_)
        ));

        // CLI file override beats both configured paths.
        assert!(matches!(
            resolve_source(&settings, None, Some(PathBuf::from("/other.md"))),
            ContextSource::File(_)
        ));

        // CLI folder override beats everything.
        assert!(matches!(
            resolve_source(
                &settings,
                Some(PathBuf::from("/elsewhere")),
                Some(PathBuf::from("/other.md"))
            ),
            ContextSource::Folder(_)
        ));

        assert!(matches!(
            resolve_source(&Settings::default(), None, None),
            ContextSource::None
        ));
    }
}
