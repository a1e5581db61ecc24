//! CLI inbound adapter: the one-shot `generate` command and the interactive
//! terminal view, both driving a `PromptService`.

mod view;

pub use view::{ViewCommand, format_time, render_history, render_status};

use std::{io::Write, sync::Arc};

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt},
    task::JoinSet,
};

use crate::core::{
    domain::HistoryEntry,
    ports::{Clipboard, IgnoreReason, PromptService, SubmitOutcome},
};

/// JSON shape printed by `generate --json`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateOutput {
    pub id: String,
    pub created_at_ms: i64,
    pub input: String,
    pub prompt: String,
}

impl From<&HistoryEntry> for GenerateOutput {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            id: entry.id().to_string(),
            created_at_ms: entry.created_at_ms(),
            input: entry.original_input().to_string(),
            prompt: entry.produced_prompt().to_string(),
        }
    }
}

/// CLI adapter that consumes the `PromptService` to execute commands.
pub struct CliAdapter {
    service: Arc<dyn PromptService>,
    clipboard: Arc<dyn Clipboard>,
}

impl CliAdapter {
    pub fn new(service: Arc<dyn PromptService>, clipboard: Arc<dyn Clipboard>) -> Self {
        Self { service, clipboard }
    }

    /// Runs one generation and writes the prompt (or JSON record) to `out`.
    pub async fn generate<W: Write>(&self, input: &str, json: bool, out: &mut W) -> Result<()> {
        match self.service.submit(input).await {
            SubmitOutcome::Completed(entry) => {
                if json {
                    let payload = GenerateOutput::from(&entry);
                    writeln!(out, "{}", serde_json::to_string_pretty(&payload)?)?;
                } else {
                    writeln!(out, "{}", entry.produced_prompt())?;
                }
                Ok(())
            }
            SubmitOutcome::Failed(message) => Err(anyhow!(message)),
            SubmitOutcome::Ignored(reason) => Err(anyhow!("Nothing generated: {}", reason.describe())),
        }
    }

    /// Interactive session over line-oriented input. Generation runs in the
    /// background so read-only commands stay usable while it is pending.
    pub async fn interactive<R, W>(&self, input: R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();
        let mut pending: JoinSet<SubmitOutcome> = JoinSet::new();

        writeln!(out, "{}", view::BANNER)?;
        writeln!(out, "{}", view::HELP_TEXT)?;
        out.flush()?;

        loop {
            tokio::select! {
                Some(joined) = pending.join_next(), if !pending.is_empty() => {
                    let outcome = joined.context("generation task failed")?;
                    self.render_outcome(out, &outcome)?;
                }
                line = lines.next_line() => {
                    let Some(line) = line.context("failed to read terminal input")? else {
                        break;
                    };
                    if !self.handle_line(&line, &mut pending, out)? {
                        break;
                    }
                }
            }
            out.flush()?;
        }

        // Input closed; let an in-flight generation land before leaving.
        while let Some(joined) = pending.join_next().await {
            let outcome = joined.context("generation task failed")?;
            self.render_outcome(out, &outcome)?;
        }
        out.flush()?;
        Ok(())
    }

    /// Returns `false` when the session should end.
    fn handle_line<W: Write>(
        &self,
        line: &str,
        pending: &mut JoinSet<SubmitOutcome>,
        out: &mut W,
    ) -> Result<bool> {
        match ViewCommand::parse(line) {
            ViewCommand::Empty => {}
            ViewCommand::Submit(text) => {
                if !pending.is_empty() || self.service.status().is_generating() {
                    writeln!(out, "Busy: {}.", IgnoreReason::Busy.describe())?;
                } else {
                    let service = self.service.clone();
                    writeln!(out, "Generating prompt...")?;
                    pending.spawn(async move { service.submit(&text).await });
                }
            }
            ViewCommand::Copy(None) => match self.service.current_prompt() {
                Some(prompt) => {
                    self.clipboard.copy_text(&prompt);
                    writeln!(out, "Copied current prompt.")?;
                }
                None => writeln!(out, "No prompt to copy yet.")?,
            },
            ViewCommand::Copy(Some(n)) => match self.service.history_entry(n - 1) {
                Some(entry) => {
                    self.clipboard.copy_text(entry.produced_prompt());
                    writeln!(out, "Copied history entry {n}.")?;
                }
                None => writeln!(out, "No history entry {n}.")?,
            },
            ViewCommand::History => {
                render_history(out, &self.service.history())?;
            }
            ViewCommand::Clear => {
                self.service.clear_history();
                writeln!(out, "History cleared.")?;
            }
            ViewCommand::Help => writeln!(out, "{}", view::HELP_TEXT)?,
            ViewCommand::Quit => return Ok(false),
            ViewCommand::Unknown(raw) => {
                writeln!(out, "Unknown command '{raw}'. Type /help for commands.")?;
            }
        }
        Ok(true)
    }

    fn render_outcome<W: Write>(&self, out: &mut W, outcome: &SubmitOutcome) -> Result<()> {
        match outcome {
            SubmitOutcome::Ignored(reason) => {
                writeln!(out, "Not submitted: {}.", reason.describe())?;
            }
            SubmitOutcome::Completed(_) | SubmitOutcome::Failed(_) => {
                render_status(out, &self.service.status())?;
                let history = self.service.history();
                if !history.is_empty() {
                    render_history(out, &history)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::{GenerationStatus, HistoryEntry, Snapshot};
    use async_trait::async_trait;
    use std::{
        io,
        pin::Pin,
        sync::Mutex,
        task::{Context as TaskContext, Poll},
    };
    use tokio::{
        io::{AsyncRead, AsyncReadExt, BufReader, ReadBuf},
        sync::Notify,
    };

    /// In-memory service that answers every submit with a canned prompt.
    /// With a gate, each submit stays `Generating` until the gate opens.
    #[derive(Default)]
    struct FakeService {
        status: Mutex<GenerationStatus>,
        history: Mutex<Vec<HistoryEntry>>,
        fail_with: Option<String>,
        gate: Option<Arc<Notify>>,
    }

    #[async_trait]
    impl PromptService for FakeService {
        async fn submit(&self, input: &str) -> SubmitOutcome {
            if input.trim().is_empty() {
                return SubmitOutcome::Ignored(IgnoreReason::EmptyInput);
            }
            if let Some(gate) = &self.gate {
                *self.status.lock().unwrap() = GenerationStatus::Generating;
                gate.notified().await;
            }
            if let Some(message) = &self.fail_with {
                *self.status.lock().unwrap() = GenerationStatus::error(message.clone());
                return SubmitOutcome::Failed(message.clone());
            }
            let mut history = self.history.lock().unwrap();
            let entry = HistoryEntry::new(
                format!("id-{}", history.len()),
                1_700_000_000_000,
                input,
                format!("Full shot of {input}, solid green background #00FF00"),
            );
            history.insert(0, entry.clone());
            *self.status.lock().unwrap() = GenerationStatus::Completed {
                prompt: entry.produced_prompt().to_string(),
            };
            SubmitOutcome::Completed(entry)
        }

        fn status(&self) -> GenerationStatus {
            self.status.lock().unwrap().clone()
        }

        fn snapshot(&self) -> Snapshot {
            Snapshot {
                status: self.status(),
                history: self.history.lock().unwrap().clone(),
            }
        }

        fn history_entry(&self, index: usize) -> Option<HistoryEntry> {
            self.history.lock().unwrap().get(index).cloned()
        }

        fn clear_history(&self) {
            self.history.lock().unwrap().clear();
        }
    }

    #[derive(Default)]
    struct RecordingClipboard(Mutex<Vec<String>>);

    impl Clipboard for RecordingClipboard {
        fn copy_text(&self, text: &str) {
            self.0.lock().unwrap().push(text.to_string());
        }
    }

    fn adapter(service: FakeService) -> (CliAdapter, Arc<RecordingClipboard>) {
        let clipboard = Arc::new(RecordingClipboard::default());
        (CliAdapter::new(Arc::new(service), clipboard.clone()), clipboard)
    }

    /// Reader that opens the gate when input runs out, then reports EOF.
    struct OpenGateAtEof(Arc<Notify>);

    impl AsyncRead for OpenGateAtEof {
        fn poll_read(
            self: Pin<&mut Self>,
            _cx: &mut TaskContext<'_>,
            _buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            self.0.notify_one();
            Poll::Ready(Ok(()))
        }
    }

    async fn run_session(adapter: &CliAdapter, script: &str) -> String {
        let mut out = Vec::new();
        adapter
            .interactive(script.as_bytes(), &mut out)
            .await
            .expect("session runs");
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn generate_prints_plain_prompt() {
        let (adapter, _) = adapter(FakeService::default());
        let mut out = Vec::new();
        adapter.generate("rocket", false, &mut out).await.unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.trim(), "Full shot of rocket, solid green background #00FF00");
    }

    #[tokio::test]
    async fn generate_json_includes_input() {
        let (adapter, _) = adapter(FakeService::default());
        let mut out = Vec::new();
        adapter.generate("rocket", true, &mut out).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["input"], "rocket");
        assert_eq!(value["id"], "id-0");
    }

    #[tokio::test]
    async fn generate_surfaces_failure_message() {
        let (adapter, _) = adapter(FakeService {
            fail_with: Some("Configuration error: API key not found".into()),
            ..FakeService::default()
        });
        let err = adapter
            .generate("rocket", false, &mut Vec::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("API key not found"));
    }

    #[tokio::test]
    async fn generate_rejects_blank_input() {
        let (adapter, _) = adapter(FakeService::default());
        let err = adapter.generate("  ", false, &mut Vec::new()).await.unwrap_err();
        assert!(err.to_string().contains("input is empty"));
    }

    #[tokio::test]
    async fn interactive_session_generates_lists_and_copies() {
        let (adapter, clipboard) = adapter(FakeService::default());
        let transcript = run_session(&adapter, "a burning phoenix\n").await;
        assert!(transcript.contains("PROMPT OUTPUT"));
        assert!(transcript.contains("Full shot of a burning phoenix"));

        let transcript = run_session(&adapter, "\n/history\n/copy 1\n/copy\n/quit\n").await;
        assert!(transcript.contains("History (1)"));
        assert!(transcript.contains("Input:  a burning phoenix"));
        assert_eq!(clipboard.0.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn interactive_clear_and_unknown_commands() {
        let (adapter, clipboard) = adapter(FakeService::default());
        run_session(&adapter, "cat\n").await;
        let transcript = run_session(&adapter, "/clear\n/history\n/copy 1\n/bogus\n").await;
        assert!(transcript.contains("History cleared."));
        assert!(transcript.contains("History is empty."));
        assert!(transcript.contains("No history entry 1."));
        assert!(transcript.contains("Unknown command '/bogus'"));
        assert!(clipboard.0.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn interactive_shows_error_panel() {
        let (adapter, _) = adapter(FakeService {
            fail_with: Some("LLM error (gemini): quota".into()),
            ..FakeService::default()
        });
        let transcript = run_session(&adapter, "rocket\n").await;
        assert!(transcript.contains("Error\n  LLM error (gemini): quota"));
    }

    #[tokio::test]
    async fn copy_without_result_is_reported() {
        let (adapter, clipboard) = adapter(FakeService::default());
        let transcript = run_session(&adapter, "/copy\n").await;
        assert!(transcript.contains("No prompt to copy yet."));
        assert!(clipboard.0.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn pending_generation_keeps_read_only_commands_usable() {
        let gate = Arc::new(Notify::new());
        let earlier = HistoryEntry::new("h0", 1_700_000_000_000, "cat", "Earlier prompt");
        let (adapter, clipboard) = adapter(FakeService {
            history: Mutex::new(vec![earlier]),
            gate: Some(gate.clone()),
            ..FakeService::default()
        });

        // Every line is handled before the gate opens at end of input.
        let script = "dragon\nwyvern\n/copy\n/copy 1\n/history\n";
        let input = BufReader::new(script.as_bytes().chain(OpenGateAtEof(gate)));
        let mut out = Vec::new();
        adapter.interactive(input, &mut out).await.expect("session runs");
        let transcript = String::from_utf8(out).unwrap();

        let busy = transcript.find("Busy: a generation is already in progress.").unwrap();
        let no_prompt = transcript.find("No prompt to copy yet.").unwrap();
        let copied = transcript.find("Copied history entry 1.").unwrap();
        let listed = transcript.find("History (1)").unwrap();
        let result = transcript.find("PROMPT OUTPUT").unwrap();
        assert!(busy < no_prompt && no_prompt < copied && copied < listed);
        assert!(listed < result, "read-only commands ran before the result landed");
        assert!(transcript.contains("Full shot of dragon"));
        assert!(!transcript.contains("Full shot of wyvern"));
        assert_eq!(*clipboard.0.lock().unwrap(), vec!["Earlier prompt".to_string()]);
    }

    #[tokio::test]
    async fn completion_shows_history_list() {
        let (adapter, _) = adapter(FakeService::default());
        run_session(&adapter, "cat\n").await;
        let transcript = run_session(&adapter, "dog\n").await;
        let result = transcript.find("PROMPT OUTPUT").unwrap();
        let listed = transcript.find("History (2)").unwrap();
        assert!(result < listed);
        let dog = transcript.find("Input:  dog").unwrap();
        let cat = transcript.find("Input:  cat").unwrap();
        assert!(dog < cat, "most recent first");
    }

    #[tokio::test]
    async fn double_slash_line_is_submitted_as_text() {
        let (adapter, _) = adapter(FakeService::default());
        let transcript = run_session(&adapter, "//r/cyberpunk neon sign\n").await;
        assert!(transcript.contains("Full shot of /r/cyberpunk neon sign"));
    }
}
