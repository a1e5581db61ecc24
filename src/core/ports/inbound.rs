//! Inbound ports (use-case ports) define the application service interface that
//! driving adapters (terminal view, HTTP server) consume.

use async_trait::async_trait;
use serde::Serialize;

use crate::core::domain::{GenerationStatus, HistoryEntry, Snapshot};

/// Why a submission was not dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// The trimmed input was empty.
    EmptyInput,
    /// Another generation is still in flight.
    Busy,
}

impl IgnoreReason {
    pub fn describe(self) -> &'static str {
        match self {
            IgnoreReason::EmptyInput => "input is empty",
            IgnoreReason::Busy => "a generation is already in progress",
        }
    }
}

/// Result of a single submit action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing was dispatched; state is unchanged.
    Ignored(IgnoreReason),
    /// The generation succeeded and was recorded in history.
    Completed(HistoryEntry),
    /// The generation failed with the given user-facing message.
    Failed(String),
}

/// The primary application service trait that views consume.
#[async_trait]
pub trait PromptService: Send + Sync {
    /// Submit raw user input. Resolves once the generation finishes or is ignored.
    async fn submit(&self, input: &str) -> SubmitOutcome;

    /// Current status.
    fn status(&self) -> GenerationStatus;

    /// Status plus the full history, most recent first.
    fn snapshot(&self) -> Snapshot;

    /// History entry by index, 0 being the most recent.
    fn history_entry(&self, index: usize) -> Option<HistoryEntry>;

    /// Empty the history without touching the status.
    fn clear_history(&self);

    fn history(&self) -> Vec<HistoryEntry> {
        self.snapshot().history
    }

    /// Prompt of the latest completed generation, if the status holds one.
    fn current_prompt(&self) -> Option<String> {
        self.status().prompt().map(str::to_string)
    }
}
