use std::collections::VecDeque;

use serde::Serialize;

/// Message shown when a failure renders to an empty string.
pub const FALLBACK_ERROR_MESSAGE: &str = "Failed to generate prompt";

/// Status of the current generation. Each variant carries only the data valid for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GenerationStatus {
    #[default]
    Idle,
    Generating,
    Completed {
        prompt: String,
    },
    Error {
        message: String,
    },
}

impl GenerationStatus {
    /// Builds a `Completed` status, refusing blank prompts.
    pub fn completed(prompt: impl Into<String>) -> Option<Self> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            None
        } else {
            Some(GenerationStatus::Completed { prompt })
        }
    }

    /// Builds an `Error` status; blank messages fall back to a generic one.
    pub fn error(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            GenerationStatus::Error {
                message: FALLBACK_ERROR_MESSAGE.to_string(),
            }
        } else {
            GenerationStatus::Error { message }
        }
    }

    pub fn is_generating(&self) -> bool {
        matches!(self, GenerationStatus::Generating)
    }

    pub fn prompt(&self) -> Option<&str> {
        match self {
            GenerationStatus::Completed { prompt } => Some(prompt),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            GenerationStatus::Error { message } => Some(message),
            _ => None,
        }
    }
}

/// One successful generation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    id: String,
    created_at_ms: i64,
    original_input: String,
    produced_prompt: String,
}

impl HistoryEntry {
    pub fn new(
        id: impl Into<String>,
        created_at_ms: i64,
        original_input: impl Into<String>,
        produced_prompt: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            created_at_ms,
            original_input: original_input.into(),
            produced_prompt: produced_prompt.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at_ms(&self) -> i64 {
        self.created_at_ms
    }

    pub fn original_input(&self) -> &str {
        &self.original_input
    }

    pub fn produced_prompt(&self) -> &str {
        &self.produced_prompt
    }
}

/// Session history, most recent first. Only `prepend` and `clear` mutate it.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prepend(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index` where 0 is the most recent.
    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn to_vec(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }
}

/// Point-in-time copy of the controller state handed to views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    #[serde(flatten)]
    pub status: GenerationStatus,
    pub history: Vec<HistoryEntry>,
}
