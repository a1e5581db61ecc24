//! Single-flight generation controller: owns the status state machine and the
//! in-memory history.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    application::client::GenerationClient,
    core::{
        domain::{GenerationStatus, History, HistoryEntry, Snapshot},
        ports::{Clock, IgnoreReason, PromptService, SubmitOutcome, TelemetrySink},
    },
};

#[derive(Debug, Default)]
struct ControllerState {
    status: GenerationStatus,
    history: History,
}

pub struct GenerationController {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    client: GenerationClient,
    clock: Arc<dyn Clock>,
    telemetry: Arc<dyn TelemetrySink>,
    state: Mutex<ControllerState>,
}

impl GenerationController {
    pub fn new(
        client: GenerationClient,
        clock: Arc<dyn Clock>,
        telemetry: Arc<dyn TelemetrySink>,
    ) -> Self {
        Self {
            inner: Arc::new(ControllerInner {
                client,
                clock,
                telemetry,
                state: Mutex::new(ControllerState::default()),
            }),
        }
    }
}

impl ControllerInner {
    // The guard is never held across an await point.
    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Moves to `Generating` if the input is usable and nothing is in flight.
    fn begin(&self, input: &str) -> Result<(), IgnoreReason> {
        if input.trim().is_empty() {
            return Err(IgnoreReason::EmptyInput);
        }
        let mut state = self.lock();
        if state.status.is_generating() {
            return Err(IgnoreReason::Busy);
        }
        state.status = GenerationStatus::Generating;
        Ok(())
    }

    /// Performs the client call for an accepted submit and settles the status.
    async fn run(&self, input: &str) -> SubmitOutcome {
        let mut props = HashMap::new();
        props.insert("model".into(), self.client.model().to_string());
        self.telemetry.record_event("generation_started", props);
        info!(model = self.client.model(), "generating prompt");

        match self.client.generate(input).await {
            Ok(prompt) => self.finish_success(input, prompt),
            Err(err) => self.finish_failure(err.to_string()),
        }
    }

    fn finish_success(&self, input: &str, prompt: String) -> SubmitOutcome {
        let Some(status) = GenerationStatus::completed(prompt.clone()) else {
            // The client never hands back blank text; treat it like any empty reply.
            return self.finish_failure(crate::core::Error::EmptyResponse.to_string());
        };
        let entry = HistoryEntry::new(
            Uuid::new_v4().to_string(),
            self.clock.now_ms(),
            input,
            prompt,
        );

        {
            let mut state = self.lock();
            state.history.prepend(entry.clone());
            state.status = status;
        }

        let mut props = HashMap::new();
        props.insert("entry_id".into(), entry.id().to_string());
        props.insert(
            "prompt_chars".into(),
            entry.produced_prompt().chars().count().to_string(),
        );
        self.telemetry.record_event("generation_completed", props);
        SubmitOutcome::Completed(entry)
    }

    fn finish_failure(&self, message: String) -> SubmitOutcome {
        let status = GenerationStatus::error(message);
        let message = status.error_message().unwrap_or_default().to_string();
        self.lock().status = status;

        let mut props = HashMap::new();
        props.insert("message".into(), message.clone());
        self.telemetry.record_event("generation_failed", props);
        SubmitOutcome::Failed(message)
    }
}

#[async_trait]
impl PromptService for GenerationController {
    async fn submit(&self, input: &str) -> SubmitOutcome {
        if let Err(reason) = self.inner.begin(input) {
            debug!(reason = reason.describe(), "submit ignored");
            return SubmitOutcome::Ignored(reason);
        }

        // Detached: the task settles the status even if this caller is dropped.
        let inner = Arc::clone(&self.inner);
        let input = input.to_string();
        let task = tokio::spawn(async move { inner.run(&input).await });

        match task.await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(error = %err, "generation task did not finish");
                self.inner
                    .finish_failure(format!("Generation task failed: {err}"))
            }
        }
    }

    fn status(&self) -> GenerationStatus {
        self.inner.lock().status.clone()
    }

    fn snapshot(&self) -> Snapshot {
        let state = self.inner.lock();
        Snapshot {
            status: state.status.clone(),
            history: state.history.to_vec(),
        }
    }

    fn history_entry(&self, index: usize) -> Option<HistoryEntry> {
        self.inner.lock().history.get(index).cloned()
    }

    fn clear_history(&self) {
        let cleared = {
            let mut state = self.inner.lock();
            let count = state.history.len();
            state.history.clear();
            count
        };
        let mut props = HashMap::new();
        props.insert("cleared".into(), cleared.to_string());
        self.inner.telemetry.record_event("history_cleared", props);
    }
}
