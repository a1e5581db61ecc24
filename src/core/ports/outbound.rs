use std::collections::HashMap;

use async_trait::async_trait;

use crate::core::error::Result;

/// A single completion call. Instruction and user content travel as separate fields.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub system_instruction: String,
    pub user_content: String,
    pub temperature: f32,
    pub api_key: String,
}

/// Abstraction for interacting with an LLM provider.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Issue one completion request. `Ok(None)` means the provider returned no text.
    async fn complete(&self, request: &CompletionRequest) -> Result<Option<String>>;

    /// Provider label used in errors and logs.
    fn provider(&self) -> &str;
}

/// Resolves the API credential from process-wide configuration.
pub trait CredentialSource: Send + Sync {
    /// Returns the credential, or `None` when nothing usable is configured.
    fn api_key(&self) -> Option<String>;

    /// Human hint describing where the credential is expected to come from.
    fn describe(&self) -> String;
}

/// Abstraction for getting the current time.
pub trait Clock: Send + Sync {
    /// Get the current UTC timestamp in milliseconds.
    fn now_ms(&self) -> i64;
}

/// Write-only access to the platform clipboard.
pub trait Clipboard: Send + Sync {
    /// Fire-and-forget copy. Implementations report failures through logs only.
    fn copy_text(&self, text: &str);
}

/// Abstraction for sending telemetry events.
pub trait TelemetrySink: Send + Sync {
    /// Record a generic event.
    fn record_event(&self, event_name: &str, properties: HashMap<String, String>);
}
