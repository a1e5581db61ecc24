use std::sync::Arc;

use tracing::{debug, warn};

use crate::core::{
    error::{Error, Result},
    ports::{CompletionBackend, CompletionRequest, CredentialSource},
    template::{GENERATION_TEMPERATURE, SYSTEM_INSTRUCTION},
};

/// Wraps one call to the completion backend: credential check, request shaping,
/// and validation of the returned text.
pub struct GenerationClient {
    backend: Arc<dyn CompletionBackend>,
    credentials: Arc<dyn CredentialSource>,
    model: String,
}

impl GenerationClient {
    pub fn new(
        backend: Arc<dyn CompletionBackend>,
        credentials: Arc<dyn CredentialSource>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            credentials,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Builds the request for `user_input`. Fails before any network work when
    /// no credential is configured.
    pub fn build_request(&self, user_input: &str) -> Result<CompletionRequest> {
        let api_key = self.credentials.api_key().ok_or_else(|| {
            Error::Config(format!(
                "API key not found; {}",
                self.credentials.describe()
            ))
        })?;

        Ok(CompletionRequest {
            model: self.model.clone(),
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            user_content: user_input.to_string(),
            temperature: GENERATION_TEMPERATURE,
            api_key,
        })
    }

    /// Runs one generation and returns the trimmed prompt text.
    pub async fn generate(&self, user_input: &str) -> Result<String> {
        let request = self.build_request(user_input).inspect_err(|err| {
            warn!(kind = err.kind(), "generation aborted before dispatch: {err}");
        })?;

        debug!(
            provider = self.backend.provider(),
            model = %request.model,
            input_chars = request.user_content.chars().count(),
            "dispatching completion request"
        );

        let response = self.backend.complete(&request).await.inspect_err(|err| {
            warn!(
                kind = err.kind(),
                provider = self.backend.provider(),
                "completion request failed: {err}"
            );
        })?;

        match response.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => Ok(text.to_string()),
            _ => {
                warn!(
                    kind = "empty_response",
                    provider = self.backend.provider(),
                    "completion returned no usable text"
                );
                Err(Error::EmptyResponse)
            }
        }
    }
}
