use std::sync::Arc;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use rig::{
    client::CompletionClient,
    completion::Prompt,
    providers::{anthropic, gemini, openai, xai},
};

use crate::cli::LlmProvider;
use crate::core::error::Error as CoreError;
use crate::core::ports::{CompletionBackend, CompletionRequest};

/// Concrete [`CompletionBackend`] backed by `rig` providers.
#[derive(Clone)]
pub struct RigCompletionBackend {
    inner: Arc<RigCompletionBackendInner>,
}

struct RigCompletionBackendInner {
    provider: LlmProvider,
    http_client: reqwest::Client,
}

impl RigCompletionBackend {
    pub fn new(provider: LlmProvider) -> Result<Self> {
        let http_client = build_http_client()?;
        Ok(Self {
            inner: Arc::new(RigCompletionBackendInner {
                provider,
                http_client,
            }),
        })
    }
}

impl std::fmt::Debug for RigCompletionBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RigCompletionBackend")
            .field("provider", &self.inner.provider)
            .finish()
    }
}

// Each provider has its own client type, so the agent plumbing is stamped out per arm.
macro_rules! prompt_agent {
    ($client:expr, $request:expr, $label:literal) => {{
        let client = $client
            .map_err(|err| anyhow!("Failed to create {} client: {err}", $label))?;
        client
            .agent(&$request.model)
            .preamble(&$request.system_instruction)
            .temperature(f64::from($request.temperature))
            .build()
            .prompt($request.user_content.as_str())
            .await
            .map_err(|err| anyhow!("{} prompt error: {err}", $label))
    }};
}

impl RigCompletionBackend {
    async fn prompt_once(&self, request: &CompletionRequest) -> Result<String> {
        let http = self.inner.http_client.clone();
        match self.inner.provider {
            LlmProvider::Gemini => prompt_agent!(
                gemini::Client::<reqwest::Client>::builder()
                    .api_key(&request.api_key)
                    .http_client(http)
                    .build(),
                request,
                "Gemini"
            ),
            LlmProvider::Openai => prompt_agent!(
                openai::Client::<reqwest::Client>::builder()
                    .api_key(&request.api_key)
                    .http_client(http)
                    .build(),
                request,
                "OpenAI"
            ),
            LlmProvider::Anthropic => prompt_agent!(
                anthropic::Client::<reqwest::Client>::builder()
                    .api_key(&request.api_key)
                    .http_client(http)
                    .build(),
                request,
                "Anthropic"
            ),
            LlmProvider::Grok => prompt_agent!(
                xai::Client::<reqwest::Client>::builder()
                    .api_key(&request.api_key)
                    .http_client(http)
                    .build(),
                request,
                "xAI"
            ),
        }
    }
}

#[async_trait]
impl CompletionBackend for RigCompletionBackend {
    async fn complete(&self, request: &CompletionRequest) -> crate::core::Result<Option<String>> {
        let text = self
            .prompt_once(request)
            .await
            .map_err(|err| CoreError::LlmProvider {
                provider: self.inner.provider.as_str().to_string(),
                details: err.to_string(),
            })?;
        Ok(Some(text).filter(|t| !t.trim().is_empty()))
    }

    fn provider(&self) -> &str {
        self.inner.provider.as_str()
    }
}

fn build_http_client() -> Result<reqwest::Client> {
    // `reqwest::Client::default()` can consult OS-level proxy settings, which has been
    // observed to panic in sandboxed environments. Opt in with CHROMAPROMPT_ENABLE_SYSTEM_PROXY=1.
    let mut builder = reqwest::Client::builder();
    if std::env::var_os("CHROMAPROMPT_ENABLE_SYSTEM_PROXY").is_none() {
        builder = builder.no_proxy();
    }
    builder
        .build()
        .map_err(|err| anyhow!("Failed to build HTTP client: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_configured_provider() {
        let backend = RigCompletionBackend::new(LlmProvider::Gemini).expect("backend builds");
        assert_eq!(backend.provider(), "gemini");
        assert!(format!("{backend:?}").contains("Gemini"));
    }
}
