use std::{
    fs,
    net::SocketAddr,
    path::Path,
    time::Duration,
};

use anyhow::{Context, Result, ensure};
use serde::Deserialize;

use crate::{
    cli::{LlmArgs, LlmProvider, ServeArgs},
    core::template::DEFAULT_MODEL,
    paths,
};

/// Optional on-disk configuration. Every field has a default, so an absent file
/// behaves like an empty one.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub serve: ServeConfig,
}

impl AppConfig {
    /// Loads `explicit` when given (it must exist), otherwise the default config
    /// path when present, otherwise defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_path(path),
            None => {
                let fallback = paths::default_config_path();
                if fallback.is_file() {
                    Self::from_path(&fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let raw = fs::read_to_string(path_ref)
            .with_context(|| format!("Failed to read config file at {}", path_ref.display()))?;
        Self::from_yaml_str(&raw)
            .with_context(|| format!("Invalid configuration in {}", path_ref.display()))
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml).context("Unable to parse config YAML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.llm.validate()?;
        self.serve.validate()?;
        Ok(())
    }

    /// Applies CLI overrides on top of the file values.
    pub fn resolve_llm(&self, args: &LlmArgs) -> Result<ResolvedLlm> {
        let provider = args.llm_provider.unwrap_or(self.llm.provider);
        let model = args
            .llm_model
            .clone()
            .unwrap_or_else(|| self.llm.model.clone());
        ensure!(!model.trim().is_empty(), "Model identifier may not be empty");
        Ok(ResolvedLlm {
            provider,
            model: model.trim().to_string(),
            api_key: args.api_key.clone(),
        })
    }

    pub fn resolve_serve(&self, args: &ServeArgs) -> Result<ResolvedServe> {
        let bind = args.bind.clone().unwrap_or_else(|| self.serve.bind.clone());
        let port = args.port.unwrap_or(self.serve.port);
        let addr: SocketAddr = format!("{bind}:{port}")
            .parse()
            .with_context(|| format!("Invalid bind/port combination {bind}:{port}"))?;
        let poll_ms = args
            .poll_interval_ms
            .unwrap_or(self.serve.poll_interval_ms)
            .max(MIN_POLL_INTERVAL_MS);
        Ok(ResolvedServe {
            addr,
            poll_interval: Duration::from_millis(poll_ms),
        })
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LlmConfig {
    #[serde(default)]
    pub provider: LlmProvider,
    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::default(),
            model: default_model(),
        }
    }
}

impl LlmConfig {
    fn validate(&self) -> Result<()> {
        ensure!(
            !self.model.trim().is_empty(),
            "llm.model must not be blank"
        );
        Ok(())
    }
}

const MIN_POLL_INTERVAL_MS: u64 = 250;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ServeConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl ServeConfig {
    fn validate(&self) -> Result<()> {
        ensure!(!self.bind.trim().is_empty(), "serve.bind must not be blank");
        ensure!(
            self.poll_interval_ms >= MIN_POLL_INTERVAL_MS,
            "serve.poll_interval_ms must be >= {MIN_POLL_INTERVAL_MS}"
        );
        Ok(())
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}

fn default_poll_interval_ms() -> u64 {
    1000
}

/// Provider settings after CLI overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLlm {
    pub provider: LlmProvider,
    pub model: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedServe {
    pub addr: SocketAddr,
    pub poll_interval: Duration,
}
