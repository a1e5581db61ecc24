//! Credential lookup: explicit CLI value first, then environment variables, with
//! `~/.env` loaded once as a fallback source for the environment.

use std::{fs, sync::OnceLock};

use crate::{core::ports::CredentialSource, paths::home_env_path};

static HOME_ENV_ONCE: OnceLock<()> = OnceLock::new();

/// Generic variable honoured for every provider.
pub const GENERIC_API_KEY_VAR: &str = "API_KEY";

#[derive(Debug, Clone)]
pub struct EnvCredentialSource {
    cli_value: Option<String>,
    env_vars: Vec<String>,
    load_home_env: bool,
}

impl EnvCredentialSource {
    /// Looks up `provider_var`, then [`GENERIC_API_KEY_VAR`].
    pub fn new(cli_value: Option<String>, provider_var: &str) -> Self {
        Self {
            cli_value,
            env_vars: vec![provider_var.to_string(), GENERIC_API_KEY_VAR.to_string()],
            load_home_env: true,
        }
    }

    /// Skips `~/.env` loading; the process environment is used as-is.
    pub fn without_home_env(mut self) -> Self {
        self.load_home_env = false;
        self
    }
}

impl CredentialSource for EnvCredentialSource {
    fn api_key(&self) -> Option<String> {
        if self.load_home_env {
            ensure_home_env_loaded();
        }
        let env_values = self.env_vars.iter().map(|var| std::env::var(var).ok());
        pick_api_key(self.cli_value.clone(), env_values)
    }

    fn describe(&self) -> String {
        format!("pass --api-key or set {}", self.env_vars.join(" or "))
    }
}

fn pick_api_key(
    cli_value: Option<String>,
    env_values: impl IntoIterator<Item = Option<String>>,
) -> Option<String> {
    normalize_key(cli_value).or_else(|| env_values.into_iter().find_map(normalize_key))
}

fn normalize_key(value: Option<String>) -> Option<String> {
    value.and_then(|candidate| {
        let trimmed = candidate.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn ensure_home_env_loaded() {
    HOME_ENV_ONCE.get_or_init(|| {
        if let Some(path) = home_env_path()
            && let Ok(contents) = fs::read_to_string(&path)
        {
            apply_env_contents(&contents);
        }
    });
}

fn apply_env_contents(contents: &str) {
    for line in contents.lines() {
        if let Some((key, value)) = parse_env_assignment(line)
            && std::env::var_os(&key).is_none()
        {
            // Runs once, before any generation task reads the environment.
            unsafe {
                std::env::set_var(&key, &value);
            }
        }
    }
}

fn parse_env_assignment(line: &str) -> Option<(String, String)> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed).trim();
    let (key, value) = trimmed.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }

    Some((key.to_string(), unquote(value.trim()).to_string()))
}

fn unquote(raw: &str) -> &str {
    let bytes = raw.as_bytes();
    if bytes.len() >= 2
        && (bytes[0] == b'"' || bytes[0] == b'\'')
        && bytes[bytes.len() - 1] == bytes[0]
    {
        &raw[1..raw.len() - 1]
    } else {
        raw
    }
}
