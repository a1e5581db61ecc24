use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Required configuration (usually the API credential) is missing or unusable.
    Config(String),
    /// The LLM provider could not be reached or rejected the request.
    LlmProvider { provider: String, details: String },
    /// The provider answered but produced no usable text.
    EmptyResponse,
}

impl Error {
    /// Short machine-friendly label used in logs and telemetry.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Config(_) => "config",
            Error::LlmProvider { .. } => "llm_provider",
            Error::EmptyResponse => "empty_response",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(msg) => write!(f, "Configuration error: {msg}"),
            Error::LlmProvider { provider, details } => {
                write!(f, "LLM error ({provider}): {details}")
            }
            Error::EmptyResponse => write!(f, "No text generated from model"),
        }
    }
}

impl std::error::Error for Error {}
