use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Deserialize;

/// chromaprompt CLI definition.
#[derive(Debug, Parser)]
#[command(name = "chromaprompt")]
#[command(about = "Green-screen VFX prompt generator", version)]
pub struct Cli {
    #[arg(short, long, global = true, help = "Enable debug logging with timestamps")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[arg(
        long,
        global = true,
        value_enum,
        default_value_t = LogJsonFormat::Compact,
        help = "JSON log layout when --log-json is set"
    )]
    pub log_json_format: LogJsonFormat,

    #[arg(
        long,
        global = true,
        help = "Also write debug JSON logs to ~/.chromaprompt/logs/session-<id>.log"
    )]
    pub log_file: bool,

    #[arg(
        long,
        global = true,
        help = "Path to the YAML config file (defaults to ~/.chromaprompt/config.yaml)"
    )]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a single prompt and print it to stdout.
    Generate(GenerateArgs),
    /// Start the interactive terminal session with in-memory history.
    Interactive(InteractiveArgs),
    /// Expose the generator over HTTP (JSON + SSE).
    Serve(ServeArgs),
}

/// Provider selection shared by every subcommand.
#[derive(Debug, Args, Clone, Default)]
pub struct LlmArgs {
    #[arg(long, help = "LLM provider API key (can also come from env vars)")]
    pub api_key: Option<String>,

    #[arg(
        long,
        value_enum,
        help = "LLM provider backend (gemini, openai, anthropic, grok)"
    )]
    pub llm_provider: Option<LlmProvider>,

    #[arg(long, help = "Model identifier (defaults to the configured model)")]
    pub llm_model: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct GenerateArgs {
    #[arg(long, short, help = "Short description of the asset to generate")]
    pub input: String,

    #[arg(long, help = "Print the result as JSON instead of plain text")]
    pub json: bool,

    #[command(flatten)]
    pub llm: LlmArgs,
}

#[derive(Debug, Args, Clone, Default)]
pub struct InteractiveArgs {
    #[command(flatten)]
    pub llm: LlmArgs,
}

#[derive(Debug, Args, Clone, Default)]
pub struct ServeArgs {
    #[arg(long, help = "Bind address (defaults to the configured one)")]
    pub bind: Option<String>,

    #[arg(long, help = "Port to listen on (defaults to the configured one)")]
    pub port: Option<u16>,

    #[arg(long, help = "Interval between SSE state snapshots in milliseconds")]
    pub poll_interval_ms: Option<u64>,

    #[command(flatten)]
    pub llm: LlmArgs,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
#[clap(rename_all = "lower")]
pub enum LogJsonFormat {
    Pretty,
    #[default]
    Compact,
}

/// Supported LLM providers surfaced via the CLI and config file.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default, Deserialize)]
#[clap(rename_all = "lower")]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    Gemini,
    Openai,
    Anthropic,
    Grok,
}

impl LlmProvider {
    pub fn env_var(self) -> &'static str {
        match self {
            LlmProvider::Gemini => "GEMINI_API_KEY",
            LlmProvider::Openai => "OPENAI_API_KEY",
            LlmProvider::Anthropic => "ANTHROPIC_API_KEY",
            LlmProvider::Grok => "XAI_API_KEY",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LlmProvider::Gemini => "gemini",
            LlmProvider::Openai => "openai",
            LlmProvider::Anthropic => "anthropic",
            LlmProvider::Grok => "grok",
        }
    }
}
