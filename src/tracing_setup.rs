use std::{fs, io::Write};

use tracing_subscriber::{
    EnvFilter, Layer, Registry, filter::Targets, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

use chromaprompt::{cli::LogJsonFormat, paths};

/// Logging switches collected from the global CLI flags.
#[derive(Clone, Copy, Debug)]
pub struct LogOptions<'a> {
    pub verbose: bool,
    pub log_json: bool,
    pub json_format: LogJsonFormat,
    /// When set, debug-level JSON logs also go to `~/.chromaprompt/logs/session-<id>.log`.
    pub file_session_id: Option<&'a str>,
}

/// Installs the global subscriber. Console output goes to stderr so stdout only
/// carries generated prompts.
///
/// Returns a WorkerGuard that must be held by main() to ensure file logs are flushed.
pub fn init(options: LogOptions<'_>) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_env_filter(options.verbose));

    let (file_layer, guard) = match options.file_session_id {
        Some(id) => {
            let log_dir = paths::log_dir();
            if let Err(e) = fs::create_dir_all(&log_dir) {
                eprintln!("Warning: Failed to create log dir {}: {e}", log_dir.display());
                (None, None)
            } else {
                let file_appender =
                    tracing_appender::rolling::never(&log_dir, format!("session-{id}.log"));
                let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
                let layer = fmt::layer()
                    .json()
                    .with_writer(non_blocking)
                    .with_filter(Targets::new().with_default(tracing::Level::DEBUG));
                (Some(layer), Some(guard))
            }
        }
        None => (None, None),
    };

    let console_layer: Box<dyn Layer<Registry> + Send + Sync> =
        match (options.log_json, options.json_format) {
            (true, LogJsonFormat::Pretty) => Box::new(
                fmt::layer()
                    .json()
                    .with_writer(|| PrettyJsonWriter::new(std::io::stderr()))
                    .with_filter(console_filter),
            ),
            (true, LogJsonFormat::Compact) => Box::new(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_filter(console_filter),
            ),
            (false, _) if options.verbose => Box::new(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_filter(console_filter),
            ),
            (false, _) => Box::new(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .without_time()
                    .with_target(false)
                    .with_filter(console_filter),
            ),
        };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    guard
}

/// Re-indents single-line JSON log records.
struct PrettyJsonWriter<W: Write> {
    inner: W,
}

impl<W: Write> PrettyJsonWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner }
    }
}

impl<W: Write> Write for PrettyJsonWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let parsed = std::str::from_utf8(buf)
            .ok()
            .map(str::trim)
            .filter(|s| s.starts_with('{') && s.ends_with('}'))
            .and_then(|s| serde_json::from_str::<serde_json::Value>(s).ok());
        if let Some(value) = parsed
            && serde_json::to_writer_pretty(&mut self.inner, &value).is_ok()
        {
            self.inner.write_all(b"\n")?;
            return Ok(buf.len());
        }
        self.inner.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

fn default_env_filter(verbose: bool) -> EnvFilter {
    let directives = if verbose {
        "chromaprompt=debug,rig_core=warn,info"
    } else {
        "chromaprompt=warn,rig_core=warn,warn"
    };
    EnvFilter::new(directives)
}
