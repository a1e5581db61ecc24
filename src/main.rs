mod tracing_setup;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use uuid::Uuid;

use chromaprompt::{
    adapters::{
        inbound::{
            cli::CliAdapter,
            server::{ServeOptions, ServerAdapter},
        },
        outbound::{
            clipboard::SystemClipboard, clock::SystemClock, credentials::EnvCredentialSource,
            llm::RigCompletionBackend, telemetry::TracingTelemetrySink,
        },
    },
    application::{GenerationClient, GenerationController},
    cli::{Cli, Commands, LlmArgs},
    config::AppConfig,
    core::ports::PromptService,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let session_id = Uuid::new_v4().to_string();
    let log_guard = tracing_setup::init(tracing_setup::LogOptions {
        verbose: cli.verbose,
        log_json: cli.log_json,
        json_format: cli.log_json_format,
        file_session_id: cli.log_file.then_some(session_id.as_str()),
    });

    if let Err(err) = run(cli).await {
        tracing::error!("{err:#}");
        // exit() skips destructors; flush file logs first.
        drop(log_guard);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load(cli.config.as_deref())?;
    match cli.command {
        Commands::Generate(args) => {
            let service = build_service(&config, &args.llm)?;
            let adapter = CliAdapter::new(service, Arc::new(SystemClipboard::new()));
            adapter
                .generate(&args.input, args.json, &mut std::io::stdout())
                .await
        }
        Commands::Interactive(args) => {
            let service = build_service(&config, &args.llm)?;
            let adapter = CliAdapter::new(service, Arc::new(SystemClipboard::new()));
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            adapter.interactive(stdin, &mut std::io::stdout()).await
        }
        Commands::Serve(args) => {
            let serve = config.resolve_serve(&args)?;
            let service = build_service(&config, &args.llm)?;
            eprintln!("Serving prompt API on http://{}", serve.addr);
            ServerAdapter::new(
                service,
                ServeOptions {
                    poll_interval: serve.poll_interval,
                },
            )
            .run(serve.addr)
            .await
        }
    }
}

/// Composition root: wires outbound adapters into the controller.
fn build_service(config: &AppConfig, args: &LlmArgs) -> Result<Arc<dyn PromptService>> {
    let llm = config.resolve_llm(args)?;
    let backend = RigCompletionBackend::new(llm.provider)
        .with_context(|| format!("Failed to prepare {} backend", llm.provider.as_str()))?;
    let credentials = EnvCredentialSource::new(llm.api_key, llm.provider.env_var());
    tracing::debug!(
        provider = llm.provider.as_str(),
        model = %llm.model,
        "prompt service configured"
    );

    let client = GenerationClient::new(Arc::new(backend), Arc::new(credentials), llm.model);
    let controller = GenerationController::new(
        client,
        Arc::new(SystemClock::new()),
        Arc::new(TracingTelemetrySink::new()),
    );
    Ok(Arc::new(controller))
}
