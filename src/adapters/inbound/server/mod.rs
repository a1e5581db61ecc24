//! HTTP view over the `PromptService`: JSON state, generate/clear actions and an
//! SSE stream of state snapshots for browser front ends.

use std::{
    convert::Infallible,
    net::SocketAddr,
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::{Context as AnyhowContext, Result};
use axum::response::sse::{Event, KeepAlive};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Sse},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio_stream::{StreamExt, wrappers::IntervalStream};
use tracing::info;

use crate::core::{
    domain::{GenerationStatus, Snapshot},
    ports::{IgnoreReason, PromptService, SubmitOutcome},
};

#[derive(Debug, Clone)]
pub struct ServeOptions {
    pub poll_interval: Duration,
}

impl Default for ServeOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
        }
    }
}

/// Server adapter that consumes the `PromptService` to handle HTTP requests.
pub struct ServerAdapter {
    service: Arc<dyn PromptService>,
    options: ServeOptions,
}

impl ServerAdapter {
    pub fn new(service: Arc<dyn PromptService>, options: ServeOptions) -> Self {
        Self { service, options }
    }

    pub async fn run(self, addr: SocketAddr) -> Result<()> {
        let listener = TcpListener::bind(addr)
            .await
            .context("failed to bind prompt service listener")?;
        self.run_with_listener(listener).await
    }

    pub async fn run_with_listener(self, listener: TcpListener) -> Result<()> {
        let router = self.router();
        if let Ok(addr) = listener.local_addr() {
            info!(%addr, "chromaprompt serve listening");
        } else {
            info!("chromaprompt serve listening");
        }
        axum::serve(listener, router.into_make_service())
            .await
            .context("serve endpoint failed")
    }

    pub fn router(&self) -> Router {
        let state = Arc::new(ServeState {
            service: self.service.clone(),
            poll_interval: self.options.poll_interval.max(Duration::from_millis(200)),
        });
        build_router(state)
    }
}

struct ServeState {
    service: Arc<dyn PromptService>,
    poll_interval: Duration,
}

fn build_router(state: Arc<ServeState>) -> Router {
    Router::new()
        .route("/state", get(state_handler))
        .route("/state/stream", get(stream_state_handler))
        .route("/generate", post(generate_handler))
        .route("/history", axum::routing::delete(clear_history_handler))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct GenerateBody {
    input: String,
}

/// Error payload for rejected submissions.
#[derive(Debug, Serialize)]
struct Rejection {
    reason: IgnoreReason,
    message: &'static str,
}

async fn state_handler(State(state): State<Arc<ServeState>>) -> Json<Snapshot> {
    Json(state.service.snapshot())
}

async fn generate_handler(
    State(state): State<Arc<ServeState>>,
    Json(body): Json<GenerateBody>,
) -> Result<Json<GenerationStatus>, (StatusCode, Json<Rejection>)> {
    match state.service.submit(&body.input).await {
        SubmitOutcome::Completed(_) | SubmitOutcome::Failed(_) => {
            Ok(Json(state.service.status()))
        }
        SubmitOutcome::Ignored(reason) => {
            let code = match reason {
                IgnoreReason::EmptyInput => StatusCode::UNPROCESSABLE_ENTITY,
                IgnoreReason::Busy => StatusCode::CONFLICT,
            };
            Err((
                code,
                Json(Rejection {
                    reason,
                    message: reason.describe(),
                }),
            ))
        }
    }
}

async fn clear_history_handler(State(state): State<Arc<ServeState>>) -> StatusCode {
    state.service.clear_history();
    StatusCode::NO_CONTENT
}

async fn stream_state_handler(State(state): State<Arc<ServeState>>) -> impl IntoResponse {
    let poll = state.poll_interval;
    let mut interval = tokio::time::interval(poll);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let stream_state = state.clone();
    let stream = IntervalStream::new(interval).map(move |_| {
        let start = Instant::now();
        let snapshot = stream_state.service.snapshot();
        let event = match serde_json::to_string(&snapshot) {
            Ok(json) => Event::default().data(json),
            Err(err) => {
                tracing::error!(error = %err, "failed to serialize state snapshot");
                Event::default().comment("serialization_error")
            }
        };
        tracing::trace!(
            elapsed_ms = start.elapsed().as_millis(),
            "serve stream event ready"
        );
        Result::<Event, Infallible>::Ok(event)
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(poll).text("keep-alive"))
}
