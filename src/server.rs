//! HTTP surface: `POST /api/generate` and `GET /health`.
//!
//! ```text
//! {prompt, tone?, ...}      ┌────────────┐  chat completion  ┌──────────┐
//! ────────────────────────► │ Generator  ├──────────────────►│ provider │
//! ◄──────────────────────── │ (≤2 calls) │◄──────────────────┤          │
//! {result:{message}}        └────────────┘                   └──────────┘
//! ```
//!
//! If the caller goes away axum drops the handler future, which drops the
//! in-flight provider call with it.

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

use crate::{
    client,
    config::Config,
    generate::{self, GENERIC_FAILURE},
    options::Request,
    response::Reply,
    Generator,
};

/// Shown when the server was started without an API key.
pub const MISSING_KEY: &str =
    "API key not configured, please follow instructions in README.md";

/// Largest accepted request body. A prompt is at most 128 characters.
pub const MAX_BODY_BYTES: usize = 16 * 1024;

/// Shared state passed to all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// [`None`] when no API key is configured.
    generator: Option<Arc<Generator>>,
    /// Ceiling on one whole generation, both provider calls included.
    deadline: Duration,
}

impl AppState {
    /// State for an already built [`Generator`], or [`None`] to answer every
    /// generation request with [`MISSING_KEY`].
    pub fn new(generator: Option<Generator>, deadline: Duration) -> Self {
        Self {
            generator: generator.map(Arc::new),
            deadline,
        }
    }

    /// Build the state from a [`Config`].
    pub fn from_config(config: &Config) -> client::Result<Self> {
        // Two provider calls plus some slack.
        let deadline = config
            .client_options()
            .timeout
            .saturating_mul(2)
            .saturating_add(Duration::from_secs(5));
        Ok(Self::new(config.generator()?, deadline))
    }

    /// Whether an API key is configured.
    pub fn is_configured(&self) -> bool {
        self.generator.is_some()
    }
}

/// Build the router with all endpoints.
pub fn router(state: AppState) -> Router {
    // The front end may be served from anywhere.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/generate", post(generate_message))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .with_state(state)
}

/// `200 {"result": {...}}`
#[derive(Serialize)]
struct Success<'a> {
    result: &'a Reply,
}

/// `<status> {"error": {"message": "..."}}`
#[derive(Serialize)]
struct Failure {
    error: FailureBody,
}

#[derive(Serialize)]
struct FailureBody {
    message: String,
}

fn failure<S>(status: StatusCode, message: S) -> Response
where
    S: Into<String>,
{
    let body = Failure {
        error: FailureBody {
            message: message.into(),
        },
    };
    (status, Json(body)).into_response()
}

async fn health() -> &'static str {
    "ok"
}

async fn generate_message(
    State(state): State<AppState>,
    body: Result<Json<Request>, JsonRejection>,
) -> Response {
    let Some(generator) = state.generator.as_deref() else {
        log::error!("Generation requested but no API key is configured");
        return failure(StatusCode::INTERNAL_SERVER_ERROR, MISSING_KEY);
    };

    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => {
            log::warn!("Rejected request body: {}", rejection.body_text());
            return failure(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    log::info!(
        "Generating a {} {} message in {} ({} tone, emojis: {})",
        request.length,
        request.style,
        request.language,
        request.tone,
        request.emoticon,
    );
    log::debug!("Prompt: {:?}", request.prompt);

    let outcome =
        tokio::time::timeout(state.deadline, generator.generate(&request))
            .await;

    match outcome {
        Ok(Ok(reply)) => {
            if let Reply::Error { error } = &reply {
                log::info!("Model declined: {}", error);
            }
            (StatusCode::OK, Json(Success { result: &reply })).into_response()
        }
        Ok(Err(e)) => {
            let status = StatusCode::from_u16(e.status().as_u16())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            if matches!(e, generate::Error::Validation(_)) {
                log::warn!("{}", e);
            } else {
                log::error!("Generation failed: {}", e);
            }
            failure(status, e.public_message())
        }
        Err(_) => {
            log::error!("Generation timed out after {:?}", state.deadline);
            failure(StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE)
        }
    }
}
