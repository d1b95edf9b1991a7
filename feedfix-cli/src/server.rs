//! HTTP route layer.
//!
//! Routes:
//! - `GET /` health check
//! - `POST /validate/url` (form field `url`) validation result as JSON
//! - `POST /validate/url/report` (form field `url`) plain-text quality report
//! - `POST /validate/upload` (raw XML body) validation result as JSON

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Form, Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, Request, State},
    http::{StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use feedfix::output::{ReportOptions, write_human};
use feedfix::ValidationResult;
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::config::ServerConfig;
use crate::fetch::{FeedFetcher, FetchError};
use crate::logging::LoggingMiddleware;
use crate::pipeline::{FeedError, FeedSource, load_and_validate, validate_bytes};

/// Shared state of the HTTP server.
#[derive(Clone)]
pub struct AppState {
    fetcher: Arc<FeedFetcher>,
    max_bytes: usize,
}

impl AppState {
    #[must_use]
    pub fn new(fetcher: FeedFetcher, max_bytes: usize) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            max_bytes,
        }
    }
}

#[derive(Debug, Deserialize)]
struct UrlForm {
    url: String,
}

/// Error response: `{"error": "<message>"}` with a stage-specific status.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn internal(err: &anyhow::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("{err:#}"),
        }
    }
}

impl From<FeedError> for ApiError {
    fn from(err: FeedError) -> Self {
        let status = match &err {
            FeedError::Fetch(FetchError::InvalidUrl { .. } | FetchError::Status(_)) => {
                StatusCode::BAD_REQUEST
            }
            FeedError::Fetch(FetchError::TooLarge { .. }) | FeedError::FileTooLarge { .. } => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            FeedError::Fetch(_) => StatusCode::BAD_GATEWAY,
            FeedError::Parse(_) => StatusCode::UNPROCESSABLE_ENTITY,
            FeedError::Read { .. } | FeedError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = self.status.as_u16(), error = %self.message, "request failed");
        } else {
            tracing::warn!(status = self.status.as_u16(), error = %self.message, "request rejected");
        }
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Build the application router.
#[must_use]
pub fn build_router(state: AppState, verbose: u8) -> Router {
    let body_limit = state.max_bytes;
    let logger = LoggingMiddleware::new(verbose, body_limit);

    Router::new()
        .route("/", get(health))
        .route("/validate/url", post(validate_url))
        .route("/validate/url/report", post(validate_url_report))
        .route("/validate/upload", post(validate_upload))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn(move |request: Request, next: Next| {
            let logger = logger.clone();
            async move { logger.handle(request, next).await }
        }))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built, the address cannot
/// be bound, or the server fails.
pub async fn run_server(config: &ServerConfig) -> anyhow::Result<()> {
    let fetcher = FeedFetcher::new(&config.fetch)?;
    let app = build_router(
        AppState::new(fetcher, config.fetch.max_bytes),
        config.verbose,
    );

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;

    tracing::info!(%address, "feedfix server listening");
    println!("FeedFix server listening on http://{address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install Ctrl-C handler");
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "FeedFix API is running" }))
}

async fn validate_url(
    State(state): State<AppState>,
    Form(form): Form<UrlForm>,
) -> Result<Json<ValidationResult>, ApiError> {
    let result = validate_remote(&state, &form.url).await?;
    Ok(Json(result))
}

async fn validate_url_report(
    State(state): State<AppState>,
    Form(form): Form<UrlForm>,
) -> Result<impl IntoResponse, ApiError> {
    let result = validate_remote(&state, &form.url).await?;

    let options = ReportOptions::default().with_generated_at(chrono::Local::now());
    let mut buf = Vec::new();
    write_human(&result, &options, &mut buf).map_err(|e| ApiError::internal(&e))?;
    let text = String::from_utf8(buf)
        .context("report is not valid UTF-8")
        .map_err(|e| ApiError::internal(&e))?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        text,
    ))
}

async fn validate_upload(body: Bytes) -> Result<Json<ValidationResult>, ApiError> {
    Ok(Json(validate_bytes(body).await?))
}

async fn validate_remote(state: &AppState, url: &str) -> Result<ValidationResult, FeedError> {
    let source = FeedSource::Url(url.to_owned());
    load_and_validate(&source, &state.fetcher, state.max_bytes).await
}
