use std::io::IsTerminal;
use std::time::Instant;

use axum::{
    Json,
    body::Body,
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Local;
use tracing_subscriber::EnvFilter;

/// Initialise the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level follows the `-v` count.
pub fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "feedfix={default_level},feedfix_cli={default_level}"
        ))
    });

    // A second initialisation (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

// ANSI color codes
struct Colors {
    reset: &'static str,
    dim: &'static str,
    green: &'static str,
    yellow: &'static str,
    red: &'static str,
    cyan: &'static str,
    blue: &'static str,
    magenta: &'static str,
    gray: &'static str,
}

impl Colors {
    fn new() -> Self {
        if std::io::stderr().is_terminal() {
            Self {
                reset: "\x1b[0m",
                dim: "\x1b[2m",
                green: "\x1b[92m",   // 2xx success
                yellow: "\x1b[93m",  // 3xx redirect
                red: "\x1b[91m",     // 4xx, 5xx errors
                cyan: "\x1b[96m",    // Method
                blue: "\x1b[94m",    // Path
                magenta: "\x1b[95m", // Duration
                gray: "\x1b[90m",    // DEBUG content
            }
        } else {
            Self {
                reset: "",
                dim: "",
                green: "",
                yellow: "",
                red: "",
                cyan: "",
                blue: "",
                magenta: "",
                gray: "",
            }
        }
    }

    fn status_color(&self, status: StatusCode) -> &'static str {
        if status.is_success() {
            self.green
        } else if status.is_redirection() {
            self.yellow
        } else {
            self.red
        }
    }
}

fn timestamp() -> impl std::fmt::Display {
    Local::now().format("%Y-%m-%d %H:%M:%S,%3f")
}

/// Request/response logger for the HTTP server.
///
/// Verbosity 1 logs one summary line per request; 2 and above also dump
/// request and response bodies (feeds and result JSON). Buffered request
/// bodies are held to `max_body_bytes`, the same limit the routes enforce.
#[derive(Clone)]
pub struct LoggingMiddleware {
    pub verbose: u8,
    pub max_body_bytes: usize,
}

impl LoggingMiddleware {
    #[must_use]
    pub fn new(verbose: u8, max_body_bytes: usize) -> Self {
        Self {
            verbose,
            max_body_bytes,
        }
    }

    pub async fn handle(&self, request: Request, next: Next) -> Response {
        if self.verbose == 0 {
            return next.run(request).await;
        }

        let colors = Colors::new();
        let method = request.method().clone();
        let uri = request.uri().clone();
        let start = Instant::now();

        let response = if self.verbose >= 2 {
            let (parts, body) = request.into_parts();
            let Ok(bytes) = axum::body::to_bytes(body, self.max_body_bytes).await else {
                tracing::warn!(
                    limit = self.max_body_bytes,
                    path = uri.path(),
                    "request body rejected"
                );
                return too_large(self.max_body_bytes);
            };

            if !bytes.is_empty() {
                log_body(&colors, "Request body", &bytes);
            }
            next.run(Request::from_parts(parts, Body::from(bytes))).await
        } else {
            next.run(request).await
        };

        let status = response.status();
        let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

        // eprintln! instead of tracing, which would escape the ANSI codes
        eprintln!(
            "{} - INFO - {}{}{} {}{}{} -> {}{}{} in {}{:.1}ms{}",
            timestamp(),
            colors.cyan,
            method,
            colors.reset,
            colors.blue,
            uri.path(),
            colors.reset,
            colors.status_color(status),
            status.as_u16(),
            colors.reset,
            colors.magenta,
            duration_ms,
            colors.reset
        );

        if self.verbose >= 2 {
            let (parts, body) = response.into_parts();
            return match axum::body::to_bytes(body, usize::MAX).await {
                Ok(bytes) => {
                    if !bytes.is_empty() {
                        log_body(&colors, "Response body", &bytes);
                    }
                    Response::from_parts(parts, Body::from(bytes))
                }
                Err(_) => Response::from_parts(parts, Body::empty()),
            };
        }

        response
    }
}

fn too_large(limit: usize) -> Response {
    let message = format!("request body exceeds the {limit} byte limit");
    (
        StatusCode::PAYLOAD_TOO_LARGE,
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}

fn log_body(colors: &Colors, label: &str, bytes: &[u8]) {
    if let Ok(json) = serde_json::from_slice::<serde_json::Value>(bytes) {
        let body_str = serde_json::to_string_pretty(&json).unwrap_or_default();
        eprintln!(
            "{} - DEBUG - {}{label}:{}\n{}{}{}",
            timestamp(),
            colors.dim,
            colors.reset,
            colors.gray,
            body_str,
            colors.reset
        );
    } else {
        let body_str = String::from_utf8_lossy(bytes);
        eprintln!(
            "{} - DEBUG - {}{label} (raw):{}\n{}{}{}",
            timestamp(),
            colors.dim,
            colors.reset,
            colors.gray,
            body_str,
            colors.reset
        );
    }
}
