//! Configuration types for the CLI and HTTP server.
//!
//! Values come from command-line arguments (with environment fallbacks);
//! every struct has a `Default` matching the documented CLI defaults.

use std::time::Duration;

/// Default timeout for retrieving a remote feed.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 20;

/// Default upper bound on feed size, for both remote and local sources (64 `MiB`).
pub const DEFAULT_MAX_FEED_BYTES: usize = 67_108_864;

/// Options for retrieving feeds over HTTP.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct FetchConfig {
    /// Total request timeout, including reading the body.
    pub timeout: Duration,
    /// Maximum accepted body size in bytes.
    pub max_bytes: usize,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            max_bytes: DEFAULT_MAX_FEED_BYTES,
            user_agent: concat!("feedfix/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

impl FetchConfig {
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }
}

/// Options for the HTTP server.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Request logging verbosity (0 = off, 1 = summary, 2+ = bodies).
    pub verbose: u8,
    pub fetch: FetchConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8000,
            verbose: 0,
            fetch: FetchConfig::default(),
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding a listener.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
