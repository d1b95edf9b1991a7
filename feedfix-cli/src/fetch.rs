//! Remote feed retrieval.

use reqwest::{Client, Url, header};
use thiserror::Error;

use crate::config::FetchConfig;

/// A feed that could not be retrieved.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FetchError {
    /// The URL is unparseable or does not use `http`/`https`.
    #[error("invalid feed URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The server answered with a non-success status.
    #[error("cannot download the feed: server responded with HTTP {0}")]
    Status(u16),

    /// Connection, TLS, redirect or timeout failure.
    #[error("cannot download the feed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body exceeds the configured limit.
    #[error("feed exceeds the {limit} byte limit")]
    TooLarge { limit: usize },
}

/// HTTP client for downloading feeds.
#[derive(Debug, Clone)]
pub struct FeedFetcher {
    client: Client,
    max_bytes: usize,
}

impl FeedFetcher {
    /// Build a fetcher from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(config: &FetchConfig) -> anyhow::Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/xml, text/xml;q=0.9, */*;q=0.8"),
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            max_bytes: config.max_bytes,
        })
    }

    /// Download the feed at `url`.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] if the URL is invalid, the request fails, the
    /// server responds with a non-success status, or the body is too large.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let parsed = parse_feed_url(url)?;
        tracing::debug!(url = %parsed, "fetching feed");

        let mut response = self.client.get(parsed).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        if let Some(length) = response.content_length()
            && !usize::try_from(length).is_ok_and(|len| len <= self.max_bytes)
        {
            return Err(FetchError::TooLarge {
                limit: self.max_bytes,
            });
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if body.len().saturating_add(chunk.len()) > self.max_bytes {
                return Err(FetchError::TooLarge {
                    limit: self.max_bytes,
                });
            }
            body.extend_from_slice(&chunk);
        }

        tracing::debug!(bytes = body.len(), "feed downloaded");
        Ok(body)
    }
}

/// Parse a feed URL, accepting only `http` and `https`.
///
/// # Errors
///
/// Returns [`FetchError::InvalidUrl`] for unparseable URLs or other schemes.
pub fn parse_feed_url(url: &str) -> Result<Url, FetchError> {
    let parsed = Url::parse(url.trim()).map_err(|e| FetchError::InvalidUrl {
        url: url.to_owned(),
        reason: e.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(FetchError::InvalidUrl {
            url: url.to_owned(),
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}
