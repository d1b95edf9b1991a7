//! Fetch/read, parse and validate pipeline.
//!
//! Each stage has its own outcome: retrieval can fail with [`FetchError`] or
//! an I/O error, parsing with [`FeedParseError`], and validation never fails.
//! Decoding and parsing run on the blocking pool so large feeds do not stall
//! the async workers.

use std::path::{Path, PathBuf};

use feedfix::{FeedParseError, ValidationResult, validate_feed};
use thiserror::Error;
use tokio::io::AsyncReadExt;

use crate::fetch::{FeedFetcher, FetchError};

/// Where a feed comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    Url(String),
    File(PathBuf),
}

impl FeedSource {
    /// Classify a command-line argument: `http://` and `https://` are URLs,
    /// anything else is a local path.
    #[must_use]
    pub fn from_arg(arg: &str) -> Self {
        let lower = arg.trim_start().to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(arg.trim().to_owned())
        } else {
            Self::File(PathBuf::from(arg))
        }
    }
}

/// A feed that could not be validated.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FeedError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} exceeds the {limit} byte limit", path.display())]
    FileTooLarge { path: PathBuf, limit: usize },

    #[error(transparent)]
    Parse(#[from] FeedParseError),

    #[error("feed validation task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Read a local feed file, refusing files larger than `max_bytes`.
///
/// # Errors
///
/// Returns [`FeedError::Read`] on I/O failure and [`FeedError::FileTooLarge`]
/// if the file exceeds the limit.
pub async fn read_feed_file(path: &Path, max_bytes: usize) -> Result<Vec<u8>, FeedError> {
    let read_err = |source| FeedError::Read {
        path: path.to_path_buf(),
        source,
    };

    let file = tokio::fs::File::open(path).await.map_err(read_err)?;
    let limit = u64::try_from(max_bytes).unwrap_or(u64::MAX);

    // Read one byte past the limit to detect oversize files without trusting metadata.
    let mut content = Vec::new();
    file.take(limit.saturating_add(1))
        .read_to_end(&mut content)
        .await
        .map_err(read_err)?;

    if content.len() > max_bytes {
        return Err(FeedError::FileTooLarge {
            path: path.to_path_buf(),
            limit: max_bytes,
        });
    }
    Ok(content)
}

/// Decode, parse and validate feed bytes on the blocking thread pool.
///
/// # Errors
///
/// Returns [`FeedError::Parse`] if the feed cannot be decoded or parsed, and
/// [`FeedError::Task`] if the validation task panics or is cancelled.
pub async fn validate_bytes<B>(bytes: B) -> Result<ValidationResult, FeedError>
where
    B: AsRef<[u8]> + Send + 'static,
{
    let result = tokio::task::spawn_blocking(move || validate_feed(bytes.as_ref())).await??;
    Ok(result)
}

/// Retrieve a feed from `source` and validate it.
///
/// # Errors
///
/// Returns a [`FeedError`] if the feed cannot be retrieved or parsed.
pub async fn load_and_validate(
    source: &FeedSource,
    fetcher: &FeedFetcher,
    max_bytes: usize,
) -> Result<ValidationResult, FeedError> {
    let bytes = match source {
        FeedSource::Url(url) => fetcher.fetch(url).await?,
        FeedSource::File(path) => read_feed_file(path, max_bytes).await?,
    };
    validate_bytes(bytes).await
}
