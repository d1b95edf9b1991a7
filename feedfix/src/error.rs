//! Error types for the feed parse boundary.
//!
//! Validation itself cannot fail; these errors describe input that never
//! reaches the rule evaluator.

use thiserror::Error;

/// A feed document that could not be turned into a parsed tree.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FeedParseError {
    /// The feed bytes are not valid in the encoding they were read as, or the
    /// declared encoding is not recognised.
    #[error("feed is not valid {encoding}: {reason}")]
    InvalidEncoding {
        encoding: String,
        reason: EncodingIssue,
    },

    /// The feed text is not well-formed XML.
    #[error("feed is not well-formed XML: {0}")]
    Malformed(#[from] roxmltree::Error),
}

/// Why a feed could not be decoded to text.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EncodingIssue {
    #[error("unsupported encoding label")]
    UnknownLabel,

    #[error(transparent)]
    Utf8(#[from] std::str::Utf8Error),

    #[error("byte sequence not representable in this encoding")]
    Undecodable,
}

impl From<std::str::Utf8Error> for FeedParseError {
    fn from(err: std::str::Utf8Error) -> Self {
        Self::InvalidEncoding {
            encoding: "UTF-8".to_owned(),
            reason: err.into(),
        }
    }
}
