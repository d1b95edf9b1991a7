//! Parse boundary: raw feed bytes to a document tree.

use std::borrow::Cow;

use encoding_rs::{Encoding, REPLACEMENT, UTF_8};
use roxmltree::{Document, ParsingOptions};

use crate::error::{EncodingIssue, FeedParseError};
use crate::report::ValidationResult;
use crate::rules::validate_document;

const XML_DECL_START: &[u8] = b"<?xml";
const XML_DECL_END: &[u8] = b"?>";

// An XML declaration is short; anything longer is not one.
const XML_DECL_SCAN: usize = 512;

/// Decode feed bytes to text.
///
/// A byte order mark (UTF-8 or UTF-16) wins and is dropped. Otherwise the
/// `encoding` attribute of the XML declaration selects the decoder, and
/// feeds without one are read as UTF-8.
///
/// # Errors
///
/// Returns [`FeedParseError::InvalidEncoding`] if the declared encoding is
/// unknown or the bytes are not valid in the selected encoding.
pub fn decode_feed(bytes: &[u8]) -> Result<Cow<'_, str>, FeedParseError> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        return decode_with(encoding, &bytes[bom_len..]);
    }

    let encoding = match declared_encoding(bytes) {
        Some(label) => resolve_label(label)?,
        None => UTF_8,
    };
    decode_with(encoding, bytes)
}

/// Parse feed text into a document tree.
///
/// Document type declarations are accepted; feeds exported by shop
/// platforms often carry one.
///
/// # Errors
///
/// Returns [`FeedParseError::Malformed`] if the text is not well-formed XML.
pub fn parse_feed(text: &str) -> Result<Document<'_>, FeedParseError> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    Ok(Document::parse_with_options(text, options)?)
}

/// Decode, parse and validate a feed in one step.
///
/// # Errors
///
/// Returns an error if the bytes cannot be decoded or parsed. A parsed feed
/// always validates, even when it contains no items.
pub fn validate_feed(bytes: &[u8]) -> Result<ValidationResult, FeedParseError> {
    let text = decode_feed(bytes)?;
    let document = parse_feed(&text)?;
    let result = validate_document(&document);
    tracing::info!(
        products = result.products_checked,
        critical = result.total_critical,
        warnings = result.total_warnings,
        score = result.score,
        "feed validation complete"
    );
    Ok(result)
}

/// Value of the `encoding` pseudo-attribute in a leading XML declaration.
fn declared_encoding(bytes: &[u8]) -> Option<&str> {
    let head = bytes.get(..XML_DECL_SCAN).unwrap_or(bytes);
    let rest = head.strip_prefix(XML_DECL_START)?;
    let end = rest
        .windows(XML_DECL_END.len())
        .position(|window| window == XML_DECL_END)?;
    let declaration = std::str::from_utf8(&rest[..end]).ok()?;

    let (_, after) = declaration.split_once("encoding")?;
    let after = after.trim_start().strip_prefix('=')?.trim_start();
    let quote = after.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let (label, _) = after.strip_prefix(quote)?.split_once(quote)?;
    Some(label.trim())
}

fn resolve_label(label: &str) -> Result<&'static Encoding, FeedParseError> {
    match Encoding::for_label(label.as_bytes()) {
        Some(encoding) if encoding != REPLACEMENT => {
            // A declaration readable as ASCII rules out UTF-16 without a BOM.
            Ok(encoding.output_encoding())
        }
        _ => Err(FeedParseError::InvalidEncoding {
            encoding: label.to_owned(),
            reason: EncodingIssue::UnknownLabel,
        }),
    }
}

fn decode_with<'a>(encoding: &'static Encoding, bytes: &'a [u8]) -> Result<Cow<'a, str>, FeedParseError> {
    if encoding == UTF_8 {
        return Ok(Cow::Borrowed(std::str::from_utf8(bytes)?));
    }
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .ok_or_else(|| FeedParseError::InvalidEncoding {
            encoding: encoding.name().to_owned(),
            reason: EncodingIssue::Undecodable,
        })
}
