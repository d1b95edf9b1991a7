//! # feedfix
//!
//! Quality validation for Google Shopping style product feeds.
//!
//! The crate separates the **parse boundary** (bytes to XML tree, which can
//! fail) from the **validation engine** (tree to result, which cannot). Every
//! `item` element is checked against a fixed catalog of required attributes
//! in the `http://base.google.com/ns/1.0` namespace, and the share of filled
//! attribute slots becomes a 0-100 quality score.
//!
//! ## Quick Start
//!
//! ```rust
//! use feedfix::{Field, validate_feed};
//!
//! let feed = br#"<rss xmlns:g="http://base.google.com/ns/1.0"><channel>
//!   <item>
//!     <g:id>SKU-1</g:id>
//!     <g:title>Mug</g:title>
//!     <g:link>https://shop.example/mug</g:link>
//!     <g:image_link>https://shop.example/mug.jpg</g:image_link>
//!     <g:price>19.99 PLN</g:price>
//!     <g:availability>in stock</g:availability>
//!   </item>
//! </channel></rss>"#;
//!
//! let result = validate_feed(feed).unwrap();
//! assert_eq!(result.products_checked, 1);
//! assert_eq!(result.total_warnings, 1);
//! assert_eq!(result.warnings[0].field, Field::Description);
//! assert_eq!(result.score, 86);
//! ```

mod catalog;
mod error;
pub mod output;
mod parse;
mod report;
mod rules;
mod walker;

pub use catalog::{Field, Severity, StatKey};
pub use error::{EncodingIssue, FeedParseError};
pub use parse::{decode_feed, parse_feed, validate_feed};
pub use report::{
    ErrorStats, Finding, FindingKind, MISSING_FIELD_MESSAGE, PRICE_FORMAT_MESSAGE,
    ValidationResult,
};
pub use rules::{PERFECT_SCORE, compute_score, has_price_separator, validate, validate_document};
pub use walker::{GOOGLE_NS, ITEM_TAG, Item, extract_items, get_field};

/// Re-export of the XML tree types accepted by the document walker.
pub use roxmltree;
