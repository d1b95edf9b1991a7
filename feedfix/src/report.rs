//! Validation result types.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::catalog::{Field, Severity, StatKey};
use crate::walker::Item;

/// Message attached to a missing required field.
pub const MISSING_FIELD_MESSAGE: &str = "required field missing";

/// Message attached to a price lacking the amount/currency separator.
pub const PRICE_FORMAT_MESSAGE: &str = "invalid price format (expected a numeric amount followed by a currency code separated by a space, e.g. '99.99 PLN')";

/// The rule that produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    MissingField,
    InvalidPriceFormat,
}

impl FindingKind {
    /// Human-readable description of the defect.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::MissingField => MISSING_FIELD_MESSAGE,
            Self::InvalidPriceFormat => PRICE_FORMAT_MESSAGE,
        }
    }
}

/// A single defect detected in a feed item.
///
/// `product_id`, `title` and `link` are context copied from the item; any of
/// them may be absent even when the finding is about a different field.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[non_exhaustive]
pub struct Finding {
    /// 1-based position of the item in document order.
    pub index: usize,
    pub product_id: Option<String>,
    pub title: Option<String>,
    pub link: Option<String>,
    /// The field the defect is about.
    pub field: Field,
    pub severity: Severity,
    pub kind: FindingKind,
    pub message: &'static str,
}

impl Finding {
    pub(crate) fn new(item: &Item, field: Field, severity: Severity, kind: FindingKind) -> Self {
        Self {
            index: item.index(),
            product_id: item.get(Field::Id).map(str::to_owned),
            title: item.get(Field::Title).map(str::to_owned),
            link: item.get(Field::Link).map(str::to_owned),
            field,
            severity,
            kind,
            message: kind.message(),
        }
    }

    /// Format the finding for a single line of human-readable output.
    ///
    /// `#{index} [{product_id}] {field}: {message}`
    #[must_use]
    pub fn format_human_readable(&self) -> String {
        match &self.product_id {
            Some(id) => format!("#{} [{}] {}: {}", self.index, id, self.field, self.message),
            None => format!("#{} {}: {}", self.index, self.field, self.message),
        }
    }
}

/// Per-field tally of defective items.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ErrorStats(BTreeMap<StatKey, usize>);

impl ErrorStats {
    /// Count one more item under `key`.
    pub fn increment(&mut self, key: impl Into<StatKey>) {
        *self.0.entry(key.into()).or_insert(0) += 1;
    }

    /// Number of items counted under `key` (0 if never counted).
    #[must_use]
    pub fn get(&self, key: impl Into<StatKey>) -> usize {
        self.0.get(&key.into()).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatKey, usize)> + '_ {
        self.0.iter().map(|(key, count)| (*key, *count))
    }

    /// Entries ordered by count, highest first. Ties keep catalog order.
    #[must_use]
    pub fn sorted_by_count(&self) -> Vec<(StatKey, usize)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
    }
}

/// Result of validating one feed.
///
/// Fully determined by the input items; validating the same items twice
/// yields equal results.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[non_exhaustive]
pub struct ValidationResult {
    /// Number of items found in the feed.
    pub products_checked: usize,
    /// Quality score in `0..=100`.
    pub score: u8,
    /// Critical findings in document order, then catalog order within an item.
    pub critical_errors: Vec<Finding>,
    /// Warning findings in document order.
    pub warnings: Vec<Finding>,
    pub total_critical: usize,
    pub total_warnings: usize,
    pub error_stats: ErrorStats,
}

impl ValidationResult {
    /// Whether the feed produced no findings at all.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.critical_errors.is_empty() && self.warnings.is_empty()
    }

    /// Total number of findings of either severity.
    #[must_use]
    pub fn findings_count(&self) -> usize {
        self.total_critical + self.total_warnings
    }
}
