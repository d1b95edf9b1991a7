//! Rule evaluator and scorer.
//!
//! Two rules run over every item:
//! 1. Required fields: each absent catalog field is a finding whose severity
//!    depends on the field, and counts as one unfilled slot for scoring.
//! 2. Price format: a present price without a space between amount and
//!    currency code is a warning. This rule never affects the score.

use roxmltree::Document;

use crate::catalog::{Field, Severity, StatKey};
use crate::report::{ErrorStats, Finding, FindingKind, ValidationResult};
use crate::walker::{Item, extract_items};

/// Score of a feed with no required-field slots to fill.
pub const PERFECT_SCORE: u8 = 100;

/// Validate a sequence of items against the fixed field catalog.
///
/// Total over its input: an empty sequence yields a perfect score.
#[must_use]
pub fn validate(items: &[Item]) -> ValidationResult {
    let mut critical_errors = Vec::new();
    let mut warnings = Vec::new();
    let mut error_stats = ErrorStats::default();
    let mut missing_fields: usize = 0;

    for item in items {
        for field in Field::REQUIRED {
            if item.get(field).is_some() {
                continue;
            }

            missing_fields += 1;
            error_stats.increment(field);

            let severity = field.missing_severity();
            let finding = Finding::new(item, field, severity, FindingKind::MissingField);
            match severity {
                Severity::Critical => critical_errors.push(finding),
                Severity::Warning => warnings.push(finding),
            }
        }

        if let Some(price) = item.get(Field::Price)
            && !has_price_separator(price)
        {
            error_stats.increment(StatKey::PriceFormat);
            warnings.push(Finding::new(
                item,
                Field::Price,
                Severity::Warning,
                FindingKind::InvalidPriceFormat,
            ));
        }
    }

    let total_fields = items.len().saturating_mul(Field::REQUIRED.len());
    let score = compute_score(missing_fields, total_fields);

    tracing::debug!(
        items = items.len(),
        missing_fields,
        total_fields,
        score,
        "feed validated"
    );

    ValidationResult {
        products_checked: items.len(),
        score,
        total_critical: critical_errors.len(),
        total_warnings: warnings.len(),
        critical_errors,
        warnings,
        error_stats,
    }
}

/// Extract the items of a parsed feed and validate them.
#[must_use]
pub fn validate_document(document: &Document<'_>) -> ValidationResult {
    validate(&extract_items(document))
}

/// Score the share of filled required-field slots on a `0..=100` scale.
///
/// `round(100 - missing / total * 100)` with ties rounded to even, computed
/// in integers. An empty feed (`total == 0`) scores [`PERFECT_SCORE`].
#[must_use]
pub fn compute_score(missing: usize, total: usize) -> u8 {
    if total == 0 {
        return PERFECT_SCORE;
    }

    let filled = total.saturating_sub(missing);
    let numerator = filled.saturating_mul(100);
    let quotient = numerator.div_euclid(total);
    let remainder = numerator.rem_euclid(total);

    let twice_remainder = remainder.saturating_mul(2);
    let rounded = if twice_remainder > total || (twice_remainder == total && quotient % 2 == 1) {
        quotient + 1
    } else {
        quotient
    };

    u8::try_from(rounded.min(100)).unwrap_or(PERFECT_SCORE)
}

/// Whether a price value separates amount and currency code with a space.
///
/// Values reaching this check are already trimmed, so any space is internal.
#[must_use]
pub fn has_price_separator(price: &str) -> bool {
    price.contains(' ')
}
