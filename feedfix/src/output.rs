//! Shared output formatting for validation results.
//!
//! Provides JSON and plain-text formatters for `ValidationResult`.
//! Color/terminal formatting is intentionally excluded from this core module;
//! that concern belongs to the CLI layer.

use std::io::Write;

use chrono::{DateTime, Local};

use crate::report::ValidationResult;

/// Placeholder shown for context values the item did not provide.
pub const MISSING_VALUE: &str = "no data";

const REPAIR_PLAN: [&str; 5] = [
    "Fill in missing product data",
    "Fix price formatting",
    "Verify availability values",
    "Complete product descriptions",
    "Validate the feed again",
];

/// Options for the human-readable report.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct ReportOptions {
    /// Maximum number of critical findings listed in detail (default: 30).
    pub max_critical: usize,
    /// Timestamp printed under the title; omitted when `None`.
    pub generated_at: Option<DateTime<Local>>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            max_critical: 30,
            generated_at: None,
        }
    }
}

impl ReportOptions {
    #[must_use]
    pub fn with_max_critical(mut self, max_critical: usize) -> Self {
        self.max_critical = max_critical;
        self
    }

    #[must_use]
    pub fn with_generated_at(mut self, generated_at: DateTime<Local>) -> Self {
        self.generated_at = Some(generated_at);
        self
    }
}

/// The value itself, or [`MISSING_VALUE`] when absent.
#[must_use]
pub fn display_or_placeholder(value: Option<&str>) -> &str {
    value.unwrap_or(MISSING_VALUE)
}

/// Format a `ValidationResult` as JSON to a writer.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json(result: &ValidationResult, writer: &mut dyn Write) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    writeln!(writer, "{json}")?;
    Ok(())
}

/// Format a `ValidationResult` as a human-readable quality report.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_human(
    result: &ValidationResult,
    options: &ReportOptions,
    writer: &mut dyn Write,
) -> anyhow::Result<()> {
    writeln!(writer, "{}", "=".repeat(80))?;
    writeln!(writer, "  FEEDFIX QUALITY REPORT")?;
    if let Some(generated_at) = options.generated_at {
        writeln!(
            writer,
            "  Generated: {}",
            generated_at.format("%Y-%m-%d %H:%M")
        )?;
    }
    writeln!(writer, "{}", "=".repeat(80))?;
    writeln!(writer)?;
    writeln!(writer, "  Quality score: {} / 100", result.score)?;
    writeln!(writer)?;

    section(writer, "SUMMARY")?;
    writeln!(writer, "  Products checked:  {}", result.products_checked)?;
    writeln!(writer, "  Critical errors:   {}", result.total_critical)?;
    writeln!(writer, "  Warnings:          {}", result.total_warnings)?;
    writeln!(writer)?;

    section(writer, "MOST FREQUENT PROBLEMS")?;
    if result.error_stats.is_empty() {
        writeln!(writer, "  No significant problems detected.")?;
    }
    for (key, count) in result.error_stats.sorted_by_count() {
        let name = key.as_str().replace('_', " ");
        writeln!(writer, "  - Field: {name} \u{2192} {count} product(s)")?;
    }
    writeln!(writer)?;

    section(writer, "CRITICAL ERRORS")?;
    if result.critical_errors.is_empty() {
        writeln!(writer, "  No critical errors.")?;
    }
    for finding in result.critical_errors.iter().take(options.max_critical) {
        writeln!(
            writer,
            "  Product: {}",
            display_or_placeholder(finding.title.as_deref())
        )?;
        writeln!(
            writer,
            "    ID:      {}",
            display_or_placeholder(finding.product_id.as_deref())
        )?;
        writeln!(writer, "    Missing: {}", finding.field)?;
        writeln!(
            writer,
            "    Link:    {}",
            display_or_placeholder(finding.link.as_deref())
        )?;
    }
    let hidden = result.total_critical.saturating_sub(options.max_critical);
    if hidden > 0 {
        writeln!(writer, "  ... and {hidden} more critical error(s)")?;
    }
    writeln!(writer)?;

    section(writer, "REPAIR PLAN")?;
    for step in REPAIR_PLAN {
        writeln!(writer, "  [ ] {step}")?;
    }
    writeln!(writer)?;

    writeln!(writer, "{}", "=".repeat(80))?;
    writeln!(writer, "FeedFix - product feed quality analysis")?;
    writeln!(writer, "{}", "=".repeat(80))?;

    Ok(())
}

fn section(writer: &mut dyn Write, title: &str) -> std::io::Result<()> {
    writeln!(writer, "{}", "-".repeat(80))?;
    writeln!(writer, "  {title}")?;
    writeln!(writer, "{}", "-".repeat(80))
}
