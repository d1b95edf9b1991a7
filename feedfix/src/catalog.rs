//! Fixed field catalog for Google Shopping feed items.
//!
//! The catalog is closed: every item must supply all of [`Field::REQUIRED`],
//! and the absence of a field for which [`Field::is_critical`] returns `true`
//! is reported as a critical defect. Criticality is a property of a required
//! field, so the critical set can never contain anything outside the
//! required set.

use std::fmt;

use serde::{Serialize, Serializer};

/// A required product attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Id,
    Title,
    Description,
    Link,
    ImageLink,
    Price,
    Availability,
}

impl Field {
    /// Every required field, in catalog order.
    pub const REQUIRED: [Self; 7] = [
        Self::Id,
        Self::Title,
        Self::Description,
        Self::Link,
        Self::ImageLink,
        Self::Price,
        Self::Availability,
    ];

    /// Required fields whose absence is critical, in catalog order.
    pub const CRITICAL: [Self; 4] = [Self::Id, Self::Link, Self::Price, Self::Availability];

    /// Local element name of this field inside the product attribute namespace.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Title => "title",
            Self::Description => "description",
            Self::Link => "link",
            Self::ImageLink => "image_link",
            Self::Price => "price",
            Self::Availability => "availability",
        }
    }

    /// Whether a missing value for this field is a critical defect.
    #[must_use]
    pub const fn is_critical(self) -> bool {
        match self {
            Self::Id | Self::Link | Self::Price | Self::Availability => true,
            Self::Title | Self::Description | Self::ImageLink => false,
        }
    }

    /// Severity assigned when this field is missing.
    #[must_use]
    pub const fn missing_severity(self) -> Severity {
        if self.is_critical() {
            Severity::Critical
        } else {
            Severity::Warning
        }
    }

    /// Position of this field in [`Field::REQUIRED`].
    #[must_use]
    pub(crate) const fn slot(self) -> usize {
        match self {
            Self::Id => 0,
            Self::Title => 1,
            Self::Description => 2,
            Self::Link => 3,
            Self::ImageLink => 4,
            Self::Price => 5,
            Self::Availability => 6,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of a single finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
}

impl Severity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key of the per-field error statistics.
///
/// Ordering follows the catalog, with the synthetic price format tally last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StatKey {
    /// Items missing a required field.
    Missing(Field),
    /// Items whose price lacks the amount/currency separator.
    PriceFormat,
}

impl StatKey {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Missing(field) => field.as_str(),
            Self::PriceFormat => "price_format",
        }
    }
}

impl fmt::Display for StatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Field> for StatKey {
    fn from(field: Field) -> Self {
        Self::Missing(field)
    }
}

// Serialized as a plain string so it can be used as a JSON object key.
impl Serialize for StatKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
