//! Rule-based field extractors for Italian mortgage offers.

pub mod fields;
pub mod matchers;
pub mod notes;
pub mod number;
pub mod patterns;
pub mod rate_type;

pub use fields::{AnchoredExtractor, DurationExtractor, Guard, Unit};
pub use matchers::{find_euro, find_percent, find_years};
pub use notes::{collect_notes, green_discount, truncate_notes};
pub use number::{format_italian_amount, parse_italian_number};
pub use rate_type::detect_rate_type;

use crate::models::offer::OfferField;

/// Trait for line-scanning field extractors.
///
/// An extractor walks the lines in order and stops at the first line that
/// qualifies, so a field is assigned at most once per extraction.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// The record field this extractor fills.
    fn field(&self) -> OfferField;

    /// Extract the field from trimmed, non-empty lines.
    fn extract(&self, lines: &[&str]) -> Option<ExtractionMatch<Self::Output>>;
}

/// A value found on a specific line.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Index of the line it came from.
    pub line: usize,
    /// The line that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, line: usize, source: impl Into<String>) -> Self {
        Self {
            value,
            line,
            source: source.into(),
        }
    }
}
