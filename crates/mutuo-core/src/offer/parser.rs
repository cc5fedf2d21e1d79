//! Offer parser running every field rule and the note collector over pasted text.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::models::config::ExtractionConfig;
use crate::models::offer::*;

use super::rules::{
    collect_notes, detect_rate_type, AnchoredExtractor, DurationExtractor, FieldExtractor,
};

/// Result of one extraction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    /// Fields found in the text.
    pub offer: PartialOffer,
    /// One "field found" message per extracted field, in extraction order.
    pub diagnostics: Vec<Diagnostic>,
    /// Leftover qualitative content.
    pub notes: Vec<String>,
}

impl Extraction {
    /// Merge this extraction into an existing record (see [`OfferRecord::merge`]).
    pub fn merge_into(&self, record: &mut OfferRecord) -> Vec<OfferField> {
        record.merge(&self.offer, &self.notes)
    }
}

/// Keyword-driven parser for Italian mortgage offer text.
#[derive(Debug, Clone, Default)]
pub struct OfferParser {
    config: ExtractionConfig,
}

impl OfferParser {
    /// Create a parser with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with the given configuration.
    pub fn with_config(config: ExtractionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extract offer fields, diagnostics and notes from freeform text.
    ///
    /// Never fails: fields that cannot be found are left absent.
    pub fn parse(&self, text: &str) -> Extraction {
        let text = self.cap_input(text);
        info!("Parsing offer from {} characters of text", text.chars().count());

        let lines = split_lines(text);
        let mut result = Extraction::default();

        if let Some(rate_type) = detect_rate_type(text) {
            result.offer.rate_type = Some(rate_type);
            result.found(OfferField::RateType, rate_type.display());
        }

        result.apply(&AnchoredExtractor::principal(), &lines, |o, v| o.principal = Some(v));

        let duration = DurationExtractor::new();
        if let Some(m) = duration.extract(&lines) {
            result.offer.duration_years = Some(m.value);
            result.found(duration.field(), format!("{} years", m.value));
        }

        // Fall back to "tasso fisso: x%" lines only when no TAN line qualifies
        let set_tan = |o: &mut PartialOffer, v| o.nominal_rate = Some(v);
        if !result.apply(&AnchoredExtractor::nominal_rate(), &lines, set_tan) {
            result.apply(&AnchoredExtractor::closing_rate(), &lines, set_tan);
        }

        result.apply(&AnchoredExtractor::apr(), &lines, |o, v| o.apr = Some(v));
        result.apply(&AnchoredExtractor::spread(), &lines, |o, v| o.spread = Some(v));
        result.apply(&AnchoredExtractor::origination_fee(), &lines, |o, v| {
            o.origination_fee = Some(v)
        });
        result.apply(&AnchoredExtractor::appraisal_fee(), &lines, |o, v| o.appraisal_fee = Some(v));
        result.apply(&AnchoredExtractor::substitute_tax(), &lines, |o, v| {
            o.notarial_costs = Some(v)
        });
        result.apply(&AnchoredExtractor::insurance(), &lines, |o, v| o.insurance_cost = Some(v));

        if self.config.collect_notes {
            result.notes = collect_notes(
                text,
                &lines,
                self.config.min_note_line_chars,
                self.config.notes_budget,
            );
        }

        debug!(
            "Extracted {} fields and {} note fragments",
            result.diagnostics.len(),
            result.notes.len()
        );

        result
    }

    /// Cut the input at the configured character cap.
    fn cap_input<'a>(&self, text: &'a str) -> &'a str {
        match text.char_indices().nth(self.config.max_input_chars) {
            Some((idx, _)) => {
                warn!(
                    "Input exceeds {} characters, ignoring the rest",
                    self.config.max_input_chars
                );
                &text[..idx]
            }
            None => text,
        }
    }
}

impl Extraction {
    /// Run an anchored rule and record its value. Returns whether it matched.
    fn apply<F>(&mut self, extractor: &AnchoredExtractor, lines: &[&str], assign: F) -> bool
    where
        F: FnOnce(&mut PartialOffer, Decimal),
    {
        match extractor.extract(lines) {
            Some(m) => {
                debug!("{:?} found on line {}: {}", extractor.field(), m.line, m.source);
                assign(&mut self.offer, m.value);
                self.found(extractor.field(), extractor.describe(m.value));
                true
            }
            None => false,
        }
    }

    fn found(&mut self, field: OfferField, value: impl std::fmt::Display) {
        self.diagnostics.push(Diagnostic::new(field, value));
    }
}

/// Split text into trimmed, non-empty lines, preserving order.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect()
}

/// Extract an offer from text with the default configuration.
pub fn extract(text: &str) -> Extraction {
    OfferParser::new().parse(text)
}
