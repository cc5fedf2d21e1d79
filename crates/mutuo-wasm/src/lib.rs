//! WASM bindings for mortgage offer extraction.
//!
//! Lets the offer form run the extractor on pasted text without a server round trip.

use rust_decimal::prelude::ToPrimitive;
use wasm_bindgen::prelude::*;

use mutuo_core::{ExtractionConfig, OfferParser, OfferRecord};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Extract offer fields, found-field messages and notes from pasted text.
#[wasm_bindgen]
pub fn extract_offer_from_text(text: &str) -> Result<JsValue, JsValue> {
    let extraction = mutuo_core::extract(text);

    serde_wasm_bindgen::to_value(&extraction)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Merge fields extracted from `text` into an existing offer record.
///
/// Returns the updated record; zero values never overwrite existing ones.
#[wasm_bindgen]
pub fn merge_offer(record: JsValue, text: &str) -> Result<JsValue, JsValue> {
    let mut record: OfferRecord = serde_wasm_bindgen::from_value(record)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    mutuo_core::extract(text).merge_into(&mut record);

    serde_wasm_bindgen::to_value(&record)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Parse an Italian-formatted number (e.g., "180.000,28").
#[wasm_bindgen]
pub fn parse_italian_number(raw: &str) -> f64 {
    mutuo_core::offer::rules::parse_italian_number(raw)
        .to_f64()
        .unwrap_or(0.0)
}

/// Offer extractor class for browser use.
#[wasm_bindgen]
pub struct OfferExtractor {
    parser: OfferParser,
}

#[wasm_bindgen]
impl OfferExtractor {
    /// Create a new extractor with default limits.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            parser: OfferParser::new(),
        }
    }

    /// Configure the note budget, in characters.
    #[wasm_bindgen]
    pub fn set_notes_budget(&mut self, budget: usize) {
        let config = ExtractionConfig {
            notes_budget: budget,
            ..self.parser.config().clone()
        };
        self.parser = OfferParser::with_config(config);
    }

    /// Configure whether notes are collected.
    #[wasm_bindgen]
    pub fn set_collect_notes(&mut self, collect: bool) {
        let config = ExtractionConfig {
            collect_notes: collect,
            ..self.parser.config().clone()
        };
        self.parser = OfferParser::with_config(config);
    }

    /// Extract from text.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.parser.parse(text))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Found-field messages only, for the tag list under the paste box.
    #[wasm_bindgen]
    pub fn found_fields(&self, text: &str) -> Vec<String> {
        self.parser
            .parse(text)
            .diagnostics
            .into_iter()
            .map(|d| d.message)
            .collect()
    }
}

impl Default for OfferExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_italian_number() {
        assert!((parse_italian_number("180.000,28") - 180000.28).abs() < 1e-6);
        assert_eq!(parse_italian_number("abc"), 0.0);
    }

    #[test]
    fn test_found_fields() {
        let extractor = OfferExtractor::new();
        let found = extractor.found_fields("TAEG: 3,66%\nSpread 0,9%");

        assert_eq!(found, vec!["TAEG → 3.66%".to_string(), "Spread → 0.9%".to_string()]);
    }

    #[test]
    fn test_set_notes_budget_keeps_other_settings() {
        let mut extractor = OfferExtractor::new();
        extractor.set_collect_notes(false);
        extractor.set_notes_budget(100);

        assert!(!extractor.parser.config().collect_notes);
        assert_eq!(extractor.parser.config().notes_budget, 100);
    }
}
