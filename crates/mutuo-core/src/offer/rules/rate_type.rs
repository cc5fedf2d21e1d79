//! Rate type detection over the whole offer text.

use crate::models::offer::RateType;

use super::patterns::{FIXED_RATE, MIXED_RATE, VARIABLE_RATE};

/// Detect the rate type from keyword presence anywhere in the text.
///
/// "Fisso" and "variabile" are mutually exclusive: when both appear the text
/// is ambiguous and only an explicit "misto" can still assign a type.
pub fn detect_rate_type(text: &str) -> Option<RateType> {
    let fixed = FIXED_RATE.is_match(text);
    let variable = VARIABLE_RATE.is_match(text);

    match (fixed, variable) {
        (true, false) => Some(RateType::Fixed),
        (false, true) => Some(RateType::Variable),
        _ if MIXED_RATE.is_match(text) => Some(RateType::Mixed),
        _ => None,
    }
}
