//! Single-line quantity matchers.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::number::parse_italian_number;
use super::patterns::{DECIMAL_PERCENT, EURO_PREFIX, EURO_SUFFIX, INTEGER_PERCENT, YEARS};

/// Find a percentage in a line ("3,50%", then "5%").
pub fn find_percent(line: &str) -> Option<Decimal> {
    if let Some(caps) = DECIMAL_PERCENT.captures(line) {
        return Some(parse_italian_number(&caps[1]));
    }

    INTEGER_PERCENT
        .captures(line)
        .and_then(|caps| Decimal::from_str(&caps[1]).ok())
}

/// Find a euro amount in a line ("€ 600,00", then "350 euro" or "350 €").
pub fn find_euro(line: &str) -> Option<Decimal> {
    EURO_PREFIX
        .captures(line)
        .or_else(|| EURO_SUFFIX.captures(line))
        .map(|caps| parse_italian_number(&caps[1]))
}

/// Find a duration in years ("30 anni").
///
/// A count that does not fit in `u32` is treated as no match.
pub fn find_years(line: &str) -> Option<u32> {
    YEARS.captures(line).and_then(|caps| caps[1].parse().ok())
}
