//! Italian number parsing and formatting.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::LEADING_NUMBER;

/// Parse an Italian-formatted number (e.g. "180.000", "808,28", "180.000,28").
///
/// Currency symbols and whitespace are ignored. When separators are ambiguous:
/// - both `.` and `,`: dots group thousands, the comma is the decimal mark;
/// - only `,`: a comma followed by exactly three digits after a number below
///   1000 groups thousands (`180,000`), otherwise it is the decimal mark;
/// - only `.`: a single dot followed by exactly three digits groups thousands
///   (`180.000`), otherwise it is the decimal point (`3.50`).
///
/// Unparseable input yields zero.
pub fn parse_italian_number(raw: &str) -> Decimal {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != '€' && !c.is_whitespace())
        .collect();

    let normalized = match (cleaned.contains('.'), cleaned.contains(',')) {
        (true, true) => cleaned.replace('.', "").replacen(',', ".", 1),
        (false, true) => {
            let (head, tail) = cleaned.split_once(',').unwrap_or((cleaned.as_str(), ""));
            let group = tail.split(',').next().unwrap_or("");
            let below_thousand = leading_decimal(head)
                .map(|n| n < Decimal::from(1000))
                .unwrap_or(false);

            if group.chars().count() == 3 && below_thousand {
                cleaned.replacen(',', "", 1)
            } else {
                cleaned.replacen(',', ".", 1)
            }
        }
        (true, false) => {
            let parts: Vec<&str> = cleaned.split('.').collect();
            if parts.len() == 2 && parts[1].chars().count() == 3 {
                cleaned.replacen('.', "", 1)
            } else {
                cleaned
            }
        }
        (false, false) => cleaned,
    };

    leading_decimal(&normalized).unwrap_or(Decimal::ZERO)
}

/// Parse the longest decimal literal at the start of `s`, ignoring the rest.
fn leading_decimal(s: &str) -> Option<Decimal> {
    let literal = LEADING_NUMBER.find(s)?.as_str();
    let literal = literal.trim_start_matches('+').trim_end_matches('.');
    Decimal::from_str(literal).ok()
}

/// Format an amount in Italian style (180.000 or 1.234,56).
pub fn format_italian_amount(amount: Decimal) -> String {
    let s = amount.abs().to_string();
    let (integer_part, decimal_part) = match s.split_once('.') {
        Some((int, dec)) => (int, Some(dec)),
        None => (s.as_str(), None),
    };

    // Add thousand separators
    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();

    if amount.is_sign_negative() && !amount.is_zero() {
        formatted.push('-');
    }
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push('.');
        }
        formatted.push(*c);
    }

    match decimal_part {
        Some(dec) => format!("{},{}", formatted, dec),
        None => formatted,
    }
}
