//! Keyword-anchored field extractors.

use regex::Regex;
use rust_decimal::Decimal;

use crate::models::offer::OfferField;

use super::matchers::{find_euro, find_percent, find_years};
use super::number::format_italian_amount;
use super::patterns::{
    APPRAISAL_ANCHOR, APPRAISAL_EXCLUDE, CLOSING_RATE_ANCHOR, DURATION_ANCHOR, INSURANCE_ANCHOR,
    ORIGINATION_ANCHOR, PRINCIPAL_ANCHOR, SPREAD_ANCHOR, SUBSTITUTE_TAX_ANCHOR, TAEG_ANCHOR,
    TAN_ANCHOR,
};
use super::{ExtractionMatch, FieldExtractor};

/// Unit of the quantity read from an anchored line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Percent,
    Euro,
}

/// Sanity range a value must fall in to be accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    Any,
    /// Strictly greater than.
    Above(Decimal),
    /// Strictly less than.
    Below(Decimal),
}

impl Guard {
    pub fn accepts(&self, value: Decimal) -> bool {
        match self {
            Guard::Any => true,
            Guard::Above(min) => value > *min,
            Guard::Below(max) => value < *max,
        }
    }
}

/// Extractor for a numeric field introduced by a keyword on the same line.
#[derive(Debug, Clone)]
pub struct AnchoredExtractor {
    field: OfferField,
    anchor: &'static Regex,
    exclude: Option<&'static Regex>,
    unit: Unit,
    guard: Guard,
    /// Give up after the first anchored line even if it yields nothing.
    stop_at_anchor: bool,
    /// Provenance appended to the diagnostic.
    suffix: Option<&'static str>,
}

impl AnchoredExtractor {
    pub fn new(field: OfferField, anchor: &'static Regex, unit: Unit) -> Self {
        Self {
            field,
            anchor,
            exclude: None,
            unit,
            guard: Guard::Any,
            stop_at_anchor: false,
            suffix: None,
        }
    }

    /// Skip anchored lines that also match `exclude`.
    pub fn with_exclusion(mut self, exclude: &'static Regex) -> Self {
        self.exclude = Some(exclude);
        self
    }

    /// Set the accepted value range.
    pub fn with_guard(mut self, guard: Guard) -> Self {
        self.guard = guard;
        self
    }

    /// Stop scanning at the first anchored line.
    pub fn stop_at_anchor(mut self) -> Self {
        self.stop_at_anchor = true;
        self
    }

    /// Annotate the diagnostic with where the value came from.
    pub fn with_suffix(mut self, suffix: &'static str) -> Self {
        self.suffix = Some(suffix);
        self
    }

    /// Importo mutuo / importo finanziato, above 1000 €.
    pub fn principal() -> Self {
        Self::new(OfferField::Principal, &PRINCIPAL_ANCHOR, Unit::Euro)
            .with_guard(Guard::Above(Decimal::from(1000)))
    }

    /// Explicit TAN line.
    pub fn nominal_rate() -> Self {
        Self::new(OfferField::NominalRate, &TAN_ANCHOR, Unit::Percent)
            .with_guard(Guard::Below(Decimal::from(20)))
    }

    /// "Tasso fisso: 3,50%" style line, used when no TAN line qualifies.
    pub fn closing_rate() -> Self {
        Self::new(OfferField::NominalRate, &CLOSING_RATE_ANCHOR, Unit::Percent)
            .with_guard(Guard::Below(Decimal::from(20)))
            .with_suffix("from closing rate")
    }

    pub fn apr() -> Self {
        Self::new(OfferField::Apr, &TAEG_ANCHOR, Unit::Percent)
            .with_guard(Guard::Below(Decimal::from(20)))
    }

    pub fn spread() -> Self {
        Self::new(OfferField::Spread, &SPREAD_ANCHOR, Unit::Percent)
            .with_guard(Guard::Below(Decimal::from(10)))
    }

    pub fn origination_fee() -> Self {
        Self::new(OfferField::OriginationFee, &ORIGINATION_ANCHOR, Unit::Euro)
    }

    /// Perizia, ignoring later inspection fees, below 5000 €.
    pub fn appraisal_fee() -> Self {
        Self::new(OfferField::AppraisalFee, &APPRAISAL_ANCHOR, Unit::Euro)
            .with_exclusion(&APPRAISAL_EXCLUDE)
            .with_guard(Guard::Below(Decimal::from(5000)))
    }

    /// Imposta sostitutiva, recorded as notarial costs.
    pub fn substitute_tax() -> Self {
        Self::new(OfferField::NotarialCosts, &SUBSTITUTE_TAX_ANCHOR, Unit::Euro)
            .with_suffix("as notarial costs")
    }

    /// Only the first line mentioning insurance is considered.
    pub fn insurance() -> Self {
        Self::new(OfferField::InsuranceCost, &INSURANCE_ANCHOR, Unit::Euro)
            .with_guard(Guard::Above(Decimal::ZERO))
            .stop_at_anchor()
    }

    /// Render a value for the user, e.g. `3.50%` or `€600,00`.
    pub fn describe(&self, value: Decimal) -> String {
        let rendered = match self.unit {
            Unit::Percent => format!("{}%", value),
            Unit::Euro => format!("€{}", format_italian_amount(value)),
        };

        match self.suffix {
            Some(suffix) => format!("{} ({})", rendered, suffix),
            None => rendered,
        }
    }

    fn read(&self, line: &str) -> Option<Decimal> {
        match self.unit {
            Unit::Percent => find_percent(line),
            Unit::Euro => find_euro(line),
        }
    }
}

impl FieldExtractor for AnchoredExtractor {
    type Output = Decimal;

    fn field(&self) -> OfferField {
        self.field
    }

    fn extract(&self, lines: &[&str]) -> Option<ExtractionMatch<Decimal>> {
        for (idx, line) in lines.iter().enumerate() {
            if !self.anchor.is_match(line) {
                continue;
            }
            if self.exclude.is_some_and(|re| re.is_match(line)) {
                continue;
            }

            let found = self.read(line).filter(|v| self.guard.accepts(*v));
            if let Some(value) = found {
                return Some(ExtractionMatch::new(value, idx, *line));
            }
            if self.stop_at_anchor {
                return None;
            }
        }

        None
    }
}

/// Loan duration in years ("Durata: 30 anni").
#[derive(Debug, Clone, Default)]
pub struct DurationExtractor;

impl DurationExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl FieldExtractor for DurationExtractor {
    type Output = u32;

    fn field(&self) -> OfferField {
        OfferField::DurationYears
    }

    fn extract(&self, lines: &[&str]) -> Option<ExtractionMatch<u32>> {
        lines.iter().enumerate().find_map(|(idx, line)| {
            if !DURATION_ANCHOR.is_match(line) {
                return None;
            }
            find_years(line).map(|years| ExtractionMatch::new(years, idx, *line))
        })
    }
}
