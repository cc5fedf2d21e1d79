//! Common regex patterns for Italian mortgage offer extraction.
//!
//! Digit classes are ASCII only, and the regex engine runs in linear time,
//! so arbitrary pasted text cannot blow up a scan.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Numeric quantities
    pub static ref DECIMAL_PERCENT: Regex = Regex::new(
        r"([0-9]+[.,][0-9]+)\s*%"
    ).unwrap();

    pub static ref INTEGER_PERCENT: Regex = Regex::new(
        r"([0-9]+)\s*%"
    ).unwrap();

    pub static ref EURO_PREFIX: Regex = Regex::new(
        r"€\s*([0-9.,]+)"
    ).unwrap();

    pub static ref EURO_SUFFIX: Regex = Regex::new(
        r"([0-9.,]+)\s*(?:€|[Ee]uro)"
    ).unwrap();

    pub static ref YEARS: Regex = Regex::new(
        r"(?i)([0-9]+)\s*anni"
    ).unwrap();

    // Leading decimal literal of an already normalized number
    pub static ref LEADING_NUMBER: Regex = Regex::new(
        r"^[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)"
    ).unwrap();

    // Field anchors
    pub static ref PRINCIPAL_ANCHOR: Regex = Regex::new(
        r"(?i)importo\s+mutuo|importo\s+finanzi"
    ).unwrap();

    pub static ref DURATION_ANCHOR: Regex = Regex::new(
        r"(?i)durata"
    ).unwrap();

    pub static ref TAN_ANCHOR: Regex = Regex::new(
        r"(?i)\bTAN\b"
    ).unwrap();

    pub static ref CLOSING_RATE_ANCHOR: Regex = Regex::new(
        r"(?i)tasso\s+(?:fisso|variabile|finito)"
    ).unwrap();

    pub static ref TAEG_ANCHOR: Regex = Regex::new(
        r"(?i)\bTAEG\b"
    ).unwrap();

    pub static ref SPREAD_ANCHOR: Regex = Regex::new(
        r"(?i)\bspread\b"
    ).unwrap();

    pub static ref ORIGINATION_ANCHOR: Regex = Regex::new(
        r"(?i)istruttoria"
    ).unwrap();

    pub static ref APPRAISAL_ANCHOR: Regex = Regex::new(
        r"(?i)perizia"
    ).unwrap();

    // Inspection fees charged after disbursement are not the appraisal
    pub static ref APPRAISAL_EXCLUDE: Regex = Regex::new(
        r"(?i)sopralluogo|successiv"
    ).unwrap();

    pub static ref SUBSTITUTE_TAX_ANCHOR: Regex = Regex::new(
        r"(?i)imposta\s+sostitutiva"
    ).unwrap();

    pub static ref INSURANCE_ANCHOR: Regex = Regex::new(
        r"(?i)assicurazion"
    ).unwrap();

    // Rate type keywords (whole text)
    pub static ref FIXED_RATE: Regex = Regex::new(
        r"(?i)tasso\s+fisso|fisso"
    ).unwrap();

    pub static ref VARIABLE_RATE: Regex = Regex::new(
        r"(?i)tasso\s+variabile|variabile"
    ).unwrap();

    pub static ref MIXED_RATE: Regex = Regex::new(
        r"(?i)tasso\s+misto|misto"
    ).unwrap();

    // Green mortgage discount
    pub static ref GREEN_MENTION: Regex = Regex::new(
        r"(?i)green|classe\s+energetica"
    ).unwrap();

    pub static ref GREEN_DISCOUNT: Regex = Regex::new(
        r"(?i)(-\s*[0-9,]+%)\s*(?:per|acquisto|immobile|green)"
    ).unwrap();
}
