//! Offer field extraction module.

mod parser;
pub mod rules;

pub use parser::{extract, split_lines, Extraction, OfferParser};
