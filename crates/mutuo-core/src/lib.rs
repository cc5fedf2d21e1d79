//! Core library for Italian mortgage offer extraction.
//!
//! This crate provides:
//! - Italian number parsing (`180.000,28`, `808,28`, `3.50`)
//! - Keyword-anchored field rules (TAN, TAEG, spread, fees, duration, ...)
//! - Note collection from qualitative sections of a bank offer page
//! - Offer data models and the non-destructive merge into an edited record

pub mod error;
pub mod models;
pub mod offer;

pub use error::{MutuoError, Result};
pub use models::config::{ExtractionConfig, MutuoConfig};
pub use models::offer::{Diagnostic, OfferField, OfferRecord, PartialOffer, RateType};
pub use offer::{extract, Extraction, OfferParser};
