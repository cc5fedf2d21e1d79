//! Mortgage offer data models.
//!
//! Field names serialize to the keys used by the offer form and its backend
//! (`tan`, `taeg`, `importo`, ...), so records round-trip with existing data.

use std::fmt;
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Interest rate type of a mortgage offer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateType {
    /// Tasso fisso.
    #[default]
    #[serde(rename = "fisso")]
    Fixed,
    /// Tasso variabile.
    #[serde(rename = "variabile")]
    Variable,
    /// Tasso misto.
    #[serde(rename = "misto")]
    Mixed,
}

impl RateType {
    /// Code used by the offer form ("fisso", "variabile", "misto").
    pub fn code(&self) -> &'static str {
        match self {
            RateType::Fixed => "fisso",
            RateType::Variable => "variabile",
            RateType::Mixed => "misto",
        }
    }

    /// Human-readable label.
    pub fn display(&self) -> &'static str {
        match self {
            RateType::Fixed => "Fixed",
            RateType::Variable => "Variable",
            RateType::Mixed => "Mixed",
        }
    }
}

/// Structured fields the extractor knows how to fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferField {
    RateType,
    Principal,
    DurationYears,
    NominalRate,
    Apr,
    Spread,
    OriginationFee,
    AppraisalFee,
    NotarialCosts,
    InsuranceCost,
}

impl OfferField {
    /// Short label used in diagnostics and summaries.
    pub fn label(&self) -> &'static str {
        match self {
            OfferField::RateType => "Rate type",
            OfferField::Principal => "Principal",
            OfferField::DurationYears => "Duration",
            OfferField::NominalRate => "TAN",
            OfferField::Apr => "TAEG",
            OfferField::Spread => "Spread",
            OfferField::OriginationFee => "Origination fee",
            OfferField::AppraisalFee => "Appraisal fee",
            OfferField::NotarialCosts => "Substitute tax",
            OfferField::InsuranceCost => "Insurance",
        }
    }
}

/// A "field found" message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Field that was filled.
    pub field: OfferField,
    /// Label and assigned value, e.g. `TAN → 3.50%`.
    pub message: String,
}

impl Diagnostic {
    pub fn new(field: OfferField, value: impl fmt::Display) -> Self {
        Self {
            field,
            message: format!("{} → {}", field.label(), value),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Sparse offer record produced by one extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialOffer {
    #[serde(rename = "tipo_tasso", skip_serializing_if = "Option::is_none")]
    pub rate_type: Option<RateType>,

    #[serde(rename = "importo", skip_serializing_if = "Option::is_none")]
    pub principal: Option<Decimal>,

    #[serde(rename = "durata_anni", skip_serializing_if = "Option::is_none")]
    pub duration_years: Option<u32>,

    /// TAN, in percent.
    #[serde(rename = "tan", skip_serializing_if = "Option::is_none")]
    pub nominal_rate: Option<Decimal>,

    /// TAEG, in percent.
    #[serde(rename = "taeg", skip_serializing_if = "Option::is_none")]
    pub apr: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub spread: Option<Decimal>,

    #[serde(rename = "spese_istruttoria", skip_serializing_if = "Option::is_none")]
    pub origination_fee: Option<Decimal>,

    #[serde(rename = "spese_perizia", skip_serializing_if = "Option::is_none")]
    pub appraisal_fee: Option<Decimal>,

    /// Imposta sostitutiva, recorded as notarial costs.
    #[serde(rename = "spese_notarili", skip_serializing_if = "Option::is_none")]
    pub notarial_costs: Option<Decimal>,

    #[serde(rename = "costo_assicurazione", skip_serializing_if = "Option::is_none")]
    pub insurance_cost: Option<Decimal>,
}

impl PartialOffer {
    /// Fields currently present, in extraction order.
    pub fn present_fields(&self) -> Vec<OfferField> {
        let slots = [
            (OfferField::RateType, self.rate_type.is_some()),
            (OfferField::Principal, self.principal.is_some()),
            (OfferField::DurationYears, self.duration_years.is_some()),
            (OfferField::NominalRate, self.nominal_rate.is_some()),
            (OfferField::Apr, self.apr.is_some()),
            (OfferField::Spread, self.spread.is_some()),
            (OfferField::OriginationFee, self.origination_fee.is_some()),
            (OfferField::AppraisalFee, self.appraisal_fee.is_some()),
            (OfferField::NotarialCosts, self.notarial_costs.is_some()),
            (OfferField::InsuranceCost, self.insurance_cost.is_some()),
        ];

        slots
            .into_iter()
            .filter(|(_, present)| *present)
            .map(|(field, _)| field)
            .collect()
    }

    /// True when no field was extracted.
    pub fn is_empty(&self) -> bool {
        self.present_fields().is_empty()
    }
}

/// The full offer record edited by the user and persisted downstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OfferRecord {
    #[serde(rename = "banca")]
    pub bank: String,

    #[serde(rename = "tipo_tasso")]
    pub rate_type: RateType,

    #[serde(rename = "tan")]
    pub nominal_rate: Decimal,

    #[serde(rename = "taeg", skip_serializing_if = "Option::is_none")]
    pub apr: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub spread: Option<Decimal>,

    #[serde(rename = "importo")]
    pub principal: Decimal,

    #[serde(rename = "valore_immobile")]
    pub property_value: Decimal,

    #[serde(rename = "durata_anni")]
    pub duration_years: u32,

    #[serde(rename = "spese_istruttoria")]
    pub origination_fee: Decimal,

    #[serde(rename = "spese_perizia")]
    pub appraisal_fee: Decimal,

    #[serde(rename = "costo_assicurazione")]
    pub insurance_cost: Decimal,

    #[serde(rename = "spese_notarili")]
    pub notarial_costs: Decimal,

    #[serde(rename = "altre_spese")]
    pub other_costs: Decimal,

    #[serde(rename = "note", skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl OfferRecord {
    /// Load a record from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Merge extracted fields and notes into this record.
    ///
    /// A value overwrites the record only when it is present and not zero, so
    /// an extracted zero never clears an existing amount. Notes are appended
    /// after a blank line. Returns the fields that were written.
    pub fn merge(&mut self, offer: &PartialOffer, notes: &[String]) -> Vec<OfferField> {
        let mut written = Vec::new();

        if let Some(rate_type) = offer.rate_type {
            self.rate_type = rate_type;
            written.push(OfferField::RateType);
        }

        merge_decimal(&mut self.principal, offer.principal, OfferField::Principal, &mut written);

        if let Some(years) = offer.duration_years.filter(|y| *y != 0) {
            self.duration_years = years;
            written.push(OfferField::DurationYears);
        }

        merge_decimal(
            &mut self.nominal_rate,
            offer.nominal_rate,
            OfferField::NominalRate,
            &mut written,
        );

        if let Some(apr) = offer.apr.filter(|v| !v.is_zero()) {
            self.apr = Some(apr);
            written.push(OfferField::Apr);
        }
        if let Some(spread) = offer.spread.filter(|v| !v.is_zero()) {
            self.spread = Some(spread);
            written.push(OfferField::Spread);
        }

        merge_decimal(
            &mut self.origination_fee,
            offer.origination_fee,
            OfferField::OriginationFee,
            &mut written,
        );
        merge_decimal(
            &mut self.appraisal_fee,
            offer.appraisal_fee,
            OfferField::AppraisalFee,
            &mut written,
        );
        merge_decimal(
            &mut self.notarial_costs,
            offer.notarial_costs,
            OfferField::NotarialCosts,
            &mut written,
        );
        merge_decimal(
            &mut self.insurance_cost,
            offer.insurance_cost,
            OfferField::InsuranceCost,
            &mut written,
        );

        if !notes.is_empty() {
            let note_text = notes.join("\n").trim().to_string();
            if !note_text.is_empty() {
                self.notes = Some(match self.notes.as_deref() {
                    Some(prev) if !prev.is_empty() => format!("{}\n\n{}", prev, note_text),
                    _ => note_text,
                });
            }
        }

        written
    }

    /// Validate the record against the form constraints and return any issues found.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        let bank_len = self.bank.chars().count();
        if bank_len == 0 {
            issues.push("Missing bank name".to_string());
        } else if bank_len > 200 {
            issues.push(format!("Bank name too long ({} chars, max 200)", bank_len));
        }

        check_percent(&mut issues, "TAN", Some(self.nominal_rate));
        check_percent(&mut issues, "TAEG", self.apr);
        check_percent(&mut issues, "Spread", self.spread);

        if self.principal <= Decimal::ZERO {
            issues.push("Principal must be greater than zero".to_string());
        }
        if self.property_value <= Decimal::ZERO {
            issues.push("Property value must be greater than zero".to_string());
        }
        if !(1..=40).contains(&self.duration_years) {
            issues.push(format!(
                "Duration must be between 1 and 40 years (got {})",
                self.duration_years
            ));
        }

        let costs = [
            ("Origination fee", self.origination_fee),
            ("Appraisal fee", self.appraisal_fee),
            ("Insurance cost", self.insurance_cost),
            ("Notarial costs", self.notarial_costs),
            ("Other costs", self.other_costs),
        ];
        for (name, value) in costs {
            if value < Decimal::ZERO {
                issues.push(format!("{} cannot be negative ({})", name, value));
            }
        }

        if let Some(notes) = &self.notes {
            let len = notes.chars().count();
            if len > 5000 {
                issues.push(format!("Notes too long ({} chars, max 5000)", len));
            }
        }

        issues
    }
}

fn merge_decimal(
    slot: &mut Decimal,
    value: Option<Decimal>,
    field: OfferField,
    written: &mut Vec<OfferField>,
) {
    if let Some(value) = value.filter(|v| !v.is_zero()) {
        *slot = value;
        written.push(field);
    }
}

fn check_percent(issues: &mut Vec<String>, name: &str, value: Option<Decimal>) {
    if let Some(value) = value {
        if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
            issues.push(format!("{} must be between 0 and 100 (got {})", name, value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn valid_record() -> OfferRecord {
        OfferRecord {
            bank: "Banca Esempio".to_string(),
            nominal_rate: dec("3.20"),
            principal: dec("150000"),
            property_value: dec("200000"),
            duration_years: 25,
            ..OfferRecord::default()
        }
    }

    #[test]
    fn test_merge_overwrites_present_fields() {
        let mut record = valid_record();
        let offer = PartialOffer {
            rate_type: Some(RateType::Variable),
            nominal_rate: Some(dec("3.50")),
            spread: Some(dec("0.90")),
            ..PartialOffer::default()
        };

        let written = record.merge(&offer, &[]);

        assert_eq!(
            written,
            vec![OfferField::RateType, OfferField::NominalRate, OfferField::Spread]
        );
        assert_eq!(record.rate_type, RateType::Variable);
        assert_eq!(record.nominal_rate, dec("3.50"));
        assert_eq!(record.spread, Some(dec("0.90")));
        assert_eq!(record.principal, dec("150000"));
    }

    #[test]
    fn test_merge_skips_zero_values() {
        let mut record = valid_record();
        record.origination_fee = dec("800");

        let offer = PartialOffer {
            origination_fee: Some(Decimal::ZERO),
            duration_years: Some(0),
            ..PartialOffer::default()
        };

        assert!(record.merge(&offer, &[]).is_empty());
        assert_eq!(record.origination_fee, dec("800"));
        assert_eq!(record.duration_years, 25);
    }

    #[test]
    fn test_merge_appends_notes() {
        let mut record = valid_record();
        record.notes = Some("Chiamare il consulente".to_string());

        let notes = vec![
            "\n📌 Garanzie".to_string(),
            "Ipoteca di primo grado sull'immobile".to_string(),
        ];
        record.merge(&PartialOffer::default(), &notes);

        assert_eq!(
            record.notes.as_deref(),
            Some("Chiamare il consulente\n\n📌 Garanzie\nIpoteca di primo grado sull'immobile")
        );
    }

    #[test]
    fn test_merge_sets_notes_when_empty() {
        let mut record = valid_record();
        record.notes = Some(String::new());

        record.merge(&PartialOffer::default(), &["\n📌 Note".to_string()]);

        assert_eq!(record.notes.as_deref(), Some("📌 Note"));
    }

    #[test]
    fn test_present_fields_order() {
        let offer = PartialOffer {
            insurance_cost: Some(dec("300")),
            rate_type: Some(RateType::Fixed),
            apr: Some(dec("3.66")),
            ..PartialOffer::default()
        };

        assert_eq!(
            offer.present_fields(),
            vec![OfferField::RateType, OfferField::Apr, OfferField::InsuranceCost]
        );
        assert!(PartialOffer::default().is_empty());
    }

    #[test]
    fn test_validate() {
        assert!(valid_record().validate().is_empty());

        let record = OfferRecord {
            nominal_rate: dec("120"),
            duration_years: 50,
            ..OfferRecord::default()
        };
        let issues = record.validate();

        assert!(issues.contains(&"Missing bank name".to_string()));
        assert!(issues.iter().any(|i| i.starts_with("TAN must be between")));
        assert!(issues.iter().any(|i| i.starts_with("Duration must be between")));
        assert!(issues.contains(&"Principal must be greater than zero".to_string()));
    }

    #[test]
    fn test_record_serializes_form_keys() {
        let json = serde_json::to_value(valid_record()).unwrap();

        assert_eq!(json["banca"], "Banca Esempio");
        assert_eq!(json["tipo_tasso"], "fisso");
        assert_eq!(json["durata_anni"], 25);
        assert!(json.get("taeg").is_none());
    }

    #[test]
    fn test_diagnostic_display() {
        let diagnostic = Diagnostic::new(OfferField::NominalRate, "3.50%");
        assert_eq!(diagnostic.to_string(), "TAN → 3.50%");
    }
}
