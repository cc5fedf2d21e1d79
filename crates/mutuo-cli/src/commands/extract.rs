//! Extract command - pull offer fields out of a single pasted text.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use mutuo_core::offer::rules::format_italian_amount;
use mutuo_core::{Extraction, OfferParser, OfferRecord, PartialOffer};

use super::config::load_config;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input text file ("-" or omitted reads stdin)
    input: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Merge the extracted fields into this offer record (JSON) and output the merged record
    #[arg(long)]
    into: Option<PathBuf>,

    /// Report form-level issues of the merged record
    #[arg(long, requires = "into")]
    validate: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let text = read_input(args.input.as_deref())?;
    let parser = OfferParser::with_config(config.extraction);
    let extraction = parser.parse(&text);

    info!(
        "Found {} fields and {} note fragments",
        extraction.diagnostics.len(),
        extraction.notes.len()
    );

    let output = match &args.into {
        Some(record_path) => {
            let mut record = OfferRecord::from_file(record_path)?;
            let written = extraction.merge_into(&mut record);
            info!("Merged {} fields into {}", written.len(), record_path.display());

            if args.validate {
                let issues = record.validate();
                if !issues.is_empty() {
                    eprintln!("{}", style("Validation issues:").yellow());
                    for issue in &issues {
                        eprintln!("  - {}", issue);
                    }
                }
            }

            format_record(&record, args.format)?
        }
        None => format_extraction(&extraction, args.format)?,
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn read_input(input: Option<&Path>) -> anyhow::Result<String> {
    match input {
        Some(path) if path != Path::new("-") => {
            if !path.exists() {
                anyhow::bail!("Input file not found: {}", path.display());
            }
            Ok(fs::read_to_string(path)?)
        }
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn format_extraction(extraction: &Extraction, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(extraction)?),
        OutputFormat::Csv => offers_csv(&[("-".to_string(), &extraction.offer)]),
        OutputFormat::Text => Ok(format_text(extraction)),
    }
}

fn format_record(record: &OfferRecord, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(record)?),
        OutputFormat::Csv => record_csv(record),
        OutputFormat::Text => Ok(record_text(record)),
    }
}

const OFFER_COLUMNS: [&str; 11] = [
    "source",
    "tipo_tasso",
    "importo",
    "durata_anni",
    "tan",
    "taeg",
    "spread",
    "spese_istruttoria",
    "spese_perizia",
    "spese_notarili",
    "costo_assicurazione",
];

/// One CSV row per extracted offer; absent fields are empty cells.
pub fn offers_csv(rows: &[(String, &PartialOffer)]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(OFFER_COLUMNS)?;

    for (source, offer) in rows {
        let cell = |v: Option<String>| v.unwrap_or_default();
        wtr.write_record([
            source.clone(),
            cell(offer.rate_type.map(|r| r.code().to_string())),
            cell(offer.principal.map(|v| v.to_string())),
            cell(offer.duration_years.map(|v| v.to_string())),
            cell(offer.nominal_rate.map(|v| v.to_string())),
            cell(offer.apr.map(|v| v.to_string())),
            cell(offer.spread.map(|v| v.to_string())),
            cell(offer.origination_fee.map(|v| v.to_string())),
            cell(offer.appraisal_fee.map(|v| v.to_string())),
            cell(offer.notarial_costs.map(|v| v.to_string())),
            cell(offer.insurance_cost.map(|v| v.to_string())),
        ])?;
    }

    Ok(String::from_utf8(wtr.into_inner()?)?)
}

fn record_csv(record: &OfferRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "banca",
        "tipo_tasso",
        "tan",
        "taeg",
        "spread",
        "importo",
        "valore_immobile",
        "durata_anni",
        "spese_istruttoria",
        "spese_perizia",
        "costo_assicurazione",
        "spese_notarili",
        "altre_spese",
    ])?;

    wtr.write_record([
        record.bank.clone(),
        record.rate_type.code().to_string(),
        record.nominal_rate.to_string(),
        record.apr.map(|v| v.to_string()).unwrap_or_default(),
        record.spread.map(|v| v.to_string()).unwrap_or_default(),
        record.principal.to_string(),
        record.property_value.to_string(),
        record.duration_years.to_string(),
        record.origination_fee.to_string(),
        record.appraisal_fee.to_string(),
        record.insurance_cost.to_string(),
        record.notarial_costs.to_string(),
        record.other_costs.to_string(),
    ])?;

    Ok(String::from_utf8(wtr.into_inner()?)?)
}

fn format_text(extraction: &Extraction) -> String {
    let mut output = String::new();

    if extraction.diagnostics.is_empty() {
        output.push_str("No fields found\n");
    } else {
        output.push_str(&format!("Fields found ({}):\n", extraction.diagnostics.len()));
        for diagnostic in &extraction.diagnostics {
            output.push_str(&format!("  [{}]\n", diagnostic));
        }
    }

    if !extraction.notes.is_empty() {
        output.push_str("\nNotes:\n");
        output.push_str(extraction.notes.join("\n").trim());
        output.push('\n');
    }

    output
}

fn record_text(record: &OfferRecord) -> String {
    let mut output = String::new();

    output.push_str(&format!("Bank: {}\n", record.bank));
    output.push_str(&format!("Rate type: {}\n", record.rate_type.display()));
    output.push_str(&format!("TAN: {}%\n", record.nominal_rate));
    if let Some(apr) = record.apr {
        output.push_str(&format!("TAEG: {}%\n", apr));
    }
    if let Some(spread) = record.spread {
        output.push_str(&format!("Spread: {}%\n", spread));
    }
    output.push_str(&format!("Principal: €{}\n", format_italian_amount(record.principal)));
    output.push_str(&format!("Duration: {} years\n", record.duration_years));
    output.push('\n');

    output.push_str("Costs:\n");
    let costs = [
        ("Origination", record.origination_fee),
        ("Appraisal", record.appraisal_fee),
        ("Insurance", record.insurance_cost),
        ("Notarial", record.notarial_costs),
        ("Other", record.other_costs),
    ];
    for (label, amount) in costs {
        output.push_str(&format!(
            "  {:<12} €{}\n",
            format!("{}:", label),
            format_italian_amount(amount)
        ));
    }

    if let Some(notes) = &record.notes {
        output.push_str(&format!("\nNotes:\n{}\n", notes));
    }

    output
}
