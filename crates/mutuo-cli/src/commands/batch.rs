//! Batch command - extract offers from many saved page texts.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use mutuo_core::{Extraction, OfferParser};

use super::config::load_config;
use super::extract::offers_csv;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern (e.g. "offers/*.txt")
    #[arg(required = true)]
    input: String,

    /// Output directory for one JSON file per input
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct BatchResult {
    path: PathBuf,
    extraction: Option<Extraction>,
    error: Option<String>,
}

pub fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(ext.to_lowercase().as_str(), "txt" | "text")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files",
            )?
            .progress_chars("=>-"),
    );

    let parser = OfferParser::with_config(config.extraction);
    let mut results = Vec::with_capacity(files.len());

    for path in files {
        match process_file(&path, &parser, args.output_dir.as_deref()) {
            Ok(extraction) => {
                debug!(
                    "{}: {} fields found",
                    path.display(),
                    extraction.diagnostics.len()
                );
                results.push(BatchResult {
                    path,
                    extraction: Some(extraction),
                    error: None,
                });
            }
            Err(e) => {
                error!("Failed to process {}: {}", path.display(), e);
                if !args.continue_on_error {
                    pb.abandon();
                    return Err(e);
                }
                results.push(BatchResult {
                    path,
                    extraction: None,
                    error: Some(e.to_string()),
                });
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();

    if args.summary {
        let summary_path = args
            .output_dir
            .as_deref()
            .unwrap_or_else(|| Path::new("."))
            .join("summary.csv");
        write_summary(&results, &summary_path)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed = results.iter().filter(|r| r.error.is_some()).count();
    let empty = results
        .iter()
        .filter(|r| r.extraction.as_ref().is_some_and(|e| e.diagnostics.is_empty()))
        .count();

    if empty > 0 {
        warn!("{} files yielded no fields", empty);
    }

    println!(
        "{} Processed {} files ({} failed) in {:.1}s",
        style("✓").green(),
        results.len(),
        failed,
        start.elapsed().as_secs_f32()
    );

    for result in results.iter().filter(|r| r.error.is_some()) {
        eprintln!(
            "  {} {}: {}",
            style("✗").red(),
            result.path.display(),
            result.error.as_deref().unwrap_or_default()
        );
    }

    Ok(())
}

fn process_file(
    path: &Path,
    parser: &OfferParser,
    output_dir: Option<&Path>,
) -> anyhow::Result<Extraction> {
    let text = fs::read_to_string(path)?;
    let extraction = parser.parse(&text);

    if let Some(dir) = output_dir {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("offer");
        let out_path = dir.join(format!("{}.json", stem));
        fs::write(&out_path, serde_json::to_string_pretty(&extraction)?)?;
    }

    Ok(extraction)
}

fn write_summary(results: &[BatchResult], path: &Path) -> anyhow::Result<()> {
    let rows: Vec<(String, &mutuo_core::PartialOffer)> = results
        .iter()
        .filter_map(|r| {
            r.extraction
                .as_ref()
                .map(|e| (r.path.display().to_string(), &e.offer))
        })
        .collect();

    fs::write(path, offers_csv(&rows)?)?;
    Ok(())
}
