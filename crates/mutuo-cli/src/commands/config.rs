//! Config command - inspect and edit the extraction settings file.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::{Args, Subcommand};
use console::style;
use tracing::debug;

use mutuo_core::{ExtractionConfig, MutuoConfig};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Write a configuration file with default settings
    Init(InitArgs),

    /// Print one setting (e.g. "extraction.notes_budget")
    Get { key: Setting },

    /// Change one setting, rejecting values the extractor cannot run with
    Set { key: Setting, value: String },

    /// Show which configuration file is in use
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Output path (default: --config, else the user config directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite existing file
    #[arg(long)]
    force: bool,
}

/// An extraction setting addressable from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Setting {
    MaxInputChars,
    NotesBudget,
    MinNoteLineChars,
    CollectNotes,
}

impl Setting {
    const ALL: [Setting; 4] = [
        Setting::MaxInputChars,
        Setting::NotesBudget,
        Setting::MinNoteLineChars,
        Setting::CollectNotes,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Setting::MaxInputChars => "extraction.max_input_chars",
            Setting::NotesBudget => "extraction.notes_budget",
            Setting::MinNoteLineChars => "extraction.min_note_line_chars",
            Setting::CollectNotes => "extraction.collect_notes",
        }
    }

    fn read(self, config: &ExtractionConfig) -> String {
        match self {
            Setting::MaxInputChars => config.max_input_chars.to_string(),
            Setting::NotesBudget => config.notes_budget.to_string(),
            Setting::MinNoteLineChars => config.min_note_line_chars.to_string(),
            Setting::CollectNotes => config.collect_notes.to_string(),
        }
    }

    fn write(self, config: &mut ExtractionConfig, raw: &str) -> anyhow::Result<()> {
        let raw = raw.trim();
        let chars = || {
            raw.parse::<usize>().map_err(|_| {
                anyhow::anyhow!("{} expects a character count, got '{}'", self.key(), raw)
            })
        };

        match self {
            Setting::MaxInputChars => config.max_input_chars = chars()?,
            Setting::NotesBudget => config.notes_budget = chars()?,
            Setting::MinNoteLineChars => config.min_note_line_chars = chars()?,
            Setting::CollectNotes => {
                config.collect_notes = raw.parse::<bool>().map_err(|_| {
                    anyhow::anyhow!("{} expects true or false, got '{}'", self.key(), raw)
                })?
            }
        }
        Ok(())
    }
}

impl FromStr for Setting {
    type Err = String;

    /// Accepts the full dotted key or just the field name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.strip_prefix("extraction.").unwrap_or(s);
        Setting::ALL
            .into_iter()
            .find(|setting| setting.key().ends_with(&format!(".{}", name)))
            .ok_or_else(|| {
                let keys: Vec<&str> = Setting::ALL.iter().map(|s| s.key()).collect();
                format!("unknown setting '{}' (expected one of: {})", s, keys.join(", "))
            })
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

pub fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(config_path),
        ConfigCommand::Init(init_args) => init_config(init_args, config_path),
        ConfigCommand::Get { key } => get_config(key, config_path),
        ConfigCommand::Set { key, value } => set_config(key, &value, config_path),
        ConfigCommand::Path => show_path(config_path),
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mutuo")
        .join("config.json")
}

/// The file `--config` names, else the per-user default.
fn config_file(config_path: Option<&str>) -> PathBuf {
    config_path.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load the config given on the command line, else the default file, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<MutuoConfig> {
    if let Some(path) = config_path {
        debug!("Loading config from {}", path);
        return Ok(MutuoConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Loading config from {}", default_path.display());
        Ok(MutuoConfig::from_file(&default_path)?)
    } else {
        Ok(MutuoConfig::default())
    }
}

fn show_config(config_path: Option<&str>) -> anyhow::Result<()> {
    let path = config_file(config_path);
    if !path.exists() && config_path.is_none() {
        eprintln!(
            "{} No config file at {}, showing defaults.",
            style("ℹ").blue(),
            path.display()
        );
    }

    let config = load_config(config_path)?;
    println!("{}", serde_json::to_string_pretty(&config)?);

    Ok(())
}

fn init_config(args: InitArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let output_path = args.output.unwrap_or_else(|| config_file(config_path));

    if output_path.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            output_path.display()
        );
    }

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    MutuoConfig::default().save(&output_path)?;

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        output_path.display()
    );

    Ok(())
}

fn get_config(setting: Setting, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    println!("{}", setting.read(&config.extraction));

    Ok(())
}

fn set_config(setting: Setting, value: &str, config_path: Option<&str>) -> anyhow::Result<()> {
    let path = config_file(config_path);

    let mut config = if path.exists() {
        MutuoConfig::from_file(&path)?
    } else {
        MutuoConfig::default()
    };

    setting.write(&mut config.extraction, value)?;
    // Nothing is written when the new value leaves the extractor unusable
    config.extraction.validate()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    config.save(&path)?;

    println!(
        "{} Set {} = {} in {}",
        style("✓").green(),
        setting,
        setting.read(&config.extraction),
        path.display()
    );

    Ok(())
}

fn show_path(config_path: Option<&str>) -> anyhow::Result<()> {
    let path = config_file(config_path);

    println!("Configuration file: {}", path.display());

    if path.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!();
        println!("Run 'mutuo config init' to create it.");
    }

    Ok(())
}
