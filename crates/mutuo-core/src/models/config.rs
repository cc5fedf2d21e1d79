//! Configuration structures for offer extraction.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{MutuoError, Result};

/// Main configuration for mutuo.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MutuoConfig {
    /// Text extraction configuration.
    pub extraction: ExtractionConfig,
}

/// Offer text extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Maximum number of characters of raw input considered.
    /// Anything past the cap is dropped before line splitting.
    pub max_input_chars: usize,

    /// Total size of the note fragments, in characters.
    pub notes_budget: usize,

    /// Body lines under a note heading must be longer than this.
    pub min_note_line_chars: usize,

    /// Collect qualitative note fragments at all.
    pub collect_notes: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_input_chars: 100_000,
            notes_budget: 4500,
            min_note_line_chars: 10,
            collect_notes: true,
        }
    }
}

impl ExtractionConfig {
    /// Check that the limits make sense.
    pub fn validate(&self) -> Result<()> {
        if self.max_input_chars == 0 {
            return Err(MutuoError::Config(
                "extraction.max_input_chars must be greater than zero".to_string(),
            ));
        }
        if self.notes_budget == 0 && self.collect_notes {
            return Err(MutuoError::Config(
                "extraction.notes_budget must be greater than zero when notes are collected"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

impl MutuoConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.extraction.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
