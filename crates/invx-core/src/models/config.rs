//! Configuration structures for the extraction pipeline.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{InvxError, Result};
use crate::invoice::rules::{RuleSpec, MODEL_END_MARKER, MODEL_START_MARKER};

/// Main configuration for the invx pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InvxConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Batch processing configuration.
    pub batch: BatchConfig,

    /// Output configuration.
    pub output: OutputConfig,
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Marker that opens the line-item block holding the model.
    pub model_start_marker: String,

    /// Marker that closes the line-item block.
    pub model_end_marker: String,

    /// Custom pattern set replacing the built-in template rules.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<RuleSpec>>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            model_start_marker: MODEL_START_MARKER.to_string(),
            model_end_marker: MODEL_END_MARKER.to_string(),
            rules: None,
        }
    }
}

/// Batch processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Number of parallel workers.
    pub jobs: usize,

    /// Per-document timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            jobs: 4,
            timeout_secs: 60,
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default CSV file name.
    pub file_name: String,

    /// Keep the staging directory after the output is written.
    pub keep_staging: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file_name: "invoices.csv".to_string(),
            keep_staging: false,
        }
    }
}

impl InvxConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| InvxError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| InvxError::Config(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }
}
