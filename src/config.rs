use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::clean::CleaningRules;

/// Optional settings file, looked up in the working directory.
pub const CONFIG_FILE: &str = "data-analysis-tool.json";

/// Column names and file expectations the tool works with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub status_column: String,
    pub disqualifying_value: String,
    /// Numeric column summarised by the inspection tables.
    pub score_column: String,
    /// Categorical column the inspection tables are grouped by.
    pub group_column: String,
    /// Categorical column counted by the violation chart.
    pub violation_column: String,
    /// Source file name the violation chart requires.
    pub violations_file: String,
    /// Source file name shown when the inspection columns are missing.
    pub inspections_file: String,
    /// Directory holding the session snapshot.
    pub snapshot_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            status_column: "PROGRAM STATUS".to_owned(),
            disqualifying_value: "INACTIVE".to_owned(),
            score_column: "SCORE".to_owned(),
            group_column: "FACILITY CITY".to_owned(),
            violation_column: "VIOLATION CODE".to_owned(),
            violations_file: "Violations.csv".to_owned(),
            inspections_file: "Inspections.csv".to_owned(),
            snapshot_dir: PathBuf::from("."),
        }
    }
}

impl AppConfig {
    pub fn cleaning_rules(&self) -> CleaningRules {
        CleaningRules {
            status_column: self.status_column.clone(),
            disqualifying_value: self.disqualifying_value.clone(),
        }
    }

    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    /// Settings from `path` if present, defaults otherwise. A malformed file
    /// is reported and ignored.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::read(path) {
            Ok(config) => {
                log::info!("loaded settings from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("using default settings: {e:#}");
                Self::default()
            }
        }
    }
}
