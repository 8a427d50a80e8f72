//! Configuration management and validation.
//!
//! Provides the layered configuration used by every command: built-in
//! defaults, an optional JSON configuration file, environment overrides and
//! finally command-line overrides applied by the CLI layer.

use crate::constants::{
    APP_NAME, CODE_LIST_FILE, CONFIG_FILE_NAME, DEDUPLICATED_FILE, DEFAULT_COEFFICIENT_PLACEHOLDER,
    DEFAULT_EXPORT_DIR, DEFAULT_HEADER_SCAN_ROWS, DEFAULT_INPUT_DIR, DEFAULT_INPUT_EXTENSIONS,
    DEFAULT_JSON_OUT_DIR, DEFAULT_MERGED_DIR, DEFAULT_PROFILE_DIR, DEFAULT_SELF_CHECK_PROFILE,
    DUPLICATES_REPORT_FILE, ENV_INPUT_DIR, ENV_OUTPUT_DIR, MERGED_FILE, NAME_LIST_FILE,
    PROFILE_LIST_FILE, PROFILE_REFERENCE_FILE, RENAME_REPORT_FILE,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Top-level configuration for connection table processing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory layout for the staged pipeline
    pub paths: PathConfig,

    /// File names written inside those directories
    pub files: FileNames,

    /// Behaviour of the resolution and deduplication passes
    pub processing: ProcessingConfig,
}

/// Directory layout, relative paths resolve against the working directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// Source tables
    pub input_dir: PathBuf,
    /// Profile reference table
    pub profile_dir: PathBuf,
    /// One JSON file per converted table
    pub json_out_dir: PathBuf,
    /// Merged dataset, deduplicated dataset and audit reports
    pub merged_dir: PathBuf,
    /// Sorted profile / code / name lists
    pub export_dir: PathBuf,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            profile_dir: PathBuf::from(DEFAULT_PROFILE_DIR),
            json_out_dir: PathBuf::from(DEFAULT_JSON_OUT_DIR),
            merged_dir: PathBuf::from(DEFAULT_MERGED_DIR),
            export_dir: PathBuf::from(DEFAULT_EXPORT_DIR),
        }
    }
}

/// Output and reference file names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileNames {
    pub profile_reference: String,
    pub merged: String,
    pub deduplicated: String,
    pub rename_report: String,
    pub duplicates_report: String,
    pub profile_list: String,
    pub code_list: String,
    pub name_list: String,
}

impl Default for FileNames {
    fn default() -> Self {
        Self {
            profile_reference: PROFILE_REFERENCE_FILE.to_string(),
            merged: MERGED_FILE.to_string(),
            deduplicated: DEDUPLICATED_FILE.to_string(),
            rename_report: RENAME_REPORT_FILE.to_string(),
            duplicates_report: DUPLICATES_REPORT_FILE.to_string(),
            profile_list: PROFILE_LIST_FILE.to_string(),
            code_list: CODE_LIST_FILE.to_string(),
            name_list: NAME_LIST_FILE.to_string(),
        }
    }
}

/// Processing behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Rows scanned from the top of a table while looking for its header
    pub header_scan_rows: usize,

    /// Header token Greek coefficient labels degrade into
    pub coefficient_placeholder: String,

    /// Profile designation resolved after loading the lookup as a sanity check
    pub self_check_profile: String,

    /// Table extensions picked up from the input directory (without the dot)
    pub input_extensions: Vec<String>,

    /// Show progress bars for long passes
    pub show_progress: bool,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            header_scan_rows: DEFAULT_HEADER_SCAN_ROWS,
            coefficient_placeholder: DEFAULT_COEFFICIENT_PLACEHOLDER.to_string(),
            self_check_profile: DEFAULT_SELF_CHECK_PROFILE.to_string(),
            input_extensions: DEFAULT_INPUT_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            show_progress: true,
        }
    }
}

impl Config {
    /// Default configuration file location (`<config dir>/connection-processor/config.json`)
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            Error::configuration("Could not determine user configuration directory")
        })?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load configuration from a JSON file; missing keys fall back to defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::file_not_found(path));
        }

        let text = fs::read_to_string(path)
            .map_err(|e| Error::io(format!("Failed to read config {}", path.display()), e))?;
        let config: Config = serde_json::from_str(&text)
            .map_err(|e| Error::json(format!("Invalid config {}", path.display()), e))?;

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load configuration using layered approach (defaults -> file -> env)
    ///
    /// CLI overrides are applied afterwards by the command layer.
    pub fn load_layered(config_file: Option<&Path>) -> Result<Self> {
        let mut config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        if let Ok(input) = std::env::var(ENV_INPUT_DIR) {
            if !input.trim().is_empty() {
                debug!("Input directory overridden by {}: {}", ENV_INPUT_DIR, input);
                self.paths.input_dir = PathBuf::from(input);
            }
        }
        if let Ok(output) = std::env::var(ENV_OUTPUT_DIR) {
            if !output.trim().is_empty() {
                debug!("JSON output directory overridden by {}: {}", ENV_OUTPUT_DIR, output);
                self.paths.json_out_dir = PathBuf::from(output);
            }
        }
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<()> {
        if self.processing.header_scan_rows == 0 {
            return Err(Error::configuration(
                "header_scan_rows must be greater than 0",
            ));
        }

        if self.processing.coefficient_placeholder.trim().is_empty() {
            return Err(Error::configuration(
                "coefficient_placeholder must not be blank",
            ));
        }

        let names = [
            ("profile_reference", &self.files.profile_reference),
            ("merged", &self.files.merged),
            ("deduplicated", &self.files.deduplicated),
            ("rename_report", &self.files.rename_report),
            ("duplicates_report", &self.files.duplicates_report),
            ("profile_list", &self.files.profile_list),
            ("code_list", &self.files.code_list),
            ("name_list", &self.files.name_list),
        ];
        for (key, value) in names {
            if value.trim().is_empty() {
                return Err(Error::configuration(format!(
                    "files.{key} must not be empty"
                )));
            }
        }

        if self.files.merged == self.files.deduplicated {
            return Err(Error::configuration(
                "files.deduplicated must differ from files.merged",
            ));
        }

        Ok(())
    }

    /// Path of the profile reference JSON
    pub fn profile_reference_path(&self) -> PathBuf {
        self.paths.profile_dir.join(&self.files.profile_reference)
    }

    /// Path of the merged dataset
    pub fn merged_path(&self) -> PathBuf {
        self.paths.merged_dir.join(&self.files.merged)
    }

    /// Path of the deduplicated dataset
    pub fn deduplicated_path(&self) -> PathBuf {
        self.paths.merged_dir.join(&self.files.deduplicated)
    }

    /// Path of the rename report
    pub fn rename_report_path(&self) -> PathBuf {
        self.paths.merged_dir.join(&self.files.rename_report)
    }

    /// Path of the duplicate code list
    pub fn duplicates_report_path(&self) -> PathBuf {
        self.paths.merged_dir.join(&self.files.duplicates_report)
    }

    /// Set the input directory
    pub fn with_input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.paths.input_dir = dir.into();
        self
    }

    /// Set the JSON output directory
    pub fn with_json_out_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.paths.json_out_dir = dir.into();
        self
    }

    /// Root every directory under `root`, keeping the default layout
    pub fn rooted_at(mut self, root: &Path) -> Self {
        self.paths.input_dir = root.join(&self.paths.input_dir);
        self.paths.profile_dir = root.join(&self.paths.profile_dir);
        self.paths.json_out_dir = root.join(&self.paths.json_out_dir);
        self.paths.merged_dir = root.join(&self.paths.merged_dir);
        self.paths.export_dir = root.join(&self.paths.export_dir);
        self
    }

    /// Disable progress bars
    pub fn without_progress(mut self) -> Self {
        self.processing.show_progress = false;
        self
    }
}
