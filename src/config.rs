//! Run configuration.
//!
//! A run is fully described by a [`RunConfig`]: the root directory plus the
//! names of the overlay input and output subdirectories. It is built once at
//! startup and passed by reference to every stage; nothing reads paths from
//! ambient state.
//!
//! ## Layout
//!
//! ```text
//! <root>/
//! ├── thumbnail-maker.toml   # Optional overrides (see below)
//! ├── ff1pr0.png             # Base image (natural-sort first image in root)
//! ├── Overlays/              # One output per image in here
//! │   ├── 1.png
//! │   └── 2.png
//! └── Finished/              # Created on demand; ff1pr1.png, ff1pr2.png
//! ```
//!
//! ## Overrides
//!
//! Without a `thumbnail-maker.toml` the defaults below apply. The file is
//! sparse; set only what you need:
//!
//! ```toml
//! overlays_dir = "Overlays"      # Overlay input subdirectory
//! output_dir = "Finished"        # Output subdirectory (created if missing)
//! input_extensions = ["png"]     # Case-insensitive; output is always PNG
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::supported_input_extensions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the optional override file in the root directory.
pub const CONFIG_FILENAME: &str = "thumbnail-maker.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Settings read from `thumbnail-maker.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub overlays_dir: String,
    pub output_dir: String,
    pub input_extensions: Vec<String>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            overlays_dir: "Overlays".to_string(),
            output_dir: "Finished".to_string(),
            input_extensions: vec!["png".to_string()],
        }
    }
}

impl FileConfig {
    /// Validate names and extensions.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, name) in [
            ("overlays_dir", &self.overlays_dir),
            ("output_dir", &self.output_dir),
        ] {
            if name.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
            if Path::new(name).components().count() != 1 || name == ".." || name == "." {
                return Err(ConfigError::Validation(format!(
                    "{key} must be a single directory name, got {name:?}"
                )));
            }
        }
        if self.overlays_dir == self.output_dir {
            return Err(ConfigError::Validation(
                "overlays_dir and output_dir must differ".into(),
            ));
        }
        if self.input_extensions.is_empty() {
            return Err(ConfigError::Validation(
                "input_extensions must not be empty".into(),
            ));
        }
        let supported = supported_input_extensions();
        for ext in &self.input_extensions {
            let ext = ext.trim_start_matches('.').to_ascii_lowercase();
            if !supported.contains(&ext.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "unsupported input extension {ext:?} (supported: {})",
                    supported.join(", ")
                )));
            }
        }
        Ok(())
    }
}

/// Everything a run needs to know about where files live.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub root: PathBuf,
    pub overlays_dir: String,
    pub output_dir: String,
    /// Lowercase, without the leading dot.
    pub input_extensions: Vec<String>,
}

impl RunConfig {
    /// Defaults rooted at `root`: `Overlays/` in, `Finished/` out, PNG only.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::from_file_config(root, FileConfig::default())
    }

    pub fn from_file_config(root: impl Into<PathBuf>, file: FileConfig) -> Self {
        Self {
            root: root.into(),
            overlays_dir: file.overlays_dir,
            output_dir: file.output_dir,
            input_extensions: file
                .input_extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn overlays_path(&self) -> PathBuf {
        self.root.join(&self.overlays_dir)
    }

    pub fn output_path(&self) -> PathBuf {
        self.root.join(&self.output_dir)
    }

    /// Whether `file_name` ends in `.<ext>` for a configured extension,
    /// ignoring case.
    pub fn matches_extension(&self, file_name: &str) -> bool {
        let lower = file_name.to_lowercase();
        self.input_extensions
            .iter()
            .any(|ext| lower.ends_with(&format!(".{ext}")))
    }
}

/// Read `thumbnail-maker.toml` from `root`.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_file_config(root: &Path) -> Result<Option<FileConfig>, ConfigError> {
    let path = root.join(CONFIG_FILENAME);
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&path)?;
    let config: FileConfig = toml::from_str(&content)?;
    Ok(Some(config))
}

/// Build the run configuration for `root`, applying overrides if present.
pub fn load_config(root: &Path) -> Result<RunConfig, ConfigError> {
    let file = load_file_config(root)?.unwrap_or_default();
    file.validate()?;
    Ok(RunConfig::from_file_config(root, file))
}
