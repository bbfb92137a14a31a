//! Run configuration and persisted settings.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::models::invoice::DateField;
use crate::processor::paths::{absolute_clean, same_dir};

/// Default input directory name next to the executable.
pub const DEFAULT_INPUT_DIR: &str = "input";

/// Default output directory name next to the executable.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

const SETTINGS_TEMP_SUFFIX: &str = ".tmp";

/// Configuration for a single run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Directory scanned for PDFs and ZIP archives.
    pub input_dir: PathBuf,

    /// Directory receiving renamed copies.
    pub output_dir: PathBuf,

    /// Date used in the output name.
    pub date_field: DateField,
}

impl RunConfig {
    pub fn new(
        input_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        date_field: DateField,
    ) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            date_field,
        }
    }

    /// Validate and resolve both directories to absolute, cleaned paths.
    pub fn normalized(&self) -> Result<Self, ConfigError> {
        if is_blank(&self.input_dir) {
            return Err(ConfigError::EmptyInputDir);
        }
        if is_blank(&self.output_dir) {
            return Err(ConfigError::EmptyOutputDir);
        }

        let input_dir = absolute_clean(&self.input_dir, "input")?;
        let output_dir = absolute_clean(&self.output_dir, "output")?;
        if same_dir(&input_dir, &output_dir) {
            return Err(ConfigError::SameDirectory);
        }

        Ok(Self {
            input_dir,
            output_dir,
            date_field: self.date_field,
        })
    }
}

fn is_blank(path: &Path) -> bool {
    path.to_string_lossy().trim().is_empty()
}

/// Settings remembered between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub input_dir: PathBuf,

    pub output_dir: PathBuf,

    #[serde(default)]
    pub date_field: DateField,
}

impl Settings {
    /// Defaults rooted at `base` (normally the executable's directory).
    pub fn default_for_dir(base: &Path) -> Self {
        Self {
            input_dir: base.join(DEFAULT_INPUT_DIR),
            output_dir: base.join(DEFAULT_OUTPUT_DIR),
            date_field: DateField::default(),
        }
    }

    /// Load settings from a JSON file; `Ok(None)` when the file does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ConfigError::SettingsRead(e)),
        };
        let settings: Self = serde_json::from_str(&content)
            .map_err(|e| ConfigError::SettingsInvalid(e.to_string()))?;
        settings.normalized().map(Some)
    }

    /// Write settings atomically: a sibling temp file is renamed over `path`.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let normalized = self.normalized()?;
        let mut content = serde_json::to_string_pretty(&normalized)
            .map_err(|e| ConfigError::SettingsInvalid(e.to_string()))?;
        content.push('\n');

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(ConfigError::SettingsWrite)?;
        }
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(SETTINGS_TEMP_SUFFIX);
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, content).map_err(ConfigError::SettingsWrite)?;
        fs::rename(&tmp, path).map_err(ConfigError::SettingsWrite)?;
        debug!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Convert to a run configuration.
    pub fn to_run_config(&self) -> RunConfig {
        RunConfig::new(&self.input_dir, &self.output_dir, self.date_field)
    }

    fn normalized(&self) -> Result<Self, ConfigError> {
        if is_blank(&self.input_dir) || is_blank(&self.output_dir) {
            return Err(ConfigError::SettingsInvalid(
                "settings are missing inputDir/outputDir".to_string(),
            ));
        }
        Ok(Self {
            input_dir: absolute_clean(&self.input_dir, "input")?,
            output_dir: absolute_clean(&self.output_dir, "output")?,
            date_field: self.date_field,
        })
    }
}
