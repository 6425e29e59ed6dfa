//! CLI configuration and settings management

use crate::{CliError, Result};
use clap::ValueEnum;
use fx_core::{PreprocessorConfig, Vendor};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const LOCAL_CONFIG_FILE: &str = "glslfx.toml";

/// How `fx normalize` prints the diagnostic log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One `file:line severity ref: message` line per entry
    #[default]
    Plain,
    /// The whole log as a JSON array
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub preprocessor: PreprocessorConfig,
    pub normalize: NormalizeConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Grammar used when `--vendor` is not given
    pub vendor: Vendor,
    pub format: OutputFormat,
}

impl CliConfig {
    /// Load configuration from file, falling back to defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local = Path::new(LOCAL_CONFIG_FILE);
        if local.exists() {
            return Self::load_from_file(local);
        }
        if let Some(path) = Self::default_config_path().filter(|path| path.exists()) {
            return Self::load_from_file(&path);
        }
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        toml::from_str(&content).map_err(|e| {
            CliError::Config(format!("Failed to parse config file {}: {}", path.display(), e))
        })
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CliError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        std::fs::write(path, content)
            .map_err(|e| CliError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Preprocessor settings with `GLSLFX_*` environment overrides on top.
    pub fn preprocessor_config(&self) -> PreprocessorConfig {
        self.preprocessor.clone().apply_env()
    }

    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("glslfx").join("config.toml"))
    }
}
