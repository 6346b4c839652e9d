//! Configuration for the space-model CLI
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (space-model.toml)
//! - Environment variables (SPACE_MODEL__*)
//!
//! ## Example config file (space-model.toml):
//! ```toml
//! [source]
//! path = "model.avsc"
//!
//! [output]
//! format = "dot"
//!
//! [diagnostics]
//! report_unresolved = true
//! strict = false
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

/// Where the schema source lives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Schema source used when no path is given on the command line
    #[serde(default = "default_source_path")]
    pub path: PathBuf,
}

/// Output settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

/// Rendering used by `show`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Dot,
}

/// Unresolved reference reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticsConfig {
    /// Print unresolved references after loading
    #[serde(default = "default_true")]
    pub report_unresolved: bool,

    /// Exit with an error when any reference is unresolved
    #[serde(default)]
    pub strict: bool,
}

fn default_source_path() -> PathBuf {
    PathBuf::from("model.avsc")
}

fn default_true() -> bool {
    true
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: default_source_path(),
        }
    }
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            report_unresolved: true,
            strict: false,
        }
    }
}

impl ModelConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, layering an explicit file over the defaults
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = [
            "space-model.toml",
            ".space-model.toml",
            "config/space-model.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(config_dir) = directories::ProjectDirs::from("dev", "familiar", "space-model") {
            let xdg_config = config_dir.config_dir().join("space-model.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // SPACE_MODEL__SOURCE__PATH, SPACE_MODEL__DIAGNOSTICS__STRICT, ...
        builder = builder.add_source(
            Environment::with_prefix("SPACE_MODEL")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }
}
