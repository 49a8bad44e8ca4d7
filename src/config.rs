use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::profile::ProfileConfig;
use crate::error::{MassError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Report window locations starting at 1 instead of 0.
    #[serde(default = "OutputConfig::default_one_based")]
    pub one_based: bool,
    /// Digits after the decimal point for distances.
    #[serde(default = "OutputConfig::default_precision")]
    pub precision: usize,
}

impl OutputConfig {
    fn default_one_based() -> bool {
        true
    }
    fn default_precision() -> usize {
        6
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            one_based: Self::default_one_based(),
            precision: Self::default_precision(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default `tracing` filter; `RUST_LOG` takes precedence.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_string()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub search: ProfileConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|err| MassError::Config(err.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|err| MassError::Config(err.to_string()))
    }

    /// Load `path`, or defaults when it does not exist.
    ///
    /// A file that exists but cannot be read or parsed is an error rather than
    /// a silent fallback.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .map_err(|err| MassError::Config(format!("failed to read {}: {err}", path.display())))?;
        Self::from_toml_str(&contents)
            .map_err(|err| MassError::Config(format!("{}: {err}", path.display())))
    }

    /// Write the default configuration to `path`.
    pub fn write_default<P: AsRef<Path>>(path: P) -> Result<()> {
        let text = Self::default().to_toml_string()?;
        fs::write(path, text)?;
        Ok(())
    }
}
