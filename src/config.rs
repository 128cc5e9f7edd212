use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or saving configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Configuration for a scan run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Input source configuration
    #[serde(default)]
    pub input: InputConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Input source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Path to the auth log to scan
    pub file_path: Option<PathBuf>,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output format: "json", "jsonl", or "console"
    #[serde(default = "default_format")]
    pub format: String,
    /// Report file path, stdout when absent
    pub file_path: Option<PathBuf>,
    /// Directory for failed_logins.json / successful_logins.json
    pub split_dir: Option<PathBuf>,
}

fn default_format() -> String {
    "json".to_string()
}

impl Default for InputConfig {
    fn default() -> Self {
        InputConfig {
            file_path: Some(PathBuf::from("/var/log/auth.log")),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            format: default_format(),
            file_path: None,
            split_dir: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn to_file(&self, path: &PathBuf) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}
