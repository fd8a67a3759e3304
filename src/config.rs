//! Configuration for reads and the command-line front end.
//!
//! Debug behaviour is passed explicitly to the reader as a [`DebugConfig`]
//! rather than living in process-wide state.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    #[default]
    Warn,
    /// Show errors, warnings, and info messages
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Get the display name for this log level.
    pub fn name(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// What to do with the pseudo-RGB preview after a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DebugMode {
    /// Nothing
    #[default]
    Disabled,
    /// Hand the preview to the render hook
    Plot,
    /// Write the preview to the output directory
    Print,
}

/// Debug settings for a read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Version of the configuration file format
    #[serde(default = "default_version")]
    pub version: u32,

    /// Preview handling
    #[serde(default)]
    pub mode: DebugMode,

    /// Directory for printed previews
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Prefix for printed preview file names
    #[serde(default)]
    pub device_counter: u32,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            mode: DebugMode::default(),
            output_dir: default_output_dir(),
            device_counter: 0,
        }
    }
}

impl DebugConfig {
    /// Configuration with debugging disabled.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Set the debug mode.
    pub fn with_mode(mut self, mode: DebugMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the output directory for printed previews.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the device counter used to name printed previews.
    pub fn with_device_counter(mut self, counter: u32) -> Self {
        self.device_counter = counter;
        self
    }

    /// Where a printed preview is written: `<output_dir>/<device_counter>_pseudo_rgb.png`.
    pub fn preview_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}_pseudo_rgb.png", self.device_counter))
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        Ok(config)
    }

    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::debug!("Loaded debug configuration from {}", path.display());
        Ok(config)
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        /// Version found in the file
        file_version: u32,
        /// Highest version this build understands
        supported_version: u32,
    },

    /// I/O error when reading config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_disabled() {
        let config = DebugConfig::default();
        assert_eq!(config.mode, DebugMode::Disabled);
        assert_eq!(config.device_counter, 0);
        assert_eq!(config.output_dir, PathBuf::from("."));
    }

    #[test]
    fn test_preview_path() {
        let config = DebugConfig::disabled()
            .with_output_dir("/tmp/debug")
            .with_device_counter(7);
        assert_eq!(
            config.preview_path(),
            PathBuf::from("/tmp/debug/7_pseudo_rgb.png")
        );
    }

    #[test]
    fn test_json_roundtrip() {
        let config = DebugConfig::disabled()
            .with_mode(DebugMode::Print)
            .with_output_dir("out")
            .with_device_counter(3);
        let json = config.to_json().unwrap();
        assert!(json.contains("\"print\""));
        assert_eq!(DebugConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = DebugConfig::from_json(r#"{"mode": "plot"}"#).unwrap();
        assert_eq!(config.mode, DebugMode::Plot);
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.output_dir, PathBuf::from("."));
    }

    #[test]
    fn test_version_too_new() {
        let result = DebugConfig::from_json(r#"{"version": 99}"#);
        assert!(matches!(
            result,
            Err(ConfigError::VersionTooNew {
                file_version: 99,
                ..
            })
        ));
    }

    #[test]
    fn test_log_level_filter() {
        assert_eq!(LogLevel::default().to_level_filter(), log::LevelFilter::Warn);
        assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
        assert_eq!(LogLevel::Debug.name(), "debug");
    }
}
