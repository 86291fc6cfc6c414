//! Shared configuration for the RedPen checker.
//!
//! [`Config`] is assembled by `ortho_config` from built-in defaults, an
//! optional configuration file (`--config-path`), `REDPEN_CHECK_*`
//! environment variables, and command-line flags, in increasing order of
//! precedence. The fields mirror the settings an editor host exposes for the
//! checker: where RedPen lives, which RedPen configuration to apply, which
//! Java runtime to launch it with, and when to validate automatically.

mod defaults;
mod logging;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_LOG_FILTER, DEFAULT_REDPEN_CLI_PATH, default_log_filter_string, default_log_format,
    default_redpen_cli_path,
};
pub use logging::LogFormat;

/// Resolved checker configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "REDPEN_CHECK")]
pub struct Config {
    /// Path of the RedPen command line launcher.
    #[serde(default = "default_redpen_cli_path")]
    #[ortho_config(default = default_redpen_cli_path())]
    pub redpen_cli_path: Utf8PathBuf,
    /// RedPen configuration XML passed as `-c` when not blank.
    #[serde(default)]
    #[ortho_config(default = String::new())]
    pub redpen_config_file: String,
    /// Java runtime home exported to RedPen as `JAVA_HOME`.
    #[serde(default)]
    pub java_home: Option<String>,
    /// Validate documents whenever the host saves them.
    ///
    /// Set from the configuration file or `REDPEN_CHECK_VALIDATE_ON_SAVE`.
    #[serde(default)]
    #[ortho_config(default = false, skip_cli)]
    pub validate_on_save: bool,
    /// File extensions eligible for save-triggered validation.
    #[serde(default)]
    #[ortho_config(merge_strategy = "append")]
    pub validate_extensions: Vec<String>,
    /// Tracing filter directive.
    #[serde(default = "default_log_filter_string")]
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Log output format.
    #[serde(default = "default_log_format")]
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            redpen_cli_path: default_redpen_cli_path(),
            redpen_config_file: String::new(),
            java_home: None,
            validate_on_save: false,
            validate_extensions: Vec::new(),
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Tracing filter directive for the binary.
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Log output format for the binary.
    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Returns the configured `JAVA_HOME`, ignoring blank values.
    pub fn java_home(&self) -> Option<&str> {
        self.java_home
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    /// Returns the RedPen configuration file, ignoring blank values.
    pub fn redpen_config_file(&self) -> Option<&str> {
        Some(self.redpen_config_file.trim()).filter(|value| !value.is_empty())
    }
}
