use camino::Utf8PathBuf;

use crate::logging::LogFormat;

/// Location the RedPen distribution installs its launcher script to.
pub const DEFAULT_REDPEN_CLI_PATH: &str = "/usr/local/redpen/bin/redpen";

/// Default log filter expression used by the binary.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default path of the RedPen command line tool.
pub fn default_redpen_cli_path() -> Utf8PathBuf {
    Utf8PathBuf::from(DEFAULT_REDPEN_CLI_PATH)
}

/// Owned log filter value used where allocation is required (e.g. serde).
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

/// Default logging format for the binary.
pub fn default_log_format() -> LogFormat {
    LogFormat::Compact
}
