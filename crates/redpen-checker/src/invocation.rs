//! Construction of RedPen command lines.
//!
//! RedPen's option parser is order sensitive: the optional `-c <config>` pair
//! has to come first, followed by `-f <format> -r json <file>`. The version
//! probe is a bare `-version`. Both runs need `JAVA_HOME` in their
//! environment.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use redpen_config::Config;

use crate::error::CheckError;
use crate::format::FormatToken;

/// Environment variable RedPen's launcher reads the Java runtime from.
pub const JAVA_HOME_VAR: &str = "JAVA_HOME";

/// Flag asking RedPen to print its version.
pub const VERSION_FLAG: &str = "-version";

/// Settings describing how to launch RedPen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSettings {
    executable: PathBuf,
    config_file: Option<String>,
    java_home: Option<String>,
}

impl ToolSettings {
    /// Creates settings for the launcher at `executable`.
    #[must_use]
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            config_file: None,
            java_home: None,
        }
    }

    /// Sets the RedPen configuration file; blank values are ignored.
    #[must_use]
    pub fn with_config_file(mut self, config_file: impl Into<String>) -> Self {
        self.config_file = non_blank(config_file.into());
        self
    }

    /// Sets the Java runtime home; blank values are ignored.
    #[must_use]
    pub fn with_java_home(mut self, java_home: impl Into<String>) -> Self {
        self.java_home = non_blank(java_home.into());
        self
    }

    /// Path of the RedPen launcher.
    #[must_use]
    pub fn executable(&self) -> &Path {
        self.executable.as_path()
    }

    /// RedPen configuration file, if one is configured.
    #[must_use]
    pub fn config_file(&self) -> Option<&str> {
        self.config_file.as_deref()
    }

    /// Java runtime home, if one is configured.
    #[must_use]
    pub fn java_home(&self) -> Option<&str> {
        self.java_home.as_deref()
    }

    fn environment(&self) -> Result<BTreeMap<String, String>, CheckError> {
        let java_home = self.java_home().ok_or(CheckError::ConfigMissing)?;
        Ok(BTreeMap::from([(
            JAVA_HOME_VAR.to_owned(),
            java_home.to_owned(),
        )]))
    }
}

impl From<&Config> for ToolSettings {
    fn from(config: &Config) -> Self {
        let mut settings = Self::new(config.redpen_cli_path.as_std_path());
        if let Some(file) = config.redpen_config_file() {
            settings = settings.with_config_file(file);
        }
        if let Some(home) = config.java_home() {
            settings = settings.with_java_home(home);
        }
        settings
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

/// A fully described external process launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    program: PathBuf,
    args: Vec<String>,
    env: BTreeMap<String, String>,
}

impl ToolInvocation {
    /// Creates an invocation from its parts.
    #[must_use]
    pub fn new(
        program: impl Into<PathBuf>,
        args: Vec<String>,
        env: BTreeMap<String, String>,
    ) -> Self {
        Self {
            program: program.into(),
            args,
            env,
        }
    }

    /// Builds the `-version` probe.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::ConfigMissing`] when no `JAVA_HOME` is set.
    pub fn probe(settings: &ToolSettings) -> Result<Self, CheckError> {
        Ok(Self::new(
            settings.executable(),
            vec![VERSION_FLAG.to_owned()],
            settings.environment()?,
        ))
    }

    /// Builds the lint run for `subject` in `format`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::ConfigMissing`] when no `JAVA_HOME` is set.
    pub fn lint(
        settings: &ToolSettings,
        format: FormatToken,
        subject: &Path,
    ) -> Result<Self, CheckError> {
        let mut args = Vec::with_capacity(7);
        if let Some(config_file) = settings.config_file() {
            args.push(String::from("-c"));
            args.push(config_file.to_owned());
        }
        args.extend([
            String::from("-f"),
            format.as_str().to_owned(),
            String::from("-r"),
            String::from("json"),
            subject.to_string_lossy().into_owned(),
        ]);
        Ok(Self::new(settings.executable(), args, settings.environment()?))
    }

    /// Program to execute.
    #[must_use]
    pub fn program(&self) -> &Path {
        self.program.as_path()
    }

    /// Arguments in command-line order.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Variables added to the inherited environment.
    #[must_use]
    pub const fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }
}
