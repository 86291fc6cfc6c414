//! Domain errors raised while checking documents with RedPen.
//!
//! All errors use `thiserror`-derived enums with structured context so hosts
//! can decide what to notify. I/O errors are wrapped in `Arc` so errors can
//! be cloned into every notification and dispatch record.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Errors arising from the validation pipeline.
#[derive(Debug, Clone, Error)]
pub enum CheckError {
    /// No Java runtime home is configured, so RedPen cannot be launched.
    #[error("RedPen requires JAVA_HOME; set `java_home` in the checker settings")]
    ConfigMissing,

    /// The `-version` probe exited with a non-zero status.
    #[error("RedPen version check failed with status {status}")]
    ProbeFailed {
        /// Exit status reported by the probe.
        status: i32,
        /// Captured standard error of the probe.
        stderr: String,
    },

    /// The `-version` probe succeeded but printed nothing.
    #[error("RedPen version check produced no output")]
    EmptyProbeOutput,

    /// The probe output is not a dotted version string.
    #[error("could not read a RedPen version from '{raw}'")]
    VersionParse {
        /// Trimmed probe output.
        raw: String,
    },

    /// The external tool could not be launched.
    #[error("failed to launch '{program}': {source}")]
    Spawn {
        /// Program that was executed.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The lint run produced output the normaliser could not interpret.
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// A scratch file could not be created, written, or removed.
    #[error("scratch file error in '{}': {source}", directory.display())]
    Scratch {
        /// Directory the scratch file lives in.
        directory: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// Selection mode was requested for a document without a selection.
    #[error("no text is selected in '{title}'")]
    EmptySelection {
        /// Title of the document.
        title: String,
    },
}

impl CheckError {
    /// Captured standard error worth showing alongside the message.
    #[must_use]
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Self::ProbeFailed { stderr, .. } | Self::Tool(ToolError::Unparseable { stderr, .. }) => {
                Some(stderr.as_str()).filter(|text| !text.trim().is_empty())
            }
            _ => None,
        }
    }
}

/// Errors raised while interpreting RedPen's JSON report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    /// Standard output is not the expected JSON report.
    #[error("RedPen output could not be parsed: {reason}")]
    Unparseable {
        /// What was wrong with the output.
        reason: String,
        /// Captured standard error of the run, kept for diagnosis.
        stderr: String,
    },
}
