//! The validation pipeline.
//!
//! A request runs the version probe and format gate, then RedPen itself,
//! then the normaliser. Selection checks and unsaved buffers bracket the
//! RedPen run with a scratch file. Every failure is recovered here and
//! returned as a [`ValidationOutcome`]; user-facing failures are also sent
//! to the [`Notifier`].

use std::path::{Path, PathBuf};

use redpen_config::Config;
use tracing::{debug, info, warn};

use crate::document::Document;
use crate::error::CheckError;
use crate::format::FormatToken;
use crate::invocation::{ToolInvocation, ToolSettings};
use crate::notify::Notifier;
use crate::process::ToolRunner;
use crate::report::{ValidationReport, normalize};
use crate::scratch::with_scratch;
use crate::version::{GateDecision, VersionGate, VersionInfo};

const PIPELINE_TARGET: &str = "redpen_checker::pipeline";

/// Headline shown when RedPen ran but its output was unusable.
pub const CHECK_FAILED_MESSAGE: &str = "RedPen check failed.";

/// Explicit options handed to a [`Checker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckerOptions {
    /// How to launch RedPen.
    pub tool: ToolSettings,
    /// Directory for scratch files; defaults to the document's directory,
    /// then the system temporary directory.
    pub scratch_dir: Option<PathBuf>,
}

impl CheckerOptions {
    /// Creates options for the given tool settings.
    #[must_use]
    pub const fn new(tool: ToolSettings) -> Self {
        Self {
            tool,
            scratch_dir: None,
        }
    }

    /// Overrides the scratch directory.
    #[must_use]
    pub fn with_scratch_dir(mut self, directory: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(directory.into());
        self
    }

    fn scratch_dir_for(&self, document: &Document) -> PathBuf {
        self.scratch_dir
            .clone()
            .or_else(|| {
                document
                    .path()
                    .and_then(Path::parent)
                    .filter(|parent| !parent.as_os_str().is_empty())
                    .map(Path::to_path_buf)
            })
            .unwrap_or_else(std::env::temp_dir)
    }
}

impl From<&Config> for CheckerOptions {
    fn from(config: &Config) -> Self {
        Self::new(ToolSettings::from(config))
    }
}

/// Why a request ended without running RedPen and without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The installed RedPen cannot check this format.
    UnsupportedFormat {
        /// Format of the document.
        format: FormatToken,
        /// Installed RedPen version.
        version: VersionInfo,
    },
    /// The document has no syntax identifier.
    UnknownSyntax,
}

/// Result of one validation request.
#[derive(Debug)]
pub enum ValidationOutcome {
    /// RedPen ran and its report was read.
    Completed(ValidationReport),
    /// The request was gated out; nothing is shown.
    Skipped(SkipReason),
    /// The request stopped before RedPen ran; the user was notified.
    Aborted(CheckError),
    /// RedPen could not run or its output was unusable; the user was
    /// notified and the report surface shows the failure.
    Failed {
        /// Label of what was being checked.
        subject_label: String,
        /// What went wrong.
        error: CheckError,
    },
}

impl ValidationOutcome {
    /// The report, when RedPen completed.
    #[must_use]
    pub const fn report(&self) -> Option<&ValidationReport> {
        match self {
            Self::Completed(report) => Some(report),
            _ => None,
        }
    }

    /// Returns whether the request found nothing to complain about.
    ///
    /// Skipped requests count as clean; aborted and failed ones do not.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        match self {
            Self::Completed(report) => report.is_success(),
            Self::Skipped(_) => true,
            Self::Aborted(_) | Self::Failed { .. } => false,
        }
    }
}

/// Runs validation requests against RedPen.
///
/// Methods take `&self`, so a host may keep several requests in flight; each
/// request owns its own scratch file.
#[derive(Debug)]
pub struct Checker<R, N> {
    options: CheckerOptions,
    runner: R,
    notifier: N,
}

impl<R, N> Checker<R, N> {
    /// Creates a checker.
    #[must_use]
    pub const fn new(options: CheckerOptions, runner: R, notifier: N) -> Self {
        Self {
            options,
            runner,
            notifier,
        }
    }

    /// Options the checker was created with.
    #[must_use]
    pub const fn options(&self) -> &CheckerOptions {
        &self.options
    }

    /// The process runner.
    #[must_use]
    pub const fn runner(&self) -> &R {
        &self.runner
    }

    /// The notification sink.
    #[must_use]
    pub const fn notifier(&self) -> &N {
        &self.notifier
    }
}

impl<R: ToolRunner, N: Notifier> Checker<R, N> {
    /// Validates the whole document.
    ///
    /// Saved documents are checked in place. Unsaved buffers are written to a
    /// scratch file first.
    pub async fn validate_document(&self, document: &Document) -> ValidationOutcome {
        let format = match self.gate(document).await {
            Ok(format) => format,
            Err(outcome) => return outcome,
        };
        let subject_label = document.title().to_owned();
        let label = subject_label.as_str();
        let result = match document.path() {
            Some(path) => self.lint(format, path, label, 0).await,
            None => {
                let directory = self.options.scratch_dir_for(document);
                with_scratch(document.text(), &directory, None, |scratch| async move {
                    self.lint(format, &scratch, label, 0).await
                })
                .await
            }
        };
        self.finish(subject_label, result)
    }

    /// Validates only the selected text.
    ///
    /// Reported lines are shifted by the selection's first line so they
    /// point into the full document.
    pub async fn validate_selection(&self, document: &Document) -> ValidationOutcome {
        let (Some(selection), Some(text)) = (document.selection(), document.selected_text())
        else {
            return self.abort(CheckError::EmptySelection {
                title: document.title().to_owned(),
            });
        };
        let format = match self.gate(document).await {
            Ok(format) => format,
            Err(outcome) => return outcome,
        };

        let first_line = selection.start.line;
        let last_line = if selection.end.character == 0 && selection.end.line > first_line {
            selection.end.line - 1
        } else {
            selection.end.line
        };
        let subject_label = format!(
            "selection of {} (lines {}-{})",
            document.title(),
            first_line + 1,
            last_line + 1
        );
        let line_offset = u32::try_from(first_line).unwrap_or(u32::MAX);
        let directory = self.options.scratch_dir_for(document);
        let extension = document.extension();
        let label = subject_label.as_str();
        let result = with_scratch(&text, &directory, extension.as_deref(), |scratch| async move {
            self.lint(format, &scratch, label, line_offset).await
        })
        .await;
        self.finish(subject_label, result)
    }

    /// Probes RedPen and returns the format to check the document in.
    async fn gate(&self, document: &Document) -> Result<FormatToken, ValidationOutcome> {
        let gate = VersionGate::new(&self.runner, &self.options.tool);
        match gate.check(document).await {
            Ok(GateDecision::Accepted { format, .. }) => Ok(format),
            Ok(GateDecision::UnsupportedFormat { format, version }) => {
                debug!(
                    target: PIPELINE_TARGET,
                    document = %document.title(),
                    %format,
                    %version,
                    "format not supported by installed RedPen, skipping"
                );
                Err(ValidationOutcome::Skipped(SkipReason::UnsupportedFormat {
                    format,
                    version,
                }))
            }
            Ok(GateDecision::UnknownSyntax) => {
                debug!(
                    target: PIPELINE_TARGET,
                    document = %document.title(),
                    "document has no syntax identifier, skipping"
                );
                Err(ValidationOutcome::Skipped(SkipReason::UnknownSyntax))
            }
            Err(error) => Err(self.abort(error)),
        }
    }

    async fn lint(
        &self,
        format: FormatToken,
        subject: &Path,
        subject_label: &str,
        line_offset: u32,
    ) -> Result<ValidationReport, CheckError> {
        let invocation = ToolInvocation::lint(&self.options.tool, format, subject)?;
        let result = self.runner.run(invocation).await?;
        if !result.stderr.trim().is_empty() {
            debug!(
                target: PIPELINE_TARGET,
                stderr = %result.stderr.trim(),
                "RedPen stderr output"
            );
        }
        Ok(normalize(
            subject_label,
            &result.stdout,
            &result.stderr,
            line_offset,
        )?)
    }

    fn abort(&self, error: CheckError) -> ValidationOutcome {
        warn!(target: PIPELINE_TARGET, %error, "validation aborted");
        self.notifier.error(&error.to_string(), error.stderr());
        ValidationOutcome::Aborted(error)
    }

    fn finish(
        &self,
        subject_label: String,
        result: Result<ValidationReport, CheckError>,
    ) -> ValidationOutcome {
        match result {
            Ok(report) => {
                info!(
                    target: PIPELINE_TARGET,
                    subject = %report.subject_label,
                    diagnostics = report.diagnostics.len(),
                    "RedPen check finished"
                );
                ValidationOutcome::Completed(report)
            }
            Err(error @ CheckError::ConfigMissing) => self.abort(error),
            Err(error) => {
                warn!(target: PIPELINE_TARGET, subject = %subject_label, %error, "RedPen check failed");
                let detail = error.stderr().map_or_else(|| error.to_string(), str::to_owned);
                self.notifier.error(CHECK_FAILED_MESSAGE, Some(&detail));
                ValidationOutcome::Failed {
                    subject_label,
                    error,
                }
            }
        }
    }
}
