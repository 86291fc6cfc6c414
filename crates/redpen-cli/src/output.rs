//! Rendering of check results for humans and machines.
//!
//! Human output prints the report panel the way an editor would show it and
//! sends notifications to stderr. JSON output emits one object describing
//! the run, including the panel contents and any notifications.

use std::io::Write;

use clap::ValueEnum;
use redpen_checker::{
    Dispatch, Notification, ReportPanel, SkipReason,
    ValidationOutcome, ValidationReport,
};
use serde::Serialize;

use crate::errors::AppError;

/// Output format selection for check results.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Selects `human` for terminal output and `json` for redirected output.
    #[default]
    Auto,
    /// Always render the report panel as text.
    Human,
    /// Always emit a JSON object.
    Json,
}

/// Output format after resolving `auto` based on TTY detection.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResolvedOutputFormat {
    /// Panel text.
    Human,
    /// JSON object.
    Json,
}

impl OutputFormat {
    /// Resolves the output format based on whether stdout is a terminal.
    #[must_use]
    pub const fn resolve(self, stdout_is_terminal: bool) -> ResolvedOutputFormat {
        match self {
            Self::Auto if stdout_is_terminal => ResolvedOutputFormat::Human,
            Self::Auto | Self::Json => ResolvedOutputFormat::Json,
            Self::Human => ResolvedOutputFormat::Human,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
enum RunStatus {
    Completed,
    Skipped,
    Aborted,
    Failed,
    Ignored,
}

/// Everything a single CLI run produced.
pub(crate) struct RunReport<'a> {
    pub(crate) command: &'a str,
    pub(crate) file: &'a str,
    /// `None` when the save trigger declined the document.
    pub(crate) dispatch: Option<&'a Dispatch>,
    pub(crate) panel: Option<&'a ReportPanel>,
    pub(crate) notifications: &'a [Notification],
}

#[derive(Serialize)]
struct JsonReport<'a> {
    command: &'a str,
    file: &'a str,
    status: RunStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<&'a ValidationReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    panel: Option<&'a ReportPanel>,
    notifications: &'a [Notification],
}

impl RunReport<'_> {
    fn status(&self) -> RunStatus {
        match self.dispatch.map(|dispatch| &dispatch.outcome) {
            None => RunStatus::Ignored,
            Some(ValidationOutcome::Completed(_)) => RunStatus::Completed,
            Some(ValidationOutcome::Skipped(_)) => RunStatus::Skipped,
            Some(ValidationOutcome::Aborted(_)) => RunStatus::Aborted,
            Some(ValidationOutcome::Failed { .. }) => RunStatus::Failed,
        }
    }

    fn detail(&self) -> Option<String> {
        match self.dispatch.map(|dispatch| &dispatch.outcome) {
            None => Some(format!("saving {} does not trigger validation", self.file)),
            Some(ValidationOutcome::Skipped(reason)) => Some(describe_skip(*reason)),
            Some(ValidationOutcome::Aborted(error) | ValidationOutcome::Failed { error, .. }) => {
                Some(error.to_string())
            }
            Some(ValidationOutcome::Completed(_)) => None,
        }
    }

    /// Whether the panel was repopulated by this run.
    fn shows_panel(&self) -> bool {
        matches!(self.status(), RunStatus::Completed | RunStatus::Failed)
    }
}

fn describe_skip(reason: SkipReason) -> String {
    match reason {
        SkipReason::UnsupportedFormat { format, version } => {
            format!("RedPen {version} cannot check {format} documents")
        }
        SkipReason::UnknownSyntax => String::from("the document has no syntax identifier"),
    }
}

/// Writes `report` in the requested format.
pub(crate) fn render<W: Write, E: Write>(
    format: ResolvedOutputFormat,
    report: &RunReport<'_>,
    stdout: &mut W,
    stderr: &mut E,
) -> Result<(), AppError> {
    match format {
        ResolvedOutputFormat::Human => render_human(report, stdout, stderr),
        ResolvedOutputFormat::Json => render_json(report, stdout),
    }
}

fn render_human<W: Write, E: Write>(
    report: &RunReport<'_>,
    stdout: &mut W,
    stderr: &mut E,
) -> Result<(), AppError> {
    for notification in report.notifications {
        writeln!(stderr, "error: {}", notification.message).map_err(AppError::WriteOutput)?;
        if let Some(detail) = &notification.detail {
            for line in detail.lines() {
                writeln!(stderr, "  {line}").map_err(AppError::WriteOutput)?;
            }
        }
    }

    if report.shows_panel() {
        if let Some(panel) = report.panel {
            write!(stdout, "{panel}").map_err(AppError::WriteOutput)?;
        }
    } else if report.status() != RunStatus::Aborted {
        if let Some(detail) = report.detail() {
            writeln!(stdout, "Skipped: {detail}").map_err(AppError::WriteOutput)?;
        }
    }
    stdout.flush().map_err(AppError::WriteOutput)
}

fn render_json<W: Write>(report: &RunReport<'_>, stdout: &mut W) -> Result<(), AppError> {
    let json = JsonReport {
        command: report.command,
        file: report.file,
        status: report.status(),
        detail: report.detail(),
        report: report
            .dispatch
            .and_then(|dispatch| dispatch.outcome.report()),
        panel: report.panel.filter(|_| report.shows_panel()),
        notifications: report.notifications,
    };
    serde_json::to_writer(&mut *stdout, &json).map_err(AppError::SerialiseReport)?;
    stdout.write_all(b"\n").map_err(AppError::WriteOutput)?;
    stdout.flush().map_err(AppError::WriteOutput)
}

#[cfg(test)]
mod tests {
    use redpen_checker::{FormatToken, Surface, VersionInfo};
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(OutputFormat::Auto, true, ResolvedOutputFormat::Human)]
    #[case(OutputFormat::Auto, false, ResolvedOutputFormat::Json)]
    #[case(OutputFormat::Human, false, ResolvedOutputFormat::Human)]
    #[case(OutputFormat::Json, true, ResolvedOutputFormat::Json)]
    fn auto_follows_terminal(
        #[case] format: OutputFormat,
        #[case] terminal: bool,
        #[case] expected: ResolvedOutputFormat,
    ) {
        assert_eq!(format.resolve(terminal), expected);
    }

    fn skipped() -> Dispatch {
        Dispatch {
            surface: Surface::Primary,
            outcome: ValidationOutcome::Skipped(SkipReason::UnsupportedFormat {
                format: FormatToken::Latex,
                version: VersionInfo::new(1, 2),
            }),
        }
    }

    #[test]
    fn skipped_run_explains_itself() {
        let dispatch = skipped();
        let report = RunReport {
            command: "redpen-check:validate",
            file: "paper.tex",
            dispatch: Some(&dispatch),
            panel: None,
            notifications: &[],
        };
        let mut stdout = Vec::new();
        let mut stderr = Vec::<u8>::new();
        render(ResolvedOutputFormat::Human, &report, &mut stdout, &mut stderr).expect("render");
        assert_eq!(
            String::from_utf8(stdout).expect("utf8"),
            "Skipped: RedPen 1.2 cannot check latex documents\n"
        );
        assert!(stderr.is_empty());
    }

    #[test]
    fn json_output_carries_status_and_notifications() {
        let notifications = [Notification {
            message: String::from("RedPen check failed."),
            detail: Some(String::from("boom")),
        }];
        let report = RunReport {
            command: "redpen-check:validate",
            file: "notes.md",
            dispatch: None,
            panel: None,
            notifications: &notifications,
        };
        let mut stdout = Vec::new();
        render(ResolvedOutputFormat::Json, &report, &mut stdout, &mut Vec::<u8>::new()).expect("render");
        let value: serde_json::Value = serde_json::from_slice(&stdout).expect("json");
        assert_eq!(value["status"], "ignored");
        assert_eq!(value["notifications"][0]["detail"], "boom");
        assert!(value.get("panel").is_none());
    }
}
