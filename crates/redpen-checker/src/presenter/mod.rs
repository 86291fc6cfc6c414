//! Report panels and the presenter that fills them.
//!
//! A host owns one [`ReportSurfaces`] value holding two independent panels,
//! one for whole-document checks and one for selection checks, so both
//! results can be visible at the same time. [`ReportPresenter::present`]
//! replaces a panel's contents wholesale; when two requests finish for the
//! same surface the later one wins.

use std::fmt;

use serde::Serialize;

use crate::pipeline::{CHECK_FAILED_MESSAGE, ValidationOutcome};
use crate::report::ValidationReport;

/// Title of the whole-document panel.
pub const PRIMARY_PANEL_TITLE: &str = "RedPen Check Report";

/// Title of the selection panel.
pub const SELECTION_PANEL_TITLE: &str = "RedPen Selection Report";

/// Headline of a clean report.
pub const SUCCESS_MESSAGE: &str = "Success!!";

/// Which panel a result belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    /// Whole-document results.
    Primary,
    /// Selected-text results.
    Selection,
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Primary => "primary",
            Self::Selection => "selection",
        })
    }
}

/// Visual emphasis of a panel entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    /// Neutral text.
    Info,
    /// Positive outcome.
    Success,
    /// Finding or failure.
    Error,
}

/// One row of a report panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PanelEntry {
    /// Free text.
    Plain {
        /// Text shown.
        message: String,
        /// Emphasis.
        tone: Tone,
    },
    /// A finding anchored to a line and column.
    Line {
        /// Validator message.
        message: String,
        /// Sentence the finding refers to.
        preview: String,
        /// 1-based line.
        line: u32,
        /// 1-based column.
        column: u32,
        /// Emphasis.
        tone: Tone,
    },
}

impl PanelEntry {
    fn plain(message: impl Into<String>, tone: Tone) -> Self {
        Self::Plain {
            message: message.into(),
            tone,
        }
    }
}

/// A titled list of entries standing in for an editor panel widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportPanel {
    title: String,
    attached: bool,
    entries: Vec<PanelEntry>,
}

impl ReportPanel {
    /// Creates a detached, empty panel.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            attached: false,
            entries: Vec::new(),
        }
    }

    /// Panel title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Returns whether the panel is shown.
    #[must_use]
    pub const fn is_attached(&self) -> bool {
        self.attached
    }

    /// Current rows.
    #[must_use]
    pub fn entries(&self) -> &[PanelEntry] {
        &self.entries
    }

    /// Shows the panel.
    pub const fn attach(&mut self) {
        self.attached = true;
    }

    /// Hides the panel.
    pub const fn detach(&mut self) {
        self.attached = false;
    }

    /// Removes every row.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Appends a row.
    pub fn add(&mut self, entry: PanelEntry) {
        self.entries.push(entry);
    }
}

impl fmt::Display for ReportPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        for entry in &self.entries {
            match entry {
                PanelEntry::Plain { message, .. } => {
                    for line in message.lines() {
                        writeln!(f, "  {line}")?;
                    }
                }
                PanelEntry::Line {
                    message,
                    preview,
                    line,
                    column,
                    ..
                } => {
                    writeln!(f, "  {line}:{column}: {message}")?;
                    if !preview.is_empty() {
                        writeln!(f, "    | {preview}")?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// The two report panels a host owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSurfaces {
    primary: ReportPanel,
    selection: ReportPanel,
}

impl Default for ReportSurfaces {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportSurfaces {
    /// Creates both panels, detached and empty.
    #[must_use]
    pub fn new() -> Self {
        Self {
            primary: ReportPanel::new(PRIMARY_PANEL_TITLE),
            selection: ReportPanel::new(SELECTION_PANEL_TITLE),
        }
    }

    /// Returns the panel for `surface`.
    #[must_use]
    pub const fn get(&self, surface: Surface) -> &ReportPanel {
        match surface {
            Surface::Primary => &self.primary,
            Surface::Selection => &self.selection,
        }
    }

    /// Returns the panel for `surface` mutably.
    pub const fn get_mut(&mut self, surface: Surface) -> &mut ReportPanel {
        match surface {
            Surface::Primary => &mut self.primary,
            Surface::Selection => &mut self.selection,
        }
    }

    /// Clears and hides both panels.
    pub fn dispose(&mut self) {
        for panel in [&mut self.primary, &mut self.selection] {
            panel.clear();
            panel.detach();
        }
    }
}

/// Renders validation outcomes into panels.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReportPresenter;

impl ReportPresenter {
    /// Replaces `panel`'s contents with `outcome`.
    ///
    /// Completed and failed requests repopulate the panel; skipped and
    /// aborted requests leave it untouched. Returns whether the panel
    /// changed.
    pub fn present(self, panel: &mut ReportPanel, outcome: &ValidationOutcome) -> bool {
        match outcome {
            ValidationOutcome::Completed(report) => {
                self.present_report(panel, report);
                true
            }
            ValidationOutcome::Failed {
                subject_label,
                error,
            } => {
                panel.attach();
                panel.clear();
                panel.add(PanelEntry::plain(CHECK_FAILED_MESSAGE, Tone::Error));
                panel.add(PanelEntry::plain(
                    format!("{subject_label}: {error}"),
                    Tone::Error,
                ));
                if let Some(stderr) = error.stderr() {
                    panel.add(PanelEntry::plain(stderr.trim_end(), Tone::Info));
                }
                true
            }
            ValidationOutcome::Skipped(_) | ValidationOutcome::Aborted(_) => false,
        }
    }

    /// Replaces `panel`'s contents with `report`.
    pub fn present_report(self, panel: &mut ReportPanel, report: &ValidationReport) {
        panel.attach();
        panel.clear();
        if report.is_success() {
            panel.add(PanelEntry::plain(SUCCESS_MESSAGE, Tone::Success));
            panel.add(PanelEntry::plain(report.summary(), Tone::Success));
            return;
        }
        panel.add(PanelEntry::plain(report.summary(), Tone::Error));
        for record in &report.diagnostics {
            panel.add(PanelEntry::Line {
                message: record.message.clone(),
                preview: record.preview_text.clone(),
                line: record.line,
                column: record.column,
                tone: Tone::Error,
            });
        }
    }
}
