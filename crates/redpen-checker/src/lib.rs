//! Editor integration for the RedPen document linter.
//!
//! The `redpen-checker` crate runs the external RedPen command line tool
//! against a document, or against the text selected in it, and turns the
//! JSON report RedPen prints into line and column anchored diagnostics shown
//! in one of two report panels. All proofreading happens inside RedPen; this
//! crate owns the plumbing around it:
//!
//! - mapping an editor syntax identifier to RedPen's `-f` format token
//!   ([`format`]),
//! - probing the installed RedPen release and gating formats it cannot
//!   check ([`version`]),
//! - writing selected text to a scratch file and shifting reported lines
//!   back into the full document ([`scratch`], [`pipeline`]),
//! - normalising RedPen's two error shapes ([`report`]),
//! - filling the report panels ([`presenter`]).
//!
//! # Architecture
//!
//! Hosts build a [`Checker`] from [`CheckerOptions`], a [`ToolRunner`] that
//! launches processes, and a [`Notifier`] that surfaces failures, then wrap
//! it in an [`Extension`] which binds the `redpen-check:*` commands, the
//! save trigger, and the panels together.
//!
//! # Example
//!
//! ```rust,no_run
//! use redpen_checker::{
//!     Checker, CheckerOptions, Document, Extension, ProcessRunner, SaveTrigger,
//!     ToolSettings, TracingNotifier, VALIDATE_COMMAND,
//! };
//!
//! # async fn demo() {
//! let settings = ToolSettings::new("/usr/local/redpen/bin/redpen")
//!     .with_java_home("/usr/lib/jvm/default");
//! let checker = Checker::new(CheckerOptions::new(settings), ProcessRunner, TracingNotifier);
//! let mut extension = Extension::new(checker, SaveTrigger::default());
//!
//! let document = Document::new("README.md", "")
//!     .with_path("README.md")
//!     .with_syntax_id("gfm");
//! let dispatch = extension.dispatch(VALIDATE_COMMAND, &document).await;
//! # let _ = dispatch;
//! # }
//! ```

pub mod commands;
pub mod document;
pub mod error;
pub mod format;
pub mod invocation;
pub mod notify;
pub mod pipeline;
pub mod presenter;
pub mod process;
pub mod report;
pub mod scratch;
pub mod version;

#[cfg(test)]
mod tests;

pub use self::commands::{
    CommandError, CommandRegistry, Dispatch, Extension, SaveTrigger, VALIDATE_COMMAND,
    VALIDATE_SELECTION_COMMAND,
};
pub use self::document::{Document, Position, Selection};
pub use self::error::{CheckError, ToolError};
pub use self::format::{FormatToken, detect};
pub use self::invocation::{ToolInvocation, ToolSettings};
pub use self::notify::{Notification, NotificationLog, Notifier, TracingNotifier};
pub use self::pipeline::{Checker, CheckerOptions, SkipReason, ValidationOutcome};
pub use self::presenter::{PanelEntry, ReportPanel, ReportPresenter, ReportSurfaces, Surface};
pub use self::process::{ProcessRunner, ToolRunResult, ToolRunner};
pub use self::report::{DiagnosticRecord, ValidationReport, normalize};
pub use self::version::{GateDecision, SupportedFormats, VersionGate, VersionInfo};
