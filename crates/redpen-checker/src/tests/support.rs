//! Test doubles shared by the unit and behaviour tests.

use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use crate::document::Document;
use crate::error::CheckError;
use crate::invocation::{ToolInvocation, ToolSettings, VERSION_FLAG};
use crate::notify::NotificationLog;
use crate::pipeline::{Checker, CheckerOptions};
use crate::process::{ToolRunResult, ToolRunner};

/// One invocation seen by [`FakeRunner`].
#[derive(Debug, Clone)]
pub(crate) struct RecordedCall {
    pub(crate) invocation: ToolInvocation,
    /// Contents of the subject file at the moment RedPen would have read it.
    pub(crate) subject_text: Option<String>,
}

impl RecordedCall {
    pub(crate) fn is_probe(&self) -> bool {
        self.invocation.args().first().map(String::as_str) == Some(VERSION_FLAG)
    }

    pub(crate) fn subject(&self) -> Option<PathBuf> {
        self.invocation.args().last().map(PathBuf::from)
    }
}

/// Runner returning canned probe and lint results.
///
/// A `None` lint result simulates a launch failure.
#[derive(Debug)]
pub(crate) struct FakeRunner {
    probe: ToolRunResult,
    lint: Option<ToolRunResult>,
    calls: RefCell<Vec<RecordedCall>>,
}

impl FakeRunner {
    pub(crate) fn new(version: &str, lint_stdout: &str) -> Self {
        Self {
            probe: ToolRunResult::new(0, format!("{version}\n"), ""),
            lint: Some(ToolRunResult::new(0, lint_stdout, "")),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn with_probe(mut self, probe: ToolRunResult) -> Self {
        self.probe = probe;
        self
    }

    pub(crate) fn with_lint(mut self, lint: Option<ToolRunResult>) -> Self {
        self.lint = lint;
        self
    }

    pub(crate) fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    pub(crate) fn lint_calls(&self) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| !call.is_probe())
            .collect()
    }
}

impl ToolRunner for FakeRunner {
    async fn run(&self, invocation: ToolInvocation) -> Result<ToolRunResult, CheckError> {
        let probe = invocation.args().first().map(String::as_str) == Some(VERSION_FLAG);
        let subject_text = if probe {
            None
        } else {
            invocation
                .args()
                .last()
                .and_then(|subject| std::fs::read_to_string(subject).ok())
        };
        self.calls.borrow_mut().push(RecordedCall {
            invocation: invocation.clone(),
            subject_text,
        });
        tokio::task::yield_now().await;
        if probe {
            return Ok(self.probe.clone());
        }
        self.lint.clone().ok_or_else(|| CheckError::Spawn {
            program: invocation.program().display().to_string(),
            source: Arc::new(io::Error::from(io::ErrorKind::NotFound)),
        })
    }
}

pub(crate) fn settings() -> ToolSettings {
    ToolSettings::new("/opt/redpen/bin/redpen").with_java_home("/usr/lib/jvm/java-17")
}

pub(crate) fn checker(runner: FakeRunner, scratch_dir: PathBuf) -> Checker<FakeRunner, NotificationLog> {
    Checker::new(
        CheckerOptions::new(settings()).with_scratch_dir(scratch_dir),
        runner,
        NotificationLog::new(),
    )
}

/// RedPen report with a single error in the nested shape.
pub(crate) fn one_error_report(line: u32, offset: u32) -> String {
    format!(
        r#"[{{"document":"doc","errors":[{{"startPosition":{{"lineNum":{line},"offset":{offset}}},"message":"Found invalid word.","sentence":"teh cat"}}]}}]"#
    )
}

pub(crate) const CLEAN_REPORT: &str = r#"[{"document":"doc","errors":[]}]"#;

pub(crate) fn latex_document() -> Document {
    Document::new("paper.tex", "\\section{Intro}\nteh cat\n")
        .with_path("/work/paper.tex")
        .with_syntax_id("latex-tex")
}
