//! Behaviour-driven development (BDD) step definitions for checker scenarios.

use std::cell::RefCell;
use std::future::Future;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

use super::support::{FakeRunner, one_error_report, settings};
use crate::{
    Checker, CheckerOptions, Document, Extension, NotificationLog, PanelEntry, SaveTrigger,
    Selection, Surface, ToolRunResult, ToolSettings, VALIDATE_COMMAND,
    VALIDATE_SELECTION_COMMAND,
};

// =============================================================================
// Test World
// =============================================================================

/// State shared across BDD steps.
struct TestWorld {
    /// Version the probe prints.
    version: String,
    /// Lint run result.
    lint: ToolRunResult,
    /// Launch settings.
    settings: ToolSettings,
    /// Document under test.
    document: Option<Document>,
    /// Directory receiving scratch files.
    scratch: TempDir,
    /// Extension built by the first `When` step.
    extension: Option<Extension<FakeRunner, NotificationLog>>,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self {
            version: String::from("1.4.0"),
            lint: ToolRunResult::new(0, r#"[{"document":"doc","errors":[]}]"#, ""),
            settings: settings(),
            document: None,
            scratch: TempDir::new().expect("scratch dir"),
            extension: None,
        }
    }
}

impl TestWorld {
    fn build_extension(&mut self) -> &mut Extension<FakeRunner, NotificationLog> {
        let runner = FakeRunner::new(&self.version, "").with_lint(Some(self.lint.clone()));
        let options =
            CheckerOptions::new(self.settings.clone()).with_scratch_dir(self.scratch.path());
        let checker = Checker::new(options, runner, NotificationLog::new());
        self.extension
            .insert(Extension::new(checker, SaveTrigger::default()))
    }

    fn extension(&self) -> &Extension<FakeRunner, NotificationLog> {
        self.extension.as_ref().expect("extension should be built")
    }

    fn document(&self) -> Document {
        self.document.clone().expect("document should be set")
    }
}

#[fixture]
fn world() -> RefCell<TestWorld> {
    RefCell::new(TestWorld::default())
}

fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime")
        .block_on(future)
}

/// Strips surrounding double quotes from a string if present.
fn strip_quotes(s: &str) -> &str {
    s.trim_matches('"')
}

fn notes_text() -> String {
    (1..=10).map(|n| format!("line {n}\n")).collect()
}

// =============================================================================
// Given Steps
// =============================================================================

#[given("RedPen reports version {version}")]
fn given_version(world: &RefCell<TestWorld>, version: String) {
    world.borrow_mut().version = strip_quotes(&version).to_owned();
}

#[given("RedPen finds an error on line {line} at offset {offset}")]
fn given_error(world: &RefCell<TestWorld>, line: u32, offset: u32) {
    world.borrow_mut().lint = ToolRunResult::new(0, one_error_report(line, offset), "");
}

#[given("RedPen prints {stdout} with error output {stderr}")]
fn given_raw_output(world: &RefCell<TestWorld>, stdout: String, stderr: String) {
    world.borrow_mut().lint =
        ToolRunResult::new(0, strip_quotes(&stdout), strip_quotes(&stderr));
}

#[given("no Java runtime is configured")]
fn given_no_java(world: &RefCell<TestWorld>) {
    world.borrow_mut().settings = ToolSettings::new("/opt/redpen/bin/redpen");
}

#[given("a saved document {name} with syntax {syntax}")]
fn given_document(world: &RefCell<TestWorld>, name: String, syntax: String) {
    let title = strip_quotes(&name);
    world.borrow_mut().document = Some(
        Document::new(title, notes_text())
            .with_path(format!("/work/{title}"))
            .with_syntax_id(strip_quotes(&syntax)),
    );
}

#[given("lines {first} to {last} are selected")]
fn given_selection(world: &RefCell<TestWorld>, first: usize, last: usize) {
    let mut w = world.borrow_mut();
    let document = w.document().with_selection(Selection::lines(first - 1, last - 1));
    w.document = Some(document);
}

// =============================================================================
// When Steps
// =============================================================================

#[when("the document is validated")]
fn when_document_validated(world: &RefCell<TestWorld>) {
    let mut w = world.borrow_mut();
    let document = w.document();
    let extension = w.build_extension();
    block_on(extension.dispatch(VALIDATE_COMMAND, &document)).expect("dispatch");
}

#[when("the selection is validated")]
fn when_selection_validated(world: &RefCell<TestWorld>) {
    let mut w = world.borrow_mut();
    let document = w.document();
    let extension = w.build_extension();
    block_on(extension.dispatch(VALIDATE_SELECTION_COMMAND, &document)).expect("dispatch");
}

#[when("lines {a_first} to {a_last} and lines {b_first} to {b_last} are validated together")]
fn when_selections_overlap(
    world: &RefCell<TestWorld>,
    a_first: usize,
    a_last: usize,
    b_first: usize,
    b_last: usize,
) {
    let mut w = world.borrow_mut();
    let base = w.document();
    let first = base
        .clone()
        .with_selection(Selection::lines(a_first - 1, a_last - 1));
    let second = base.with_selection(Selection::lines(b_first - 1, b_last - 1));
    let extension = w.build_extension();

    let (a, b) = block_on(async {
        tokio::join!(
            extension.checker().validate_selection(&first),
            extension.checker().validate_selection(&second)
        )
    });
    extension.present(Surface::Selection, &a);
    extension.present(Surface::Selection, &b);
}

// =============================================================================
// Then Steps
// =============================================================================

#[then("RedPen is invoked with format {format}")]
fn then_invoked_with_format(world: &RefCell<TestWorld>, format: String) {
    let w = world.borrow();
    let lints = w.extension().checker().runner().lint_calls();
    let lint = lints.first().expect("lint call");
    let args = lint.invocation.args();
    let position = args.iter().position(|arg| arg == "-f").expect("-f flag");
    assert_eq!(
        args.get(position + 1).map(String::as_str),
        Some(strip_quotes(&format))
    );
}

#[then("RedPen is not invoked for linting")]
fn then_not_linted(world: &RefCell<TestWorld>) {
    let w = world.borrow();
    assert!(w.extension().checker().runner().lint_calls().is_empty());
}

#[then("no process is spawned")]
fn then_nothing_spawned(world: &RefCell<TestWorld>) {
    let w = world.borrow();
    assert!(w.extension().checker().runner().calls().is_empty());
}

#[then("no notification is raised")]
fn then_no_notification(world: &RefCell<TestWorld>) {
    let w = world.borrow();
    assert!(w.extension().checker().notifier().take().is_empty());
}

#[then("the user is notified {message}")]
fn then_notified(world: &RefCell<TestWorld>, message: String) {
    let w = world.borrow();
    let entries = w.extension().checker().notifier().take();
    assert!(
        entries
            .iter()
            .any(|entry| entry.message == strip_quotes(&message)),
        "notifications: {entries:?}"
    );
}

#[then("the primary panel is untouched")]
fn then_primary_untouched(world: &RefCell<TestWorld>) {
    let w = world.borrow();
    let panel = w.extension().surfaces().get(Surface::Primary);
    assert!(!panel.is_attached());
    assert!(panel.entries().is_empty());
}

#[then("the primary panel shows {text}")]
fn then_primary_shows(world: &RefCell<TestWorld>, text: String) {
    let w = world.borrow();
    let panel = w.extension().surfaces().get(Surface::Primary);
    let expected = strip_quotes(&text);
    assert!(
        panel.entries().iter().any(|entry| match entry {
            PanelEntry::Plain { message, .. } | PanelEntry::Line { message, .. } =>
                message == expected,
        }),
        "panel:\n{panel}"
    );
}

fn assert_line_entry(world: &RefCell<TestWorld>, surface: Surface, line: u32, column: u32) {
    let w = world.borrow();
    let panel = w.extension().surfaces().get(surface);
    assert!(
        panel.entries().iter().any(|entry| matches!(
            entry,
            PanelEntry::Line { line: l, column: c, .. } if *l == line && *c == column
        )),
        "panel:\n{panel}"
    );
}

#[then("the primary panel has an error at line {line} column {column}")]
fn then_primary_line(world: &RefCell<TestWorld>, line: u32, column: u32) {
    assert_line_entry(world, Surface::Primary, line, column);
}

#[then("the selection panel has an error at line {line} column {column}")]
fn then_selection_line(world: &RefCell<TestWorld>, line: u32, column: u32) {
    assert_line_entry(world, Surface::Selection, line, column);
}

#[then("RedPen checked {count} different scratch files")]
fn then_distinct_scratch_files(world: &RefCell<TestWorld>, count: usize) {
    let w = world.borrow();
    let mut subjects: Vec<_> = w
        .extension()
        .checker()
        .runner()
        .lint_calls()
        .iter()
        .filter_map(super::support::RecordedCall::subject)
        .collect();
    subjects.sort();
    subjects.dedup();
    assert_eq!(subjects.len(), count);
}

#[then("no scratch file remains")]
fn then_no_scratch(world: &RefCell<TestWorld>) {
    let w = world.borrow();
    let remaining = std::fs::read_dir(w.scratch.path())
        .expect("read scratch dir")
        .count();
    assert_eq!(remaining, 0);
}

// =============================================================================
// Scenario Bindings
// =============================================================================

#[scenario(
    path = "tests/features/version_gate.feature",
    name = "LaTeX documents are checked by RedPen 1.4"
)]
fn latex_checked_on_new_release(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/version_gate.feature",
    name = "LaTeX documents are skipped by RedPen 1.2"
)]
fn latex_skipped_on_old_release(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/version_gate.feature",
    name = "A missing Java runtime stops the check"
)]
fn missing_java_stops_check(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/validation.feature",
    name = "Whole-document diagnostics are listed"
)]
fn whole_document_diagnostics(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/validation.feature",
    name = "Selection diagnostics point into the document"
)]
fn selection_diagnostics(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/validation.feature",
    name = "Back-to-back selection checks stay separate"
)]
fn back_to_back_selections(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/validation.feature",
    name = "Unusable RedPen output is reported"
)]
fn unusable_output_reported(world: RefCell<TestWorld>) {
    let _ = world;
}
