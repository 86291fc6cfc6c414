//! Command-line host for the RedPen checker.
//!
//! The runtime owns argument parsing, configuration bootstrapping, document
//! loading, and report rendering. It plays the part of an editor: it reads
//! the file, builds a [`redpen_checker::Document`], dispatches one of the
//! `redpen-check:*` commands through a [`redpen_checker::Extension`], and
//! prints the resulting panel. Configuration loading and IO streams can be
//! substituted in tests.

use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use redpen_checker::{
    Checker, CheckerOptions, Dispatch, Document, Extension, NotificationLog, ProcessRunner,
    SaveTrigger, Selection, VALIDATE_COMMAND, VALIDATE_SELECTION_COMMAND,
};
use redpen_config::Config;
use tracing::debug;

mod cli;
mod config;
mod errors;
mod output;
mod syntax;
mod telemetry;

use cli::{Cli, CliCommand};
pub(crate) use config::{ConfigLoader, OrthoConfigLoader, split_config_arguments};
use errors::AppError;
pub use output::{OutputFormat, ResolvedOutputFormat};
use output::{RunReport, render};
use syntax::infer_syntax_id;

const CLI_TARGET: &str = "redpen_cli";

/// Bundles the IO streams provided to the CLI runtime.
pub(crate) struct IoStreams<'a, W: Write, E: Write> {
    pub(crate) stdout: &'a mut W,
    pub(crate) stderr: &'a mut E,
    stdout_is_terminal: bool,
}

impl<'a, W: Write, E: Write> IoStreams<'a, W, E> {
    pub(crate) const fn new(stdout: &'a mut W, stderr: &'a mut E, stdout_is_terminal: bool) -> Self {
        Self {
            stdout,
            stderr,
            stdout_is_terminal,
        }
    }
}

/// Runs the CLI using the provided arguments and IO handles.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E, stdout_is_terminal: bool) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let mut io = IoStreams::new(stdout, stderr, stdout_is_terminal);
    run_with_loader(args, &mut io, &OrthoConfigLoader)
}

/// Runs the CLI with a custom configuration loader.
pub(crate) fn run_with_loader<I, W, E, L>(
    args: I,
    io: &mut IoStreams<'_, W, E>,
    loader: &L,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    match try_run(args, io, loader) {
        Ok(exit_code) => exit_code,
        Err(AppError::CliUsage(error)) if !error.use_stderr() => {
            // `--help` and `--version` are successful runs.
            write!(io.stdout, "{error}").ok();
            ExitCode::SUCCESS
        }
        Err(error) => {
            writeln!(io.stderr, "{error}").ok();
            ExitCode::FAILURE
        }
    }
}

fn try_run<I, W, E, L>(
    args: I,
    io: &mut IoStreams<'_, W, E>,
    loader: &L,
) -> Result<ExitCode, AppError>
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    let arguments: Vec<OsString> = args.into_iter().collect();
    let split = split_config_arguments(&arguments);
    let cli = Cli::try_parse_from(&split.command_arguments).map_err(AppError::CliUsage)?;
    let config = loader.load(&split.config_arguments)?;
    telemetry::initialise(&config)?;

    let output_format = cli.output.resolve(io.stdout_is_terminal);
    let document = load_document(&cli.command)?;
    let command_id = match cli.command {
        CliCommand::ValidateSelection { .. } => VALIDATE_SELECTION_COMMAND,
        CliCommand::Validate { .. } | CliCommand::OnSave { .. } => VALIDATE_COMMAND,
    };
    debug!(
        target: CLI_TARGET,
        command = command_id,
        file = %cli.command.file().display(),
        syntax = document.syntax_id().unwrap_or_default(),
        "running check"
    );

    let mut extension = build_extension(&config);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(AppError::Runtime)?;
    let dispatch: Option<Dispatch> = runtime.block_on(async {
        match cli.command {
            CliCommand::OnSave { .. } => Ok(extension.on_save(&document).await),
            CliCommand::Validate { .. } | CliCommand::ValidateSelection { .. } => {
                extension.dispatch(command_id, &document).await.map(Some)
            }
        }
    })?;

    let notifications = extension.checker().notifier().take();
    let file = cli.command.file().display().to_string();
    let report = RunReport {
        command: command_id,
        file: &file,
        dispatch: dispatch.as_ref(),
        panel: dispatch
            .as_ref()
            .map(|done| extension.surfaces().get(done.surface)),
        notifications: &notifications,
    };
    render(output_format, &report, &mut *io.stdout, &mut *io.stderr)?;

    let clean = dispatch
        .as_ref()
        .is_none_or(|done| done.outcome.is_clean());
    Ok(if clean {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn build_extension(config: &Config) -> Extension<ProcessRunner, NotificationLog> {
    let checker = Checker::new(
        CheckerOptions::from(config),
        ProcessRunner,
        NotificationLog::new(),
    );
    Extension::new(checker, SaveTrigger::from(config))
}

fn load_document(command: &CliCommand) -> Result<Document, AppError> {
    let path = command.file();
    let text = fs::read_to_string(path).map_err(|source| AppError::ReadDocument {
        path: path.clone(),
        source,
    })?;
    let syntax_id = command
        .syntax()
        .map_or_else(|| infer_syntax_id(path).to_owned(), str::to_owned);
    let document = Document::new(document_title(path), text)
        .with_path(path)
        .with_syntax_id(syntax_id);

    match *command {
        CliCommand::ValidateSelection {
            start_line,
            end_line,
            ..
        } => {
            if start_line == 0 || end_line < start_line {
                return Err(AppError::InvalidLineRange {
                    start: start_line,
                    end: end_line,
                });
            }
            Ok(document.with_selection(Selection::lines(start_line - 1, end_line - 1)))
        }
        CliCommand::Validate { .. } | CliCommand::OnSave { .. } => Ok(document),
    }
}

fn document_title(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}
