//! CLI argument definitions for `redpen-check`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

/// Command-line interface for the RedPen checker.
#[derive(Parser, Debug)]
#[command(name = "redpen-check", disable_help_subcommand = true)]
pub(crate) struct Cli {
    /// Controls how the report is rendered.
    #[arg(long, value_enum, default_value_t = OutputFormat::Auto)]
    pub(crate) output: OutputFormat,
    /// What to check.
    #[command(subcommand)]
    pub(crate) command: CliCommand,
}

/// Checks offered by the CLI.
#[derive(Subcommand, Debug, Clone)]
pub(crate) enum CliCommand {
    /// Checks a whole document.
    Validate {
        /// Document to check.
        file: PathBuf,
        /// Editor syntax identifier; inferred from the extension when absent.
        #[arg(long)]
        syntax: Option<String>,
    },
    /// Checks a range of lines inside a document.
    ValidateSelection {
        /// Document to check.
        file: PathBuf,
        /// First selected line, starting at 1.
        #[arg(long)]
        start_line: usize,
        /// Last selected line, inclusive.
        #[arg(long)]
        end_line: usize,
        /// Editor syntax identifier; inferred from the extension when absent.
        #[arg(long)]
        syntax: Option<String>,
    },
    /// Applies the save trigger, checking the document when it matches.
    OnSave {
        /// Document that was saved.
        file: PathBuf,
        /// Editor syntax identifier; inferred from the extension when absent.
        #[arg(long)]
        syntax: Option<String>,
    },
}

impl CliCommand {
    pub(crate) fn file(&self) -> &PathBuf {
        match self {
            Self::Validate { file, .. }
            | Self::ValidateSelection { file, .. }
            | Self::OnSave { file, .. } => file,
        }
    }

    pub(crate) fn syntax(&self) -> Option<&str> {
        match self {
            Self::Validate { syntax, .. }
            | Self::ValidateSelection { syntax, .. }
            | Self::OnSave { syntax, .. } => syntax.as_deref(),
        }
    }
}
