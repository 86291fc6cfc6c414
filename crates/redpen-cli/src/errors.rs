//! Error types for the CLI runtime.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use redpen_checker::CommandError;
use thiserror::Error;

use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("failed to start the async runtime: {0}")]
    Runtime(io::Error),
    #[error("failed to read {}: {source}", path.display())]
    ReadDocument { path: PathBuf, source: io::Error },
    #[error("invalid line range {start}-{end}: lines start at 1 and the range must not be reversed")]
    InvalidLineRange { start: usize, end: usize },
    #[error(transparent)]
    Dispatch(#[from] CommandError),
    #[error("failed to serialise report: {0}")]
    SerialiseReport(serde_json::Error),
    #[error("failed to write report: {0}")]
    WriteOutput(io::Error),
}
