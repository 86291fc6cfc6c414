//! Process-based execution of the RedPen launcher.
//!
//! [`ProcessRunner`] implements the [`ToolRunner`] trait with
//! `tokio::process`, so a validation pipeline suspends while RedPen runs
//! instead of blocking the host's event loop. One call spawns exactly one
//! process; there is no retry and no timeout.

use std::future::Future;
use std::process::Stdio;
use std::sync::Arc;

use tokio::process::Command;
use tracing::debug;

use crate::error::CheckError;
use crate::invocation::ToolInvocation;

/// Tracing target for process operations.
const PROCESS_TARGET: &str = "redpen_checker::process";

/// Captured completion of one external process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolRunResult {
    /// Exit status; `-1` when the process was terminated by a signal.
    pub exit_code: i32,
    /// Captured standard output, decoded lossily.
    pub stdout: String,
    /// Captured standard error, decoded lossily.
    pub stderr: String,
}

impl ToolRunResult {
    /// Creates a result from its parts.
    #[must_use]
    pub fn new(exit_code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }
}

/// Trait abstracting external process execution for testability.
///
/// The production implementation is [`ProcessRunner`]. Test code implements
/// this trait to return canned probe and lint output without spawning
/// anything.
pub trait ToolRunner {
    /// Runs `invocation` to completion and captures its output.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Spawn`] when the process cannot be launched or
    /// its output cannot be collected. A non-zero exit is not an error.
    fn run(
        &self,
        invocation: ToolInvocation,
    ) -> impl Future<Output = Result<ToolRunResult, CheckError>>;
}

/// Runs invocations as child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl ToolRunner for ProcessRunner {
    async fn run(&self, invocation: ToolInvocation) -> Result<ToolRunResult, CheckError> {
        let program = invocation.program().display().to_string();
        debug!(
            target: PROCESS_TARGET,
            %program,
            args = ?invocation.args(),
            "spawning RedPen process"
        );

        let output = Command::new(invocation.program())
            .args(invocation.args())
            .envs(invocation.env())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| CheckError::Spawn {
                program: program.clone(),
                source: Arc::new(source),
            })?;

        let result = ToolRunResult {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(
            target: PROCESS_TARGET,
            %program,
            exit_code = result.exit_code,
            stdout_bytes = result.stdout.len(),
            stderr_bytes = result.stderr.len(),
            "RedPen process exited"
        );
        Ok(result)
    }
}
