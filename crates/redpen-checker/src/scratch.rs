//! Scratch files handing selected text to RedPen.
//!
//! RedPen only reads files, so selection mode writes the selected text to a
//! transient file next to the document. Names come from `tempfile`'s random
//! generator, so concurrent selection checks in the same directory never
//! share a file, and the file is removed once the body completes.

use std::future::Future;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::Builder;
use tracing::{debug, warn};

use crate::error::CheckError;

const SCRATCH_TARGET: &str = "redpen_checker::scratch";

/// Prefix of every scratch file name.
pub const SCRATCH_PREFIX: &str = ".redpen-selection-";

/// Writes `content` to a fresh file in `directory`, runs `body` with its
/// path, and deletes the file afterwards.
///
/// `extension` (without the dot) is appended to the file name so RedPen sees
/// the same kind of file as the original document. The file is deleted
/// whether `body` succeeds or fails; if the future is dropped or panics the
/// drop guard still removes it.
///
/// # Errors
///
/// Returns [`CheckError::Scratch`] when the file cannot be created, written,
/// or removed. Errors produced by `body` are returned unchanged after the
/// file is removed.
pub async fn with_scratch<F, Fut, T>(
    content: &str,
    directory: &Path,
    extension: Option<&str>,
    body: F,
) -> Result<T, CheckError>
where
    F: FnOnce(PathBuf) -> Fut,
    Fut: Future<Output = Result<T, CheckError>>,
{
    let scratch_error = |source: std::io::Error| CheckError::Scratch {
        directory: directory.to_path_buf(),
        source: Arc::new(source),
    };
    let suffix = extension.map(|ext| format!(".{ext}")).unwrap_or_default();
    let mut file = Builder::new()
        .prefix(SCRATCH_PREFIX)
        .suffix(&suffix)
        .tempfile_in(directory)
        .map_err(scratch_error)?;
    file.write_all(content.as_bytes()).map_err(scratch_error)?;
    file.flush().map_err(scratch_error)?;

    debug!(
        target: SCRATCH_TARGET,
        path = %file.path().display(),
        bytes = content.len(),
        "created scratch file"
    );

    let path = file.path().to_path_buf();
    let outcome = body(path.clone()).await;
    match file.close() {
        Ok(()) => {
            debug!(target: SCRATCH_TARGET, path = %path.display(), "removed scratch file");
        }
        Err(source) => {
            warn!(
                target: SCRATCH_TARGET,
                path = %path.display(),
                error = %source,
                "failed to remove scratch file"
            );
            if outcome.is_ok() {
                return Err(scratch_error(source));
            }
        }
    }
    outcome
}
