//! Normalisation of RedPen's JSON report.
//!
//! `redpen -r json` prints an array with one entry per input document; the
//! first entry's `errors` list holds the findings. Depending on the
//! validator, an error carries either flat `lineNum` /
//! `sentenceStartColumnNum` fields or a nested `startPosition` object. Both
//! shapes are folded into a [`DiagnosticRecord`] with 1-based coordinates.

use serde::{Deserialize, Serialize};

use crate::error::ToolError;

/// A single finding anchored to a 1-based line and column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticRecord {
    /// Validator message.
    pub message: String,
    /// Sentence the finding refers to.
    pub preview_text: String,
    /// 1-based line in the validated document.
    pub line: u32,
    /// 1-based column.
    pub column: u32,
}

/// Findings of one validation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Label of what was checked (file name or selection description).
    pub subject_label: String,
    /// Findings in RedPen's order.
    pub diagnostics: Vec<DiagnosticRecord>,
}

impl ValidationReport {
    /// Creates a report.
    #[must_use]
    pub fn new(subject_label: impl Into<String>, diagnostics: Vec<DiagnosticRecord>) -> Self {
        Self {
            subject_label: subject_label.into(),
            diagnostics,
        }
    }

    /// Returns whether RedPen found nothing.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Summary line shown above the findings.
    #[must_use]
    pub fn summary(&self) -> String {
        match self.diagnostics.len() {
            0 => format!("No errors in {}", self.subject_label),
            count => format!("{count} errors in {}", self.subject_label),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawDocumentReport {
    errors: Vec<RawError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    sentence: String,
    line_num: Option<u32>,
    sentence_start_column_num: Option<u32>,
    start_position: Option<RawPosition>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPosition {
    line_num: u32,
    offset: u32,
}

impl RawError {
    /// Raw `(line, offset)`; the nested position wins over the flat fields.
    fn position(&self) -> Option<(u32, u32)> {
        match (&self.start_position, self.line_num) {
            (Some(position), _) => Some((position.line_num, position.offset)),
            (None, Some(line)) => Some((line, self.sentence_start_column_num.unwrap_or(0))),
            (None, None) => None,
        }
    }
}

/// Parses RedPen's standard output into a report.
///
/// `line_offset` is added to every reported line; it is `0` for whole
/// document runs and the zero-based first selected line for selection runs.
///
/// # Errors
///
/// Returns [`ToolError::Unparseable`] carrying `stderr` when `stdout` is not a
/// non-empty JSON array whose first element has an `errors` list, or when an
/// error entry has no position.
pub fn normalize(
    subject_label: impl Into<String>,
    stdout: &str,
    stderr: &str,
    line_offset: u32,
) -> Result<ValidationReport, ToolError> {
    let unparseable = |reason: String| ToolError::Unparseable {
        reason,
        stderr: stderr.to_owned(),
    };
    if stdout.trim().is_empty() {
        return Err(unparseable(String::from("RedPen printed nothing")));
    }
    let documents: Vec<serde_json::Value> =
        serde_json::from_str(stdout).map_err(|error| unparseable(error.to_string()))?;
    let head = documents
        .into_iter()
        .next()
        .ok_or_else(|| unparseable(String::from("report array is empty")))?;
    let document: RawDocumentReport =
        serde_json::from_value(head).map_err(|error| unparseable(error.to_string()))?;

    let diagnostics = document
        .errors
        .into_iter()
        .enumerate()
        .map(|(index, raw)| {
            let (line, offset) = raw
                .position()
                .ok_or_else(|| unparseable(format!("error {index} has no position")))?;
            Ok(DiagnosticRecord {
                message: raw.message,
                preview_text: raw.sentence,
                line: line.saturating_add(line_offset),
                column: offset.saturating_add(1),
            })
        })
        .collect::<Result<Vec<_>, ToolError>>()?;

    Ok(ValidationReport::new(subject_label, diagnostics))
}

#[cfg(test)]
mod tests;
