//! Syntax identifiers inferred from file extensions.
//!
//! Editors attach a syntax identifier to every buffer. The CLI has only a
//! path, so it guesses the identifier an editor would use from the file
//! extension.

use std::path::Path;

/// Identifier used when nothing more specific matches.
pub(crate) const PLAIN_TEXT_SYNTAX: &str = "text-plain";

pub(crate) fn infer_syntax_id(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("md" | "markdown") => "md",
        Some("textile") => "textile-html",
        Some("adoc" | "asciidoc") => "asciidoc-source",
        Some("tex") => "latex-tex",
        Some("properties") => "java-properties-source",
        _ => PLAIN_TEXT_SYNTAX,
    }
}
