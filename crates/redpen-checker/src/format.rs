//! Mapping from editor syntax identifiers to RedPen input formats.
//!
//! RedPen selects its input parser with the `-f` flag. Editors describe a
//! document by the grammar it is highlighted with, so the checker translates
//! that identifier into one of the format tokens RedPen understands.

use serde::Serialize;
use strum::{Display, EnumString, IntoStaticStr};

/// Input format token accepted by RedPen's `-f` flag.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Display, EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FormatToken {
    /// Plain text.
    Plain,
    /// Markdown, including GitHub flavoured Markdown.
    Markdown,
    /// Textile and other wiki markup.
    Wiki,
    /// `AsciiDoc`.
    Asciidoc,
    /// LaTeX sources.
    Latex,
    /// Java properties files.
    Properties,
}

impl FormatToken {
    /// Returns the token exactly as RedPen expects it on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Detects the RedPen input format for an editor syntax identifier.
///
/// Matching is exact and case sensitive. Unknown identifiers fall back to
/// [`FormatToken::Plain`].
#[must_use]
pub fn detect(syntax_id: &str) -> FormatToken {
    match syntax_id {
        "gfm" | "md" => FormatToken::Markdown,
        "textile-html" => FormatToken::Wiki,
        "asciidoc-source" => FormatToken::Asciidoc,
        "latex-tex" => FormatToken::Latex,
        "java-properties-source" => FormatToken::Properties,
        _ => FormatToken::Plain,
    }
}
