//! Read-only view of the document a host asks the checker to validate.

use std::path::{Path, PathBuf};

/// Zero-based line and character offset inside a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based character offset within the line.
    pub character: usize,
}

impl Position {
    /// Creates a position.
    #[must_use]
    pub const fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }
}

/// A selected range; `end` is exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    /// First selected position.
    pub start: Position,
    /// Position just past the selection.
    pub end: Position,
}

impl Selection {
    /// Creates a selection, ordering the endpoints.
    #[must_use]
    pub fn new(anchor: Position, head: Position) -> Self {
        if head < anchor {
            Self {
                start: head,
                end: anchor,
            }
        } else {
            Self {
                start: anchor,
                end: head,
            }
        }
    }

    /// Selects whole lines `first..=last` (zero-based).
    #[must_use]
    pub fn lines(first: usize, last: usize) -> Self {
        Self::new(Position::new(first, 0), Position::new(last.saturating_add(1), 0))
    }

    /// Returns whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Snapshot of an editor buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    path: Option<PathBuf>,
    syntax_id: Option<String>,
    title: String,
    text: String,
    selection: Option<Selection>,
}

impl Document {
    /// Creates an unsaved document with the given title and contents.
    #[must_use]
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            ..Self::default()
        }
    }

    /// Sets the location the buffer is saved at.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the editor's syntax identifier.
    #[must_use]
    pub fn with_syntax_id(mut self, syntax_id: impl Into<String>) -> Self {
        self.syntax_id = Some(syntax_id.into());
        self
    }

    /// Sets the current selection.
    #[must_use]
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = Some(selection);
        self
    }

    /// Saved location, absent for unsaved buffers.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Syntax identifier, absent when the editor has no grammar for it.
    #[must_use]
    pub fn syntax_id(&self) -> Option<&str> {
        self.syntax_id.as_deref()
    }

    /// Display title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Full buffer contents.
    #[must_use]
    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    /// Current selection, if any.
    #[must_use]
    pub const fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Lower-cased file extension of the saved path.
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        self.path
            .as_deref()
            .and_then(Path::extension)
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
    }

    /// Text covered by the selection, or `None` when nothing is selected.
    #[must_use]
    pub fn selected_text(&self) -> Option<String> {
        let selection = self.selection.filter(|selection| !selection.is_empty())?;
        let Selection { start, end } = selection;
        let line_count = end.line.saturating_sub(start.line).saturating_add(1);
        let mut selected = String::new();
        for (index, line) in self
            .text
            .split_inclusive('\n')
            .enumerate()
            .skip(start.line)
            .take(line_count)
        {
            let from = if index == start.line { start.character } else { 0 };
            let chars = line.chars().skip(from);
            if index == end.line {
                selected.extend(chars.take(end.character.saturating_sub(from)));
            } else {
                selected.extend(chars);
            }
        }
        Some(selected).filter(|text| !text.is_empty())
    }
}
