//! Version gating of RedPen input formats.
//!
//! RedPen gained `AsciiDoc` support in 1.3 and LaTeX support in 1.4. Before a
//! document is checked the installed tool is probed with `-version`, the
//! reported version is turned into a [`SupportedFormats`] set, and the
//! document's format must be a member of that set.

use std::collections::BTreeSet;
use std::fmt;

use tracing::debug;

use crate::document::Document;
use crate::error::CheckError;
use crate::format::{FormatToken, detect};
use crate::invocation::{ToolInvocation, ToolSettings};
use crate::notify::Notifier;
use crate::process::ToolRunner;

const VERSION_TARGET: &str = "redpen_checker::version";

/// Formats every RedPen release understands.
const BASELINE_FORMATS: [FormatToken; 4] = [
    FormatToken::Plain,
    FormatToken::Markdown,
    FormatToken::Wiki,
    FormatToken::Properties,
];

/// Formats introduced by later releases, keyed by the first release
/// supporting them.
const VERSIONED_FORMATS: [(VersionInfo, FormatToken); 2] = [
    (VersionInfo::new(1, 3), FormatToken::Asciidoc),
    (VersionInfo::new(1, 4), FormatToken::Latex),
];

/// Major and minor components of a RedPen release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionInfo {
    /// Major version.
    pub major: u32,
    /// Minor version.
    pub minor: u32,
}

impl VersionInfo {
    /// Creates a version from its components.
    #[must_use]
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Parses `major.minor[.anything]`, ignoring surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::EmptyProbeOutput`] for blank input and
    /// [`CheckError::VersionParse`] when the first two components are not
    /// integers.
    pub fn parse(raw: &str) -> Result<Self, CheckError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CheckError::EmptyProbeOutput);
        }
        let invalid = || CheckError::VersionParse {
            raw: trimmed.to_owned(),
        };
        let mut parts = trimmed.split('.');
        let major = parts
            .next()
            .and_then(|part| part.trim().parse().ok())
            .ok_or_else(invalid)?;
        let minor = parts
            .next()
            .and_then(|part| part.trim().parse().ok())
            .ok_or_else(invalid)?;
        Ok(Self::new(major, minor))
    }
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Formats a particular RedPen release can check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedFormats {
    formats: BTreeSet<FormatToken>,
}

impl SupportedFormats {
    /// Builds the supported set for a release.
    ///
    /// Thresholds compare `(major, minor)` pairs, so the set only grows as
    /// the version increases.
    #[must_use]
    pub fn for_version(version: VersionInfo) -> Self {
        let mut formats: BTreeSet<FormatToken> = BASELINE_FORMATS.into_iter().collect();
        formats.extend(
            VERSIONED_FORMATS
                .iter()
                .filter(|(since, _)| version >= *since)
                .map(|(_, format)| *format),
        );
        Self { formats }
    }

    /// Returns whether `format` can be checked.
    #[must_use]
    pub fn contains(&self, format: FormatToken) -> bool {
        self.formats.contains(&format)
    }

    /// Iterates over the supported formats in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = FormatToken> + '_ {
        self.formats.iter().copied()
    }

    /// Returns whether every format in `self` is also in `other`.
    #[must_use]
    pub fn is_subset(&self, other: &Self) -> bool {
        self.formats.is_subset(&other.formats)
    }
}

/// Outcome of gating a document against the installed RedPen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// The document can be checked with the given format.
    Accepted {
        /// Format passed to RedPen.
        format: FormatToken,
        /// Probed RedPen version.
        version: VersionInfo,
    },
    /// The installed release cannot check this format.
    UnsupportedFormat {
        /// Format the document would need.
        format: FormatToken,
        /// Probed RedPen version.
        version: VersionInfo,
    },
    /// The document has no syntax identifier to derive a format from.
    UnknownSyntax,
}

impl GateDecision {
    /// Returns whether the document may be checked.
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// Decides whether a document's format is supported by a release.
#[must_use]
pub fn gate(version: VersionInfo, syntax_id: Option<&str>) -> GateDecision {
    let Some(syntax_id) = syntax_id else {
        return GateDecision::UnknownSyntax;
    };
    let format = detect(syntax_id);
    if SupportedFormats::for_version(version).contains(format) {
        GateDecision::Accepted { format, version }
    } else {
        GateDecision::UnsupportedFormat { format, version }
    }
}

/// Probes the installed RedPen and gates documents against its version.
#[derive(Debug)]
pub struct VersionGate<'a, R> {
    runner: &'a R,
    settings: &'a ToolSettings,
}

impl<'a, R: ToolRunner> VersionGate<'a, R> {
    /// Creates a gate that probes through `runner`.
    #[must_use]
    pub const fn new(runner: &'a R, settings: &'a ToolSettings) -> Self {
        Self { runner, settings }
    }

    /// Runs `<tool> -version` and parses the reported version.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::ConfigMissing`] without spawning anything when no
    /// `JAVA_HOME` is configured, [`CheckError::ProbeFailed`] on a non-zero
    /// exit, [`CheckError::EmptyProbeOutput`] or [`CheckError::VersionParse`]
    /// for unusable output, and any launch error from the runner.
    pub async fn probe(&self) -> Result<VersionInfo, CheckError> {
        let invocation = ToolInvocation::probe(self.settings)?;
        let result = self.runner.run(invocation).await?;
        if result.exit_code != 0 {
            return Err(CheckError::ProbeFailed {
                status: result.exit_code,
                stderr: result.stderr,
            });
        }
        debug!(
            target: VERSION_TARGET,
            output = %result.stdout.trim(),
            "RedPen version probe succeeded"
        );
        VersionInfo::parse(&result.stdout)
    }

    /// Probes the tool and gates `document` against the reported version.
    ///
    /// # Errors
    ///
    /// Propagates every error from [`VersionGate::probe`].
    pub async fn check(&self, document: &Document) -> Result<GateDecision, CheckError> {
        let version = self.probe().await?;
        let decision = gate(version, document.syntax_id());
        debug!(
            target: VERSION_TARGET,
            document = %document.title(),
            %version,
            ?decision,
            "gated document format"
        );
        Ok(decision)
    }

    /// Probes the tool and reports whether `document` can be checked.
    ///
    /// Failures are sent to `notifier` and resolve to `false`. An unsupported
    /// format or a missing syntax identifier resolves to `false` silently.
    pub async fn probe_and_gate<N: Notifier + ?Sized>(
        &self,
        document: &Document,
        notifier: &N,
    ) -> bool {
        match self.check(document).await {
            Ok(decision) => decision.is_accepted(),
            Err(error) => {
                notifier.error(&error.to_string(), error.stderr());
                false
            }
        }
    }
}
