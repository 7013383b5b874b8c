//! Violation and correction records produced by rules

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::autofix::EditSpan;

/// Severity levels for violations
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational messages
    Info,
    /// Warnings that should be addressed
    Warning,
    /// Errors that must be fixed
    Error,
}

/// Location information for a violation or correction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path, when the document was loaded from one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Byte offset in the original text
    pub offset: usize,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (0-based, in characters)
    pub column: usize,
}

/// A rule violation found in a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Identifier of the rule that found the violation
    pub rule_id: String,
    /// Severity level
    pub severity: Severity,
    /// Where the violation was found
    pub location: Location,
    /// Human-readable reason
    pub reason: String,
}

/// One text rewrite performed by a correctable rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correction {
    /// Identifier of the rule that performed the rewrite
    pub rule_id: String,
    /// Location of the edit in the text before any edit was applied
    pub location: Location,
    /// Description of what the edit does
    pub description: String,
    /// The edit itself, in original-text offsets
    pub edit: EditSpan,
}

impl Location {
    /// Create a location without a file path
    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Self {
            file: None,
            offset,
            line,
            column,
        }
    }

    /// Attach a file path
    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }
}

impl Violation {
    /// Create a new violation
    pub fn new(
        rule_id: impl Into<String>,
        severity: Severity,
        location: Location,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            severity,
            location,
            reason: reason.into(),
        }
    }
}

impl Correction {
    /// Create a new correction record
    pub fn new(
        rule_id: impl Into<String>,
        location: Location,
        description: impl Into<String>,
        edit: EditSpan,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            location,
            description: description.into(),
            edit,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}:{}:{}", file.display(), self.line, self.column),
            None => write!(f, "<input>:{}:{}", self.line, self.column),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}[{}]: {}",
            self.location, self.severity, self.rule_id, self.reason
        )
    }
}

impl fmt::Display for Correction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: corrected[{}]: {}",
            self.location, self.rule_id, self.description
        )
    }
}
