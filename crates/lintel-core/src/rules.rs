//! Rule traits and metadata

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::autofix::CorrectionOutcome;
use crate::diagnostics::{Severity, Violation};
use crate::source::SourceDocument;
use crate::Result;

/// Metadata associated with a rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleMetadata {
    /// Unique identifier, `category/slug`
    pub id: String,
    /// Human-readable name for the rule
    pub name: String,
    /// What the rule checks
    pub description: String,
    /// Severity of the violations the rule reports
    pub severity: Severity,
    /// Category this rule belongs to
    pub category: RuleCategory,
    /// Rules that only run when configured explicitly
    pub opt_in: bool,
}

impl RuleMetadata {
    /// Build metadata whose id is derived from the category and `slug`
    pub fn new(
        category: RuleCategory,
        slug: &str,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: format!("{}/{}", category.slug(), slug),
            name: name.into(),
            description: description.into(),
            severity: Severity::Warning,
            category,
            opt_in: false,
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn opt_in(mut self) -> Self {
        self.opt_in = true;
        self
    }

    /// The id without its category prefix
    pub fn slug(&self) -> &str {
        self.id
            .split_once('/')
            .map_or(self.id.as_str(), |(_, slug)| slug)
    }
}

/// Categories for organizing rules
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RuleCategory {
    /// Layout and formatting conventions
    Style,
    /// Likely mistakes
    Lint,
    /// Preferred ways of expressing common constructs
    Idiomatic,
    /// Size and complexity limits
    Metrics,
    /// Performance suggestions
    Performance,
    /// Custom category using a bespoke slug
    Custom(String),
}

impl RuleCategory {
    /// Return the kebab-case slug used for IDs and filtering
    pub fn slug(&self) -> &str {
        match self {
            RuleCategory::Style => "style",
            RuleCategory::Lint => "lint",
            RuleCategory::Idiomatic => "idiomatic",
            RuleCategory::Metrics => "metrics",
            RuleCategory::Performance => "performance",
            RuleCategory::Custom(name) => name.as_str(),
        }
    }

    /// Create a category from its slug, mapping unknown slugs to custom categories
    pub fn from_slug(slug: &str) -> Self {
        match slug {
            "style" => RuleCategory::Style,
            "lint" => RuleCategory::Lint,
            "idiomatic" => RuleCategory::Idiomatic,
            "metrics" => RuleCategory::Metrics,
            "performance" => RuleCategory::Performance,
            other => RuleCategory::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl Serialize for RuleCategory {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.slug())
    }
}

impl<'de> Deserialize<'de> for RuleCategory {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let slug = String::deserialize(deserializer)?;
        Ok(RuleCategory::from_slug(&slug))
    }
}

/// A rule that inspects a document and reports violations
///
/// Rules hold no per-document state, so one instance may validate many
/// documents, including concurrently.
pub trait Rule: Send + Sync {
    fn metadata(&self) -> &RuleMetadata;

    fn id(&self) -> &str {
        &self.metadata().id
    }

    /// Violations in `document`, ordered by offset
    fn validate(&self, document: &SourceDocument) -> Result<Vec<Violation>>;

    /// This rule as a correctable rule, if it can rewrite text
    fn as_correctable(&self) -> Option<&dyn CorrectableRule> {
        None
    }
}

/// A rule that can also rewrite the text to fix what it reports
pub trait CorrectableRule: Rule {
    /// Correct every violation at once
    ///
    /// Returns the corrections performed and the whole rewritten buffer; the
    /// document itself is never modified.
    fn correct(&self, document: &SourceDocument) -> Result<CorrectionOutcome>;
}
