//! Blank line between switch cases
//!
//! A `case` or `default` label that directly follows a non-blank statement
//! line needs an empty line before it. Labels following the opening brace
//! of the switch are exempt, as are labels with their body on the same line.

use lintel_core::{
    CorrectableRule, CorrectionOutcome, PatternMatcher, Result, Rule, RuleCategory, RuleMetadata,
    Severity, SourceDocument, Violation,
};
use tracing::debug;

/// Rule ID for vertical whitespace between cases
pub const VERTICAL_WHITESPACE_BETWEEN_CASES: &str = "style/vertical-whitespace-between-cases";

/// Group 1 is the preceding statement line, group 2 the label line
const LABEL_AFTER_STATEMENT: &str = r"([^\n{][ \t]*\n)([ \t]*(?:case[^\n]+|default):[ \t]*\n)";

const REASON: &str = "Include a vertical whitespace (empty line) between cases in switch statements.";
const CORRECTION: &str = "Inserted an empty line before the case label";

pub fn metadata() -> RuleMetadata {
    RuleMetadata::new(
        RuleCategory::Style,
        "vertical-whitespace-between-cases",
        "Vertical Whitespace Between Cases",
        "Include a vertical whitespace (empty line) between cases in switch statements.",
    )
    .opt_in()
}

/// Requires an empty line before each `case`/`default` label
pub struct VerticalWhitespaceBetweenCasesRule {
    metadata: RuleMetadata,
    matcher: PatternMatcher,
}

impl VerticalWhitespaceBetweenCasesRule {
    pub fn new() -> Result<Self> {
        let matcher = PatternMatcher::new(LABEL_AFTER_STATEMENT)?
            .with_location_group(2)
            .with_replacement("${1}\n${2}");
        Ok(Self {
            metadata: metadata(),
            matcher,
        })
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.metadata.severity = severity;
        self
    }
}

impl Rule for VerticalWhitespaceBetweenCasesRule {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn validate(&self, document: &SourceDocument) -> Result<Vec<Violation>> {
        self.matcher.diagnose(
            document.view(),
            &self.metadata.id,
            self.metadata.severity,
            REASON,
        )
    }

    fn as_correctable(&self) -> Option<&dyn CorrectableRule> {
        Some(self)
    }
}

impl CorrectableRule for VerticalWhitespaceBetweenCasesRule {
    fn correct(&self, document: &SourceDocument) -> Result<CorrectionOutcome> {
        let outcome = self
            .matcher
            .correct(document.view(), &self.metadata.id, CORRECTION)?;
        debug!(
            rule = %self.metadata.id,
            corrections = outcome.corrections.len(),
            "corrected case spacing"
        );
        Ok(outcome)
    }
}
