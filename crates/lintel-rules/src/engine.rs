//! Rule runner
//!
//! Diagnostic passes run every enabled rule over the same immutable
//! document in parallel. Correction passes run correctable rules one at a
//! time, handing each rule a freshly parsed document built from the text
//! the previous rule produced.

use lintel_core::{
    Correction, LintelError, Result, Rule, RulesConfiguration, SourceDocument, SourceParser,
    Violation,
};
use rayon::prelude::*;
use tracing::{debug, error, info};

use crate::builtin::BuiltinRules;

/// A rule that failed during a pass
#[derive(Debug)]
pub struct RuleFailure {
    pub rule_id: String,
    pub error: LintelError,
}

/// Outcome of a diagnostic pass
#[derive(Debug, Default)]
pub struct LintResult {
    /// Violations of every rule that completed, by offset then rule id
    pub violations: Vec<Violation>,
    /// Rules whose violations are missing because they failed
    pub failures: Vec<RuleFailure>,
}

/// Outcome of a correction pass
#[derive(Debug)]
pub struct CorrectionReport {
    /// Document for the final text, re-parsed after the last rewrite
    pub document: SourceDocument,
    /// Corrections in the order the rules applied them
    ///
    /// Each correction's location refers to the text as its rule saw it.
    pub corrections: Vec<Correction>,
    /// Correctable rules that failed and were skipped
    pub failures: Vec<RuleFailure>,
}

impl CorrectionReport {
    pub fn text(&self) -> &str {
        self.document.text()
    }

    pub fn is_unchanged(&self) -> bool {
        self.corrections.is_empty()
    }
}

/// Runs a fixed set of rules over documents
pub struct Linter {
    rules: Vec<Box<dyn Rule>>,
}

impl Linter {
    /// Build the built-in rules enabled by `config`
    pub fn new(config: RulesConfiguration) -> Result<Self> {
        let rules = BuiltinRules::configured(&config)?;
        info!("Initialized linter with {} rules", rules.len());
        Ok(Self { rules })
    }

    /// Run an explicit set of rules
    pub fn with_rules(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    pub fn rule_ids(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Violations of every rule, failed rules omitted
    pub fn lint(&self, document: &SourceDocument) -> Vec<Violation> {
        self.lint_with_failures(document).violations
    }

    /// Run every rule in parallel, keeping track of the rules that failed
    pub fn lint_with_failures(&self, document: &SourceDocument) -> LintResult {
        let outcomes: Vec<(&str, Result<Vec<Violation>>)> = self
            .rules
            .par_iter()
            .map(|rule| (rule.id(), rule.validate(document)))
            .collect();

        let mut result = LintResult::default();
        for (rule_id, outcome) in outcomes {
            match outcome {
                Ok(violations) => {
                    debug!("Rule '{}' found {} violations", rule_id, violations.len());
                    result.violations.extend(violations);
                }
                Err(err) => {
                    error!("Rule '{}' failed: {}", rule_id, err);
                    result.failures.push(RuleFailure {
                        rule_id: rule_id.to_string(),
                        error: err,
                    });
                }
            }
        }

        // Sort violations for deterministic output
        result.violations.sort_by(|a, b| {
            a.location
                .offset
                .cmp(&b.location.offset)
                .then_with(|| a.rule_id.cmp(&b.rule_id))
        });

        info!(
            "Linted {} with {} rules: {} violations, {} failed rules",
            document
                .file()
                .map_or_else(|| "<input>".to_string(), |f| f.display().to_string()),
            self.rules.len(),
            result.violations.len(),
            result.failures.len()
        );

        result
    }

    /// Apply every correctable rule in turn
    ///
    /// After a rule rewrites the text, `parser` re-parses it so the next rule
    /// sees a consistent tree. A rule that fails is skipped; a rewritten text
    /// the parser rejects fails the whole pass, leaving `document` untouched.
    pub fn correct(
        &self,
        document: &SourceDocument,
        parser: &dyn SourceParser,
    ) -> Result<CorrectionReport> {
        let mut current = document.clone();
        let mut corrections = Vec::new();
        let mut failures = Vec::new();

        for rule in self.rules.iter().filter_map(|rule| rule.as_correctable()) {
            let outcome = match rule.correct(&current) {
                Ok(outcome) => outcome,
                Err(err) => {
                    error!("Correction by rule '{}' failed: {}", rule.id(), err);
                    failures.push(RuleFailure {
                        rule_id: rule.id().to_string(),
                        error: err,
                    });
                    continue;
                }
            };

            let Some(rewritten) = outcome.rewritten else {
                continue;
            };

            debug!(
                "Rule '{}' applied {} corrections",
                rule.id(),
                outcome.corrections.len()
            );
            corrections.extend(outcome.corrections);

            let reparsed = SourceDocument::parse(rewritten, parser)?;
            current = match document.file() {
                Some(file) => reparsed.with_file(file),
                None => reparsed,
            };
        }

        info!("Applied {} corrections", corrections.len());

        Ok(CorrectionReport {
            document: current,
            corrections,
            failures,
        })
    }
}
