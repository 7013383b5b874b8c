//! Built-in rules
//!
//! Each rule module exports its rule id, its default metadata and the rule
//! type. [`BuiltinRules`] instantiates them from a [`RulesConfiguration`].

use lintel_core::{
    ErrorKind, LintelError, Result, Rule, RuleMetadata, RulesConfiguration, SyntaxNode,
};
use tracing::{debug, warn};

pub mod file_types_order;
pub mod multiline_literal_brackets;
pub mod type_contents_order;
pub mod vertical_whitespace_between_cases;

pub use file_types_order::{FileType, FileTypesOrderRule};
pub use multiline_literal_brackets::MultilineLiteralBracketsRule;
pub use type_contents_order::{TypeContent, TypeContentsOrderRule};
pub use vertical_whitespace_between_cases::VerticalWhitespaceBetweenCasesRule;

/// Registry of the rules shipped with lintel
pub struct BuiltinRules;

impl BuiltinRules {
    /// Default metadata of every built-in rule
    pub fn metadata() -> Vec<RuleMetadata> {
        vec![
            multiline_literal_brackets::metadata(),
            type_contents_order::metadata(),
            file_types_order::metadata(),
            vertical_whitespace_between_cases::metadata(),
        ]
    }

    /// Every built-in rule with its default settings
    pub fn all() -> Result<Vec<Box<dyn Rule>>> {
        Self::configured(&RulesConfiguration::all())
    }

    /// The rules `config` enables, with configured severities and options
    ///
    /// Keys naming no built-in rule and malformed options are rejected.
    pub fn configured(config: &RulesConfiguration) -> Result<Vec<Box<dyn Rule>>> {
        config.check_rule_keys(&Self::metadata())?;

        let mut rules: Vec<Box<dyn Rule>> = Vec::new();

        let meta = multiline_literal_brackets::metadata();
        if config.is_enabled(&meta) {
            rules.push(Box::new(
                MultilineLiteralBracketsRule::new()?.with_severity(config.severity_for(&meta)),
            ));
        }

        let meta = type_contents_order::metadata();
        if config.is_enabled(&meta) {
            rules.push(Box::new(
                TypeContentsOrderRule::from_config(config.rule(&meta))?
                    .with_severity(config.severity_for(&meta)),
            ));
        }

        let meta = file_types_order::metadata();
        if config.is_enabled(&meta) {
            rules.push(Box::new(
                FileTypesOrderRule::from_config(config.rule(&meta))?
                    .with_severity(config.severity_for(&meta)),
            ));
        }

        let meta = vertical_whitespace_between_cases::metadata();
        if config.is_enabled(&meta) {
            rules.push(Box::new(
                VerticalWhitespaceBetweenCasesRule::new()?
                    .with_severity(config.severity_for(&meta)),
            ));
        }

        Ok(rules)
    }
}

/// Decide whether a failed node check only skips the node
///
/// Out-of-range offsets and offsets inside a character skip the node for
/// this rule; anything else fails the rule.
pub(crate) fn skip_node(rule_id: &str, node: &SyntaxNode, err: LintelError) -> Result<()> {
    match err.kind() {
        ErrorKind::OutOfRange => {
            debug!(
                rule = rule_id,
                kind = ?node.kind,
                offset = node.offset,
                "skipping node: {}",
                err
            );
            Ok(())
        }
        ErrorKind::Encoding => {
            warn!(
                rule = rule_id,
                kind = ?node.kind,
                offset = node.offset,
                "skipping node: {}",
                err
            );
            Ok(())
        }
        _ => Err(err),
    }
}
