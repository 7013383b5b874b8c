//! Multiline literal bracket placement
//!
//! A multiline array or dictionary literal must open with a line break
//! right after its opening bracket and close with a line break right before
//! its closing bracket. Single-line literals are exempt.

use lintel_core::{
    Result, Rule, RuleCategory, RuleMetadata, Severity, SourceDocument, SourceView, SyntaxNode,
    Violation,
};
use regex::Regex;

use super::skip_node;

/// Rule ID for multiline literal bracket placement
pub const MULTILINE_LITERAL_BRACKETS: &str = "style/multiline-literal-brackets";

const OPENING_REASON: &str = "Opening bracket of a multiline literal must be followed by a line break";
const CLOSING_REASON: &str = "Closing bracket of a multiline literal must be preceded by a line break";

pub fn metadata() -> RuleMetadata {
    RuleMetadata::new(
        RuleCategory::Style,
        "multiline-literal-brackets",
        "Multiline Literal Brackets",
        "Multiline literals should have their surrounding brackets in a new line.",
    )
    .opt_in()
}

/// Checks the whitespace just inside container literal delimiters
pub struct MultilineLiteralBracketsRule {
    metadata: RuleMetadata,
    body_begin: Regex,
    body_end: Regex,
}

impl MultilineLiteralBracketsRule {
    pub fn new() -> Result<Self> {
        Ok(Self {
            metadata: metadata(),
            body_begin: Regex::new(r"\A[ \t]*\n")?,
            body_end: Regex::new(r"\n[ \t]*\z")?,
        })
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.metadata.severity = severity;
        self
    }

    /// Violations for a single container node: none, one or two
    fn check_literal(&self, view: SourceView<'_>, node: &SyntaxNode) -> Result<Vec<Violation>> {
        let body = view.body(node)?;
        if !body.contains('\n') {
            return Ok(Vec::new());
        }

        // body() succeeded, so both halves of the body range are present
        let (Some(body_offset), Some(body_length)) = (node.body_offset, node.body_length) else {
            return Ok(Vec::new());
        };

        let mut violations = Vec::new();
        if !self.body_begin.is_match(body) {
            violations.push(Violation::new(
                &self.metadata.id,
                self.metadata.severity,
                view.location(body_offset)?,
                OPENING_REASON,
            ));
        }
        if !self.body_end.is_match(body) {
            violations.push(Violation::new(
                &self.metadata.id,
                self.metadata.severity,
                view.location(body_offset + body_length)?,
                CLOSING_REASON,
            ));
        }

        Ok(violations)
    }
}

impl Rule for MultilineLiteralBracketsRule {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn validate(&self, document: &SourceDocument) -> Result<Vec<Violation>> {
        let view = document.view();
        let mut violations = Vec::new();

        let literals = std::iter::once(view.root())
            .chain(view.descendants(view.root()))
            .filter(|node| node.kind.is_container_literal());

        for node in literals {
            match self.check_literal(view, node) {
                Ok(found) => violations.extend(found),
                Err(err) => skip_node(&self.metadata.id, node, err)?,
            }
        }

        violations.sort_by_key(|violation| violation.location.offset);
        Ok(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lintel_core::NodeKind;

    /// Document whose only literal is an array spanning `[`..`]` in `text`
    fn array_document(text: &str) -> SourceDocument {
        let open = text.find('[').unwrap();
        let close = text.rfind(']').unwrap();
        let array = SyntaxNode::new(NodeKind::Array, open, close - open + 1)
            .with_body(open + 1, close - open - 1);
        let root = SyntaxNode::new(NodeKind::SourceFile, 0, text.len()).with_child(array);
        SourceDocument::new(text, root)
    }

    fn offsets(text: &str) -> Vec<usize> {
        let rule = MultilineLiteralBracketsRule::new().unwrap();
        rule.validate(&array_document(text))
            .unwrap()
            .iter()
            .map(|v| v.location.offset)
            .collect()
    }

    #[test]
    fn test_single_line_is_exempt() {
        assert!(offsets("let trio = [\"harry\", \"ronald\", \"hermione\"]\n").is_empty());
    }

    #[test]
    fn test_brackets_on_own_lines() {
        let text = "let trio = [\n    \"harry\",\n    \"ronald\"\n]\n";
        assert!(offsets(text).is_empty());
    }

    #[test]
    fn test_several_items_per_line_pass() {
        let text = "let trio = [\n    \"harry\", \"ronald\", \"hermione\"\n]\n";
        assert!(offsets(text).is_empty());
    }

    #[test]
    fn test_both_brackets_violate() {
        let text = "let trio = [\"harry\",\n\"ronald\",\n\"hermione\"]\n";
        let open = text.find('[').unwrap();
        let close = text.rfind(']').unwrap();

        assert_eq!(offsets(text), vec![open + 1, close]);
    }

    #[test]
    fn test_only_opening_violates() {
        let text = "let trio = [\"harry\",\n            \"ronald\"\n]\n";
        assert_eq!(offsets(text), vec![text.find('[').unwrap() + 1]);
    }

    #[test]
    fn test_only_closing_violates() {
        let text = "let trio = [\n    \"harry\",\n    \"ronald\"]\n";
        assert_eq!(offsets(text), vec![text.rfind(']').unwrap()]);
    }

    #[test]
    fn test_trailing_spaces_before_closing_bracket_pass() {
        let text = "_ = [\n    1,\n    2\n    ]\n";
        assert!(offsets(text).is_empty());
    }

    #[test]
    fn test_nested_literal_in_type_is_checked() {
        let text = "class Hogwarts {\n    let houseCup = [\n        \"gryffinder\": 460,\n        \"slytherin\": 450]\n}\n";
        let open = text.find('[').unwrap();
        let close = text.rfind(']').unwrap();
        let dictionary = SyntaxNode::new(NodeKind::Dictionary, open, close - open + 1)
            .with_body(open + 1, close - open - 1);
        let property = SyntaxNode::new(NodeKind::VarInstance, open - 15, close - open + 16)
            .with_name("houseCup")
            .with_child(dictionary);
        let class = SyntaxNode::new(NodeKind::Class, 0, text.len() - 1)
            .with_name("Hogwarts")
            .with_child(property);
        let root = SyntaxNode::new(NodeKind::SourceFile, 0, text.len()).with_child(class);
        let document = SourceDocument::new(text, root);
        assert!(document.validate().is_ok());

        let violations = MultilineLiteralBracketsRule::new()
            .unwrap()
            .validate(&document)
            .unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].location.offset, close);
        assert_eq!(violations[0].location.line, 4);
        assert_eq!(violations[0].reason, CLOSING_REASON);
    }

    #[test]
    fn test_missing_body_and_bad_offsets_are_skipped() {
        let text = "let a = [\n1]\nlet b = [名\n]\n";
        let no_body = SyntaxNode::new(NodeKind::Array, 8, 4);
        // Body offset inside the three-byte character
        let inside_char = SyntaxNode::new(NodeKind::Array, 21, 6).with_body(23, 3);
        let root = SyntaxNode::new(NodeKind::SourceFile, 0, text.len())
            .with_child(no_body)
            .with_child(inside_char);
        let document = SourceDocument::new(text, root);

        let violations = MultilineLiteralBracketsRule::new()
            .unwrap()
            .validate(&document)
            .unwrap();
        assert!(violations.is_empty());
    }
}
