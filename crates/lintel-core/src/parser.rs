//! Interface to the external parser
//!
//! The lexer and parser live outside this crate. They hand over a syntax
//! tree and the comment/string ranges for a piece of text, either by
//! implementing [`SourceParser`] or by emitting [`ParsedSource`] as JSON.

use serde::{Deserialize, Serialize};

use crate::syntax::{ExcludedRegion, SyntaxNode};
use crate::{LintelError, Result};

/// Everything the parser reports for one text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedSource {
    pub root: SyntaxNode,
    #[serde(default)]
    pub excluded: Vec<ExcludedRegion>,
}

impl ParsedSource {
    pub fn new(root: SyntaxNode, excluded: Vec<ExcludedRegion>) -> Self {
        Self { root, excluded }
    }

    /// Decode the JSON form of parser output
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| LintelError::parse_error(format!("invalid parser output: {e}")))
    }
}

/// A parser able to (re-)parse text into a tree
///
/// Correctable rules rewrite the text, after which the previous tree is
/// stale; the rule runner asks the parser for a fresh one before the next
/// rule reads the buffer.
pub trait SourceParser: Send + Sync {
    fn parse(&self, text: &str) -> Result<ParsedSource>;
}

impl<F> SourceParser for F
where
    F: Fn(&str) -> Result<ParsedSource> + Send + Sync,
{
    fn parse(&self, text: &str) -> Result<ParsedSource> {
        self(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceDocument;
    use crate::syntax::{NodeKind, RegionKind};

    #[test]
    fn test_from_json() {
        let json = r#"{
            "root": {"kind": "source_file", "offset": 0, "length": 12},
            "excluded": [{"kind": "comment", "offset": 0, "length": 12}]
        }"#;
        let parsed = ParsedSource::from_json(json).unwrap();
        assert_eq!(parsed.root.kind, NodeKind::SourceFile);
        assert_eq!(parsed.excluded[0].kind, RegionKind::Comment);
    }

    #[test]
    fn test_from_json_reports_parse_error() {
        let err = ParsedSource::from_json("{\"root\": 3}").unwrap_err();
        assert!(matches!(err, LintelError::ParseError { .. }));
    }

    #[test]
    fn test_closure_parser_builds_document() {
        let parser = |text: &str| -> Result<ParsedSource> {
            Ok(ParsedSource::new(
                SyntaxNode::new(NodeKind::SourceFile, 0, text.len()),
                Vec::new(),
            ))
        };
        let document = SourceDocument::parse("let x = 1\n", &parser).unwrap();
        assert_eq!(document.root().length, 10);
    }

    #[test]
    fn test_parse_rejects_contract_violation() {
        let parser = |_: &str| -> Result<ParsedSource> {
            Ok(ParsedSource::new(
                SyntaxNode::new(NodeKind::SourceFile, 0, 100),
                Vec::new(),
            ))
        };
        assert!(SourceDocument::parse("short", &parser).is_err());
    }
}
