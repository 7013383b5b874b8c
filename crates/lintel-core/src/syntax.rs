//! Syntax tree handed over by the external parser
//!
//! Nodes carry byte ranges into the raw text they were parsed from. The
//! tree is plain data: it can be deserialized from the parser's JSON output
//! or assembled with the builder methods on [`SyntaxNode`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::Range;

use crate::{LintelError, Result};

/// Closed set of node kinds the parser reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// The whole file
    SourceFile,

    // Literals
    Array,
    Dictionary,
    StringLiteral,

    // Type declarations
    Class,
    Struct,
    Enum,
    Protocol,
    Extension,

    // Members
    EnumCase,
    EnumElement,
    TypeAlias,
    AssociatedType,
    VarGlobal,
    VarLocal,
    VarParameter,
    VarInstance,
    VarClass,
    VarStatic,
    FunctionFree,
    FunctionMethodInstance,
    FunctionMethodClass,
    FunctionMethodStatic,
    FunctionSubscript,

    // Expressions
    Call,
    Argument,
    Closure,
    Tuple,

    // Statements
    Brace,
    If,
    Guard,
    For,
    While,
    Switch,
    Case,
}

impl NodeKind {
    /// Bracketed composite literals whose body may be validated
    pub fn is_container_literal(self) -> bool {
        matches!(self, NodeKind::Array | NodeKind::Dictionary)
    }

    /// Declarations that introduce a named type or extend one
    pub fn is_type_declaration(self) -> bool {
        matches!(
            self,
            NodeKind::Class
                | NodeKind::Struct
                | NodeKind::Enum
                | NodeKind::Protocol
                | NodeKind::Extension
        )
    }
}

/// Declaration attributes the parser attaches to nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    IbOutlet,
    IbInspectable,
    IbAction,
    ObjC,
    Override,
    Final,
    Lazy,
    Weak,
}

/// A node of the parser's syntax tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    /// Byte offset of the node's first byte
    pub offset: usize,
    /// Length of the node in bytes
    pub length: usize,
    /// Byte offset of the span strictly inside the node's delimiters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_offset: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub attributes: BTreeSet<Attribute>,
    /// Child nodes in ascending offset order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    pub fn new(kind: NodeKind, offset: usize, length: usize) -> Self {
        Self {
            kind,
            offset,
            length,
            body_offset: None,
            body_length: None,
            name: None,
            attributes: BTreeSet::new(),
            children: Vec::new(),
        }
    }

    pub fn with_body(mut self, body_offset: usize, body_length: usize) -> Self {
        self.body_offset = Some(body_offset);
        self.body_length = Some(body_length);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.insert(attribute);
        self
    }

    pub fn with_child(mut self, child: SyntaxNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = SyntaxNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// Exclusive end offset of the node
    pub fn end(&self) -> usize {
        self.offset.saturating_add(self.length)
    }

    pub fn range(&self) -> Range<usize> {
        self.offset..self.end()
    }

    /// Body range, if the parser reported both halves of it
    pub fn body_range(&self) -> Option<Range<usize>> {
        match (self.body_offset, self.body_length) {
            (Some(offset), Some(length)) => Some(offset..offset.saturating_add(length)),
            _ => None,
        }
    }

    pub fn has_attribute(&self, attribute: Attribute) -> bool {
        self.attributes.contains(&attribute)
    }

    /// Name as reported by the parser, or an empty string
    pub fn name_or_empty(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// Check that every child lies inside its parent and that siblings do not
    /// overlap, recursively
    pub fn validate(&self) -> Result<()> {
        let mut previous_end: Option<usize> = None;
        let mut children: Vec<&SyntaxNode> = self.children.iter().collect();
        children.sort_by_key(|child| child.offset);

        for child in children {
            if child.offset < self.offset || child.end() > self.end() {
                return Err(LintelError::malformed_tree(format!(
                    "{:?} at {}..{} is not contained in parent {:?} at {}..{}",
                    child.kind,
                    child.offset,
                    child.end(),
                    self.kind,
                    self.offset,
                    self.end()
                )));
            }
            if let Some(end) = previous_end
                && child.offset < end
            {
                return Err(LintelError::malformed_tree(format!(
                    "{:?} at {} overlaps its previous sibling ending at {}",
                    child.kind, child.offset, end
                )));
            }
            previous_end = Some(child.end());
            child.validate()?;
        }

        Ok(())
    }
}

/// Kind of token range the parser marks as excluded from pattern matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionKind {
    Comment,
    DocComment,
    String,
}

/// A byte range of comment or string content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedRegion {
    pub kind: RegionKind,
    pub offset: usize,
    pub length: usize,
}

impl ExcludedRegion {
    pub fn new(kind: RegionKind, offset: usize, length: usize) -> Self {
        Self {
            kind,
            offset,
            length,
        }
    }

    pub fn end(&self) -> usize {
        self.offset.saturating_add(self.length)
    }

    /// Whether the region shares at least one byte with `range`
    pub fn intersects(&self, range: &Range<usize>) -> bool {
        self.offset < range.end && range.start < self.end()
    }
}
