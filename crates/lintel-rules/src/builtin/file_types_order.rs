//! Order of the top-level types in a file
//!
//! The file's main type, its supporting types and its extensions must follow
//! a configurable order. The main type is the class, struct or enum named
//! after the file; without a file name match it is the one with the largest
//! body.

use lintel_core::{
    CategoryGroup, NodeKind, OrderSpec, OrderedItem, Result, Rule, RuleCategory, RuleConfig,
    RuleMetadata, Severity, SourceDocument, SourceView, SyntaxNode, Violation, check_order,
    order_option,
};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::fmt;

use super::skip_node;
use super::type_contents_order::article;

/// Rule ID for file types order
pub const FILE_TYPES_ORDER: &str = "style/file-types-order";

pub fn metadata() -> RuleMetadata {
    RuleMetadata::new(
        RuleCategory::Style,
        "file-types-order",
        "File Types Order",
        "Specifies how the types within a file should be ordered.",
    )
    .opt_in()
}

/// Category of a top-level declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    SupportingType,
    MainType,
    Extension,
}

impl FileType {
    pub fn name(self) -> &'static str {
        match self {
            FileType::SupportingType => "supporting_type",
            FileType::MainType => "main_type",
            FileType::Extension => "extension",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "supporting_type" => Some(FileType::SupportingType),
            "main_type" => Some(FileType::MainType),
            "extension" => Some(FileType::Extension),
            _ => None,
        }
    }

    /// Categorize a top-level node given the offset of the main type
    pub fn of(node: &SyntaxNode, main_type_offset: usize) -> Option<Self> {
        match node.kind {
            NodeKind::Extension => Some(FileType::Extension),
            NodeKind::Class | NodeKind::Struct | NodeKind::Enum
                if node.offset == main_type_offset =>
            {
                Some(FileType::MainType)
            }
            NodeKind::Class | NodeKind::Struct | NodeKind::Enum | NodeKind::Protocol => {
                Some(FileType::SupportingType)
            }
            NodeKind::SourceFile
            | NodeKind::Array
            | NodeKind::Dictionary
            | NodeKind::StringLiteral
            | NodeKind::EnumCase
            | NodeKind::EnumElement
            | NodeKind::TypeAlias
            | NodeKind::AssociatedType
            | NodeKind::VarGlobal
            | NodeKind::VarLocal
            | NodeKind::VarParameter
            | NodeKind::VarInstance
            | NodeKind::VarClass
            | NodeKind::VarStatic
            | NodeKind::FunctionFree
            | NodeKind::FunctionMethodInstance
            | NodeKind::FunctionMethodClass
            | NodeKind::FunctionMethodStatic
            | NodeKind::FunctionSubscript
            | NodeKind::Call
            | NodeKind::Argument
            | NodeKind::Closure
            | NodeKind::Tuple
            | NodeKind::Brace
            | NodeKind::If
            | NodeKind::Guard
            | NodeKind::For
            | NodeKind::While
            | NodeKind::Switch
            | NodeKind::Case => None,
        }
    }

    pub fn default_order() -> OrderSpec<FileType> {
        OrderSpec::new([
            CategoryGroup::single(FileType::SupportingType),
            CategoryGroup::single(FileType::MainType),
            CategoryGroup::single(FileType::Extension),
        ])
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pick the main type among the top-level declarations
///
/// Prefers a class, struct or enum named like the file stem; otherwise the
/// first one with the largest body.
fn main_type<'a>(view: SourceView<'a>, declarations: &[&'a SyntaxNode]) -> Option<&'a SyntaxNode> {
    let candidates: Vec<&'a SyntaxNode> = declarations
        .iter()
        .copied()
        .filter(|node| matches!(node.kind, NodeKind::Class | NodeKind::Struct | NodeKind::Enum))
        .collect();

    if let Some(stem) = view.file_stem()
        && let Some(named) = candidates
            .iter()
            .copied()
            .find(|node| node.name.as_deref() == Some(stem))
    {
        return Some(named);
    }

    candidates
        .into_iter()
        .min_by_key(|node| Reverse(node.body_length.unwrap_or(node.length)))
}

/// Checks the order of the top-level types of a file
pub struct FileTypesOrderRule {
    metadata: RuleMetadata,
    order: OrderSpec<FileType>,
}

impl FileTypesOrderRule {
    pub fn new() -> Self {
        Self {
            metadata: metadata(),
            order: FileType::default_order(),
        }
    }

    /// Build the rule from its configuration, reading the `order` option
    pub fn from_config(config: Option<&RuleConfig>) -> Result<Self> {
        let order = order_option(config, FileType::from_name)?;
        Ok(Self::new().with_order(order.unwrap_or_else(FileType::default_order)))
    }

    pub fn with_order(mut self, order: OrderSpec<FileType>) -> Self {
        self.order = order;
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.metadata.severity = severity;
        self
    }
}

impl Default for FileTypesOrderRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for FileTypesOrderRule {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn validate(&self, document: &SourceDocument) -> Result<Vec<Violation>> {
        let view = document.view();
        let declarations = view.children(view.root());

        let Some(main) = main_type(view, &declarations) else {
            return Ok(Vec::new());
        };

        let items: Vec<OrderedItem<FileType>> = declarations
            .iter()
            .filter_map(|node| {
                FileType::of(node, main.offset).map(|file_type| OrderedItem::new(file_type, node.offset))
            })
            .collect();

        let mut violations = Vec::new();
        for misplaced in check_order(items, &self.order) {
            let location = match view.location(misplaced.offset) {
                Ok(location) => location,
                Err(err) => {
                    if let Some(node) = declarations.iter().find(|n| n.offset == misplaced.offset) {
                        skip_node(&self.metadata.id, node, err)?;
                    }
                    continue;
                }
            };
            let file_type = misplaced.category.name();
            violations.push(Violation::new(
                &self.metadata.id,
                self.metadata.severity,
                location,
                format!(
                    "{} '{}' should not be placed amongst the file type(s) '{}'.",
                    article(file_type),
                    file_type,
                    misplaced.group
                ),
            ));
        }

        violations.sort_by_key(|violation| violation.location.offset);
        Ok(violations)
    }
}
