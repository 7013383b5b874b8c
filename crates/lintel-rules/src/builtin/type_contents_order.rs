//! Order of the members of a type
//!
//! Members of every class, struct, enum, protocol and extension are
//! categorized (cases, properties, initializers, methods and so on) and
//! checked against a configurable order of category groups.

use lintel_core::{
    Attribute, CategoryGroup, NodeKind, OrderSpec, OrderedItem, Result, Rule, RuleCategory,
    RuleConfig, RuleMetadata, Severity, SourceDocument, SourceView, SyntaxNode, Violation,
    check_order, order_option,
};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::skip_node;

/// Rule ID for type contents order
pub const TYPE_CONTENTS_ORDER: &str = "style/type-contents-order";

const VIEW_LIFE_CYCLE_METHODS: &[&str] = &[
    "loadView(",
    "loadViewIfNeeded(",
    "viewDidLoad(",
    "viewWillAppear(",
    "viewWillLayoutSubviews(",
    "viewDidLayoutSubviews(",
    "viewDidAppear(",
    "viewWillDisappear(",
    "viewDidDisappear(",
];

pub fn metadata() -> RuleMetadata {
    RuleMetadata::new(
        RuleCategory::Style,
        "type-contents-order",
        "Type Contents Order",
        "Specifies the order of subtypes, properties, methods & more within a type.",
    )
    .opt_in()
}

/// Category of a member declared inside a type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeContent {
    Case,
    TypeAlias,
    AssociatedType,
    Subtype,
    TypeProperty,
    InstanceProperty,
    IbInspectable,
    IbOutlet,
    Initializer,
    TypeMethod,
    ViewLifeCycleMethod,
    IbAction,
    OtherMethod,
    Subscript,
}

impl TypeContent {
    pub fn name(self) -> &'static str {
        match self {
            TypeContent::Case => "case",
            TypeContent::TypeAlias => "type_alias",
            TypeContent::AssociatedType => "associated_type",
            TypeContent::Subtype => "subtype",
            TypeContent::TypeProperty => "type_property",
            TypeContent::InstanceProperty => "instance_property",
            TypeContent::IbInspectable => "ib_inspectable",
            TypeContent::IbOutlet => "ib_outlet",
            TypeContent::Initializer => "initializer",
            TypeContent::TypeMethod => "type_method",
            TypeContent::ViewLifeCycleMethod => "view_life_cycle_method",
            TypeContent::IbAction => "ib_action",
            TypeContent::OtherMethod => "other_method",
            TypeContent::Subscript => "subscript",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let content = match name {
            "case" => TypeContent::Case,
            "type_alias" => TypeContent::TypeAlias,
            "associated_type" => TypeContent::AssociatedType,
            "subtype" => TypeContent::Subtype,
            "type_property" => TypeContent::TypeProperty,
            "instance_property" => TypeContent::InstanceProperty,
            "ib_inspectable" => TypeContent::IbInspectable,
            "ib_outlet" => TypeContent::IbOutlet,
            "initializer" => TypeContent::Initializer,
            "type_method" => TypeContent::TypeMethod,
            "view_life_cycle_method" => TypeContent::ViewLifeCycleMethod,
            "ib_action" => TypeContent::IbAction,
            "other_method" => TypeContent::OtherMethod,
            "subscript" => TypeContent::Subscript,
            _ => return None,
        };
        Some(content)
    }

    /// Categorize a member node, `None` for unconstrained members
    pub fn of(node: &SyntaxNode) -> Option<Self> {
        match node.kind {
            NodeKind::EnumCase | NodeKind::EnumElement => Some(TypeContent::Case),
            NodeKind::TypeAlias => Some(TypeContent::TypeAlias),
            NodeKind::AssociatedType => Some(TypeContent::AssociatedType),
            NodeKind::Class
            | NodeKind::Enum
            | NodeKind::Extension
            | NodeKind::Protocol
            | NodeKind::Struct => Some(TypeContent::Subtype),
            NodeKind::VarClass | NodeKind::VarStatic => Some(TypeContent::TypeProperty),
            NodeKind::VarInstance => {
                if node.has_attribute(Attribute::IbOutlet) {
                    Some(TypeContent::IbOutlet)
                } else if node.has_attribute(Attribute::IbInspectable) {
                    Some(TypeContent::IbInspectable)
                } else {
                    Some(TypeContent::InstanceProperty)
                }
            }
            NodeKind::FunctionMethodClass | NodeKind::FunctionMethodStatic => {
                Some(TypeContent::TypeMethod)
            }
            NodeKind::FunctionMethodInstance => Some(Self::instance_method(node)),
            NodeKind::FunctionSubscript => Some(TypeContent::Subscript),
            NodeKind::SourceFile
            | NodeKind::Array
            | NodeKind::Dictionary
            | NodeKind::StringLiteral
            | NodeKind::VarGlobal
            | NodeKind::VarLocal
            | NodeKind::VarParameter
            | NodeKind::FunctionFree
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

    fn instance_method(node: &SyntaxNode) -> Self {
        let name = node.name_or_empty();
        if name.starts_with("init") || name.starts_with("deinit") {
            TypeContent::Initializer
        } else if VIEW_LIFE_CYCLE_METHODS
            .iter()
            .any(|prefix| name.starts_with(prefix))
        {
            TypeContent::ViewLifeCycleMethod
        } else if node.has_attribute(Attribute::IbAction) {
            TypeContent::IbAction
        } else {
            TypeContent::OtherMethod
        }
    }

    /// Declaration order applied when none is configured
    pub fn default_order() -> OrderSpec<TypeContent> {
        OrderSpec::new([
            CategoryGroup::single(TypeContent::Case),
            CategoryGroup::new([TypeContent::TypeAlias, TypeContent::AssociatedType]),
            CategoryGroup::single(TypeContent::Subtype),
            CategoryGroup::single(TypeContent::TypeProperty),
            CategoryGroup::single(TypeContent::InstanceProperty),
            CategoryGroup::single(TypeContent::IbInspectable),
            CategoryGroup::single(TypeContent::IbOutlet),
            CategoryGroup::single(TypeContent::Initializer),
            CategoryGroup::single(TypeContent::TypeMethod),
            CategoryGroup::single(TypeContent::ViewLifeCycleMethod),
            CategoryGroup::single(TypeContent::IbAction),
            CategoryGroup::single(TypeContent::OtherMethod),
            CategoryGroup::single(TypeContent::Subscript),
        ])
    }
}

impl fmt::Display for TypeContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `A`/`An` depending on the first letter of `word`
pub(crate) fn article(word: &str) -> &'static str {
    match word.chars().next() {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "An",
        _ => "A",
    }
}

/// Checks member order inside every type declaration
pub struct TypeContentsOrderRule {
    metadata: RuleMetadata,
    order: OrderSpec<TypeContent>,
}

impl TypeContentsOrderRule {
    pub fn new() -> Self {
        Self {
            metadata: metadata(),
            order: TypeContent::default_order(),
        }
    }

    /// Build the rule from its configuration, reading the `order` option
    pub fn from_config(config: Option<&RuleConfig>) -> Result<Self> {
        let order = order_option(config, TypeContent::from_name)?;
        Ok(Self::new().with_order(order.unwrap_or_else(TypeContent::default_order)))
    }

    pub fn with_order(mut self, order: OrderSpec<TypeContent>) -> Self {
        self.order = order;
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.metadata.severity = severity;
        self
    }

    pub fn order(&self) -> &OrderSpec<TypeContent> {
        &self.order
    }

    fn check_type(&self, view: SourceView<'_>, declaration: &SyntaxNode) -> Result<Vec<Violation>> {
        let items: Vec<OrderedItem<TypeContent>> = view
            .children(declaration)
            .into_iter()
            .filter_map(|member| TypeContent::of(member).map(|c| OrderedItem::new(c, member.offset)))
            .collect();

        check_order(items, &self.order)
            .into_iter()
            .map(|misplaced| {
                let content = misplaced.category.name();
                let reason = format!(
                    "{} '{}' should not be placed amongst the type content(s) '{}'.",
                    article(content),
                    content,
                    misplaced.group
                );
                Ok(Violation::new(
                    &self.metadata.id,
                    self.metadata.severity,
                    view.location(misplaced.offset)?,
                    reason,
                ))
            })
            .collect()
    }
}

impl Default for TypeContentsOrderRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for TypeContentsOrderRule {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn validate(&self, document: &SourceDocument) -> Result<Vec<Violation>> {
        let view = document.view();
        let mut violations = Vec::new();

        // Only top-level types; members of nested types are not ordered
        for declaration in view
            .children(view.root())
            .into_iter()
            .filter(|node| node.kind.is_type_declaration())
        {
            match self.check_type(view, declaration) {
                Ok(found) => violations.extend(found),
                Err(err) => skip_node(&self.metadata.id, declaration, err)?,
            }
        }

        violations.sort_by_key(|violation| violation.location.offset);
        Ok(violations)
    }
}
