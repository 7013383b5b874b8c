//! Lintel Core
//!
//! Rule-evaluation and auto-correction engine for stylistic checks over a
//! parsed source file. The syntax tree and the comment/string ranges come
//! from an external parser; this crate maps parser offsets onto the text,
//! checks container literal boundaries and declared member order, and runs
//! regex-driven diagnoses with atomic multi-edit corrections.

pub mod autofix;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod order;
pub mod parser;
pub mod pattern;
pub mod position;
pub mod result;
pub mod rules;
pub mod source;
pub mod syntax;

// Re-export commonly used types
pub use autofix::{CorrectionOutcome, EditSpan, apply_edits, unified_diff};
pub use config::{OrderEntry, RuleConfig, RuleSeverity, RulesConfiguration, order_option};
pub use diagnostics::{Correction, Location, Severity, Violation};
pub use error::{ErrorKind, LintelError};
pub use order::{CategoryGroup, OrderSpec, OrderViolation, OrderedItem, check_order};
pub use parser::{ParsedSource, SourceParser};
pub use pattern::{COMMENT_AND_STRING_KINDS, PatternMatch, PatternMatcher};
pub use position::PositionIndex;
pub use result::Result;
pub use rules::{CorrectableRule, Rule, RuleCategory, RuleMetadata};
pub use source::{SourceDocument, SourceView};
pub use syntax::{Attribute, ExcludedRegion, NodeKind, RegionKind, SyntaxNode};

/// Initialize the tracing subscriber for logging
///
/// Does nothing if a global subscriber is already installed.
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lintel=info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .try_init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
