//! Lintel Rules
//!
//! Built-in style rules and the [`Linter`] that runs them over parsed
//! documents.

pub mod builtin;
pub mod engine;

pub use builtin::{
    BuiltinRules, FileType, FileTypesOrderRule, MultilineLiteralBracketsRule, TypeContent,
    TypeContentsOrderRule, VerticalWhitespaceBetweenCasesRule,
};
pub use engine::{CorrectionReport, LintResult, Linter, RuleFailure};
