//! Text edits and their atomic application to a buffer
//!
//! Corrections are expressed as a list of [`EditSpan`]s in the offsets of
//! the text they were computed against. [`apply_edits`] validates the whole
//! batch first and only then rewrites an owned copy of the text, highest
//! offset first, so the recorded offsets of not-yet-applied edits stay valid.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::ops::Range;

use crate::diagnostics::Correction;
use crate::{LintelError, Result};

/// A byte range plus the text that replaces it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EditSpan {
    /// Byte offset of the first replaced byte
    pub offset: usize,
    /// Number of replaced bytes (0 for a pure insertion)
    pub length: usize,
    /// Replacement text
    pub replacement: String,
}

impl EditSpan {
    pub fn new(offset: usize, length: usize, replacement: impl Into<String>) -> Self {
        Self {
            offset,
            length,
            replacement: replacement.into(),
        }
    }

    /// Insert `text` at `offset` without replacing anything
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self::new(offset, 0, text)
    }

    /// Exclusive end offset of the replaced range
    pub fn end(&self) -> usize {
        self.offset.saturating_add(self.length)
    }

    pub fn range(&self) -> Range<usize> {
        self.offset..self.end()
    }

    /// Check if this edit conflicts with another edit
    ///
    /// Overlapping ranges conflict. Two insertions at the same offset conflict
    /// as well, since their relative order would be ambiguous.
    pub fn conflicts_with(&self, other: &EditSpan) -> bool {
        if self.offset == other.offset {
            return true;
        }
        !(self.end() <= other.offset || other.end() <= self.offset)
    }
}

/// Check every edit against `text` before anything is rewritten
pub fn validate_edits(text: &str, edits: &[EditSpan]) -> Result<()> {
    for edit in edits {
        let end = edit.offset.checked_add(edit.length).ok_or_else(|| {
            LintelError::autofix_error(format!(
                "edit {}+{} overflows",
                edit.offset, edit.length
            ))
        })?;
        if end > text.len() {
            return Err(LintelError::autofix_error(format!(
                "edit {}..{} exceeds buffer length {}",
                edit.offset,
                end,
                text.len()
            )));
        }
        if !text.is_char_boundary(edit.offset) || !text.is_char_boundary(end) {
            return Err(LintelError::autofix_error(format!(
                "edit {}..{} does not fall on character boundaries",
                edit.offset, end
            )));
        }
    }

    let mut sorted: Vec<&EditSpan> = edits.iter().collect();
    sorted.sort_by_key(|edit| edit.offset);
    for pair in sorted.windows(2) {
        if pair[0].conflicts_with(pair[1]) {
            return Err(LintelError::autofix_error(format!(
                "edit {}..{} overlaps edit {}..{}",
                pair[0].offset,
                pair[0].end(),
                pair[1].offset,
                pair[1].end()
            )));
        }
    }

    Ok(())
}

/// Apply a batch of edits to `text`, returning the rewritten buffer
///
/// Either every edit is applied or none is: on a validation failure the
/// error is returned and `text` is left as it was.
pub fn apply_edits(text: &str, edits: &[EditSpan]) -> Result<String> {
    validate_edits(text, edits)?;

    let mut sorted: Vec<&EditSpan> = edits.iter().collect();
    sorted.sort_by(|a, b| b.offset.cmp(&a.offset));

    let mut buffer = text.to_string();
    for edit in sorted {
        buffer.replace_range(edit.range(), &edit.replacement);
    }

    Ok(buffer)
}

/// Result of running one correctable rule over a document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionOutcome {
    /// One record per applied edit, ascending by original offset
    pub corrections: Vec<Correction>,
    /// The whole rewritten buffer, absent when nothing was corrected
    pub rewritten: Option<String>,
}

impl CorrectionOutcome {
    /// An outcome that leaves the text untouched
    pub fn unchanged() -> Self {
        Self::default()
    }

    /// Build an outcome by applying the edits carried by `corrections`
    pub fn apply(text: &str, mut corrections: Vec<Correction>) -> Result<Self> {
        if corrections.is_empty() {
            return Ok(Self::unchanged());
        }

        let edits: Vec<EditSpan> = corrections.iter().map(|c| c.edit.clone()).collect();
        let rewritten = apply_edits(text, &edits)?;
        corrections.sort_by_key(|c| c.edit.offset);

        Ok(Self {
            corrections,
            rewritten: Some(rewritten),
        })
    }

    pub fn is_noop(&self) -> bool {
        self.corrections.is_empty()
    }

    /// Rewritten text, or `original` when nothing changed
    pub fn text_or<'a>(&'a self, original: &'a str) -> &'a str {
        self.rewritten.as_deref().unwrap_or(original)
    }

    /// The edits behind the corrections, in original-text offsets
    pub fn edits(&self) -> Vec<EditSpan> {
        self.corrections.iter().map(|c| c.edit.clone()).collect()
    }

    /// Unified line diff between `original` and the rewritten text
    pub fn diff(&self, original: &str, label: &str) -> String {
        match &self.rewritten {
            Some(rewritten) => unified_diff(original, rewritten, label),
            None => String::new(),
        }
    }
}

/// Render a plain unified diff of two texts
pub fn unified_diff(original: &str, modified: &str, label: &str) -> String {
    use similar::{ChangeTag, TextDiff};

    let diff = TextDiff::from_lines(original, modified);
    let mut output = String::new();

    let _ = writeln!(output, "--- {label}");
    let _ = writeln!(output, "+++ {label} (corrected)");

    for group in diff.grouped_ops(3) {
        let Some(first) = group.first() else {
            continue;
        };
        let old_len: usize = group.iter().map(|op| op.old_range().len()).sum();
        let new_len: usize = group.iter().map(|op| op.new_range().len()).sum();
        let _ = writeln!(
            output,
            "@@ -{},{} +{},{} @@",
            first.old_range().start + 1,
            old_len,
            first.new_range().start + 1,
            new_len
        );

        for op in &group {
            for change in diff.iter_changes(op) {
                let sign = match change.tag() {
                    ChangeTag::Delete => '-',
                    ChangeTag::Insert => '+',
                    ChangeTag::Equal => ' ',
                };
                output.push(sign);
                output.push_str(change.value());
                if !change.value().ends_with('\n') {
                    output.push('\n');
                }
            }
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Location;

    #[test]
    fn test_conflicts() {
        let a = EditSpan::new(0, 5, "x");
        let b = EditSpan::new(4, 2, "y");
        let c = EditSpan::new(5, 2, "z");

        assert!(a.conflicts_with(&b));
        assert!(!a.conflicts_with(&c));
        assert!(EditSpan::insert(3, "a").conflicts_with(&EditSpan::insert(3, "b")));
    }

    #[test]
    fn test_apply_descending_keeps_offsets_valid() {
        let text = "case a:\ncase b:\n";
        let edits = vec![EditSpan::insert(0, "\n"), EditSpan::insert(8, "\n")];

        assert_eq!(apply_edits(text, &edits).unwrap(), "\ncase a:\n\ncase b:\n");
    }

    #[test]
    fn test_apply_is_order_independent() {
        let text = "one two three";
        let forward = vec![EditSpan::new(0, 3, "1"), EditSpan::new(8, 5, "3")];
        let backward: Vec<EditSpan> = forward.iter().rev().cloned().collect();

        assert_eq!(
            apply_edits(text, &forward).unwrap(),
            apply_edits(text, &backward).unwrap()
        );
        assert_eq!(apply_edits(text, &forward).unwrap(), "1 two 3");
    }

    #[test]
    fn test_overlapping_batch_is_rejected() {
        let text = "abcdef";
        let edits = vec![EditSpan::new(0, 3, "x"), EditSpan::new(2, 2, "y")];

        let err = apply_edits(text, &edits).unwrap_err();
        assert!(matches!(err, LintelError::AutofixError { .. }));
    }

    #[test]
    fn test_out_of_bounds_and_boundary_rejected() {
        assert!(apply_edits("abc", &[EditSpan::new(2, 5, "")]).is_err());
        assert!(apply_edits("名", &[EditSpan::new(1, 1, "")]).is_err());
        assert!(apply_edits("abc", &[EditSpan::new(usize::MAX, 1, "")]).is_err());
    }

    #[test]
    fn test_outcome_from_no_corrections_is_noop() {
        let outcome = CorrectionOutcome::apply("text", Vec::new()).unwrap();

        assert!(outcome.is_noop());
        assert_eq!(outcome.rewritten, None);
        assert_eq!(outcome.text_or("text"), "text");
        assert_eq!(outcome.diff("text", "a.swift"), "");
    }

    #[test]
    fn test_outcome_sorts_corrections_and_renders_diff() {
        let text = "a\nb\n";
        let correction = |offset: usize| {
            Correction::new(
                "style/test",
                Location::new(offset, 1, 0),
                "insert blank line",
                EditSpan::insert(offset, "\n"),
            )
        };
        let outcome = CorrectionOutcome::apply(text, vec![correction(2), correction(0)]).unwrap();

        let offsets: Vec<usize> = outcome.corrections.iter().map(|c| c.edit.offset).collect();
        assert_eq!(offsets, vec![0, 2]);
        assert_eq!(outcome.text_or(text), "\na\n\nb\n");

        let diff = outcome.diff(text, "a.swift");
        assert!(diff.starts_with("--- a.swift\n+++ a.swift (corrected)\n"));
        assert!(diff.contains("\n+\n"));
    }

    #[test]
    fn test_unified_diff_replaced_line() {
        let diff = unified_diff("a\nb\nc\n", "a\nB\nc\n", "letters.txt");

        insta::assert_snapshot!(diff, @r"
        --- letters.txt
        +++ letters.txt (corrected)
        @@ -1,3 +1,3 @@
         a
        -b
        +B
         c
        ");
    }
}
