//! Regex-driven diagnosis and correction over raw text
//!
//! A [`PatternMatcher`] scans the whole text of a document, drops every match
//! that touches a comment or string region, and reports the rest. For
//! correctable rules each surviving match becomes an [`EditSpan`] over the
//! full match whose replacement expands the matcher's capture template.

use regex::Regex;
use std::ops::Range;
use tracing::debug;

use crate::autofix::{CorrectionOutcome, EditSpan};
use crate::diagnostics::{Correction, Severity, Violation};
use crate::source::SourceView;
use crate::syntax::RegionKind;
use crate::Result;

/// Region kinds that pattern rules ignore by default
pub const COMMENT_AND_STRING_KINDS: &[RegionKind] =
    &[RegionKind::Comment, RegionKind::DocComment, RegionKind::String];

/// A compiled pattern plus how to locate and rewrite its matches
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    regex: Regex,
    location_group: usize,
    replacement: Option<String>,
    excluded_kinds: Vec<RegionKind>,
}

/// One match that survived exclusion filtering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch {
    /// Byte range of the whole match
    pub range: Range<usize>,
    /// Byte offset the diagnostic points at
    pub location: usize,
    /// Expanded replacement for the whole match, if the matcher corrects
    pub replacement: Option<String>,
}

impl PatternMatcher {
    /// Compile `pattern`, excluding comment and string regions
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)?;
        Ok(Self {
            regex,
            location_group: 0,
            replacement: None,
            excluded_kinds: COMMENT_AND_STRING_KINDS.to_vec(),
        })
    }

    /// Report violations at the start of capture group `group`
    ///
    /// Falls back to the start of the whole match when the group did not
    /// participate in a match.
    pub fn with_location_group(mut self, group: usize) -> Self {
        self.location_group = group;
        self
    }

    /// Replacement template in `regex` expansion syntax, e.g. `${1}\n${2}`
    pub fn with_replacement(mut self, template: impl Into<String>) -> Self {
        self.replacement = Some(template.into());
        self
    }

    pub fn with_excluded_kinds(mut self, kinds: impl IntoIterator<Item = RegionKind>) -> Self {
        self.excluded_kinds = kinds.into_iter().collect();
        self
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn is_correctable(&self) -> bool {
        self.replacement.is_some()
    }

    /// All matches outside excluded regions, by offset
    ///
    /// After each match the search resumes at the location group rather than
    /// at the end of the match, so a line consumed by the location group of
    /// one match can still lead the next one.
    pub fn find(&self, view: SourceView<'_>) -> Vec<PatternMatch> {
        let text = view.text();
        let mut matches = Vec::new();
        let mut start = 0;

        while start <= text.len() {
            let Some(captures) = self.regex.captures_at(text, start) else {
                break;
            };
            let Some(whole) = captures.get(0) else {
                break;
            };
            let range = whole.range();
            let location = captures
                .get(self.location_group)
                .map_or(range.start, |group| group.start());

            start = if location > range.start {
                location
            } else if range.end > range.start {
                range.end
            } else {
                match text[range.start..].chars().next() {
                    Some(ch) => range.start + ch.len_utf8(),
                    None => text.len() + 1,
                }
            };

            if view.intersects_excluded(&range, &self.excluded_kinds) {
                debug!(
                    pattern = self.regex.as_str(),
                    start = range.start,
                    end = range.end,
                    "discarding match inside an excluded region"
                );
                continue;
            }

            let replacement = self.replacement.as_ref().map(|template| {
                let mut expanded = String::new();
                captures.expand(template, &mut expanded);
                expanded
            });

            matches.push(PatternMatch {
                range,
                location,
                replacement,
            });
        }

        matches
    }

    /// One violation per surviving match, located at the location group
    pub fn diagnose(
        &self,
        view: SourceView<'_>,
        rule_id: &str,
        severity: Severity,
        reason: &str,
    ) -> Result<Vec<Violation>> {
        self.find(view)
            .into_iter()
            .map(|m| {
                let location = view.location(m.location)?;
                Ok(Violation::new(rule_id, severity, location, reason))
            })
            .collect()
    }

    /// Rewrite every surviving match and return the whole new buffer
    ///
    /// A matcher without a replacement template, or a text without
    /// surviving matches, yields an outcome with no rewritten buffer.
    pub fn correct(
        &self,
        view: SourceView<'_>,
        rule_id: &str,
        description: &str,
    ) -> Result<CorrectionOutcome> {
        let mut corrections = Vec::new();

        for m in self.find(view) {
            let Some(replacement) = m.replacement else {
                continue;
            };
            let location = view.location(m.range.start)?;
            let edit = narrow_edit(&view.text()[m.range.clone()], m.range.start, replacement);
            if edit.length == 0 && edit.replacement.is_empty() {
                continue;
            }
            corrections.push(Correction::new(rule_id, location, description, edit));
        }

        CorrectionOutcome::apply(view.text(), corrections)
    }
}

/// Shrink a whole-match rewrite to the span that actually changes
///
/// Matches found from a location group may overlap the previous match, so
/// their rewrites are trimmed of the common prefix and suffix to keep the
/// edits disjoint.
fn narrow_edit(matched: &str, offset: usize, replacement: String) -> EditSpan {
    let prefix: usize = matched
        .chars()
        .zip(replacement.chars())
        .take_while(|(a, b)| a == b)
        .map(|(a, _)| a.len_utf8())
        .sum();

    let suffix: usize = matched[prefix..]
        .chars()
        .rev()
        .zip(replacement[prefix..].chars().rev())
        .take_while(|(a, b)| a == b)
        .map(|(a, _)| a.len_utf8())
        .sum();

    let inserted = replacement[prefix..replacement.len() - suffix].to_string();
    EditSpan::new(offset + prefix, matched.len() - prefix - suffix, inserted)
}
