//! Offset translation between parser byte offsets, text indices and
//! line/column positions
//!
//! The parser reports raw byte offsets. Before a byte offset may be used to
//! slice the text it has to be validated against the text it indexes: it must
//! lie inside the document and on a character boundary. Offsets that do not
//! are surfaced as errors rather than rounded to a nearby character.

use crate::{LintelError, Result};

/// Cumulative line-start table for one document
///
/// Built once per document; every query is a binary search over the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionIndex {
    /// Byte offsets where each line starts (line 1 starts at offset 0)
    line_starts: Vec<usize>,
    /// Length of the indexed text in bytes
    len: usize,
}

impl PositionIndex {
    /// Build the index for `source`
    ///
    /// Only `\n` starts a new line. A `\r` preceding it stays part of the
    /// previous line and counts towards its columns.
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];

        for (idx, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(idx + 1);
            }
        }

        Self {
            line_starts,
            len: source.len(),
        }
    }

    /// Length in bytes of the indexed text
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the indexed text is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of lines, counting the (possibly empty) line after a trailing newline
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Validate a parser byte offset and return the index to slice `source` with
    ///
    /// Fails with [`LintelError::OutOfRange`] past the end of the text and with
    /// [`LintelError::EncodingBoundary`] inside a multi-byte character.
    pub fn to_text_index(&self, byte_offset: usize, source: &str) -> Result<usize> {
        if byte_offset > self.len {
            return Err(LintelError::out_of_range(format!(
                "byte offset {byte_offset} exceeds document length {}",
                self.len
            )));
        }
        if !source.is_char_boundary(byte_offset) {
            return Err(LintelError::encoding_boundary(byte_offset));
        }
        Ok(byte_offset)
    }

    /// Validate a byte range and return it as a text index range
    pub fn to_text_range(
        &self,
        byte_offset: usize,
        byte_length: usize,
        source: &str,
    ) -> Result<std::ops::Range<usize>> {
        let end = byte_offset.checked_add(byte_length).ok_or_else(|| {
            LintelError::out_of_range(format!(
                "range {byte_offset}+{byte_length} overflows"
            ))
        })?;
        let start = self.to_text_index(byte_offset, source)?;
        let end = self.to_text_index(end, source)?;
        Ok(start..end)
    }

    /// Number of characters preceding `byte_offset`
    pub fn to_char_index(&self, byte_offset: usize, source: &str) -> Result<usize> {
        let index = self.to_text_index(byte_offset, source)?;
        Ok(source[..index].chars().count())
    }

    /// Convert a byte offset to `(line, column)`
    ///
    /// The line is 1-based; the column is 0-based and counts characters from
    /// the start of the line.
    pub fn to_line_column(&self, byte_offset: usize, source: &str) -> Result<(usize, usize)> {
        let index = self.to_text_index(byte_offset, source)?;

        let line_idx = match self.line_starts.binary_search(&index) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        };

        let line_start = self.line_starts[line_idx];
        let column = source[line_start..index].chars().count();

        Ok((line_idx + 1, column))
    }

    /// Byte offset at which the given 1-based line starts
    pub fn line_start(&self, line: usize) -> Option<usize> {
        line.checked_sub(1)
            .and_then(|idx| self.line_starts.get(idx))
            .copied()
    }
}
