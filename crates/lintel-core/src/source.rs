//! Source documents and the read-only view rules evaluate against

use std::ops::Range;
use std::path::{Path, PathBuf};

use crate::diagnostics::Location;
use crate::parser::{ParsedSource, SourceParser};
use crate::position::PositionIndex;
use crate::syntax::{ExcludedRegion, RegionKind, SyntaxNode};
use crate::{LintelError, Result};

/// Raw text plus the syntax tree and excluded regions parsed from it
///
/// A document is immutable for the duration of an analysis pass. Corrections
/// produce a new buffer; the caller re-parses it into a fresh document.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    text: String,
    root: SyntaxNode,
    excluded: Vec<ExcludedRegion>,
    index: PositionIndex,
    file: Option<PathBuf>,
}

impl SourceDocument {
    /// Create a document from text and the tree the parser built for it
    pub fn new(text: impl Into<String>, root: SyntaxNode) -> Self {
        let text = text.into();
        let index = PositionIndex::new(&text);
        Self {
            text,
            root,
            excluded: Vec::new(),
            index,
            file: None,
        }
    }

    /// Create a document from raw UTF-8 bytes
    pub fn from_bytes(bytes: &[u8], root: SyntaxNode) -> Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::new(text, root))
    }

    /// Run the external parser over `text` and wrap the result
    pub fn parse(text: impl Into<String>, parser: &dyn SourceParser) -> Result<Self> {
        let text = text.into();
        let ParsedSource { root, excluded } = parser.parse(&text)?;
        let document = Self::new(text, root).with_excluded_regions(excluded);
        document.validate()?;
        Ok(document)
    }

    /// Attach the comment/string ranges reported by the parser
    pub fn with_excluded_regions(mut self, regions: impl IntoIterator<Item = ExcludedRegion>) -> Self {
        self.excluded.extend(regions);
        self.excluded.sort_by_key(|region| region.offset);
        self
    }

    /// Attach the path the text was read from
    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Check the parser contract: the tree fits the text and is well formed,
    /// and every excluded region lies inside the text
    pub fn validate(&self) -> Result<()> {
        if self.root.end() > self.text.len() {
            return Err(LintelError::malformed_tree(format!(
                "root node ends at {} but the text is {} bytes long",
                self.root.end(),
                self.text.len()
            )));
        }
        self.root.validate()?;

        if let Some(region) = self.excluded.iter().find(|r| r.end() > self.text.len()) {
            return Err(LintelError::out_of_range(format!(
                "{:?} region {}..{} exceeds document length {}",
                region.kind,
                region.offset,
                region.end(),
                self.text.len()
            )));
        }

        Ok(())
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn root(&self) -> &SyntaxNode {
        &self.root
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Borrow a read-only view for rule evaluation
    pub fn view(&self) -> SourceView<'_> {
        SourceView {
            text: &self.text,
            root: &self.root,
            excluded: &self.excluded,
            index: &self.index,
            file: self.file.as_deref(),
        }
    }
}

/// Read-only access to a document's text, tree and positions
///
/// Every offset a rule turns into a slice or a location goes through the
/// document's [`PositionIndex`].
#[derive(Debug, Clone, Copy)]
pub struct SourceView<'a> {
    text: &'a str,
    root: &'a SyntaxNode,
    excluded: &'a [ExcludedRegion],
    index: &'a PositionIndex,
    file: Option<&'a Path>,
}

impl<'a> SourceView<'a> {
    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn root(&self) -> &'a SyntaxNode {
        self.root
    }

    pub fn file(&self) -> Option<&'a Path> {
        self.file
    }

    pub fn excluded_regions(&self) -> &'a [ExcludedRegion] {
        self.excluded
    }

    /// Extract the text covered by a byte range
    pub fn substring(&self, byte_offset: usize, byte_length: usize) -> Result<&'a str> {
        let range = self
            .index
            .to_text_range(byte_offset, byte_length, self.text)?;
        Ok(&self.text[range])
    }

    /// Extract the body of a container node
    pub fn body(&self, node: &SyntaxNode) -> Result<&'a str> {
        match (node.body_offset, node.body_length) {
            (Some(offset), Some(length)) => self.substring(offset, length),
            _ => Err(LintelError::out_of_range(format!(
                "{:?} at {} has no body range",
                node.kind, node.offset
            ))),
        }
    }

    /// Children of `node` in ascending offset order
    pub fn children(&self, node: &'a SyntaxNode) -> Vec<&'a SyntaxNode> {
        let mut children: Vec<&'a SyntaxNode> = node.children.iter().collect();
        children.sort_by_key(|child| child.offset);
        children
    }

    /// Every node below `node`, pre-order, siblings in offset order
    pub fn descendants(&self, node: &'a SyntaxNode) -> Descendants<'a> {
        let mut stack: Vec<&'a SyntaxNode> = self.children(node);
        stack.reverse();
        Descendants { stack }
    }

    /// Validate a byte offset for slicing
    pub fn text_index(&self, byte_offset: usize) -> Result<usize> {
        self.index.to_text_index(byte_offset, self.text)
    }

    /// 1-based line, 0-based column of a byte offset
    pub fn line_column(&self, byte_offset: usize) -> Result<(usize, usize)> {
        self.index.to_line_column(byte_offset, self.text)
    }

    /// Diagnostic location of a byte offset
    pub fn location(&self, byte_offset: usize) -> Result<Location> {
        let (line, column) = self.line_column(byte_offset)?;
        let location = Location::new(byte_offset, line, column);
        Ok(match self.file {
            Some(file) => location.with_file(file),
            None => location,
        })
    }

    /// Whether `range` touches any region of the given kinds
    pub fn intersects_excluded(&self, range: &Range<usize>, kinds: &[RegionKind]) -> bool {
        self.excluded
            .iter()
            .filter(|region| kinds.contains(&region.kind))
            .any(|region| region.intersects(range))
    }

    /// File name without its extension, if the document came from a file
    pub fn file_stem(&self) -> Option<&'a str> {
        self.file
            .and_then(|file| file.file_stem())
            .and_then(|stem| stem.to_str())
    }
}

/// Pre-order iterator over a subtree
pub struct Descendants<'a> {
    stack: Vec<&'a SyntaxNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a SyntaxNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        let mut children: Vec<&'a SyntaxNode> = node.children.iter().collect();
        children.sort_by_key(|child| std::cmp::Reverse(child.offset));
        self.stack.extend(children);
        Some(node)
    }
}
