//! Test support: a small line-oriented parser producing lintel trees
//!
//! It understands just enough Swift-like syntax for the rule tests:
//! comments and string literals become excluded regions, bracket pairs
//! become array/dictionary literals, and declarations starting a line
//! (types, properties, methods, enum cases) become declaration nodes.

#![allow(dead_code)]

use std::cmp::Reverse;
use std::collections::HashMap;

use lintel_core::{
    Attribute, ExcludedRegion, LintelError, NodeKind, ParsedSource, RegionKind, Result,
    SourceDocument, SourceParser, SyntaxNode, Violation,
};

pub struct TestParser;

impl SourceParser for TestParser {
    fn parse(&self, text: &str) -> Result<ParsedSource> {
        Parser::new(text).parse()
    }
}

/// Parse `text` into a validated document
pub fn parse(text: &str) -> SourceDocument {
    SourceDocument::parse(text, &TestParser).unwrap()
}

/// Parse `text` into a validated document attributed to `file`
pub fn parse_file(text: &str, file: &str) -> SourceDocument {
    parse(text).with_file(file)
}

/// Offset of the `n`th (0-based) occurrence of `needle` in `text`
pub fn offset_of(text: &str, needle: &str, n: usize) -> usize {
    text.match_indices(needle).nth(n).map(|(idx, _)| idx).unwrap()
}

/// Render violations one per line
pub fn render(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

const MODIFIERS: &[&str] = &[
    "public",
    "private",
    "fileprivate",
    "internal",
    "open",
    "final",
    "override",
    "static",
    "lazy",
    "weak",
    "unowned",
    "mutating",
    "convenience",
    "required",
    "dynamic",
];

struct Parser<'a> {
    text: &'a str,
    bytes: &'a [u8],
    excluded: Vec<ExcludedRegion>,
    mask: Vec<bool>,
    /// Matching close offset for every unmasked opener
    pairs: HashMap<usize, usize>,
    /// Brace depth before each byte
    depth: Vec<usize>,
}

struct TypeScope {
    kind: NodeKind,
    open: usize,
    close: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        let excluded = lex_regions(text);
        let mut mask = vec![false; text.len()];
        for region in &excluded {
            for flag in &mut mask[region.offset..region.end()] {
                *flag = true;
            }
        }
        Self {
            text,
            bytes: text.as_bytes(),
            excluded,
            mask,
            pairs: HashMap::new(),
            depth: Vec::new(),
        }
    }

    fn parse(mut self) -> Result<ParsedSource> {
        self.match_pairs()?;

        let mut nodes = self.literals();
        nodes.extend(self.declarations());

        let root = assemble(SyntaxNode::new(NodeKind::SourceFile, 0, self.text.len()), nodes);
        Ok(ParsedSource::new(root, self.excluded))
    }

    fn match_pairs(&mut self) -> Result<()> {
        let mut stack: Vec<(u8, usize)> = Vec::new();
        let mut braces = 0usize;
        self.depth = Vec::with_capacity(self.bytes.len());

        for (idx, &byte) in self.bytes.iter().enumerate() {
            self.depth.push(braces);
            if self.mask[idx] {
                continue;
            }
            match byte {
                b'(' | b'[' | b'{' => {
                    stack.push((byte, idx));
                    if byte == b'{' {
                        braces += 1;
                    }
                }
                b')' | b']' | b'}' => {
                    let expected = match byte {
                        b')' => b'(',
                        b']' => b'[',
                        _ => b'{',
                    };
                    match stack.pop() {
                        Some((open, at)) if open == expected => {
                            self.pairs.insert(at, idx);
                        }
                        _ => {
                            return Err(LintelError::parse_error(format!(
                                "unbalanced '{}' at {idx}",
                                byte as char
                            )));
                        }
                    }
                    if byte == b'}' {
                        braces -= 1;
                    }
                }
                _ => {}
            }
        }

        if let Some((open, at)) = stack.pop() {
            return Err(LintelError::parse_error(format!(
                "unclosed '{}' at {at}",
                open as char
            )));
        }
        Ok(())
    }

    fn literals(&self) -> Vec<SyntaxNode> {
        let mut nodes = Vec::new();
        for (&open, &close) in &self.pairs {
            if self.bytes[open] != b'[' || self.is_subscript(open) {
                continue;
            }
            let kind = if self.has_top_level_colon(open, close) {
                NodeKind::Dictionary
            } else {
                NodeKind::Array
            };
            nodes.push(
                SyntaxNode::new(kind, open, close - open + 1).with_body(open + 1, close - open - 1),
            );
        }
        nodes
    }

    fn is_subscript(&self, open: usize) -> bool {
        self.text[..open]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == ')' || c == ']')
    }

    fn has_top_level_colon(&self, open: usize, close: usize) -> bool {
        let mut idx = open + 1;
        while idx < close {
            if self.mask[idx] {
                idx += 1;
                continue;
            }
            match self.bytes[idx] {
                b'(' | b'[' | b'{' => idx = self.pairs[&idx] + 1,
                b':' => return true,
                _ => idx += 1,
            }
        }
        false
    }

    fn declarations(&self) -> Vec<SyntaxNode> {
        let mut nodes = Vec::new();
        let mut types: Vec<TypeScope> = Vec::new();

        for start in self.line_starts() {
            let Some(decl) = self.declaration_at(start, &types) else {
                continue;
            };
            if decl.kind.is_type_declaration()
                && let (Some(body), Some(len)) = (decl.body_offset, decl.body_length)
            {
                types.push(TypeScope {
                    kind: decl.kind,
                    open: body - 1,
                    close: body + len,
                });
            }
            nodes.push(decl);
        }

        nodes
    }

    /// First non-blank, unmasked offset of every line
    fn line_starts(&self) -> Vec<usize> {
        let mut starts = Vec::new();
        let mut at_line_start = true;
        for (idx, &byte) in self.bytes.iter().enumerate() {
            if at_line_start && byte != b' ' && byte != b'\t' {
                if byte != b'\n' && !self.mask[idx] {
                    starts.push(idx);
                }
                at_line_start = false;
            }
            if byte == b'\n' {
                at_line_start = true;
            }
        }
        starts
    }

    fn declaration_at(&self, start: usize, types: &[TypeScope]) -> Option<SyntaxNode> {
        let mut pos = start;
        let mut attributes = Vec::new();
        let mut is_static = false;
        let mut is_class_member = false;

        let (keyword, keyword_at) = loop {
            let (word, at, next) = self.word(pos)?;
            pos = next;
            if let Some(attribute) = word.strip_prefix('@') {
                match attribute {
                    "IBOutlet" => attributes.push(Attribute::IbOutlet),
                    "IBInspectable" => attributes.push(Attribute::IbInspectable),
                    "IBAction" => attributes.push(Attribute::IbAction),
                    "objc" => attributes.push(Attribute::ObjC),
                    _ => {}
                }
                continue;
            }
            if word == "class"
                && let Some((next_word, _, _)) = self.word(pos)
                && matches!(next_word, "var" | "let" | "func" | "subscript")
            {
                is_class_member = true;
                continue;
            }
            if word == "static" {
                is_static = true;
                continue;
            }
            if MODIFIERS.contains(&word) {
                if word == "override" {
                    attributes.push(Attribute::Override);
                }
                continue;
            }
            break (word, at);
        };

        let scope = types
            .iter()
            .filter(|scope| scope.open < start && start < scope.close)
            .max_by_key(|scope| scope.open);
        let in_type_body = scope.is_some_and(|scope| self.depth[start] == self.depth[scope.open] + 1);
        let at_top_level = scope.is_none() && self.depth[start] == 0;
        if !in_type_body && !at_top_level {
            return None;
        }

        let kind = match keyword {
            "class" => NodeKind::Class,
            "struct" => NodeKind::Struct,
            "enum" => NodeKind::Enum,
            "protocol" => NodeKind::Protocol,
            "extension" => NodeKind::Extension,
            "var" | "let" if at_top_level => NodeKind::VarGlobal,
            "var" | "let" if is_static => NodeKind::VarStatic,
            "var" | "let" if is_class_member => NodeKind::VarClass,
            "var" | "let" => NodeKind::VarInstance,
            "func" if at_top_level => NodeKind::FunctionFree,
            "func" if is_static => NodeKind::FunctionMethodStatic,
            "func" if is_class_member => NodeKind::FunctionMethodClass,
            "func" | "init" | "init?" | "init!" | "deinit" if in_type_body => {
                NodeKind::FunctionMethodInstance
            }
            "subscript" if in_type_body => NodeKind::FunctionSubscript,
            "typealias" if in_type_body => NodeKind::TypeAlias,
            "associatedtype" if in_type_body => NodeKind::AssociatedType,
            "case" if scope.is_some_and(|scope| scope.kind == NodeKind::Enum) && in_type_body => {
                NodeKind::EnumCase
            }
            _ => return None,
        };

        let end = self.statement_end(start);
        let mut node = SyntaxNode::new(kind, keyword_at, end - keyword_at);
        for attribute in attributes {
            node = node.with_attribute(attribute);
        }

        if let Some(name) = self.declaration_name(keyword, keyword_at, pos, end) {
            node = node.with_name(name);
        }

        if kind.is_type_declaration()
            && let Some(open) = (pos..end).find(|&idx| self.bytes[idx] == b'{' && !self.mask[idx])
        {
            let close = self.pairs[&open];
            node = node.with_body(open + 1, close - open - 1);
        }

        Some(node)
    }

    fn declaration_name(&self, keyword: &str, keyword_at: usize, after: usize, end: usize) -> Option<String> {
        match keyword {
            "init" | "init?" | "init!" | "subscript" => self.with_parameters(keyword_at, keyword_at + keyword.len(), end),
            "deinit" => Some("deinit".to_string()),
            "func" => {
                let (_, at, next) = self.word(after)?;
                self.with_parameters(at, next, end)
            }
            _ => {
                let (name, _, _) = self.word(after)?;
                Some(name.trim_end_matches(':').to_string())
            }
        }
    }

    /// Text from `from` through the parameter list that follows `after`
    fn with_parameters(&self, from: usize, after: usize, end: usize) -> Option<String> {
        let open = (after..end).find(|&idx| self.bytes[idx] == b'(')?;
        let close = *self.pairs.get(&open)?;
        Some(self.text[from..=close].to_string())
    }

    /// Next word at or after `pos` on the same line: `(word, start, end)`
    fn word(&self, pos: usize) -> Option<(&'a str, usize, usize)> {
        let mut start = pos;
        while start < self.bytes.len() && matches!(self.bytes[start], b' ' | b'\t') {
            start += 1;
        }
        let mut end = start;
        while end < self.bytes.len()
            && (self.bytes[end].is_ascii_alphanumeric() || matches!(self.bytes[end], b'_' | b'@' | b'?' | b'!'))
        {
            end += 1;
        }
        if end == start {
            return None;
        }
        Some((&self.text[start..end], start, end))
    }

    /// End of the statement starting at `start`: the first line break
    /// outside any bracket opened after `start`
    fn statement_end(&self, start: usize) -> usize {
        let mut idx = start;
        while idx < self.bytes.len() {
            if self.mask[idx] {
                idx += 1;
                continue;
            }
            match self.bytes[idx] {
                b'(' | b'[' | b'{' => idx = self.pairs[&idx] + 1,
                b')' | b']' | b'}' | b'\n' => return idx,
                _ => idx += 1,
            }
        }
        idx
    }
}

fn lex_regions(text: &str) -> Vec<ExcludedRegion> {
    let bytes = text.as_bytes();
    let line_end = |from: usize| {
        bytes[from..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(bytes.len(), |p| from + p)
    };

    let mut regions = Vec::new();
    let mut idx = 0;
    while idx < bytes.len() {
        let rest = &bytes[idx..];
        if rest.starts_with(b"///") {
            let end = line_end(idx);
            regions.push(ExcludedRegion::new(RegionKind::DocComment, idx, end - idx));
            idx = end;
        } else if rest.starts_with(b"//") {
            let end = line_end(idx);
            regions.push(ExcludedRegion::new(RegionKind::Comment, idx, end - idx));
            idx = end;
        } else if rest.starts_with(b"/*") {
            let end = text[idx + 2..]
                .find("*/")
                .map_or(bytes.len(), |p| idx + 2 + p + 2);
            regions.push(ExcludedRegion::new(RegionKind::Comment, idx, end - idx));
            idx = end;
        } else if rest.starts_with(b"\"\"\"") {
            let end = text[idx + 3..]
                .find("\"\"\"")
                .map_or(bytes.len(), |p| idx + 3 + p + 3);
            regions.push(ExcludedRegion::new(RegionKind::String, idx, end - idx));
            idx = end;
        } else if rest[0] == b'"' {
            let mut end = idx + 1;
            while end < bytes.len() && bytes[end] != b'"' && bytes[end] != b'\n' {
                end += if bytes[end] == b'\\' { 2 } else { 1 };
            }
            let end = if end < bytes.len() && bytes[end] == b'"' {
                end + 1
            } else {
                end.min(bytes.len())
            };
            regions.push(ExcludedRegion::new(RegionKind::String, idx, end - idx));
            idx = end;
        } else {
            idx += 1;
        }
    }
    regions
}

/// Nest flat nodes by containment under `root`
fn assemble(root: SyntaxNode, mut nodes: Vec<SyntaxNode>) -> SyntaxNode {
    nodes.sort_by_key(|node| (node.offset, Reverse(node.end())));

    let mut stack = vec![root];
    for node in nodes {
        while stack.len() > 1 {
            let top = &stack[stack.len() - 1];
            if node.offset >= top.offset && node.end() <= top.end() {
                break;
            }
            close_top(&mut stack);
        }
        stack.push(node);
    }
    while stack.len() > 1 {
        close_top(&mut stack);
    }
    stack.remove(0)
}

fn close_top(stack: &mut Vec<SyntaxNode>) {
    if let Some(done) = stack.pop()
        && let Some(parent) = stack.last_mut()
    {
        parent.children.push(done);
    }
}
