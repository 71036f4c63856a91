use std::fmt;
use std::rc::Rc;

use smol_str::SmolStr;
use text_lines::TextLines;

use crate::ast::{AstNode, Declaration, Module, ModuleDef, Root};
use crate::parse::Parser;
use crate::{ParseError, SyntaxNode};

#[cfg(test)]
mod test;

/// A 1-based line and column. Columns count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A parsed source file.
///
/// Cloning a tree is cheap. Every node handed out by a tree stays valid for as
/// long as any clone of it is alive.
#[derive(Clone)]
pub struct Tree(Rc<TreeData>);

struct TreeData {
    source: String,
    root: SyntaxNode,
    lines: TextLines,
    errors: Vec<ParseError>,
}

impl Tree {
    pub fn parse(source: impl Into<String>) -> Tree {
        let source = source.into();
        let mut parser = Parser::new(&source);
        parser.parse();
        let (root, errors) = parser.finish();
        tracing::trace!(errors = errors.len(), "parsed tree");
        let lines = TextLines::new(&source);
        Tree(Rc::new(TreeData {
            source,
            root,
            lines,
            errors,
        }))
    }

    /// The root node, of kind [`SynTag::Root`](crate::SynTag::Root).
    pub fn root(&self) -> SyntaxNode {
        self.0.root.clone()
    }

    pub fn syntax(&self) -> Root {
        Root::cast(self.root()).expect("the parser always produces a root node")
    }

    /// The first module in this file.
    pub fn module(&self) -> Option<Module> {
        self.syntax().modules().next()
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.0.errors
    }

    pub fn text(&self) -> &str {
        &self.0.source
    }

    /// Decode a byte offset into a position. Offsets past the end are clamped,
    /// and so are offsets inside a multi-byte character, to its start.
    pub fn position(&self, offset: usize) -> Position {
        let source = &self.0.source;
        let mut offset = offset.min(source.len());
        while !source.is_char_boundary(offset) {
            offset -= 1;
        }
        let line = self.0.lines.line_index(offset);
        let start = self.0.lines.line_start(line);
        let column = source[start..offset].chars().count() + 1;
        Position {
            line: line + 1,
            column,
        }
    }

    /// Encode a position back into a byte offset.
    ///
    /// Returns `None` if the line does not exist. A column past the end of its
    /// line is clamped to the line end.
    pub fn offset(&self, pos: Position) -> Option<usize> {
        if pos.line == 0 || pos.line > self.0.lines.lines_count() {
            return None;
        }
        let start = self.0.lines.line_start(pos.line - 1);
        let line = self.0.source[start..].lines().next().unwrap_or("");
        let in_line = line
            .char_indices()
            .nth(pos.column.saturating_sub(1))
            .map_or(line.len(), |(i, _)| i);
        Some(start + in_line)
    }

    /// Names of all modules imported at module level, including imports inside
    /// groups, in source order.
    pub fn imported_modules(&self) -> Vec<SmolStr> {
        fn collect(defs: impl Iterator<Item = ModuleDef>, out: &mut Vec<SmolStr>) {
            for def in defs {
                match def.decl() {
                    Some(Declaration::Import(import)) => {
                        if let Some(name) = import.module_name() {
                            out.push(name.text());
                        }
                    }
                    Some(Declaration::Group(group)) => collect(group.defs(), out),
                    _ => {}
                }
            }
        }

        let mut out = Vec::new();
        if let Some(module) = self.module() {
            collect(module.defs(), &mut out);
        }
        out
    }
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("len", &self.0.source.len())
            .field("errors", &self.0.errors)
            .finish()
    }
}
