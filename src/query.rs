//! Queries the command line tool answers on top of the resolver.

use std::fmt::Write;

use fnv::FnvHashSet;
use smol_str::SmolStr;
use ttcn3_resolve::{build_scope, definitions, Definition};
use ttcn3_syn::ast::AstNode;
use ttcn3_syn::{Position, SynTag, SyntaxToken, Tree};
use unicode_width::UnicodeWidthStr;

#[cfg(test)]
mod test;

/// The identifier token touching `offset`. A cursor right after an identifier
/// still counts as being on it.
pub fn ident_at(tree: &Tree, offset: usize) -> Option<SyntaxToken> {
    tree.root()
        .descendants_with_tokens()
        .filter_map(|el| el.into_token())
        .filter(|tok| tok.kind() == SynTag::Ident)
        .find(|tok| {
            let range = tok.text_range();
            let (start, end) = (u32::from(range.start()), u32::from(range.end()));
            start as usize <= offset && offset <= end as usize
        })
}

/// Resolve the identifier at `pos` by asking each enclosing node in turn.
///
/// Returns the definitions found at the innermost node that declares the
/// name, most recent first.
pub fn goto_definition(tree: &Tree, pos: Position) -> Vec<Definition> {
    let ident = match tree.offset(pos).and_then(|offset| ident_at(tree, offset)) {
        Some(ident) => ident,
        None => return vec![],
    };
    let name = ident.text().to_owned();
    tracing::debug!(%name, %pos, "goto definition");

    ident
        .parent()
        .into_iter()
        .flat_map(|parent| parent.ancestors())
        .map(|node| definitions(&name, &node, tree))
        .find(|defs| !defs.is_empty())
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: SmolStr,
    pub kind: SynTag,
    pub position: Position,
}

/// Everything declared at module scope, in source order.
pub fn symbols(tree: &Tree) -> Vec<Symbol> {
    let module = match tree.module() {
        Some(module) => module,
        None => return vec![],
    };
    build_scope(module.node(), tree)
        .map(|scope| scope.definitions())
        .unwrap_or_default()
        .into_iter()
        .map(|def| Symbol {
            name: def.name().into(),
            kind: def.node().kind(),
            position: def.position(),
        })
        .collect()
}

/// A name declared more than once in the same scope.
#[derive(Debug, Clone)]
pub struct Redeclaration {
    /// The definition that shadows the earlier ones.
    pub latest: Definition,
    /// Earlier definitions, oldest first.
    pub previous: Vec<Definition>,
}

/// Find every name declared more than once within a single scope.
///
/// A definition can be visible from several scopes (group members are also
/// module members), so each shadowing definition is reported only once.
pub fn redeclarations(tree: &Tree) -> Vec<Redeclaration> {
    let mut seen = FnvHashSet::default();
    let mut found = vec![];
    for node in tree.root().descendants() {
        let scope = match build_scope(&node, tree) {
            Some(scope) => scope,
            None => continue,
        };
        for (name, chain) in scope.names() {
            if chain.len() < 2 {
                continue;
            }
            let latest = chain.last().clone();
            if !seen.insert((name.clone(), latest.range().start())) {
                continue;
            }
            let previous = chain.iter().take(chain.len() - 1).cloned().collect();
            found.push(Redeclaration { latest, previous });
        }
    }
    found.sort_by_key(|r| r.latest.range().start());
    found
}

/// Render a redeclaration with the offending line and a caret under the name.
pub fn render_redeclaration(file: &str, redecl: &Redeclaration) -> String {
    let def = &redecl.latest;
    let pos = def.position();
    let text = def.tree().text();
    let line = text.lines().nth(pos.line - 1).unwrap_or("");
    let prefix = line
        .char_indices()
        .nth(pos.column - 1)
        .map_or(line, |(i, _)| &line[..i]);
    let gutter = " ".repeat(pos.line.to_string().len());

    let mut out = String::new();
    let _ = writeln!(out, "error: `{}` is declared more than once", def.name());
    let _ = writeln!(out, "{}--> {}:{}", gutter, file, pos);
    let _ = writeln!(out, "{} |", gutter);
    let _ = writeln!(out, "{} | {}", pos.line, line);
    let _ = writeln!(
        out,
        "{} | {}{}",
        gutter,
        " ".repeat(prefix.width()),
        "^".repeat(def.name().width().max(1))
    );
    for prev in &redecl.previous {
        let _ = writeln!(out, "{} = note: previously declared at {}", gutter, prev.position());
    }
    out
}
