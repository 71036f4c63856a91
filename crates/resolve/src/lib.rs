//! Static name resolution for TTCN-3 syntax trees.
//!
//! A [`Scope`] is built on demand for a single syntax node and only knows the
//! names that node declares. Walking outwards through enclosing nodes is left
//! to the caller.

mod builder;
pub mod error;
mod scope;

#[cfg(test)]
mod test;

pub use builder::build_scope;
pub use error::NotADeclaration;
pub use scope::{lookup, Definition, Scope};

use ttcn3_syn::{SyntaxNode, Tree};

/// Find the declarations of `name` made directly by `node`.
///
/// Returns an empty list if `node` is not a declarative region or does not
/// declare `name`. Multiple results are ordered most recent first.
pub fn definitions(name: &str, node: &SyntaxNode, tree: &Tree) -> Vec<Definition> {
    lookup(build_scope(node, tree).as_ref(), name)
}
