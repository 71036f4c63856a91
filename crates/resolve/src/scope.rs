use std::fmt;

use fnv::FnvHashMap;
use rowan::TextRange;
use smol_str::SmolStr;
use ttcn3_syn::{Position, SyntaxNode, SyntaxToken, Tree};
use vec1::Vec1;

/// A single declaration of a name.
#[derive(Clone)]
pub struct Definition {
    /// The identifier token naming the declaration
    ident: SyntaxToken,
    /// The node that declares it
    node: SyntaxNode,
    tree: Tree,
}

impl Definition {
    pub fn new(ident: SyntaxToken, node: SyntaxNode, tree: Tree) -> Self {
        Definition { ident, node, tree }
    }

    pub fn name(&self) -> &str {
        self.ident.text()
    }

    pub fn ident(&self) -> &SyntaxToken {
        &self.ident
    }

    pub fn node(&self) -> &SyntaxNode {
        &self.node
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// The range of the identifier.
    pub fn range(&self) -> TextRange {
        self.ident.text_range()
    }

    pub fn position(&self) -> Position {
        self.tree.position(self.range().start().into())
    }
}

impl fmt::Debug for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} @ {} ({:?})",
            self.name(),
            self.position(),
            self.node.kind()
        )
    }
}

/// The names declared by one syntax node.
pub struct Scope {
    node: SyntaxNode,
    tree: Tree,
    /// Every chain is kept in insertion order; lookups reverse it.
    names: FnvHashMap<SmolStr, Vec1<Definition>>,
}

impl Scope {
    pub fn new(node: SyntaxNode, tree: Tree) -> Self {
        Scope {
            node,
            tree,
            names: FnvHashMap::default(),
        }
    }

    /// The node this scope was built for.
    pub fn node(&self) -> &SyntaxNode {
        &self.node
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Record that `owner` declares `ident`.
    ///
    /// Redeclarations are never rejected; the new definition shadows the
    /// earlier ones.
    pub fn insert(&mut self, owner: &SyntaxNode, ident: SyntaxToken) {
        let def = Definition::new(ident, owner.clone(), self.tree.clone());
        let name = SmolStr::new(def.name());
        tracing::trace!(%name, owner = ?owner.kind(), "insert definition");
        match self.names.get_mut(&name) {
            Some(chain) => chain.push(def),
            None => {
                self.names.insert(name, Vec1::new(def));
            }
        }
    }

    /// All definitions of `name`, most recent first.
    pub fn lookup(&self, name: &str) -> Vec<Definition> {
        self.names
            .get(name)
            .map(|chain| chain.iter().rev().cloned().collect())
            .unwrap_or_default()
    }

    /// Every name with its chain, in no particular order. Chains are in
    /// insertion order.
    pub fn names(&self) -> impl Iterator<Item = (&SmolStr, &Vec1<Definition>)> + '_ {
        self.names.iter()
    }

    /// Every definition of this scope ordered by source position.
    pub fn definitions(&self) -> Vec<Definition> {
        let mut defs = self
            .names
            .values()
            .flat_map(|chain| chain.iter().cloned())
            .collect::<Vec<_>>();
        defs.sort_by_key(|def| def.range().start());
        defs
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("node", &self.node.kind())
            .field("names", &self.definitions())
            .finish()
    }
}

/// Look up `name`, treating a missing scope as empty.
pub fn lookup(scope: Option<&Scope>, name: &str) -> Vec<Definition> {
    scope.map(|scope| scope.lookup(name)).unwrap_or_default()
}
