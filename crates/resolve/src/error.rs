use thiserror::Error;
use ttcn3_syn::SynTag;

/// A node was expected to declare names but doesn't.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{kind:?} is not a declaration")]
pub struct NotADeclaration {
    pub kind: SynTag,
}
