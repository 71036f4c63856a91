use rowan::TextRange;
use smol_str::SmolStr;

use crate::SynTag;
use crate::{SyntaxNode, SyntaxToken};

/// Generate boilerplate code for this ast node.
///
/// This macro has 3 patterns:
///
/// 1.  Expects a single [`SynTag`] and generates a struct that
///     casts the [`SyntaxNode`] with the specific tag.
/// 2.  Expects a list of tag-variant-type triples and generates an enum that
///     casts into whichever variant matches.
/// 3.  `token:` generates a struct whose kind is decided by its first token,
///     together with an enum of the possible kinds.
macro_rules! ast_node {
    ($name:ident, $kind:pat) => {
        #[derive(Debug, Hash, PartialEq, Eq, Clone)]
        pub struct $name {
            node: SyntaxNode,
        }

        impl AstNode for $name {
            fn cast(node: SyntaxNode) -> Option<Self> {
                match node.kind() {
                    $kind => Some(Self{ node }),
                    _ => None,
                }
            }

            fn node(&self) -> &SyntaxNode {
                &self.node
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.node)
            }
        }
    };
    ($name:ident, {
        $( $kind:pat => ($kind_name:ident, $ty:ty) ),* $(,)?
    }) => {
        #[derive(Debug, Hash, PartialEq, Eq, Clone)]
        pub enum $name {
            $($kind_name($ty)),*
        }

        impl AstNode for $name {
            fn cast(node: SyntaxNode) -> Option<Self> {
                match node.kind() {
                    $(
                        $kind => <$ty>::cast(node).map(Self::$kind_name),
                    )*
                    _=> None
                }
            }

            fn node(&self) -> &SyntaxNode {
                match self { $(
                    Self::$kind_name(val) => val.node(),
                )* }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.node())
            }
        }
    };
    (token: $name:ident, $node_kind:pat, $enum_name:ident, {
        $( $kind:pat => $kind_name:ident ),* $(,)?
    }) => {
        #[derive(Debug, Hash, PartialEq, Eq, Clone, Copy)]
        pub enum $enum_name {
            $($kind_name),*
        }

        #[derive(Debug, Hash, PartialEq, Eq, Clone)]
        pub struct $name {
            kind: $enum_name,
            node: SyntaxNode,
            token: SyntaxToken,
        }

        impl $name {
            pub fn token(&self) -> &SyntaxToken {
                &self.token
            }

            pub fn kind(&self) -> $enum_name {
                self.kind
            }
        }

        impl AstNode for $name {
            fn cast(node: SyntaxNode) -> Option<Self> {
                if !matches!(node.kind(), $node_kind) {
                    return None;
                }
                let token = node
                    .children_with_tokens()
                    .filter_map(|el| el.into_token())
                    .find(|tok| !tok.kind().is_trivia())?;
                let kind = match token.kind() {
                    $(
                        $kind => Some($enum_name::$kind_name),
                    )*
                    _ => None
                }?;

                Some($name { kind, node, token })
            }

            fn node(&self) -> &SyntaxNode {
                &self.node
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{:?}: {}", self.kind(), self.node())
            }
        }
    };
}

/// Implements various methods to access a node's children.
///
/// Variants for selecting a single child (returns `None` if not available):
///
/// - `1` for the first node satisfying requirements
/// - `tok1` for the first token satisfying requirements
/// - `nth` for the `n`th node satisfying requirements
///
/// `tok1!` asserts the token always exists. It is only used where the parser
/// never creates the node without that token.
///
/// Variants for selecting many children (returns an iterator):
///
/// - `n` for all nodes satisfying requirements
macro_rules! impl_child {
    (1, $fn_name:ident, $ty:ty) => {
        pub fn $fn_name(&self) -> Option<$ty> {
            self.node().children().find_map(<$ty>::cast)
        }
    };
    (1, $fn_name:ident, $tag:pat, $ty:ty) => {
        pub fn $fn_name(&self) -> Option<$ty> {
            self.node()
                .children()
                .filter(|node| matches!(node.kind(), $tag))
                .find_map(<$ty>::cast)
        }
    };
    (tok1, $fn_name:ident, $pat:expr) => {
        pub fn $fn_name(&self) -> Option<SyntaxToken> {
            self.node()
                .children_with_tokens()
                .filter_map(|el| el.into_token())
                .find(|tok| $pat(tok.kind()))
        }
    };
    (tok1!, $fn_name:ident, $pat:expr) => {
        pub fn $fn_name(&self) -> SyntaxToken {
            self.node()
                .children_with_tokens()
                .filter_map(|el| el.into_token())
                .find(|tok| $pat(tok.kind()))
                .expect(concat!("No such child satisfying: ", stringify!($pat)))
        }
    };
    (nth, $fn_name:ident, $ty:ty, $n:expr) => {
        pub fn $fn_name(&self) -> Option<$ty> {
            self.node().children().filter_map(<$ty>::cast).nth($n)
        }
    };
    (n, $fn_name:ident, $ty:ty $(, skip = $skip:expr)?) => {
        pub fn $fn_name(&self) -> impl Iterator<Item = $ty> + '_ {
            self.node().children().filter_map(<$ty>::cast)$(.skip($skip))?
        }
    };
}

pub trait AstNode: Sized {
    /// Cast the specified syntax node into this type
    fn cast(node: SyntaxNode) -> Option<Self>;

    /// Get the corresponding syntax node of this type
    fn node(&self) -> &SyntaxNode;

    /// Get the text span of this type
    fn span(&self) -> TextRange {
        self.node().text_range()
    }
}

// === Module level ===

ast_node!(Root, SynTag::Root);
impl Root {
    impl_child!(n, modules, Module);
}

ast_node!(Module, SynTag::Module);
impl Module {
    impl_child!(1, name, Name);
    impl_child!(n, defs, ModuleDef);
}

ast_node!(ModuleDef, SynTag::ModuleDef);
impl ModuleDef {
    impl_child!(1, visibility, Visibility);
    impl_child!(1, decl, Declaration);

    /// The child nodes that should hold this definition's declaration,
    /// i.e. everything except visibility and attributes.
    pub fn decl_candidates(&self) -> impl Iterator<Item = SyntaxNode> + '_ {
        self.node()
            .children()
            .filter(|node| !matches!(node.kind(), SynTag::Visibility | SynTag::WithSpec))
    }
}

ast_node!(token: Visibility, SynTag::Visibility, VisibilityKind, {
    SynTag::PrivateKw => Private,
    SynTag::PublicKw => Public,
    SynTag::FriendKw => Friend,
});

// Every construct that may be declared at module level or as a statement.
ast_node!(Declaration, {
    SynTag::ImportDecl => (Import, ImportDecl),
    SynTag::GroupDecl => (Group, GroupDecl),
    SynTag::SubTypeDecl => (SubType, SubTypeDecl),
    SynTag::StructTypeDecl => (StructType, StructTypeDecl),
    SynTag::EnumTypeDecl => (EnumType, EnumTypeDecl),
    SynTag::ComponentTypeDecl => (ComponentType, ComponentTypeDecl),
    SynTag::PortTypeDecl => (PortType, PortTypeDecl),
    SynTag::BehaviourTypeDecl => (BehaviourType, BehaviourTypeDecl),
    SynTag::FuncDecl => (Func, FuncDecl),
    SynTag::SignatureDecl => (Signature, SignatureDecl),
    SynTag::TemplateDecl => (Template, TemplateDecl),
    SynTag::ValueDecl => (Value, ValueDecl),
    SynTag::ControlPart => (Control, ControlPart),
});

ast_node!(Name, SynTag::Name);
impl Name {
    impl_child!(tok1!, ident, |o| o == SynTag::Ident);

    pub fn text(&self) -> SmolStr {
        SmolStr::new(self.ident().text())
    }
}

ast_node!(ImportDecl, SynTag::ImportDecl);
impl ImportDecl {
    impl_child!(1, module_name, Name);
}

ast_node!(GroupDecl, SynTag::GroupDecl);
impl GroupDecl {
    impl_child!(1, name, Name);
    impl_child!(n, defs, ModuleDef);
}

ast_node!(ControlPart, SynTag::ControlPart);
impl ControlPart {
    impl_child!(tok1!, keyword, |o| o == SynTag::ControlKw);
    impl_child!(1, body, BlockStmt);
}

// === Types ===

ast_node!(SubTypeDecl, SynTag::SubTypeDecl);
impl SubTypeDecl {
    impl_child!(1, field, Field);
}

ast_node!(StructTypeDecl, SynTag::StructTypeDecl);
impl StructTypeDecl {
    impl_child!(1, name, Name);
    impl_child!(1, type_pars, TypePars);
    impl_child!(n, fields, Field);
}

ast_node!(EnumTypeDecl, SynTag::EnumTypeDecl);
impl EnumTypeDecl {
    impl_child!(1, name, Name);
    impl_child!(1, type_pars, TypePars);
    impl_child!(n, enumerators, Expr);
}

ast_node!(ComponentTypeDecl, SynTag::ComponentTypeDecl);
impl ComponentTypeDecl {
    impl_child!(1, name, Name);
    impl_child!(1, type_pars, TypePars);
    impl_child!(1, body, BlockStmt);
}

ast_node!(PortTypeDecl, SynTag::PortTypeDecl);
impl PortTypeDecl {
    impl_child!(1, name, Name);
    impl_child!(1, type_pars, TypePars);
    impl_child!(n, map_params, PortMapAttribute);
}

// `map param (...)` or `unmap param (...)` inside a port type body.
ast_node!(PortMapAttribute, SynTag::PortMapAttribute);
impl PortMapAttribute {
    impl_child!(1, pars, FormalPars);
}

ast_node!(BehaviourTypeDecl, SynTag::BehaviourTypeDecl);
impl BehaviourTypeDecl {
    impl_child!(1, name, Name);
    impl_child!(1, type_pars, TypePars);
    impl_child!(1, pars, FormalPars);
}

ast_node!(Field, SynTag::Field);
impl Field {
    impl_child!(1, type_spec, TypeSpec);
    impl_child!(1, name, Name);
    impl_child!(1, type_pars, TypePars);
    impl_child!(tok1, optional, |o| o == SynTag::OptionalKw);
}

ast_node!(TypeSpec, {
    SynTag::RefSpec => (Ref, RefSpec),
    SynTag::StructSpec => (Struct, StructSpec),
    SynTag::ListSpec => (List, ListSpec),
    SynTag::EnumSpec => (Enum, EnumSpec),
    SynTag::BehaviourSpec => (Behaviour, BehaviourSpec),
});

ast_node!(RefSpec, SynTag::RefSpec);

ast_node!(StructSpec, SynTag::StructSpec);
impl StructSpec {
    impl_child!(n, fields, Field);
}

ast_node!(ListSpec, SynTag::ListSpec);
impl ListSpec {
    impl_child!(1, element, TypeSpec);
}

ast_node!(EnumSpec, SynTag::EnumSpec);
impl EnumSpec {
    impl_child!(n, enumerators, Expr);
}

ast_node!(BehaviourSpec, SynTag::BehaviourSpec);
impl BehaviourSpec {
    impl_child!(1, pars, FormalPars);
}

// === Behaviour ===

ast_node!(FuncDecl, SynTag::FuncDecl);
impl FuncDecl {
    impl_child!(tok1, external, |o| o == SynTag::ExternalKw);
    impl_child!(tok1, keyword, |o| matches!(
        o,
        SynTag::FunctionKw | SynTag::TestcaseKw | SynTag::AltstepKw
    ));
    impl_child!(1, name, Name);
    impl_child!(1, type_pars, TypePars);
    impl_child!(1, pars, FormalPars);
    impl_child!(1, return_spec, ReturnSpec);
    impl_child!(1, body, BlockStmt);
}

ast_node!(ReturnSpec, SynTag::ReturnSpec);
impl ReturnSpec {
    impl_child!(1, type_spec, TypeSpec);
}

ast_node!(SignatureDecl, SynTag::SignatureDecl);
impl SignatureDecl {
    impl_child!(1, name, Name);
    impl_child!(1, type_pars, TypePars);
    impl_child!(1, pars, FormalPars);
}

ast_node!(TemplateDecl, SynTag::TemplateDecl);
impl TemplateDecl {
    impl_child!(1, type_spec, TypeSpec);
    impl_child!(1, name, Name);
    impl_child!(1, type_pars, TypePars);
    impl_child!(1, pars, FormalPars);
}

ast_node!(TypePars, SynTag::TypePars);
impl TypePars {
    impl_child!(n, pars, FormalPar);
}

ast_node!(FormalPars, SynTag::FormalPars);
impl FormalPars {
    impl_child!(n, pars, FormalPar);
}

ast_node!(FormalPar, SynTag::FormalPar);
impl FormalPar {
    impl_child!(1, name, Name);
}

ast_node!(token: ValueDecl, SynTag::ValueDecl, ValueDeclKind, {
    SynTag::ConstKw => Const,
    SynTag::VarKw => Var,
    SynTag::ModuleparKw => ModulePar,
    SynTag::TimerKw => Timer,
    SynTag::PortKw => Port,
});
impl ValueDecl {
    impl_child!(tok1, template, |o| o == SynTag::TemplateKw);
    impl_child!(1, type_spec, TypeSpec);
    impl_child!(n, declarators, Declarator);
}

ast_node!(Declarator, SynTag::Declarator);
impl Declarator {
    impl_child!(1, name, Name);
    impl_child!(1, value, Expr);
}

// === Statements ===

ast_node!(Stmt, {
    SynTag::DeclStmt => (Decl, DeclStmt),
    SynTag::ExprStmt => (Expr, ExprStmt),
    SynTag::BlockStmt => (Block, BlockStmt),
    SynTag::IfStmt => (If, IfStmt),
    SynTag::ForStmt => (For, ForStmt),
    SynTag::WhileStmt => (While, WhileStmt),
    SynTag::DoWhileStmt => (DoWhile, DoWhileStmt),
    SynTag::AltStmt => (Alt, AltStmt),
    SynTag::SelectStmt => (Select, SelectStmt),
    SynTag::BranchStmt => (Branch, BranchStmt),
    SynTag::ReturnStmt => (Return, ReturnStmt),
});

ast_node!(BlockStmt, SynTag::BlockStmt);
impl BlockStmt {
    impl_child!(n, stmts, Stmt);
}

ast_node!(DeclStmt, SynTag::DeclStmt);
impl DeclStmt {
    impl_child!(1, decl, Declaration);
}

ast_node!(ExprStmt, SynTag::ExprStmt);
impl ExprStmt {
    impl_child!(1, expr, Expr);
}

ast_node!(IfStmt, SynTag::IfStmt);
impl IfStmt {
    impl_child!(1, cond, Expr);
    impl_child!(nth, then_block, BlockStmt, 0);
    impl_child!(nth, else_block, BlockStmt, 1);
    impl_child!(1, else_if, IfStmt);
}

ast_node!(ForStmt, SynTag::ForStmt);
impl ForStmt {
    impl_child!(1, init_decl, DeclStmt);
    impl_child!(1, body, BlockStmt);
}

ast_node!(WhileStmt, SynTag::WhileStmt);
impl WhileStmt {
    impl_child!(1, body, BlockStmt);
}

ast_node!(DoWhileStmt, SynTag::DoWhileStmt);
impl DoWhileStmt {
    impl_child!(1, body, BlockStmt);
}

ast_node!(token: AltStmt, SynTag::AltStmt, AltKind, {
    SynTag::AltKw => Alt,
    SynTag::InterleaveKw => Interleave,
});
impl AltStmt {
    impl_child!(n, guards, AltGuard);
}

ast_node!(AltGuard, SynTag::AltGuard);
impl AltGuard {
    impl_child!(1, body, BlockStmt);
}

ast_node!(SelectStmt, SynTag::SelectStmt);
impl SelectStmt {
    impl_child!(n, cases, CaseClause);
}

ast_node!(CaseClause, SynTag::CaseClause);
impl CaseClause {
    impl_child!(1, body, BlockStmt);
}

ast_node!(token: BranchStmt, SynTag::BranchStmt, BranchKind, {
    SynTag::LabelKw => Label,
    SynTag::GotoKw => Goto,
    SynTag::BreakKw => Break,
    SynTag::ContinueKw => Continue,
});
impl BranchStmt {
    impl_child!(1, label, Name);
}

ast_node!(ReturnStmt, SynTag::ReturnStmt);
impl ReturnStmt {
    impl_child!(1, expr, Expr);
}

// === Expressions ===

ast_node!(Expr, {
    SynTag::IdentExpr => (Ident, IdentExpr),
    SynTag::ValueLiteral => (Literal, ValueLiteral),
    SynTag::CompositeLiteral => (Composite, CompositeLiteral),
    SynTag::ParenExpr => (Paren, ParenExpr),
    SynTag::UnaryExpr => (Unary, UnaryExpr),
    SynTag::BinaryExpr => (Binary, BinaryExpr),
    SynTag::CallExpr => (Call, CallExpr),
    SynTag::SelectorExpr => (Selector, SelectorExpr),
    SynTag::IndexExpr => (Index, IndexExpr),
});

ast_node!(IdentExpr, SynTag::IdentExpr);
impl IdentExpr {
    impl_child!(tok1!, ident, |o| o == SynTag::Ident);
}

ast_node!(token: ValueLiteral, SynTag::ValueLiteral, LiteralKind, {
    SynTag::Int => Int,
    SynTag::Float => Float,
    SynTag::StringLiteral => String,
    SynTag::BitstringLiteral => Bitstring,
    SynTag::TrueKw | SynTag::FalseKw => Bool,
    SynTag::NoneKw | SynTag::PassKw | SynTag::InconcKw | SynTag::FailKw | SynTag::ErrorKw => Verdict,
    SynTag::OmitKw | SynTag::SelfKw | SynTag::MtcKw | SynTag::SystemKw => Special,
    SynTag::AllKw | SynTag::Ident | SynTag::Question | SynTag::Mul | SynTag::Sub => Matching,
});

ast_node!(CompositeLiteral, SynTag::CompositeLiteral);
impl CompositeLiteral {
    impl_child!(n, items, Expr);
}

ast_node!(ParenExpr, SynTag::ParenExpr);
impl ParenExpr {
    impl_child!(n, items, Expr);
}

ast_node!(UnaryExpr, SynTag::UnaryExpr);
impl UnaryExpr {
    impl_child!(1, operand, Expr);
}

ast_node!(BinaryExpr, SynTag::BinaryExpr);
impl BinaryExpr {
    impl_child!(nth, lhs, Expr, 0);
    impl_child!(nth, rhs, Expr, 1);
}

ast_node!(CallExpr, SynTag::CallExpr);
impl CallExpr {
    impl_child!(1, callee, Expr);
    impl_child!(1, args, ArgList);
}

ast_node!(ArgList, SynTag::ArgList);
impl ArgList {
    impl_child!(n, args, Expr);
}

ast_node!(SelectorExpr, SynTag::SelectorExpr);
impl SelectorExpr {
    impl_child!(1, base, Expr);

    pub fn field(&self) -> Option<IdentExpr> {
        self.node().children().skip(1).find_map(IdentExpr::cast)
    }
}

ast_node!(IndexExpr, SynTag::IndexExpr);
impl IndexExpr {
    impl_child!(n, exprs, Expr);
}

// Every node that introduces a declarative region.
ast_node!(ScopeNode, {
    SynTag::Module => (Module, Module),
    SynTag::GroupDecl => (Group, GroupDecl),
    SynTag::FuncDecl => (Func, FuncDecl),
    SynTag::TemplateDecl => (Template, TemplateDecl),
    SynTag::SignatureDecl => (Signature, SignatureDecl),
    SynTag::BehaviourTypeDecl => (BehaviourType, BehaviourTypeDecl),
    SynTag::BehaviourSpec => (BehaviourSpec, BehaviourSpec),
    SynTag::SubTypeDecl => (SubType, SubTypeDecl),
    SynTag::Field => (Field, Field),
    SynTag::StructTypeDecl => (StructType, StructTypeDecl),
    SynTag::StructSpec => (StructSpec, StructSpec),
    SynTag::EnumTypeDecl => (EnumType, EnumTypeDecl),
    SynTag::EnumSpec => (EnumSpec, EnumSpec),
    SynTag::ComponentTypeDecl => (ComponentType, ComponentTypeDecl),
    SynTag::PortTypeDecl => (PortType, PortTypeDecl),
    SynTag::PortMapAttribute => (PortMap, PortMapAttribute),
    SynTag::FormalPars => (FormalPars, FormalPars),
    SynTag::TypePars => (TypePars, TypePars),
    SynTag::BlockStmt => (Block, BlockStmt),
    SynTag::ForStmt => (For, ForStmt),
    SynTag::IfStmt => (If, IfStmt),
    SynTag::AltStmt => (Alt, AltStmt),
});
