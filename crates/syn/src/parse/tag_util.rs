use std::fmt::{Display, Formatter};

use crate::node::SynTag;
use crate::SyntaxNode;

use SynTag::*;

impl SynTag {
    pub fn can_start_module_def(self) -> bool {
        matches!(
            self,
            ImportKw
                | GroupKw
                | TypeKw
                | FunctionKw
                | TestcaseKw
                | AltstepKw
                | ExternalKw
                | SignatureKw
                | TemplateKw
                | ConstKw
                | ModuleparKw
                | VarKw
                | TimerKw
                | PortKw
                | ControlKw
                | PrivateKw
                | PublicKw
                | FriendKw
        )
    }

    pub fn can_start_decl_stmt(self) -> bool {
        matches!(
            self,
            VarKw | ConstKw | TimerKw | PortKw | TemplateKw | TypeKw
        )
    }

    pub fn can_start_stmt(self) -> bool {
        self.can_start_expr()
            || self.can_start_decl_stmt()
            || matches!(
                self,
                IfKw | ForKw
                    | WhileKw
                    | DoKw
                    | AltKw
                    | InterleaveKw
                    | SelectKw
                    | LabelKw
                    | GotoKw
                    | BreakKw
                    | ContinueKw
                    | ReturnKw
                    | LBrace
                    | Semicolon
            )
    }

    pub fn can_start_expr(self) -> bool {
        self.is_literal_start()
            || matches!(
                self,
                Ident | LParen | LBrace | LBracket | Add | Sub | NotKw | Not4bKw
            )
    }

    /// Tokens that form a [`ValueLiteral`] on their own.
    pub fn is_literal_start(self) -> bool {
        matches!(
            self,
            Int | Float
                | StringLiteral
                | BitstringLiteral
                | TrueKw
                | FalseKw
                | NoneKw
                | PassKw
                | InconcKw
                | FailKw
                | ErrorKw
                | OmitKw
                | SelfKw
                | MtcKw
                | SystemKw
                | AllKw
                | Question
                | Mul
        )
    }

    pub fn is_opening(self) -> bool {
        matches!(self, LParen | LBracket | LBrace)
    }

    pub fn is_closing_of(self, other: SynTag) -> bool {
        matches!(
            (self, other),
            (LParen, RParen) | (LBracket, RBracket) | (LBrace, RBrace)
        )
    }

    pub fn is_closing(self) -> bool {
        matches!(self, RParen | RBracket | RBrace)
    }

    pub fn is_stmt_parsing_sync_token(self) -> bool {
        matches!(self, Semicolon | RBrace)
    }

    pub fn is_module_def_parsing_sync_token(self) -> bool {
        self.can_start_module_def() || matches!(self, Semicolon | RBrace)
    }
}

pub struct FormatTree<'a>(pub &'a SyntaxNode);

impl<'a> Display for FormatTree<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        format_tree(self.0, f)
    }
}

fn format_tree(node: &SyntaxNode, f: &mut Formatter) -> std::fmt::Result {
    let mut depth = 0;
    for ev in node.preorder_with_tokens() {
        match ev {
            rowan::WalkEvent::Enter(e) => {
                // whitespace is noise when reading a tree dump
                if matches!(&e, rowan::NodeOrToken::Token(t) if t.kind() == WS) {
                    depth += 1;
                    continue;
                }
                for _ in 0..depth {
                    f.write_str("    ")?;
                }
                match e {
                    rowan::NodeOrToken::Node(n) => writeln!(f, "{:?}", n.kind()),
                    rowan::NodeOrToken::Token(t) => writeln!(f, "{:?} {:?}", t.kind(), t.text()),
                }?;
                depth += 1;
            }
            rowan::WalkEvent::Leave(_) => {
                depth -= 1;
            }
        }
    }
    Ok(())
}
