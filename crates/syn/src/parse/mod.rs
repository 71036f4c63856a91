use rowan::{Checkpoint, GreenNodeBuilder, TextRange};

pub mod error_report;
mod expr;
mod pratt_util;
mod stmt;
pub mod tag_util;

use crate::node::SynTag::{self, *};
use crate::{Lexer, SyntaxNode};
use error_report::{IntoTextRange, ParseError, ParseErrorKind};

pub type Errors = Vec<ParseError>;

pub struct Parser<'src> {
    /// The lexer that does the job.
    lexer: Lexer<'src>,

    /// The real syntax tree builder.
    ///
    /// Its short name is due to the fact that it's called _very_ often.
    b: GreenNodeBuilder<'static>,

    /// List of errors.
    errors: Errors,
}

impl<'src> Parser<'src> {
    pub fn new(s: &'src str) -> Self {
        Parser {
            lexer: Lexer::new(s),
            b: GreenNodeBuilder::new(),
            errors: Vec::new(),
        }
    }

    pub fn parse(&mut self) {
        self.parse_root()
    }

    pub fn finish(self) -> (SyntaxNode, Errors) {
        (SyntaxNode::new_root(self.b.finish()), self.errors)
    }

    /// The raw lookahead index of the `n`th significant (non-trivia) token.
    fn nth_raw_index(&mut self, n: usize) -> Option<usize> {
        let mut seen = 0;
        let mut i = 0;
        loop {
            let tok = self.lexer.peek_nth(i)?;
            if !tok.is_trivia() {
                if seen == n {
                    return Some(i);
                }
                seen += 1;
            }
            i += 1;
        }
    }

    fn nth(&mut self, n: usize) -> Option<SynTag> {
        let i = self.nth_raw_index(n)?;
        self.lexer.peek_nth(i)
    }

    fn peek(&mut self) -> Option<SynTag> {
        self.nth(0)
    }

    fn at(&mut self, s: SynTag) -> bool {
        self.peek() == Some(s)
    }

    fn nth_at(&mut self, n: usize, s: SynTag) -> bool {
        self.nth(n) == Some(s)
    }

    fn peek_if<F: FnOnce(SynTag) -> bool>(&mut self, f: F) -> bool {
        self.peek().map_or(false, f)
    }

    /// Whether the `n`th significant token is the identifier `text`.
    ///
    /// Used for contextual words like `length` that are not reserved.
    fn nth_is_word(&mut self, n: usize, text: &str) -> bool {
        match self.nth_raw_index(n) {
            Some(i) => {
                self.lexer.peek_nth(i) == Some(Ident) && self.lexer.peek_nth_slice(i) == text
            }
            None => false,
        }
    }

    fn next_span(&mut self) -> TextRange {
        match self.nth_raw_index(0) {
            Some(i) => self.lexer.peek_nth_span(i).into_text_range(),
            None => {
                let end = self.lexer.source().len();
                (end..end).into_text_range()
            }
        }
    }

    fn log_err(&mut self, kind: ParseErrorKind) {
        let span = self.next_span();
        tracing::trace!(?span, %kind, "parse error");
        self.errors.push(ParseError::error(span, kind))
    }

    fn eat_trivia(&mut self) {
        while self.lexer.peek().map_or(false, |t| t.is_trivia()) {
            if let Some(tok) = self.lexer.next() {
                self.b.token(tok.into(), self.lexer.slice());
            }
        }
    }

    /// Consume the next significant token, together with the trivia before it.
    fn bump(&mut self) -> Option<SynTag> {
        self.eat_trivia();
        let tok = self.lexer.next()?;
        debug_assert!(tok.is_token());
        if tok == SynTag::Error {
            let span = self.lexer.span().into_text_range();
            self.errors
                .push(ParseError::error(span, ParseErrorKind::InvalidToken));
        }
        self.b.token(tok.into(), self.lexer.slice());
        Some(tok)
    }

    fn eat(&mut self, s: SynTag) -> bool {
        if self.at(s) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, s: SynTag) -> bool {
        if self.eat(s) {
            true
        } else {
            let got = self.peek();
            self.log_err(ParseErrorKind::Expected { expected: s, got });
            false
        }
    }

    /// Start a node. Trivia before the node is placed outside of it.
    fn start_node(&mut self, tag: SynTag) {
        self.eat_trivia();
        self.b.start_node(tag.into());
    }

    fn start_node_at(&mut self, checkpoint: Checkpoint, tag: SynTag) {
        self.b.start_node_at(checkpoint, tag.into());
    }

    fn finish_node(&mut self) {
        self.b.finish_node();
    }

    fn checkpoint(&mut self) -> Checkpoint {
        self.eat_trivia();
        self.b.checkpoint()
    }

    /// Consume one token. If it opens a bracket, consume everything up to and
    /// including the matching closing bracket.
    fn bump_balanced(&mut self) {
        let mut stack = Vec::new();
        loop {
            let tok = match self.bump() {
                Some(tok) => tok,
                None => break,
            };
            if tok.is_opening() {
                stack.push(tok);
            } else if tok.is_closing() {
                if let Some(&open) = stack.last() {
                    if open.is_closing_of(tok) {
                        stack.pop();
                    }
                }
            }
            if stack.is_empty() {
                break;
            }
        }
    }

    /// Wrap a bracketed region into a node without looking inside.
    fn skip_balanced(&mut self, tag: SynTag) {
        self.start_node(tag);
        self.bump_balanced();
        self.finish_node();
    }

    /// Log an error and wrap the next token (and its bracketed contents) into
    /// an [`ErrorNode`].
    fn error_bump(&mut self, kind: ParseErrorKind) {
        self.log_err(kind);
        if self.peek().is_some() {
            self.skip_balanced(ErrorNode);
        }
    }

    /// Skip tokens until `close` (which is consumed) or a token that can start
    /// a module definition.
    fn recover_until(&mut self, close: SynTag) {
        if self.eat(close) {
            return;
        }
        let got = self.peek();
        self.log_err(ParseErrorKind::Expected {
            expected: close,
            got,
        });
        self.start_node(ErrorNode);
        while let Some(tok) = self.peek() {
            if tok == close || tok.can_start_module_def() || tok == RBrace {
                break;
            }
            self.bump_balanced();
        }
        self.finish_node();
        self.eat(close);
    }
}

/// The concrete parsing implementations of module-level constructs.
///
/// # Note
///
/// - Parsing methods take care of trivia **before** the tokens they consume,
///   never after them.
/// - Trivia before a node is placed **outside** that node.
impl<'src> Parser<'src> {
    fn parse_root(&mut self) {
        self.b.start_node(Root.into());
        let mut modules = 0;
        loop {
            match self.peek() {
                None => break,
                Some(ModuleKw) => {
                    if modules == 1 {
                        self.log_err(ParseErrorKind::MultipleModules);
                    }
                    modules += 1;
                    self.parse_module();
                }
                Some(tok) => self.error_bump(ParseErrorKind::Unexpected(tok)),
            }
        }
        self.eat_trivia();
        self.b.finish_node();
    }

    fn parse_module(&mut self) {
        self.start_node(Module);
        self.bump();
        self.parse_name();

        if self.at(LanguageKw) {
            self.start_node(LanguageSpec);
            self.bump();
            self.expect(StringLiteral);
            while self.eat(Comma) {
                self.expect(StringLiteral);
            }
            self.finish_node();
        }

        if self.expect(LBrace) {
            self.parse_module_defs();
            self.expect(RBrace);
        }
        self.parse_with_spec_opt();
        self.eat(Semicolon);
        self.finish_node();
    }

    /// Parse module definitions up to (but excluding) the closing brace.
    fn parse_module_defs(&mut self) {
        loop {
            match self.peek() {
                None | Some(RBrace) => break,
                Some(Semicolon) => {
                    self.bump();
                }
                Some(tok) if tok.can_start_module_def() => self.parse_module_def(),
                Some(_) => self.recover_module_def(),
            }
        }
    }

    fn recover_module_def(&mut self) {
        self.log_err(ParseErrorKind::ExpectDecl);
        self.start_node(ErrorNode);
        loop {
            self.bump_balanced();
            match self.peek() {
                None => break,
                Some(tok) if tok.is_module_def_parsing_sync_token() => break,
                Some(_) => {}
            }
        }
        self.finish_node();
    }

    fn parse_module_def(&mut self) {
        self.start_node(ModuleDef);
        if self.peek_if(|t| matches!(t, PrivateKw | PublicKw | FriendKw)) {
            self.start_node(Visibility);
            self.bump();
            self.finish_node();
        }

        match self.peek() {
            Some(ImportKw) => self.parse_import_decl(),
            Some(GroupKw) => self.parse_group_decl(),
            Some(TypeKw) => self.parse_type_decl(),
            Some(FunctionKw | TestcaseKw | AltstepKw | ExternalKw) => self.parse_func_decl(),
            Some(SignatureKw) => self.parse_signature_decl(),
            Some(TemplateKw) => self.parse_template_decl(),
            Some(ConstKw | ModuleparKw | VarKw | TimerKw | PortKw) => self.parse_value_decl(),
            Some(ControlKw) => self.parse_control_part(),
            Some(RBrace) | None => self.log_err(ParseErrorKind::ExpectDecl),
            Some(_) => self.error_bump(ParseErrorKind::ExpectDecl),
        }

        self.parse_with_spec_opt();
        self.eat(Semicolon);
        self.finish_node();
    }

    fn parse_name(&mut self) -> bool {
        if self.at(Ident) {
            self.start_node(Name);
            self.bump();
            self.finish_node();
            true
        } else {
            let got = self.peek();
            self.log_err(ParseErrorKind::Expected {
                expected: Ident,
                got,
            });
            false
        }
    }

    fn parse_with_spec_opt(&mut self) {
        if self.at(WithKw) {
            self.start_node(WithSpec);
            self.bump();
            if self.at(LBrace) {
                self.bump_balanced();
            } else {
                let got = self.peek();
                self.log_err(ParseErrorKind::Expected {
                    expected: LBrace,
                    got,
                });
            }
            self.finish_node();
        }
    }

    fn parse_import_decl(&mut self) {
        self.start_node(ImportDecl);
        self.bump();
        self.expect(FromKw);
        self.parse_name();
        self.eat(RecursiveKw);
        if self.eat(AllKw) {
            if self.at(ExceptKw) {
                self.start_node(ImportSpec);
                self.bump();
                if self.at(LBrace) {
                    self.bump_balanced();
                }
                self.finish_node();
            }
        } else if self.at(LBrace) {
            self.skip_balanced(ImportSpec);
        } else {
            let got = self.peek();
            self.log_err(ParseErrorKind::Expected {
                expected: AllKw,
                got,
            });
        }
        self.finish_node();
    }

    fn parse_group_decl(&mut self) {
        self.start_node(GroupDecl);
        self.bump();
        self.parse_name();
        if self.expect(LBrace) {
            self.parse_module_defs();
            self.expect(RBrace);
        }
        self.finish_node();
    }

    fn parse_control_part(&mut self) {
        self.start_node(ControlPart);
        self.bump();
        self.parse_block_stmt();
        self.finish_node();
    }

    // === Types ===

    fn parse_type_decl(&mut self) {
        match self.nth(1) {
            // `type record length(4) of ...` and `type record { ... } Name` are subtypes
            Some(RecordKw | SetKw | UnionKw)
                if self.nth_at(2, Ident)
                    && !(self.nth_is_word(2, "length") && self.nth_at(3, LParen)) =>
            {
                self.parse_struct_type_decl()
            }
            Some(EnumeratedKw) => self.parse_enum_type_decl(),
            Some(ComponentKw) => self.parse_component_type_decl(),
            Some(PortKw) => self.parse_port_type_decl(),
            Some(FunctionKw | AltstepKw | TestcaseKw) => self.parse_behaviour_type_decl(),
            _ => self.parse_sub_type_decl(),
        }
    }

    fn parse_struct_type_decl(&mut self) {
        self.start_node(StructTypeDecl);
        self.bump();
        self.bump();
        self.parse_name();
        self.parse_type_pars_opt();
        self.parse_struct_fields();
        self.parse_value_constraints();
        self.finish_node();
    }

    fn parse_struct_fields(&mut self) {
        if !self.expect(LBrace) {
            return;
        }
        loop {
            match self.peek() {
                None | Some(RBrace) => break,
                Some(tok) if can_start_type(tok) => self.parse_field(),
                Some(_) => self.error_bump(ParseErrorKind::ExpectType),
            }
            if !self.eat(Comma) {
                break;
            }
        }
        self.recover_until(RBrace);
    }

    fn parse_enum_type_decl(&mut self) {
        self.start_node(EnumTypeDecl);
        self.bump();
        self.bump();
        self.parse_name();
        self.parse_type_pars_opt();
        self.parse_enum_body();
        self.finish_node();
    }

    fn parse_enum_body(&mut self) {
        if !self.expect(LBrace) {
            return;
        }
        loop {
            match self.peek() {
                None | Some(RBrace) => break,
                Some(tok) if tok.can_start_expr() => self.parse_expr(),
                Some(_) => self.error_bump(ParseErrorKind::ExpectExpr),
            }
            if !self.eat(Comma) {
                break;
            }
        }
        self.recover_until(RBrace);
    }

    fn parse_component_type_decl(&mut self) {
        self.start_node(ComponentTypeDecl);
        self.bump();
        self.bump();
        self.parse_name();
        self.parse_type_pars_opt();
        if self.at(ExtendsKw) {
            self.start_node(ExtendsSpec);
            self.bump();
            self.parse_type_spec();
            while self.eat(Comma) {
                self.parse_type_spec();
            }
            self.finish_node();
        }
        self.parse_block_stmt();
        self.finish_node();
    }

    fn parse_port_type_decl(&mut self) {
        self.start_node(PortTypeDecl);
        self.bump();
        self.bump();
        self.parse_name();
        self.parse_type_pars_opt();
        if self.peek_if(|t| matches!(t, MessageKw | ProcedureKw | MixedKw)) {
            self.bump();
        } else {
            let got = self.peek();
            self.log_err(ParseErrorKind::Expected {
                expected: MessageKw,
                got,
            });
        }
        if self.expect(LBrace) {
            loop {
                match self.peek() {
                    None | Some(RBrace) => break,
                    Some(Semicolon) => {
                        self.bump();
                    }
                    Some(MapKw | UnmapKw) if self.nth_at(1, ParamKw) => {
                        self.start_node(PortMapAttribute);
                        self.bump();
                        self.bump();
                        self.parse_formal_pars();
                        self.finish_node();
                    }
                    Some(_) => {
                        self.start_node(PortAttribute);
                        while self.peek_if(|t| !matches!(t, Semicolon | RBrace)) {
                            self.bump_balanced();
                        }
                        self.finish_node();
                    }
                }
            }
            self.expect(RBrace);
        }
        self.finish_node();
    }

    fn parse_behaviour_type_decl(&mut self) {
        self.start_node(BehaviourTypeDecl);
        self.bump();
        self.bump();
        self.parse_name();
        self.parse_type_pars_opt();
        self.parse_formal_pars();
        self.parse_behaviour_clauses();
        self.finish_node();
    }

    fn parse_sub_type_decl(&mut self) {
        self.start_node(SubTypeDecl);
        self.bump();
        self.parse_field();
        self.finish_node();
    }

    fn parse_field(&mut self) {
        self.start_node(Field);
        self.parse_type_spec();
        self.parse_name();
        self.parse_type_pars_opt();
        self.parse_array_defs();
        self.parse_value_constraints();
        self.eat(OptionalKw);
        self.finish_node();
    }

    fn parse_array_defs(&mut self) {
        while self.at(LBracket) {
            self.skip_balanced(ArrayDef);
        }
    }

    /// Parse constraints like `(0..255)` or `length(4)`.
    fn parse_value_constraints(&mut self) {
        loop {
            if self.at(LParen) {
                self.skip_balanced(ValueConstraint);
            } else if self.nth_is_word(0, "length") && self.nth_at(1, LParen) {
                self.start_node(ValueConstraint);
                self.bump();
                self.bump_balanced();
                self.finish_node();
            } else {
                break;
            }
        }
    }

    fn parse_type_spec(&mut self) {
        match self.peek() {
            Some(RecordKw | SetKw | UnionKw) if self.nth_at(1, LBrace) => {
                self.start_node(StructSpec);
                self.bump();
                self.parse_struct_fields();
                self.finish_node();
            }
            Some(RecordKw | SetKw) => {
                self.start_node(ListSpec);
                self.bump();
                self.parse_value_constraints();
                self.expect(OfKw);
                self.parse_type_spec();
                self.finish_node();
            }
            Some(EnumeratedKw) => {
                self.start_node(EnumSpec);
                self.bump();
                self.parse_enum_body();
                self.finish_node();
            }
            Some(FunctionKw | AltstepKw | TestcaseKw) => {
                self.start_node(BehaviourSpec);
                self.bump();
                self.parse_formal_pars();
                self.parse_behaviour_clauses();
                self.finish_node();
            }
            Some(Ident) => self.parse_ref_spec(),
            _ => self.log_err(ParseErrorKind::ExpectType),
        }
    }

    /// A reference to a named type, e.g. `integer`, `M.Byte` or `List<integer>`.
    fn parse_ref_spec(&mut self) {
        self.start_node(RefSpec);
        let universal = self.nth_is_word(0, "universal") && self.nth_is_word(1, "charstring");
        self.bump();
        if universal {
            self.bump();
        }
        while self.at(Dot) && self.nth_at(1, Ident) {
            self.bump();
            self.bump();
        }
        if self.at(Lt) {
            self.start_node(TypeArgs);
            let mut depth = 0;
            while let Some(tok) = self.bump() {
                match tok {
                    Lt => depth += 1,
                    Gt => depth -= 1,
                    _ => {}
                }
                if depth == 0 || self.peek_if(|t| matches!(t, LBrace | RBrace | Semicolon)) {
                    break;
                }
            }
            self.finish_node();
        }
        self.finish_node();
    }

    // === Behaviour ===

    fn parse_type_pars_opt(&mut self) {
        if !self.at(Lt) {
            return;
        }
        self.start_node(TypePars);
        self.bump();
        loop {
            self.parse_formal_par(true);
            if !self.eat(Comma) {
                break;
            }
        }
        self.recover_until(Gt);
        self.finish_node();
    }

    fn parse_formal_pars(&mut self) {
        self.start_node(FormalPars);
        if self.expect(LParen) {
            if !self.at(RParen) {
                loop {
                    self.parse_formal_par(false);
                    if !self.eat(Comma) {
                        break;
                    }
                }
            }
            self.recover_until(RParen);
        }
        self.finish_node();
    }

    fn parse_formal_par(&mut self, type_par: bool) {
        self.start_node(FormalPar);
        if self.peek_if(|t| matches!(t, InKw | OutKw | InoutKw)) {
            self.bump();
        }
        if self.at(TemplateKw) {
            self.bump();
            self.parse_template_restriction_opt();
        }
        self.parse_modifier_opt();

        if type_par && self.at(TypeKw) {
            self.bump();
            self.parse_name();
        } else if self.at(TimerKw) {
            self.bump();
            self.parse_name();
        } else {
            self.parse_type_spec();
            self.parse_name();
        }
        self.parse_array_defs();
        if self.eat(Assign) {
            if type_par {
                // `>` closes the parameter list
                self.parse_expr_bp(61);
            } else {
                self.parse_expr();
            }
        }
        self.finish_node();
    }

    fn parse_template_restriction_opt(&mut self) {
        if self.at(LParen) {
            self.skip_balanced(TemplateRestriction);
        }
    }

    /// Modifiers like `@lazy` or `@deterministic` carry no scoping information.
    fn parse_modifier_opt(&mut self) {
        while self.at(At) && self.nth_at(1, Ident) {
            self.bump();
            self.bump();
        }
    }

    fn parse_behaviour_clauses(&mut self) {
        loop {
            match self.peek() {
                Some(RunsKw) => {
                    self.start_node(RunsOnSpec);
                    self.bump();
                    self.expect(OnKw);
                    if !self.eat(SelfKw) {
                        self.parse_type_spec();
                    }
                    self.finish_node();
                }
                Some(MtcKw) => {
                    self.start_node(MtcSpec);
                    self.bump();
                    self.parse_type_spec();
                    self.finish_node();
                }
                Some(SystemKw) => {
                    self.start_node(SystemSpec);
                    self.bump();
                    self.parse_type_spec();
                    self.finish_node();
                }
                Some(ReturnKw) => self.parse_return_spec(),
                _ => break,
            }
        }
    }

    fn parse_return_spec(&mut self) {
        self.start_node(ReturnSpec);
        self.bump();
        if self.at(TemplateKw) {
            self.bump();
            self.parse_template_restriction_opt();
        }
        self.parse_type_spec();
        self.finish_node();
    }

    fn parse_func_decl(&mut self) {
        self.start_node(FuncDecl);
        self.eat(ExternalKw);
        if self.peek_if(|t| matches!(t, FunctionKw | TestcaseKw | AltstepKw)) {
            self.bump();
        } else {
            let got = self.peek();
            self.log_err(ParseErrorKind::Expected {
                expected: FunctionKw,
                got,
            });
        }
        self.parse_modifier_opt();
        self.parse_name();
        self.parse_type_pars_opt();
        self.parse_formal_pars();
        self.parse_behaviour_clauses();
        if self.at(LBrace) {
            self.parse_block_stmt();
        }
        self.finish_node();
    }

    fn parse_signature_decl(&mut self) {
        self.start_node(SignatureDecl);
        self.bump();
        self.parse_name();
        self.parse_type_pars_opt();
        self.parse_formal_pars();
        if self.at(ReturnKw) {
            self.parse_return_spec();
        }
        self.eat(NoblockKw);
        if self.at(ExceptionKw) {
            self.start_node(ExceptionSpec);
            self.bump();
            if self.at(LParen) {
                self.bump_balanced();
            }
            self.finish_node();
        }
        self.finish_node();
    }

    fn parse_template_decl(&mut self) {
        self.start_node(TemplateDecl);
        self.bump();
        self.parse_template_restriction_opt();
        self.parse_modifier_opt();
        self.parse_type_spec();
        self.parse_name();
        self.parse_type_pars_opt();
        if self.at(LParen) {
            self.parse_formal_pars();
        }
        if self.at(ModifiesKw) {
            self.start_node(ModifiesSpec);
            self.bump();
            // stop before `:=`
            self.parse_expr_bp(11);
            self.finish_node();
        }
        if self.expect(Assign) {
            self.parse_expr();
        }
        self.finish_node();
    }

    fn parse_value_decl(&mut self) {
        self.start_node(ValueDecl);
        let kind = self.bump();
        if self.at(TemplateKw) {
            self.bump();
            self.parse_template_restriction_opt();
        }
        self.parse_modifier_opt();
        if kind != Some(TimerKw) {
            self.parse_type_spec();
        }
        loop {
            self.parse_declarator();
            if !self.eat(Comma) {
                break;
            }
        }
        self.finish_node();
    }

    fn parse_declarator(&mut self) {
        self.start_node(Declarator);
        self.parse_name();
        self.parse_array_defs();
        if self.eat(Assign) {
            self.parse_expr();
        }
        self.finish_node();
    }
}

fn can_start_type(tok: SynTag) -> bool {
    matches!(
        tok,
        Ident | RecordKw | SetKw | UnionKw | EnumeratedKw | FunctionKw | AltstepKw | TestcaseKw
    )
}
