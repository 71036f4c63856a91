//! Statement parsing.

use super::error_report::ParseErrorKind;
use super::Parser;
use crate::node::SynTag::*;

impl<'src> Parser<'src> {
    pub(super) fn parse_block_stmt(&mut self) {
        self.start_node(BlockStmt);
        if self.expect(LBrace) {
            loop {
                match self.peek() {
                    None | Some(RBrace) => break,
                    Some(tok) if tok.can_start_stmt() => self.parse_stmt(),
                    Some(_) => self.recover_stmt(),
                }
            }
            self.expect(RBrace);
        }
        self.finish_node();
    }

    fn recover_stmt(&mut self) {
        self.log_err(ParseErrorKind::ExpectStmt);
        self.start_node(ErrorNode);
        loop {
            self.bump_balanced();
            match self.peek() {
                None => break,
                Some(tok) if tok.is_stmt_parsing_sync_token() || tok.can_start_stmt() => break,
                Some(_) => {}
            }
        }
        self.finish_node();
    }

    fn parse_stmt(&mut self) {
        match self.peek() {
            Some(VarKw | ConstKw | TimerKw | PortKw) => {
                self.start_node(DeclStmt);
                self.parse_value_decl();
                self.finish_node();
            }
            Some(TemplateKw) => {
                self.start_node(DeclStmt);
                self.parse_template_decl();
                self.finish_node();
            }
            Some(TypeKw) => {
                self.start_node(DeclStmt);
                self.parse_type_decl();
                self.finish_node();
            }
            Some(IfKw) => self.parse_if_stmt(),
            Some(ForKw) => self.parse_for_stmt(),
            Some(WhileKw) => {
                self.start_node(WhileStmt);
                self.bump();
                self.parse_condition();
                self.parse_block_stmt();
                self.finish_node();
            }
            Some(DoKw) => {
                self.start_node(DoWhileStmt);
                self.bump();
                self.parse_block_stmt();
                self.expect(WhileKw);
                self.parse_condition();
                self.finish_node();
            }
            Some(AltKw | InterleaveKw) => self.parse_alt_stmt(),
            // altstep bodies hold guards directly
            Some(LBracket) => self.parse_alt_guard(),
            Some(SelectKw) => self.parse_select_stmt(),
            Some(LabelKw) => {
                self.start_node(BranchStmt);
                self.bump();
                self.parse_name();
                self.finish_node();
            }
            Some(GotoKw) => {
                self.start_node(BranchStmt);
                self.bump();
                if self.at(Ident) {
                    self.parse_ident_expr();
                } else {
                    let got = self.peek();
                    self.log_err(ParseErrorKind::Expected {
                        expected: Ident,
                        got,
                    });
                }
                self.finish_node();
            }
            Some(BreakKw | ContinueKw) => {
                self.start_node(BranchStmt);
                self.bump();
                self.finish_node();
            }
            Some(ReturnKw) => {
                self.start_node(ReturnStmt);
                self.bump();
                if self.peek_if(|t| t.can_start_expr()) {
                    self.parse_expr();
                }
                self.finish_node();
            }
            Some(LBrace) => self.parse_block_stmt(),
            Some(Semicolon) => {
                self.bump();
                return;
            }
            _ => {
                self.start_node(ExprStmt);
                self.parse_expr();
                self.parse_redirect_opt();
                self.finish_node();
            }
        }
        self.eat(Semicolon);
    }

    /// `(` expr `)`
    fn parse_condition(&mut self) {
        self.expect(LParen);
        self.parse_expr();
        self.expect(RParen);
    }

    fn parse_if_stmt(&mut self) {
        self.start_node(IfStmt);
        self.bump();
        self.parse_condition();
        self.parse_block_stmt();
        if self.eat(ElseKw) {
            if self.at(IfKw) {
                self.parse_if_stmt();
            } else {
                self.parse_block_stmt();
            }
        }
        self.finish_node();
    }

    fn parse_for_stmt(&mut self) {
        self.start_node(ForStmt);
        self.bump();
        if self.expect(LParen) {
            match self.peek() {
                Some(VarKw | ConstKw) => {
                    self.start_node(DeclStmt);
                    self.parse_value_decl();
                    self.finish_node();
                }
                Some(tok) if tok.can_start_expr() => {
                    self.start_node(ExprStmt);
                    self.parse_expr();
                    self.finish_node();
                }
                _ => {}
            }
            self.expect(Semicolon);
            self.parse_expr();
            self.expect(Semicolon);
            self.parse_expr();
            self.expect(RParen);
        }
        self.parse_block_stmt();
        self.finish_node();
    }

    fn parse_alt_stmt(&mut self) {
        self.start_node(AltStmt);
        self.bump();
        if self.expect(LBrace) {
            loop {
                match self.peek() {
                    None | Some(RBrace) => break,
                    Some(LBracket) => self.parse_alt_guard(),
                    Some(Semicolon) => {
                        self.bump();
                    }
                    Some(_) => self.recover_stmt(),
                }
            }
            self.expect(RBrace);
        }
        self.finish_node();
    }

    fn parse_alt_guard(&mut self) {
        self.start_node(AltGuard);
        self.bump();
        if !self.eat(ElseKw) && self.peek_if(|t| t.can_start_expr()) {
            self.parse_expr();
        }
        self.expect(RBracket);
        if self.peek_if(|t| t.can_start_expr() && t != LBrace) {
            self.parse_expr();
        }
        self.parse_redirect_opt();
        if self.at(LBrace) {
            self.parse_block_stmt();
        }
        self.eat(Semicolon);
        self.finish_node();
    }

    /// Skip a port or timer redirect like `-> value v sender s`.
    fn parse_redirect_opt(&mut self) {
        if !self.at(Arrow) {
            return;
        }
        self.start_node(Redirect);
        while self.peek_if(|t| !matches!(t, LBrace | RBrace | LBracket | Semicolon)) {
            self.bump_balanced();
        }
        self.finish_node();
    }

    fn parse_select_stmt(&mut self) {
        self.start_node(SelectStmt);
        self.bump();
        self.eat(UnionKw);
        self.parse_condition();
        if self.expect(LBrace) {
            loop {
                match self.peek() {
                    None | Some(RBrace) => break,
                    Some(CaseKw) => self.parse_case_clause(),
                    Some(_) => self.recover_stmt(),
                }
            }
            self.expect(RBrace);
        }
        self.finish_node();
    }

    fn parse_case_clause(&mut self) {
        self.start_node(CaseClause);
        self.bump();
        if !self.eat(ElseKw) && self.expect(LParen) {
            loop {
                self.parse_expr();
                if !self.eat(Comma) {
                    break;
                }
            }
            self.expect(RParen);
        }
        self.parse_block_stmt();
        self.finish_node();
    }
}
