//! Expression parsing.

use super::error_report::ParseErrorKind;
use super::pratt_util::{infix_binding_power, postfix_binding_power, prefix_binding_power};
use super::Parser;
use crate::node::SynTag::*;

impl<'src> Parser<'src> {
    pub(super) fn parse_expr(&mut self) {
        self.parse_expr_bp(0)
    }

    /// Parse an expression whose operators bind at least as tight as `min_bp`.
    pub(super) fn parse_expr_bp(&mut self, min_bp: i32) {
        let cp = self.checkpoint();

        match self.peek().and_then(|op| Some((op, prefix_binding_power(op)?))) {
            // a lone `-` is the "any or omit" matching symbol
            Some((Sub, _)) if matches!(self.nth(1), Some(Comma | RBrace | RParen)) => {
                self.parse_literal()
            }
            Some((_, bp)) => {
                self.start_node(UnaryExpr);
                self.bump();
                self.parse_expr_bp(bp);
                self.finish_node();
            }
            None => {
                if !self.parse_primary_expr() {
                    return;
                }
            }
        }

        while let Some(op) = self.peek() {
            if let Some(bp) = postfix_binding_power(op) {
                if bp < min_bp {
                    break;
                }
                match op {
                    LParen => {
                        self.start_node_at(cp, CallExpr);
                        self.parse_arg_list();
                    }
                    Dot => {
                        self.start_node_at(cp, SelectorExpr);
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
                    }
                    _ => {
                        self.start_node_at(cp, IndexExpr);
                        self.parse_index();
                    }
                }
                self.finish_node();
                continue;
            }

            if let Some(infix) = infix_binding_power(op) {
                let (l_bp, r_bp) = infix.binding_power();
                if l_bp < min_bp {
                    break;
                }
                self.start_node_at(cp, BinaryExpr);
                self.bump();
                self.parse_expr_bp(r_bp);
                self.finish_node();
                continue;
            }

            break;
        }
    }

    fn parse_primary_expr(&mut self) -> bool {
        match self.peek() {
            Some(Ident) => {
                // `any port`, `any timer` and friends
                if self.nth_is_word(0, "any")
                    && matches!(self.nth(1), Some(ComponentKw | PortKw | TimerKw))
                {
                    self.start_node(ValueLiteral);
                    self.bump();
                    self.bump();
                    self.finish_node();
                } else {
                    self.parse_ident_expr();
                }
            }
            Some(AllKw) if matches!(self.nth(1), Some(ComponentKw | PortKw | TimerKw)) => {
                self.start_node(ValueLiteral);
                self.bump();
                self.bump();
                self.finish_node();
            }
            Some(tok) if tok.is_literal_start() => self.parse_literal(),
            Some(LParen) => {
                self.start_node(ParenExpr);
                self.bump();
                if !self.at(RParen) {
                    self.parse_expr();
                    while self.eat(Comma) {
                        self.parse_expr();
                    }
                }
                self.expect(RParen);
                self.finish_node();
            }
            Some(LBrace) => self.parse_composite_literal(),
            Some(LBracket) => {
                // `[0] := x` inside a composite literal
                self.start_node(IndexExpr);
                self.parse_index();
                self.finish_node();
            }
            _ => {
                self.log_err(ParseErrorKind::ExpectExpr);
                return false;
            }
        }
        true
    }

    pub(super) fn parse_ident_expr(&mut self) {
        self.start_node(IdentExpr);
        self.bump();
        self.finish_node();
    }

    fn parse_literal(&mut self) {
        self.start_node(ValueLiteral);
        self.bump();
        self.finish_node();
    }

    /// `[` expr `]`, where the expression may be the `-` symbol.
    fn parse_index(&mut self) {
        self.bump();
        if self.at(Sub) && self.nth_at(1, RBracket) {
            self.bump();
        } else {
            self.parse_expr();
        }
        self.expect(RBracket);
    }

    fn parse_composite_literal(&mut self) {
        self.start_node(CompositeLiteral);
        self.bump();
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
        self.expect(RBrace);
        self.finish_node();
    }

    fn parse_arg_list(&mut self) {
        self.start_node(ArgList);
        self.bump();
        if !self.at(RParen) {
            loop {
                self.parse_expr();
                if !self.eat(Comma) {
                    break;
                }
            }
        }
        self.expect(RParen);
        self.finish_node();
    }
}
