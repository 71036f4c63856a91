use std::{collections::VecDeque, ops::Range};

use logos::Span;

pub mod ast;
pub mod node;
pub mod parse;
mod tree;

pub use node::SynTag;
pub use node::Ttcn3Lang;
pub use parse::error_report::{ParseError, ParseErrorKind, ParseErrorLevel};
pub use parse::tag_util::FormatTree;
pub use tree::{Position, Tree};

pub type SyntaxNode = rowan::SyntaxNode<Ttcn3Lang>;
pub type SyntaxToken = rowan::SyntaxToken<Ttcn3Lang>;
pub type SyntaxElement = rowan::SyntaxElement<Ttcn3Lang>;
pub type SyntaxNodeChildren = rowan::SyntaxNodeChildren<Ttcn3Lang>;

/// The main lexer used for TTCN-3 sources.
pub struct Lexer<'lex> {
    /// The actual lexer that does the job.
    inner: logos::Lexer<'lex, SynTag>,
    /// The span of the last token
    span: Span,
    /// Tokens that have been lexed ahead of the current position.
    pending_tokens: VecDeque<(SynTag, Span)>,
}

impl<'lex> Lexer<'lex> {
    /// Create a new lexer from string.
    pub fn new(s: &'lex str) -> Lexer<'lex> {
        Lexer {
            inner: logos::Lexer::new(s),
            span: Default::default(),
            pending_tokens: VecDeque::new(),
        }
    }

    /// The underlying source code
    pub fn source(&self) -> &'lex str {
        self.inner.source()
    }

    /// The span of the current token.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// The slice of string of the current token.
    pub fn slice(&self) -> &'lex str {
        &self.inner.source()[self.span()]
    }

    /// Return a copy of the `n`th token ahead (trivia included) without
    /// consuming anything.
    pub fn peek_nth(&mut self, n: usize) -> Option<SynTag> {
        while self.pending_tokens.len() <= n {
            let next = self.inner.next()?;
            self.pending_tokens.push_back((next, self.inner.span()));
        }
        self.pending_tokens.get(n).map(|(tag, _)| *tag)
    }

    /// Return a copy of the current front token without really consuming it.
    pub fn peek(&mut self) -> Option<SynTag> {
        self.peek_nth(0)
    }

    /// The span of the `n`th token ahead, or an empty span at the end of input.
    pub fn peek_nth_span(&mut self, n: usize) -> Range<usize> {
        match self.peek_nth(n) {
            Some(_) => self.pending_tokens[n].1.clone(),
            None => {
                let end = self.inner.source().len();
                end..end
            }
        }
    }

    /// The source text of the `n`th token ahead.
    pub fn peek_nth_slice(&mut self, n: usize) -> &'lex str {
        let span = self.peek_nth_span(n);
        &self.inner.source()[span]
    }
}

impl<'lex> Iterator for Lexer<'lex> {
    type Item = SynTag;

    fn next(&mut self) -> Option<Self::Item> {
        // check pending tokens or lex the next one
        if let Some((tok, span)) = self.pending_tokens.pop_front() {
            self.span = span;
            Some(tok)
        } else {
            let tok = self.inner.next();
            self.span = self.inner.span();
            tok
        }
    }
}
