use std::convert::TryInto;
use std::fmt;

use rowan::TextRange;

use crate::node::SynTag;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub span: rowan::TextRange,
    pub kind: ParseErrorKind,
    pub level: ParseErrorLevel,
}

impl ParseError {
    pub fn new(span: rowan::TextRange, kind: ParseErrorKind, level: ParseErrorLevel) -> Self {
        Self { span, kind, level }
    }

    pub fn error(span: rowan::TextRange, kind: ParseErrorKind) -> Self {
        Self {
            span,
            kind,
            level: ParseErrorLevel::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    Unexpected(SynTag),
    ExpectDecl,
    ExpectStmt,
    ExpectExpr,
    ExpectType,
    Expected {
        expected: SynTag,
        got: Option<SynTag>,
    },
    /// The input holds a token the lexer does not recognize.
    InvalidToken,
    MultipleModules,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::Unexpected(tag) => write!(f, "unexpected {:?}", tag),
            ParseErrorKind::ExpectDecl => f.write_str("expected a module definition"),
            ParseErrorKind::ExpectStmt => f.write_str("expected a statement"),
            ParseErrorKind::ExpectExpr => f.write_str("expected an expression"),
            ParseErrorKind::ExpectType => f.write_str("expected a type"),
            ParseErrorKind::Expected {
                expected,
                got: Some(got),
            } => write!(f, "expected {:?}, got {:?}", expected, got),
            ParseErrorKind::Expected { expected, got: None } => {
                write!(f, "expected {:?}, got end of file", expected)
            }
            ParseErrorKind::InvalidToken => f.write_str("invalid token"),
            ParseErrorKind::MultipleModules => f.write_str("file contains more than one module"),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.level, self.kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Copy, PartialOrd, Ord)]
pub enum ParseErrorLevel {
    Info,
    Warning,
    Error,
}

pub trait IntoTextRange {
    fn into_text_range(self) -> TextRange;
}

impl IntoTextRange for std::ops::Range<usize> {
    fn into_text_range(self) -> TextRange {
        TextRange::new(
            self.start.try_into().expect("Input too large"),
            self.end.try_into().expect("Input too large"),
        )
    }
}
