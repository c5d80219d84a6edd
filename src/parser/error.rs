use super::locations::Span;
use super::tokenizer::{Token, TokenType};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexicalErrorKind {
    UnknownCharacter,
    /// A decimal point with no digits around it.
    MalformedNumber,
}

impl std::fmt::Display for LexicalErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownCharacter => f.write_str("Unknown character"),
            Self::MalformedNumber => f.write_str("Invalid number format"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Lexical error at position {position}: {kind} '{character}'")]
pub struct LexicalError {
    pub kind: LexicalErrorKind,
    pub position: usize,
    pub character: char,
}

impl LexicalError {
    pub(crate) fn new(kind: LexicalErrorKind, position: usize, character: char) -> Self {
        Self {
            kind,
            position,
            character,
        }
    }
}

/// What the grammar was looking for when it hit an unexpected token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    Token(TokenType),
    Operand,
}

impl std::fmt::Display for Expected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Token(typ) => write!(f, "{typ}"),
            Self::Operand => f.write_str("number or '('"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SyntaxError {
    #[error("expected {expected}, found {} at position {}", .found.typ, .found.span.start)]
    UnexpectedToken { expected: Expected, found: Token },
    #[error("unexpected {} after expression at position {}", .found.typ, .found.span.start)]
    TrailingInput { found: Token },
    #[error("invalid number literal '{lexeme}' at {span}")]
    InvalidNumber { lexeme: String, span: Span },
    #[error("expression nested too deeply at position {}", .span.start)]
    NestingTooDeep { span: Span },
}

impl SyntaxError {
    pub(crate) fn unexpected(expected: Expected, found: &Token) -> Self {
        Self::UnexpectedToken {
            expected,
            found: found.clone(),
        }
    }

    /// The token the parser stopped at, if the error was caused by one.
    pub fn token(&self) -> Option<&Token> {
        match self {
            Self::UnexpectedToken { found, .. } | Self::TrailingInput { found } => Some(found),
            Self::InvalidNumber { .. } | Self::NestingTooDeep { .. } => None,
        }
    }
}

/// A failed parse: the syntax error that stopped it plus every lexical
/// diagnostic recorded up to that point.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Syntax error: {syntax}")]
pub struct ParseError {
    pub syntax: SyntaxError,
    pub lexical: Vec<LexicalError>,
}
