use super::ast::Expression;
use super::tokenizer::Token;

/// Half-open byte range `start..end` into the source text.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl Span {
    pub(crate) fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub(crate) fn at(position: usize) -> Self {
        Self::new(position, position)
    }

    pub(crate) fn till<R: Locatable>(&self, other: &R) -> Self {
        Self::new(self.start, other.span().end)
    }
}

pub trait Locatable {
    fn span(&self) -> Span;
}

impl Locatable for Span {
    fn span(&self) -> Span {
        *self
    }
}

impl Locatable for Token {
    fn span(&self) -> Span {
        self.span
    }
}

impl Locatable for Expression {
    fn span(&self) -> Span {
        match self {
            Self::Number(_, s) => *s,
            Self::BinaryOperation(_, _, s) => *s,
            Self::UnaryOperation(_, _, s) => *s,
        }
    }
}
