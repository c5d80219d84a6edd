use super::locations::{Locatable, Span};
use super::tokenizer::TokenType as TT;
use derivative::Derivative;

/// Parsed arithmetic expression. Each node exclusively owns its children.
///
/// Equality and `Debug` ignore spans, so two trees compare equal whenever they
/// have the same shape, whatever the whitespace in the source was.
#[derive(Derivative, Clone)]
#[derivative(Debug, PartialEq)]
pub enum Expression {
    Number(
        f64,
        #[derivative(Debug = "ignore", PartialEq = "ignore")] Span,
    ),
    BinaryOperation(
        BinaryOperator,
        Box<(Expression, Expression)>,
        #[derivative(Debug = "ignore", PartialEq = "ignore")] Span,
    ),
    UnaryOperation(
        UnaryOperator,
        Box<Expression>,
        #[derivative(Debug = "ignore", PartialEq = "ignore")] Span,
    ),
}

impl Expression {
    pub(crate) fn binary(op: BinaryOperator, lhs: Expression, rhs: Expression) -> Self {
        let span = lhs.span().till(&rhs);
        Self::BinaryOperation(op, Box::new((lhs, rhs)), span)
    }

    pub(crate) fn unary(op: UnaryOperator, operator_span: Span, operand: Expression) -> Self {
        let span = operator_span.till(&operand);
        Self::UnaryOperation(op, Box::new(operand), span)
    }

    /// Indented dump of the tree, one node per line.
    pub fn tree(&self) -> Tree<'_> {
        Tree(self)
    }

    fn fmt_tree(&self, f: &mut std::fmt::Formatter<'_>, indent: usize) -> std::fmt::Result {
        write!(f, "{:width$}", "", width = indent * 2)?;
        match self {
            Self::Number(value, _) => writeln!(f, "NUMBER: {value}"),
            Self::BinaryOperation(op, operands, _) => {
                writeln!(f, "BINARY_OP: {:?}", TT::from(*op))?;
                operands.0.fmt_tree(f, indent + 1)?;
                operands.1.fmt_tree(f, indent + 1)
            }
            Self::UnaryOperation(op, operand, _) => {
                writeln!(f, "UNARY_OP: {:?}", TT::from(*op))?;
                operand.fmt_tree(f, indent + 1)
            }
        }
    }
}

/// Fully parenthesized infix form, e.g. `(2 ^ (3 ^ 2))`.
impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(value, _) => write!(f, "{value}"),
            Self::BinaryOperation(op, operands, _) => {
                write!(f, "({} {} {})", operands.0, op, operands.1)
            }
            Self::UnaryOperation(op, operand, _) => write!(f, "({op}{operand})"),
        }
    }
}

pub struct Tree<'a>(&'a Expression);

impl std::fmt::Display for Tree<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt_tree(f, 0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Plus,
    Minus,
    Times,
    Divide,
    Power,
}

impl BinaryOperator {
    pub(crate) fn from_token(typ: TT) -> Option<Self> {
        match typ {
            TT::PLUS => Some(Self::Plus),
            TT::MINUS => Some(Self::Minus),
            TT::STAR => Some(Self::Times),
            TT::SLASH => Some(Self::Divide),
            TT::CIRCUMFLEX => Some(Self::Power),
            _ => None,
        }
    }
}

impl From<BinaryOperator> for TT {
    fn from(value: BinaryOperator) -> Self {
        match value {
            BinaryOperator::Plus => TT::PLUS,
            BinaryOperator::Minus => TT::MINUS,
            BinaryOperator::Times => TT::STAR,
            BinaryOperator::Divide => TT::SLASH,
            BinaryOperator::Power => TT::CIRCUMFLEX,
        }
    }
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Times => "*",
            Self::Divide => "/",
            Self::Power => "^",
        };
        f.write_str(symbol)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Plus,
    Minus,
}

impl UnaryOperator {
    pub(crate) fn from_token(typ: TT) -> Option<Self> {
        match typ {
            TT::PLUS => Some(Self::Plus),
            TT::MINUS => Some(Self::Minus),
            _ => None,
        }
    }
}

impl From<UnaryOperator> for TT {
    fn from(value: UnaryOperator) -> Self {
        match value {
            UnaryOperator::Plus => TT::PLUS,
            UnaryOperator::Minus => TT::MINUS,
        }
    }
}

impl std::fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plus => f.write_str("+"),
            Self::Minus => f.write_str("-"),
        }
    }
}
