mod parser;
pub use parser::{
    format_tokens, parse, tokenize, BinaryOperator, Expected, Expression, LexicalError,
    LexicalErrorKind, Locatable, ParseError, Span, SyntaxError, Token, TokenType, Tokenizer, Tree,
    UnaryOperator,
};

mod interpreter;
pub use interpreter::{evaluate, format_number, DivisionByZero, EvalError, Interpreter};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// Parses and evaluates `input`, treating division by zero as an error.
pub fn calculate(input: &str) -> Result<f64, Error> {
    let tree = parse(input)?;
    Ok(evaluate(&tree)?)
}
