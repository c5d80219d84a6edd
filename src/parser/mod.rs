mod ast;
mod error;
mod grammar;
mod locations;
pub mod tokenizer;

pub use ast::*;
pub use error::*;
pub use grammar::parse;
pub use locations::{Locatable, Span};
pub use tokenizer::{format_tokens, tokenize, Token, TokenType, Tokenizer};

#[cfg(test)]
mod test;
