// # ========================= GRAMMAR =========================
//
// file:       expression ENDMARKER
// expression: term (('+' | '-') term)*
// term:       factor (('*' | '/') factor)*
// factor:     ('+' | '-') factor | power
// power:      primary ['^' power]
// primary:    NUMBER | '(' expression ')'
//
// Rules that loop build left-leaning trees (left associativity); `power`
// recurses on its right operand instead (right associativity). Nesting and
// tree height are capped so hostile input fails with a syntax error instead
// of exhausting the stack.

use super::ast::*;
use super::error::{Expected, ParseError, SyntaxError};
use super::locations::{Locatable, Span};
use super::tokenizer::{Token, TokenType as TT, Tokenizer};

pub(crate) type ParseResult<T> = Result<T, SyntaxError>;

/// Parses a single arithmetic expression covering the whole input.
///
/// On failure no partial tree escapes; the error carries the lexical
/// diagnostics recorded before the parse stopped.
pub fn parse(input: &str) -> Result<Expression, ParseError> {
    let mut parser = Parser::new(input);
    match parser.file() {
        Ok(tree) => {
            log::debug!("parsed {input:?} into {tree}");
            Ok(tree)
        }
        Err(syntax) => {
            log::debug!("failed to parse {input:?}: {syntax}");
            Err(ParseError {
                syntax,
                lexical: parser.tokenizer.take_errors(),
            })
        }
    }
}

/// Deepest chain of parentheses, signs and exponents the parser recurses into.
const MAX_NESTING: usize = 256;
/// Tallest tree handed out. Evaluating, comparing and dropping a tree all
/// recurse once per level.
const MAX_HEIGHT: usize = 4096;

/// A parsed subtree together with its height.
struct Parsed {
    expr: Expression,
    height: usize,
}

/// Recursive descent parser with a single token of lookahead.
pub(crate) struct Parser<'a> {
    tokenizer: Tokenizer<'a>,
    current: Token,
    nesting: usize,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        let mut tokenizer = Tokenizer::new(input);
        let current = tokenizer.next_token();
        Self {
            tokenizer,
            current,
            nesting: 0,
        }
    }

    /// Consumes the lookahead if it has type `expected` and returns it.
    fn eat(&mut self, expected: TT) -> ParseResult<Token> {
        if self.current.typ != expected {
            return Err(SyntaxError::unexpected(
                Expected::Token(expected),
                &self.current,
            ));
        }
        let next = self.tokenizer.next_token();
        Ok(std::mem::replace(&mut self.current, next))
    }

    /// Runs `rule` one nesting level deeper, refusing past `MAX_NESTING`.
    fn nested(
        &mut self,
        opened_at: Span,
        rule: fn(&mut Self) -> ParseResult<Parsed>,
    ) -> ParseResult<Parsed> {
        if self.nesting >= MAX_NESTING {
            return Err(SyntaxError::NestingTooDeep { span: opened_at });
        }
        self.nesting += 1;
        let result = rule(self);
        self.nesting -= 1;
        result
    }

    fn checked(expr: Expression, height: usize) -> ParseResult<Parsed> {
        if height > MAX_HEIGHT {
            return Err(SyntaxError::NestingTooDeep { span: expr.span() });
        }
        Ok(Parsed { expr, height })
    }

    // file: expression ENDMARKER
    fn file(&mut self) -> ParseResult<Expression> {
        let tree = self.expression()?.expr;
        if self.current.typ != TT::ENDMARKER {
            return Err(SyntaxError::TrailingInput {
                found: self.current.clone(),
            });
        }
        Ok(tree)
    }

    // expression: term (('+' | '-') term)*
    fn expression(&mut self) -> ParseResult<Parsed> {
        self.left_fold(&[BinaryOperator::Plus, BinaryOperator::Minus], Self::term)
    }

    // term: factor (('*' | '/') factor)*
    fn term(&mut self) -> ParseResult<Parsed> {
        self.left_fold(&[BinaryOperator::Times, BinaryOperator::Divide], Self::factor)
    }

    fn left_fold(
        &mut self,
        operators: &[BinaryOperator],
        operand: fn(&mut Self) -> ParseResult<Parsed>,
    ) -> ParseResult<Parsed> {
        let mut current = operand(self)?;
        while let Some(op) =
            BinaryOperator::from_token(self.current.typ).filter(|op| operators.contains(op))
        {
            self.eat(op.into())?;
            let rhs = operand(self)?;
            let height = current.height.max(rhs.height) + 1;
            current = Self::checked(Expression::binary(op, current.expr, rhs.expr), height)?;
        }
        Ok(current)
    }

    // factor:
    //     | '+' factor
    //     | '-' factor
    //     | power
    fn factor(&mut self) -> ParseResult<Parsed> {
        match UnaryOperator::from_token(self.current.typ) {
            Some(op) => {
                let token = self.eat(op.into())?;
                let operand = self.nested(token.span, Self::factor)?;
                Self::checked(
                    Expression::unary(op, token.span, operand.expr),
                    operand.height + 1,
                )
            }
            None => self.power(),
        }
    }

    // power:
    //     | primary '^' power
    //     | primary
    fn power(&mut self) -> ParseResult<Parsed> {
        let base = self.primary()?;
        if self.current.typ != TT::CIRCUMFLEX {
            return Ok(base);
        }
        let token = self.eat(TT::CIRCUMFLEX)?;
        let exponent = self.nested(token.span, Self::power)?;
        let height = base.height.max(exponent.height) + 1;
        Self::checked(
            Expression::binary(BinaryOperator::Power, base.expr, exponent.expr),
            height,
        )
    }

    // primary:
    //     | NUMBER
    //     | '(' expression ')'
    fn primary(&mut self) -> ParseResult<Parsed> {
        match self.current.typ {
            TT::NUMBER => {
                let token = self.eat(TT::NUMBER)?;
                Ok(Parsed {
                    expr: number(token)?,
                    height: 1,
                })
            }
            TT::LPAR => {
                let open = self.eat(TT::LPAR)?;
                let inner = self.nested(open.span, Self::expression)?;
                self.eat(TT::RPAR)?;
                Ok(inner)
            }
            _ => Err(SyntaxError::unexpected(Expected::Operand, &self.current)),
        }
    }
}

fn number(token: Token) -> ParseResult<Expression> {
    match token.lexeme.parse::<f64>() {
        Ok(value) => Ok(Expression::Number(value, token.span)),
        Err(_) => Err(SyntaxError::InvalidNumber {
            lexeme: token.lexeme,
            span: token.span,
        }),
    }
}
