use crate::parser::{BinaryOperator, Expression, Span, UnaryOperator};
use thiserror::Error;

/// What the interpreter does when a division has a zero divisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DivisionByZero {
    /// Abort evaluation with [`EvalError::DivisionByZero`].
    #[default]
    Error,
    /// Record the error, use `0.0` as the quotient and keep going.
    Substitute,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("Division by zero at {span}")]
    DivisionByZero { span: Span },
}

#[derive(Debug, Default)]
pub struct Interpreter {
    policy: DivisionByZero,
    diagnostics: Vec<EvalError>,
}

impl Interpreter {
    pub fn new(policy: DivisionByZero) -> Self {
        Self {
            policy,
            diagnostics: vec![],
        }
    }

    /// Errors that were substituted rather than returned, oldest first.
    pub fn diagnostics(&self) -> &[EvalError] {
        &self.diagnostics
    }

    pub fn evaluate(&mut self, expression: &Expression) -> Result<f64, EvalError> {
        let value = self.evaluate_expr(expression)?;
        log::debug!("{expression} = {value}");
        Ok(value)
    }

    fn evaluate_expr(&mut self, expression: &Expression) -> Result<f64, EvalError> {
        match expression {
            Expression::Number(value, _) => Ok(*value),
            Expression::BinaryOperation(op, operands, span) => {
                let (lhs, rhs) = operands.as_ref();
                let lhs = self.evaluate_expr(lhs)?;
                let rhs = self.evaluate_expr(rhs)?;
                match op {
                    BinaryOperator::Plus => Ok(lhs + rhs),
                    BinaryOperator::Minus => Ok(lhs - rhs),
                    BinaryOperator::Times => Ok(lhs * rhs),
                    BinaryOperator::Divide => self.divide(lhs, rhs, *span),
                    BinaryOperator::Power => Ok(lhs.powf(rhs)),
                }
            }
            Expression::UnaryOperation(op, operand, _) => {
                let value = self.evaluate_expr(operand)?;
                match op {
                    UnaryOperator::Plus => Ok(value),
                    UnaryOperator::Minus => Ok(-value),
                }
            }
        }
    }

    fn divide(&mut self, dividend: f64, divisor: f64, span: Span) -> Result<f64, EvalError> {
        // -0.0 == 0.0, so both signed zeros land here.
        if divisor != 0.0 {
            return Ok(dividend / divisor);
        }
        let error = EvalError::DivisionByZero { span };
        match self.policy {
            DivisionByZero::Error => Err(error),
            DivisionByZero::Substitute => {
                log::warn!("{error}, using 0 as the quotient");
                self.diagnostics.push(error);
                Ok(0.0)
            }
        }
    }
}

/// Evaluates `expression` with the default policy, failing on division by zero.
pub fn evaluate(expression: &Expression) -> Result<f64, EvalError> {
    Interpreter::default().evaluate(expression)
}

const SIGNIFICANT_DIGITS: i32 = 6;

/// Formats `value` with six significant digits the way glibc's `%.6g` does:
/// `5`, `0.333333`, `1e+06`, `1.5e-07`, `-nan`.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return if value.is_sign_negative() { "-nan" } else { "nan" }.to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // Rounding to the target precision first decides which notation wins.
    let scientific = format!("{:.*e}", (SIGNIFICANT_DIGITS - 1) as usize, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return scientific;
    };

    if exponent < -4 || exponent >= SIGNIFICANT_DIGITS {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", trim_fraction(mantissa), exponent.abs())
    } else {
        let decimals = (SIGNIFICANT_DIGITS - 1 - exponent) as usize;
        trim_fraction(&format!("{value:.decimals$}")).to_string()
    }
}

fn trim_fraction(digits: &str) -> &str {
    if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.')
    } else {
        digits
    }
}
