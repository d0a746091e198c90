//! # Expression Evaluation
//!
//! Expressions are pure in the source language, but evaluating a user
//! function call runs statements, so evaluation borrows the interpreter
//! mutably.
//!
//! ## Operator Semantics
//!
//! - `+` concatenates when either side is text, otherwise adds
//! - `==` / `!=` use cross-type [`values_equal`]
//! - ordering operators compare [`loose_number`] readings; text that is not a
//!   number reads as NaN, so every ordering against it is false
//! - `/` and `%` reject a zero divisor
//! - `Y` / `O` short-circuit

use config::constants::{STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES};
use pseint_parser::ast::{BinaryOperator, Expression, Literal, UnaryOperator};
use stacker::maybe_grow;

use super::Interpreter;
use crate::error::RuntimeError;
use crate::value::{ensure_scalar, loose_number, to_boolean, to_number, values_equal, Value};

impl<'a> Interpreter<'a> {
    /// Evaluate an expression to a value.
    pub(crate) fn evaluate(&mut self, expression: &Expression) -> Result<Value, RuntimeError> {
        maybe_grow(STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, || {
            self.evaluate_inner(expression)
        })
    }

    fn evaluate_inner(&mut self, expression: &Expression) -> Result<Value, RuntimeError> {
        match expression {
            Expression::Literal { value } => Ok(match value {
                Literal::String(s) => Value::String(s.clone()),
                Literal::Number(n) => Value::Number(*n),
                Literal::Boolean(b) => Value::Boolean(*b),
            }),
            Expression::Identifier { name } => self.scopes.get(name).cloned(),
            Expression::ArrayElement { name, indices } => {
                let indices = self.evaluate_indices(indices)?;
                self.scopes.get_element(name, &indices)
            }
            Expression::Unary { operator, operand } => {
                let value = self.evaluate(operand)?;
                let value = ensure_scalar(&value, "an operand")?;
                match operator {
                    UnaryOperator::Not => Ok(Value::Boolean(!to_boolean(value)?)),
                    UnaryOperator::Negate => Ok(Value::Number(-numeric_operand(value, "-")?)),
                }
            }
            Expression::Binary {
                operator,
                left,
                right,
            } => self.evaluate_binary(*operator, left, right),
            Expression::FunctionCall { name, arguments } => self.evaluate_call(name, arguments),
        }
    }

    /// Evaluate a condition to a boolean.
    pub(crate) fn evaluate_condition(&mut self, expression: &Expression) -> Result<bool, RuntimeError> {
        let value = self.evaluate(expression)?;
        to_boolean(ensure_scalar(&value, "a condition")?)
    }

    /// Evaluate both operands of a strict operator.
    fn operands(&mut self, left: &Expression, right: &Expression) -> Result<(Value, Value), RuntimeError> {
        let lhs = self.evaluate(left)?;
        let rhs = self.evaluate(right)?;
        ensure_scalar(&lhs, "an operand")?;
        ensure_scalar(&rhs, "an operand")?;
        Ok((lhs, rhs))
    }

    fn evaluate_binary(
        &mut self,
        operator: BinaryOperator,
        left: &Expression,
        right: &Expression,
    ) -> Result<Value, RuntimeError> {
        let symbol = operator.symbol();
        match operator {
            BinaryOperator::And => Ok(Value::Boolean(
                self.evaluate_condition(left)? && self.evaluate_condition(right)?,
            )),
            BinaryOperator::Or => Ok(Value::Boolean(
                self.evaluate_condition(left)? || self.evaluate_condition(right)?,
            )),
            BinaryOperator::Add => {
                let (lhs, rhs) = self.operands(left, right)?;
                if matches!(lhs, Value::String(_)) || matches!(rhs, Value::String(_)) {
                    Ok(Value::String(lhs.stringify() + &rhs.stringify()))
                } else {
                    Ok(Value::Number(numeric_operand(&lhs, symbol)? + numeric_operand(&rhs, symbol)?))
                }
            }
            BinaryOperator::Subtract => {
                let (lhs, rhs) = self.operands(left, right)?;
                Ok(Value::Number(numeric_operand(&lhs, symbol)? - numeric_operand(&rhs, symbol)?))
            }
            BinaryOperator::Multiply => {
                let (lhs, rhs) = self.operands(left, right)?;
                Ok(Value::Number(numeric_operand(&lhs, symbol)? * numeric_operand(&rhs, symbol)?))
            }
            BinaryOperator::Divide | BinaryOperator::Modulo => {
                let (lhs, rhs) = self.operands(left, right)?;
                let dividend = numeric_operand(&lhs, symbol)?;
                let divisor = numeric_operand(&rhs, symbol)?;
                if divisor == 0.0 {
                    return Err(RuntimeError::division_by_zero());
                }
                Ok(Value::Number(if operator == BinaryOperator::Divide {
                    dividend / divisor
                } else {
                    dividend % divisor
                }))
            }
            BinaryOperator::Equal => {
                let (lhs, rhs) = self.operands(left, right)?;
                Ok(Value::Boolean(values_equal(&lhs, &rhs)))
            }
            BinaryOperator::NotEqual => {
                let (lhs, rhs) = self.operands(left, right)?;
                Ok(Value::Boolean(!values_equal(&lhs, &rhs)))
            }
            BinaryOperator::Greater
            | BinaryOperator::Less
            | BinaryOperator::GreaterEqual
            | BinaryOperator::LessEqual => {
                let (lhs, rhs) = self.operands(left, right)?;
                let (a, b) = (loose_number(&lhs), loose_number(&rhs));
                Ok(Value::Boolean(match operator {
                    BinaryOperator::Greater => a > b,
                    BinaryOperator::Less => a < b,
                    BinaryOperator::GreaterEqual => a >= b,
                    _ => a <= b,
                }))
            }
        }
    }
}

/// Number for an arithmetic operand; booleans are rejected.
fn numeric_operand(value: &Value, symbol: &str) -> Result<f64, RuntimeError> {
    if let Value::Boolean(_) = value {
        return Err(RuntimeError::type_mismatch(format!(
            "operator '{}' cannot be applied to the logical value {}",
            symbol, value
        )));
    }
    to_number(value)
}
