//! # Runtime Values
//!
//! Scalars and dense arrays, plus the typed coercion applied whenever a
//! value is stored into a declared variable.

use std::fmt;

use config::constants::{FALSE_LITERAL, TRUE_LITERAL};
use pseint_parser::ast::{Declaration, VarType};
use serde::{Deserialize, Serialize};

use crate::error::RuntimeError;

/// A runtime value. Arrays nest one level per dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Boolean(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
}

impl Value {
    /// True for array values.
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Display form used by `Escribir`.
    ///
    /// Whole numbers print without a decimal part; booleans print as
    /// `Verdadero`/`Falso`; arrays print bracketed and comma-joined.
    pub fn stringify(&self) -> String {
        match self {
            Value::Boolean(true) => TRUE_LITERAL.to_string(),
            Value::Boolean(false) => FALSE_LITERAL.to_string(),
            Value::Number(n) => format_number(*n),
            Value::String(s) => s.clone(),
            Value::Array(items) => {
                let parts: Vec<String> = items.iter().map(Value::stringify).collect();
                format!("[{}]", parts.join(", "))
            }
        }
    }

    /// Numeric reading of a scalar, if it has one.
    ///
    /// Strings count when their trimmed text parses as a finite number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::String(s) => parse_number(s),
            Value::Boolean(_) | Value::Array(_) => None,
        }
    }

    /// Logical reading of a scalar, if it has one.
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            Value::Array(_) => None,
            other => match other.stringify().trim().to_lowercase().as_str() {
                "verdadero" | "true" | "1" => Some(true),
                "falso" | "false" | "0" => Some(false),
                _ => None,
            },
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.stringify())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

fn format_number(n: f64) -> String {
    if n == 0.0 {
        "0".to_string()
    } else if n == f64::INFINITY {
        "Infinity".to_string()
    } else if n == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        n.to_string()
    }
}

fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() || text.chars().any(|c| c.is_alphabetic() && c != 'e' && c != 'E') {
        return None;
    }
    text.parse::<f64>().ok().filter(|n| n.is_finite())
}

// =============================================================================
// DEFAULTS
// =============================================================================

/// Default value of a scalar of `var_type`.
pub fn scalar_default(var_type: VarType) -> Value {
    match var_type {
        VarType::Cadena | VarType::Caracter => Value::String(String::new()),
        VarType::Entero | VarType::Real => Value::Number(0.0),
        VarType::Logico => Value::Boolean(false),
    }
}

/// Default value for a declaration: a scalar, or nested arrays of scalars.
///
/// ## Errors
///
/// Any zero dimension is rejected.
pub fn default_for_declaration(declaration: &Declaration) -> Result<Value, RuntimeError> {
    match &declaration.dimensions {
        None => Ok(scalar_default(declaration.var_type)),
        Some(dimensions) => build_array(&declaration.name, dimensions, declaration.var_type),
    }
}

fn build_array(name: &str, dimensions: &[usize], var_type: VarType) -> Result<Value, RuntimeError> {
    let Some((&size, rest)) = dimensions.split_first() else {
        return Ok(scalar_default(var_type));
    };
    if size == 0 {
        return Err(RuntimeError::array_shape(format!(
            "array '{}' has a zero dimension",
            name
        )));
    }
    let element = build_array(name, rest, var_type)?;
    Ok(Value::Array(vec![element; size]))
}

// =============================================================================
// COERCION
// =============================================================================

/// Reject arrays where a scalar is required.
pub fn ensure_scalar<'v>(value: &'v Value, what: &str) -> Result<&'v Value, RuntimeError> {
    if value.is_array() {
        return Err(RuntimeError::type_mismatch(format!(
            "{} must be a single value, not an array",
            what
        )));
    }
    Ok(value)
}

/// Numeric value of a scalar.
pub fn to_number(value: &Value) -> Result<f64, RuntimeError> {
    value.as_number().ok_or_else(|| {
        RuntimeError::type_mismatch(format!("cannot convert '{}' to a number", value))
            .with_hint("Use a numeric value or a numeric variable here.")
    })
}

/// Numeric reading used by ordering comparisons.
///
/// Booleans read as 1 or 0 and blank text as 0. Any other non-numeric
/// scalar reads as NaN, which orders false against everything.
pub fn loose_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => *n,
        Value::Boolean(b) => f64::from(u8::from(*b)),
        Value::String(s) if s.trim().is_empty() => 0.0,
        other => other.as_number().unwrap_or(f64::NAN),
    }
}

/// Logical value of a scalar, for conditions and `Logico` variables.
pub fn to_boolean(value: &Value) -> Result<bool, RuntimeError> {
    value.as_boolean().ok_or_else(|| {
        RuntimeError::type_mismatch(format!("cannot convert '{}' to Logico", value))
            .with_hint("Conditions must be Verdadero or Falso.")
    })
}

/// Convert a scalar to `var_type`.
pub fn coerce_to_type(value: &Value, var_type: VarType) -> Result<Value, RuntimeError> {
    ensure_scalar(value, "the assigned value")?;
    match var_type {
        VarType::Cadena => Ok(Value::String(value.stringify())),
        VarType::Caracter => value
            .stringify()
            .chars()
            .next()
            .map(|c| Value::String(c.to_string()))
            .ok_or_else(|| {
                RuntimeError::type_mismatch(format!("cannot convert an empty text to {}", var_type.name()))
            }),
        VarType::Entero | VarType::Real => {
            let n = value.as_number().ok_or_else(|| {
                RuntimeError::type_mismatch(format!("cannot convert '{}' to {}", value, var_type.name()))
                    .with_hint("Use a numeric value or a numeric variable here.")
            })?;
            Ok(Value::Number(if var_type == VarType::Entero { n.trunc() } else { n }))
        }
        VarType::Logico => Ok(Value::Boolean(to_boolean(value)?)),
    }
}

/// Coerce every scalar inside an array (or a lone scalar).
pub fn coerce_deep(value: &Value, var_type: VarType) -> Result<Value, RuntimeError> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| coerce_deep(item, var_type))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        scalar => coerce_to_type(scalar, var_type),
    }
}

/// Convert a 1-based source index into a 0-based one.
pub fn to_array_index(value: &Value) -> Result<usize, RuntimeError> {
    let n = value
        .as_number()
        .ok_or_else(|| RuntimeError::invalid_index(&value.stringify()))?;
    if !n.is_finite() || n < 1.0 {
        return Err(RuntimeError::invalid_index(&value.stringify()));
    }
    Ok(n.trunc() as usize - 1)
}

/// Cross-type equality used by `==`, `!=` and `Segun`.
///
/// Booleans compare logically, then numbers numerically, then everything
/// else by display text.
pub fn values_equal(left: &Value, right: &Value) -> bool {
    if matches!(left, Value::Boolean(_)) || matches!(right, Value::Boolean(_)) {
        return match (left.as_boolean(), right.as_boolean()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        };
    }
    if let (Some(a), Some(b)) = (left.as_number(), right.as_number()) {
        return a == b;
    }
    left.stringify() == right.stringify()
}

/// Fail once a single loop has run more than `limit` iterations.
pub fn ensure_loop_limit(iterations: usize, limit: usize) -> Result<(), RuntimeError> {
    if iterations > limit {
        return Err(RuntimeError::loop_limit(limit));
    }
    Ok(())
}

/// Type inferred for an untyped by-value parameter.
pub fn infer_type(value: &Value) -> VarType {
    match value {
        Value::Boolean(_) => VarType::Logico,
        Value::String(_) => VarType::Cadena,
        Value::Number(_) | Value::Array(_) => VarType::Real,
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_stringify() {
        assert_eq!(Value::Number(10.0).stringify(), "10");
        assert_eq!(Value::Number(2.5).stringify(), "2.5");
        assert_eq!(Value::Number(-0.0).stringify(), "0");
        assert_eq!(Value::Boolean(true).stringify(), "Verdadero");
        assert_eq!(Value::Boolean(false).stringify(), "Falso");
        let array = Value::Array(vec![Value::Number(1.0), Value::Number(2.0)]);
        assert_eq!(array.stringify(), "[1, 2]");
    }

    #[test]
    fn test_default_array() {
        let decl = Declaration::array("m", VarType::Entero, vec![2, 3], 1);
        let value = default_for_declaration(&decl).unwrap();
        let row = Value::Array(vec![Value::Number(0.0); 3]);
        assert_eq!(value, Value::Array(vec![row.clone(), row]));

        let bad = Declaration::array("z", VarType::Entero, vec![0], 1);
        assert_eq!(default_for_declaration(&bad).unwrap_err().code, ErrorCode::ArrayShape);
    }

    #[test]
    fn test_scalar_defaults() {
        assert_eq!(scalar_default(VarType::Caracter), Value::from(""));
        assert_eq!(scalar_default(VarType::Real), Value::Number(0.0));
        assert_eq!(scalar_default(VarType::Logico), Value::Boolean(false));
    }

    #[test]
    fn test_coercion() {
        assert_eq!(coerce_to_type(&Value::from("7.9"), VarType::Entero).unwrap(), Value::Number(7.0));
        assert_eq!(coerce_to_type(&Value::Number(-7.9), VarType::Entero).unwrap(), Value::Number(-7.0));
        assert_eq!(coerce_to_type(&Value::from(" 3.5 "), VarType::Real).unwrap(), Value::Number(3.5));
        assert_eq!(coerce_to_type(&Value::Number(12.0), VarType::Cadena).unwrap(), Value::from("12"));
        assert_eq!(coerce_to_type(&Value::from("hola"), VarType::Caracter).unwrap(), Value::from("h"));
        assert_eq!(coerce_to_type(&Value::from("VERDADERO"), VarType::Logico).unwrap(), Value::Boolean(true));
        assert_eq!(coerce_to_type(&Value::from("0"), VarType::Logico).unwrap(), Value::Boolean(false));
    }

    #[test]
    fn test_coercion_failures() {
        let err = coerce_to_type(&Value::from("abc"), VarType::Entero).unwrap_err();
        assert_eq!(err.code, ErrorCode::Type);
        assert_eq!(err.message, "cannot convert 'abc' to Entero");
        let err = coerce_to_type(&Value::from("x1"), VarType::Real).unwrap_err();
        assert_eq!(err.message, "cannot convert 'x1' to Real");
        assert!(coerce_to_type(&Value::from(""), VarType::Caracter).is_err());
        assert!(coerce_to_type(&Value::from("tal vez"), VarType::Logico).is_err());
        assert!(coerce_to_type(&Value::Array(vec![]), VarType::Real).is_err());
        assert!(coerce_to_type(&Value::from("inf"), VarType::Real).is_err());
    }

    #[test]
    fn test_array_index() {
        assert_eq!(to_array_index(&Value::Number(1.0)).unwrap(), 0);
        assert_eq!(to_array_index(&Value::from("3")).unwrap(), 2);
        assert_eq!(to_array_index(&Value::Number(2.7)).unwrap(), 1);
        assert_eq!(to_array_index(&Value::Number(0.0)).unwrap_err().code, ErrorCode::IndexOutOfRange);
        assert!(to_array_index(&Value::Number(f64::INFINITY)).is_err());
    }

    #[test]
    fn test_values_equal() {
        assert!(values_equal(&Value::Number(3.0), &Value::from("3")));
        assert!(values_equal(&Value::Boolean(true), &Value::from("verdadero")));
        assert!(!values_equal(&Value::Boolean(true), &Value::Number(2.0)));
        assert!(values_equal(&Value::from("ab"), &Value::from("ab")));
        assert!(!values_equal(&Value::from("ab"), &Value::from("AB")));
    }

    #[test]
    fn test_loose_number() {
        assert_eq!(loose_number(&Value::Boolean(true)), 1.0);
        assert_eq!(loose_number(&Value::Boolean(false)), 0.0);
        assert_eq!(loose_number(&Value::from("  ")), 0.0);
        assert_eq!(loose_number(&Value::from(" 4.5 ")), 4.5);
        assert!(loose_number(&Value::from("abc")).is_nan());
    }

    #[test]
    fn test_loop_limit() {
        assert!(ensure_loop_limit(100_000, 100_000).is_ok());
        assert_eq!(
            ensure_loop_limit(100_001, 100_000).unwrap_err().code,
            ErrorCode::LoopLimit
        );
    }
}
