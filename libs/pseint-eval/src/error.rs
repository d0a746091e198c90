//! # Runtime Errors
//!
//! Error type raised while executing a valid program, with a stable code
//! and category for the presentation layer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// CODES AND CATEGORIES
// =============================================================================

/// Stable error code shared with the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "PS_PARSE_SYNTAX")]
    ParseSyntax,
    #[serde(rename = "PS_PARSE_STRUCTURE")]
    ParseStructure,
    #[serde(rename = "PS_PARSE_DUPLICATE")]
    ParseDuplicate,
    #[serde(rename = "PS_PARSE_UNSUPPORTED")]
    ParseUnsupported,
    #[serde(rename = "PS_RUNTIME_UNDECLARED")]
    Undeclared,
    #[serde(rename = "PS_RUNTIME_CONSTANT")]
    Constant,
    #[serde(rename = "PS_RUNTIME_TYPE")]
    Type,
    #[serde(rename = "PS_RUNTIME_DIV_ZERO")]
    DivisionByZero,
    #[serde(rename = "PS_RUNTIME_INDEX_RANGE")]
    IndexOutOfRange,
    #[serde(rename = "PS_RUNTIME_INDEX_COUNT")]
    IndexCount,
    #[serde(rename = "PS_RUNTIME_ARRAY_SHAPE")]
    ArrayShape,
    #[serde(rename = "PS_INPUT_MISSING")]
    MissingInput,
    #[serde(rename = "PS_RUNTIME_LOOP_LIMIT")]
    LoopLimit,
    #[serde(rename = "PS_RUNTIME_CALL_DEPTH")]
    CallDepth,
    #[serde(rename = "PS_RUNTIME_CALL")]
    Call,
    #[serde(rename = "PS_RUNTIME_UNSUPPORTED")]
    Unsupported,
    #[serde(rename = "PS_UNKNOWN")]
    Unknown,
}

impl ErrorCode {
    /// Wire spelling of the code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ParseSyntax => "PS_PARSE_SYNTAX",
            Self::ParseStructure => "PS_PARSE_STRUCTURE",
            Self::ParseDuplicate => "PS_PARSE_DUPLICATE",
            Self::ParseUnsupported => "PS_PARSE_UNSUPPORTED",
            Self::Undeclared => "PS_RUNTIME_UNDECLARED",
            Self::Constant => "PS_RUNTIME_CONSTANT",
            Self::Type => "PS_RUNTIME_TYPE",
            Self::DivisionByZero => "PS_RUNTIME_DIV_ZERO",
            Self::IndexOutOfRange => "PS_RUNTIME_INDEX_RANGE",
            Self::IndexCount => "PS_RUNTIME_INDEX_COUNT",
            Self::ArrayShape => "PS_RUNTIME_ARRAY_SHAPE",
            Self::MissingInput => "PS_INPUT_MISSING",
            Self::LoopLimit => "PS_RUNTIME_LOOP_LIMIT",
            Self::CallDepth => "PS_RUNTIME_CALL_DEPTH",
            Self::Call => "PS_RUNTIME_CALL",
            Self::Unsupported => "PS_RUNTIME_UNSUPPORTED",
            Self::Unknown => "PS_UNKNOWN",
        }
    }

    /// Category a code belongs to unless stated otherwise.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ParseSyntax | Self::ParseUnsupported => ErrorCategory::Syntax,
            Self::ParseStructure => ErrorCategory::Structure,
            Self::ParseDuplicate
            | Self::Undeclared
            | Self::Constant
            | Self::IndexCount
            | Self::Call
            | Self::Unsupported => ErrorCategory::Semantic,
            Self::Type | Self::ArrayShape => ErrorCategory::Type,
            Self::DivisionByZero | Self::IndexOutOfRange => ErrorCategory::Logic,
            Self::MissingInput => ErrorCategory::Input,
            Self::LoopLimit | Self::CallDepth => ErrorCategory::Limit,
            Self::Unknown => ErrorCategory::Internal,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Broad error family used by the UI to pick an icon and tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Syntax,
    Structure,
    Semantic,
    Type,
    Logic,
    Input,
    Limit,
    Internal,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Syntax => "syntax",
            Self::Structure => "structure",
            Self::Semantic => "semantic",
            Self::Type => "type",
            Self::Logic => "logic",
            Self::Input => "input",
            Self::Limit => "limit",
            Self::Internal => "internal",
        }
    }
}

// =============================================================================
// RUNTIME ERROR
// =============================================================================

/// A dynamic invariant violated by a program that parsed fine.
///
/// Execution is fail-fast: the first runtime error ends the run.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct RuntimeError {
    pub message: String,
    pub code: ErrorCode,
    pub category: ErrorCategory,
    pub hint: Option<String>,
    pub line: Option<usize>,
    pub context: Option<String>,
}

impl RuntimeError {
    /// Create an error in the code's default category.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code,
            category: code.category(),
            hint: None,
            line: None,
            context: None,
        }
    }

    /// Attach a hint for the student.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Attach a context tag (`read`, `array`, `call`...).
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Attach a source line unless one is already set.
    ///
    /// Errors raised deep inside a subprogram keep the innermost line.
    pub fn at_line(mut self, line: usize) -> Self {
        self.line.get_or_insert(line);
        self
    }

    // =========================================================================
    // CONSTRUCTORS
    // =========================================================================

    pub fn undeclared(name: &str) -> Self {
        Self::new(ErrorCode::Undeclared, format!("undeclared variable '{}'", name))
            .with_hint(format!("Declare it first: Definir {} Como <Tipo>;", name))
            .with_context("variable")
    }

    pub fn constant_assignment(name: &str) -> Self {
        Self::new(ErrorCode::Constant, format!("cannot assign to constant '{}'", name))
            .with_hint("Constants keep the value given in Constante; use a variable instead.")
            .with_context("constant")
    }

    pub fn constant_redeclared(name: &str) -> Self {
        Self::new(
            ErrorCode::Constant,
            format!("'{}' is already declared in this scope and cannot be a constant", name),
        )
        .with_context("constant")
    }

    pub fn type_mismatch(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Type, message).with_context("type")
    }

    pub fn division_by_zero() -> Self {
        Self::new(ErrorCode::DivisionByZero, "division by zero")
            .with_hint("Check that the divisor is not 0 before dividing.")
            .with_context("arithmetic")
    }

    /// `index` is 1-based, as written in the source.
    pub fn index_out_of_range(name: &str, index: usize, size: usize) -> Self {
        Self::new(
            ErrorCode::IndexOutOfRange,
            format!("index out of range: {}[{}] (valid 1..{})", name, index, size),
        )
        .with_hint("Array indices start at 1 and end at the declared size.")
        .with_context("array")
    }

    pub fn invalid_index(value: &str) -> Self {
        Self::new(
            ErrorCode::IndexOutOfRange,
            format!("index out of range: '{}' is not a valid array index", value),
        )
        .with_hint("Array indices are whole numbers starting at 1.")
        .with_context("array")
    }

    pub fn invalid_index_count(name: &str, expected: usize, received: usize) -> Self {
        Self::new(
            ErrorCode::IndexCount,
            format!(
                "invalid index count for '{}': expected {}, received {}",
                name, expected, received
            ),
        )
        .with_context("array")
    }

    pub fn array_shape(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ArrayShape, message).with_context("array")
    }

    pub fn missing_input(key: &str) -> Self {
        Self::new(ErrorCode::MissingInput, format!("missing input value for '{}'", key))
            .with_hint(format!("Provide a value for '{}' before running.", key))
            .with_context("read")
    }

    pub fn loop_limit(limit: usize) -> Self {
        Self::new(
            ErrorCode::LoopLimit,
            format!("loop limit exceeded: more than {} iterations", limit),
        )
        .with_hint("Make sure the loop condition eventually changes.")
        .with_context("loop")
    }

    pub fn call_depth(limit: usize) -> Self {
        Self::new(
            ErrorCode::CallDepth,
            format!("maximum call depth exceeded ({} nested calls)", limit),
        )
        .with_hint("Check that the recursion has a base case that is reached.")
        .with_context("call")
    }

    pub fn argument_count(name: &str, expected: usize, received: usize) -> Self {
        Self::new(
            ErrorCode::Call,
            format!(
                "'{}' expects {} argument(s) but received {}",
                name, expected, received
            ),
        )
        .with_context("call")
    }

    pub fn by_reference_argument(subprogram: &str, parameter: &str) -> Self {
        Self::new(
            ErrorCode::Call,
            format!(
                "argument for by-reference parameter '{}' of '{}' must be a variable or array element",
                parameter, subprogram
            ),
        )
        .with_context("call")
    }

    pub fn procedure_as_expression(name: &str) -> Self {
        Self::new(
            ErrorCode::Call,
            format!("cannot use procedure '{}' as expression", name),
        )
        .with_hint("Only a Funcion with a return variable produces a value.")
        .with_context("call")
    }

    pub fn unsupported_function(name: &str) -> Self {
        Self::new(ErrorCode::Unsupported, format!("function not supported: '{}'", name))
            .with_context("call")
    }

    pub fn unsupported_subprogram(name: &str) -> Self {
        Self::new(ErrorCode::Unsupported, format!("unsupported subprogram '{}'", name))
            .with_context("call")
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RuntimeError::division_by_zero();
        assert_eq!(err.to_string(), "division by zero");
        assert_eq!(err.category, ErrorCategory::Logic);
        assert_eq!(err.code.as_str(), "PS_RUNTIME_DIV_ZERO");
    }

    #[test]
    fn test_at_line_keeps_innermost() {
        let err = RuntimeError::undeclared("x").at_line(7).at_line(2);
        assert_eq!(err.line, Some(7));
    }

    #[test]
    fn test_code_serializes_as_wire_string() {
        let json = serde_json::to_string(&ErrorCode::MissingInput).unwrap();
        assert_eq!(json, "\"PS_INPUT_MISSING\"");
        let json = serde_json::to_string(&ErrorCategory::Limit).unwrap();
        assert_eq!(json, "\"limit\"");
    }
}
