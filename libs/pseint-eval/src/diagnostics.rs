//! # Error Normalization
//!
//! Maps any parse, runtime or foreign error into one stable
//! [`ErrorDescriptor`] so the presentation layer never inspects raw error
//! types.
//!
//! Explicit metadata always wins. A message-pattern table only fills in what
//! is missing and never changes the message or the line.
//!
//! ## Example
//!
//! ```rust
//! use pseint_eval::diagnostics::{normalize_error, ErrorSource, PseintError};
//! use pseint_eval::error::{ErrorCategory, ErrorCode, RuntimeError};
//!
//! let error = PseintError::from(RuntimeError::division_by_zero().at_line(2));
//! let descriptor = normalize_error(&error);
//! assert_eq!(descriptor.code, ErrorCode::DivisionByZero);
//! assert_eq!(descriptor.category, ErrorCategory::Logic);
//! assert_eq!(descriptor.source, ErrorSource::Runtime);
//! assert_eq!(descriptor.line, Some(2));
//! ```

use pseint_parser::{ParseError, ParseErrorKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{ErrorCategory, ErrorCode, RuntimeError};

// =============================================================================
// UNIFIED ERROR
// =============================================================================

/// Any failure of a parse-then-run pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PseintError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    /// A failure from outside the language core, kept as text.
    #[error("{0}")]
    Other(String),
}

/// Which layer raised the error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSource {
    Parse,
    Runtime,
    Unknown,
}

/// Stable description of an error for the UI layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDescriptor {
    pub code: ErrorCode,
    pub category: ErrorCategory,
    pub source: ErrorSource,
    pub message: String,
    pub hint: Option<String>,
    pub line: Option<usize>,
    pub context: Option<String>,
}

// =============================================================================
// PATTERNS
// =============================================================================

/// Message fragment, code, hint and context for well-known failures.
struct Pattern {
    needle: &'static str,
    code: ErrorCode,
    hint: &'static str,
    context: &'static str,
}

const PATTERNS: &[Pattern] = &[
    Pattern {
        needle: "division by zero",
        code: ErrorCode::DivisionByZero,
        hint: "Check that the divisor cannot be 0 before dividing.",
        context: "expression",
    },
    Pattern {
        needle: "index out of range",
        code: ErrorCode::IndexOutOfRange,
        hint: "Array indices start at 1 and end at the declared size.",
        context: "array",
    },
    Pattern {
        needle: "invalid index count",
        code: ErrorCode::IndexCount,
        hint: "Use one index per declared dimension.",
        context: "array",
    },
    Pattern {
        needle: "missing input",
        code: ErrorCode::MissingInput,
        hint: "Provide a value for every variable read with Leer.",
        context: "read",
    },
    Pattern {
        needle: "undeclared",
        code: ErrorCode::Undeclared,
        hint: "Declare the variable with Definir before using it.",
        context: "variable",
    },
    Pattern {
        needle: "constant",
        code: ErrorCode::Constant,
        hint: "Constants cannot change after they are defined.",
        context: "variable",
    },
    Pattern {
        needle: "loop limit",
        code: ErrorCode::LoopLimit,
        hint: "Check that the loop condition eventually changes.",
        context: "loop",
    },
    Pattern {
        needle: "call depth",
        code: ErrorCode::CallDepth,
        hint: "Check that the recursion has a base case that is reached.",
        context: "call",
    },
    Pattern {
        needle: "cannot convert",
        code: ErrorCode::Type,
        hint: "Check the declared type of the variables involved.",
        context: "type",
    },
    Pattern {
        needle: "not supported",
        code: ErrorCode::Unsupported,
        hint: "This construct is outside the supported language subset.",
        context: "call",
    },
    Pattern {
        needle: "unsupported",
        code: ErrorCode::Unsupported,
        hint: "This construct is outside the supported language subset.",
        context: "call",
    },
    Pattern {
        needle: "expects",
        code: ErrorCode::Call,
        hint: "Check the number and kind of arguments in the call.",
        context: "call",
    },
];

fn find_pattern(message: &str) -> Option<&'static Pattern> {
    let message = message.to_lowercase();
    PATTERNS.iter().find(|p| message.contains(p.needle))
}

// =============================================================================
// NORMALIZATION
// =============================================================================

/// Describe any error with a stable code, category and hint.
pub fn normalize_error(error: &PseintError) -> ErrorDescriptor {
    match error {
        PseintError::Parse(error) => describe_parse(error),
        PseintError::Runtime(error) => describe_runtime(error),
        PseintError::Other(message) => describe_other(message),
    }
}

fn describe_parse(error: &ParseError) -> ErrorDescriptor {
    let (code, hint) = match &error.kind {
        ParseErrorKind::MissingHeader { .. } => (
            ErrorCode::ParseStructure,
            "A program starts with 'Algoritmo <nombre>' and ends with 'FinAlgoritmo'.",
        ),
        ParseErrorKind::MissingTerminator { .. } => {
            (ErrorCode::ParseStructure, "Close every block with its matching 'Fin...' line.")
        }
        ParseErrorKind::UnmatchedTerminator { .. } => {
            (ErrorCode::ParseStructure, "Remove the extra terminator or open the block it closes.")
        }
        ParseErrorKind::OutsideBlock { .. } => (
            ErrorCode::ParseStructure,
            "Move the statement inside the Algoritmo or a subprogram.",
        ),
        ParseErrorKind::UnexpectedLine { .. } => {
            (ErrorCode::ParseSyntax, "Check the spelling of the instruction and its keywords.")
        }
        ParseErrorKind::InvalidExpression { .. } | ParseErrorKind::IncompleteBinary { .. } => {
            (ErrorCode::ParseSyntax, "Check operators, parentheses and quotes in the expression.")
        }
        ParseErrorKind::InvalidDeclaration { .. } => (
            ErrorCode::ParseSyntax,
            "Declarations look like 'Definir x Como Entero;' or 'Constante PI <- 3.14;'.",
        ),
        ParseErrorKind::Duplicate { .. } => (ErrorCode::ParseDuplicate, "Each name can be defined once per scope."),
        ParseErrorKind::Unsupported { .. } => (
            ErrorCode::ParseUnsupported,
            "This construct is outside the supported language subset.",
        ),
    };

    ErrorDescriptor {
        code,
        category: code.category(),
        source: ErrorSource::Parse,
        message: error.message(),
        hint: Some(hint.to_string()),
        line: error.line,
        context: Some("parse".to_string()),
    }
}

fn describe_runtime(error: &RuntimeError) -> ErrorDescriptor {
    let pattern = find_pattern(&error.message);
    ErrorDescriptor {
        code: error.code,
        category: error.category,
        source: ErrorSource::Runtime,
        message: error.message.clone(),
        hint: error
            .hint
            .clone()
            .or_else(|| pattern.map(|p| p.hint.to_string())),
        line: error.line,
        context: error
            .context
            .clone()
            .or_else(|| pattern.map(|p| p.context.to_string())),
    }
}

fn describe_other(message: &str) -> ErrorDescriptor {
    match find_pattern(message) {
        Some(pattern) => ErrorDescriptor {
            code: pattern.code,
            category: pattern.code.category(),
            source: ErrorSource::Runtime,
            message: message.to_string(),
            hint: Some(pattern.hint.to_string()),
            line: None,
            context: Some(pattern.context.to_string()),
        },
        None => ErrorDescriptor {
            code: ErrorCode::Unknown,
            category: ErrorCategory::Internal,
            source: ErrorSource::Unknown,
            message: message.to_string(),
            hint: None,
            line: None,
            context: None,
        },
    }
}
