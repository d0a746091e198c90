//! # Parse Errors
//!
//! Error types for the PSeInt parser.
//!
//! ## Example
//!
//! ```rust
//! use pseint_parser::error::{ParseError, ParseErrorKind};
//!
//! let error = ParseError::new(
//!     ParseErrorKind::UnexpectedLine { text: "FinX".to_string() },
//!     Some(3),
//! );
//! assert_eq!(error.to_string(), "line 3: unrecognized instruction 'FinX'");
//! ```

use std::fmt;
use thiserror::Error;

// =============================================================================
// PARSE ERROR
// =============================================================================

/// A parse error with the line it was found on.
///
/// Parsing is fail-fast: the first error aborts the whole parse.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// Error kind with details.
    pub kind: ParseErrorKind,
    /// 1-based source line, when known.
    pub line: Option<usize>,
}

impl ParseError {
    /// Create a new parse error.
    ///
    /// ## Parameters
    ///
    /// - `kind`: Error kind
    /// - `line`: Source line
    pub const fn new(kind: ParseErrorKind, line: Option<usize>) -> Self {
        Self { kind, line }
    }

    /// Create error attributed to `line`.
    pub const fn at(kind: ParseErrorKind, line: usize) -> Self {
        Self::new(kind, Some(line))
    }

    /// Human-readable message without the line prefix.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    /// Create an unrecognized-instruction error.
    pub fn unexpected_line(text: &str, line: usize) -> Self {
        Self::at(
            ParseErrorKind::UnexpectedLine {
                text: text.to_string(),
            },
            line,
        )
    }

    /// Create an invalid-expression error.
    pub fn invalid_expression(text: &str, reason: &str, line: usize) -> Self {
        Self::at(
            ParseErrorKind::InvalidExpression {
                text: text.to_string(),
                reason: reason.to_string(),
            },
            line,
        )
    }

    /// Create an invalid-declaration error.
    pub fn invalid_declaration(reason: impl Into<String>, line: usize) -> Self {
        Self::at(
            ParseErrorKind::InvalidDeclaration {
                reason: reason.into(),
            },
            line,
        )
    }

    /// Create a duplicate-name error.
    pub fn duplicate(what: &str, name: &str, line: usize) -> Self {
        Self::at(
            ParseErrorKind::Duplicate {
                what: what.to_string(),
                name: name.to_string(),
            },
            line,
        )
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {}: {}", line, self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for ParseError {}

// =============================================================================
// PARSE ERROR KIND
// =============================================================================

/// Kinds of parse errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// The program does not start with `Algoritmo <name>`.
    #[error("expected {expected}")]
    MissingHeader {
        /// What was expected instead.
        expected: String,
    },

    /// A block was opened but its terminator never appeared.
    ///
    /// ## Example
    ///
    /// `Si x > 0 Entonces` without `FinSi`.
    #[error("'{construct}' is missing its closing '{expected}'")]
    MissingTerminator {
        /// Construct that was opened.
        construct: String,
        /// Terminator that was expected.
        expected: String,
    },

    /// A terminator appeared without an open block.
    #[error("'{text}' does not close any open block")]
    UnmatchedTerminator {
        /// The terminator text.
        text: String,
    },

    /// A line that matches no instruction.
    #[error("unrecognized instruction '{text}'")]
    UnexpectedLine {
        /// The offending text.
        text: String,
    },

    /// An executable statement after `FinAlgoritmo` outside any subprogram.
    #[error("statement outside Algoritmo/Funcion/SubProceso: '{text}'")]
    OutsideBlock {
        /// The offending text.
        text: String,
    },

    /// Expression text that matches no production.
    #[error("{reason} in expression '{text}'")]
    InvalidExpression {
        /// The expression text.
        text: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Binary operator with an empty operand.
    #[error("incomplete binary expression around '{operator}' in '{text}'")]
    IncompleteBinary {
        /// The operator.
        operator: String,
        /// The expression text.
        text: String,
    },

    /// Malformed `Definir`, `Constante` or parameter list.
    #[error("invalid declaration: {reason}")]
    InvalidDeclaration {
        /// Why it was rejected.
        reason: String,
    },

    /// A name defined twice in one scope.
    #[error("duplicate {what} '{name}'")]
    Duplicate {
        /// Kind of thing being defined (variable, parameter, subprogram...).
        what: String,
        /// The repeated name.
        name: String,
    },

    /// Syntax the language subset does not support.
    #[error("unsupported syntax: {construct}")]
    Unsupported {
        /// Description of the construct.
        construct: String,
    },
}

// =============================================================================
// TESTS
// =============================================================================
