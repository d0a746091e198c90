//! # PSeInt Parser
//!
//! A line-oriented parser for Spanish-keyword PSeInt pseudocode.
//! There is no token stream: lines are classified by their leading keyword
//! and expressions are split at operators found by depth-aware scanning.
//!
//! ## Architecture
//!
//! ```text
//! Source Text → Line Normalizer → Lines → Parser → ProgramAst
//! ```
//!
//! ## Example
//!
//! ```rust
//! use pseint_parser::parse_program;
//!
//! let program = parse_program(
//!     "Algoritmo Doble\n  Definir n Como Entero;\n  Leer n;\n  Escribir n * 2;\nFinAlgoritmo",
//! )
//! .unwrap();
//! assert_eq!(program.name, "Doble");
//! assert_eq!(program.declarations.len(), 1);
//! assert_eq!(program.statements.len(), 2);
//! ```
//!
//! ## Pipeline Integration
//!
//! ```text
//! pseint-parser → pseint-eval → pseint-wasm
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;

pub use ast::ProgramAst;
pub use error::{ParseError, ParseErrorKind};
pub use parser::{parse_expression, parse_target_ref};

// =============================================================================
// PUBLIC API
// =============================================================================

/// Parse PSeInt source code into a [`ProgramAst`].
///
/// This is the main entry point for the parser.
///
/// ## Parameters
///
/// - `source`: program text starting with `Algoritmo <nombre>`
///
/// ## Errors
///
/// Parsing is fail-fast: the first malformed line yields a [`ParseError`]
/// carrying its line number when known.
///
/// ```rust
/// use pseint_parser::parse_program;
///
/// let err = parse_program("Algoritmo A\n  Escribir 1 +;\nFinAlgoritmo").unwrap_err();
/// assert_eq!(err.line, Some(2));
/// ```
pub fn parse_program(source: &str) -> Result<ProgramAst, ParseError> {
    parser::Parser::new(source).parse()
}

// =============================================================================
// TESTS
// =============================================================================
