//! # PSeInt Eval
//!
//! Tree-walking interpreter for parsed PSeInt programs, producing outputs,
//! final variables and a step-by-step trace.
//!
//! ## Architecture
//!
//! ```text
//! Source → pseint-parser (ProgramAst) → pseint-eval (RuntimeExecution) → pseint-wasm
//! ```
//!
//! ## Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use pseint_eval::run_source;
//!
//! let inputs = HashMap::from([("n".to_string(), "5".to_string())]);
//! let execution = run_source(
//!     "Algoritmo Doble\n Definir n Como Entero;\n Leer n;\n Escribir n * 2;\nFinAlgoritmo",
//!     &inputs,
//! )
//! .unwrap();
//! assert_eq!(execution.outputs, vec!["10".to_string()]);
//! ```

pub mod diagnostics;
pub mod error;
pub mod evaluator;
pub mod scope;
pub mod value;

use std::collections::HashMap;

use config::constants::ExecutionLimits;
use pseint_parser::ProgramAst;

pub use diagnostics::{normalize_error, ErrorDescriptor, ErrorSource, PseintError};
pub use error::{ErrorCategory, ErrorCode, RuntimeError};
pub use evaluator::{Interpreter, RuntimeExecution, TraceSnapshot};
pub use value::Value;

// =============================================================================
// PUBLIC API
// =============================================================================

/// Execute a parsed program with the default limits.
///
/// ## Parameters
///
/// - `program`: output of [`pseint_parser::parse_program`]
/// - `inputs`: raw values keyed by read target (`n`, `v[2]`, `m[1,3]`)
///
/// ## Example
///
/// ```rust
/// use std::collections::HashMap;
/// use pseint_eval::{execute_program, ErrorCode};
///
/// let program = pseint_parser::parse_program("Algoritmo A\n Escribir 1 / 0;\nFinAlgoritmo").unwrap();
/// let error = execute_program(&program, &HashMap::new()).unwrap_err();
/// assert_eq!(error.code, ErrorCode::DivisionByZero);
/// ```
pub fn execute_program(
    program: &ProgramAst,
    inputs: &HashMap<String, String>,
) -> Result<RuntimeExecution, RuntimeError> {
    execute_program_with_limits(program, inputs, ExecutionLimits::default())
}

/// Execute a parsed program with custom loop, trace and call limits.
pub fn execute_program_with_limits(
    program: &ProgramAst,
    inputs: &HashMap<String, String>,
    limits: ExecutionLimits,
) -> Result<RuntimeExecution, RuntimeError> {
    Interpreter::new(program, inputs, limits).run()
}

/// Parse and execute source text in one step.
///
/// ## Errors
///
/// Returns [`PseintError::Parse`] or [`PseintError::Runtime`]; pass it to
/// [`normalize_error`] for a UI-ready descriptor.
pub fn run_source(
    source: &str,
    inputs: &HashMap<String, String>,
) -> Result<RuntimeExecution, PseintError> {
    let program = pseint_parser::parse_program(source)?;
    Ok(execute_program(&program, inputs)?)
}

#[cfg(test)]
mod tests;
