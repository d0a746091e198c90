//! WASM-facing entry points for the PSeInt parser and interpreter.
//!
//! This crate is compiled to a `cdylib` and consumed from a JavaScript
//! worker via `wasm-bindgen`. Native tests interact with the `*_internal`
//! helpers to avoid depending on a JS host.
//!
//! ```
//! let response = pseint_wasm::run_program_internal(
//!     "Algoritmo A\n Escribir 2 + 2;\nFinAlgoritmo",
//!     "{}",
//! );
//! assert!(matches!(response, pseint_wasm::RunResponse::Ok { .. }));
//! ```

use std::collections::HashMap;

use pseint_eval::{normalize_error, run_source, ErrorDescriptor, PseintError, RuntimeExecution};
use serde::Serialize;
use wasm_bindgen::prelude::*;

mod diagnostics;

pub use diagnostics::{Diagnostic, DiagnosticList};

/// Installs a panic hook that forwards Rust panics to the browser console.
///
/// # Examples
/// ```no_run
/// // In JavaScript: import and call once at startup.
/// // import { init_panic_hook } from "pseint_wasm";
/// // init_panic_hook();
/// ```
#[wasm_bindgen]
pub fn init_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

// =============================================================================
// PARSE
// =============================================================================

/// Parses source and returns the program tree as JSON.
///
/// Diagram and analysis views consume this output.
///
/// # Errors
/// Returns a JavaScript error value containing the parse error message.
///
/// # Examples
/// ```no_run
/// // In JavaScript: const ast = JSON.parse(parse_to_json(source));
/// ```
#[wasm_bindgen]
pub fn parse_to_json(source: &str) -> Result<String, JsValue> {
    parse_to_json_internal(source).map_err(|err| JsValue::from_str(&err.to_string()))
}

/// Host-only helper behind [`parse_to_json`].
///
/// # Examples
/// ```
/// let json = pseint_wasm::parse_to_json_internal("Algoritmo A\nFinAlgoritmo").unwrap();
/// assert!(json.contains("\"name\":\"A\""));
/// ```
pub fn parse_to_json_internal(source: &str) -> Result<String, PseintError> {
    let program = pseint_parser::parse_program(source)?;
    serde_json::to_string(&program).map_err(|err| PseintError::Other(err.to_string()))
}

// =============================================================================
// RUN
// =============================================================================

/// Outcome of one run, tagged by `status` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RunResponse {
    Ok { execution: RuntimeExecution },
    Error { error: ErrorDescriptor },
}

impl RunResponse {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|err| {
            format!(
                "{{\"status\":\"error\",\"error\":{{\"code\":\"PS_UNKNOWN\",\"category\":\"internal\",\"source\":\"unknown\",\"message\":{:?}}}}}",
                err.to_string()
            )
        })
    }
}

/// Parses and runs a program, returning a JSON [`RunResponse`].
///
/// `inputs_json` is an object keyed by read target (`"n"`, `"v[2]"`). Values
/// may be strings, numbers or booleans. An empty string means no inputs.
///
/// Never throws: every failure is reported inside the response.
///
/// # Examples
/// ```no_run
/// // In JavaScript:
/// // const response = JSON.parse(run_program(source, JSON.stringify({ n: "5" })));
/// // if (response.status === "ok") console.log(response.execution.outputs);
/// ```
#[wasm_bindgen]
pub fn run_program(source: &str, inputs_json: &str) -> String {
    run_program_internal(source, inputs_json).to_json()
}

/// Host-only helper behind [`run_program`].
///
/// # Examples
/// ```
/// use pseint_wasm::{run_program_internal, RunResponse};
///
/// let response = run_program_internal(
///     "Algoritmo A\n Definir n Como Entero;\n Leer n;\n Escribir n * 2;\nFinAlgoritmo",
///     r#"{"n": 5}"#,
/// );
/// let RunResponse::Ok { execution } = response else { panic!("run failed") };
/// assert_eq!(execution.outputs, vec!["10".to_string()]);
/// ```
pub fn run_program_internal(source: &str, inputs_json: &str) -> RunResponse {
    let result = parse_inputs(inputs_json).and_then(|inputs| run_source(source, &inputs));
    match result {
        Ok(execution) => RunResponse::Ok { execution },
        Err(error) => RunResponse::Error {
            error: normalize_error(&error),
        },
    }
}

fn parse_inputs(inputs_json: &str) -> Result<HashMap<String, String>, PseintError> {
    if inputs_json.trim().is_empty() {
        return Ok(HashMap::new());
    }
    let raw: HashMap<String, serde_json::Value> = serde_json::from_str(inputs_json)
        .map_err(|err| PseintError::Other(format!("invalid inputs: {}", err)))?;
    Ok(raw
        .into_iter()
        .map(|(key, value)| {
            let text = match value {
                serde_json::Value::String(text) => text,
                other => other.to_string(),
            };
            (key, text)
        })
        .collect())
}

// =============================================================================
// SYNTAX CHECK
// =============================================================================

/// Parses source without running it and returns editor diagnostics.
///
/// # Examples
/// ```no_run
/// // In JavaScript:
/// // const list = check_syntax(source);
/// // for (let i = 0; i < list.len(); i++) mark(list.get(i).line());
/// ```
#[wasm_bindgen]
pub fn check_syntax(source: &str) -> DiagnosticList {
    DiagnosticList::new(check_syntax_internal(source))
}

/// Host-only helper behind [`check_syntax`].
///
/// # Examples
/// ```
/// let diagnostics = pseint_wasm::check_syntax_internal("Algoritmo A\n Escribir 1;\nFinAlgoritmo");
/// assert!(diagnostics.is_empty());
/// ```
pub fn check_syntax_internal(source: &str) -> Vec<Diagnostic> {
    match pseint_parser::parse_program(source) {
        Ok(_) => Vec::new(),
        Err(error) => vec![Diagnostic::from(normalize_error(&PseintError::from(error)))],
    }
}

#[cfg(test)]
mod tests;
