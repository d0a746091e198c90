//! Tests for the WASM-facing helpers.

use super::*;
use pretty_assertions::assert_eq;

const DOUBLE: &str = "Algoritmo Doble\n Definir n Como Entero;\n Leer n;\n Escribir n * 2;\nFinAlgoritmo";

/// A successful run serializes with `status: ok` and camelCase fields.
#[test]
fn run_program_reports_ok() {
    let json = run_program(DOUBLE, r#"{"n": "5"}"#);
    let value: serde_json::Value = serde_json::from_str(&json).expect("response is JSON");
    assert_eq!(value["status"], "ok");
    assert_eq!(value["execution"]["outputs"][0], "10");
    assert_eq!(value["execution"]["variables"]["n"], 5.0);
    assert!(value["execution"]["stepsExecuted"].as_u64().is_some());
}

/// Numeric and boolean input values are accepted as text.
#[test]
fn run_program_accepts_non_string_inputs() {
    let RunResponse::Ok { execution } = run_program_internal(DOUBLE, r#"{"n": 21}"#) else {
        panic!("expected a successful run");
    };
    assert_eq!(execution.outputs, vec!["42"]);
}

/// Runtime failures come back as a normalized descriptor.
#[test]
fn run_program_reports_runtime_error() {
    let json = run_program(DOUBLE, "");
    let value: serde_json::Value = serde_json::from_str(&json).expect("response is JSON");
    assert_eq!(value["status"], "error");
    assert_eq!(value["error"]["code"], "PS_INPUT_MISSING");
    assert_eq!(value["error"]["category"], "input");
    assert_eq!(value["error"]["source"], "runtime");
    assert_eq!(value["error"]["line"], 3);
}

/// Malformed input JSON is reported, not thrown.
#[test]
fn run_program_rejects_bad_inputs() {
    let RunResponse::Error { error } = run_program_internal(DOUBLE, "[1, 2") else {
        panic!("expected an error response");
    };
    assert_eq!(error.source, pseint_eval::ErrorSource::Unknown);
    assert!(error.message.starts_with("invalid inputs"));
}

/// The program tree is exposed as tagged JSON.
#[test]
fn parse_to_json_exposes_tree() {
    let json = parse_to_json_internal(DOUBLE).expect("program parses");
    let value: serde_json::Value = serde_json::from_str(&json).expect("tree is JSON");
    assert_eq!(value["name"], "Doble");
    assert_eq!(value["statements"][0]["kind"]["type"], "read");
    assert_eq!(value["statements"][1]["kind"]["type"], "write");
}

/// Syntax errors surface as one diagnostic with a line.
#[test]
fn check_syntax_reports_line() {
    let diagnostics = check_syntax_internal("Algoritmo A\n Si x > 0 Entonces\n Escribir x;\nFinAlgoritmo");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code(), "PS_PARSE_STRUCTURE");
    assert_eq!(diagnostics[0].category(), "structure");
    assert!(diagnostics[0].line().is_some());
    assert!(diagnostics[0].hint().is_some());

    let list = check_syntax(DOUBLE);
    assert!(list.is_empty());
    assert_eq!(list.get(0), None);
}
