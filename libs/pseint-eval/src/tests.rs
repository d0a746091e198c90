//! # Entry Point Tests

use std::collections::HashMap;

use crate::{execute_program_with_limits, normalize_error, run_source, ErrorCategory, ErrorCode, ErrorSource, PseintError, Value};
use config::constants::ExecutionLimits;
use pretty_assertions::assert_eq;

fn no_inputs() -> HashMap<String, String> {
    HashMap::new()
}

#[test]
fn test_run_source_outputs_and_variables() {
    let execution = run_source(
        "Algoritmo A\n Definir x Como Real;\n x <- 2.5 * 2;\n Escribir \"x = \", x;\nFinAlgoritmo",
        &no_inputs(),
    )
    .unwrap();
    assert_eq!(execution.outputs, vec!["x = 5"]);
    assert_eq!(execution.variables["x"], Value::Number(5.0));
}

#[test]
fn test_run_source_parse_error() {
    let error = run_source("Algoritmo A\n Si 1 > 0 Entonces\nFinAlgoritmo", &no_inputs()).unwrap_err();
    assert!(matches!(error, PseintError::Parse(_)));
    let descriptor = normalize_error(&error);
    assert_eq!(descriptor.source, ErrorSource::Parse);
    assert_eq!(descriptor.code, ErrorCode::ParseStructure);
}

#[test]
fn test_run_source_runtime_error_descriptor() {
    let error = run_source("Algoritmo A\n Escribir 1 / 0;\nFinAlgoritmo", &no_inputs()).unwrap_err();
    let descriptor = normalize_error(&error);
    assert_eq!(descriptor.code, ErrorCode::DivisionByZero);
    assert_eq!(descriptor.category, ErrorCategory::Logic);
    assert_eq!(descriptor.line, Some(2));
}

#[test]
fn test_runs_are_independent() {
    let source = "Algoritmo A\n Definir c Como Entero;\n c <- c + 1;\n Escribir c;\nFinAlgoritmo";
    let first = run_source(source, &no_inputs()).unwrap();
    let second = run_source(source, &no_inputs()).unwrap();
    assert_eq!(first, second);
    assert_eq!(second.outputs, vec!["1"]);
}

#[test]
fn test_custom_limits() {
    let program = pseint_parser::parse_program(
        "Algoritmo A\n Definir i Como Entero;\n i <- 0;\n Mientras Verdadero Hacer\n i <- i + 1;\n FinMientras\nFinAlgoritmo",
    )
    .unwrap();
    let limits = ExecutionLimits::new(50, 10, 8).unwrap();
    let error = execute_program_with_limits(&program, &no_inputs(), limits).unwrap_err();
    assert_eq!(error.code, ErrorCode::LoopLimit);
    assert_eq!(error.line, Some(4));
}

#[test]
fn test_execution_serializes_camel_case() {
    let execution = run_source("Algoritmo A\n Escribir 1;\nFinAlgoritmo", &no_inputs()).unwrap();
    let json = serde_json::to_value(&execution).unwrap();
    assert_eq!(json["outputs"][0], "1");
    assert_eq!(json["stepsExecuted"], 1);
    assert_eq!(json["traceTruncated"], false);
    assert_eq!(json["trace"][0]["marker"], "start");
}
