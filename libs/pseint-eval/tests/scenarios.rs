//! End-to-end runs of complete programs.

use std::collections::HashMap;

use pretty_assertions::assert_eq;
use pseint_eval::{normalize_error, run_source, ErrorCategory, ErrorCode, Value};

fn inputs(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

#[test]
fn doubles_a_read_number() {
    let source = "Algoritmo Doble\n  Definir n Como Entero;\n  Leer n;\n  Escribir n * 2;\nFinAlgoritmo";
    let execution = run_source(source, &inputs(&[("n", "5")])).unwrap();
    assert_eq!(execution.outputs, vec!["10"]);
}

#[test]
fn sums_with_a_for_loop() {
    let source = "Algoritmo Suma\n  Definir i, suma Como Entero;\n  suma <- 0;\n  Para i <- 1 Hasta 4 Con Paso 1 Hacer\n    suma <- suma + i;\n  FinPara\nFinAlgoritmo";
    let execution = run_source(source, &inputs(&[])).unwrap();
    assert_eq!(execution.variables["suma"], Value::Number(10.0));
}

#[test]
fn inline_loop_body_on_header_line() {
    let source = "Algoritmo Suma\n  Definir i, suma Como Entero;\n  Para i <- 1 Hasta 4 Hacer suma <- suma + i; FinPara\nFinAlgoritmo";
    let execution = run_source(source, &inputs(&[])).unwrap();
    assert_eq!(execution.variables["suma"], Value::Number(10.0));
}

#[test]
fn division_by_zero_is_a_logic_error() {
    let error = run_source("Algoritmo A\n  Escribir 1/0;\nFinAlgoritmo", &inputs(&[])).unwrap_err();
    let descriptor = normalize_error(&error);
    assert_eq!(descriptor.category, ErrorCategory::Logic);
    assert_eq!(descriptor.code, ErrorCode::DivisionByZero);
}

#[test]
fn missing_input_names_the_variable() {
    let source = "Algoritmo A\n  Definir x Como Entero;\n  Leer x;\nFinAlgoritmo";
    let error = run_source(source, &inputs(&[])).unwrap_err();
    let descriptor = normalize_error(&error);
    assert_eq!(descriptor.code, ErrorCode::MissingInput);
    assert_eq!(descriptor.category, ErrorCategory::Input);
    assert!(descriptor.message.contains('x'));
    assert_eq!(descriptor.line, Some(3));
}

#[test]
fn array_parameter_mutation_reaches_caller() {
    let source = "\
SubProceso Duplicar(v[])
  Definir i Como Entero;
  Para i <- 1 Hasta 3 Hacer
    v[i] <- v[i] * 2;
  FinPara
FinSubProceso

Algoritmo A
  Definir datos[3] Como Entero;
  datos[1] <- 1;
  datos[2] <- 2;
  datos[3] <- 3;
  Duplicar(datos);
  Escribir datos[1], \",\", datos[2], \",\", datos[3];
FinAlgoritmo";
    let execution = run_source(source, &inputs(&[])).unwrap();
    assert_eq!(execution.outputs, vec!["2,4,6"]);
}

#[test]
fn by_value_scalar_stays_unchanged() {
    let source = "\
SubProceso Poner(x Por Valor)
  x <- 100;
FinSubProceso

Algoritmo A
  Definir n Como Entero;
  n <- 7;
  Poner(n);
  Escribir n;
FinAlgoritmo";
    let execution = run_source(source, &inputs(&[])).unwrap();
    assert_eq!(execution.outputs, vec!["7"]);
}

#[test]
fn sin_saltar_writes_share_a_line() {
    let source = "Algoritmo A\n  Escribir \"Hola\" Sin Saltar;\n  Escribir \" \" Sin Saltar;\n  Escribir \"mundo\";\nFinAlgoritmo";
    let execution = run_source(source, &inputs(&[])).unwrap();
    assert_eq!(execution.outputs, vec!["Hola mundo"]);
}

#[test]
fn runaway_loop_hits_the_ceiling() {
    let source = "Algoritmo A\n  Mientras Verdadero Hacer\n  FinMientras\nFinAlgoritmo";
    let error = run_source(source, &inputs(&[])).unwrap_err();
    let descriptor = normalize_error(&error);
    assert_eq!(descriptor.code, ErrorCode::LoopLimit);
    assert_eq!(descriptor.category, ErrorCategory::Limit);
}

#[test]
fn runaway_recursion_hits_the_depth_limit() {
    let source = "Funcion r <- Eterna(n)\n  r <- Eterna(n + 1);\nFinFuncion\nAlgoritmo A\n  Escribir Eterna(0);\nFinAlgoritmo";
    let error = run_source(source, &inputs(&[])).unwrap_err();
    assert_eq!(normalize_error(&error).code, ErrorCode::CallDepth);
}

#[test]
fn trace_stops_at_cap_but_execution_finishes() {
    let source = "Algoritmo A\n  Definir i, s Como Entero;\n  Para i <- 1 Hasta 3000 Hacer\n    s <- s + 1;\n  FinPara\n  Escribir s;\nFinAlgoritmo";
    let execution = run_source(source, &inputs(&[])).unwrap();
    assert_eq!(execution.trace.len(), 2_500);
    assert!(execution.trace_truncated);
    assert_eq!(execution.outputs, vec!["3000"]);
}

#[test]
fn switch_with_text_cases() {
    let source = "\
Algoritmo Menu
  Definir op Como Cadena;
  Leer op;
  Según op Hacer
    \"a\": Escribir \"alta\";
    \"b\", \"c\": Escribir \"baja\";
    De Otro Modo:
      Escribir \"nada\";
  FinSegún
FinAlgoritmo";
    let run = |value: &str| run_source(source, &inputs(&[("op", value)])).unwrap().outputs;
    assert_eq!(run("c"), vec!["baja"]);
    assert_eq!(run("z"), vec!["nada"]);
}

#[test]
fn nested_function_calls_and_builtins() {
    let source = "\
Funcion r <- Saludo(nombre)
  r <- Concatenar(\"Hola, \", Mayusculas(nombre));
FinFuncion

Algoritmo A
  Escribir Saludo(\"ana\"), \" (\", Longitud(Saludo(\"ana\")), \")\";
FinAlgoritmo";
    let execution = run_source(source, &inputs(&[])).unwrap();
    assert_eq!(execution.outputs, vec!["Hola, ANA (9)"]);
}
