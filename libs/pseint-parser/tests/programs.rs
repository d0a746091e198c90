use pseint_parser::ast::{Expression, StatementKind, VarType};
use pseint_parser::{parse_program, ParseErrorKind};

#[test]
fn parses_doubling_program() {
    let src = "Algoritmo A\n Definir n Como Entero;\n Leer n;\n Escribir n*2;\nFinAlgoritmo";
    let program = parse_program(src).unwrap();
    assert_eq!(program.declarations[0].name, "n");
    assert_eq!(program.statements[0].kind.marker(), "read");
    assert_eq!(program.statements[1].kind.marker(), "write");
}

#[test]
fn parses_full_classroom_program() {
    let src = r#"
// Promedio de notas
Algoritmo Promedio
    Definir notas[5] Como Real;
    Definir i Como Entero;
    Definir suma Como Real;
    Constante TOTAL <- 5;
    suma <- 0;
    Para i <- 1 Hasta TOTAL Hacer
        Leer notas[i];
        suma <- suma + notas[i];
    FinPara
    Si suma / TOTAL >= 6 Y suma > 0 Entonces
        Escribir "Aprobado: ", suma / TOTAL;
    Sino
        Escribir "Reprobado";
    FinSi
    Mostrar Maximo(notas, TOTAL);
FinAlgoritmo

Funcion m <- Maximo(v[], n)
    Definir k Como Entero;
    m <- v[1];
    Para k <- 2 Hasta n Hacer
        Si v[k] > m Entonces m <- v[k]; FinSi
    FinPara
FinFuncion
"#;
    let program = parse_program(src).unwrap();
    assert_eq!(program.name, "Promedio");
    assert_eq!(program.declarations.len(), 3);
    assert_eq!(program.declarations[0].dimensions, Some(vec![5]));
    assert_eq!(program.constants[0].name, "TOTAL");
    assert_eq!(program.statements.len(), 4);
    let maximo = program.function("Maximo").unwrap();
    assert_eq!(maximo.parameters[0].array_rank, Some(1));
    assert_eq!(maximo.declarations[0].var_type, VarType::Entero);
}

#[test]
fn string_content_is_not_parsed() {
    let src = "Algoritmo S\n Escribir \"FinAlgoritmo; // no es comentario\";\nFinAlgoritmo";
    let program = parse_program(src).unwrap();
    match &program.statements[0].kind {
        StatementKind::Write { expressions, .. } => {
            assert_eq!(expressions[0], Expression::string("FinAlgoritmo; // no es comentario"));
        }
        other => panic!("expected write, got {:?}", other),
    }
}

#[test]
fn lowercase_y_is_a_variable() {
    let src = "Algoritmo V\n Definir x, y Como Entero\n x <- y + 1\nFinAlgoritmo";
    let program = parse_program(src).unwrap();
    assert_eq!(program.declarations[1].name, "y");
}

#[test]
fn incomplete_binary_reports_line() {
    let src = "Algoritmo E\n Definir x Como Entero\n\n x <- 3 *\nFinAlgoritmo";
    let err = parse_program(src).unwrap_err();
    assert!(matches!(err.kind, ParseErrorKind::IncompleteBinary { .. }));
    assert_eq!(err.line, Some(4));
    assert!(err.to_string().starts_with("line 4:"));
}

#[test]
fn constant_collides_with_variable() {
    let src = "Algoritmo C\n Definir PI Como Real\n Constante PI <- 3\nFinAlgoritmo";
    let err = parse_program(src).unwrap_err();
    assert!(matches!(err.kind, ParseErrorKind::Duplicate { .. }));
}

#[test]
fn ast_serializes_with_type_tags() {
    let src = "Algoritmo J\n x <- NO Verdadero\nFinAlgoritmo";
    let program = parse_program(src).unwrap();
    let json = serde_json::to_value(&program).unwrap();
    assert_eq!(json["statements"][0]["kind"]["type"], "assign");
    assert_eq!(json["statements"][0]["kind"]["value"]["type"], "unary");
}
