use std::collections::HashMap;

use proptest::prelude::*;
use pseint_eval::{run_source, Value};

proptest! {
    /// A counting loop runs floor((end - start) / step) + 1 times.
    #[test]
    fn for_loop_iteration_count(start in -50i32..50, span in 0i32..200, step in 1i32..7, descending in any::<bool>()) {
        let (from, to, step) = if descending {
            (start + span, start, -step)
        } else {
            (start, start + span, step)
        };
        let source = format!(
            "Algoritmo P\n Definir i, c Como Entero;\n Para i <- {} Hasta {} Con Paso {} Hacer\n c <- c + 1;\n FinPara\nFinAlgoritmo",
            from, to, step
        );
        let execution = run_source(&source, &HashMap::new()).unwrap();
        let expected = f64::from(span / step.abs() + 1);
        prop_assert_eq!(&execution.variables["c"], &Value::Number(expected));
    }

    /// A declared one-dimensional array starts with `n` default elements.
    #[test]
    fn declared_array_has_declared_length(n in 1usize..60) {
        let source = format!("Algoritmo P\n Definir v[{}] Como Entero;\nFinAlgoritmo", n);
        let execution = run_source(&source, &HashMap::new()).unwrap();
        let Value::Array(items) = &execution.variables["v"] else {
            panic!("expected an array");
        };
        prop_assert_eq!(items.len(), n);
        prop_assert!(items.iter().all(|item| *item == Value::Number(0.0)));
    }

    /// Programs without `Leer` never ask for input.
    #[test]
    fn no_read_no_missing_input(values in prop::collection::vec(-1000i32..1000, 1..8)) {
        let lines: Vec<String> = values.iter().map(|v| format!(" x <- x + {};", v)).collect();
        let source = format!("Algoritmo P\n Definir x Como Entero;\n{}\n Escribir x;\nFinAlgoritmo", lines.join("\n"));
        let execution = run_source(&source, &HashMap::new()).unwrap();
        let total: i32 = values.iter().sum();
        prop_assert_eq!(execution.outputs, vec![total.to_string()]);
    }

    /// Consecutive `Sin Saltar` writes followed by a plain write form one line.
    #[test]
    fn sin_saltar_merges_into_one_line(parts in prop::collection::vec("[a-z]{1,6}", 1..6), last in "[a-z]{1,6}") {
        let mut lines: Vec<String> = parts.iter().map(|p| format!(" Escribir \"{}\" Sin Saltar;", p)).collect();
        lines.push(format!(" Escribir \"{}\";", last));
        let source = format!("Algoritmo P\n{}\nFinAlgoritmo", lines.join("\n"));
        let execution = run_source(&source, &HashMap::new()).unwrap();
        prop_assert_eq!(execution.outputs, vec![format!("{}{}", parts.concat(), last)]);
    }
}
