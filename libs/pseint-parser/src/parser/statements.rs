//! # Statement Parsing
//!
//! Classifies one logical line by its leading keyword and builds the
//! matching [`Statement`]. Block statements hand off to
//! [`super::control_flow`].
//!
//! ## Grammar
//!
//! ```text
//! statement = definir | constante | leer | escribir | si | para
//!           | mientras | repetir | segun | assignment | call
//! leer       = "Leer" target ("," target)*
//! escribir   = ("Escribir" | "Imprimir" | "Mostrar") expr ("," expr)* ["Sin Saltar"]
//! assignment = target "<-" expression
//! call       = identifier "(" arguments? ")"
//! ```

use config::constants::{STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES};
use stacker::maybe_grow;

use super::declarations::{parse_constant, parse_definition};
use super::expressions::{parse_arguments, parse_expression, parse_target_ref};
use super::Parser;
use crate::ast::{Statement, StatementKind};
use crate::error::ParseError;
use crate::lexer::{find_last_keyword, is_identifier, strip_keyword, LineScanner};

/// Output statement keywords.
const WRITE_KEYWORDS: [&str; 3] = ["escribir", "imprimir", "mostrar"];

/// Suffixes that keep the output line open.
const NO_NEWLINE_SUFFIXES: [&str; 2] = ["sin saltar", "sin bajar"];

impl Parser {
    /// Parse the next line as a statement.
    ///
    /// ## Returns
    ///
    /// `None` for `Definir`/`Constante`, which are recorded in the current
    /// scope instead of the statement list.
    pub(super) fn parse_statement(&mut self) -> Result<Option<Statement>, ParseError> {
        maybe_grow(STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, || {
            self.parse_statement_inner()
        })
    }

    fn parse_statement_inner(&mut self) -> Result<Option<Statement>, ParseError> {
        let Some(line) = self.advance() else {
            return Ok(None);
        };
        let text = line.text.as_str();
        let number = line.number;

        if let Some(rest) = strip_keyword(text, "definir") {
            for declaration in parse_definition(rest, number)? {
                self.scope.declare(declaration)?;
            }
            return Ok(None);
        }
        if let Some(rest) = strip_keyword(text, "constante") {
            let constant = parse_constant(rest, number)?;
            self.scope.add_constant(constant)?;
            return Ok(None);
        }

        let kind = if let Some(rest) = strip_keyword(text, "leer") {
            parse_read(rest, number)?
        } else if let Some(rest) = WRITE_KEYWORDS.iter().find_map(|k| strip_keyword(text, k)) {
            parse_write(rest, number)?
        } else if let Some(rest) = strip_keyword(text, "si") {
            self.parse_if(rest, number, number)?
        } else if let Some(rest) = strip_keyword(text, "para") {
            self.parse_for(rest, number)?
        } else if let Some(rest) = strip_keyword(text, "mientras") {
            self.parse_while(rest, number)?
        } else if let Some(rest) = strip_keyword(text, "repetir") {
            self.parse_repeat(rest, number)?
        } else if let Some(rest) = strip_keyword(text, "segun") {
            self.parse_switch(rest, number)?
        } else if let Some(kind) = parse_assignment(text, number)? {
            kind
        } else if let Some(kind) = parse_call(text, number)? {
            kind
        } else {
            return Err(ParseError::unexpected_line(text, number));
        };

        Ok(Some(Statement::new(number, kind)))
    }
}

// =============================================================================
// SIMPLE STATEMENTS
// =============================================================================

fn parse_read(rest: &str, line: usize) -> Result<StatementKind, ParseError> {
    if rest.is_empty() {
        return Err(ParseError::invalid_expression("Leer", "missing variable to read", line));
    }
    let targets = LineScanner::new(rest)
        .split_top_level(',')
        .iter()
        .map(|piece| parse_target_ref(piece, line))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(StatementKind::Read { targets })
}

fn parse_write(rest: &str, line: usize) -> Result<StatementKind, ParseError> {
    let mut rest = rest;
    let mut no_newline = false;
    for suffix in NO_NEWLINE_SUFFIXES {
        if let Some((start, end)) = find_last_keyword(rest, suffix) {
            if end == rest.len() {
                rest = rest[..start].trim();
                no_newline = true;
                break;
            }
        }
    }
    Ok(StatementKind::Write {
        expressions: parse_arguments(rest, line)?,
        no_newline,
    })
}

/// `target <- expression`, when the line has a top-level arrow.
fn parse_assignment(text: &str, line: usize) -> Result<Option<StatementKind>, ParseError> {
    let scanner = LineScanner::new(text);
    let Some(arrow) = scanner.find_top_level("<-") else {
        return Ok(None);
    };
    let target = parse_target_ref(&scanner.slice(0, arrow), line)?;
    let value = parse_expression(&scanner.slice(arrow + 2, scanner.len()), line)?;
    Ok(Some(StatementKind::Assign { target, value }))
}

/// `name(args)` used as a statement.
fn parse_call(text: &str, line: usize) -> Result<Option<StatementKind>, ParseError> {
    let scanner = LineScanner::new(text);
    let Some(open) = scanner.chars().iter().position(|&c| c == '(') else {
        return Ok(None);
    };
    let name = scanner.slice(0, open).trim().to_string();
    if !is_identifier(&name) || scanner.matching_close(open) != Some(scanner.len() - 1) {
        return Ok(None);
    }
    let arguments = parse_arguments(&scanner.slice(open + 1, scanner.len() - 1), line)?;
    Ok(Some(StatementKind::Call { name, arguments }))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expression, TargetRef};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_read_several_targets() {
        let kind = parse_read("a, v[2]", 1).unwrap();
        assert_eq!(
            kind,
            StatementKind::Read {
                targets: vec![
                    TargetRef::Variable { name: "a".into() },
                    TargetRef::ArrayElement {
                        name: "v".into(),
                        indices: vec![Expression::number(2.0)],
                    },
                ],
            }
        );
        assert!(parse_read("", 1).is_err());
        assert!(parse_read("a + 1", 1).is_err());
    }

    #[test]
    fn test_write_sin_saltar() {
        let kind = parse_write("a, \" \", b Sin Saltar", 1).unwrap();
        match kind {
            StatementKind::Write {
                expressions,
                no_newline,
            } => {
                assert_eq!(expressions.len(), 3);
                assert!(no_newline);
            }
            other => panic!("expected write, got {:?}", other),
        }
    }

    #[test]
    fn test_write_sin_saltar_inside_string_is_text() {
        let kind = parse_write("\"sin saltar\"", 1).unwrap();
        assert_eq!(
            kind,
            StatementKind::Write {
                expressions: vec![Expression::string("sin saltar")],
                no_newline: false,
            }
        );
    }

    #[test]
    fn test_empty_write() {
        assert_eq!(
            parse_write("", 1).unwrap(),
            StatementKind::Write {
                expressions: vec![],
                no_newline: false,
            }
        );
    }

    #[test]
    fn test_assignment() {
        let kind = parse_assignment("m[i, 2] <- x * 2", 1).unwrap().unwrap();
        assert!(matches!(
            kind,
            StatementKind::Assign {
                target: TargetRef::ArrayElement { .. },
                ..
            }
        ));
        assert!(parse_assignment("Escribir 1", 1).unwrap().is_none());
        assert!(parse_assignment("x <-", 1).is_err());
    }

    #[test]
    fn test_call() {
        assert_eq!(
            parse_call("Saludar(\"Ana\", 3)", 1).unwrap(),
            Some(StatementKind::Call {
                name: "Saludar".into(),
                arguments: vec![Expression::string("Ana"), Expression::number(3.0)],
            })
        );
        assert!(parse_call("f(1) + 2", 1).unwrap().is_none());
    }
}
