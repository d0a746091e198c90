//! # Expression Parsing
//!
//! Parses the text of a single line fragment into an [`Expression`].
//!
//! ## Order of productions
//!
//! 1. Wrapping parentheses are stripped
//! 2. String, number and boolean literals
//! 3. Unary `NO <expr>`
//! 4. Binary operators, weakest level first (see [`super::operators`])
//! 5. Unary minus
//! 6. Function call `name(args)`
//! 7. Identifier
//! 8. Array element `name[i, j]`
//!
//! ## Example
//!
//! ```rust
//! use pseint_parser::parse_expression;
//! use pseint_parser::ast::{BinaryOperator, Expression};
//!
//! let expr = parse_expression("1 + 2 * 3", 1).unwrap();
//! match expr {
//!     Expression::Binary { operator, .. } => assert_eq!(operator, BinaryOperator::Add),
//!     _ => panic!("expected binary"),
//! }
//! ```

use config::constants::{STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES};
use stacker::maybe_grow;

use super::operators::{find_last_operator, LEVELS};
use crate::ast::{Expression, TargetRef, UnaryOperator};
use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::{folded, is_identifier, strip_keyword, LineScanner};

// =============================================================================
// EXPRESSIONS
// =============================================================================

/// Parse expression text found on `line`.
///
/// ## Errors
///
/// Fails when the text is empty, unbalanced, has a binary operator with a
/// missing operand, or matches no production.
pub fn parse_expression(text: &str, line: usize) -> Result<Expression, ParseError> {
    maybe_grow(STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, || {
        parse_expression_inner(text, line)
    })
}

fn parse_expression_inner(text: &str, line: usize) -> Result<Expression, ParseError> {
    let original = text.trim();
    let text = strip_wrapping_parens(original);
    if text.is_empty() {
        return Err(ParseError::invalid_expression(original, "empty expression", line));
    }

    let scanner = LineScanner::new(text);
    if !scanner.is_balanced() {
        return Err(ParseError::invalid_expression(
            text,
            "unbalanced quotes, parentheses or brackets",
            line,
        ));
    }

    if let Some(literal) = parse_literal(text) {
        return Ok(literal);
    }

    if let Some(operand) = strip_keyword(text, "no") {
        if !operand.is_empty() {
            return Ok(Expression::unary(
                UnaryOperator::Not,
                parse_expression(operand, line)?,
            ));
        }
    }

    for level in LEVELS {
        if let Some(found) = find_last_operator(&scanner, level) {
            let left = scanner.slice(0, found.start);
            let right = scanner.slice(found.start + found.len, scanner.len());
            if left.trim().is_empty() || right.trim().is_empty() {
                return Err(ParseError::at(
                    ParseErrorKind::IncompleteBinary {
                        operator: found.operator.symbol().to_string(),
                        text: text.to_string(),
                    },
                    line,
                ));
            }
            return Ok(Expression::binary(
                found.operator,
                parse_expression(&left, line)?,
                parse_expression(&right, line)?,
            ));
        }
    }

    if let Some(operand) = text.strip_prefix('-') {
        return Ok(Expression::unary(
            UnaryOperator::Negate,
            parse_expression(operand, line)?,
        ));
    }
    if let Some(operand) = text.strip_prefix('+') {
        return parse_expression(operand, line);
    }

    if let Some((name, inner)) = split_postfix(&scanner, '(') {
        return Ok(Expression::FunctionCall {
            name,
            arguments: parse_arguments(&inner, line)?,
        });
    }

    if is_identifier(text) {
        return Ok(Expression::identifier(text));
    }

    if let Some((name, inner)) = split_postfix(&scanner, '[') {
        return Ok(Expression::ArrayElement {
            name,
            indices: parse_indices(&inner, text, line)?,
        });
    }

    Err(ParseError::invalid_expression(text, "unrecognized expression", line))
}

/// Parse a string, number or boolean literal.
fn parse_literal(text: &str) -> Option<Expression> {
    if is_string_literal(text) {
        return Some(Expression::string(&text[1..text.len() - 1]));
    }
    if is_number_literal(text) {
        return text.parse::<f64>().ok().map(Expression::number);
    }
    match folded(text).as_str() {
        "verdadero" => Some(Expression::boolean(true)),
        "falso" => Some(Expression::boolean(false)),
        _ => None,
    }
}

fn is_string_literal(text: &str) -> bool {
    text.len() >= 2
        && text.starts_with('"')
        && text.ends_with('"')
        && !text[1..text.len() - 1].contains('"')
}

/// Digits with at most one decimal point, starting with a digit.
fn is_number_literal(text: &str) -> bool {
    let mut dots = 0;
    text.chars().next().is_some_and(|c| c.is_ascii_digit())
        && text.chars().all(|c| {
            if c == '.' {
                dots += 1;
                dots == 1
            } else {
                c.is_ascii_digit()
            }
        })
        && !text.ends_with('.')
}

/// Remove parentheses that wrap the whole text, repeatedly.
fn strip_wrapping_parens(text: &str) -> &str {
    let mut text = text.trim();
    while text.starts_with('(') {
        let scanner = LineScanner::new(text);
        if scanner.matching_close(0) != Some(scanner.len() - 1) {
            break;
        }
        let inner_start = '('.len_utf8();
        let inner_end = text.len() - ')'.len_utf8();
        text = text[inner_start..inner_end].trim();
    }
    text
}

/// Split `name(inner)` or `name[inner]` where the group closes at the end.
fn split_postfix(scanner: &LineScanner, open: char) -> Option<(String, String)> {
    let chars = scanner.chars();
    let open_index = chars.iter().position(|&c| c == open)?;
    if scanner.matching_close(open_index)? != chars.len() - 1 {
        return None;
    }
    let name = scanner.slice(0, open_index).trim().to_string();
    if !is_identifier(&name) {
        return None;
    }
    Some((name, scanner.slice(open_index + 1, chars.len() - 1)))
}

// =============================================================================
// LISTS
// =============================================================================

/// Parse a comma-separated argument list; empty text yields no arguments.
pub fn parse_arguments(text: &str, line: usize) -> Result<Vec<Expression>, ParseError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    parse_expression_list(text, line)
}

/// Parse a non-empty comma-separated expression list.
pub fn parse_expression_list(text: &str, line: usize) -> Result<Vec<Expression>, ParseError> {
    LineScanner::new(text)
        .split_top_level(',')
        .iter()
        .map(|piece| {
            if piece.is_empty() {
                Err(ParseError::invalid_expression(text, "empty list element", line))
            } else {
                parse_expression(piece, line)
            }
        })
        .collect()
}

/// Parse the index list inside `[...]`.
fn parse_indices(inner: &str, whole: &str, line: usize) -> Result<Vec<Expression>, ParseError> {
    if inner.trim().is_empty() {
        return Err(ParseError::invalid_expression(whole, "missing array index", line));
    }
    parse_expression_list(inner, line)
}

// =============================================================================
// TARGETS
// =============================================================================

/// Parse an assignment or `Leer` target: `name` or `name[i, ...]`.
///
/// ## Example
///
/// ```rust
/// use pseint_parser::parse_target_ref;
/// use pseint_parser::ast::TargetRef;
///
/// let target = parse_target_ref("v[i + 1]", 1).unwrap();
/// assert!(matches!(target, TargetRef::ArrayElement { .. }));
/// assert!(parse_target_ref("a + b", 1).is_err());
/// ```
pub fn parse_target_ref(text: &str, line: usize) -> Result<TargetRef, ParseError> {
    let text = text.trim();
    if is_identifier(text) {
        return Ok(TargetRef::Variable {
            name: text.to_string(),
        });
    }
    let scanner = LineScanner::new(text);
    if scanner.is_balanced() {
        if let Some((name, inner)) = split_postfix(&scanner, '[') {
            return Ok(TargetRef::ArrayElement {
                name,
                indices: parse_indices(&inner, text, line)?,
            });
        }
    }
    Err(ParseError::invalid_expression(text, "invalid assignment target", line))
}

/// Parse the value list of a `Segun` case label: `1, 2, 3`.
pub fn parse_case_values(text: &str, line: usize) -> Result<Vec<Expression>, ParseError> {
    if text.trim().is_empty() {
        return Err(ParseError::invalid_expression(text, "empty case label", line));
    }
    parse_expression_list(text, line)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOperator, Literal};
    use pretty_assertions::assert_eq;

    fn num(n: f64) -> Expression {
        Expression::number(n)
    }

    fn id(name: &str) -> Expression {
        Expression::identifier(name)
    }

    #[test]
    fn test_literals() {
        assert_eq!(parse_expression("42", 1).unwrap(), num(42.0));
        assert_eq!(parse_expression("3.5", 1).unwrap(), num(3.5));
        assert_eq!(parse_expression("\"hola\"", 1).unwrap(), Expression::string("hola"));
        assert_eq!(parse_expression("VERDADERO", 1).unwrap(), Expression::boolean(true));
        assert_eq!(parse_expression("falso", 1).unwrap(), Expression::boolean(false));
    }

    #[test]
    fn test_precedence() {
        assert_eq!(
            parse_expression("1 + 2 * 3", 1).unwrap(),
            Expression::binary(
                BinaryOperator::Add,
                num(1.0),
                Expression::binary(BinaryOperator::Multiply, num(2.0), num(3.0)),
            )
        );
    }

    #[test]
    fn test_left_associativity() {
        assert_eq!(
            parse_expression("10 - 4 - 3", 1).unwrap(),
            Expression::binary(
                BinaryOperator::Subtract,
                Expression::binary(BinaryOperator::Subtract, num(10.0), num(4.0)),
                num(3.0),
            )
        );
    }

    #[test]
    fn test_parentheses_override() {
        assert_eq!(
            parse_expression("(1 + 2) * 3", 1).unwrap(),
            Expression::binary(
                BinaryOperator::Multiply,
                Expression::binary(BinaryOperator::Add, num(1.0), num(2.0)),
                num(3.0),
            )
        );
        assert_eq!(parse_expression("((x))", 1).unwrap(), id("x"));
    }

    #[test]
    fn test_string_with_operators_is_literal() {
        assert_eq!(
            parse_expression("\"a + b\" + c", 1).unwrap(),
            Expression::binary(BinaryOperator::Add, Expression::string("a + b"), id("c"))
        );
    }

    #[test]
    fn test_logical_levels() {
        let expr = parse_expression("a > 1 Y b < 2 O c", 1).unwrap();
        match expr {
            Expression::Binary { operator, left, .. } => {
                assert_eq!(operator, BinaryOperator::Or);
                assert!(matches!(*left, Expression::Binary { operator: BinaryOperator::And, .. }));
            }
            other => panic!("expected binary, got {:?}", other),
        }
    }

    #[test]
    fn test_not_binds_whole_rest() {
        assert_eq!(
            parse_expression("NO a Y b", 1).unwrap(),
            Expression::unary(
                UnaryOperator::Not,
                Expression::binary(BinaryOperator::And, id("a"), id("b")),
            )
        );
    }

    #[test]
    fn test_negation() {
        assert_eq!(
            parse_expression("-x * 2", 1).unwrap(),
            Expression::binary(
                BinaryOperator::Multiply,
                Expression::unary(UnaryOperator::Negate, id("x")),
                num(2.0),
            )
        );
    }

    #[test]
    fn test_function_call_and_array() {
        assert_eq!(
            parse_expression("Longitud(nombre)", 1).unwrap(),
            Expression::FunctionCall {
                name: "Longitud".into(),
                arguments: vec![id("nombre")],
            }
        );
        assert_eq!(
            parse_expression("m[i, j + 1]", 1).unwrap(),
            Expression::ArrayElement {
                name: "m".into(),
                indices: vec![
                    id("i"),
                    Expression::binary(BinaryOperator::Add, id("j"), num(1.0)),
                ],
            }
        );
    }

    #[test]
    fn test_empty_argument_list() {
        assert_eq!(
            parse_expression("azar()", 1).unwrap(),
            Expression::FunctionCall {
                name: "azar".into(),
                arguments: vec![],
            }
        );
    }

    #[test]
    fn test_incomplete_binary() {
        let err = parse_expression("1 +", 7).unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::IncompleteBinary { .. }));
        assert_eq!(err.line, Some(7));
        assert!(err.to_string().contains("incomplete binary expression"));
    }

    #[test]
    fn test_unrecognized() {
        let err = parse_expression("3x", 2).unwrap_err();
        assert!(err.to_string().contains("unrecognized expression"));
        assert!(parse_expression("(1 + 2", 2).is_err());
    }

    #[test]
    fn test_literal_variants() {
        match parse_expression("0.25", 1).unwrap() {
            Expression::Literal { value: Literal::Number(n) } => assert_eq!(n, 0.25),
            other => panic!("expected number, got {:?}", other),
        }
    }

    #[test]
    fn test_targets() {
        assert_eq!(
            parse_target_ref("total", 1).unwrap(),
            TargetRef::Variable { name: "total".into() }
        );
        assert!(parse_target_ref("f(x)", 1).is_err());
        assert!(parse_target_ref("v[]", 1).is_err());
    }

    #[test]
    fn test_case_values() {
        assert_eq!(
            parse_case_values("1, 2", 1).unwrap(),
            vec![num(1.0), num(2.0)]
        );
        assert!(parse_case_values("1,,2", 1).is_err());
    }
}
