//! # Declaration Parsing
//!
//! `Definir` and `Constante` lines, plus the per-scope name table that
//! rejects duplicates while a program or subprogram body is parsed.
//!
//! ## Grammar
//!
//! ```text
//! definir   = "Definir" name ("," name)* "Como" type
//! name      = identifier | identifier "[" integer ("," integer)* "]"
//! constante = "Constante" identifier "<-" expression
//! ```

use std::collections::HashSet;

use super::expressions::parse_expression;
use crate::ast::{Constant, Declaration, VarType};
use crate::error::ParseError;
use crate::lexer::{compact, is_identifier, split_at_last_keyword, LineScanner};

// =============================================================================
// SCOPE BUILDER
// =============================================================================

/// Names declared so far in the scope being parsed.
///
/// Parameters are registered up front. A parameter may be typed by one
/// `Definir` inside the body; any other repeated name is a duplicate.
#[derive(Debug, Default)]
pub(super) struct ScopeBuilder {
    declarations: Vec<Declaration>,
    constants: Vec<Constant>,
    parameters: HashSet<String>,
    typed_parameters: HashSet<String>,
}

impl ScopeBuilder {
    /// Scope seeded with parameter (and return variable) names.
    pub(super) fn with_parameters<I>(names: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            parameters: names.into_iter().collect(),
            ..Self::default()
        }
    }

    fn is_declared(&self, name: &str) -> bool {
        self.declarations.iter().any(|d| d.name == name)
    }

    fn is_constant(&self, name: &str) -> bool {
        self.constants.iter().any(|c| c.name == name)
    }

    /// Record a declaration.
    pub(super) fn declare(&mut self, declaration: Declaration) -> Result<(), ParseError> {
        let name = declaration.name.as_str();
        let line = declaration.line;
        if self.is_constant(name) {
            return Err(ParseError::duplicate("constant", name, line));
        }
        if self.parameters.contains(name) {
            if !self.typed_parameters.insert(name.to_string()) {
                return Err(ParseError::duplicate("declaration", name, line));
            }
        } else if self.is_declared(name) {
            return Err(ParseError::duplicate("declaration", name, line));
        }
        self.declarations.push(declaration);
        Ok(())
    }

    /// Record a constant.
    pub(super) fn add_constant(&mut self, constant: Constant) -> Result<(), ParseError> {
        let name = constant.name.as_str();
        if self.is_constant(name) {
            return Err(ParseError::duplicate("constant", name, constant.line));
        }
        if self.is_declared(name) || self.parameters.contains(name) {
            return Err(ParseError::duplicate("name", name, constant.line));
        }
        self.constants.push(constant);
        Ok(())
    }

    /// Declarations and constants in source order.
    pub(super) fn into_parts(self) -> (Vec<Declaration>, Vec<Constant>) {
        (self.declarations, self.constants)
    }
}

// =============================================================================
// DEFINIR
// =============================================================================

/// Parse the text after `Definir`.
///
/// ## Example
///
/// ```text
/// Definir a, b Como Entero      → two scalars
/// Definir m[3, 4] Como Real      → one 3x4 array
/// ```
pub(super) fn parse_definition(rest: &str, line: usize) -> Result<Vec<Declaration>, ParseError> {
    let (names, type_text) = split_at_last_keyword(rest, "como")
        .ok_or_else(|| ParseError::invalid_declaration("missing 'Como <Tipo>'", line))?;
    let var_type = parse_var_type(type_text, line)?;
    if names.is_empty() {
        return Err(ParseError::invalid_declaration("missing variable name", line));
    }

    LineScanner::new(names)
        .split_top_level(',')
        .iter()
        .map(|piece| parse_declared_name(piece, var_type, line))
        .collect()
}

/// Parse a type name, accepting the `Numero` and `Texto` aliases.
pub(super) fn parse_var_type(text: &str, line: usize) -> Result<VarType, ParseError> {
    match compact(text).as_str() {
        "entero" => Ok(VarType::Entero),
        "real" | "numero" | "numerico" => Ok(VarType::Real),
        "cadena" | "texto" => Ok(VarType::Cadena),
        "logico" => Ok(VarType::Logico),
        "caracter" => Ok(VarType::Caracter),
        _ => Err(ParseError::invalid_declaration(
            format!("unknown type '{}'", text.trim()),
            line,
        )),
    }
}

fn parse_declared_name(piece: &str, var_type: VarType, line: usize) -> Result<Declaration, ParseError> {
    if is_identifier(piece) {
        return Ok(Declaration::scalar(piece, var_type, line));
    }

    let open = piece
        .find('[')
        .filter(|_| piece.ends_with(']'))
        .ok_or_else(|| ParseError::invalid_declaration(format!("invalid name '{}'", piece), line))?;
    let name = piece[..open].trim();
    if !is_identifier(name) {
        return Err(ParseError::invalid_declaration(format!("invalid name '{}'", name), line));
    }

    let inner = &piece[open + 1..piece.len() - 1];
    let dimensions = inner
        .split(',')
        .map(|dim| parse_dimension(dim.trim(), name, line))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Declaration::array(name, var_type, dimensions, line))
}

/// Array dimensions must be positive integer literals.
fn parse_dimension(text: &str, name: &str, line: usize) -> Result<usize, ParseError> {
    match text.parse::<usize>() {
        Ok(size) if size > 0 && text.chars().all(|c| c.is_ascii_digit()) => Ok(size),
        _ => Err(ParseError::invalid_declaration(
            format!("dimension '{}' of '{}' must be a positive integer", text, name),
            line,
        )),
    }
}

// =============================================================================
// CONSTANTE
// =============================================================================

/// Parse the text after `Constante`.
pub(super) fn parse_constant(rest: &str, line: usize) -> Result<Constant, ParseError> {
    let scanner = LineScanner::new(rest);
    let arrow = scanner
        .find_top_level("<-")
        .ok_or_else(|| ParseError::invalid_declaration("constant needs '<-'", line))?;
    let name = scanner.slice(0, arrow).trim().to_string();
    if !is_identifier(&name) {
        return Err(ParseError::invalid_declaration(
            format!("invalid constant name '{}'", name),
            line,
        ));
    }
    let expression = parse_expression(&scanner.slice(arrow + 2, scanner.len()), line)?;
    Ok(Constant {
        name,
        expression,
        line,
    })
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Expression;
    use crate::error::ParseErrorKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scalar_list() {
        let decls = parse_definition("a, b Como Entero", 3).unwrap();
        assert_eq!(
            decls,
            vec![
                Declaration::scalar("a", VarType::Entero, 3),
                Declaration::scalar("b", VarType::Entero, 3),
            ]
        );
    }

    #[test]
    fn test_array_dimensions() {
        let decls = parse_definition("m[3, 4], v[10] Como Real", 1).unwrap();
        assert_eq!(decls[0], Declaration::array("m", VarType::Real, vec![3, 4], 1));
        assert_eq!(decls[1].rank(), 1);
    }

    #[test]
    fn test_type_aliases_and_accents() {
        assert_eq!(parse_var_type("Número", 1).unwrap(), VarType::Real);
        assert_eq!(parse_var_type("Texto", 1).unwrap(), VarType::Cadena);
        assert_eq!(parse_var_type("LÓGICO", 1).unwrap(), VarType::Logico);
        assert_eq!(parse_var_type("Carácter", 1).unwrap(), VarType::Caracter);
        assert!(parse_var_type("Entera", 1).is_err());
    }

    #[test]
    fn test_bad_dimensions() {
        for text in ["v[0] Como Entero", "v[2.5] Como Entero", "v[n] Como Entero", "v[-1] Como Entero"] {
            let err = parse_definition(text, 9).unwrap_err();
            assert!(
                matches!(err.kind, ParseErrorKind::InvalidDeclaration { .. }),
                "{}",
                text
            );
            assert_eq!(err.line, Some(9));
        }
    }

    #[test]
    fn test_missing_como() {
        assert!(parse_definition("x Entero", 1).is_err());
        assert!(parse_definition("Como Entero", 1).is_err());
    }

    #[test]
    fn test_constant() {
        let constant = parse_constant("PI <- 2.5", 2).unwrap();
        assert_eq!(constant.name, "PI");
        assert_eq!(constant.expression, Expression::number(2.5));
        assert!(parse_constant("PI = 3", 2).is_err());
    }

    #[test]
    fn test_scope_duplicates() {
        let mut scope = ScopeBuilder::default();
        scope.declare(Declaration::scalar("x", VarType::Entero, 1)).unwrap();
        let err = scope
            .declare(Declaration::scalar("x", VarType::Real, 2))
            .unwrap_err();
        assert!(err.to_string().contains("duplicate declaration 'x'"));

        let constant = parse_constant("x <- 1", 3).unwrap();
        assert!(scope.add_constant(constant).is_err());
    }

    #[test]
    fn test_parameter_typed_once() {
        let mut scope = ScopeBuilder::with_parameters(vec!["n".to_string()]);
        scope.declare(Declaration::scalar("n", VarType::Entero, 2)).unwrap();
        assert!(scope.declare(Declaration::scalar("n", VarType::Entero, 3)).is_err());
        assert!(scope.add_constant(parse_constant("n <- 1", 4).unwrap()).is_err());
        let (declarations, constants) = scope.into_parts();
        assert_eq!(declarations.len(), 1);
        assert!(constants.is_empty());
    }

    #[test]
    fn test_definir_of_constant_is_duplicate() {
        let mut scope = ScopeBuilder::default();
        scope.add_constant(parse_constant("MAX <- 10", 1).unwrap()).unwrap();
        let err = scope
            .declare(Declaration::scalar("MAX", VarType::Entero, 2))
            .unwrap_err();
        assert!(err.to_string().contains("duplicate constant 'MAX'"));
    }
}
