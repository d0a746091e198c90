//! # Subprogram Parsing
//!
//! `Funcion` and `SubProceso` definitions.
//!
//! ## Grammar
//!
//! ```text
//! funcion    = "Funcion" [identifier "<-"] identifier ["(" params ")"] block "FinFuncion"
//! subproceso = "SubProceso" identifier ["(" params ")"] block "FinSubProceso"
//! param      = ["Por Referencia"] identifier ["Por Referencia" | "Por Valor"]
//!            | identifier "[" ","* "]"
//! ```
//!
//! A `Funcion` without a return variable is stored as a procedure.

use std::collections::HashSet;

use super::declarations::ScopeBuilder;
use super::{Parser, Stop};
use crate::ast::{Parameter, Subprogram};
use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::{find_last_keyword, is_identifier, strip_keyword, LineScanner};

impl Parser {
    /// Parse the text after `Funcion` and the body that follows.
    pub(super) fn parse_function(&mut self, rest: &str, line: usize) -> Result<Subprogram, ParseError> {
        let scanner = LineScanner::new(rest);
        let (return_variable, signature) = match scanner.find_top_level("<-") {
            Some(arrow) => {
                let variable = scanner.slice(0, arrow).trim().to_string();
                if !is_identifier(&variable) {
                    return Err(ParseError::invalid_declaration(
                        format!("invalid return variable '{}'", variable),
                        line,
                    ));
                }
                (Some(variable), scanner.slice(arrow + 2, scanner.len()))
            }
            None => (None, rest.to_string()),
        };
        self.parse_subprogram(return_variable, &signature, Stop::EndFunction, "Funcion", line)
    }

    /// Parse the text after `SubProceso` and the body that follows.
    pub(super) fn parse_procedure(&mut self, rest: &str, line: usize) -> Result<Subprogram, ParseError> {
        if LineScanner::new(rest).find_top_level("<-").is_some() {
            return Err(ParseError::at(
                ParseErrorKind::Unsupported {
                    construct: "SubProceso with a return variable (use Funcion)".to_string(),
                },
                line,
            ));
        }
        self.parse_subprogram(None, rest, Stop::EndProcedure, "SubProceso", line)
    }

    fn parse_subprogram(
        &mut self,
        return_variable: Option<String>,
        signature: &str,
        end: Stop,
        construct: &str,
        line: usize,
    ) -> Result<Subprogram, ParseError> {
        let (name, parameters) = parse_signature(signature, line)?;
        if let Some(variable) = &return_variable {
            if parameters.iter().any(|p| &p.name == variable) {
                return Err(ParseError::duplicate("parameter", variable, line));
            }
        }

        let seeded = parameters
            .iter()
            .map(|p| p.name.clone())
            .chain(return_variable.iter().cloned());
        let outer = std::mem::replace(&mut self.scope, ScopeBuilder::with_parameters(seeded));
        let parsed = self.parse_block(&[end], construct, line);
        let local = std::mem::replace(&mut self.scope, outer);
        let (body, _) = parsed?;
        self.expect_line(construct, end, line)?;

        let (declarations, constants) = local.into_parts();
        Ok(Subprogram {
            name,
            return_variable,
            parameters,
            declarations,
            constants,
            body,
            line,
        })
    }
}

/// Split `name(params)` into the name and its parameters.
fn parse_signature(signature: &str, line: usize) -> Result<(String, Vec<Parameter>), ParseError> {
    let signature = signature.trim();
    let (name, inner) = match signature.find('(') {
        Some(open) if signature.ends_with(')') => (
            signature[..open].trim(),
            &signature[open + 1..signature.len() - 1],
        ),
        Some(_) => {
            return Err(ParseError::invalid_declaration(
                format!("unclosed parameter list in '{}'", signature),
                line,
            ))
        }
        None => (signature, ""),
    };
    if !is_identifier(name) {
        return Err(ParseError::invalid_declaration(
            format!("invalid subprogram name '{}'", name),
            line,
        ));
    }

    let mut parameters = Vec::new();
    let mut seen = HashSet::new();
    if !inner.trim().is_empty() {
        for piece in LineScanner::new(inner).split_top_level(',') {
            let parameter = parse_parameter(&piece, line)?;
            if !seen.insert(parameter.name.clone()) {
                return Err(ParseError::duplicate("parameter", &parameter.name, line));
            }
            parameters.push(parameter);
        }
    }
    Ok((name.to_string(), parameters))
}

/// Parse one parameter with its passing mode.
fn parse_parameter(piece: &str, line: usize) -> Result<Parameter, ParseError> {
    let mut text = piece.trim();
    let mut by_reference = false;

    if let Some(rest) = strip_keyword(text, "por referencia") {
        text = rest;
        by_reference = true;
    } else if let Some(rest) = strip_keyword(text, "por valor") {
        text = rest;
    }
    for (suffix, reference) in [("por referencia", true), ("por valor", false)] {
        if let Some((start, end)) = find_last_keyword(text, suffix) {
            if end == text.len() {
                text = text[..start].trim();
                by_reference = reference;
            }
        }
    }

    if let Some(open) = text.find('[') {
        let inner = text[open + 1..].strip_suffix(']').unwrap_or("?");
        if !inner.chars().all(|c| c == ',' || c.is_whitespace()) {
            return Err(ParseError::invalid_declaration(
                format!("array parameter '{}' takes no sizes", text),
                line,
            ));
        }
        let name = text[..open].trim();
        if !is_identifier(name) {
            return Err(ParseError::invalid_declaration(
                format!("invalid parameter '{}'", piece.trim()),
                line,
            ));
        }
        return Ok(Parameter {
            name: name.to_string(),
            by_reference: true,
            array_rank: Some(inner.matches(',').count() + 1),
        });
    }

    if !is_identifier(text) {
        return Err(ParseError::invalid_declaration(
            format!("invalid parameter '{}'", piece.trim()),
            line,
        ));
    }
    Ok(Parameter {
        name: text.to_string(),
        by_reference,
        array_rank: None,
    })
}

// =============================================================================
// TESTS
// =============================================================================
