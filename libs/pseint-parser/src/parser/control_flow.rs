//! # Control Flow Parsing
//!
//! Block statements: `Si`, `Para`, `Mientras`, `Repetir` and `Segun`.
//!
//! ## Grammar
//!
//! ```text
//! si       = "Si" expr "Entonces" block ("Sino Si" expr "Entonces" block)* ["Sino" block] "FinSi"
//! para     = "Para" id "<-" expr "Hasta" expr ["Con Paso" expr] "Hacer" block "FinPara"
//! mientras = "Mientras" expr "Hacer" block "FinMientras"
//! repetir  = "Repetir" block ("Hasta Que" | "Mientras Que") expr
//! segun    = "Segun" expr "Hacer" (values ":" block)* ["De Otro Modo" ":" block] "FinSegun"
//! ```
//!
//! Any header may carry its first body statement on the same line.

use super::expressions::{parse_case_values, parse_expression};
use super::{Parser, Stop};
use crate::ast::{Expression, Statement, StatementKind, SwitchCase, UnaryOperator};
use crate::error::ParseError;
use crate::lexer::{is_identifier, split_at_keyword, split_at_last_keyword, strip_keyword, LineScanner};

impl Parser {
    // =========================================================================
    // SI
    // =========================================================================

    /// Parse `Si <cond> Entonces` up to and including the shared `FinSi`.
    ///
    /// `Sino Si` chains become an `If` nested in the else branch; the whole
    /// chain is closed by a single `FinSi` attributed to `opened_at`.
    pub(super) fn parse_if(
        &mut self,
        rest: &str,
        line: usize,
        opened_at: usize,
    ) -> Result<StatementKind, ParseError> {
        let (condition_text, inline) = split_at_keyword(rest, "entonces").ok_or_else(|| {
            ParseError::invalid_expression(rest, "missing 'Entonces' after the condition", line)
        })?;
        let condition = parse_expression(condition_text, line)?;
        self.push_inline(inline, line);

        let (then_branch, stop) = self.parse_block(&[Stop::ElseIf, Stop::Else, Stop::EndIf], "Si", opened_at)?;
        let stop_line = self.expect_line("Si", Stop::EndIf, opened_at)?;

        let else_branch = match stop {
            Stop::ElseIf => {
                let rest = strip_keyword(&stop_line.text, "sino si").unwrap_or_default();
                let nested = self.parse_if(rest, stop_line.number, opened_at)?;
                vec![Statement::new(stop_line.number, nested)]
            }
            Stop::Else => {
                let inline = strip_keyword(&stop_line.text, "sino").unwrap_or_default();
                self.push_inline(inline, stop_line.number);
                let (body, _) = self.parse_block(&[Stop::EndIf], "Si", opened_at)?;
                self.expect_line("Si", Stop::EndIf, opened_at)?;
                body
            }
            _ => Vec::new(),
        };

        Ok(StatementKind::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    // =========================================================================
    // PARA
    // =========================================================================

    /// Parse `Para i <- a Hasta b [Con Paso s] Hacer ... FinPara`.
    pub(super) fn parse_for(&mut self, rest: &str, line: usize) -> Result<StatementKind, ParseError> {
        let (header, inline) = split_at_keyword(rest, "hacer")
            .ok_or_else(|| ParseError::invalid_expression(rest, "missing 'Hacer' in 'Para'", line))?;

        let (range, step) = match split_at_last_keyword(header, "con paso") {
            Some((range, step_text)) => (range, parse_expression(step_text, line)?),
            None => (header, Expression::number(1.0)),
        };
        let (assignment, end_text) = split_at_last_keyword(range, "hasta")
            .ok_or_else(|| ParseError::invalid_expression(range, "missing 'Hasta' in 'Para'", line))?;

        let scanner = LineScanner::new(assignment);
        let arrow = scanner
            .find_top_level("<-")
            .ok_or_else(|| ParseError::invalid_expression(assignment, "missing '<-' in 'Para'", line))?;
        let iterator = scanner.slice(0, arrow).trim().to_string();
        if !is_identifier(&iterator) {
            return Err(ParseError::invalid_expression(
                assignment,
                "loop variable must be a plain identifier",
                line,
            ));
        }
        let start = parse_expression(&scanner.slice(arrow + 2, scanner.len()), line)?;
        let end = parse_expression(end_text, line)?;

        self.push_inline(inline, line);
        let (body, _) = self.parse_block(&[Stop::EndFor], "Para", line)?;
        self.expect_line("Para", Stop::EndFor, line)?;

        Ok(StatementKind::For {
            iterator,
            start,
            end,
            step,
            body,
        })
    }

    // =========================================================================
    // MIENTRAS / REPETIR
    // =========================================================================

    /// Parse `Mientras <cond> Hacer ... FinMientras`.
    pub(super) fn parse_while(&mut self, rest: &str, line: usize) -> Result<StatementKind, ParseError> {
        let (condition_text, inline) = split_at_keyword(rest, "hacer")
            .ok_or_else(|| ParseError::invalid_expression(rest, "missing 'Hacer' in 'Mientras'", line))?;
        let condition = parse_expression(condition_text, line)?;

        self.push_inline(inline, line);
        let (body, _) = self.parse_block(&[Stop::EndWhile], "Mientras", line)?;
        self.expect_line("Mientras", Stop::EndWhile, line)?;

        Ok(StatementKind::While { condition, body })
    }

    /// Parse `Repetir ... Hasta Que <cond>`.
    ///
    /// `Mientras Que <cond>` is stored as `Hasta Que NO (<cond>)`.
    pub(super) fn parse_repeat(&mut self, rest: &str, line: usize) -> Result<StatementKind, ParseError> {
        self.push_inline(rest, line);
        let (body, _) = self.parse_block(&[Stop::Until], "Repetir", line)?;
        let until = self.expect_line("Repetir", Stop::Until, line)?;

        let condition = if let Some(text) = strip_keyword(&until.text, "hasta que") {
            parse_expression(text, until.number)?
        } else {
            let text = strip_keyword(&until.text, "mientras que").unwrap_or_default();
            Expression::unary(UnaryOperator::Not, parse_expression(text, until.number)?)
        };

        Ok(StatementKind::RepeatUntil { body, condition })
    }

    // =========================================================================
    // SEGUN
    // =========================================================================

    /// Parse `Segun <expr> Hacer` with its case labels up to `FinSegun`.
    pub(super) fn parse_switch(&mut self, rest: &str, line: usize) -> Result<StatementKind, ParseError> {
        let (subject_text, inline) = split_at_keyword(rest, "hacer")
            .ok_or_else(|| ParseError::invalid_expression(rest, "missing 'Hacer' in 'Segun'", line))?;
        let subject = parse_expression(subject_text, line)?;
        self.push_inline(inline, line);

        let mut cases = Vec::new();
        let mut default = None;
        loop {
            let label = self.expect_line("Segun", Stop::EndSwitch, line)?;
            if Stop::EndSwitch.matches(&label.text) {
                break;
            }

            if let Some(after) = strip_keyword(&label.text, "de otro modo") {
                let inline = after.strip_prefix(':').unwrap_or(after);
                self.push_inline(inline, label.number);
                let (body, _) = self.parse_block(&[Stop::EndSwitch], "Segun", line)?;
                self.expect_line("Segun", Stop::EndSwitch, line)?;
                default = Some(body);
                break;
            }

            if !Stop::CaseLabel.matches(&label.text) {
                return Err(ParseError::unexpected_line(&label.text, label.number));
            }
            let scanner = LineScanner::new(&label.text);
            let colon = scanner.find_top_level(":").unwrap_or(scanner.len());
            let label_text = scanner.slice(0, colon);
            let values_text = strip_keyword(&label_text, "caso").unwrap_or(&label_text);
            let values = parse_case_values(values_text, label.number)?;

            self.push_inline(&scanner.slice(colon + 1, scanner.len()), label.number);
            let (body, _) = self.parse_block(
                &[Stop::CaseLabel, Stop::DefaultCase, Stop::EndSwitch],
                "Segun",
                line,
            )?;
            cases.push(SwitchCase {
                values,
                body,
                line: label.number,
            });
        }

        Ok(StatementKind::Switch {
            subject,
            cases,
            default,
        })
    }
}
