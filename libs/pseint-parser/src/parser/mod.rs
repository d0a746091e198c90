//! # PSeInt Parser
//!
//! Line-oriented recursive descent parser. Each logical line is classified
//! by its leading keyword; nested blocks are parsed until one of a set of
//! stop lines (`FinSi`, `Sino`, `Hasta Que`, a case label...) is reached.
//! Produces a [`ProgramAst`].
//!
//! ## Example
//!
//! ```rust
//! use pseint_parser::parser::Parser;
//!
//! let source = "Algoritmo A\n  Escribir 1;\nFinAlgoritmo";
//! let program = Parser::new(source).parse().unwrap();
//! assert_eq!(program.name, "A");
//! assert_eq!(program.statements.len(), 1);
//! ```

mod control_flow;
mod declarations;
mod expressions;
mod operators;
mod statements;
mod subprograms;

pub use expressions::{parse_arguments, parse_expression, parse_target_ref};

use declarations::ScopeBuilder;

use crate::ast::{ProgramAst, Statement, Subprogram};
use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::{compact, is_identifier, normalize_lines, strip_keyword, LineScanner, SourceLine};

// =============================================================================
// STOP LINES
// =============================================================================

/// Lines that end a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Stop {
    EndAlgorithm,
    EndFunction,
    EndProcedure,
    EndIf,
    Else,
    ElseIf,
    EndFor,
    EndWhile,
    Until,
    EndSwitch,
    CaseLabel,
    DefaultCase,
}

impl Stop {
    /// Stops that only make sense inside their own construct.
    const TERMINATORS: [Stop; 11] = [
        Stop::EndAlgorithm,
        Stop::EndFunction,
        Stop::EndProcedure,
        Stop::EndIf,
        Stop::Else,
        Stop::ElseIf,
        Stop::EndFor,
        Stop::EndWhile,
        Stop::Until,
        Stop::EndSwitch,
        Stop::DefaultCase,
    ];

    /// True when `text` is this stop line.
    pub(crate) fn matches(self, text: &str) -> bool {
        match self {
            Stop::EndAlgorithm => matches!(compact(text).as_str(), "finalgoritmo" | "finproceso"),
            Stop::EndFunction => compact(text) == "finfuncion",
            Stop::EndProcedure => {
                matches!(compact(text).as_str(), "finsubproceso" | "finsubalgoritmo")
            }
            Stop::EndIf => compact(text) == "finsi",
            Stop::EndFor => compact(text) == "finpara",
            Stop::EndWhile => compact(text) == "finmientras",
            Stop::EndSwitch => compact(text) == "finsegun",
            Stop::Else => strip_keyword(text, "sino").is_some_and(|rest| strip_keyword(rest, "si").is_none()),
            Stop::ElseIf => strip_keyword(text, "sino si").is_some(),
            Stop::Until => {
                strip_keyword(text, "hasta que").is_some() || strip_keyword(text, "mientras que").is_some()
            }
            Stop::DefaultCase => strip_keyword(text, "de otro modo").is_some(),
            Stop::CaseLabel => {
                !Stop::DefaultCase.matches(text) && LineScanner::new(text).find_top_level(":").is_some()
            }
        }
    }

    /// Canonical spelling, used in error messages.
    pub(crate) fn spelling(self) -> &'static str {
        match self {
            Stop::EndAlgorithm => "FinAlgoritmo",
            Stop::EndFunction => "FinFuncion",
            Stop::EndProcedure => "FinSubProceso",
            Stop::EndIf => "FinSi",
            Stop::Else => "Sino",
            Stop::ElseIf => "Sino Si",
            Stop::EndFor => "FinPara",
            Stop::EndWhile => "FinMientras",
            Stop::Until => "Hasta Que",
            Stop::EndSwitch => "FinSegun",
            Stop::CaseLabel => "<valor>:",
            Stop::DefaultCase => "De Otro Modo",
        }
    }

    /// True when `text` closes or continues some block.
    fn is_terminator(text: &str) -> bool {
        Stop::TERMINATORS.iter().any(|stop| stop.matches(text))
    }
}

// =============================================================================
// PARSER
// =============================================================================

/// Line-oriented parser for one program.
///
/// A parser is single use: [`Parser::parse`] consumes it.
pub struct Parser {
    /// Logical lines still to parse.
    lines: Vec<SourceLine>,
    /// Index of the next line.
    current: usize,
    /// Names declared in the scope being parsed.
    scope: ScopeBuilder,
}

impl Parser {
    /// Create a parser over raw source text.
    pub fn new(source: &str) -> Self {
        Self {
            lines: normalize_lines(source),
            current: 0,
            scope: ScopeBuilder::default(),
        }
    }

    /// Parse the whole program.
    ///
    /// ## Errors
    ///
    /// The first problem found aborts the parse.
    pub fn parse(mut self) -> Result<ProgramAst, ParseError> {
        let header = self.advance().ok_or_else(|| {
            ParseError::new(
                ParseErrorKind::MissingHeader {
                    expected: "'Algoritmo <nombre>' as the first line".to_string(),
                },
                None,
            )
        })?;
        let name = strip_keyword(&header.text, "algoritmo")
            .or_else(|| strip_keyword(&header.text, "proceso"))
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                ParseError::at(
                    ParseErrorKind::MissingHeader {
                        expected: format!("'Algoritmo <nombre>' but found '{}'", header.text),
                    },
                    header.number,
                )
            })?
            .to_string();

        let (statements, _) = self.parse_block(&[Stop::EndAlgorithm], "Algoritmo", header.number)?;
        self.advance();
        let (declarations, constants) = std::mem::take(&mut self.scope).into_parts();

        let mut functions: Vec<Subprogram> = Vec::new();
        let mut procedures: Vec<Subprogram> = Vec::new();
        while let Some(line) = self.advance() {
            let subprogram = if let Some(rest) = strip_keyword(&line.text, "funcion") {
                self.parse_function(rest, line.number)?
            } else if let Some(rest) = strip_keyword(&line.text, "subproceso")
                .or_else(|| strip_keyword(&line.text, "subalgoritmo"))
            {
                self.parse_procedure(rest, line.number)?
            } else {
                return Err(Self::top_level_error(&line));
            };

            let taken = functions
                .iter()
                .chain(procedures.iter())
                .any(|existing| existing.name == subprogram.name);
            if taken {
                return Err(ParseError::duplicate("subprogram", &subprogram.name, subprogram.line));
            }
            if subprogram.return_variable.is_some() {
                functions.push(subprogram);
            } else {
                procedures.push(subprogram);
            }
        }

        tracing::debug!(
            program = %name,
            statements = statements.len(),
            functions = functions.len(),
            procedures = procedures.len(),
            "parsed program"
        );

        Ok(ProgramAst {
            name,
            declarations,
            constants,
            statements,
            functions,
            procedures,
        })
    }

    /// Error for a line after `FinAlgoritmo` that is not a subprogram.
    fn top_level_error(line: &SourceLine) -> ParseError {
        let kind = if Stop::is_terminator(&line.text) {
            ParseErrorKind::UnmatchedTerminator {
                text: line.text.clone(),
            }
        } else if looks_like_statement(&line.text) {
            ParseErrorKind::OutsideBlock {
                text: line.text.clone(),
            }
        } else {
            ParseErrorKind::UnexpectedLine {
                text: line.text.clone(),
            }
        };
        ParseError::at(kind, line.number)
    }

    // =========================================================================
    // LINE ACCESS
    // =========================================================================

    /// Next line without consuming it.
    fn peek(&self) -> Option<&SourceLine> {
        self.lines.get(self.current)
    }

    /// Consume the next line.
    fn advance(&mut self) -> Option<SourceLine> {
        let line = self.lines.get(self.current).cloned();
        if line.is_some() {
            self.current += 1;
        }
        line
    }

    /// Consume a line a block is known to end with.
    fn expect_line(&mut self, construct: &str, stop: Stop, opened_at: usize) -> Result<SourceLine, ParseError> {
        self.advance()
            .ok_or_else(|| missing_terminator(construct, stop, opened_at))
    }

    /// Queue the text following a block header as the next line.
    ///
    /// `Para ... Hacer x <- 1` carries its first statement inline.
    fn push_inline(&mut self, rest: &str, number: usize) {
        let rest = rest.trim();
        if !rest.is_empty() {
            self.lines.insert(self.current, SourceLine::new(number, rest));
        }
    }

    // =========================================================================
    // BLOCKS
    // =========================================================================

    /// Parse statements until one of `stops` is the next line.
    ///
    /// The stop line is left unconsumed and returned alongside the body.
    fn parse_block(
        &mut self,
        stops: &[Stop],
        construct: &str,
        opened_at: usize,
    ) -> Result<(Vec<Statement>, Stop), ParseError> {
        let mut body = Vec::new();
        loop {
            let Some(line) = self.peek() else {
                let expected = stops.first().copied().unwrap_or(Stop::EndAlgorithm);
                return Err(missing_terminator(construct, expected, opened_at));
            };
            if let Some(stop) = stops.iter().copied().find(|stop| stop.matches(&line.text)) {
                return Ok((body, stop));
            }
            if Stop::is_terminator(&line.text) {
                return Err(ParseError::at(
                    ParseErrorKind::UnmatchedTerminator {
                        text: line.text.clone(),
                    },
                    line.number,
                ));
            }
            if let Some(statement) = self.parse_statement()? {
                body.push(statement);
            }
        }
    }
}

fn missing_terminator(construct: &str, expected: Stop, opened_at: usize) -> ParseError {
    ParseError::at(
        ParseErrorKind::MissingTerminator {
            construct: construct.to_string(),
            expected: expected.spelling().to_string(),
        },
        opened_at,
    )
}

/// Heuristic for "this would be a statement if it were inside a block".
fn looks_like_statement(text: &str) -> bool {
    const KEYWORDS: [&str; 11] = [
        "definir",
        "constante",
        "leer",
        "escribir",
        "imprimir",
        "mostrar",
        "si",
        "para",
        "mientras",
        "repetir",
        "segun",
    ];
    let scanner = LineScanner::new(text);
    if scanner.find_top_level("<-").is_some() {
        return true;
    }
    if let Some(open) = text.find('(') {
        if is_identifier(text[..open].trim()) && text.trim_end().ends_with(')') {
            return true;
        }
    }
    KEYWORDS.iter().any(|keyword| strip_keyword(text, keyword).is_some())
}
