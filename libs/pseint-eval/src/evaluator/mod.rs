//! # Interpreter
//!
//! Tree-walking execution of a [`ProgramAst`].
//!
//! ## Module Structure
//!
//! - `mod.rs` - interpreter state, program entry and statement dispatch
//! - `expressions` - expression evaluation
//! - `control_flow` - `Si`, `Para`, `Mientras`, `Repetir`, `Segun`
//! - `calls` - subprogram call engine with by-reference write-back
//! - `builtins` - `Subcadena`, `Longitud`, `Mayusculas`, `Minusculas`, `Concatenar`
//! - `trace` - output buffer and trace snapshots
//!
//! ## Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use pseint_eval::evaluator::Interpreter;
//! use config::constants::ExecutionLimits;
//!
//! let program = pseint_parser::parse_program("Algoritmo A\n Escribir 1 + 1;\nFinAlgoritmo").unwrap();
//! let inputs = HashMap::new();
//! let execution = Interpreter::new(&program, &inputs, ExecutionLimits::default()).run().unwrap();
//! assert_eq!(execution.outputs, vec!["2".to_string()]);
//! ```

mod builtins;
mod calls;
mod control_flow;
mod expressions;
mod trace;

pub use trace::TraceSnapshot;

use std::collections::{BTreeMap, HashMap};

use config::constants::{ExecutionLimits, STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES};
use pseint_parser::ast::{ProgramAst, Statement, StatementKind, TargetRef};
use serde::{Deserialize, Serialize};
use stacker::maybe_grow;

use self::trace::{ExecutionMetrics, OutputBuffer};
use crate::error::RuntimeError;
use crate::scope::ScopeChain;
use crate::value::{ensure_scalar, to_array_index, Value};

// =============================================================================
// RESULT
// =============================================================================

/// Everything a completed run produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeExecution {
    /// One entry per completed output line.
    pub outputs: Vec<String>,
    /// Final global variables.
    pub variables: BTreeMap<String, Value>,
    pub steps_executed: usize,
    pub trace: Vec<TraceSnapshot>,
    /// Set once the trace buffer hit its cap.
    pub trace_truncated: bool,
}

// =============================================================================
// INTERPRETER
// =============================================================================

/// State of one program run.
///
/// Every run starts from a fresh interpreter; nothing is shared between
/// runs.
pub struct Interpreter<'a> {
    program: &'a ProgramAst,
    inputs: &'a HashMap<String, String>,
    scopes: ScopeChain,
    output: OutputBuffer,
    metrics: ExecutionMetrics,
    limits: ExecutionLimits,
    call_depth: usize,
}

impl<'a> Interpreter<'a> {
    /// Prepare a run of `program` with `inputs` keyed by read target.
    pub fn new(
        program: &'a ProgramAst,
        inputs: &'a HashMap<String, String>,
        limits: ExecutionLimits,
    ) -> Self {
        Self {
            program,
            inputs,
            scopes: ScopeChain::new(),
            output: OutputBuffer::default(),
            metrics: ExecutionMetrics::new(limits.max_trace_snapshots),
            limits,
            call_depth: 0,
        }
    }

    /// Execute the program to completion.
    ///
    /// ## Errors
    ///
    /// The first runtime error aborts the run; no partial result is kept.
    pub fn run(mut self) -> Result<RuntimeExecution, RuntimeError> {
        let program = self.program;
        tracing::debug!(program = %program.name, "starting program");

        for declaration in &program.declarations {
            let line = declaration.line;
            self.scopes
                .declare(declaration.clone())
                .map_err(|e| e.at_line(line))?;
        }
        for constant in &program.constants {
            self.define_constant(&constant.name, &constant.expression)
                .map_err(|e| e.at_line(constant.line))?;
        }

        self.snapshot("start", None);
        self.execute_block(&program.statements)?;
        self.output.flush();
        self.snapshot("finish", None);

        tracing::debug!(
            program = %program.name,
            steps = self.metrics.steps,
            snapshots = self.metrics.trace.len(),
            "program finished"
        );

        Ok(RuntimeExecution {
            variables: self.scopes.global_variables(),
            outputs: self.output.into_lines(),
            steps_executed: self.metrics.steps,
            trace: self.metrics.trace,
            trace_truncated: self.metrics.truncated,
        })
    }

    /// Evaluate a constant's expression and bind it in the current frame.
    fn define_constant(
        &mut self,
        name: &str,
        expression: &pseint_parser::ast::Expression,
    ) -> Result<(), RuntimeError> {
        let value = self.evaluate(expression)?;
        ensure_scalar(&value, "a constant")?;
        self.scopes.define_constant(name, value)
    }

    /// Record a trace snapshot unless the buffer is full.
    fn snapshot(&mut self, marker: &str, line: Option<usize>) {
        if !self.metrics.has_room() {
            return;
        }
        let snapshot = TraceSnapshot {
            step: self.metrics.steps,
            marker: marker.to_string(),
            line,
            variables: self.scopes.global_variables(),
            outputs: self.output.visible(),
        };
        self.metrics.record(snapshot);
    }

    // =========================================================================
    // STATEMENTS
    // =========================================================================

    /// Execute statements in order.
    pub(crate) fn execute_block(&mut self, statements: &[Statement]) -> Result<(), RuntimeError> {
        for statement in statements {
            self.execute_statement(statement)?;
        }
        Ok(())
    }

    fn execute_statement(&mut self, statement: &Statement) -> Result<(), RuntimeError> {
        maybe_grow(STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, || {
            self.execute_statement_inner(statement)
        })
        .map_err(|e| e.at_line(statement.line))
    }

    fn execute_statement_inner(&mut self, statement: &Statement) -> Result<(), RuntimeError> {
        self.metrics.steps += 1;

        match &statement.kind {
            StatementKind::Read { targets } => {
                for target in targets {
                    self.execute_read(target)?;
                }
            }
            StatementKind::Write {
                expressions,
                no_newline,
            } => {
                let mut text = String::new();
                for expression in expressions {
                    text.push_str(&self.evaluate(expression)?.stringify());
                }
                self.output.write(&text, *no_newline);
            }
            StatementKind::Assign { target, value } => {
                let value = self.evaluate(value)?;
                ensure_scalar(&value, "the assigned value")?;
                self.assign_target(target, &value)?;
            }
            StatementKind::Call { name, arguments } => self.execute_call(name, arguments)?,
            StatementKind::If {
                condition,
                then_branch,
                else_branch,
            } => self.execute_if(condition, then_branch, else_branch)?,
            StatementKind::For {
                iterator,
                start,
                end,
                step,
                body,
            } => self.execute_for(iterator, start, end, step, body)?,
            StatementKind::While { condition, body } => self.execute_while(condition, body)?,
            StatementKind::RepeatUntil { body, condition } => self.execute_repeat(body, condition)?,
            StatementKind::Switch {
                subject,
                cases,
                default,
            } => self.execute_switch(subject, cases, default.as_deref())?,
        }

        self.snapshot(statement.kind.marker(), Some(statement.line));
        Ok(())
    }

    /// `Leer`: look the target up in the inputs, coerce and store.
    fn execute_read(&mut self, target: &TargetRef) -> Result<(), RuntimeError> {
        let (key, indices) = match target {
            TargetRef::Variable { name } => (name.clone(), Vec::new()),
            TargetRef::ArrayElement { name, indices } => {
                let indices = self.evaluate_indices(indices)?;
                let written: Vec<String> = indices.iter().map(|i| (i + 1).to_string()).collect();
                (format!("{}[{}]", name, written.join(",")), indices)
            }
        };
        let raw = self
            .inputs
            .get(&key)
            .ok_or_else(|| RuntimeError::missing_input(&key))?;
        let value = Value::String(raw.clone());
        match target {
            TargetRef::Variable { name } => self.scopes.assign(name, &value),
            TargetRef::ArrayElement { name, .. } => self.scopes.set_element(name, &indices, &value),
        }
    }

    /// Store a scalar into a variable or array element.
    pub(crate) fn assign_target(&mut self, target: &TargetRef, value: &Value) -> Result<(), RuntimeError> {
        match target {
            TargetRef::Variable { name } => self.scopes.assign(name, value),
            TargetRef::ArrayElement { name, indices } => {
                let indices = self.evaluate_indices(indices)?;
                self.scopes.set_element(name, &indices, value)
            }
        }
    }

    /// Evaluate 1-based index expressions into 0-based indices.
    pub(crate) fn evaluate_indices(
        &mut self,
        indices: &[pseint_parser::ast::Expression],
    ) -> Result<Vec<usize>, RuntimeError> {
        indices
            .iter()
            .map(|index| {
                let value = self.evaluate(index)?;
                to_array_index(ensure_scalar(&value, "an array index")?)
            })
            .collect()
    }
}
