//! Runs block statements: `Si`, `Para`, `Mientras`, `Repetir` and `Segun`.
//!
//! Every loop counts its own iterations against the configured ceiling.
//! `Para` evaluates its bounds and step once, before the first iteration.

use pseint_parser::ast::{Expression, Statement, SwitchCase};

use super::Interpreter;
use crate::error::RuntimeError;
use crate::value::{ensure_loop_limit, ensure_scalar, to_number, values_equal, Value};

impl<'a> Interpreter<'a> {
    pub(crate) fn execute_if(
        &mut self,
        condition: &Expression,
        then_branch: &[Statement],
        else_branch: &[Statement],
    ) -> Result<(), RuntimeError> {
        if self.evaluate_condition(condition)? {
            self.execute_block(then_branch)
        } else {
            self.execute_block(else_branch)
        }
    }

    /// `Para`: bounds and step are evaluated once, before the first pass.
    pub(crate) fn execute_for(
        &mut self,
        iterator: &str,
        start: &Expression,
        end: &Expression,
        step: &Expression,
        body: &[Statement],
    ) -> Result<(), RuntimeError> {
        let declaration = self.scopes.declaration(iterator)?;
        if declaration.is_array() || !declaration.var_type.is_numeric() {
            return Err(RuntimeError::type_mismatch(format!(
                "loop variable '{}' must be declared Entero or Real",
                iterator
            )));
        }

        let start = self.loop_bound(start, "the loop start")?;
        let end = self.loop_bound(end, "the loop end")?;
        let step = self.loop_bound(step, "the loop step")?;
        if step == 0.0 {
            return Err(RuntimeError::type_mismatch("loop step cannot be 0")
                .with_hint("Use a positive step to count up or a negative one to count down."));
        }

        let limit = self.limits.max_loop_iterations;
        let mut iterations = 0;
        let mut current = start;
        while (step > 0.0 && current <= end) || (step < 0.0 && current >= end) {
            iterations += 1;
            ensure_loop_limit(iterations, limit)?;
            self.scopes.assign(iterator, &Value::Number(current))?;
            self.execute_block(body)?;
            current += step;
        }
        Ok(())
    }

    fn loop_bound(&mut self, expression: &Expression, what: &str) -> Result<f64, RuntimeError> {
        let value = self.evaluate(expression)?;
        to_number(ensure_scalar(&value, what)?)
    }

    pub(crate) fn execute_while(&mut self, condition: &Expression, body: &[Statement]) -> Result<(), RuntimeError> {
        let limit = self.limits.max_loop_iterations;
        let mut iterations = 0;
        while self.evaluate_condition(condition)? {
            iterations += 1;
            ensure_loop_limit(iterations, limit)?;
            self.execute_block(body)?;
        }
        Ok(())
    }

    /// `Repetir ... Hasta Que`: the body runs at least once.
    pub(crate) fn execute_repeat(&mut self, body: &[Statement], condition: &Expression) -> Result<(), RuntimeError> {
        let limit = self.limits.max_loop_iterations;
        let mut iterations = 0;
        loop {
            iterations += 1;
            ensure_loop_limit(iterations, limit)?;
            self.execute_block(body)?;
            if self.evaluate_condition(condition)? {
                return Ok(());
            }
        }
    }

    /// `Segun`: first matching case wins, otherwise the default.
    pub(crate) fn execute_switch(
        &mut self,
        subject: &Expression,
        cases: &[SwitchCase],
        default: Option<&[Statement]>,
    ) -> Result<(), RuntimeError> {
        let subject = self.evaluate(subject)?;
        ensure_scalar(&subject, "the Segun expression")?;

        for case in cases {
            for value in &case.values {
                let candidate = self.evaluate(value)?;
                if values_equal(&subject, &candidate) {
                    return self.execute_block(&case.body);
                }
            }
        }
        match default {
            Some(body) => self.execute_block(body),
            None => Ok(()),
        }
    }
}
