//! Subprogram call engine.
//!
//! Arguments are bound in the caller's scope before the callee frame is
//! pushed. By-reference parameters copy the caller's value in and write the
//! final local value back once the body returns.

use pseint_parser::ast::{Declaration, Expression, Parameter, Subprogram, TargetRef, VarType};

use super::builtins::Builtin;
use super::Interpreter;
use crate::error::RuntimeError;
use crate::scope::shape_matches;
use crate::value::{coerce_deep, coerce_to_type, ensure_scalar, infer_type, Value};

/// Where a by-reference parameter writes back to.
#[derive(Debug, Clone)]
enum WriteBack {
    Variable(String),
    /// 0-based indices, resolved before the call.
    Element(String, Vec<usize>),
}

/// A parameter ready to be bound in the callee frame.
#[derive(Debug)]
struct BoundParameter {
    declaration: Declaration,
    value: Value,
    write_back: Option<WriteBack>,
}

impl<'a> Interpreter<'a> {
    /// A call used as a statement. A function's value is discarded.
    pub(crate) fn execute_call(&mut self, name: &str, arguments: &[Expression]) -> Result<(), RuntimeError> {
        let program = self.program;
        match program.procedure(name).or_else(|| program.function(name)) {
            Some(subprogram) => {
                self.call_subprogram(subprogram, arguments)?;
                Ok(())
            }
            None => Err(RuntimeError::unsupported_subprogram(name)),
        }
    }

    /// A call inside an expression: built-ins first, then user functions.
    pub(crate) fn evaluate_call(&mut self, name: &str, arguments: &[Expression]) -> Result<Value, RuntimeError> {
        if let Some(builtin) = Builtin::lookup(name) {
            let mut values = Vec::with_capacity(arguments.len());
            for argument in arguments {
                let value = self.evaluate(argument)?;
                ensure_scalar(&value, "a function argument")?;
                values.push(value);
            }
            return builtin.apply(&values);
        }

        let program = self.program;
        if let Some(function) = program.function(name) {
            return self
                .call_subprogram(function, arguments)?
                .ok_or_else(|| RuntimeError::procedure_as_expression(name));
        }
        if program.procedure(name).is_some() {
            return Err(RuntimeError::procedure_as_expression(name));
        }
        Err(RuntimeError::unsupported_function(name))
    }

    /// Run a user subprogram, returning the function's value if it has one.
    fn call_subprogram(
        &mut self,
        subprogram: &'a Subprogram,
        arguments: &[Expression],
    ) -> Result<Option<Value>, RuntimeError> {
        if arguments.len() != subprogram.parameters.len() {
            return Err(RuntimeError::argument_count(
                &subprogram.name,
                subprogram.parameters.len(),
                arguments.len(),
            ));
        }
        if self.call_depth >= self.limits.max_call_depth {
            return Err(RuntimeError::call_depth(self.limits.max_call_depth));
        }

        let mut bound = Vec::with_capacity(arguments.len());
        for (parameter, argument) in subprogram.parameters.iter().zip(arguments) {
            bound.push(self.bind_argument(subprogram, parameter, argument)?);
        }

        tracing::trace!(subprogram = %subprogram.name, depth = self.call_depth + 1, "entering subprogram");
        self.scopes.push_frame();
        self.call_depth += 1;
        let result = self.run_body(subprogram, bound);
        self.call_depth -= 1;
        self.scopes.pop_frame();

        let (write_backs, returned) = result?;
        for (target, value) in write_backs {
            match target {
                WriteBack::Variable(name) => self.scopes.assign(&name, &value)?,
                WriteBack::Element(name, indices) => self.scopes.set_element(&name, &indices, &value)?,
            }
        }
        Ok(returned)
    }

    /// Resolve one argument against its parameter, in the caller's scope.
    fn bind_argument(
        &mut self,
        subprogram: &Subprogram,
        parameter: &Parameter,
        argument: &Expression,
    ) -> Result<BoundParameter, RuntimeError> {
        let (inferred, value, write_back) = if parameter.by_reference || parameter.is_array() {
            let target = argument
                .as_target()
                .ok_or_else(|| RuntimeError::by_reference_argument(&subprogram.name, &parameter.name))?;
            if self.scopes.is_constant(target.name()) {
                return Err(RuntimeError::by_reference_argument(&subprogram.name, &parameter.name));
            }
            match target {
                TargetRef::Variable { name } => {
                    let caller = self.scopes.declaration(&name)?.clone();
                    let value = self.scopes.get(&name)?.clone();
                    check_rank(subprogram, parameter, &name, caller.rank())?;
                    let declaration = Declaration {
                        name: parameter.name.clone(),
                        ..caller
                    };
                    (declaration, value, Some(WriteBack::Variable(name)))
                }
                TargetRef::ArrayElement { name, indices } => {
                    check_rank(subprogram, parameter, &name, 0)?;
                    let indices = self.evaluate_indices(&indices)?;
                    let value = self.scopes.get_element(&name, &indices)?;
                    let var_type = self.scopes.declaration(&name)?.var_type;
                    let declaration = Declaration::scalar(parameter.name.clone(), var_type, subprogram.line);
                    (declaration, value, Some(WriteBack::Element(name, indices)))
                }
            }
        } else {
            let value = self.evaluate(argument)?;
            ensure_scalar(&value, "a by-value argument")?;
            let declaration = Declaration::scalar(parameter.name.clone(), infer_type(&value), subprogram.line);
            (declaration, value, None)
        };

        // A local `Definir` for the parameter fixes its type; arrays keep
        // the caller's dimensions.
        let declaration = match subprogram.declaration(&parameter.name) {
            Some(local) if parameter.is_array() => Declaration {
                var_type: local.var_type,
                line: local.line,
                ..inferred
            },
            Some(local) => local.clone(),
            None => inferred,
        };
        let value = fit_value(&declaration, &value)?;

        Ok(BoundParameter {
            declaration,
            value,
            write_back,
        })
    }

    /// Bind parameters and locals in the fresh frame, run the body and
    /// collect what must flow back to the caller.
    fn run_body(
        &mut self,
        subprogram: &Subprogram,
        bound: Vec<BoundParameter>,
    ) -> Result<(Vec<(WriteBack, Value)>, Option<Value>), RuntimeError> {
        let mut pending = Vec::new();
        for parameter in bound {
            if let Some(target) = parameter.write_back {
                pending.push((parameter.declaration.name.clone(), target));
            }
            self.scopes.bind(parameter.declaration, parameter.value);
        }

        if let Some(return_variable) = &subprogram.return_variable {
            let declaration = subprogram
                .declaration(return_variable)
                .cloned()
                .unwrap_or_else(|| Declaration::scalar(return_variable.clone(), VarType::Real, subprogram.line));
            self.scopes.declare(declaration)?;
        }
        for declaration in &subprogram.declarations {
            let is_parameter = subprogram.parameters.iter().any(|p| p.name == declaration.name);
            if is_parameter || subprogram.return_variable.as_deref() == Some(declaration.name.as_str()) {
                continue;
            }
            self.scopes
                .declare(declaration.clone())
                .map_err(|e| e.at_line(declaration.line))?;
        }
        for constant in &subprogram.constants {
            self.define_constant(&constant.name, &constant.expression)
                .map_err(|e| e.at_line(constant.line))?;
        }

        self.execute_block(&subprogram.body)?;

        let mut write_backs = Vec::with_capacity(pending.len());
        for (name, target) in pending {
            let value = self
                .scopes
                .local(&name)
                .cloned()
                .ok_or_else(|| RuntimeError::undeclared(&name))?;
            write_backs.push((target, value));
        }
        let returned = match &subprogram.return_variable {
            Some(name) => Some(
                self.scopes
                    .local(name)
                    .cloned()
                    .ok_or_else(|| RuntimeError::undeclared(name))?,
            ),
            None => None,
        };
        Ok((write_backs, returned))
    }
}

/// Array parameters need an array of the same rank; others need a scalar.
fn check_rank(subprogram: &Subprogram, parameter: &Parameter, argument: &str, rank: usize) -> Result<(), RuntimeError> {
    match parameter.array_rank {
        Some(expected) if expected != rank => Err(RuntimeError::array_shape(format!(
            "parameter '{}' of '{}' expects an array of rank {}, received '{}' of rank {}",
            parameter.name, subprogram.name, expected, argument, rank
        ))),
        None if rank > 0 => Err(RuntimeError::type_mismatch(format!(
            "parameter '{}' of '{}' expects a single value, but '{}' is an array",
            parameter.name, subprogram.name, argument
        ))),
        _ => Ok(()),
    }
}

fn fit_value(declaration: &Declaration, value: &Value) -> Result<Value, RuntimeError> {
    match &declaration.dimensions {
        Some(dimensions) => {
            if !shape_matches(value, dimensions) {
                return Err(RuntimeError::array_shape(format!(
                    "value does not fit array parameter '{}'",
                    declaration.name
                )));
            }
            coerce_deep(value, declaration.var_type)
        }
        None => coerce_to_type(ensure_scalar(value, "a parameter")?, declaration.var_type),
    }
}
