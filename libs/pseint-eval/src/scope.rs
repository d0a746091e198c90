//! # Scope Chain
//!
//! Runtime scopes for PSeInt programs.
//!
//! ## Scoping Rules
//!
//! - Frame 0 is the global scope of the `Algoritmo`
//! - Each subprogram call pushes a frame whose parent is the global frame
//! - Lookup walks the parent chain outward; the frame that declares a name
//!   owns its storage and its declaration governs coercion
//! - Constants are immutable once defined
//!
//! ## Example
//!
//! ```rust
//! use pseint_eval::scope::ScopeChain;
//! use pseint_eval::value::Value;
//! use pseint_parser::ast::{Declaration, VarType};
//!
//! let mut scopes = ScopeChain::new();
//! scopes.declare(Declaration::scalar("x", VarType::Entero, 1)).unwrap();
//! scopes.assign("x", &Value::from("7.9")).unwrap();
//! assert_eq!(scopes.get("x").unwrap(), &Value::Number(7.0));
//! ```

use std::collections::{BTreeMap, HashMap};

use pseint_parser::ast::Declaration;

use crate::error::RuntimeError;
use crate::value::{coerce_deep, coerce_to_type, default_for_declaration, ensure_scalar, Value};

// =============================================================================
// FRAME
// =============================================================================

/// Storage for one scope: the global program or one active call.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    declarations: HashMap<String, Declaration>,
    constants: HashMap<String, Value>,
    variables: HashMap<String, Value>,
    parent: Option<usize>,
}

impl Frame {
    /// Current value of a variable stored in this frame.
    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }
}

/// Where a name was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Binding {
    Constant(usize),
    Variable(usize),
}

// =============================================================================
// SCOPE CHAIN
// =============================================================================

/// Stack of frames linked by parent index.
#[derive(Debug, Clone)]
pub struct ScopeChain {
    frames: Vec<Frame>,
}

impl Default for ScopeChain {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeChain {
    /// Index of the global frame.
    pub const GLOBAL: usize = 0;

    /// Chain holding only an empty global frame.
    pub fn new() -> Self {
        Self {
            frames: vec![Frame::default()],
        }
    }

    /// Enter a subprogram call. Its parent is the global frame.
    pub fn push_frame(&mut self) {
        self.frames.push(Frame {
            parent: Some(Self::GLOBAL),
            ..Frame::default()
        });
    }

    /// Leave the innermost call. The global frame is never popped.
    pub fn pop_frame(&mut self) -> Option<Frame> {
        if self.frames.len() > 1 {
            self.frames.pop()
        } else {
            None
        }
    }

    fn current(&self) -> usize {
        self.frames.len() - 1
    }

    fn find(&self, name: &str) -> Option<Binding> {
        let mut index = Some(self.current());
        while let Some(i) = index {
            let frame = &self.frames[i];
            if frame.constants.contains_key(name) {
                return Some(Binding::Constant(i));
            }
            if frame.declarations.contains_key(name) {
                return Some(Binding::Variable(i));
            }
            index = frame.parent;
        }
        None
    }

    // =========================================================================
    // DEFINITION
    // =========================================================================

    /// Declare a variable in the current frame with its default value.
    pub fn declare(&mut self, declaration: Declaration) -> Result<(), RuntimeError> {
        let value = default_for_declaration(&declaration)?;
        self.bind(declaration, value);
        Ok(())
    }

    /// Declare a variable in the current frame with an initial value.
    pub fn bind(&mut self, declaration: Declaration, value: Value) {
        let current = self.current();
        let frame = &mut self.frames[current];
        frame.variables.insert(declaration.name.clone(), value);
        frame.declarations.insert(declaration.name.clone(), declaration);
    }

    /// Define a constant in the current frame.
    pub fn define_constant(&mut self, name: &str, value: Value) -> Result<(), RuntimeError> {
        let current = self.current();
        let frame = &mut self.frames[current];
        if frame.declarations.contains_key(name) || frame.constants.contains_key(name) {
            return Err(RuntimeError::constant_redeclared(name));
        }
        frame.constants.insert(name.to_string(), value);
        Ok(())
    }

    // =========================================================================
    // LOOKUP
    // =========================================================================

    /// True when `name` resolves to a constant.
    pub fn is_constant(&self, name: &str) -> bool {
        matches!(self.find(name), Some(Binding::Constant(_)))
    }

    /// Current value of a variable or constant.
    pub fn get(&self, name: &str) -> Result<&Value, RuntimeError> {
        let value = match self.find(name) {
            Some(Binding::Constant(i)) => self.frames[i].constants.get(name),
            Some(Binding::Variable(i)) => self.frames[i].variables.get(name),
            None => None,
        };
        value.ok_or_else(|| RuntimeError::undeclared(name))
    }

    /// Declaration governing a variable.
    pub fn declaration(&self, name: &str) -> Result<&Declaration, RuntimeError> {
        match self.find(name) {
            Some(Binding::Variable(i)) => self.frames[i]
                .declarations
                .get(name)
                .ok_or_else(|| RuntimeError::undeclared(name)),
            Some(Binding::Constant(_)) => Err(RuntimeError::constant_assignment(name)),
            None => Err(RuntimeError::undeclared(name)),
        }
    }

    /// Value stored in the innermost frame only.
    pub fn local(&self, name: &str) -> Option<&Value> {
        self.frames[self.current()].variable(name)
    }

    /// Snapshot of the global frame's variables, sorted by name.
    pub fn global_variables(&self) -> BTreeMap<String, Value> {
        self.frames[Self::GLOBAL]
            .variables
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    // =========================================================================
    // ASSIGNMENT
    // =========================================================================

    /// Store a value into a variable, coercing to its declared type.
    ///
    /// Array variables accept only an array of the declared shape.
    pub fn assign(&mut self, name: &str, value: &Value) -> Result<(), RuntimeError> {
        let frame_index = match self.find(name) {
            Some(Binding::Variable(i)) => i,
            Some(Binding::Constant(_)) => return Err(RuntimeError::constant_assignment(name)),
            None => return Err(RuntimeError::undeclared(name)),
        };
        let frame = &mut self.frames[frame_index];
        let declaration = frame
            .declarations
            .get(name)
            .ok_or_else(|| RuntimeError::undeclared(name))?;

        let stored = match &declaration.dimensions {
            Some(dimensions) => {
                if !shape_matches(value, dimensions) {
                    return Err(RuntimeError::array_shape(format!(
                        "value does not fit array '{}' of size {}",
                        name,
                        format_dimensions(dimensions)
                    )));
                }
                coerce_deep(value, declaration.var_type)?
            }
            None => coerce_to_type(value, declaration.var_type)?,
        };
        frame.variables.insert(name.to_string(), stored);
        Ok(())
    }

    // =========================================================================
    // ARRAY ELEMENTS
    // =========================================================================

    /// Frame and declaration of an array accessed with `count` indices.
    fn array_binding(&self, name: &str, count: usize) -> Result<usize, RuntimeError> {
        let frame_index = match self.find(name) {
            Some(Binding::Variable(i)) => i,
            Some(Binding::Constant(_)) => {
                return Err(RuntimeError::type_mismatch(format!("constant '{}' is not an array", name)))
            }
            None => return Err(RuntimeError::undeclared(name)),
        };
        let rank = self.frames[frame_index]
            .declarations
            .get(name)
            .map_or(0, Declaration::rank);
        if rank == 0 {
            return Err(RuntimeError::type_mismatch(format!("'{}' is not an array", name)));
        }
        if rank != count {
            return Err(RuntimeError::invalid_index_count(name, rank, count));
        }
        Ok(frame_index)
    }

    /// Read one element; `indices` are 0-based.
    pub fn get_element(&self, name: &str, indices: &[usize]) -> Result<Value, RuntimeError> {
        let frame_index = self.array_binding(name, indices.len())?;
        let mut current = self.frames[frame_index]
            .variables
            .get(name)
            .ok_or_else(|| RuntimeError::undeclared(name))?;
        for &index in indices {
            let Value::Array(items) = current else {
                return Err(RuntimeError::array_shape(format!("'{}' has fewer dimensions than indexed", name)));
            };
            current = items
                .get(index)
                .ok_or_else(|| RuntimeError::index_out_of_range(name, index + 1, items.len()))?;
        }
        Ok(current.clone())
    }

    /// Write one element, coercing to the array's type; `indices` are 0-based.
    pub fn set_element(&mut self, name: &str, indices: &[usize], value: &Value) -> Result<(), RuntimeError> {
        let frame_index = self.array_binding(name, indices.len())?;
        let frame = &mut self.frames[frame_index];
        let var_type = frame
            .declarations
            .get(name)
            .map(|d| d.var_type)
            .ok_or_else(|| RuntimeError::undeclared(name))?;
        let stored = coerce_to_type(ensure_scalar(value, "an array element")?, var_type)?;

        let mut current = frame
            .variables
            .get_mut(name)
            .ok_or_else(|| RuntimeError::undeclared(name))?;
        for &index in indices {
            current = match current {
                Value::Array(items) => {
                    let size = items.len();
                    items
                        .get_mut(index)
                        .ok_or_else(|| RuntimeError::index_out_of_range(name, index + 1, size))?
                }
                _ => {
                    return Err(RuntimeError::array_shape(format!(
                        "'{}' has fewer dimensions than indexed",
                        name
                    )))
                }
            };
        }
        *current = stored;
        Ok(())
    }
}

/// True when `value` is nested arrays matching `dimensions` exactly.
pub fn shape_matches(value: &Value, dimensions: &[usize]) -> bool {
    match (dimensions.split_first(), value) {
        (None, value) => !value.is_array(),
        (Some((&size, rest)), Value::Array(items)) => {
            items.len() == size && items.iter().all(|item| shape_matches(item, rest))
        }
        (Some(_), _) => false,
    }
}

fn format_dimensions(dimensions: &[usize]) -> String {
    let parts: Vec<String> = dimensions.iter().map(usize::to_string).collect();
    format!("[{}]", parts.join(", "))
}

// =============================================================================
// TESTS
// =============================================================================
