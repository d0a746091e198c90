//! WASM-compatible diagnostic types.
//!
//! This module provides JavaScript-compatible wrappers for normalized
//! parse and runtime errors.

use pseint_eval::ErrorDescriptor;
use wasm_bindgen::prelude::*;

/// A diagnostic message for JavaScript.
///
/// # Examples
/// ```no_run
/// // In JavaScript:
/// // const list = check_syntax(source);
/// // const diag = list.get(0);
/// // console.log(diag.code(), diag.line(), diag.message());
/// ```
#[wasm_bindgen]
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    code: String,
    category: String,
    message: String,
    hint: Option<String>,
    line: Option<usize>,
}

#[wasm_bindgen]
impl Diagnostic {
    /// Returns the stable error code (`PS_PARSE_SYNTAX`, ...).
    pub fn code(&self) -> String {
        self.code.clone()
    }

    /// Returns the error category (`syntax`, `structure`, ...).
    pub fn category(&self) -> String {
        self.category.clone()
    }

    /// Returns the diagnostic message.
    pub fn message(&self) -> String {
        self.message.clone()
    }

    /// Returns the hint, if any.
    pub fn hint(&self) -> Option<String> {
        self.hint.clone()
    }

    /// Returns the 1-based source line, if known.
    pub fn line(&self) -> Option<usize> {
        self.line
    }

    /// Converts this diagnostic to a plain JavaScript object.
    ///
    /// This is useful for passing data between the worker and main thread,
    /// as wasm-bindgen wrappers cannot be transferred.
    pub fn to_js_object(&self) -> Result<JsValue, JsValue> {
        use js_sys::{Object, Reflect};

        let obj = Object::new();
        Reflect::set(&obj, &JsValue::from_str("code"), &JsValue::from_str(&self.code))?;
        Reflect::set(&obj, &JsValue::from_str("category"), &JsValue::from_str(&self.category))?;
        Reflect::set(&obj, &JsValue::from_str("message"), &JsValue::from_str(&self.message))?;

        if let Some(hint) = &self.hint {
            Reflect::set(&obj, &JsValue::from_str("hint"), &JsValue::from_str(hint))?;
        }
        if let Some(line) = self.line {
            Reflect::set(&obj, &JsValue::from_str("line"), &JsValue::from(line as f64))?;
        }

        Ok(JsValue::from(obj))
    }
}

impl From<ErrorDescriptor> for Diagnostic {
    fn from(descriptor: ErrorDescriptor) -> Self {
        Self {
            code: descriptor.code.as_str().to_string(),
            category: descriptor.category.as_str().to_string(),
            message: descriptor.message,
            hint: descriptor.hint,
            line: descriptor.line,
        }
    }
}

/// A collection of diagnostics.
#[wasm_bindgen]
#[derive(Debug, Clone, Default)]
pub struct DiagnosticList {
    diagnostics: Vec<Diagnostic>,
}

#[wasm_bindgen]
impl DiagnosticList {
    /// Returns the number of diagnostics.
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Returns true if there are no diagnostics.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Returns a diagnostic by index.
    pub fn get(&self, index: usize) -> Option<Diagnostic> {
        self.diagnostics.get(index).cloned()
    }
}

impl DiagnosticList {
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }
}
