//! Built-in text functions, matched case- and accent-insensitively.

use pseint_parser::lexer::folded;

use crate::error::{ErrorCode, RuntimeError};
use crate::value::Value;

/// The built-in functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Builtin {
    /// `Subcadena(texto, desde, hasta)`, 1-based and inclusive.
    Subcadena,
    Longitud,
    Mayusculas,
    Minusculas,
    /// `Concatenar(a, b, ...)`, two or more arguments.
    Concatenar,
}

impl Builtin {
    pub(crate) fn lookup(name: &str) -> Option<Self> {
        match folded(name).as_str() {
            "subcadena" => Some(Self::Subcadena),
            "longitud" => Some(Self::Longitud),
            "mayusculas" => Some(Self::Mayusculas),
            "minusculas" => Some(Self::Minusculas),
            "concatenar" => Some(Self::Concatenar),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Subcadena => "Subcadena",
            Self::Longitud => "Longitud",
            Self::Mayusculas => "Mayusculas",
            Self::Minusculas => "Minusculas",
            Self::Concatenar => "Concatenar",
        }
    }

    fn check_arity(self, args: &[Value], expected: usize) -> Result<(), RuntimeError> {
        if args.len() != expected {
            return Err(RuntimeError::argument_count(self.name(), expected, args.len()));
        }
        Ok(())
    }

    /// Apply to already evaluated scalar arguments.
    pub(crate) fn apply(self, args: &[Value]) -> Result<Value, RuntimeError> {
        match self {
            Self::Subcadena => {
                self.check_arity(args, 3)?;
                Ok(Value::String(substring(&args[0], &args[1], &args[2])))
            }
            Self::Longitud => {
                self.check_arity(args, 1)?;
                Ok(Value::Number(args[0].stringify().chars().count() as f64))
            }
            Self::Mayusculas => {
                self.check_arity(args, 1)?;
                Ok(Value::String(args[0].stringify().to_uppercase()))
            }
            Self::Minusculas => {
                self.check_arity(args, 1)?;
                Ok(Value::String(args[0].stringify().to_lowercase()))
            }
            Self::Concatenar => {
                if args.len() < 2 {
                    return Err(RuntimeError::new(
                        ErrorCode::Call,
                        format!("'Concatenar' expects at least 2 arguments but received {}", args.len()),
                    )
                    .with_context("call"));
                }
                Ok(Value::String(args.iter().map(Value::stringify).collect()))
            }
        }
    }
}

/// Inclusive 1-based slice; bad bounds give an empty text.
fn substring(text: &Value, start: &Value, end: &Value) -> String {
    let chars: Vec<char> = text.stringify().chars().collect();
    let (Some(start), Some(end)) = (start.as_number(), end.as_number()) else {
        return String::new();
    };
    let (start, end) = (start.trunc(), end.trunc().min(chars.len() as f64));
    if start < 1.0 || end < start {
        return String::new();
    }
    chars[start as usize - 1..end as usize].iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Value {
        Value::from(s)
    }

    #[test]
    fn test_lookup_ignores_case_and_accents() {
        assert_eq!(Builtin::lookup("LONGITUD"), Some(Builtin::Longitud));
        assert_eq!(Builtin::lookup("Mayúsculas"), Some(Builtin::Mayusculas));
        assert_eq!(Builtin::lookup("raiz"), None);
    }

    #[test]
    fn test_subcadena() {
        let args = [text("programa"), Value::Number(1.0), Value::Number(3.0)];
        assert_eq!(Builtin::Subcadena.apply(&args).unwrap(), text("pro"));
        let past_end = [text("hola"), Value::Number(3.0), Value::Number(10.0)];
        assert_eq!(Builtin::Subcadena.apply(&past_end).unwrap(), text("la"));
        let reversed = [text("hola"), Value::Number(3.0), Value::Number(2.0)];
        assert_eq!(Builtin::Subcadena.apply(&reversed).unwrap(), text(""));
        let zero = [text("hola"), Value::Number(0.0), Value::Number(2.0)];
        assert_eq!(Builtin::Subcadena.apply(&zero).unwrap(), text(""));
        let beyond = [text("hola"), Value::Number(9.0), Value::Number(12.0)];
        assert_eq!(Builtin::Subcadena.apply(&beyond).unwrap(), text(""));
    }

    #[test]
    fn test_text_functions() {
        assert_eq!(Builtin::Longitud.apply(&[text("ñandú")]).unwrap(), Value::Number(5.0));
        assert_eq!(Builtin::Mayusculas.apply(&[text("abc")]).unwrap(), text("ABC"));
        assert_eq!(Builtin::Minusculas.apply(&[text("ABC")]).unwrap(), text("abc"));
        assert_eq!(
            Builtin::Concatenar.apply(&[text("a"), Value::Number(1.0), Value::Boolean(true)]).unwrap(),
            text("a1Verdadero")
        );
    }

    #[test]
    fn test_arity() {
        assert!(Builtin::Concatenar.apply(&[text("a")]).is_err());
        assert!(Builtin::Longitud.apply(&[]).is_err());
    }
}
