//! Runtime values.

use crate::env::FrameId;
use crate::error::EvalResult;
use crate::evaluator::Interpreter;
use gravox_types::ast::{Block, Param};
use std::fmt;
use std::rc::Rc;

/// A Gravox runtime value.
///
/// Numbers are always `f64`; the language has no separate integer
/// representation.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Number(f64),
    String(String),
    Bool(bool),
    Array(Vec<Value>),
    Function(Function),
}

impl Value {
    /// Name of the value's kind, as used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Bool(_) => "bool",
            Value::Array(_) => "array",
            Value::Function(_) => "function",
        }
    }

    /// Condition semantics for `if` and `while`.
    ///
    /// `null`, `false`, `0`, `NaN` and `""` are false.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Function(_) => true,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }
}

/// Structural equality. `NaN` is unequal to itself; functions compare by
/// identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Number(n) => write_number(f, *n),
            Value::String(s) => f.write_str(s),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Function(func) => write!(f, "{func}"),
        }
    }
}

fn write_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_nan() {
        f.write_str("NaN")
    } else if n.is_infinite() {
        f.write_str(if n > 0.0 { "Infinity" } else { "-Infinity" })
    } else if n == 0.0 {
        // covers -0
        f.write_str("0")
    } else {
        write!(f, "{n}")
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Functions
// ══════════════════════════════════════════════════════════════════════════════

/// A callable value.
#[derive(Debug, Clone)]
pub enum Function {
    Native(NativeFn),
    User(Rc<UserFunction>),
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Function::Native(a), Function::Native(b)) => a.name == b.name,
            (Function::User(a), Function::User(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Function::Native(native) => write!(f, "<native {}>", native.name),
            Function::User(user) => write!(f, "<action {}>", user.name),
        }
    }
}

/// Host implementation of a capsule. Receives one argument per declared
/// parameter, defaults already applied.
pub type NativeImpl = fn(&mut Interpreter, &[Value]) -> EvalResult<Value>;

/// A host-provided capsule exposed as a Gravox function.
#[derive(Clone)]
pub struct NativeFn {
    pub name: &'static str,
    pub params: Vec<NativeParam>,
    pub func: NativeImpl,
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFn")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct NativeParam {
    pub type_name: &'static str,
    pub name: &'static str,
    pub default: Option<Value>,
}

impl NativeParam {
    /// A parameter with no default value.
    pub fn required(type_name: &'static str, name: &'static str) -> Self {
        Self {
            type_name,
            name,
            default: None,
        }
    }
}

/// An `action` (or type-led function) closed over its defining frame.
#[derive(Debug)]
pub struct UserFunction {
    pub name: String,
    pub params: Vec<Param>,
    pub body: Block,
    pub closure: FrameId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_numbers_print_without_fraction() {
        assert_eq!(Value::Number(5.0).to_string(), "5");
        assert_eq!(Value::Number(-3.0).to_string(), "-3");
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
        assert_eq!(Value::Number(-0.0).to_string(), "0");
        assert_eq!(Value::Number(0.1 + 0.2).to_string(), "0.30000000000000004");
    }

    #[test]
    fn special_numbers() {
        assert_eq!(Value::Number(f64::NAN).to_string(), "NaN");
        assert_eq!(Value::Number(f64::INFINITY).to_string(), "Infinity");
        assert_eq!(Value::Number(f64::NEG_INFINITY).to_string(), "-Infinity");
    }

    #[test]
    fn display_compound_values() {
        let arr = Value::Array(vec![
            Value::Number(1.0),
            Value::String("a".into()),
            Value::Array(vec![Value::Bool(true), Value::Null]),
        ]);
        assert_eq!(arr.to_string(), "[1, a, [true, null]]");
        assert_eq!(Value::Array(vec![]).to_string(), "[]");
    }

    #[test]
    fn truthiness() {
        for falsy in [
            Value::Null,
            Value::Bool(false),
            Value::Number(0.0),
            Value::Number(f64::NAN),
            Value::String(String::new()),
        ] {
            assert!(!falsy.is_truthy(), "{falsy:?} should be falsy");
        }
        for truthy in [
            Value::Bool(true),
            Value::Number(-1.0),
            Value::String("0".into()),
            Value::Array(vec![]),
        ] {
            assert!(truthy.is_truthy(), "{truthy:?} should be truthy");
        }
    }

    #[test]
    fn structural_equality() {
        let a = Value::Array(vec![Value::Number(1.0), Value::String("x".into())]);
        let b = Value::Array(vec![Value::Number(1.0), Value::String("x".into())]);
        assert_eq!(a, b);
        assert_ne!(Value::Number(1.0), Value::String("1".into()));
        assert_ne!(Value::Number(f64::NAN), Value::Number(f64::NAN));
        assert_ne!(Value::Null, Value::Bool(false));
    }
}
