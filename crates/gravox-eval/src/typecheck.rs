//! Declaration-time type check.

use crate::value::Value;
use gravox_types::ast::TypeKind;

/// Does `value` satisfy the declared type `expected`?
///
/// The check is permissive: `any` and unrecognised type names accept every
/// value, and `int` and `float` both accept any number.
pub fn check_type(expected: &TypeKind, value: &Value) -> bool {
    match expected {
        TypeKind::Array(inner) => match value {
            Value::Array(items) => items.iter().all(|item| check_type(inner, item)),
            _ => false,
        },
        TypeKind::Named(name) => match name.as_str() {
            "any" => true,
            "int" | "float" => matches!(value, Value::Number(_)),
            "string" => matches!(value, Value::String(_)),
            "bool" => matches!(value, Value::Bool(_)),
            _ => true,
        },
    }
}
