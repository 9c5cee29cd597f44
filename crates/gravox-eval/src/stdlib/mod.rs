//! Built-in `std:` capsule modules.

pub mod math;
pub mod time;

use crate::error::EvalError;
use crate::module::ExportTable;
use crate::value::{Function, NativeFn, Value};

/// A built-in module importable as `std:<name>`.
pub trait StdModule {
    fn name(&self) -> &'static str;

    /// The module's capsules, in declaration order.
    fn functions(&self) -> Vec<NativeFn>;
}

/// Every built-in module.
pub fn modules() -> [&'static dyn StdModule; 2] {
    [&math::MathModule, &time::TimeModule]
}

/// Export table of `std:<name>`, if such a module exists.
pub fn module_exports(name: &str) -> Option<ExportTable> {
    let module = modules().into_iter().find(|m| m.name() == name)?;
    Some(
        module
            .functions()
            .into_iter()
            .map(|f| (f.name.to_string(), Value::Function(Function::Native(f))))
            .collect(),
    )
}

/// Read argument `index` of `function` as a number.
pub(crate) fn number_arg(function: &str, args: &[Value], index: usize) -> Result<f64, EvalError> {
    match args.get(index) {
        Some(Value::Number(n)) => Ok(*n),
        Some(other) => Err(EvalError::Native {
            function: function.to_string(),
            message: format!("expected a number, got {}", other.type_name()),
        }),
        None => Err(EvalError::Native {
            function: function.to_string(),
            message: format!("missing argument {}", index + 1),
        }),
    }
}
