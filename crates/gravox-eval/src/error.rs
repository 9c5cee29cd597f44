//! Runtime error types for the Gravox interpreter.

use gravox_types::GravoxError;

/// A runtime failure. Every variant aborts the current program run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvalError {
    /// Read or write of a name with no binding in any enclosing frame.
    #[error("Undefined variable '{0}'.")]
    UndefinedVariable(String),

    /// Declaration-time type check failed.
    #[error("Type Error: Cannot assign {found} to '{name}' of type '{expected}'.")]
    TypeMismatch {
        name: String,
        expected: String,
        found: &'static str,
    },

    /// Callee (or `use` target) is missing or not callable.
    #[error("'{0}' is not a function.")]
    NotAFunction(String),

    /// Indexed binding does not hold an array.
    #[error("'{0}' is not an array.")]
    NotAnArray(String),

    #[error("Index {index} out of bounds for '{name}' (length {len}).")]
    IndexOutOfBounds { name: String, index: f64, len: usize },

    #[error("Missing argument '{param}' in call to '{function}'.")]
    MissingArgument { function: String, param: String },

    /// Unknown `std:` module or unreadable module file.
    #[error("Cannot import '{0}': module not found.")]
    ImportNotFound(String),

    #[error("'{name}' is not exported from {module}.")]
    ExportNotFound { name: String, module: String },

    #[error("Return outside of function.")]
    ReturnOutsideFunction,

    /// Operator applied to value kinds it does not support.
    #[error("{0}")]
    InvalidOperands(String),

    /// A native capsule rejected its arguments.
    #[error("{function}: {message}")]
    Native { function: String, message: String },

    /// An imported module failed to parse.
    #[error("{0}")]
    Syntax(Box<GravoxError>),

    #[error("Circular import of '{0}'.")]
    CircularImport(String),
}

/// Result alias for evaluator operations.
pub type EvalResult<T> = Result<T, EvalError>;

/// Failure loading an [`InterpreterConfig`](crate::InterpreterConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}
