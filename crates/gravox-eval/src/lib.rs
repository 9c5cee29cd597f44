//! Gravox tree-walking interpreter.
//!
//! Executes a parsed [`Program`](gravox_types::ast::Program) directly:
//! lexical scopes live in an arena of frames, `return` travels as a
//! [`Flow`] completion, and imported modules are cached by resolved path
//! and content digest.

mod config;
mod env;
mod error;
mod evaluator;
mod interpolate;
mod module;
mod sink;
pub mod stdlib;
mod typecheck;
mod value;

pub use config::{CachePolicy, ConfigOverlay, InterpreterConfig};
pub use env::{Environment, FrameId};
pub use error::{ConfigError, EvalError, EvalResult};
pub use evaluator::{Flow, Interpreter};
pub use interpolate::interpolate;
pub use module::{source_digest, CachedModule, ExportTable, ModuleCache};
pub use sink::{RuntimeDiagnostic, Sink};
pub use typecheck::check_type;
pub use value::{Function, NativeFn, NativeImpl, NativeParam, UserFunction, Value};
