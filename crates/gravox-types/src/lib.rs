//! Shared types for Gravox.
//!
//! Defines the AST, source spans and the structured diagnostics produced by
//! the lexer and parser.

mod error;
mod span;
pub mod ast;

pub use error::{CompileErrors, ErrorCategory, ErrorCode, GravoxError, MAX_ERRORS};
pub use span::{SourceFile, Span};
