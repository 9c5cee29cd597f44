//! Output and diagnostic channels.

use gravox_types::Span;
use serde::Serialize;
use std::fmt;

/// Where the interpreter writes a channel's lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sink {
    Stdout,
    Stderr,
    /// Buffer lines in memory, for embedding and tests.
    Capture(Vec<String>),
}

impl Sink {
    pub fn capture() -> Self {
        Sink::Capture(Vec::new())
    }

    pub fn write_line(&mut self, line: &str) {
        match self {
            Sink::Stdout => println!("{line}"),
            Sink::Stderr => eprintln!("{line}"),
            Sink::Capture(lines) => lines.push(line.to_string()),
        }
    }

    /// Captured lines; empty for streaming sinks.
    pub fn lines(&self) -> &[String] {
        match self {
            Sink::Capture(lines) => lines,
            Sink::Stdout | Sink::Stderr => &[],
        }
    }
}

/// A runtime error as reported by [`Interpreter::interpret`](crate::Interpreter::interpret).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuntimeDiagnostic {
    pub file: String,
    #[serde(flatten)]
    pub span: Span,
    pub message: String,
}

impl fmt::Display for RuntimeDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: runtime error: {}", self.file, self.span, self.message)
    }
}
