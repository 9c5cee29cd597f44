//! Gravox parser: converts a token stream into an AST.

mod parse_decl;
mod parse_expr;
mod parse_stmt;
mod parse_type;
mod parser;

pub use parser::{ParseResult, Parser};

use gravox_lexer::{LexResult, Lexer};
use gravox_types::ast::Program;
use gravox_types::SourceFile;

/// Lex and parse a whole source file.
///
/// Lexical errors never stop the pipeline; they come back alongside the
/// parse outcome so the host can report them.
pub fn parse_source(source_file: &SourceFile) -> (ParseResult<Program>, LexResult) {
    let mut lexed = Lexer::new(source_file).lex();
    let tokens = std::mem::take(&mut lexed.tokens);
    let program = Parser::new(tokens, source_file).parse();
    (program, lexed)
}
