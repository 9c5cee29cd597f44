//! Core Gravox lexer: converts source text to a token stream.
//!
//! - Whitespace (including newlines) separates tokens and is dropped
//! - `//` starts a comment running to end of line
//! - Strings have no escapes; an unterminated string runs to end of input
//! - Unknown characters are reported and skipped; lexing never stops early

use gravox_types::{CompileErrors, ErrorCode, GravoxError, SourceFile, Span};

use crate::token::{Token, TokenKind};

/// The Gravox lexer.
///
/// Scans left to right with one character of lookahead and always
/// produces a token stream ending in [`TokenKind::Eof`].
pub struct Lexer<'src> {
    /// The full source text.
    source: &'src str,
    /// Source file for error reporting.
    source_file: &'src SourceFile,
    /// Current byte offset into `source`.
    pos: usize,
    line: u32,
    col: u32,
    errors: CompileErrors,
}

/// Result of lexing.
#[derive(Debug)]
pub struct LexResult {
    /// The token stream (always ends with [`TokenKind::Eof`]).
    pub tokens: Vec<Token>,
    /// Unknown characters encountered. These never abort lexing.
    pub errors: CompileErrors,
}

impl<'src> Lexer<'src> {
    pub fn new(source_file: &'src SourceFile) -> Self {
        Self {
            source: &source_file.source,
            source_file,
            pos: 0,
            line: 1,
            col: 1,
            errors: CompileErrors::empty(),
        }
    }

    /// Lex the entire source file into a token stream.
    pub fn lex(mut self) -> LexResult {
        let mut tokens = Vec::new();
        loop {
            let token = self.scan_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        LexResult {
            tokens,
            errors: self.errors,
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Character-level helpers
    // ─────────────────────────────────────────────────────────────

    fn peek(&self) -> Option<u8> {
        self.source.as_bytes().get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.source.as_bytes().get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let ch = self.peek()?;
        self.pos += 1;
        if ch == b'\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn span_from(&self, start_line: u32, start_col: u32) -> Span {
        Span::new(
            start_line,
            start_col,
            self.line,
            self.col.saturating_sub(1).max(1),
        )
    }

    fn emit_error(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        let source_line = self.source_file.line(span.start_line).unwrap_or("");
        let err = GravoxError::new(&self.source_file.name, code, message, span, source_line);
        self.errors.push_error(err);
    }

    // ─────────────────────────────────────────────────────────────
    // Whitespace & comments
    // ─────────────────────────────────────────────────────────────

    /// Skip whitespace and line comments, in any interleaving.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(ch) if ch.is_ascii_whitespace() => {
                    self.advance();
                }
                Some(b'/') if self.peek_at(1) == Some(b'/') => {
                    while let Some(ch) = self.peek() {
                        if ch == b'\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => return,
            }
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Scanning
    // ─────────────────────────────────────────────────────────────

    fn scan_token(&mut self) -> Token {
        loop {
            self.skip_trivia();

            let start_line = self.line;
            let start_col = self.col;
            let start = self.pos;
            let Some(ch) = self.advance() else {
                return Token::new(TokenKind::Eof, Span::point(self.line, self.col));
            };

            let kind = match ch {
                b'"' => self.scan_string(),
                b'0'..=b'9' => self.scan_number(start),
                b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.scan_identifier(start),

                b'=' => {
                    if self.peek() == Some(b'=') {
                        self.advance();
                        TokenKind::EqEq
                    } else {
                        TokenKind::Eq
                    }
                }
                b'+' => TokenKind::Plus,
                b'-' => TokenKind::Minus,
                b'*' => TokenKind::Star,
                b'/' => TokenKind::Slash,
                b'%' => TokenKind::Percent,
                b'<' => TokenKind::Less,
                b'>' => TokenKind::Greater,
                b'(' => TokenKind::LParen,
                b')' => TokenKind::RParen,
                b'{' => TokenKind::LBrace,
                b'}' => TokenKind::RBrace,
                b'[' => TokenKind::LBracket,
                b']' => TokenKind::RBracket,
                b';' => TokenKind::Semicolon,
                b',' => TokenKind::Comma,

                _ => {
                    self.skip_unknown(start, start_line, start_col);
                    continue;
                }
            };

            return Token::new(kind, self.span_from(start_line, start_col));
        }
    }

    /// Report the character starting at `start` and step past all of its bytes.
    fn skip_unknown(&mut self, start: usize, start_line: u32, start_col: u32) {
        let ch = self.source[start..].chars().next().unwrap_or('\u{FFFD}');
        for _ in 1..ch.len_utf8() {
            self.advance();
        }
        let span = self.span_from(start_line, start_col);
        self.emit_error(
            ErrorCode::UNEXPECTED_CHARACTER,
            format!("Unknown character '{ch}'"),
            span,
        );
    }

    /// Digits, optionally followed by `.` and more digits. No sign, no exponent.
    fn scan_number(&mut self, start: usize) -> TokenKind {
        while let Some(b'0'..=b'9') = self.peek() {
            self.advance();
        }
        if self.peek() == Some(b'.') && matches!(self.peek_at(1), Some(b'0'..=b'9')) {
            self.advance();
            while let Some(b'0'..=b'9') = self.peek() {
                self.advance();
            }
        }
        let value = self.source[start..self.pos].parse().unwrap_or(0.0);
        TokenKind::NumberLit(value)
    }

    fn scan_identifier(&mut self, start: usize) -> TokenKind {
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == b'_' {
                self.advance();
            } else {
                break;
            }
        }
        let text = &self.source[start..self.pos];
        TokenKind::from_keyword(text).unwrap_or_else(|| TokenKind::Identifier(text.to_string()))
    }

    /// Called after the opening `"`. Runs to the closing quote or end of input.
    fn scan_string(&mut self) -> TokenKind {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if ch == b'"' {
                break;
            }
            self.advance();
        }
        let text = self.source[start..self.pos].to_string();
        // Closing quote, if there is one.
        self.advance();
        TokenKind::StringLiteral(text)
    }
}
