//! Core parser infrastructure: token cursor, error construction, helpers.

use gravox_lexer::token::{Token, TokenKind};
use gravox_types::ast::{Ident, Program};
use gravox_types::{ErrorCode, GravoxError, SourceFile, Span};

/// Result of every parsing step. The first error aborts the parse.
pub type ParseResult<T> = Result<T, GravoxError>;

/// The Gravox parser.
///
/// Recursive descent over the lexer's token stream with one token of
/// lookahead (plus a fixed window for declaration dispatch). There is no
/// error recovery: the first unmet expectation is returned as the error.
pub struct Parser<'src> {
    /// The token stream.
    tokens: Vec<Token>,
    /// Current index into `tokens`.
    pos: usize,
    /// Source file for error context.
    source_file: &'src SourceFile,
}

impl<'src> Parser<'src> {
    /// Create a new parser from a token stream and source file.
    pub fn new(tokens: Vec<Token>, source_file: &'src SourceFile) -> Self {
        Self {
            tokens,
            pos: 0,
            source_file,
        }
    }

    // ── Token Cursor ──────────────────────────────────────────────────────────

    /// Returns the current token without advancing.
    pub(crate) fn peek(&self) -> &Token {
        self.tokens.get(self.pos).or_else(|| self.tokens.last()).unwrap_or(&EOF)
    }

    pub(crate) fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    /// Advance the cursor by one and return the consumed token.
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    /// Span of the most recently consumed token.
    pub(crate) fn previous_span(&self) -> Span {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| t.span)
            .unwrap_or_else(|| Span::point(1, 1))
    }

    pub(crate) fn current_span(&self) -> Span {
        self.peek().span
    }

    pub(crate) fn at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    pub(crate) fn check_exact(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == kind
    }

    /// If the current token matches, advance and return `true`.
    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check_exact(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Look ahead by `n` tokens from the current position.
    pub(crate) fn look_ahead(&self, n: usize) -> &TokenKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| &t.kind)
            .unwrap_or(&TokenKind::Eof)
    }

    // ── Expect Helpers ────────────────────────────────────────────────────────

    /// Consume a token of exactly `expected` kind.
    pub(crate) fn expect(&mut self, expected: &TokenKind) -> ParseResult<Token> {
        if self.check_exact(expected) {
            Ok(self.advance())
        } else {
            let error = self.error_at_current(
                ErrorCode::UNEXPECTED_TOKEN,
                format!("expected '{}', got '{}'", expected, self.peek_kind()),
            );
            Err(match expected {
                TokenKind::Semicolon => {
                    error.with_suggestion("add ';' at the end of the statement")
                }
                _ => error,
            })
        }
    }

    pub(crate) fn expect_identifier(&mut self) -> ParseResult<Ident> {
        match self.peek_kind() {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                let span = self.advance().span;
                Ok(Ident::new(name, span))
            }
            other => Err(self.error_at_current(
                ErrorCode::UNEXPECTED_TOKEN,
                format!("expected identifier, got '{other}'"),
            )),
        }
    }

    pub(crate) fn expect_string_literal(&mut self) -> ParseResult<String> {
        match self.peek_kind() {
            TokenKind::StringLiteral(s) => {
                let s = s.clone();
                self.advance();
                Ok(s)
            }
            other => Err(self.error_at_current(
                ErrorCode::UNEXPECTED_TOKEN,
                format!("expected string literal, got '{other}'"),
            )),
        }
    }

    // ── Error Construction ────────────────────────────────────────────────────

    pub(crate) fn error_at_current(
        &self,
        code: ErrorCode,
        message: impl Into<String>,
    ) -> GravoxError {
        self.error_at(code, message, self.current_span())
    }

    pub(crate) fn error_at(
        &self,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
    ) -> GravoxError {
        let source_line = self.source_file.line(span.start_line).unwrap_or("");
        GravoxError::new(&self.source_file.name, code, message, span, source_line)
    }

    // ── Public API ────────────────────────────────────────────────────────────

    /// Parse the token stream into a [`Program`].
    pub fn parse(mut self) -> ParseResult<Program> {
        let start = self.current_span();
        let mut stmts = Vec::new();
        while !self.at_end() {
            stmts.push(self.parse_declaration()?);
        }
        let span = if stmts.is_empty() {
            start
        } else {
            start.merge(self.previous_span())
        };
        Ok(Program { stmts, span })
    }
}

/// Fallback for an empty token vector; the lexer always appends one.
static EOF: Token = Token {
    kind: TokenKind::Eof,
    span: Span {
        start_line: 1,
        start_col: 1,
        end_line: 1,
        end_col: 1,
    },
};
