//! Token types for the Gravox lexer.
//!
//! Defines [`TokenKind`] covering every lexeme Gravox recognises and
//! [`Token`], which pairs a kind with a source [`Span`].

use gravox_types::Span;
use std::fmt;

/// Every reserved word. None of these can be used as an identifier.
pub const ALL_KEYWORDS: &[&str] = &[
    // Type names (5)
    "int", "float", "string", "bool", "any",
    // Statement keywords (8)
    "if", "else", "while", "for", "in", "range", "return", "show",
    // Declarations and modules (5)
    "action", "use", "as", "import", "from",
    // Boolean literals (2)
    "true", "false",
];

/// A single token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ── Literals ─────────────────────────────────────────────
    /// `42`, `3.14`
    NumberLit(f64),
    /// `"text"`, delimiters stripped, no escape processing.
    StringLiteral(String),
    /// `true`
    True,
    /// `false`
    False,

    // ── Identifiers ──────────────────────────────────────────
    Identifier(String),

    // ── Type names ───────────────────────────────────────────
    KwInt,
    KwFloat,
    KwString,
    KwBool,
    KwAny,

    // ── Keywords ─────────────────────────────────────────────
    If,
    Else,
    While,
    For,
    In,
    Range,
    Return,
    Show,
    Action,
    Use,
    As,
    Import,
    From,

    // ── Operators ────────────────────────────────────────────
    /// `=`
    Eq,
    /// `==`
    EqEq,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Less,
    Greater,

    // ── Punctuation ──────────────────────────────────────────
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Comma,

    Eof,
}

impl TokenKind {
    /// Classify a scanned word. Returns `None` for plain identifiers.
    pub fn from_keyword(s: &str) -> Option<TokenKind> {
        Some(match s {
            "int" => TokenKind::KwInt,
            "float" => TokenKind::KwFloat,
            "string" => TokenKind::KwString,
            "bool" => TokenKind::KwBool,
            "any" => TokenKind::KwAny,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            "for" => TokenKind::For,
            "in" => TokenKind::In,
            "range" => TokenKind::Range,
            "return" => TokenKind::Return,
            "show" => TokenKind::Show,
            "action" => TokenKind::Action,
            "use" => TokenKind::Use,
            "as" => TokenKind::As,
            "import" => TokenKind::Import,
            "from" => TokenKind::From,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            _ => return None,
        })
    }

    /// `true` for the five type-name keywords.
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            TokenKind::KwInt
                | TokenKind::KwFloat
                | TokenKind::KwString
                | TokenKind::KwBool
                | TokenKind::KwAny
        )
    }

    pub fn is_keyword(&self) -> bool {
        self.is_type()
            || matches!(
                self,
                TokenKind::If
                    | TokenKind::Else
                    | TokenKind::While
                    | TokenKind::For
                    | TokenKind::In
                    | TokenKind::Range
                    | TokenKind::Return
                    | TokenKind::Show
                    | TokenKind::Action
                    | TokenKind::Use
                    | TokenKind::As
                    | TokenKind::Import
                    | TokenKind::From
                    | TokenKind::True
                    | TokenKind::False
            )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::NumberLit(n) => write!(f, "{n}"),
            TokenKind::StringLiteral(s) => write!(f, "\"{s}\""),
            TokenKind::True => f.write_str("true"),
            TokenKind::False => f.write_str("false"),
            TokenKind::Identifier(s) => f.write_str(s),
            TokenKind::KwInt => f.write_str("int"),
            TokenKind::KwFloat => f.write_str("float"),
            TokenKind::KwString => f.write_str("string"),
            TokenKind::KwBool => f.write_str("bool"),
            TokenKind::KwAny => f.write_str("any"),
            TokenKind::If => f.write_str("if"),
            TokenKind::Else => f.write_str("else"),
            TokenKind::While => f.write_str("while"),
            TokenKind::For => f.write_str("for"),
            TokenKind::In => f.write_str("in"),
            TokenKind::Range => f.write_str("range"),
            TokenKind::Return => f.write_str("return"),
            TokenKind::Show => f.write_str("show"),
            TokenKind::Action => f.write_str("action"),
            TokenKind::Use => f.write_str("use"),
            TokenKind::As => f.write_str("as"),
            TokenKind::Import => f.write_str("import"),
            TokenKind::From => f.write_str("from"),
            TokenKind::Eq => f.write_str("="),
            TokenKind::EqEq => f.write_str("=="),
            TokenKind::Plus => f.write_str("+"),
            TokenKind::Minus => f.write_str("-"),
            TokenKind::Star => f.write_str("*"),
            TokenKind::Slash => f.write_str("/"),
            TokenKind::Percent => f.write_str("%"),
            TokenKind::Less => f.write_str("<"),
            TokenKind::Greater => f.write_str(">"),
            TokenKind::LParen => f.write_str("("),
            TokenKind::RParen => f.write_str(")"),
            TokenKind::LBrace => f.write_str("{"),
            TokenKind::RBrace => f.write_str("}"),
            TokenKind::LBracket => f.write_str("["),
            TokenKind::RBracket => f.write_str("]"),
            TokenKind::Semicolon => f.write_str(";"),
            TokenKind::Comma => f.write_str(","),
            TokenKind::Eof => f.write_str("end of file"),
        }
    }
}
