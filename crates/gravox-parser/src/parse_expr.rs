//! Expression parsing by precedence climbing.
//!
//! Precedence (lowest → highest):
//! 6. `=` (right-associative, target must be a bare variable)
//! 5. `==`
//! 4. `<`, `>`
//! 3. `+`, `-`
//! 2. `*`, `/`, `%`
//! 1. unary `-`
//!
//! Primaries: literals, `name`, `name(args)`, `name[index]`, `( expr )`,
//! `[ elements ]`.

use gravox_lexer::token::TokenKind;
use gravox_types::ast::*;
use gravox_types::ErrorCode;

use crate::parser::{ParseResult, Parser};

impl<'src> Parser<'src> {
    /// Parse an expression.
    pub(crate) fn parse_expression(&mut self) -> ParseResult<Expr> {
        self.parse_assignment()
    }

    /// Comma-separated expressions up to (not including) `terminator`.
    pub(crate) fn parse_arg_list(&mut self, terminator: &TokenKind) -> ParseResult<Vec<Expr>> {
        let mut args = Vec::new();
        if self.check_exact(terminator) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_expression()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok(args)
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Precedence Chain
    // ══════════════════════════════════════════════════════════════════════════

    /// `Assignment = Equality [ "=" Assignment ]`
    fn parse_assignment(&mut self) -> ParseResult<Expr> {
        let target = self.parse_equality()?;
        if !self.eat(&TokenKind::Eq) {
            return Ok(target);
        }
        let value = self.parse_assignment()?;
        match target.kind {
            ExprKind::Variable(name) => {
                let span = target.span.merge(value.span);
                Ok(Expr::new(
                    ExprKind::Assign {
                        name: Ident::new(name, target.span),
                        value: Box::new(value),
                    },
                    span,
                ))
            }
            _ => Err(self
                .error_at(
                    ErrorCode::INVALID_ASSIGNMENT_TARGET,
                    "Invalid assignment target.",
                    target.span,
                )
                .with_suggestion("only a variable name can appear left of '='")),
        }
    }

    /// `Equality = Comparison { "==" Comparison }`
    fn parse_equality(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_comparison()?;
        while self.eat(&TokenKind::EqEq) {
            let right = self.parse_comparison()?;
            left = binary(left, BinOp::Eq, right);
        }
        Ok(left)
    }

    /// `Comparison = Term { ("<" | ">") Term }`
    fn parse_comparison(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_term()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Less => BinOp::Less,
                TokenKind::Greater => BinOp::Greater,
                _ => break,
            };
            self.advance();
            let right = self.parse_term()?;
            left = binary(left, op, right);
        }
        Ok(left)
    }

    /// `Term = Factor { ("+" | "-") Factor }`
    fn parse_term(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_factor()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_factor()?;
            left = binary(left, op, right);
        }
        Ok(left)
    }

    /// `Factor = Unary { ("*" | "/" | "%") Unary }`
    fn parse_factor(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::Percent => BinOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = binary(left, op, right);
        }
        Ok(left)
    }

    /// `Unary = "-" Unary | Primary`
    fn parse_unary(&mut self) -> ParseResult<Expr> {
        if self.check_exact(&TokenKind::Minus) {
            let start = self.advance().span;
            let operand = self.parse_unary()?;
            let span = start.merge(operand.span);
            return Ok(Expr::new(
                ExprKind::Unary {
                    op: UnaryOp::Neg,
                    operand: Box::new(operand),
                },
                span,
            ));
        }
        self.parse_primary()
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Primary Expressions
    // ══════════════════════════════════════════════════════════════════════════

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let start = self.current_span();
        match self.peek_kind().clone() {
            TokenKind::NumberLit(n) => {
                self.advance();
                Ok(Expr::new(ExprKind::NumberLit(n), start))
            }
            TokenKind::StringLiteral(s) => {
                self.advance();
                Ok(Expr::new(ExprKind::StringLit(s), start))
            }
            TokenKind::True => {
                self.advance();
                Ok(Expr::new(ExprKind::BoolLit(true), start))
            }
            TokenKind::False => {
                self.advance();
                Ok(Expr::new(ExprKind::BoolLit(false), start))
            }
            TokenKind::Identifier(name) => {
                self.advance();
                self.parse_identifier_suffix(Ident::new(name, start))
            }
            TokenKind::LParen => {
                self.advance(); // eat `(`
                let inner = self.parse_expression()?;
                self.expect(&TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::LBracket => {
                self.advance(); // eat `[`
                let elements = self.parse_arg_list(&TokenKind::RBracket)?;
                self.expect(&TokenKind::RBracket)?;
                let span = start.merge(self.previous_span());
                Ok(Expr::new(ExprKind::ArrayLit(elements), span))
            }
            other => Err(self.error_at_current(
                ErrorCode::EXPECTED_EXPRESSION,
                format!("expected expression, got '{other}'"),
            )),
        }
    }

    /// After an identifier: a call `(args)`, an index `[expr]`, or nothing.
    fn parse_identifier_suffix(&mut self, name: Ident) -> ParseResult<Expr> {
        if self.eat(&TokenKind::LParen) {
            let args = self.parse_arg_list(&TokenKind::RParen)?;
            self.expect(&TokenKind::RParen)?;
            let span = name.span.merge(self.previous_span());
            return Ok(Expr::new(ExprKind::Call { callee: name, args }, span));
        }
        if self.eat(&TokenKind::LBracket) {
            let index = self.parse_expression()?;
            self.expect(&TokenKind::RBracket)?;
            let span = name.span.merge(self.previous_span());
            return Ok(Expr::new(
                ExprKind::Index {
                    name,
                    index: Box::new(index),
                },
                span,
            ));
        }
        let span = name.span;
        Ok(Expr::new(ExprKind::Variable(name.name), span))
    }
}

fn binary(left: Expr, op: BinOp, right: Expr) -> Expr {
    let span = left.span.merge(right.span);
    Expr::new(
        ExprKind::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        },
        span,
    )
}
