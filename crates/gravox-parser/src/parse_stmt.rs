//! Statement parsing.

use crate::parser::{ParseResult, Parser};
use gravox_lexer::token::TokenKind;
use gravox_types::ast::*;

impl<'src> Parser<'src> {
    /// Parse a block of declarations: `{ ... }`
    pub(crate) fn parse_block(&mut self) -> ParseResult<Block> {
        let start = self.current_span();
        self.expect(&TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        while !self.check_exact(&TokenKind::RBrace) && !self.at_end() {
            stmts.push(self.parse_declaration()?);
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(Block {
            stmts,
            span: start.merge(self.previous_span()),
        })
    }

    /// Parse a single non-declaration statement.
    pub(crate) fn parse_statement(&mut self) -> ParseResult<Stmt> {
        match self.peek_kind() {
            TokenKind::If => self.parse_if_stmt().map(Stmt::If),
            TokenKind::While => self.parse_while_stmt().map(Stmt::While),
            TokenKind::For => self.parse_for_stmt().map(Stmt::For),
            TokenKind::Show => self.parse_show_stmt().map(Stmt::Show),
            TokenKind::Return => self.parse_return_stmt().map(Stmt::Return),
            TokenKind::LBrace => self.parse_block().map(Stmt::Block),
            _ => {
                let expr = self.parse_expression()?;
                self.expect(&TokenKind::Semicolon)?;
                let span = expr.span.merge(self.previous_span());
                Ok(Stmt::Expr(ExprStmt { expr, span }))
            }
        }
    }

    /// `"(" expr ")"` around a condition.
    fn parse_condition(&mut self) -> ParseResult<Expr> {
        self.expect(&TokenKind::LParen)?;
        let condition = self.parse_expression()?;
        self.expect(&TokenKind::RParen)?;
        Ok(condition)
    }

    /// `if (cond) stmt [else stmt]`
    fn parse_if_stmt(&mut self) -> ParseResult<IfStmt> {
        let start = self.current_span();
        self.advance(); // eat `if`
        let condition = self.parse_condition()?;
        let then_branch = Box::new(self.parse_statement()?);
        let else_branch = if self.eat(&TokenKind::Else) {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };
        Ok(IfStmt {
            condition,
            then_branch,
            else_branch,
            span: start.merge(self.previous_span()),
        })
    }

    /// `while (cond) stmt`
    fn parse_while_stmt(&mut self) -> ParseResult<WhileStmt> {
        let start = self.current_span();
        self.advance(); // eat `while`
        let condition = self.parse_condition()?;
        let body = Box::new(self.parse_statement()?);
        Ok(WhileStmt {
            condition,
            body,
            span: start.merge(self.previous_span()),
        })
    }

    /// `for (name in range(start, end)) stmt`
    fn parse_for_stmt(&mut self) -> ParseResult<ForStmt> {
        let start_span = self.current_span();
        self.advance(); // eat `for`
        self.expect(&TokenKind::LParen)?;
        let variable = self.expect_identifier()?;
        self.expect(&TokenKind::In)?;
        self.expect(&TokenKind::Range)?;
        self.expect(&TokenKind::LParen)?;
        let start = self.parse_expression()?;
        self.expect(&TokenKind::Comma)?;
        let end = self.parse_expression()?;
        self.expect(&TokenKind::RParen)?;
        self.expect(&TokenKind::RParen)?;
        let body = Box::new(self.parse_statement()?);
        Ok(ForStmt {
            variable,
            start,
            end,
            body,
            span: start_span.merge(self.previous_span()),
        })
    }

    /// `show(expr, ...);`
    fn parse_show_stmt(&mut self) -> ParseResult<ShowStmt> {
        let start = self.current_span();
        self.advance(); // eat `show`
        self.expect(&TokenKind::LParen)?;
        let args = self.parse_arg_list(&TokenKind::RParen)?;
        self.expect(&TokenKind::RParen)?;
        self.expect(&TokenKind::Semicolon)?;
        Ok(ShowStmt {
            args,
            span: start.merge(self.previous_span()),
        })
    }

    /// `return;` or `return expr, ...;`
    fn parse_return_stmt(&mut self) -> ParseResult<ReturnStmt> {
        let start = self.current_span();
        self.advance(); // eat `return`
        let values = self.parse_arg_list(&TokenKind::Semicolon)?;
        self.expect(&TokenKind::Semicolon)?;
        Ok(ReturnStmt {
            values,
            span: start.merge(self.previous_span()),
        })
    }
}
