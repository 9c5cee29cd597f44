//! Declaration parsing.
//!
//! Handles the dispatch at the head of every statement in a program or
//! block: imports, `action` and type-led function declarations, `use`
//! aliases and typed variable declarations.

use gravox_lexer::token::TokenKind;
use gravox_types::ast::*;

use crate::parser::{ParseResult, Parser};

impl<'src> Parser<'src> {
    /// Parse one declaration, falling back to an ordinary statement.
    pub(crate) fn parse_declaration(&mut self) -> ParseResult<Stmt> {
        match self.peek_kind() {
            TokenKind::Import => self.parse_import().map(Stmt::Import),
            TokenKind::Action => self.parse_action_decl().map(Stmt::Action),
            TokenKind::Use => self.parse_alias().map(Stmt::Alias),
            kind if kind.is_type() => {
                if self.is_function_head() {
                    self.parse_typed_function_decl().map(Stmt::Action)
                } else {
                    self.parse_var_decl().map(Stmt::VarDecl)
                }
            }
            _ => self.parse_statement(),
        }
    }

    /// With the cursor on a type name: is this `type [ '[' ']' ] name (`?
    fn is_function_head(&self) -> bool {
        let mut offset = 1;
        if self.look_ahead(1) == &TokenKind::LBracket && self.look_ahead(2) == &TokenKind::RBracket
        {
            offset = 3;
        }
        matches!(self.look_ahead(offset), TokenKind::Identifier(_))
            && self.look_ahead(offset + 1) == &TokenKind::LParen
    }

    /// `type name [= expr];`
    fn parse_var_decl(&mut self) -> ParseResult<VarDecl> {
        let start = self.current_span();
        let type_ann = self.parse_type_annotation()?;
        let name = self.expect_identifier()?;
        let initializer = if self.eat(&TokenKind::Eq) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.expect(&TokenKind::Semicolon)?;
        Ok(VarDecl {
            type_ann,
            name,
            initializer,
            span: start.merge(self.previous_span()),
        })
    }

    /// `action name(params) { body }`
    fn parse_action_decl(&mut self) -> ParseResult<ActionDecl> {
        let start = self.current_span();
        self.advance(); // eat `action`
        let name = self.expect_identifier()?;
        let params = self.parse_param_list()?;
        let body = self.parse_block()?;
        Ok(ActionDecl {
            name,
            params,
            return_type: None,
            body,
            span: start.merge(self.previous_span()),
        })
    }

    /// `type name(params) { body }`
    fn parse_typed_function_decl(&mut self) -> ParseResult<ActionDecl> {
        let start = self.current_span();
        let return_type = self.parse_type_annotation()?;
        let name = self.expect_identifier()?;
        let params = self.parse_param_list()?;
        let body = self.parse_block()?;
        Ok(ActionDecl {
            name,
            params,
            return_type: Some(return_type),
            body,
            span: start.merge(self.previous_span()),
        })
    }

    /// `use original as alias;`
    fn parse_alias(&mut self) -> ParseResult<AliasStmt> {
        let start = self.current_span();
        self.advance(); // eat `use`
        let original = self.expect_identifier()?;
        self.expect(&TokenKind::As)?;
        let alias = self.expect_identifier()?;
        self.expect(&TokenKind::Semicolon)?;
        Ok(AliasStmt {
            original,
            alias,
            span: start.merge(self.previous_span()),
        })
    }

    /// `import "path";` or `import { a, b as c } from "path";`
    fn parse_import(&mut self) -> ParseResult<ImportStmt> {
        let start = self.current_span();
        self.advance(); // eat `import`

        let kind = if self.eat(&TokenKind::LBrace) {
            let mut items = Vec::new();
            if !self.check_exact(&TokenKind::RBrace) {
                loop {
                    let name = self.expect_identifier()?;
                    let alias = if self.eat(&TokenKind::As) {
                        Some(self.expect_identifier()?)
                    } else {
                        None
                    };
                    items.push(ImportItem { name, alias });
                    if !self.eat(&TokenKind::Comma) {
                        break;
                    }
                }
            }
            self.expect(&TokenKind::RBrace)?;
            self.expect(&TokenKind::From)?;
            ImportKind::Named(items)
        } else {
            ImportKind::Wildcard
        };

        let source = self.expect_string_literal()?;
        self.expect(&TokenKind::Semicolon)?;
        Ok(ImportStmt {
            kind,
            source,
            span: start.merge(self.previous_span()),
        })
    }
}
