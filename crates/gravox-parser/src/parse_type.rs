//! Type annotations and parameter lists.

use gravox_lexer::token::TokenKind;
use gravox_types::ast::*;
use gravox_types::ErrorCode;

use crate::parser::{ParseResult, Parser};

impl<'src> Parser<'src> {
    /// `TypeName [ "[" "]" ]`
    pub(crate) fn parse_type_annotation(&mut self) -> ParseResult<TypeAnnotation> {
        let start = self.current_span();
        if !self.peek_kind().is_type() {
            return Err(self.error_at_current(
                ErrorCode::UNEXPECTED_TOKEN,
                format!("expected type name, got '{}'", self.peek_kind()),
            ));
        }
        let mut kind = TypeKind::Named(self.advance().kind.to_string());
        if self.eat(&TokenKind::LBracket) {
            self.expect(&TokenKind::RBracket)?;
            kind = TypeKind::Array(Box::new(kind));
        }
        Ok(TypeAnnotation {
            kind,
            span: start.merge(self.previous_span()),
        })
    }

    /// `"(" [ Param { "," Param } ] ")"` where `Param = Type name [ "=" expr ]`
    pub(crate) fn parse_param_list(&mut self) -> ParseResult<Vec<Param>> {
        self.expect(&TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.check_exact(&TokenKind::RParen) {
            loop {
                let start = self.current_span();
                let type_ann = self.parse_type_annotation()?;
                let name = self.expect_identifier()?;
                let default = if self.eat(&TokenKind::Eq) {
                    Some(self.parse_expression()?)
                } else {
                    None
                };
                params.push(Param {
                    type_ann,
                    name,
                    default,
                    span: start.merge(self.previous_span()),
                });
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(params)
    }
}
