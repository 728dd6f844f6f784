//! Type expression parsing.
//!
//! Precedence, loosest first: conditional, union, intersection, type
//! operators (`keyof`, `readonly`, `typeof`), postfix array/indexed access,
//! primary. Constructs without a schema mapping are still consumed fully and
//! come back as [`TypeExpr::Unsupported`].

use super::ast::{Keyword, LiteralType, TupleElement, TypeExpr};
use super::declarations::{MemberContext, ParseResult, Parser};
use super::lexer::{parse_number, TokenKind};
use crate::error::SyntaxError;

impl Parser {
    /// Parse a full type expression.
    pub(crate) fn parse_type(&mut self) -> ParseResult<TypeExpr> {
        let ty = self.parse_union()?;
        if self.peek().is_ident("extends") {
            self.next();
            self.parse_union()?;
            self.expect_punct("?")?;
            self.parse_type()?;
            self.expect_punct(":")?;
            self.parse_type()?;
            return Ok(TypeExpr::Unsupported("conditional type".to_string()));
        }
        Ok(ty)
    }

    /// Return type annotation, including `x is T` and `asserts x is T` predicates.
    pub(super) fn parse_return_type(&mut self) -> ParseResult<TypeExpr> {
        if self.peek().is_ident("asserts") && matches!(self.peek_at(1).kind, TokenKind::Ident(_))
        {
            self.next();
        }
        let ty = self.parse_type()?;
        if self.eat_ident("is") {
            self.parse_type()?;
            return Ok(TypeExpr::Keyword(Keyword::Boolean));
        }
        Ok(ty)
    }

    /// Named type with optional type arguments: `ns.Name<A, B>`.
    pub(super) fn parse_type_reference(&mut self) -> ParseResult<TypeExpr> {
        let mut name = self.expect_name()?;
        while self.peek().is_punct(".") {
            self.next();
            name.push('.');
            name.push_str(&self.expect_name()?);
        }
        let args = if self.peek().is_punct("<") {
            self.parse_type_args()?
        } else {
            Vec::new()
        };
        Ok(TypeExpr::Reference { name, args })
    }

    fn parse_type_args(&mut self) -> ParseResult<Vec<TypeExpr>> {
        self.expect_punct("<")?;
        let mut args = Vec::new();
        loop {
            if self.peek().is_punct(">") {
                break;
            }
            args.push(self.parse_type()?);
            if !self.eat_punct(",") {
                break;
            }
        }
        self.expect_punct(">")?;
        Ok(args)
    }

    fn parse_union(&mut self) -> ParseResult<TypeExpr> {
        self.eat_punct("|");
        let first = self.parse_intersection()?;
        if !self.peek().is_punct("|") {
            return Ok(first);
        }
        let mut members = vec![first];
        while self.eat_punct("|") {
            members.push(self.parse_intersection()?);
        }
        Ok(TypeExpr::Union(members))
    }

    fn parse_intersection(&mut self) -> ParseResult<TypeExpr> {
        self.eat_punct("&");
        let first = self.parse_type_operator()?;
        if !self.peek().is_punct("&") {
            return Ok(first);
        }
        let mut members = vec![first];
        while self.eat_punct("&") {
            members.push(self.parse_type_operator()?);
        }
        Ok(TypeExpr::Intersection(members))
    }

    fn parse_type_operator(&mut self) -> ParseResult<TypeExpr> {
        let operand_follows = !matches!(
            self.peek_at(1).kind,
            TokenKind::Punct(";" | "," | ">" | ")" | "]" | "}" | "=" | "|" | "&")
        );
        if !operand_follows {
            return self.parse_postfix();
        }

        if self.eat_ident("keyof") {
            self.parse_type_operator()?;
            return Ok(TypeExpr::Unsupported("keyof operator".to_string()));
        }
        if self.peek().is_ident("unique") && self.peek_at(1).is_ident("symbol") {
            self.next();
            self.next();
            return Ok(TypeExpr::Keyword(Keyword::Symbol));
        }
        if self.eat_ident("readonly") {
            return self.parse_type_operator();
        }
        if self.eat_ident("infer") {
            self.expect_name()?;
            return Ok(TypeExpr::Unsupported("infer type".to_string()));
        }
        if self.eat_ident("typeof") {
            self.parse_type_reference()?;
            return Ok(TypeExpr::Unsupported("typeof query".to_string()));
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> ParseResult<TypeExpr> {
        let mut ty = self.parse_primary()?;
        while self.peek().is_punct("[") && !self.peek().newline_before {
            self.next();
            if self.eat_punct("]") {
                ty = TypeExpr::Array(Box::new(ty));
            } else {
                self.parse_type()?;
                self.expect_punct("]")?;
                ty = TypeExpr::Unsupported("indexed access type".to_string());
            }
        }
        Ok(ty)
    }

    fn parse_primary(&mut self) -> ParseResult<TypeExpr> {
        let token = self.peek().clone();
        match &token.kind {
            TokenKind::Punct("(") => {
                if self.is_function_type_start() {
                    self.skip_function_type()?;
                    return Ok(TypeExpr::Function);
                }
                self.next();
                let ty = self.parse_type()?;
                self.expect_punct(")")?;
                Ok(ty)
            }
            TokenKind::Punct("<") => {
                self.skip_function_type()?;
                Ok(TypeExpr::Function)
            }
            TokenKind::Punct("{") => self.parse_object_type(),
            TokenKind::Punct("[") => self.parse_tuple(),
            TokenKind::Punct("-") => {
                self.next();
                let value = self.number_literal()?;
                Ok(TypeExpr::Literal(LiteralType::Number(-value)))
            }
            TokenKind::Str(value) => {
                self.next();
                Ok(TypeExpr::Literal(LiteralType::String(value.clone())))
            }
            TokenKind::Template(_) => {
                self.next();
                Ok(TypeExpr::Keyword(Keyword::String))
            }
            TokenKind::Number(_) => {
                let value = self.number_literal()?;
                Ok(TypeExpr::Literal(LiteralType::Number(value)))
            }
            TokenKind::Ident(word) => self.parse_named_primary(word),
            _ => Err(self.unexpected("type")),
        }
    }

    fn parse_named_primary(&mut self, word: &str) -> ParseResult<TypeExpr> {
        let opens_signature = self.peek_at(1).is_punct("(") || self.peek_at(1).is_punct("<");
        match word {
            "true" | "false" => {
                self.next();
                Ok(TypeExpr::Literal(LiteralType::Boolean(word == "true")))
            }
            "new" if opens_signature => {
                self.next();
                self.skip_function_type()?;
                Ok(TypeExpr::Function)
            }
            "abstract" if self.peek_at(1).is_ident("new") => {
                self.next();
                self.next();
                self.skip_function_type()?;
                Ok(TypeExpr::Function)
            }
            "this" => {
                self.next();
                Ok(TypeExpr::Unsupported("this type".to_string()))
            }
            "import" if self.peek_at(1).is_punct("(") => {
                self.next();
                self.skip_balanced();
                while self.eat_punct(".") {
                    self.expect_name()?;
                }
                if self.peek().is_punct("<") {
                    self.parse_type_args()?;
                }
                Ok(TypeExpr::Unsupported("import type".to_string()))
            }
            _ => match Keyword::from_ident(word) {
                Some(keyword) if !self.peek_at(1).is_punct(".") => {
                    self.next();
                    Ok(TypeExpr::Keyword(keyword))
                }
                _ => self.parse_type_reference(),
            },
        }
    }

    fn number_literal(&mut self) -> ParseResult<f64> {
        let token = self.next();
        match &token.kind {
            TokenKind::Number(raw) => parse_number(raw).ok_or_else(|| {
                SyntaxError::new(
                    token.line,
                    token.column,
                    format!("invalid number {}", raw),
                )
            }),
            _ => Err(SyntaxError::new(
                token.line,
                token.column,
                format!("expected number, found {}", token.describe()),
            )),
        }
    }

    /// Whether the `(` at the cursor opens a function type's parameter list.
    fn is_function_type_start(&self) -> bool {
        let mut depth = 0usize;
        let mut offset = 0;
        loop {
            let token = self.peek_at(offset);
            match token.kind {
                TokenKind::Eof => return false,
                TokenKind::Punct("(" | "[" | "{") => depth += 1,
                TokenKind::Punct(")" | "]" | "}") => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return self.peek_at(offset + 1).is_punct("=>");
                    }
                }
                _ => {}
            }
            offset += 1;
        }
    }

    /// `<T>(params) => Return`
    fn skip_function_type(&mut self) -> ParseResult<()> {
        self.parse_type_params()?;
        if !self.peek().is_punct("(") {
            return Err(self.unexpected("'('"));
        }
        self.skip_balanced();
        self.expect_punct("=>")?;
        self.parse_return_type()?;
        Ok(())
    }

    fn parse_object_type(&mut self) -> ParseResult<TypeExpr> {
        let mut offset = 1;
        while self.peek_at(offset).is_ident("readonly")
            || self.peek_at(offset).is_punct("+")
            || self.peek_at(offset).is_punct("-")
        {
            offset += 1;
        }
        let is_mapped = self.peek_at(offset).is_punct("[")
            && matches!(self.peek_at(offset + 1).kind, TokenKind::Ident(_))
            && self.peek_at(offset + 2).is_ident("in");
        if is_mapped {
            self.skip_balanced();
            return Ok(TypeExpr::Unsupported("mapped type".to_string()));
        }

        let members = self.parse_members(MemberContext::Interface)?;
        Ok(TypeExpr::Object(members))
    }

    fn parse_tuple(&mut self) -> ParseResult<TypeExpr> {
        self.expect_punct("[")?;
        let mut elements = Vec::new();
        loop {
            if self.eat_punct("]") {
                break;
            }
            let rest = self.eat_punct("...");
            let labeled = matches!(self.peek().kind, TokenKind::Ident(_))
                && (self.peek_at(1).is_punct(":")
                    || (self.peek_at(1).is_punct("?") && self.peek_at(2).is_punct(":")));
            let (ty, optional) = if labeled {
                self.next();
                let optional = self.eat_punct("?");
                self.expect_punct(":")?;
                (self.parse_type()?, optional)
            } else {
                let ty = self.parse_type()?;
                (ty, self.eat_punct("?"))
            };
            elements.push(TupleElement { ty, optional, rest });
            if !self.eat_punct(",") {
                self.expect_punct("]")?;
                break;
            }
        }
        Ok(TypeExpr::Tuple(elements))
    }
}
