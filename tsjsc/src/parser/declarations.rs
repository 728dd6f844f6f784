//! Statement and member parsing.
//!
//! The parser walks a module's top-level statements, keeps interfaces,
//! type aliases, enums and classes, and skips everything else by bracket
//! depth (with a newline heuristic standing in for automatic semicolon
//! insertion).

use super::ast::{
    Declaration, DeclarationKind, EnumMember, EnumValue, IndexSignature, Member,
    PropertySignature, SourceModule, TypeExpr, TypeParam,
};
use super::jsdoc::JsDoc;
use super::lexer::{parse_number, tokenize, Token, TokenKind};
use crate::error::SyntaxError;

pub(super) type ParseResult<T> = Result<T, SyntaxError>;

/// Keywords that begin a new statement when they start a line.
const STATEMENT_KEYWORDS: &[&str] = &[
    "interface", "type", "enum", "class", "export", "import", "declare", "const", "let", "var",
    "function", "abstract", "namespace", "module",
];

const MEMBER_MODIFIERS: &[&str] = &[
    "readonly", "public", "private", "protected", "static", "declare", "abstract", "override",
    "accessor",
];

/// Parse a module and return its type declarations in source order.
pub fn parse_module(source: &str) -> ParseResult<Vec<Declaration>> {
    Ok(parse_source(source)?.declarations)
}

/// Parse a module and also collect the specifiers it imports from.
pub fn parse_source(source: &str) -> ParseResult<SourceModule> {
    let tokens = tokenize(source)?;
    Parser::new(tokens).parse_source()
}

/// Where a member list appears; classes allow initializers and bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum MemberContext {
    Interface,
    Class,
}

/// Recursive-descent parser over a token stream.
#[derive(Debug)]
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    imports: Vec<String>,
}

impl Parser {
    /// Create a parser; the token stream must end with [`TokenKind::Eof`].
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            imports: Vec::new(),
        }
    }

    /// Parse all statements.
    pub fn parse_module(self) -> ParseResult<Vec<Declaration>> {
        Ok(self.parse_source()?.declarations)
    }

    /// Parse all statements, keeping import specifiers alongside.
    pub fn parse_source(mut self) -> ParseResult<SourceModule> {
        let mut declarations = Vec::new();
        while !self.peek().is_eof() {
            if let Some(declaration) = self.parse_statement()? {
                declarations.push(declaration);
            }
        }
        Ok(SourceModule {
            declarations,
            imports: self.imports,
        })
    }

    // =========================================================================
    // Token helpers
    // =========================================================================

    pub(super) fn peek(&self) -> &Token {
        self.peek_at(0)
    }

    pub(super) fn peek_at(&self, offset: usize) -> &Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[(self.pos + offset).min(last)]
    }

    pub(super) fn next(&mut self) -> Token {
        let token = self.peek().clone();
        if !token.is_eof() {
            self.pos += 1;
        }
        token
    }

    pub(super) fn eat_punct(&mut self, punct: &str) -> bool {
        if self.peek().is_punct(punct) {
            self.next();
            true
        } else {
            false
        }
    }

    pub(super) fn eat_ident(&mut self, name: &str) -> bool {
        if self.peek().is_ident(name) {
            self.next();
            true
        } else {
            false
        }
    }

    pub(super) fn expect_punct(&mut self, punct: &str) -> ParseResult<()> {
        if self.eat_punct(punct) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{}'", punct)))
        }
    }

    pub(super) fn expect_name(&mut self) -> ParseResult<String> {
        match &self.peek().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.next();
                Ok(name)
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    pub(super) fn unexpected(&self, expected: &str) -> SyntaxError {
        let token = self.peek();
        SyntaxError::new(
            token.line,
            token.column,
            format!("expected {}, found {}", expected, token.describe()),
        )
    }

    /// Skip one bracketed group starting at the current opener.
    pub(super) fn skip_balanced(&mut self) {
        let mut depth = 0usize;
        loop {
            let token = self.next();
            match token.kind {
                TokenKind::Eof => return,
                TokenKind::Punct("{" | "(" | "[") => depth += 1,
                TokenKind::Punct("}" | ")" | "]") => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return;
                    }
                }
                _ => {}
            }
        }
    }

    fn at_statement_start(&self) -> bool {
        let token = self.peek();
        token.newline_before
            && STATEMENT_KEYWORDS
                .iter()
                .any(|keyword| token.is_ident(keyword))
    }

    /// Skip a statement that declares nothing of interest.
    fn skip_statement(&mut self) {
        let mut depth = 0usize;
        let start = self.pos;
        loop {
            if self.peek().is_eof() {
                return;
            }
            if depth == 0 && self.pos > start && self.at_statement_start() {
                return;
            }
            let token = self.next();
            match token.kind {
                TokenKind::Punct("{" | "(" | "[") => depth += 1,
                TokenKind::Punct(closer @ ("}" | ")" | "]")) => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                    if depth == 0 && closer == "}" {
                        return;
                    }
                }
                TokenKind::Punct(";") if depth == 0 => return,
                _ => {}
            }
        }
    }

    /// Skip an import/export clause up to and including its module specifier,
    /// which is recorded.
    fn skip_module_clause(&mut self) {
        let start = self.pos;
        loop {
            if self.peek().is_eof() {
                return;
            }
            if self.pos > start && self.at_statement_start() {
                return;
            }
            if self.peek().is_punct("{") {
                self.skip_balanced();
                if !self.peek().is_ident("from") {
                    self.eat_punct(";");
                    return;
                }
                continue;
            }
            let token = self.next();
            match token.kind {
                TokenKind::Str(specifier) => {
                    self.imports.push(specifier);
                    self.eat_punct(";");
                    return;
                }
                TokenKind::Punct(";") => return,
                _ => {}
            }
        }
    }

    /// Skip an initializer expression up to `;`, `,`, a closing `}` or a line break.
    fn skip_initializer(&mut self) {
        let mut depth = 0usize;
        let mut consumed = false;
        loop {
            let token = self.peek();
            if token.is_eof() {
                return;
            }
            if depth == 0 {
                if token.is_punct(";") || token.is_punct(",") || token.is_punct("}") {
                    return;
                }
                if consumed && token.newline_before {
                    return;
                }
            }
            let token = self.next();
            consumed = true;
            match token.kind {
                TokenKind::Punct("{" | "(" | "[") => depth += 1,
                TokenKind::Punct("}" | ")" | "]") => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
    }

    fn skip_decorators(&mut self) -> ParseResult<()> {
        while self.eat_punct("@") {
            self.expect_name()?;
            while self.eat_punct(".") {
                self.expect_name()?;
            }
            if self.peek().is_punct("(") {
                self.skip_balanced();
            }
        }
        Ok(())
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn parse_statement(&mut self) -> ParseResult<Option<Declaration>> {
        let mut raw_doc = self.peek().doc.clone();
        self.skip_decorators()?;

        let mut exported = false;
        if self.eat_ident("export") {
            exported = true;
            if self.eat_ident("default") {
                let is_declaration = ["class", "interface", "abstract"]
                    .iter()
                    .any(|keyword| self.peek().is_ident(keyword));
                if !is_declaration {
                    self.skip_statement();
                    return Ok(None);
                }
            } else if self.peek().is_punct("{") || self.peek().is_punct("*") {
                self.skip_module_clause();
                return Ok(None);
            } else if self.peek().is_punct("=") || self.peek().is_ident("import") {
                self.skip_statement();
                return Ok(None);
            }
        }

        if self.peek().is_ident("import")
            && !self.peek_at(1).is_punct("(")
            && !self.peek_at(1).is_punct(".")
        {
            self.next();
            self.skip_module_clause();
            return Ok(None);
        }

        while self.peek().is_ident("declare") || self.peek().is_ident("abstract") {
            self.next();
        }
        if raw_doc.is_none() {
            raw_doc = self.peek().doc.clone();
        }
        let doc = JsDoc::from_raw(raw_doc.as_deref());
        let names_follow = matches!(self.peek_at(1).kind, TokenKind::Ident(_));

        let declaration = if self.peek().is_ident("interface") && names_follow {
            self.parse_interface(doc, exported)?
        } else if self.peek().is_ident("type") && names_follow {
            self.parse_alias(doc, exported)?
        } else if self.peek().is_ident("enum") && names_follow {
            self.parse_enum(doc, exported)?
        } else if self.peek().is_ident("const") && self.peek_at(1).is_ident("enum") {
            self.next();
            self.parse_enum(doc, exported)?
        } else if self.peek().is_ident("class") && names_follow {
            self.parse_class(doc, exported)?
        } else {
            self.skip_statement();
            return Ok(None);
        };
        Ok(Some(declaration))
    }

    fn parse_interface(&mut self, doc: JsDoc, exported: bool) -> ParseResult<Declaration> {
        self.next();
        let line = self.peek().line;
        let name = self.expect_name()?;
        let type_params = self.parse_type_params()?;

        let mut extends = Vec::new();
        if self.eat_ident("extends") {
            loop {
                extends.push(self.parse_type_reference()?);
                if !self.eat_punct(",") {
                    break;
                }
            }
        }

        let members = self.parse_members(MemberContext::Interface)?;
        Ok(Declaration {
            name,
            kind: DeclarationKind::Interface { extends, members },
            type_params,
            doc,
            exported,
            line,
        })
    }

    fn parse_alias(&mut self, doc: JsDoc, exported: bool) -> ParseResult<Declaration> {
        self.next();
        let line = self.peek().line;
        let name = self.expect_name()?;
        let type_params = self.parse_type_params()?;
        self.expect_punct("=")?;
        let ty = self.parse_type()?;
        self.eat_punct(";");
        Ok(Declaration {
            name,
            kind: DeclarationKind::Alias(ty),
            type_params,
            doc,
            exported,
            line,
        })
    }

    fn parse_enum(&mut self, doc: JsDoc, exported: bool) -> ParseResult<Declaration> {
        self.next();
        let line = self.peek().line;
        let name = self.expect_name()?;
        self.expect_punct("{")?;

        let mut members = Vec::new();
        let mut next_auto = Some(0.0);
        loop {
            if self.eat_punct("}") {
                break;
            }
            if self.eat_punct(",") {
                continue;
            }
            if self.peek().is_eof() {
                return Err(self.unexpected("'}'"));
            }
            let member_name = self.parse_property_name()?;
            let value = if self.eat_punct("=") {
                self.parse_enum_initializer()
            } else {
                next_auto.map_or(EnumValue::Computed, EnumValue::Number)
            };
            next_auto = match value {
                EnumValue::Number(n) => Some(n + 1.0),
                EnumValue::String(_) | EnumValue::Computed => None,
            };
            members.push(EnumMember {
                name: member_name,
                value,
            });
        }

        Ok(Declaration {
            name,
            kind: DeclarationKind::Enum(members),
            type_params: Vec::new(),
            doc,
            exported,
            line,
        })
    }

    fn parse_enum_initializer(&mut self) -> EnumValue {
        let literal = match self.peek().kind.clone() {
            TokenKind::Str(value) if self.ends_enum_member(1) => {
                Some((1, EnumValue::String(value)))
            }
            TokenKind::Template(raw) if self.ends_enum_member(1) && !raw.contains("${") => {
                Some((1, EnumValue::String(raw)))
            }
            TokenKind::Number(raw) if self.ends_enum_member(1) => {
                parse_number(&raw).map(|n| (1, EnumValue::Number(n)))
            }
            TokenKind::Punct("-") if self.ends_enum_member(2) => match &self.peek_at(1).kind {
                TokenKind::Number(raw) => parse_number(raw).map(|n| (2, EnumValue::Number(-n))),
                _ => None,
            },
            _ => None,
        };

        match literal {
            Some((consumed, value)) => {
                for _ in 0..consumed {
                    self.next();
                }
                value
            }
            None => {
                self.skip_initializer();
                EnumValue::Computed
            }
        }
    }

    fn ends_enum_member(&self, offset: usize) -> bool {
        let token = self.peek_at(offset);
        token.is_punct(",") || token.is_punct("}")
    }

    fn parse_class(&mut self, doc: JsDoc, exported: bool) -> ParseResult<Declaration> {
        self.next();
        let line = self.peek().line;
        let name = self.expect_name()?;
        let type_params = self.parse_type_params()?;

        let extends = if self.eat_ident("extends") {
            Some(self.parse_type_reference()?)
        } else {
            None
        };
        if self.eat_ident("implements") {
            loop {
                self.parse_type_reference()?;
                if !self.eat_punct(",") {
                    break;
                }
            }
        }

        let members = self.parse_members(MemberContext::Class)?;
        Ok(Declaration {
            name,
            kind: DeclarationKind::Class { extends, members },
            type_params,
            doc,
            exported,
            line,
        })
    }

    /// `<T, U extends X = Y>`; constraints are parsed and dropped.
    pub(super) fn parse_type_params(&mut self) -> ParseResult<Vec<TypeParam>> {
        let mut params = Vec::new();
        if !self.eat_punct("<") {
            return Ok(params);
        }
        loop {
            if self.peek().is_punct(">") {
                break;
            }
            while ["in", "out", "const"].iter().any(|m| self.peek().is_ident(m))
                && matches!(self.peek_at(1).kind, TokenKind::Ident(_))
            {
                self.next();
            }
            let name = self.expect_name()?;
            if self.eat_ident("extends") {
                self.parse_type()?;
            }
            let default = if self.eat_punct("=") {
                Some(self.parse_type()?)
            } else {
                None
            };
            params.push(TypeParam { name, default });
            if !self.eat_punct(",") {
                break;
            }
        }
        self.expect_punct(">")?;
        Ok(params)
    }

    // =========================================================================
    // Members
    // =========================================================================

    /// `{ member; member, ... }`
    pub(super) fn parse_members(&mut self, context: MemberContext) -> ParseResult<Vec<Member>> {
        self.expect_punct("{")?;
        let mut members = Vec::new();
        loop {
            if self.eat_punct("}") {
                return Ok(members);
            }
            if self.eat_punct(";") || self.eat_punct(",") {
                continue;
            }
            if self.peek().is_eof() {
                return Err(self.unexpected("'}'"));
            }
            if let Some(member) = self.parse_member(context)? {
                members.push(member);
            }
        }
    }

    fn starts_member_name(token: &Token) -> bool {
        matches!(
            token.kind,
            TokenKind::Ident(_) | TokenKind::Str(_) | TokenKind::Number(_)
        ) || token.is_punct("[")
            || token.is_punct("#")
    }

    fn parse_member(&mut self, context: MemberContext) -> ParseResult<Option<Member>> {
        let doc = JsDoc::from_raw(self.peek().doc.as_deref());
        self.skip_decorators()?;

        if context == MemberContext::Class
            && self.peek().is_ident("static")
            && self.peek_at(1).is_punct("{")
        {
            self.next();
            self.skip_balanced();
            return Ok(None);
        }

        let mut readonly = false;
        let mut hidden = false;
        while MEMBER_MODIFIERS.iter().any(|m| self.peek().is_ident(m))
            && Self::starts_member_name(self.peek_at(1))
        {
            let modifier = self.next();
            if modifier.is_ident("readonly") {
                readonly = true;
            }
            if ["private", "protected", "static"]
                .iter()
                .any(|m| modifier.is_ident(m))
            {
                hidden = true;
            }
        }

        let token = self.peek().clone();
        if token.is_punct("(") || token.is_punct("<") {
            self.skip_signature(context)?;
            return Ok(Some(Member::Method {
                name: "(call)".to_string(),
            }));
        }
        if token.is_ident("new") && (self.peek_at(1).is_punct("(") || self.peek_at(1).is_punct("<"))
        {
            self.next();
            self.skip_signature(context)?;
            return Ok(Some(Member::Method {
                name: "new".to_string(),
            }));
        }
        if (token.is_ident("get") || token.is_ident("set"))
            && Self::starts_member_name(self.peek_at(1))
        {
            self.next();
            let name = self.parse_property_name()?;
            self.skip_signature(context)?;
            return Ok(Some(Member::Method { name }));
        }

        if token.is_punct("[") {
            return self.parse_bracketed_member(context);
        }

        if self.eat_punct("#") {
            hidden = true;
        }
        let name = self.parse_property_name()?;
        let optional = self.eat_punct("?");
        self.eat_punct("!");

        if self.peek().is_punct("(") || self.peek().is_punct("<") {
            self.skip_signature(context)?;
            return Ok(Some(Member::Method { name }));
        }

        let ty = if self.eat_punct(":") {
            Some(self.parse_type()?)
        } else {
            None
        };
        if context == MemberContext::Class && self.eat_punct("=") {
            self.skip_initializer();
        }
        let terminated = {
            let token = self.peek();
            token.is_punct(";") || token.is_punct(",") || token.is_punct("}") || token.newline_before
        };
        if !terminated {
            return Err(self.unexpected("';'"));
        }
        if hidden {
            return Ok(None);
        }

        Ok(Some(Member::Property(PropertySignature {
            name,
            optional,
            readonly,
            ty,
            doc,
        })))
    }

    /// Index signature, or a computed member name that is skipped.
    fn parse_bracketed_member(&mut self, context: MemberContext) -> ParseResult<Option<Member>> {
        let is_index = matches!(self.peek_at(1).kind, TokenKind::Ident(_))
            && self.peek_at(2).is_punct(":");
        if is_index {
            self.next();
            self.next();
            self.next();
            let key = self.parse_type()?;
            self.expect_punct("]")?;
            self.eat_punct("?");
            self.expect_punct(":")?;
            let value = self.parse_type()?;
            return Ok(Some(Member::Index(IndexSignature { key, value })));
        }

        self.skip_balanced();
        self.eat_punct("?");
        self.eat_punct("!");
        if self.peek().is_punct("(") || self.peek().is_punct("<") {
            self.skip_signature(context)?;
            return Ok(Some(Member::Method {
                name: "[computed]".to_string(),
            }));
        }
        if self.eat_punct(":") {
            self.parse_type()?;
        }
        if context == MemberContext::Class && self.eat_punct("=") {
            self.skip_initializer();
        }
        Ok(None)
    }

    pub(super) fn parse_property_name(&mut self) -> ParseResult<String> {
        let name = match &self.peek().kind {
            TokenKind::Ident(name) | TokenKind::Str(name) | TokenKind::Number(name) => name.clone(),
            _ => return Err(self.unexpected("property name")),
        };
        self.next();
        Ok(name)
    }

    /// Skip `<T>(params): Return` and, in classes, a method body.
    fn skip_signature(&mut self, context: MemberContext) -> ParseResult<()> {
        self.parse_type_params()?;
        if !self.peek().is_punct("(") {
            return Err(self.unexpected("'('"));
        }
        self.skip_balanced();
        if self.eat_punct(":") {
            self.parse_return_type()?;
        }
        if context == MemberContext::Class && self.peek().is_punct("{") {
            self.skip_balanced();
        }
        Ok(())
    }
}
