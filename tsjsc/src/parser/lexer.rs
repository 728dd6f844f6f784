//! Tokenizer for TypeScript source.
//!
//! Only the declaration subset of the language is parsed downstream, but the
//! lexer has to get through arbitrary statements (function bodies, object
//! literals, template strings) so that the parser can skip them by bracket
//! depth. JSDoc blocks (`/** ... */`) are not discarded: the most recent one
//! is attached to the next token.

use crate::error::SyntaxError;

/// Token classification.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Identifier or keyword.
    Ident(String),
    /// String literal (quotes removed, escapes resolved).
    Str(String),
    /// Template literal (raw contents between the backticks).
    Template(String),
    /// Regular expression literal as written, slashes and flags included.
    Regex(String),
    /// Numeric literal as written in the source.
    Number(String),
    /// Punctuation.
    Punct(&'static str),
    /// End of input.
    Eof,
}

/// A token with its position and any preceding JSDoc block.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Inner text of the JSDoc comment directly before this token.
    pub doc: Option<String>,
    /// Whether a line break separates this token from the previous one.
    pub newline_before: bool,
}

impl Token {
    /// Whether this token is the given identifier or keyword.
    pub fn is_ident(&self, name: &str) -> bool {
        matches!(&self.kind, TokenKind::Ident(ident) if ident == name)
    }

    /// Whether this token is the given punctuation.
    pub fn is_punct(&self, punct: &str) -> bool {
        matches!(self.kind, TokenKind::Punct(p) if p == punct)
    }

    /// Whether this is the end-of-input marker.
    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Short description used in error messages.
    pub fn describe(&self) -> String {
        match &self.kind {
            TokenKind::Ident(name) => format!("'{}'", name),
            TokenKind::Str(value) => format!("string \"{}\"", value),
            TokenKind::Template(_) => "template literal".to_string(),
            TokenKind::Regex(raw) => format!("regular expression {}", raw),
            TokenKind::Number(raw) => format!("number {}", raw),
            TokenKind::Punct(p) => format!("'{}'", p),
            TokenKind::Eof => "end of file".to_string(),
        }
    }
}

/// Keywords after which a `/` starts a regular expression rather than a division.
const REGEX_KEYWORDS: &[&str] = &[
    "return", "typeof", "instanceof", "in", "of", "new", "delete", "void", "throw", "case", "do",
    "else", "yield", "await",
];

const PUNCTUATION: &[&str] = &[
    "...", "=>", "{", "}", "(", ")", "[", "]", "<", ">", ";", ":", ",", "?", "|", "&", "=", ".",
    "@", "!", "+", "-", "*", "/", "%", "^", "~", "#",
];

/// Tokenize TypeScript source.
pub fn tokenize(source: &str) -> Result<Vec<Token>, SyntaxError> {
    Lexer::new(source).run()
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    pending_doc: Option<String>,
    newline_seen: bool,
}

impl Lexer {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            pending_doc: None,
            newline_seen: false,
        }
    }

    fn run(mut self) -> Result<Vec<Token>, SyntaxError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia()?;
            let (line, column) = (self.line, self.column);
            let Some(c) = self.peek(0) else {
                tokens.push(self.token(TokenKind::Eof, line, column));
                return Ok(tokens);
            };

            let kind = if c == '"' || c == '\'' {
                TokenKind::Str(self.string(c)?)
            } else if c == '`' {
                TokenKind::Template(self.template()?)
            } else if c == '/' && regex_allowed(tokens.last()) {
                TokenKind::Regex(self.regex()?)
            } else if c.is_ascii_digit()
                || (c == '.' && self.peek(1).is_some_and(|n| n.is_ascii_digit()))
            {
                TokenKind::Number(self.number())
            } else if is_ident_start(c) {
                TokenKind::Ident(self.ident())
            } else {
                TokenKind::Punct(self.punct()?)
            };
            tokens.push(self.token(kind, line, column));
        }
    }

    fn token(&mut self, kind: TokenKind, line: usize, column: usize) -> Token {
        Token {
            kind,
            line,
            column,
            doc: self.pending_doc.take(),
            newline_before: std::mem::take(&mut self.newline_seen),
        }
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos).copied()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
            self.newline_seen = true;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn error(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError::new(self.line, self.column, message)
    }

    /// Skip whitespace and comments, remembering the last JSDoc block.
    fn skip_trivia(&mut self) -> Result<(), SyntaxError> {
        loop {
            match (self.peek(0), self.peek(1)) {
                (Some(c), _) if c.is_whitespace() => {
                    self.bump();
                }
                (Some('/'), Some('/')) => {
                    while let Some(c) = self.peek(0) {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                (Some('/'), Some('*')) => {
                    let is_doc = self.peek(2) == Some('*') && self.peek(3) != Some('/');
                    self.bump();
                    self.bump();
                    let mut text = String::new();
                    loop {
                        match (self.peek(0), self.peek(1)) {
                            (Some('*'), Some('/')) => {
                                self.bump();
                                self.bump();
                                break;
                            }
                            (Some(_), _) => {
                                if let Some(c) = self.bump() {
                                    text.push(c);
                                }
                            }
                            (None, _) => return Err(self.error("unterminated comment")),
                        }
                    }
                    if is_doc {
                        // Drop the second '*' of the opening "/**".
                        self.pending_doc = Some(text[1..].to_string());
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn string(&mut self, quote: char) -> Result<String, SyntaxError> {
        self.bump();
        let mut value = String::new();
        loop {
            match self.bump() {
                None | Some('\n') => return Err(self.error("unterminated string literal")),
                Some(c) if c == quote => return Ok(value),
                Some('\\') => self.escape(&mut value)?,
                Some(c) => value.push(c),
            }
        }
    }

    fn escape(&mut self, out: &mut String) -> Result<(), SyntaxError> {
        let Some(c) = self.bump() else {
            return Err(self.error("unterminated escape sequence"));
        };
        match c {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' => out.push('\0'),
            '\n' => {}
            'x' => {
                let hex: String = (0..2).filter_map(|_| self.bump()).collect();
                out.push(self.code_point(&hex)?);
            }
            'u' => {
                let hex: String = if self.peek(0) == Some('{') {
                    self.bump();
                    let mut hex = String::new();
                    while let Some(c) = self.bump() {
                        if c == '}' {
                            break;
                        }
                        hex.push(c);
                    }
                    hex
                } else {
                    (0..4).filter_map(|_| self.bump()).collect()
                };
                out.push(self.code_point(&hex)?);
            }
            other => out.push(other),
        }
        Ok(())
    }

    fn code_point(&self, hex: &str) -> Result<char, SyntaxError> {
        u32::from_str_radix(hex, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| self.error(format!("invalid escape '{}'", hex)))
    }

    /// Template literal, including nested `${ ... }` substitutions.
    fn template(&mut self) -> Result<String, SyntaxError> {
        self.bump();
        let mut raw = String::new();
        let mut depth = 0usize;
        loop {
            let Some(c) = self.bump() else {
                return Err(self.error("unterminated template literal"));
            };
            match c {
                '`' if depth == 0 => return Ok(raw),
                '\\' => {
                    raw.push(c);
                    if let Some(next) = self.bump() {
                        raw.push(next);
                    }
                    continue;
                }
                '$' if self.peek(0) == Some('{') => {
                    depth += 1;
                    raw.push(c);
                    if let Some(brace) = self.bump() {
                        raw.push(brace);
                    }
                    continue;
                }
                '{' if depth > 0 => depth += 1,
                '}' if depth > 0 => depth -= 1,
                _ => {}
            }
            raw.push(c);
        }
    }

    /// Regular expression literal; `/` inside a character class does not close it.
    fn regex(&mut self) -> Result<String, SyntaxError> {
        let mut raw = String::new();
        if let Some(slash) = self.bump() {
            raw.push(slash);
        }
        let mut in_class = false;
        loop {
            let c = match self.peek(0) {
                None | Some('\n') => return Err(self.error("unterminated regular expression")),
                Some(c) => c,
            };
            self.bump();
            raw.push(c);
            match c {
                '\\' => match self.peek(0) {
                    None | Some('\n') => {
                        return Err(self.error("unterminated regular expression"))
                    }
                    Some(escaped) => {
                        self.bump();
                        raw.push(escaped);
                    }
                },
                '[' => in_class = true,
                ']' => in_class = false,
                '/' if !in_class => break,
                _ => {}
            }
        }
        while let Some(flag) = self.peek(0).filter(|c| is_ident_continue(*c)) {
            raw.push(flag);
            self.bump();
        }
        Ok(raw)
    }

    fn number(&mut self) -> String {
        let mut raw = String::new();
        while let Some(c) = self.peek(0) {
            let exponent_sign = (c == '+' || c == '-')
                && matches!(raw.chars().last(), Some('e' | 'E'))
                && !raw.starts_with("0x")
                && !raw.starts_with("0X");
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || exponent_sign {
                raw.push(c);
                self.bump();
            } else {
                break;
            }
        }
        raw
    }

    fn ident(&mut self) -> String {
        let mut name = String::new();
        while let Some(c) = self.peek(0) {
            if is_ident_continue(c) {
                name.push(c);
                self.bump();
            } else {
                break;
            }
        }
        name
    }

    fn punct(&mut self) -> Result<&'static str, SyntaxError> {
        for punct in PUNCTUATION {
            let matches = punct
                .chars()
                .enumerate()
                .all(|(i, expected)| self.peek(i) == Some(expected));
            if matches {
                for _ in 0..punct.chars().count() {
                    self.bump();
                }
                return Ok(punct);
            }
        }
        let c = self.peek(0).unwrap_or('\0');
        Err(self.error(format!("unexpected character '{}'", c)))
    }
}

/// Whether a `/` after `previous` begins an expression operand.
fn regex_allowed(previous: Option<&Token>) -> bool {
    let Some(previous) = previous else {
        return true;
    };
    match &previous.kind {
        TokenKind::Punct(p) => !matches!(*p, ")" | "]" | "}" | "."),
        TokenKind::Ident(word) => REGEX_KEYWORDS.contains(&word.as_str()),
        _ => false,
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Parse a numeric literal as written in source (hex, octal, binary,
/// separators and bigint suffix included).
pub fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| *c != '_').collect();
    let cleaned = cleaned.strip_suffix('n').unwrap_or(&cleaned);
    let radix = match cleaned.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    match radix {
        Some(radix) => u64::from_str_radix(&cleaned[2..], radix)
            .ok()
            .map(|n| n as f64),
        None => cleaned.parse::<f64>().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_tokenize_interface_header() {
        assert_eq!(
            kinds("export interface Book {"),
            vec![
                TokenKind::Ident("export".to_string()),
                TokenKind::Ident("interface".to_string()),
                TokenKind::Ident("Book".to_string()),
                TokenKind::Punct("{"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_tokenize_strings_and_escapes() {
        assert_eq!(
            kinds(r#"'news\'paper' "a\nb" "A""#),
            vec![
                TokenKind::Str("news'paper".to_string()),
                TokenKind::Str("a\nb".to_string()),
                TokenKind::Str("A".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_doc_comment_attaches_to_next_token() {
        let tokens = tokenize("/** The name. */\nname: string; // trailing\n/* plain */ x").unwrap();
        assert_eq!(tokens[0].doc.as_deref(), Some(" The name. "));
        assert!(tokens[1].doc.is_none());
        let x = tokens.iter().find(|t| t.is_ident("x")).unwrap();
        assert!(x.doc.is_none());
    }

    #[test]
    fn test_arrow_and_spread_are_single_tokens() {
        assert_eq!(
            kinds("(...a) => b"),
            vec![
                TokenKind::Punct("("),
                TokenKind::Punct("..."),
                TokenKind::Ident("a".to_string()),
                TokenKind::Punct(")"),
                TokenKind::Punct("=>"),
                TokenKind::Ident("b".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_nested_generics_close_separately() {
        let closing = kinds("Array<Array<string>>")
            .into_iter()
            .filter(|k| *k == TokenKind::Punct(">"))
            .count();
        assert_eq!(closing, 2);
    }

    #[test]
    fn test_template_literal_with_substitution() {
        assert_eq!(
            kinds("`a${ {b: 1} }c` x"),
            vec![
                TokenKind::Template("a${ {b: 1} }c".to_string()),
                TokenKind::Ident("x".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_newline_tracking() {
        let tokens = tokenize("a\nb c").unwrap();
        assert!(!tokens[0].newline_before);
        assert!(tokens[1].newline_before);
        assert!(!tokens[2].newline_before);
        assert_eq!((tokens[1].line, tokens[1].column), (2, 1));
    }

    #[test]
    fn test_unterminated_string_is_error() {
        let err = tokenize("'abc").unwrap_err();
        assert_eq!(err.line, 1);
    }

    #[test]
    fn test_regex_literal_with_quote() {
        assert_eq!(
            kinds(r#"const re = /"/g;"#),
            vec![
                TokenKind::Ident("const".to_string()),
                TokenKind::Ident("re".to_string()),
                TokenKind::Punct("="),
                TokenKind::Regex(r#"/"/g"#.to_string()),
                TokenKind::Punct(";"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_regex_class_and_escapes() {
        let tokens = kinds(r"x = [/[/']+\//i, 'a'];");
        assert!(tokens.contains(&TokenKind::Regex(r"/[/']+\//i".to_string())));
        assert!(tokens.contains(&TokenKind::Str("a".to_string())));
    }

    #[test]
    fn test_slash_after_operand_is_division() {
        assert_eq!(
            kinds("a / b / c"),
            vec![
                TokenKind::Ident("a".to_string()),
                TokenKind::Punct("/"),
                TokenKind::Ident("b".to_string()),
                TokenKind::Punct("/"),
                TokenKind::Ident("c".to_string()),
                TokenKind::Eof,
            ]
        );
        assert!(kinds("return /x/.test(s)")
            .contains(&TokenKind::Regex("/x/".to_string())));
    }

    #[test]
    fn test_parse_number_forms() {
        assert_eq!(parse_number("42"), Some(42.0));
        assert_eq!(parse_number("1_000"), Some(1000.0));
        assert_eq!(parse_number("0xff"), Some(255.0));
        assert_eq!(parse_number("1e3"), Some(1000.0));
        assert_eq!(parse_number("10n"), Some(10.0));
        assert_eq!(parse_number("0.5"), Some(0.5));
    }
}
