//! Raw C/C++ lexer used to fill a translation unit's token buffer.
//!
//! Lexing is total: every byte of the input ends up in exactly one token, and
//! anything that cannot be classified becomes `UNKNOWN` instead of an error.
//! Preprocessor directives and macro invocations are returned as the tokens
//! spelled in the source; nothing is expanded.

mod cursor;

use cursor::{Cursor, EOF_CHAR};
use text_size::{TextRange, TextSize};

#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TokenKind {
    IDENT,
    KEYWORD,
    INT_NUMBER,
    FLOAT_NUMBER,
    CHAR_LITERAL,
    STRING_LITERAL,
    PUNCT,
    LINE_COMMENT,
    BLOCK_COMMENT,
    WHITESPACE,
    NEWLINE,
    UNKNOWN,
    EOF,
}

impl TokenKind {
    pub fn is_trivia(self) -> bool {
        matches!(self, TokenKind::WHITESPACE | TokenKind::NEWLINE)
    }

    pub fn is_comment(self) -> bool {
        matches!(self, TokenKind::LINE_COMMENT | TokenKind::BLOCK_COMMENT)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub range: TextRange,
}

pub struct Tokenizer<'a> {
    text: &'a str,
    cursor: Cursor<'a>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(text: &'a str) -> Self {
        assert!(u32::try_from(text.len()).is_ok(), "source text larger than 4 GiB");
        Self { text, cursor: Cursor::new(text) }
    }

    fn offset(&self) -> TextSize {
        TextSize::new(self.text.len() as u32) - self.cursor.remaining()
    }

    fn range(&self) -> TextRange {
        let end = self.offset();
        TextRange::new(end - self.cursor.pos_within_token(), end)
    }

    fn text(&self) -> &'a str {
        &self.text[self.range()]
    }

    /// Lexes the next token, trivia included. Returns `EOF` forever once the
    /// input is exhausted.
    pub fn next_token(&mut self) -> Token {
        self.cursor.reset_pos_within_token();
        let kind = self.token_kind();
        let range = self.range();
        self.cursor.reset_pos_within_token();
        Token { kind, range }
    }

    fn token_kind(&mut self) -> TokenKind {
        use TokenKind::*;

        match self.cursor.advance() {
            EOF_CHAR if self.cursor.pos_within_token() == TextSize::new(0) => EOF,
            '\n' => NEWLINE,
            '\r' => {
                self.cursor.eat('\n');
                NEWLINE
            }
            '\\' if matches!(self.cursor.peek(), '\n' | '\r') => {
                // Line splice.
                if self.cursor.advance() == '\r' {
                    self.cursor.eat('\n');
                }
                WHITESPACE
            }
            c if c.is_whitespace() => {
                self.cursor.advance_while(|c| c.is_whitespace() && c != '\n' && c != '\r');
                WHITESPACE
            }
            '/' if self.cursor.matches('/') => {
                self.cursor.advance_while(|c| c != '\n' && c != '\r');
                LINE_COMMENT
            }
            '/' if self.cursor.matches('*') => {
                self.cursor.advance();
                self.block_comment();
                BLOCK_COMMENT
            }
            '\'' => self.quoted('\'', CHAR_LITERAL),
            '"' => self.quoted('"', STRING_LITERAL),
            '.' if self.cursor.peek().is_ascii_digit() => self.number('.'),
            c @ '0'..='9' => self.number(c),
            'A'..='Z' | 'a'..='z' | '_' | '$' => self.ident_or_prefixed_literal(),
            c if is_punct_start(c) => {
                self.punct();
                PUNCT
            }
            _ => UNKNOWN,
        }
    }

    fn block_comment(&mut self) {
        loop {
            match self.cursor.advance() {
                '*' if self.cursor.matches('/') => {
                    self.cursor.advance();
                    return;
                }
                EOF_CHAR if self.cursor.is_eof() => return,
                _ => {}
            }
        }
    }

    /// Consumes a quoted literal whose opening quote was already eaten.
    /// Unterminated literals stop at the end of the line and lex as `UNKNOWN`.
    fn quoted(&mut self, quote: char, kind: TokenKind) -> TokenKind {
        loop {
            match self.cursor.peek() {
                c if c == quote => {
                    self.cursor.advance();
                    return kind;
                }
                '\\' => {
                    self.cursor.advance();
                    if !self.cursor.is_eof() {
                        self.cursor.advance();
                    }
                }
                '\n' | '\r' => return TokenKind::UNKNOWN,
                _ if self.cursor.is_eof() => return TokenKind::UNKNOWN,
                _ => {
                    self.cursor.advance();
                }
            }
        }
    }

    fn raw_string(&mut self) -> TokenKind {
        // R"delim( ... )delim"
        let delimiter_start = self.offset();
        self.cursor.advance_while(|c| c != '(' && c != '"' && !c.is_whitespace());
        let delimiter: String =
            self.text[TextRange::new(delimiter_start, self.offset())].to_owned();
        if !self.cursor.eat('(') {
            return TokenKind::UNKNOWN;
        }
        let terminator = format!("){delimiter}\"");
        loop {
            if self.cursor.is_eof() {
                return TokenKind::UNKNOWN;
            }
            let rest = &self.text[usize::from(self.offset())..];
            if rest.starts_with(&terminator) {
                for _ in terminator.chars() {
                    self.cursor.advance();
                }
                return TokenKind::STRING_LITERAL;
            }
            self.cursor.advance();
        }
    }

    fn ident_or_prefixed_literal(&mut self) -> TokenKind {
        self.cursor.advance_while(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');

        let text = self.text();
        let is_encoding_prefix = matches!(text, "L" | "u" | "U" | "u8");
        let is_raw_prefix = matches!(text, "R" | "LR" | "uR" | "UR" | "u8R");
        match self.cursor.peek() {
            '\'' if is_encoding_prefix => {
                self.cursor.advance();
                self.quoted('\'', TokenKind::CHAR_LITERAL)
            }
            '"' if is_encoding_prefix => {
                self.cursor.advance();
                self.quoted('"', TokenKind::STRING_LITERAL)
            }
            '"' if is_raw_prefix => {
                self.cursor.advance();
                self.raw_string()
            }
            _ if is_keyword(text) => TokenKind::KEYWORD,
            _ => TokenKind::IDENT,
        }
    }

    fn number(&mut self, first: char) -> TokenKind {
        let mut is_float = first == '.';
        let mut allow_hex = false;

        if first == '0' && matches!(self.cursor.peek(), 'x' | 'X') {
            self.cursor.advance();
            allow_hex = true;
        } else if first == '0' && matches!(self.cursor.peek(), 'b' | 'B') {
            self.cursor.advance();
        }

        loop {
            match self.cursor.peek() {
                '0'..='9' => {
                    self.cursor.advance();
                }
                'a'..='f' | 'A'..='F' if allow_hex => {
                    self.cursor.advance();
                }
                '\'' if self.cursor.second().is_ascii_alphanumeric() => {
                    // Digit separator.
                    self.cursor.advance();
                }
                '.' if !is_float => {
                    is_float = true;
                    self.cursor.advance();
                }
                'e' | 'E' if !allow_hex => {
                    is_float = true;
                    self.cursor.advance();
                    if matches!(self.cursor.peek(), '+' | '-') {
                        self.cursor.advance();
                    }
                }
                'p' | 'P' if allow_hex => {
                    is_float = true;
                    self.cursor.advance();
                    if matches!(self.cursor.peek(), '+' | '-') {
                        self.cursor.advance();
                    }
                }
                _ => break,
            }
        }

        // Suffixes: u, l, ll, f, z, user-defined literals.
        self.cursor.advance_while(|c| c.is_ascii_alphanumeric() || c == '_');

        if is_float { TokenKind::FLOAT_NUMBER } else { TokenKind::INT_NUMBER }
    }

    fn punct(&mut self) {
        let start = usize::from(self.offset()) - 1;
        let rest = &self.text[start..];
        let len = PUNCTUATORS
            .iter()
            .find(|punct| rest.starts_with(**punct))
            .map_or(1, |punct| punct.len());
        for _ in 1..len {
            self.cursor.advance();
        }
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        (token.kind != TokenKind::EOF).then_some(token)
    }
}

/// Lexes `text` and keeps every token a translation unit records: comments
/// stay, whitespace and newlines are dropped.
pub fn tokenize(text: &str) -> Vec<Token> {
    Tokenizer::new(text).filter(|token| !token.kind.is_trivia()).collect()
}

/// Longest first, so the first prefix match is the maximal munch.
const PUNCTUATORS: &[&str] = &[
    "<<=", ">>=", "...", "->*", "<=>", "::", "->", "++", "--", "<<", ">>", "<=", ">=", "==", "!=",
    "&&", "||", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", ".*", "##",
];

fn is_punct_start(c: char) -> bool {
    matches!(
        c,
        '{' | '}'
            | '['
            | ']'
            | '('
            | ')'
            | '#'
            | ';'
            | ':'
            | '?'
            | '.'
            | ','
            | '+'
            | '-'
            | '*'
            | '/'
            | '%'
            | '^'
            | '&'
            | '|'
            | '~'
            | '!'
            | '='
            | '<'
            | '>'
    )
}

pub fn is_keyword(text: &str) -> bool {
    matches!(
        text,
        "alignas"
            | "alignof"
            | "asm"
            | "auto"
            | "bool"
            | "break"
            | "case"
            | "catch"
            | "char"
            | "char8_t"
            | "char16_t"
            | "char32_t"
            | "class"
            | "co_await"
            | "co_return"
            | "co_yield"
            | "concept"
            | "const"
            | "consteval"
            | "constexpr"
            | "constinit"
            | "const_cast"
            | "continue"
            | "decltype"
            | "default"
            | "delete"
            | "do"
            | "double"
            | "dynamic_cast"
            | "else"
            | "enum"
            | "explicit"
            | "export"
            | "extern"
            | "false"
            | "float"
            | "for"
            | "friend"
            | "goto"
            | "if"
            | "inline"
            | "int"
            | "long"
            | "mutable"
            | "namespace"
            | "new"
            | "noexcept"
            | "nullptr"
            | "operator"
            | "private"
            | "protected"
            | "public"
            | "register"
            | "reinterpret_cast"
            | "requires"
            | "restrict"
            | "return"
            | "short"
            | "signed"
            | "sizeof"
            | "static"
            | "static_assert"
            | "static_cast"
            | "struct"
            | "switch"
            | "template"
            | "this"
            | "thread_local"
            | "throw"
            | "true"
            | "try"
            | "typedef"
            | "typeid"
            | "typename"
            | "union"
            | "unsigned"
            | "using"
            | "virtual"
            | "void"
            | "volatile"
            | "wchar_t"
            | "while"
    )
}
