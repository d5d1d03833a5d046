use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::str::Chars;
use lazy_static::lazy_static;
use crate::util;

#[cfg(test)]
mod tests;

lazy_static! {
    static ref KEYWORDS: HashMap<&'static str, TokenType> = HashMap::from([
        ("fn", TokenType::Function),
        ("let", TokenType::Let),
        ("if", TokenType::If),
        ("else", TokenType::Else),
        ("return", TokenType::Return),
        ("true", TokenType::True),
        ("false", TokenType::False),
    ]);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenPos {
    pub line: i32,
    pub column: i32,
}

impl TokenPos {
    pub fn new(line: i32, column: i32) -> TokenPos {
        TokenPos { line, column }
    }

    pub fn begin() -> TokenPos {
        TokenPos::new(1, 1)
    }
}

impl Display for TokenPos {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[line {} column {}]", self.line, self.column)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TokenType {
    Illegal,

    ParenthesisLeft, ParenthesisRight,
    BracketLeft, BracketRight,
    SquareBracketLeft, SquareBracketRight,
    Comma, Semicolon,

    Assign, Equal,
    Not, NotEqual,
    Greater, GreaterEqual,
    Less, LessEqual,

    Plus, PlusAssign,
    Minus, MinusAssign,
    Multiply, MultiplyAssign,
    Divide, DivideAssign,

    Identifier,
    Int,
    String,

    // Keywords
    Function,
    Let,
    True, False,
    If, Else,
    Return,

    // EOF
    Eof,
}

impl Display for TokenType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TokenType::Illegal => "ILLEGAL",
            TokenType::ParenthesisLeft => "(",
            TokenType::ParenthesisRight => ")",
            TokenType::BracketLeft => "{",
            TokenType::BracketRight => "}",
            TokenType::SquareBracketLeft => "[",
            TokenType::SquareBracketRight => "]",
            TokenType::Comma => ",",
            TokenType::Semicolon => ";",
            TokenType::Assign => "=",
            TokenType::Equal => "==",
            TokenType::Not => "!",
            TokenType::NotEqual => "!=",
            TokenType::Greater => ">",
            TokenType::GreaterEqual => ">=",
            TokenType::Less => "<",
            TokenType::LessEqual => "<=",
            TokenType::Plus => "+",
            TokenType::PlusAssign => "+=",
            TokenType::Minus => "-",
            TokenType::MinusAssign => "-=",
            TokenType::Multiply => "*",
            TokenType::MultiplyAssign => "*=",
            TokenType::Divide => "/",
            TokenType::DivideAssign => "/=",
            TokenType::Identifier => "IDENT",
            TokenType::Int => "INT",
            TokenType::String => "STRING",
            TokenType::Function => "FUNCTION",
            TokenType::Let => "LET",
            TokenType::True => "TRUE",
            TokenType::False => "FALSE",
            TokenType::If => "IF",
            TokenType::Else => "ELSE",
            TokenType::Return => "RETURN",
            TokenType::Eof => "EOF",
        };

        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    token_type: TokenType,
    literal: String,
    start: TokenPos, end: TokenPos,
}

impl Token {
    pub fn new(token_type: TokenType, literal: String, start: TokenPos, end: TokenPos) -> Token {
        Token {
            token_type, literal,
            start, end
        }
    }

    pub fn eof() -> Token {
        Token {
            token_type: TokenType::Eof,
            literal: String::new(),
            start: TokenPos::begin(), end: TokenPos::begin(),
        }
    }

    pub fn token_type(&self) -> TokenType { self.token_type }
    pub fn literal(&self) -> &str { &self.literal }
    pub fn start(&self) -> &TokenPos { &self.start }
    pub fn end(&self) -> &TokenPos { &self.end }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.token_type {
            TokenType::Eof => write!(f, "{} EOF", self.start),
            TokenType::String => write!(f, "{} STRING `\"{}\"`", self.start, self.literal),
            token_type => write!(f, "{} {} `{}`", self.start, token_type, self.literal),
        }
    }
}

/// Scans the whole source, including the trailing `Eof` token.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();

    loop {
        let token = lexer.next_token();
        let done = token.token_type() == TokenType::Eof;
        tokens.push(token);

        if done {
            return tokens;
        }
    }
}

pub struct Lexer<'source> {
    input: &'source str,

    chars: Chars<'source>,
    peek_1: Option<char>,

    start_index: usize,
    current_index: usize,

    start_pos: TokenPos,
    current_pos: TokenPos,
}

impl<'source> Lexer<'source> {
    pub fn new(source: &'source str) -> Lexer<'source> {
        Lexer {
            input: source,

            chars: source.chars(),
            peek_1: None,

            start_index: 0,
            current_index: 0,

            start_pos: TokenPos::begin(),
            current_pos: TokenPos::begin(),
        }
    }

    /// Returns the next token. Once the input is exhausted, every call yields `Eof`.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        self.start_index = self.current_index;
        self.start_pos = self.current_pos;

        let c = match self.consume() {
            Some(c) => c,
            None => return self.make_token(TokenType::Eof),
        };

        match c {
            '(' => self.make_token(TokenType::ParenthesisLeft),
            ')' => self.make_token(TokenType::ParenthesisRight),
            '{' => self.make_token(TokenType::BracketLeft),
            '}' => self.make_token(TokenType::BracketRight),
            '[' => self.make_token(TokenType::SquareBracketLeft),
            ']' => self.make_token(TokenType::SquareBracketRight),
            ',' => self.make_token(TokenType::Comma),
            ';' => self.make_token(TokenType::Semicolon),

            '=' => self.make_either('=', TokenType::Equal, TokenType::Assign),
            '!' => self.make_either('=', TokenType::NotEqual, TokenType::Not),
            '>' => self.make_either('=', TokenType::GreaterEqual, TokenType::Greater),
            '<' => self.make_either('=', TokenType::LessEqual, TokenType::Less),
            '+' => self.make_either('=', TokenType::PlusAssign, TokenType::Plus),
            '-' => self.make_either('=', TokenType::MinusAssign, TokenType::Minus),
            '*' => self.make_either('=', TokenType::MultiplyAssign, TokenType::Multiply),
            '/' => self.make_either('=', TokenType::DivideAssign, TokenType::Divide),

            '"' => self.scan_string(),
            c if util::is_digit(c) => self.scan_number(),
            c if util::is_letter(c) => self.scan_identifier(),

            _ => self.make_token(TokenType::Illegal),
        }
    }

    fn scan_string(&mut self) -> Token {
        while let Some(c) = self.peek() {
            if c == '"' {
                break;
            }

            self.consume();
        }

        let content_end = self.current_index;

        // Unterminated strings run up to the end of the input
        if self.peek().is_some() {
            self.consume(); // the trailing '"'
        }

        // Don't add leading and trailing '"' characters to token
        Token {
            token_type: TokenType::String,
            literal: self.input[(self.start_index + 1)..content_end].to_owned(),
            start: self.start_pos, end: self.current_pos,
        }
    }

    fn scan_number(&mut self) -> Token {
        while let Some(c) = self.peek() {
            if !util::is_digit(c) {
                break;
            }

            self.consume();
        }

        self.make_token(TokenType::Int)
    }

    fn scan_identifier(&mut self) -> Token {
        while let Some(c) = self.peek() {
            if !util::is_letter(c) {
                break;
            }

            self.consume();
        }

        let name = &self.input[self.start_index..self.current_index];
        let token_type = KEYWORDS.get(name).copied().unwrap_or(TokenType::Identifier);

        Token { literal: name.to_owned(), token_type, start: self.start_pos, end: self.current_pos }
    }

    fn make_either(&mut self, second: char, long: TokenType, short: TokenType) -> Token {
        if self.expect(second) {
            self.make_token(long)
        } else {
            self.make_token(short)
        }
    }

    fn make_token(&self, token_type: TokenType) -> Token {
        let literal = self.input[self.start_index..self.current_index].to_owned();
        Token::new(token_type, literal, self.start_pos, self.current_pos)
    }

    fn consume(&mut self) -> Option<char> {
        let c = self.peek_1.take().or_else(|| self.chars.next())?;
        self.current_index += c.len_utf8();

        if c == '\n' {
            self.current_pos.line += 1;
            self.current_pos.column = 1;
        } else {
            self.current_pos.column += 1;
        }

        Some(c)
    }

    fn peek(&mut self) -> Option<char> {
        if self.peek_1.is_none() {
            self.peek_1 = self.chars.next();
        }

        self.peek_1
    }

    fn expect(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.consume();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !util::is_whitespace(c) {
                return;
            }

            self.consume();
        }
    }
}
