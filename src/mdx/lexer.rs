//! Lexer for MDX statements
//!
//! Tokenizes MDX query text into a stream of tokens.
//!
//! # Features
//!
//! - Zero-copy tokenization (tokens reference the original input)
//! - Bracketed identifiers with `]]` escape pairs, stored verbatim
//! - `$[namespace:expression]` parameter extraction with nesting-aware
//!   delimiter scanning
//! - Case-insensitive keyword recognition
//!
//! # Example
//!
//! ```rust
//! use mdx_parser::mdx::Lexer;
//!
//! let input = "SELECT [Measures] ON COLUMNS FROM Sales";
//! let tokens = Lexer::tokenize(input).unwrap();
//! assert_eq!(tokens.len(), 7); // SELECT, [Measures], ON, COLUMNS, FROM, Sales, EOF
//! ```

use super::error::{ParseError, Position};
use super::keywords::lookup_keyword;
use super::token::{Token, TokenKind};

/// A lexer for MDX statements
///
/// Implements `Iterator` over `Result<Token, ParseError>`, allowing for
/// lazy tokenization. After the first error the iterator is exhausted.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    /// The input string being tokenized
    input: &'a str,
    /// Current byte position in the input
    position: usize,
    /// Whether we've emitted the EOF token
    eof_emitted: bool,
    /// Whether an error has been reported
    errored: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            eof_emitted: false,
            errored: false,
        }
    }

    /// Tokenize the whole input up front
    ///
    /// The returned vector always ends with an EOF token.
    pub fn tokenize(input: &'a str) -> Result<Vec<Token<'a>>, ParseError> {
        Lexer::new(input).collect()
    }

    /// Get the remaining input (for debugging)
    pub fn remaining(&self) -> &'a str {
        &self.input[self.position..]
    }

    /// Get the current position
    pub fn position(&self) -> usize {
        self.position
    }

    /// Peek at the next character without consuming it
    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// Peek at the character after the next one
    fn peek_second(&self) -> Option<char> {
        self.remaining().chars().nth(1)
    }

    /// Advance the position by n bytes
    fn advance(&mut self, n: usize) {
        self.position = (self.position + n).min(self.input.len());
    }

    /// Advance by one character, whatever its byte length
    fn advance_char(&mut self) {
        if let Some(c) = self.peek() {
            self.advance(c.len_utf8());
        }
    }

    /// Skip whitespace
    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance_char();
            } else {
                break;
            }
        }
    }

    /// Check if a character can start a plain identifier
    fn is_identifier_start(c: char) -> bool {
        c.is_alphabetic() || c == '_'
    }

    /// Check if a character is valid in a plain identifier
    fn is_identifier_char(c: char) -> bool {
        c.is_alphanumeric() || c == '_'
    }

    /// Build a lexical error at the given offset
    fn error_at(&self, message: &str, offset: usize) -> ParseError {
        ParseError::Lexical {
            message: message.to_string(),
            position: Position::at(self.input, offset),
        }
    }

    /// Scan a bracketed identifier segment
    ///
    /// The segment runs from the opening `[` through the terminating `]`.
    /// A `]]` pair is an escaped literal and is kept verbatim; unmatched
    /// inner `[` characters are ordinary text. No unescaping is performed.
    fn scan_bracketed_id(&mut self) -> Result<Token<'a>, ParseError> {
        let start = self.position;
        self.advance(1); // [
        loop {
            match self.peek() {
                None => return Err(self.error_at("unterminated bracketed identifier", start)),
                Some(']') => {
                    if self.peek_second() == Some(']') {
                        self.advance(2); // escaped pair, kept verbatim
                    } else {
                        self.advance(1);
                        let text = &self.input[start..self.position];
                        return Ok(Token::new(TokenKind::BracketedId, text, start));
                    }
                }
                Some(_) => self.advance_char(),
            }
        }
    }

    /// Scan a `$[namespace:expression]` parameter
    ///
    /// The namespace is everything before the first `:`. The expression is
    /// scanned with a single nesting depth shared across `[` `{` `(` opens
    /// and `]` `}` `)` closes; `"…"` quote spans are copied verbatim. A
    /// `]]` pair outside quotes is an escape: a single `]` is emitted and
    /// one nesting level closes. A lone `]` at depth zero terminates.
    fn scan_parameter(&mut self) -> Result<Token<'a>, ParseError> {
        let start = self.position;
        self.advance(2); // $[
        let ns_start = self.position;
        loop {
            match self.peek() {
                None => return Err(self.error_at("unterminated parameter expression", start)),
                Some(':') => break,
                Some(']') => {
                    return Err(self.error_at("missing ':' in parameter expression", start))
                }
                Some(_) => self.advance_char(),
            }
        }
        let namespace = &self.input[ns_start..self.position];
        self.advance(1); // :

        let mut text = String::with_capacity(namespace.len() + 16);
        text.push_str(namespace);
        text.push(':');

        let mut depth = 0usize;
        let mut in_quotes = false;
        loop {
            let Some(c) = self.peek() else {
                return Err(self.error_at("unterminated parameter expression", start));
            };
            match c {
                '"' => {
                    in_quotes = !in_quotes;
                    text.push(c);
                    self.advance(1);
                }
                _ if in_quotes => {
                    text.push(c);
                    self.advance_char();
                }
                '[' | '{' | '(' => {
                    depth += 1;
                    text.push(c);
                    self.advance(1);
                }
                '}' | ')' => {
                    depth = depth.saturating_sub(1);
                    text.push(c);
                    self.advance(1);
                }
                ']' => {
                    if self.peek_second() == Some(']') {
                        // escaped close: one ] survives, one level closes
                        text.push(']');
                        self.advance(2);
                        depth = depth.saturating_sub(1);
                    } else if depth == 0 {
                        self.advance(1);
                        return Ok(Token::owned(TokenKind::Parameter, text, start));
                    } else {
                        depth -= 1;
                        text.push(']');
                        self.advance(1);
                    }
                }
                _ => {
                    text.push(c);
                    self.advance_char();
                }
            }
        }
    }

    /// Scan a quoted string literal, keeping the quotes in the token text
    fn scan_string(&mut self, quote: char) -> Result<Token<'a>, ParseError> {
        let start = self.position;
        self.advance(1); // opening quote
        loop {
            match self.peek() {
                None => return Err(self.error_at("unterminated string literal", start)),
                Some(c) if c == quote => {
                    self.advance(1);
                    let text = &self.input[start..self.position];
                    return Ok(Token::new(TokenKind::Str, text, start));
                }
                Some(_) => self.advance_char(),
            }
        }
    }

    /// Scan a numeric literal (integer or decimal), text kept verbatim
    fn scan_number(&mut self) -> Token<'a> {
        let start = self.position;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.advance(1);
            } else {
                break;
            }
        }
        if self.peek() == Some('.') && self.peek_second().is_some_and(|c| c.is_ascii_digit()) {
            self.advance(1);
            while let Some(c) = self.peek() {
                if c.is_ascii_digit() {
                    self.advance(1);
                } else {
                    break;
                }
            }
        }
        Token::new(TokenKind::Number, &self.input[start..self.position], start)
    }

    /// Scan a plain identifier or keyword
    fn scan_identifier(&mut self) -> Token<'a> {
        let start = self.position;
        while let Some(c) = self.peek() {
            if Self::is_identifier_char(c) {
                self.advance_char();
            } else {
                break;
            }
        }
        let text = &self.input[start..self.position];
        let kind = lookup_keyword(text).unwrap_or(TokenKind::Identifier);
        Token::new(kind, text, start)
    }

    /// Emit a single-character symbol token
    fn symbol(&mut self, kind: TokenKind) -> Token<'a> {
        let start = self.position;
        self.advance(1);
        Token::new(kind, &self.input[start..self.position], start)
    }

    /// Emit a two-character symbol token
    fn symbol2(&mut self, kind: TokenKind) -> Token<'a> {
        let start = self.position;
        self.advance(2);
        Token::new(kind, &self.input[start..self.position], start)
    }

    /// Get the next token
    fn next_token(&mut self) -> Option<Result<Token<'a>, ParseError>> {
        if self.errored {
            return None;
        }

        self.skip_whitespace();

        if self.position >= self.input.len() {
            if self.eof_emitted {
                return None;
            }
            self.eof_emitted = true;
            return Some(Ok(Token::new(TokenKind::Eof, "", self.position)));
        }

        let c = self.peek()?;

        let token = match c {
            '[' => self.scan_bracketed_id(),
            '$' => {
                if self.peek_second() == Some('[') {
                    self.scan_parameter()
                } else {
                    Err(self.error_at("unexpected character '$'", self.position))
                }
            }
            '"' | '\'' => self.scan_string(c),
            '0'..='9' => Ok(self.scan_number()),
            '.' => Ok(self.symbol(TokenKind::Dot)),
            ',' => Ok(self.symbol(TokenKind::Comma)),
            '&' => Ok(self.symbol(TokenKind::Amp)),
            ':' => Ok(self.symbol(TokenKind::Colon)),
            '(' => Ok(self.symbol(TokenKind::LParen)),
            ')' => Ok(self.symbol(TokenKind::RParen)),
            '{' => Ok(self.symbol(TokenKind::LBrace)),
            '}' => Ok(self.symbol(TokenKind::RBrace)),
            '+' => Ok(self.symbol(TokenKind::Plus)),
            '-' => Ok(self.symbol(TokenKind::Minus)),
            '*' => Ok(self.symbol(TokenKind::Star)),
            '/' => Ok(self.symbol(TokenKind::Slash)),
            '=' => Ok(self.symbol(TokenKind::Eq)),
            '<' => match self.peek_second() {
                Some('=') => Ok(self.symbol2(TokenKind::Le)),
                Some('>') => Ok(self.symbol2(TokenKind::Ne)),
                _ => Ok(self.symbol(TokenKind::Lt)),
            },
            '>' => match self.peek_second() {
                Some('=') => Ok(self.symbol2(TokenKind::Ge)),
                _ => Ok(self.symbol(TokenKind::Gt)),
            },
            _ if Self::is_identifier_start(c) => Ok(self.scan_identifier()),
            _ => Err(self.error_at(
                &format!("unrecognized character '{}'", c),
                self.position,
            )),
        };

        if token.is_err() {
            self.errored = true;
        }
        Some(token)
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}
