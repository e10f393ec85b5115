//! Error types shared by the MDX lexer and parser

use std::fmt;

use thiserror::Error;

/// A location in the source text
///
/// Offsets are byte offsets into the original input; line and column are
/// 1-based and counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// Byte offset into the input
    pub offset: usize,
    /// 1-based line number
    pub line: u32,
    /// 1-based column number
    pub column: u32,
}

impl Position {
    /// Compute the position of a byte offset within `source`
    pub fn at(source: &str, offset: usize) -> Self {
        let offset = offset.min(source.len());
        let mut line = 1;
        let mut column = 1;
        for c in source[..offset].chars() {
            if c == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Self {
            offset,
            line,
            column,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Errors produced while turning MDX text into a statement tree
///
/// Parsing is one-shot: the first error aborts the whole parse and no
/// partial statement is ever returned.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    /// No valid token could be formed at this position
    #[error("lexical error at {position}: {message}")]
    Lexical { message: String, position: Position },

    /// The token stream does not match any grammar production
    #[error("syntax error at {position}: expected {expected}, found {found}")]
    Syntax {
        expected: String,
        found: String,
        position: Position,
    },

    /// Expression nesting exceeded the configured depth limit
    #[error("expression nesting exceeds {limit} levels at {position}")]
    ResourceLimit { limit: usize, position: Position },
}

impl ParseError {
    /// The position the error was reported at
    pub fn position(&self) -> Position {
        match self {
            ParseError::Lexical { position, .. }
            | ParseError::Syntax { position, .. }
            | ParseError::ResourceLimit { position, .. } => *position,
        }
    }
}
