//! Token types for the MDX lexer

use std::borrow::Cow;
use std::fmt;

/// A token produced by the lexer
///
/// Tokens reference the original input wherever possible. The only owned
/// text is a parameter expression, whose `]]` escapes are collapsed while
/// scanning and therefore no longer match any input slice.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    /// The kind of token
    pub kind: TokenKind,
    /// The raw text of the token
    pub text: Cow<'a, str>,
    /// Byte offset in the original input
    pub offset: usize,
}

impl<'a> Token<'a> {
    /// Create a token borrowing its text from the input
    pub fn new(kind: TokenKind, text: &'a str, offset: usize) -> Self {
        Self {
            kind,
            text: Cow::Borrowed(text),
            offset,
        }
    }

    /// Create a token carrying owned text
    pub fn owned(kind: TokenKind, text: String, offset: usize) -> Self {
        Self {
            kind,
            text: Cow::Owned(text),
            offset,
        }
    }

    /// Get the length of this token in bytes
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Check if the token text is empty
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind == TokenKind::Eof {
            write!(f, "<eof>")
        } else {
            write!(f, "{}", self.text)
        }
    }
}

/// The kind of token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // === Clause keywords ===
    /// "SELECT"
    Select,
    /// "FROM"
    From,
    /// "WHERE"
    Where,
    /// "WITH"
    With,
    /// "MEMBER"
    Member,
    /// "SET"
    Set,
    /// "AS"
    As,
    /// "ON"
    On,
    /// "NON" (first half of NON EMPTY)
    Non,
    /// "EMPTY" (second half of NON EMPTY)
    Empty,
    /// "SAP" (first half of SAP VARIABLES)
    Sap,
    /// "VARIABLES" (second half of SAP VARIABLES)
    Variables,
    /// "INCLUDING"
    Including,
    /// "EXCLUDING"
    Excluding,

    // === Axis names ===
    /// "COLUMNS"
    Columns,
    /// "ROWS"
    Rows,
    /// "PAGES"
    Pages,
    /// "CHAPTERS"
    Chapters,
    /// "SECTIONS"
    Sections,

    // === Word operators ===
    /// "AND"
    And,
    /// "OR"
    Or,
    /// "XOR"
    Xor,
    /// "NOT"
    Not,

    // === Names and literals ===
    /// A plain identifier
    Identifier,
    /// A bracketed identifier, text kept verbatim including brackets
    BracketedId,
    /// A numeric literal, lexical text preserved
    Number,
    /// A quoted string literal, text kept verbatim including quotes
    Str,
    /// A `$[namespace:expression]` parameter, text is `namespace:expression`
    Parameter,

    // === Punctuation ===
    /// "."
    Dot,
    /// ","
    Comma,
    /// "&" key-identifier marker
    Amp,
    /// ":"
    Colon,
    /// "("
    LParen,
    /// ")"
    RParen,
    /// "{"
    LBrace,
    /// "}"
    RBrace,

    // === Operators ===
    /// "+"
    Plus,
    /// "-"
    Minus,
    /// "*"
    Star,
    /// "/"
    Slash,
    /// "="
    Eq,
    /// "<>"
    Ne,
    /// "<"
    Lt,
    /// ">"
    Gt,
    /// "<="
    Le,
    /// ">="
    Ge,

    // === Special ===
    /// End of input
    Eof,
}

impl TokenKind {
    /// Check if this kind names a query axis (COLUMNS, ROWS, ...)
    pub fn is_axis_name(&self) -> bool {
        matches!(
            self,
            TokenKind::Columns
                | TokenKind::Rows
                | TokenKind::Pages
                | TokenKind::Chapters
                | TokenKind::Sections
        )
    }

    /// Check if this kind is a word keyword (reserved identifier)
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Select
                | TokenKind::From
                | TokenKind::Where
                | TokenKind::With
                | TokenKind::Member
                | TokenKind::Set
                | TokenKind::As
                | TokenKind::On
                | TokenKind::Non
                | TokenKind::Empty
                | TokenKind::Sap
                | TokenKind::Variables
                | TokenKind::Including
                | TokenKind::Excluding
                | TokenKind::And
                | TokenKind::Or
                | TokenKind::Xor
                | TokenKind::Not
        ) || self.is_axis_name()
    }

    /// Check if this kind is a comparison operator
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            TokenKind::Eq
                | TokenKind::Ne
                | TokenKind::Lt
                | TokenKind::Gt
                | TokenKind::Le
                | TokenKind::Ge
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Select => "SELECT",
            TokenKind::From => "FROM",
            TokenKind::Where => "WHERE",
            TokenKind::With => "WITH",
            TokenKind::Member => "MEMBER",
            TokenKind::Set => "SET",
            TokenKind::As => "AS",
            TokenKind::On => "ON",
            TokenKind::Non => "NON",
            TokenKind::Empty => "EMPTY",
            TokenKind::Sap => "SAP",
            TokenKind::Variables => "VARIABLES",
            TokenKind::Including => "INCLUDING",
            TokenKind::Excluding => "EXCLUDING",
            TokenKind::Columns => "COLUMNS",
            TokenKind::Rows => "ROWS",
            TokenKind::Pages => "PAGES",
            TokenKind::Chapters => "CHAPTERS",
            TokenKind::Sections => "SECTIONS",
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::Xor => "XOR",
            TokenKind::Not => "NOT",
            TokenKind::Identifier => "<identifier>",
            TokenKind::BracketedId => "<bracketed-identifier>",
            TokenKind::Number => "<number>",
            TokenKind::Str => "<string>",
            TokenKind::Parameter => "<parameter>",
            TokenKind::Dot => ".",
            TokenKind::Comma => ",",
            TokenKind::Amp => "&",
            TokenKind::Colon => ":",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Eq => "=",
            TokenKind::Ne => "<>",
            TokenKind::Lt => "<",
            TokenKind::Gt => ">",
            TokenKind::Le => "<=",
            TokenKind::Ge => ">=",
            TokenKind::Eof => "<eof>",
        };
        write!(f, "{}", name)
    }
}
