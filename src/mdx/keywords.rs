//! Keyword classification for the MDX lexer
//!
//! Uses compile-time perfect hashing (phf) for O(1) keyword lookup.
//! MDX keywords are case-insensitive; lookups lowercase the candidate
//! before probing the table.

use phf::phf_map;

use super::token::TokenKind;

/// Static map of keywords to their token kinds
static KEYWORDS: phf::Map<&'static str, TokenKind> = phf_map! {
    // Clause keywords
    "select" => TokenKind::Select,
    "from" => TokenKind::From,
    "where" => TokenKind::Where,
    "with" => TokenKind::With,
    "member" => TokenKind::Member,
    "set" => TokenKind::Set,
    "as" => TokenKind::As,
    "on" => TokenKind::On,
    "non" => TokenKind::Non,
    "empty" => TokenKind::Empty,
    "sap" => TokenKind::Sap,
    "variables" => TokenKind::Variables,
    "including" => TokenKind::Including,
    "excluding" => TokenKind::Excluding,

    // Axis names
    "columns" => TokenKind::Columns,
    "rows" => TokenKind::Rows,
    "pages" => TokenKind::Pages,
    "chapters" => TokenKind::Chapters,
    "sections" => TokenKind::Sections,

    // Word operators
    "and" => TokenKind::And,
    "or" => TokenKind::Or,
    "xor" => TokenKind::Xor,
    "not" => TokenKind::Not,
};

/// Look up a keyword and return its TokenKind
///
/// Returns None if the word is not a keyword.
#[inline]
pub fn lookup_keyword(word: &str) -> Option<TokenKind> {
    let lower = word.to_ascii_lowercase();
    KEYWORDS.get(lower.as_str()).copied()
}

/// Check if a word is an MDX keyword
#[inline]
pub fn is_keyword(word: &str) -> bool {
    let lower = word.to_ascii_lowercase();
    KEYWORDS.contains_key(lower.as_str())
}
