//! MDX parsing and generation
//!
//! The pipeline is lexer to parser to statement tree; every tree node
//! implements `Display`, so a parsed statement prints back to canonical
//! MDX text.

pub mod ast;
pub mod error;
pub mod keywords;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod token;

pub use ast::{
    AxisKind, CompoundId, Exp, ExpressionParameter, Formula, FormulaKind, FunCall, Literal,
    LiteralKind, MdxStatement, NamePart, QueryAxis, SapValue, SapVariable, Syntax,
};
pub use error::{ParseError, Position};
pub use lexer::Lexer;
pub use parser::{parse, Parser, DEFAULT_MAX_DEPTH};
pub use token::{Token, TokenKind};
