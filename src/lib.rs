//! # mdx-parser
//!
//! A parser and generator for MDX (MultiDimensional eXpressions), the
//! query language of OLAP servers. Query text parses into a statement
//! tree that can be inspected, rewritten through its builder methods and
//! printed back as canonical MDX.
//!
//! The supported grammar, loosely:
//!
//! ```text
//! statement  := [WITH formula+] SELECT [axis ("," axis)*] FROM cube
//!               [WHERE exp] [SAP VARIABLES variable ("," variable)*]
//! formula    := (MEMBER | SET) name AS (exp | "'" exp "'")
//! axis       := [NON EMPTY] exp ON (COLUMNS | ROWS | PAGES | CHAPTERS | SECTIONS)
//! variable   := name value+
//! value      := (INCLUDING | EXCLUDING) operand [":" operand]
//! ```
//!
//! Identifiers may be bracketed (`[Adventure Works]`, with `]]` escaping a
//! literal `]`), marked as keys with `&`, and chained with dots. Host
//! parameters are embedded as `$[namespace:expression]` and carried
//! through the tree unevaluated.
//!
//! # Example
//!
//! ```rust
//! use mdx_parser::{parse, AxisKind};
//!
//! let query = parse(
//!     "SELECT NON EMPTY [Measures].[Sales] ON COLUMNS, \
//!      [Product].members ON ROWS FROM [Sales] WHERE [Time].[1998]",
//! )
//! .unwrap();
//!
//! assert_eq!(query.axes().len(), 2);
//! assert!(query.axis(AxisKind::Columns).unwrap().non_empty);
//! assert_eq!(
//!     query.to_mdx(),
//!     "SELECT NON EMPTY [Measures].[Sales] ON COLUMNS, \
//!      [Product].members ON ROWS FROM [Sales] WHERE [Time].[1998]"
//! );
//! ```

pub mod mdx;

pub use mdx::{
    parse, AxisKind, CompoundId, Exp, ExpressionParameter, Formula, FormulaKind, FunCall, Lexer,
    Literal, LiteralKind, MdxStatement, NamePart, ParseError, Parser, Position, QueryAxis,
    SapValue, SapVariable, Syntax, Token, TokenKind,
};
