//! Recursive descent parser for MDX statements
//!
//! Consumes the token stream produced by [`Lexer`](super::lexer::Lexer)
//! and builds an [`MdxStatement`] tree. Parsing is one-shot: the first
//! lexical or syntax error aborts with a [`ParseError`] carrying the
//! source position.
//!
//! Operator precedence, loosest first: `OR`/`XOR`, `AND`, `NOT`,
//! comparisons, `+`/`-`, `*`/`/`, unary sign, primary. Binary operators
//! are left associative and fold into nested two-argument infix calls.
//!
//! # Example
//!
//! ```rust
//! use mdx_parser::mdx::parse;
//!
//! let query = parse("SELECT [Measures].[Sales] ON COLUMNS FROM [Sales]").unwrap();
//! assert_eq!(query.to_mdx(), "SELECT [Measures].[Sales] ON COLUMNS FROM [Sales]");
//! ```

use tracing::debug;

use super::ast::{
    AxisKind, CompoundId, Exp, ExpressionParameter, Formula, FormulaKind, FunCall, Literal,
    LiteralKind, MdxStatement, QueryAxis, SapValue, SapVariable, Syntax,
};
use super::error::{ParseError, Position};
use super::lexer::Lexer;
use super::token::{Token, TokenKind};

/// Default bound on expression nesting depth
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Parse an MDX statement
pub fn parse(input: &str) -> Result<MdxStatement, ParseError> {
    Parser::new(input).parse()
}

/// A parser for MDX statements
pub struct Parser<'a> {
    /// The original input, for error positions and quoted re-parsing
    input: &'a str,
    /// The token stream, always terminated by an EOF token
    tokens: Vec<Token<'a>>,
    /// Index of the current token
    pos: usize,
    /// Current expression nesting depth
    depth: usize,
    /// Bound on expression nesting depth
    max_depth: usize,
}

impl<'a> Parser<'a> {
    /// Create a parser for the given input
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            tokens: Vec::new(),
            pos: 0,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Override the expression nesting depth limit
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parse the input as a complete statement
    pub fn parse(mut self) -> Result<MdxStatement, ParseError> {
        self.tokens = Lexer::tokenize(self.input)?;
        let statement = self.parse_statement()?;
        if !self.check(TokenKind::Eof) {
            return Err(self.err_expected("end of statement"));
        }
        debug!(
            formulas = statement.formulas().len(),
            axes = statement.axes().len(),
            "parsed MDX statement"
        );
        Ok(statement)
    }

    /// Parse the input as a single expression
    pub fn parse_expression(mut self) -> Result<Exp, ParseError> {
        self.tokens = Lexer::tokenize(self.input)?;
        let exp = self.parse_expr()?;
        if !self.check(TokenKind::Eof) {
            return Err(self.err_expected("end of expression"));
        }
        debug!(input_len = self.input.len(), "parsed MDX expression");
        Ok(exp)
    }

    // === Token stream helpers ===

    fn peek(&self) -> &Token<'a> {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) -> Token<'a> {
        let token = self.tokens[self.pos].clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token<'a>, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.err_expected(expected))
        }
    }

    fn err_expected(&self, expected: &str) -> ParseError {
        let token = self.peek();
        let found = if token.kind == TokenKind::Eof {
            "end of input".to_string()
        } else {
            format!("'{}'", token.text)
        };
        ParseError::Syntax {
            expected: expected.to_string(),
            found,
            position: Position::at(self.input, token.offset),
        }
    }

    fn check_depth(&self) -> Result<(), ParseError> {
        if self.depth >= self.max_depth {
            return Err(ParseError::ResourceLimit {
                limit: self.max_depth,
                position: Position::at(self.input, self.peek().offset),
            });
        }
        Ok(())
    }

    // === Statement grammar ===

    fn parse_statement(&mut self) -> Result<MdxStatement, ParseError> {
        let mut statement = MdxStatement::new();

        if self.eat(TokenKind::With) {
            loop {
                let kind = match self.peek().kind {
                    TokenKind::Member => FormulaKind::Member,
                    TokenKind::Set => FormulaKind::Set,
                    _ => break,
                };
                self.advance();
                statement.add_formula(self.parse_formula(kind)?);
            }
            if statement.formulas().is_empty() {
                return Err(self.err_expected("MEMBER or SET"));
            }
        }

        self.expect(TokenKind::Select, "SELECT")?;
        if !self.check(TokenKind::From) {
            loop {
                statement.set_axis(self.parse_axis()?);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }

        self.expect(TokenKind::From, "FROM")?;
        statement.set_cube(self.parse_compound_name()?);

        if self.eat(TokenKind::Where) {
            statement.set_slicer(self.parse_expr()?);
        }

        if self.eat(TokenKind::Sap) {
            self.expect(TokenKind::Variables, "VARIABLES")?;
            loop {
                statement.add_sap_variable(self.parse_sap_variable()?);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }

        Ok(statement)
    }

    fn parse_formula(&mut self, kind: FormulaKind) -> Result<Formula, ParseError> {
        let name = self.parse_compound_name()?;
        self.expect(TokenKind::As, "AS")?;
        // only single-quoted bodies are quoted formulas; a double-quoted
        // string after AS is an ordinary string literal body
        let exp = if self.check(TokenKind::Str) && self.peek().text.starts_with('\'') {
            self.parse_quoted_expression()?
        } else {
            self.parse_expr()?
        };
        Ok(Formula::new(kind, name, exp))
    }

    /// Parse a formula body written as a quoted string
    ///
    /// The text between the quotes is parsed as an expression of its own;
    /// errors inside it are reported at the string's position in the
    /// outer statement.
    fn parse_quoted_expression(&mut self) -> Result<Exp, ParseError> {
        let token = self.advance();
        let inner = &self.input[token.offset + 1..token.offset + token.len() - 1];
        let position = Position::at(self.input, token.offset);
        Parser::new(inner)
            .with_max_depth(self.max_depth)
            .parse_expression()
            .map_err(|err| match err {
                ParseError::Lexical { message, .. } => ParseError::Lexical { message, position },
                ParseError::Syntax {
                    expected, found, ..
                } => ParseError::Syntax {
                    expected,
                    found,
                    position,
                },
                ParseError::ResourceLimit { limit, .. } => {
                    ParseError::ResourceLimit { limit, position }
                }
            })
    }

    fn parse_axis(&mut self) -> Result<QueryAxis, ParseError> {
        let non_empty = if self.eat(TokenKind::Non) {
            self.expect(TokenKind::Empty, "EMPTY")?;
            true
        } else {
            false
        };
        let exp = self.parse_expr()?;
        self.expect(TokenKind::On, "ON")?;
        let kind = self.parse_axis_kind()?;
        Ok(QueryAxis {
            non_empty,
            kind,
            exp,
        })
    }

    fn parse_axis_kind(&mut self) -> Result<AxisKind, ParseError> {
        let kind = match self.peek().kind {
            TokenKind::Columns => AxisKind::Columns,
            TokenKind::Rows => AxisKind::Rows,
            TokenKind::Pages => AxisKind::Pages,
            TokenKind::Chapters => AxisKind::Chapters,
            TokenKind::Sections => AxisKind::Sections,
            _ => return Err(self.err_expected("axis name")),
        };
        self.advance();
        Ok(kind)
    }

    fn parse_sap_variable(&mut self) -> Result<SapVariable, ParseError> {
        let name = self.parse_compound_name()?;
        let mut values = Vec::new();
        loop {
            let including = match self.peek().kind {
                TokenKind::Including => true,
                TokenKind::Excluding => false,
                // a comma directly before INCLUDING/EXCLUDING continues
                // the same variable rather than starting a new one
                TokenKind::Comma
                    if matches!(
                        self.tokens.get(self.pos + 1).map(|t| t.kind),
                        Some(TokenKind::Including | TokenKind::Excluding)
                    ) =>
                {
                    self.advance();
                    continue;
                }
                _ => break,
            };
            self.advance();
            let low = self.parse_primary()?;
            let value = if self.eat(TokenKind::Colon) {
                let high = self.parse_primary()?;
                SapValue::interval(including, low, high)
            } else {
                SapValue::new(including, low)
            };
            values.push(value);
        }
        if values.is_empty() {
            return Err(self.err_expected("INCLUDING or EXCLUDING"));
        }
        Ok(SapVariable::new(name, values))
    }

    /// Parse a dotted name without any property-call folding
    ///
    /// Used for formula names, the cube reference and SAP variable names,
    /// where every segment is part of the identifier.
    fn parse_compound_name(&mut self) -> Result<CompoundId, ParseError> {
        let mut id = CompoundId::default();
        loop {
            let key = self.eat(TokenKind::Amp);
            let name = self.parse_segment_name(!id.is_empty())?;
            id = if key { id.append_key(name) } else { id.append(name) };
            if !self.eat(TokenKind::Dot) {
                break;
            }
        }
        Ok(id)
    }

    /// Parse one identifier segment
    ///
    /// Keywords double as segment names after a dot, so `[Dim].Set` is an
    /// ordinary property access rather than a syntax error.
    fn parse_segment_name(&mut self, allow_keyword: bool) -> Result<String, ParseError> {
        let kind = self.peek().kind;
        match kind {
            TokenKind::BracketedId | TokenKind::Identifier => {
                Ok(self.advance().text.into_owned())
            }
            _ if allow_keyword && kind.is_keyword() => Ok(self.advance().text.into_owned()),
            _ => Err(self.err_expected("identifier")),
        }
    }

    // === Expression grammar ===

    fn parse_expr(&mut self) -> Result<Exp, ParseError> {
        self.check_depth()?;
        self.depth += 1;
        let result = self.parse_or();
        self.depth -= 1;
        result
    }

    fn parse_or(&mut self) -> Result<Exp, ParseError> {
        let mut lhs = self.parse_and()?;
        loop {
            let name = match self.peek().kind {
                TokenKind::Or => "OR",
                TokenKind::Xor => "XOR",
                _ => break,
            };
            self.advance();
            let rhs = self.parse_and()?;
            lhs = Exp::FunCall(FunCall::infix(name, lhs, rhs));
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Exp, ParseError> {
        let mut lhs = self.parse_not()?;
        while self.eat(TokenKind::And) {
            let rhs = self.parse_not()?;
            lhs = Exp::FunCall(FunCall::infix("AND", lhs, rhs));
        }
        Ok(lhs)
    }

    fn parse_not(&mut self) -> Result<Exp, ParseError> {
        if self.check(TokenKind::Not) {
            self.check_depth()?;
            self.depth += 1;
            self.advance();
            let result = self
                .parse_not()
                .map(|arg| Exp::FunCall(FunCall::prefix("NOT", arg)));
            self.depth -= 1;
            return result;
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Exp, ParseError> {
        let mut lhs = self.parse_additive()?;
        while self.peek().kind.is_comparison() {
            let op = self.advance();
            let rhs = self.parse_additive()?;
            lhs = Exp::FunCall(FunCall::infix(op.text.into_owned(), lhs, rhs));
        }
        Ok(lhs)
    }

    fn parse_additive(&mut self) -> Result<Exp, ParseError> {
        let mut lhs = self.parse_multiplicative()?;
        loop {
            let name = match self.peek().kind {
                TokenKind::Plus => "+",
                TokenKind::Minus => "-",
                _ => break,
            };
            self.advance();
            let rhs = self.parse_multiplicative()?;
            lhs = Exp::FunCall(FunCall::infix(name, lhs, rhs));
        }
        Ok(lhs)
    }

    fn parse_multiplicative(&mut self) -> Result<Exp, ParseError> {
        let mut lhs = self.parse_unary()?;
        loop {
            let name = match self.peek().kind {
                TokenKind::Star => "*",
                TokenKind::Slash => "/",
                _ => break,
            };
            self.advance();
            let rhs = self.parse_unary()?;
            lhs = Exp::FunCall(FunCall::infix(name, lhs, rhs));
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Exp, ParseError> {
        let name = match self.peek().kind {
            TokenKind::Minus => "-",
            TokenKind::Plus => "+",
            _ => return self.parse_primary(),
        };
        self.check_depth()?;
        self.depth += 1;
        self.advance();
        let result = self
            .parse_unary()
            .map(|arg| Exp::FunCall(FunCall::prefix(name, arg)));
        self.depth -= 1;
        result
    }

    fn parse_primary(&mut self) -> Result<Exp, ParseError> {
        match self.peek().kind {
            TokenKind::Number => {
                let token = self.advance();
                let kind = if token.text.contains('.') {
                    LiteralKind::Decimal
                } else {
                    LiteralKind::Integer
                };
                Ok(Exp::Literal(Literal::new(kind, token.text.into_owned())))
            }
            TokenKind::Str => {
                let token = self.advance();
                Ok(Exp::Literal(Literal::new(
                    LiteralKind::String,
                    token.text.into_owned(),
                )))
            }
            TokenKind::Parameter => {
                let token = self.advance();
                let text = token.text.as_ref();
                let (namespace, expression) = match text.find(':') {
                    Some(i) => (&text[..i], &text[i + 1..]),
                    None => (text, ""),
                };
                Ok(Exp::Parameter(ExpressionParameter::new(
                    namespace, expression,
                )))
            }
            TokenKind::LBrace => {
                self.advance();
                let args = if self.check(TokenKind::RBrace) {
                    Vec::new()
                } else {
                    self.parse_expr_list()?
                };
                self.expect(TokenKind::RBrace, "'}'")?;
                Ok(Exp::FunCall(FunCall::braces(args)))
            }
            TokenKind::LParen => {
                self.advance();
                let args = self.parse_expr_list()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(Exp::FunCall(FunCall::tuple(args)))
            }
            TokenKind::BracketedId | TokenKind::Identifier | TokenKind::Amp => self.parse_chain(),
            _ => Err(self.err_expected("expression")),
        }
    }

    fn parse_expr_list(&mut self) -> Result<Vec<Exp>, ParseError> {
        let mut args = vec![self.parse_expr()?];
        while self.eat(TokenKind::Comma) {
            args.push(self.parse_expr()?);
        }
        Ok(args)
    }

    /// Parse a dotted chain of segments and calls
    ///
    /// Plain identifier segments fold into a [`CompoundId`] until a call
    /// appears. A segment followed by `(` becomes a function call, or a
    /// method call if a chain precedes it. Any segment after a call is a
    /// method on its result. A trailing unbracketed segment of a longer
    /// chain is a property call, so `[Measures].members` parses as the
    /// `members` method on `[Measures]`.
    fn parse_chain(&mut self) -> Result<Exp, ParseError> {
        let mut id = CompoundId::default();
        let mut call: Option<FunCall> = None;

        loop {
            let key = self.eat(TokenKind::Amp);
            let name = self.parse_segment_name(!id.is_empty() || call.is_some())?;

            if self.check(TokenKind::LParen) && !key {
                self.advance();
                let mut args: Vec<Exp> = Vec::new();
                if let Some(target) = call.take() {
                    args.push(Exp::FunCall(target));
                } else if !id.is_empty() {
                    args.push(Exp::CompoundId(std::mem::take(&mut id)));
                }
                let has_target = !args.is_empty();
                if !self.check(TokenKind::RParen) {
                    args.extend(self.parse_expr_list()?);
                }
                self.expect(TokenKind::RParen, "')'")?;
                let syntax = if has_target {
                    Syntax::Method
                } else {
                    Syntax::Function
                };
                call = Some(FunCall::new(name, syntax, args));
            } else if let Some(target) = call.take() {
                call = Some(FunCall::new(
                    name,
                    Syntax::Method,
                    vec![Exp::FunCall(target)],
                ));
            } else {
                id = if key { id.append_key(name) } else { id.append(name) };
            }

            if !self.eat(TokenKind::Dot) {
                break;
            }
        }

        if let Some(call) = call {
            return Ok(Exp::FunCall(call));
        }

        if id.len() > 1 {
            let parts = id.parts();
            let last = &parts[parts.len() - 1];
            if !last.key && !last.is_bracketed() {
                let name = last.name.clone();
                let mut target = CompoundId::default();
                for part in &parts[..parts.len() - 1] {
                    target = target.append_part(part.clone());
                }
                return Ok(Exp::FunCall(FunCall::new(
                    name,
                    Syntax::Method,
                    vec![Exp::CompoundId(target)],
                )));
            }
        }

        Ok(Exp::CompoundId(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_query(input: &str) -> MdxStatement {
        parse(input).expect("parse failed")
    }

    fn parse_exp(input: &str) -> Exp {
        Parser::new(input).parse_expression().expect("parse failed")
    }

    fn round_trip(input: &str) {
        let query = parse_query(input);
        assert_eq!(query.to_mdx(), input);
        assert_eq!(parse_query(&query.to_mdx()), query);
    }

    #[test]
    fn test_parse_no_axes() {
        let query = parse_query("SELECT FROM DummyCube");
        assert!(query.axes().is_empty());
        assert_eq!(query.cube().unwrap().names(), vec!["DummyCube"]);
        round_trip("SELECT FROM DummyCube");
    }

    #[test]
    fn test_parse_single_axis() {
        let query = parse_query("SELECT [AAA] ON COLUMNS FROM [DummyCube]");
        let axis = query.axis(AxisKind::Columns).unwrap();
        assert!(!axis.non_empty);
        assert_eq!(axis.exp, Exp::CompoundId(CompoundId::new("[AAA]")));
        round_trip("SELECT [AAA] ON COLUMNS FROM [DummyCube]");
    }

    #[test]
    fn test_parse_two_axes() {
        let query = parse_query("SELECT [AAA] ON COLUMNS, [BBB] ON ROWS FROM [CCC]");
        assert_eq!(query.axes().len(), 2);
        assert_eq!(query.axes()[0].kind, AxisKind::Columns);
        assert_eq!(query.axes()[1].kind, AxisKind::Rows);
        round_trip("SELECT [AAA] ON COLUMNS, [BBB] ON ROWS FROM [CCC]");
    }

    #[test]
    fn test_axes_printed_in_rank_order() {
        // ROWS written first; output follows the fixed axis ranking
        let query = parse_query("SELECT [BBB] ON ROWS, [AAA] ON COLUMNS FROM [CCC]");
        assert_eq!(
            query.to_mdx(),
            "SELECT [AAA] ON COLUMNS, [BBB] ON ROWS FROM [CCC]"
        );
    }

    #[test]
    fn test_parse_all_axis_names() {
        let query = parse_query(
            "SELECT [A] ON COLUMNS, [B] ON ROWS, [C] ON PAGES, \
             [D] ON CHAPTERS, [E] ON SECTIONS FROM [F]",
        );
        let kinds: Vec<_> = query.axes().iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![
                AxisKind::Columns,
                AxisKind::Rows,
                AxisKind::Pages,
                AxisKind::Chapters,
                AxisKind::Sections,
            ]
        );
    }

    #[test]
    fn test_parse_non_empty() {
        let query = parse_query("SELECT NON EMPTY [AAA] ON COLUMNS FROM [BBB]");
        assert!(query.axis(AxisKind::Columns).unwrap().non_empty);
        round_trip("SELECT NON EMPTY [AAA] ON COLUMNS FROM [BBB]");
    }

    #[test]
    fn test_parse_key_identifier() {
        let query = parse_query(
            "SELECT [AAA].&[BBB] ON COLUMNS, [CCC].&[DDD].[EEE] ON ROWS FROM DummyCube",
        );
        let columns = query.axis(AxisKind::Columns).unwrap();
        match &columns.exp {
            Exp::CompoundId(id) => {
                assert_eq!(id.names(), vec!["[AAA]", "[BBB]"]);
                assert!(!id.parts()[0].key);
                assert!(id.parts()[1].key);
            }
            other => panic!("expected compound id, got {:?}", other),
        }
        round_trip("SELECT [AAA].&[BBB] ON COLUMNS, [CCC].&[DDD].[EEE] ON ROWS FROM DummyCube");
    }

    #[test]
    fn test_parse_bracket_escapes() {
        let input = "SELECT [AA[BB]]].[CC] ON COLUMNS, [DD].[AA]]B] ON ROWS FROM DummyCube";
        let query = parse_query(input);
        let columns = query.axis(AxisKind::Columns).unwrap();
        match &columns.exp {
            Exp::CompoundId(id) => assert_eq!(id.names(), vec!["[AA[BB]]]", "[CC]"]),
            other => panic!("expected compound id, got {:?}", other),
        }
        round_trip(input);
    }

    #[test]
    fn test_parse_where_slicer() {
        let query = parse_query("SELECT [A] ON COLUMNS FROM [Sales] WHERE [Time].[1998]");
        assert_eq!(
            query.slicer(),
            Some(&Exp::CompoundId(
                CompoundId::new("[Time]").append("[1998]")
            ))
        );
        round_trip("SELECT [A] ON COLUMNS FROM [Sales] WHERE [Time].[1998]");
    }

    #[test]
    fn test_parse_where_tuple() {
        let query =
            parse_query("SELECT [A] ON COLUMNS FROM [Sales] WHERE ([Time].[1998], [Store].[CA])");
        match query.slicer().unwrap() {
            Exp::FunCall(call) => {
                assert_eq!(call.syntax, Syntax::Parentheses);
                assert_eq!(call.args.len(), 2);
            }
            other => panic!("expected tuple, got {:?}", other),
        }
        round_trip("SELECT [A] ON COLUMNS FROM [Sales] WHERE ([Time].[1998], [Store].[CA])");
    }

    #[test]
    fn test_parse_with_member() {
        let input = "WITH MEMBER [Measures].[Profit] AS \
                     [Measures].[Store Sales] - [Measures].[Store Cost] \
                     SELECT [Measures].[Profit] ON COLUMNS FROM [Sales]";
        let query = parse_query(input);
        assert_eq!(query.formulas().len(), 1);
        let formula = &query.formulas()[0];
        assert_eq!(formula.kind, FormulaKind::Member);
        assert_eq!(formula.name.names(), vec!["[Measures]", "[Profit]"]);
        match &formula.exp {
            Exp::FunCall(call) => {
                assert_eq!(call.name, "-");
                assert_eq!(call.syntax, Syntax::Infix);
            }
            other => panic!("expected infix call, got {:?}", other),
        }
        round_trip(input);
    }

    #[test]
    fn test_parse_with_set() {
        let input = "WITH SET [Top Stores] AS TopCount([Store].members, 5, [Measures].[Sales]) \
                     SELECT [Top Stores] ON ROWS FROM [Sales]";
        let query = parse_query(input);
        assert_eq!(query.formulas()[0].kind, FormulaKind::Set);
        round_trip(input);
    }

    #[test]
    fn test_parse_multiple_formulas() {
        let query = parse_query(
            "WITH MEMBER [Measures].[A] AS 1 SET [S] AS {[X]} MEMBER [Measures].[B] AS 2 \
             SELECT [Measures].[A] ON COLUMNS FROM [Sales]",
        );
        let kinds: Vec<_> = query.formulas().iter().map(|f| f.kind).collect();
        assert_eq!(
            kinds,
            vec![FormulaKind::Member, FormulaKind::Set, FormulaKind::Member]
        );
    }

    #[test]
    fn test_parse_quoted_formula() {
        // the quoted body parses as an expression; output drops the quotes
        let query = parse_query(
            "WITH MEMBER [Measures].[Profit] AS '[Measures].[A] - [Measures].[B]' \
             SELECT [Measures].[Profit] ON COLUMNS FROM [Sales]",
        );
        let unquoted = parse_query(
            "WITH MEMBER [Measures].[Profit] AS [Measures].[A] - [Measures].[B] \
             SELECT [Measures].[Profit] ON COLUMNS FROM [Sales]",
        );
        assert_eq!(query, unquoted);
    }

    #[test]
    fn test_double_quoted_formula_body_is_literal() {
        let query = parse_query("WITH MEMBER [M] AS \"abc\" SELECT FROM [C]");
        assert_eq!(
            query.formulas()[0].exp,
            Exp::Literal(Literal::new(LiteralKind::String, "\"abc\""))
        );
    }

    #[test]
    fn test_parameter_in_quoted_formula_body() {
        let query = parse_query("WITH MEMBER [M] AS '$[s:p]' SELECT FROM [C]");
        assert_eq!(
            query.formulas()[0].exp,
            Exp::Parameter(ExpressionParameter::new("s", "p"))
        );
    }

    #[test]
    fn test_quoted_formula_error_position() {
        let input = "WITH MEMBER [M] AS 'ON ON' SELECT FROM [C]";
        let err = parse(input).unwrap_err();
        match err {
            ParseError::Syntax { position, .. } => {
                // reported at the opening quote of the formula body
                assert_eq!(position.offset, 19);
            }
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_members_property() {
        match parse_exp("[Measures].members") {
            Exp::FunCall(call) => {
                assert_eq!(call.name, "members");
                assert_eq!(call.syntax, Syntax::Method);
                assert_eq!(
                    call.args,
                    vec![Exp::CompoundId(CompoundId::new("[Measures]"))]
                );
            }
            other => panic!("expected method call, got {:?}", other),
        }
    }

    #[test]
    fn test_bracketed_trailing_segment_stays_identifier() {
        match parse_exp("[Measures].[members]") {
            Exp::CompoundId(id) => assert_eq!(id.names(), vec!["[Measures]", "[members]"]),
            other => panic!("expected compound id, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_function_call() {
        match parse_exp("Crossjoin([A].members, [B].members)") {
            Exp::FunCall(call) => {
                assert_eq!(call.name, "Crossjoin");
                assert_eq!(call.syntax, Syntax::Function);
                assert_eq!(call.args.len(), 2);
            }
            other => panic!("expected function call, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_method_with_args() {
        match parse_exp("[Time].[1998].Lead(2)") {
            Exp::FunCall(call) => {
                assert_eq!(call.name, "Lead");
                assert_eq!(call.syntax, Syntax::Method);
                assert_eq!(call.args.len(), 2);
                assert_eq!(
                    call.args[0],
                    Exp::CompoundId(CompoundId::new("[Time]").append("[1998]"))
                );
            }
            other => panic!("expected method call, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_method_on_call_result() {
        match parse_exp("Crossjoin([A], [B]).Item(0)") {
            Exp::FunCall(call) => {
                assert_eq!(call.name, "Item");
                assert_eq!(call.syntax, Syntax::Method);
                assert!(matches!(call.args[0], Exp::FunCall(_)));
            }
            other => panic!("expected method call, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_braces_set() {
        match parse_exp("{[USA].[CA], [USA].[OR]}") {
            Exp::FunCall(call) => {
                assert_eq!(call.syntax, Syntax::Braces);
                assert_eq!(call.args.len(), 2);
            }
            other => panic!("expected set, got {:?}", other),
        }
        assert_eq!(parse_exp("{}"), Exp::FunCall(FunCall::braces(vec![])));
    }

    #[test]
    fn test_operator_precedence() {
        // 1 + 2 * 3 groups as 1 + (2 * 3)
        match parse_exp("1 + 2 * 3") {
            Exp::FunCall(plus) => {
                assert_eq!(plus.name, "+");
                match &plus.args[1] {
                    Exp::FunCall(times) => assert_eq!(times.name, "*"),
                    other => panic!("expected nested call, got {:?}", other),
                }
            }
            other => panic!("expected infix call, got {:?}", other),
        }
    }

    #[test]
    fn test_parenthesized_grouping_survives() {
        match parse_exp("(1 + 2) * 3") {
            Exp::FunCall(times) => {
                assert_eq!(times.name, "*");
                match &times.args[0] {
                    Exp::FunCall(group) => assert_eq!(group.syntax, Syntax::Parentheses),
                    other => panic!("expected grouped call, got {:?}", other),
                }
            }
            other => panic!("expected infix call, got {:?}", other),
        }
    }

    #[test]
    fn test_left_associative_fold() {
        // 1 - 2 - 3 groups as (1 - 2) - 3
        match parse_exp("1 - 2 - 3") {
            Exp::FunCall(outer) => {
                assert_eq!(outer.name, "-");
                match &outer.args[0] {
                    Exp::FunCall(inner) => assert_eq!(inner.name, "-"),
                    other => panic!("expected nested call, got {:?}", other),
                }
            }
            other => panic!("expected infix call, got {:?}", other),
        }
    }

    #[test]
    fn test_logical_precedence() {
        // comparison binds tighter than AND, AND tighter than OR
        match parse_exp("[M] > 100 AND [N] < 50 OR [P] = 1") {
            Exp::FunCall(or) => {
                assert_eq!(or.name, "OR");
                match &or.args[0] {
                    Exp::FunCall(and) => {
                        assert_eq!(and.name, "AND");
                        match &and.args[0] {
                            Exp::FunCall(gt) => assert_eq!(gt.name, ">"),
                            other => panic!("expected comparison, got {:?}", other),
                        }
                    }
                    other => panic!("expected AND, got {:?}", other),
                }
            }
            other => panic!("expected OR, got {:?}", other),
        }
    }

    #[test]
    fn test_not_wraps_comparison() {
        match parse_exp("NOT [A] = [B]") {
            Exp::FunCall(not) => {
                assert_eq!(not.name, "NOT");
                assert_eq!(not.syntax, Syntax::Prefix);
                match &not.args[0] {
                    Exp::FunCall(eq) => assert_eq!(eq.name, "="),
                    other => panic!("expected comparison, got {:?}", other),
                }
            }
            other => panic!("expected NOT, got {:?}", other),
        }
    }

    #[test]
    fn test_unary_minus() {
        match parse_exp("-1") {
            Exp::FunCall(neg) => {
                assert_eq!(neg.name, "-");
                assert_eq!(neg.syntax, Syntax::Prefix);
            }
            other => panic!("expected prefix call, got {:?}", other),
        }
    }

    #[test]
    fn test_word_operators_uppercased() {
        // operator keywords print canonically whatever the input case
        match parse_exp("[A] and [B]") {
            Exp::FunCall(call) => assert_eq!(call.name, "AND"),
            other => panic!("expected infix call, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_sap_variables() {
        let input = "SELECT FROM [ODBOSCEN1/MKTBRANCH] \
                     SAP VARIABLES [ODBBRANC] INCLUDING [ODB_BRANC].[CHEM]";
        let query = parse_query(input);
        assert_eq!(query.sap_variables().len(), 1);
        let variable = &query.sap_variables()[0];
        assert_eq!(variable.name.names(), vec!["[ODBBRANC]"]);
        assert_eq!(variable.values.len(), 1);
        assert!(variable.values[0].including);
        assert!(!variable.values[0].interval);
        round_trip(input);
    }

    #[test]
    fn test_parse_sap_interval() {
        let input = "SELECT FROM [CUBE] SAP VARIABLES [VAR] INCLUDING [A] EXCLUDING [2000]:[2010]";
        let query = parse_query(input);
        let variable = &query.sap_variables()[0];
        assert_eq!(variable.values.len(), 2);
        assert!(!variable.values[1].including);
        assert!(variable.values[1].interval);
        round_trip(input);
    }

    #[test]
    fn test_comma_continues_sap_variable() {
        // the comma separates values, not variables, when INCLUDING or
        // EXCLUDING follows it directly
        let query = parse_query(
            "SELECT FROM [CUBE] SAP VARIABLES [VAR] INCLUDING [A], EXCLUDING [B]",
        );
        assert_eq!(query.sap_variables().len(), 1);
        assert_eq!(query.sap_variables()[0].values.len(), 2);
    }

    #[test]
    fn test_parse_multiple_sap_variables() {
        let input =
            "SELECT FROM [CUBE] SAP VARIABLES [VAR1] INCLUDING [A], [VAR2] EXCLUDING [B]";
        let query = parse_query(input);
        assert_eq!(query.sap_variables().len(), 2);
        round_trip(input);
    }

    #[test]
    fn test_parse_parameter_expression() {
        let query = parse_query("SELECT $[s:#{set}] ON COLUMNS FROM [C]");
        match &query.axis(AxisKind::Columns).unwrap().exp {
            Exp::Parameter(param) => {
                assert_eq!(param.namespace, "s");
                assert_eq!(param.expression, "#{set}");
            }
            other => panic!("expected parameter, got {:?}", other),
        }
        round_trip("SELECT $[s:#{set}] ON COLUMNS FROM [C]");
    }

    #[test]
    fn test_parameter_escape_collapse_in_statement() {
        // ]] escapes collapse while scanning; the printed form is the
        // collapsed text, not the original escaped input
        let query =
            parse_query("SELECT $[s:[1, 2, 3]], &[AAA]], \"aaa\"] ON COLUMNS FROM [C]");
        assert_eq!(
            query.to_mdx(),
            "SELECT $[s:[1, 2, 3], &[AAA], \"aaa\"] ON COLUMNS FROM [C]"
        );
    }

    #[test]
    fn test_depth_limit() {
        let input = format!("SELECT {}1{} ON COLUMNS FROM [C]", "(".repeat(20), ")".repeat(20));
        let err = Parser::new(&input).with_max_depth(8).parse().unwrap_err();
        match err {
            ParseError::ResourceLimit { limit, .. } => assert_eq!(limit, 8),
            other => panic!("expected resource limit, got {:?}", other),
        }
    }

    #[test]
    fn test_depth_limit_not_hit_by_flat_lists() {
        // width is unbounded; only nesting counts against the limit
        let args: Vec<String> = (0..50).map(|i| i.to_string()).collect();
        let input = format!("SELECT {{{}}} ON COLUMNS FROM [C]", args.join(", "));
        assert!(Parser::new(&input).with_max_depth(8).parse().is_ok());
    }

    #[test]
    fn test_error_missing_from() {
        let err = parse("SELECT [A] ON COLUMNS").unwrap_err();
        match err {
            ParseError::Syntax {
                expected, found, ..
            } => {
                assert_eq!(expected, "FROM");
                assert_eq!(found, "end of input");
            }
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_error_bad_axis_name() {
        let err = parse("SELECT [A] ON SIDEWAYS FROM [C]").unwrap_err();
        match err {
            ParseError::Syntax {
                expected,
                found,
                position,
            } => {
                assert_eq!(expected, "axis name");
                assert_eq!(found, "'SIDEWAYS'");
                assert_eq!(position.offset, 14);
            }
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_error_empty_input() {
        let err = parse("").unwrap_err();
        match err {
            ParseError::Syntax { expected, found, .. } => {
                assert_eq!(expected, "SELECT");
                assert_eq!(found, "end of input");
            }
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_error_trailing_tokens() {
        let err = parse("SELECT FROM [C] extra").unwrap_err();
        match err {
            ParseError::Syntax { expected, .. } => {
                assert_eq!(expected, "end of statement");
            }
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_error_with_without_formula() {
        let err = parse("WITH SELECT FROM [C]").unwrap_err();
        match err {
            ParseError::Syntax { expected, .. } => assert_eq!(expected, "MEMBER or SET"),
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_keywords_case_insensitive() {
        let query = parse_query("select [A] on columns from [C] where [B]");
        assert_eq!(
            query.to_mdx(),
            "SELECT [A] ON COLUMNS FROM [C] WHERE [B]"
        );
    }

    #[test]
    fn test_keyword_as_property_name() {
        // keywords are legal segment names after a dot
        match parse_exp("[Dim].[X].Set") {
            Exp::FunCall(call) => {
                assert_eq!(call.name, "Set");
                assert_eq!(call.syntax, Syntax::Method);
            }
            other => panic!("expected method call, got {:?}", other),
        }
    }

    #[test]
    fn test_plain_cube_name() {
        let query = parse_query("SELECT FROM DummyCube");
        assert!(!query.cube().unwrap().parts()[0].is_bracketed());
    }

    #[test]
    fn test_complex_round_trip() {
        round_trip(
            "WITH MEMBER [Measures].[Profit] AS [Measures].[Sales] - [Measures].[Cost] \
             SELECT NON EMPTY {[Measures].[Profit]} ON COLUMNS, \
             Crossjoin([Store].members, [Time].[1998].children) ON ROWS \
             FROM [Sales] WHERE ([Customers].[USA], [Gender].&[M])",
        );
    }
}
