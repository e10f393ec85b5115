//! AST types for parsed MDX statements
//!
//! These types form a strict tree: every node belongs to exactly one
//! parent and nothing is shared or cyclic. Nodes are built once (by the
//! parser or by hand through the builder methods on [`MdxStatement`]) and
//! not mutated afterwards. Structural equality (`PartialEq`) backs the
//! parse/print round-trip guarantee.

/// An MDX expression
///
/// Closed set of expression forms; consumers pattern-match exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum Exp {
    /// A dot-joined chain of identifier segments
    CompoundId(CompoundId),
    /// A numeric or string scalar
    Literal(Literal),
    /// A function, operator, tuple or set application
    FunCall(FunCall),
    /// An embedded `$[namespace:expression]` parameter
    Parameter(ExpressionParameter),
}

impl From<CompoundId> for Exp {
    fn from(id: CompoundId) -> Self {
        Exp::CompoundId(id)
    }
}

impl From<Literal> for Exp {
    fn from(lit: Literal) -> Self {
        Exp::Literal(lit)
    }
}

impl From<FunCall> for Exp {
    fn from(call: FunCall) -> Self {
        Exp::FunCall(call)
    }
}

impl From<ExpressionParameter> for Exp {
    fn from(param: ExpressionParameter) -> Self {
        Exp::Parameter(param)
    }
}

/// One segment of a compound identifier
///
/// The name is the raw lexical text exactly as scanned, including
/// surrounding brackets and any `]]` escape pairs. It is never re-escaped
/// or unescaped, which makes printing lossless.
#[derive(Debug, Clone, PartialEq)]
pub struct NamePart {
    /// Raw segment text, e.g. `[Adventure Works]` or `DummyCube`
    pub name: String,
    /// Whether this segment was introduced by the `&` key marker
    pub key: bool,
}

impl NamePart {
    /// Create a name part
    pub fn new(name: impl Into<String>, key: bool) -> Self {
        Self {
            name: name.into(),
            key,
        }
    }

    /// Whether the segment text is bracketed
    pub fn is_bracketed(&self) -> bool {
        self.name.starts_with('[')
    }
}

/// A compound identifier: an ordered, non-empty chain of name parts
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompoundId {
    parts: Vec<NamePart>,
}

impl CompoundId {
    /// Create a compound identifier with a single unkeyed part
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            parts: vec![NamePart::new(name, false)],
        }
    }

    /// Append an unkeyed part
    pub fn append(mut self, name: impl Into<String>) -> Self {
        self.parts.push(NamePart::new(name, false));
        self
    }

    /// Append a key-marked part (printed with a leading `&`)
    pub fn append_key(mut self, name: impl Into<String>) -> Self {
        self.parts.push(NamePart::new(name, true));
        self
    }

    /// Append an already-built part
    pub fn append_part(mut self, part: NamePart) -> Self {
        self.parts.push(part);
        self
    }

    /// The name parts in order
    pub fn parts(&self) -> &[NamePart] {
        &self.parts
    }

    /// The raw segment texts in order
    pub fn names(&self) -> Vec<&str> {
        self.parts.iter().map(|p| p.name.as_str()).collect()
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Whether the identifier has no segments yet
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

/// The lexical kind of a literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    /// An integer number
    Integer,
    /// A decimal number
    Decimal,
    /// A quoted string (text includes the quotes)
    String,
}

/// A scalar literal, lexical text preserved for exact reprinting
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    /// The verbatim source text (`1.5`, `"aaa"`, ...)
    pub text: String,
    /// The lexical kind
    pub kind: LiteralKind,
}

impl Literal {
    /// Create a literal from its verbatim text
    pub fn new(kind: LiteralKind, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    /// The integer value, if this is an integer literal
    pub fn as_i64(&self) -> Option<i64> {
        match self.kind {
            LiteralKind::Integer => self.text.parse().ok(),
            _ => None,
        }
    }

    /// The numeric value, if this is a numeric literal
    pub fn as_f64(&self) -> Option<f64> {
        match self.kind {
            LiteralKind::Integer | LiteralKind::Decimal => self.text.parse().ok(),
            LiteralKind::String => None,
        }
    }

    /// The string content without its surrounding quotes
    pub fn string_value(&self) -> Option<&str> {
        match self.kind {
            LiteralKind::String if self.text.len() >= 2 => {
                Some(&self.text[1..self.text.len() - 1])
            }
            _ => None,
        }
    }
}

/// The syntactic shape of a function call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    /// `Name(arg0, arg1, ...)`
    Function,
    /// `arg0.Name` or `arg0.Name(arg1, ...)`; the target is args[0]
    Method,
    /// `arg0 Name arg1`, exactly two arguments
    Infix,
    /// `Name arg0`, exactly one argument
    Prefix,
    /// `(arg0, arg1, ...)` tuple
    Parentheses,
    /// `{arg0, arg1, ...}` set
    Braces,
}

/// A function or operator application
#[derive(Debug, Clone, PartialEq)]
pub struct FunCall {
    /// Function or operator name (`Crossjoin`, `*`, `AND`, ...)
    pub name: String,
    /// Syntactic shape
    pub syntax: Syntax,
    /// Arguments in order
    pub args: Vec<Exp>,
}

impl FunCall {
    /// Create a call with an arbitrary argument list
    ///
    /// Infix calls take exactly two arguments and prefix calls exactly
    /// one; the other shapes accept any count.
    pub fn new(name: impl Into<String>, syntax: Syntax, args: Vec<Exp>) -> Self {
        debug_assert!(match syntax {
            Syntax::Infix => args.len() == 2,
            Syntax::Prefix => args.len() == 1,
            _ => true,
        });
        Self {
            name: name.into(),
            syntax,
            args,
        }
    }

    /// Create a binary infix application
    pub fn infix(name: impl Into<String>, lhs: Exp, rhs: Exp) -> Self {
        Self::new(name, Syntax::Infix, vec![lhs, rhs])
    }

    /// Create a unary prefix application
    pub fn prefix(name: impl Into<String>, arg: Exp) -> Self {
        Self::new(name, Syntax::Prefix, vec![arg])
    }

    /// Create a brace-delimited set
    pub fn braces(args: Vec<Exp>) -> Self {
        Self::new("{}", Syntax::Braces, args)
    }

    /// Create a parenthesized tuple
    pub fn tuple(args: Vec<Exp>) -> Self {
        Self::new("()", Syntax::Parentheses, args)
    }
}

/// An embedded host-language parameter expression
///
/// Both fields are captured verbatim from the source between the
/// parameter delimiters; the expression is never parsed as MDX. The
/// namespace identifies which external evaluator should interpret it.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionParameter {
    /// Evaluator namespace, e.g. `s`
    pub namespace: String,
    /// Raw expression text
    pub expression: String,
}

impl ExpressionParameter {
    /// Create a parameter expression
    pub fn new(namespace: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            expression: expression.into(),
        }
    }
}

/// The kind of a WITH-clause formula
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormulaKind {
    /// A calculated member
    Member,
    /// A named set
    Set,
}

/// A WITH-clause declaration
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    /// MEMBER or SET
    pub kind: FormulaKind,
    /// The declared name
    pub name: CompoundId,
    /// The defining expression
    pub exp: Exp,
}

impl Formula {
    /// Create a formula
    pub fn new(kind: FormulaKind, name: CompoundId, exp: Exp) -> Self {
        Self { kind, name, exp }
    }
}

/// A logical query axis
///
/// Variant order is the fixed output ranking: statements always print
/// their axes in this order, whatever order they were inserted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AxisKind {
    Columns,
    Rows,
    Pages,
    Chapters,
    Sections,
}

impl AxisKind {
    /// The axis keyword as printed
    pub fn name(&self) -> &'static str {
        match self {
            AxisKind::Columns => "COLUMNS",
            AxisKind::Rows => "ROWS",
            AxisKind::Pages => "PAGES",
            AxisKind::Chapters => "CHAPTERS",
            AxisKind::Sections => "SECTIONS",
        }
    }
}

/// One axis specification of a SELECT clause
#[derive(Debug, Clone, PartialEq)]
pub struct QueryAxis {
    /// Whether the axis carries the NON EMPTY flag
    pub non_empty: bool,
    /// Which logical axis this is
    pub kind: AxisKind,
    /// The axis expression (set or member reference)
    pub exp: Exp,
}

impl QueryAxis {
    /// Create an axis without the NON EMPTY flag
    pub fn new(kind: AxisKind, exp: Exp) -> Self {
        Self {
            non_empty: false,
            kind,
            exp,
        }
    }

    /// Create an axis with the NON EMPTY flag
    pub fn non_empty(kind: AxisKind, exp: Exp) -> Self {
        Self {
            non_empty: true,
            kind,
            exp,
        }
    }
}

/// One value binding of a SAP variable
#[derive(Debug, Clone, PartialEq)]
pub struct SapValue {
    /// INCLUDING (true) or EXCLUDING (false)
    pub including: bool,
    /// Whether the payload is a `low:high` interval
    pub interval: bool,
    /// The bound value; for intervals, an infix `:` call over (low, high)
    pub value: Exp,
}

impl SapValue {
    /// Create a single-value binding
    pub fn new(including: bool, value: Exp) -> Self {
        Self {
            including,
            interval: false,
            value,
        }
    }

    /// Create an interval binding over (low, high)
    pub fn interval(including: bool, low: Exp, high: Exp) -> Self {
        Self {
            including,
            interval: true,
            value: Exp::FunCall(FunCall::infix(":", low, high)),
        }
    }
}

/// A SAP BW variable binding (vendor extension clause)
#[derive(Debug, Clone, PartialEq)]
pub struct SapVariable {
    /// The variable name
    pub name: CompoundId,
    /// The bound values in order
    pub values: Vec<SapValue>,
}

impl SapVariable {
    /// Create a variable with its values
    pub fn new(name: CompoundId, values: Vec<SapValue>) -> Self {
        Self { name, values }
    }
}

/// A complete MDX statement
///
/// Built either by the parser or by hand through the builder methods.
/// The axis list is kept sorted by [`AxisKind`] rank at all times;
/// setting an axis of a kind already present replaces it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MdxStatement {
    formulas: Vec<Formula>,
    axes: Vec<QueryAxis>,
    cube: Option<CompoundId>,
    slicer: Option<Exp>,
    sap_variables: Vec<SapVariable>,
}

impl MdxStatement {
    /// Create an empty statement
    pub fn new() -> Self {
        Self::default()
    }

    /// The WITH-clause formulas in declaration order
    pub fn formulas(&self) -> &[Formula] {
        &self.formulas
    }

    /// Append a formula
    pub fn add_formula(&mut self, formula: Formula) {
        self.formulas.push(formula);
    }

    /// The axes, always in rank order
    pub fn axes(&self) -> &[QueryAxis] {
        &self.axes
    }

    /// Set an axis, replacing any existing axis of the same kind
    pub fn set_axis(&mut self, axis: QueryAxis) {
        self.axes.retain(|a| a.kind != axis.kind);
        let at = self
            .axes
            .iter()
            .position(|a| a.kind > axis.kind)
            .unwrap_or(self.axes.len());
        self.axes.insert(at, axis);
    }

    /// The axis of the given kind, if set
    pub fn axis(&self, kind: AxisKind) -> Option<&QueryAxis> {
        self.axes.iter().find(|a| a.kind == kind)
    }

    /// The cube named by the FROM clause
    pub fn cube(&self) -> Option<&CompoundId> {
        self.cube.as_ref()
    }

    /// Set the cube
    pub fn set_cube(&mut self, cube: CompoundId) {
        self.cube = Some(cube);
    }

    /// The WHERE-clause slicer, if set
    pub fn slicer(&self) -> Option<&Exp> {
        self.slicer.as_ref()
    }

    /// Set the slicer
    pub fn set_slicer(&mut self, slicer: Exp) {
        self.slicer = Some(slicer);
    }

    /// The SAP VARIABLES bindings in declaration order
    pub fn sap_variables(&self) -> &[SapVariable] {
        &self.sap_variables
    }

    /// Append a SAP variable binding
    pub fn add_sap_variable(&mut self, variable: SapVariable) {
        self.sap_variables.push(variable);
    }
}
