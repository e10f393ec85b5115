//! Canonical MDX text generation
//!
//! Every AST node implements `Display`, producing deterministic MDX text
//! independent of how the tree was built. Re-parsing printed output yields
//! a structurally equal tree. Keywords always print uppercase; identifier
//! raw text is copied back verbatim.

use std::fmt;

use super::ast::{
    AxisKind, CompoundId, Exp, ExpressionParameter, Formula, FormulaKind, FunCall, Literal,
    MdxStatement, QueryAxis, SapValue, SapVariable, Syntax,
};

fn write_list(f: &mut fmt::Formatter<'_>, args: &[Exp], separator: &str) -> fmt::Result {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{}", arg)?;
    }
    Ok(())
}

impl fmt::Display for Exp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exp::CompoundId(id) => write!(f, "{}", id),
            Exp::Literal(lit) => write!(f, "{}", lit),
            Exp::FunCall(call) => write!(f, "{}", call),
            Exp::Parameter(param) => write!(f, "{}", param),
        }
    }
}

impl Exp {
    /// Render this expression as MDX text
    pub fn to_mdx(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CompoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.parts().iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            if part.key {
                f.write_str("&")?;
            }
            f.write_str(&part.name)?;
        }
        Ok(())
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl fmt::Display for ExpressionParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$[{}:{}]", self.namespace, self.expression)
    }
}

impl fmt::Display for FunCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.syntax {
            Syntax::Function => {
                write!(f, "{}(", self.name)?;
                write_list(f, &self.args, ", ")?;
                f.write_str(")")
            }
            Syntax::Method => {
                // a method call without a target degrades to its bare name
                let Some((target, rest)) = self.args.split_first() else {
                    return f.write_str(&self.name);
                };
                write!(f, "{}.{}", target, self.name)?;
                if !rest.is_empty() {
                    f.write_str("(")?;
                    write_list(f, rest, ", ")?;
                    f.write_str(")")?;
                }
                Ok(())
            }
            Syntax::Infix => {
                for (i, arg) in self.args.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {} ", self.name)?;
                    }
                    write!(f, "{}", arg)?;
                }
                Ok(())
            }
            Syntax::Prefix => {
                write!(f, "{} ", self.name)?;
                write_list(f, &self.args, " ")
            }
            Syntax::Parentheses => {
                f.write_str("(")?;
                write_list(f, &self.args, ", ")?;
                f.write_str(")")
            }
            Syntax::Braces => {
                f.write_str("{")?;
                write_list(f, &self.args, ", ")?;
                f.write_str("}")
            }
        }
    }
}

impl fmt::Display for FormulaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormulaKind::Member => f.write_str("MEMBER"),
            FormulaKind::Set => f.write_str("SET"),
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} AS {}", self.kind, self.name, self.exp)
    }
}

impl fmt::Display for AxisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for QueryAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.non_empty {
            f.write_str("NON EMPTY ")?;
        }
        write!(f, "{} ON {}", self.exp, self.kind)
    }
}

impl fmt::Display for SapValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.including {
            "INCLUDING "
        } else {
            "EXCLUDING "
        })?;
        // intervals print without spaces around the colon
        if self.interval {
            if let Exp::FunCall(call) = &self.value {
                if call.args.len() == 2 {
                    return write!(f, "{}:{}", call.args[0], call.args[1]);
                }
            }
        }
        write!(f, "{}", self.value)
    }
}

impl fmt::Display for SapVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for value in &self.values {
            write!(f, " {}", value)?;
        }
        Ok(())
    }
}

impl fmt::Display for MdxStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.formulas().is_empty() {
            f.write_str("WITH ")?;
            for formula in self.formulas() {
                write!(f, "{} ", formula)?;
            }
        }

        f.write_str("SELECT")?;
        for (i, axis) in self.axes().iter().enumerate() {
            f.write_str(if i == 0 { " " } else { ", " })?;
            write!(f, "{}", axis)?;
        }

        f.write_str(" FROM")?;
        if let Some(cube) = self.cube() {
            write!(f, " {}", cube)?;
        }

        if let Some(slicer) = self.slicer() {
            write!(f, " WHERE {}", slicer)?;
        }

        if !self.sap_variables().is_empty() {
            f.write_str(" SAP VARIABLES")?;
            for (i, variable) in self.sap_variables().iter().enumerate() {
                f.write_str(if i == 0 { " " } else { ", " })?;
                write!(f, "{}", variable)?;
            }
        }

        Ok(())
    }
}

impl MdxStatement {
    /// Render this statement as MDX text
    ///
    /// Printing never fails; a statement with no cube set is a caller
    /// precondition violation and prints with an empty FROM clause.
    pub fn to_mdx(&self) -> String {
        self.to_string()
    }
}
