use std::fmt;

/// Kind tag of an AST node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    // Leaves
    /// Number literal; the node text holds the digits
    Number,
    /// Variable reference; the node text holds the name
    Identifier,

    // Calls
    /// Function call; the node text holds the name, the single child (if any)
    /// is the argument expression or a [`NodeKind::FunctionArgs`] chain
    FunctionCall,
    /// Comma-separated argument pair, right-folded: `a, b, c` is
    /// `FunctionArgs(a, FunctionArgs(b, c))`
    FunctionArgs,

    // Unary
    /// Grouping by `()`, `[]` or `{}`
    NoOp,
    /// Unary plus (`+x`)
    Plus,
    /// Negation (`-x`)
    Minus,
    /// Logical not (`!x`)
    Not,

    // Binary
    /// Power (`^`)
    Pow,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
    /// Integer division (`\`)
    IntDiv,
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Less than (`<`)
    Lt,
    /// Less than or equal (`<=`, `=<`)
    Le,
    /// Greater than (`>`)
    Gt,
    /// Greater than or equal (`>=`, `=>`)
    Ge,
    /// Equal (`==`)
    Eq,
    /// Not equal (`!=`, `<>`)
    Ne,
    /// Logical and (`&&`)
    And,
    /// Logical or (`||`)
    Or,

    // Ternary
    /// `cond ? then : else`
    Conditional,
}

impl NodeKind {
    /// Number of children a node of this kind must have, or `None` when the
    /// count is not fixed (function calls).
    pub fn arity(self) -> Option<usize> {
        use NodeKind::*;
        match self {
            Number | Identifier => Some(0),
            FunctionCall => None,
            NoOp | Plus | Minus | Not => Some(1),
            FunctionArgs | Pow | Mul | Div | IntDiv | Add | Sub | Lt | Le | Gt | Ge | Eq
            | Ne | And | Or => Some(2),
            Conditional => Some(3),
        }
    }

    pub fn name(self) -> &'static str {
        use NodeKind::*;
        match self {
            Number => "number",
            Identifier => "identifier",
            FunctionCall => "function call",
            FunctionArgs => "function arguments",
            NoOp => "group",
            Plus => "unary plus",
            Minus => "unary minus",
            Not => "not",
            Pow => "power",
            Mul => "multiply",
            Div => "divide",
            IntDiv => "integer divide",
            Add => "add",
            Sub => "subtract",
            Lt => "less than",
            Le => "less or equal",
            Gt => "greater than",
            Ge => "greater or equal",
            Eq => "equal",
            Ne => "not equal",
            And => "and",
            Or => "or",
            Conditional => "conditional",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
