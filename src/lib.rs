//! # Sprig
//!
//! A small infix expression language: arithmetic, comparisons, boolean logic,
//! a ternary conditional, and user-supplied variables and functions.
//!
//! Source text is parsed once into an immutable tree and evaluated against a
//! two-tier binding context. A [`Builder`] owns the default bindings;
//! each parsed [`Expression`] snapshots them and layers its own overrides on
//! top.
//!
//! ```
//! use sprig_expr::{Bindable, Builder, Value};
//!
//! let builder = Builder::new();
//! assert_eq!(builder.eval("2^10").unwrap(), Value::Double(1024.0));
//!
//! let mut expr = builder.parse("x > 0 ? max(x, 10) : -x").unwrap();
//! expr.set_value("x", 12.0);
//! assert_eq!(expr.eval().unwrap(), Value::Double(12.0));
//! expr.set_value("x", -3.0);
//! assert_eq!(expr.eval().unwrap(), Value::Double(3.0));
//! ```
pub mod ast;
pub mod builder;
pub mod builtins;
pub mod context;
pub mod error;
pub mod evaluator;
pub mod expression;
pub mod lexer;
pub mod output;
pub mod parser;
mod stack;
pub mod value;

pub use ast::{Node, NodeKind, Token};
pub use builder::Builder;
pub use context::{Bindable, Bindings, Context, Function, Variable, near_zero};
pub use error::Error;
pub use evaluator::{
    Arity, EvalError, Evaluator, FunctionArgError, InternalError, UndefinedName,
};
pub use expression::Expression;
pub use lexer::{LexError, Lexer};
pub use output::{to_json, to_json_pretty};
pub use parser::{DEFAULT_MAX_DEPTH, ParseError, Parser};
pub use value::{ConversionError, Value};
