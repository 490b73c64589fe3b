//! # Sprig Expression Language - Abstract Syntax Tree
//!
//! This module defines the tokens and the tree produced when a source string
//! is parsed.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[operators]** - The kind tag of every tree node, with its arity
//! - **[node]** - The immutable tree node itself
//!
//! ## Operator Precedence
//!
//! From lowest to highest:
//!
//! ```text
//! ?:                 ternary            right-associative
//! ||                 logical or         right-associative
//! &&                 logical and        right-associative
//! == != <>           equality           right-associative
//! < <= > >= =< =>    relational         right-associative
//! + -                additive           left-associative
//! * / \              multiplicative     left-associative
//! ^                  power              right-associative
//! + - !              unary prefix
//! ```
//!
//! Parentheses, square brackets and braces all group an expression and
//! produce a pass-through [`NodeKind::NoOp`] node.
//!
//! ## Example
//!
//! ```text
//! a > 0 ? min(a, 10) : -a^2
//! ```
//!
//! parses to
//!
//! ```text
//! Conditional
//! ├── Gt
//! │   ├── Identifier "a"
//! │   └── Number "0"
//! ├── FunctionCall "min"
//! │   └── FunctionArgs
//! │       ├── Identifier "a"
//! │       └── Number "10"
//! └── Pow
//!     ├── Minus
//!     │   └── Identifier "a"
//!     └── Number "2"
//! ```
pub mod node;
pub mod operators;
pub mod tokens;

pub use node::Node;
pub use operators::NodeKind;
pub use tokens::Token;
