use std::{collections::VecDeque, fmt};

use thiserror::Error;
use tracing::trace;

use crate::{
    ast::{Node, NodeKind},
    context::Context,
    stack::ensure_sufficient_stack,
    value::{ConversionError, Value},
};

/// A name bound in neither the override layer nor the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UndefinedName {
    #[error("variable {0} is undefined")]
    Variable(String),

    #[error("function {0} is undefined")]
    Function(String),
}

/// Argument count a function accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exactly(n) => write!(f, "{}", n),
            Arity::AtLeast(n) => write!(f, "at least {}", n),
        }
    }
}

/// Bad arguments passed to a function or operator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FunctionArgError {
    #[error("function {name} expects {expected} arguments but found {actual} arguments")]
    Count {
        name: String,
        expected: Arity,
        actual: usize,
    },

    /// An operand could not be coerced to the representation an operator or
    /// function needs
    #[error("failed to parse argument: {0}")]
    Conversion(ConversionError),

    #[error("function {name}: {message}")]
    Invalid { name: String, message: String },
}

/// A node whose shape no parser output can have.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InternalError {
    #[error("{kind} node expects {expected} operands but has {actual}")]
    ArityMismatch {
        kind: NodeKind,
        expected: usize,
        actual: usize,
    },

    #[error("{kind} node must not have children but has {count}")]
    UnexpectedChildren { kind: NodeKind, count: usize },
}

/// Errors that can occur while evaluating an expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error(transparent)]
    Undefined(#[from] UndefinedName),

    #[error(transparent)]
    FunctionArg(#[from] FunctionArgError),

    /// Raw conversion failure. [`Expression::eval`](crate::Expression::eval)
    /// reports these as [`FunctionArgError::Conversion`].
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// An argument list outside of a function call
    #[error("unexpected comma")]
    UnexpectedComma,

    #[error("internal error: {0}")]
    Internal(#[from] InternalError),
}

impl EvalError {
    /// Fold raw conversion failures into function-argument errors.
    pub(crate) fn at_boundary(self) -> Self {
        match self {
            EvalError::Conversion(e) => EvalError::FunctionArg(FunctionArgError::Conversion(e)),
            other => other,
        }
    }
}

fn check_arity(node: &Node) -> Result<(), InternalError> {
    let Some(expected) = node.kind().arity() else {
        return Ok(());
    };
    let actual = node.children().len();
    match (expected, actual) {
        (e, a) if e == a => Ok(()),
        (0, count) => Err(InternalError::UnexpectedChildren {
            kind: node.kind(),
            count,
        }),
        (expected, actual) => Err(InternalError::ArityMismatch {
            kind: node.kind(),
            expected,
            actual,
        }),
    }
}

/// Tree-walking evaluator over a bound context.
///
/// # Examples
///
/// ```
/// use sprig_expr::{Builder, Evaluator, Value, lexer::Lexer, parser::Parser};
///
/// let root = Parser::new(Lexer::new("abs(-2) * 3")).unwrap().parse().unwrap();
/// let context = Builder::new().context();
///
/// let result = Evaluator::new(&context).eval(&root).unwrap();
/// assert_eq!(result, Value::Double(6.0));
/// ```
pub struct Evaluator<'a> {
    context: &'a Context,
}

impl<'a> Evaluator<'a> {
    pub fn new(context: &'a Context) -> Self {
        Evaluator { context }
    }

    /// Evaluate `node`. Conversion failures are returned raw as
    /// [`EvalError::Conversion`].
    pub fn eval(&self, node: &Node) -> Result<Value, EvalError> {
        ensure_sufficient_stack(|| self.eval_node(node))
    }

    fn eval_node(&self, node: &Node) -> Result<Value, EvalError> {
        use NodeKind::*;

        check_arity(node)?;
        let operands = node.children();

        match node.kind() {
            Number => Ok(Value::parse_number(node.text())?),
            Identifier => {
                let variable = self
                    .context
                    .variable(node.text())
                    .ok_or_else(|| UndefinedName::Variable(node.text().to_string()))?;
                variable(self.context)
            }
            FunctionCall => self.eval_call(node),
            FunctionArgs => Err(EvalError::UnexpectedComma),

            NoOp | Plus => self.eval(&operands[0]),
            Minus => Ok(Value::Double(-self.eval_f64(&operands[0])?)),
            Not => Ok(Value::Boolean(!self.eval_bool(&operands[0])?)),

            Pow => {
                let base = self.eval_f64(&operands[0])?;
                let exponent = self.eval_f64(&operands[1])?;
                Ok(Value::Double(base.powf(exponent)))
            }
            Mul => {
                let left = self.eval_f64(&operands[0])?;
                if self.context.near_zero(left) {
                    trace!("zero left operand, skipping right side of multiply");
                    return Ok(Value::Double(0.0));
                }
                Ok(Value::Double(left * self.eval_f64(&operands[1])?))
            }
            Div => self.arithmetic(operands, |a, b| a / b),
            IntDiv => {
                let dividend = self.eval_i64(&operands[0])?;
                let divisor = self.eval_i64(&operands[1])?;
                // Zero divisor (or i64::MIN / -1) falls back to float division
                Ok(match dividend.checked_div(divisor) {
                    Some(quotient) => Value::Integer(quotient),
                    None => Value::Double(dividend as f64 / divisor as f64),
                })
            }
            Add => self.arithmetic(operands, |a, b| a + b),
            Sub => self.arithmetic(operands, |a, b| a - b),

            Lt => self.comparison(operands, |a, b| a < b),
            Le => self.comparison(operands, |a, b| a <= b),
            Gt => self.comparison(operands, |a, b| a > b),
            Ge => self.comparison(operands, |a, b| a >= b),
            Eq => self.comparison(operands, |a, b| crate::context::near_zero(a - b)),
            Ne => self.comparison(operands, |a, b| !crate::context::near_zero(a - b)),

            // Both sides are always evaluated
            And => {
                let left = self.eval_bool(&operands[0])?;
                let right = self.eval_bool(&operands[1])?;
                Ok(Value::Boolean(left && right))
            }
            Or => {
                let left = self.eval_bool(&operands[0])?;
                let right = self.eval_bool(&operands[1])?;
                Ok(Value::Boolean(left || right))
            }

            Conditional => {
                if self.eval_bool(&operands[0])? {
                    self.eval(&operands[1])
                } else {
                    self.eval(&operands[2])
                }
            }
        }
    }

    /// Flatten the argument chain, evaluating each argument in order, then
    /// invoke the bound function.
    fn eval_call(&self, node: &Node) -> Result<Value, EvalError> {
        let mut args = Vec::new();
        let mut pending: VecDeque<&Node> = node.children().iter().collect();
        while let Some(arg) = pending.pop_front() {
            if arg.kind() == NodeKind::FunctionArgs {
                check_arity(arg)?;
                pending.extend(arg.children());
            } else {
                args.push(self.eval(arg)?);
            }
        }

        let name = node.text();
        let function = self
            .context
            .function(name)
            .ok_or_else(|| UndefinedName::Function(name.to_string()))?;
        trace!(name, argc = args.len(), "calling function");
        function(self.context, &args)
    }

    fn eval_f64(&self, node: &Node) -> Result<f64, EvalError> {
        Ok(self.eval(node)?.to_f64()?)
    }

    fn eval_i64(&self, node: &Node) -> Result<i64, EvalError> {
        Ok(self.eval(node)?.to_i64()?)
    }

    fn eval_bool(&self, node: &Node) -> Result<bool, EvalError> {
        Ok(self.eval(node)?.to_bool()?)
    }

    fn arithmetic(&self, operands: &[Node], op: fn(f64, f64) -> f64) -> Result<Value, EvalError> {
        let left = self.eval_f64(&operands[0])?;
        let right = self.eval_f64(&operands[1])?;
        Ok(Value::Double(op(left, right)))
    }

    fn comparison(&self, operands: &[Node], op: fn(f64, f64) -> bool) -> Result<Value, EvalError> {
        let left = self.eval_f64(&operands[0])?;
        let right = self.eval_f64(&operands[1])?;
        Ok(Value::Boolean(op(left, right)))
    }
}
