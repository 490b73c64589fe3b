use std::collections::BTreeSet;

use crate::{
    ast::{Node, NodeKind},
    context::{Bindable, Bindings, Context},
    evaluator::{EvalError, Evaluator},
    value::Value,
};

/// A parsed expression bound to its own binding context.
///
/// Created by [`Builder::parse`](crate::Builder::parse). The context holds the
/// builder's defaults as they were at parse time plus an override layer that
/// the [`Bindable`] methods change. An expression can be evaluated any number
/// of times; variables are re-read on every evaluation.
///
/// # Examples
///
/// ```
/// use sprig_expr::{Bindable, Builder, Value};
///
/// let mut expr = Builder::new().parse("rate * Hours").unwrap();
/// expr.set_value("rate", 20.0).set_value("hours", 3.0);
///
/// assert_eq!(expr.eval().unwrap(), Value::Double(60.0));
/// assert!(expr.var_names().contains("hours"));
/// ```
#[derive(Clone, Debug)]
pub struct Expression {
    root: Node,
    context: Context,
    func_names: BTreeSet<String>,
    var_names: BTreeSet<String>,
}

impl Expression {
    pub(crate) fn new(root: Node, context: Context) -> Self {
        let func_names = root.names_of(NodeKind::FunctionCall);
        let var_names = root.names_of(NodeKind::Identifier);
        Expression {
            root,
            context,
            func_names,
            var_names,
        }
    }

    /// Evaluate against the current bindings.
    ///
    /// A value that cannot be converted to what an operator or function needs
    /// is reported as [`FunctionArgError::Conversion`](crate::FunctionArgError::Conversion).
    pub fn eval(&self) -> Result<Value, EvalError> {
        Evaluator::new(&self.context)
            .eval(&self.root)
            .map_err(EvalError::at_boundary)
    }

    /// Distinct function names called anywhere in the tree, lower-cased.
    pub fn func_names(&self) -> &BTreeSet<String> {
        &self.func_names
    }

    /// Distinct variable names referenced anywhere in the tree, lower-cased.
    /// Names in branches that evaluation would skip are included.
    pub fn var_names(&self) -> &BTreeSet<String> {
        &self.var_names
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn context(&self) -> &Context {
        &self.context
    }
}

impl Bindable for Expression {
    fn bindings_mut(&mut self) -> &mut Bindings {
        self.context.bindings_mut()
    }
}
