//! Name resolution for variables and functions.
//!
//! A [`Context`] resolves names in two tiers: its own override layer first,
//! then an immutable snapshot of a builder's defaults. Names are matched
//! case-insensitively.

use std::{collections::HashMap, fmt, sync::Arc};

use tracing::trace;

use crate::{evaluator::EvalError, value::Value};

/// Accessor bound to a variable name. Called on every reference.
pub type Variable = Arc<dyn Fn(&Context) -> Result<Value, EvalError> + Send + Sync>;

/// Accessor bound to a function name, called with the evaluated arguments.
pub type Function = Arc<dyn Fn(&Context, &[Value]) -> Result<Value, EvalError> + Send + Sync>;

/// Tolerance used by multiply and equality: one hundred times the smallest
/// positive subnormal double.
pub fn near_zero(value: f64) -> bool {
    value.abs() < f64::from_bits(1) * 100.0
}

fn fold(name: &str) -> String {
    name.to_lowercase()
}

/// Case-insensitive name → accessor maps.
#[derive(Clone, Default)]
pub struct Bindings {
    variables: HashMap<String, Variable>,
    functions: HashMap<String, Function>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.get(&fold(name))
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.get(&fold(name))
    }

    pub fn insert_variable(&mut self, name: &str, variable: Variable) {
        self.variables.insert(fold(name), variable);
    }

    pub fn insert_function(&mut self, name: &str, function: Function) {
        self.functions.insert(fold(name), function);
    }

    pub fn remove_variable(&mut self, name: &str) {
        self.variables.remove(&fold(name));
    }

    pub fn remove_function(&mut self, name: &str) {
        self.functions.remove(&fold(name));
    }

    pub fn clear_variables(&mut self) {
        self.variables.clear();
    }

    pub fn clear_functions(&mut self) {
        self.functions.clear();
    }

    /// Bound variable names, lower-cased, in no particular order.
    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    /// Bound function names, lower-cased, in no particular order.
    pub fn function_names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }
}

impl fmt::Debug for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut variables: Vec<_> = self.variable_names().collect();
        let mut functions: Vec<_> = self.function_names().collect();
        variables.sort_unstable();
        functions.sort_unstable();
        f.debug_struct("Bindings")
            .field("variables", &variables)
            .field("functions", &functions)
            .finish()
    }
}

/// Fluent binding mutation, shared by the builder, contexts and expressions.
///
/// On a [`Builder`](crate::Builder) these change the defaults seen by future
/// snapshots; on a [`Context`] or [`Expression`](crate::Expression) they change
/// the instance's override layer only.
pub trait Bindable {
    /// The layer that mutations apply to.
    fn bindings_mut(&mut self) -> &mut Bindings;

    fn set_var<F>(&mut self, name: &str, variable: F) -> &mut Self
    where
        F: Fn(&Context) -> Result<Value, EvalError> + Send + Sync + 'static,
    {
        trace!(name, "binding variable");
        self.bindings_mut().insert_variable(name, Arc::new(variable));
        self
    }

    /// Bind a variable that always evaluates to `value`.
    fn set_value(&mut self, name: &str, value: impl Into<Value>) -> &mut Self {
        let value = value.into();
        self.set_var(name, move |_| Ok(value.clone()))
    }

    fn set_func<F>(&mut self, name: &str, function: F) -> &mut Self
    where
        F: Fn(&Context, &[Value]) -> Result<Value, EvalError> + Send + Sync + 'static,
    {
        trace!(name, "binding function");
        self.bindings_mut().insert_function(name, Arc::new(function));
        self
    }

    fn unset_var(&mut self, name: &str) -> &mut Self {
        trace!(name, "unbinding variable");
        self.bindings_mut().remove_variable(name);
        self
    }

    fn unset_func(&mut self, name: &str) -> &mut Self {
        trace!(name, "unbinding function");
        self.bindings_mut().remove_function(name);
        self
    }

    /// Remove every variable in this layer.
    fn reset_var(&mut self) -> &mut Self {
        trace!("clearing variables");
        self.bindings_mut().clear_variables();
        self
    }

    /// Remove every function in this layer.
    fn reset_func(&mut self) -> &mut Self {
        trace!("clearing functions");
        self.bindings_mut().clear_functions();
        self
    }
}

/// Binding scope used while evaluating one expression.
#[derive(Clone, Debug)]
pub struct Context {
    defaults: Arc<Bindings>,
    overrides: Bindings,
}

impl Context {
    /// A context over a defaults snapshot, with an empty override layer.
    pub fn new(defaults: Arc<Bindings>) -> Self {
        Context {
            defaults,
            overrides: Bindings::new(),
        }
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.overrides
            .variable(name)
            .or_else(|| self.defaults.variable(name))
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.overrides
            .function(name)
            .or_else(|| self.defaults.function(name))
    }

    pub fn defaults(&self) -> &Bindings {
        &self.defaults
    }

    pub fn overrides(&self) -> &Bindings {
        &self.overrides
    }

    pub fn near_zero(&self, value: f64) -> bool {
        near_zero(value)
    }
}

impl Bindable for Context {
    fn bindings_mut(&mut self) -> &mut Bindings {
        &mut self.overrides
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant(value: f64) -> Variable {
        Arc::new(move |_: &Context| Ok(Value::Double(value)))
    }

    fn lookup(context: &Context, name: &str) -> Option<Value> {
        context.variable(name).map(|v| v(context).unwrap())
    }

    #[test]
    fn test_override_shadows_default() {
        let mut defaults = Bindings::new();
        defaults.insert_variable("x", constant(1.0));
        let mut context = Context::new(Arc::new(defaults));

        assert_eq!(lookup(&context, "x"), Some(Value::Double(1.0)));
        context.set_value("X", 2.0);
        assert_eq!(lookup(&context, "x"), Some(Value::Double(2.0)));
        context.unset_var("x");
        assert_eq!(lookup(&context, "x"), Some(Value::Double(1.0)));
    }

    #[test]
    fn test_reset_only_clears_overrides() {
        let mut defaults = Bindings::new();
        defaults.insert_variable("x", constant(1.0));
        let mut context = Context::new(Arc::new(defaults));
        context.set_value("y", 2.0).reset_var();

        assert_eq!(lookup(&context, "y"), None);
        assert_eq!(lookup(&context, "x"), Some(Value::Double(1.0)));
    }

    #[test]
    fn test_near_zero_is_effectively_exact() {
        assert!(near_zero(0.0));
        assert!(near_zero(-0.0));
        assert!(near_zero(f64::from_bits(50)));
        assert!(!near_zero(1e-300));
        assert!(!near_zero(f64::EPSILON));
        assert!(!near_zero(f64::NAN));
    }
}
