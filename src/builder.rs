use std::sync::Arc;

use tracing::debug;

use crate::{
    builtins,
    context::{Bindable, Bindings, Context},
    error::Error,
    expression::Expression,
    lexer::Lexer,
    parser::{DEFAULT_MAX_DEPTH, ParseError, Parser},
    value::Value,
};

/// Owner of the default bindings and entry point for parsing.
///
/// Every parsed [`Expression`] (and every [`Context`] from
/// [`Builder::context`]) takes a snapshot of the defaults as they are at that
/// moment. Changing the builder afterwards leaves existing snapshots alone:
/// the defaults are shared behind an `Arc` and copied on the first write after
/// a snapshot.
///
/// # Examples
///
/// ```
/// use sprig_expr::{Arity, Bindable, Builder, FunctionArgError, Value};
///
/// let mut builder = Builder::new();
/// builder.set_func("double", |_, args| match args {
///     [x] => Ok(Value::Double(x.to_f64()? * 2.0)),
///     _ => Err(FunctionArgError::Count {
///         name: "double".to_string(),
///         expected: Arity::Exactly(1),
///         actual: args.len(),
///     }
///     .into()),
/// });
///
/// assert_eq!(builder.eval("double(abs(-4))").unwrap(), Value::Double(8.0));
/// assert!(builder.eval("double()").is_err());
/// ```
#[derive(Clone, Debug)]
pub struct Builder {
    defaults: Arc<Bindings>,
    max_depth: usize,
}

impl Builder {
    /// A builder seeded with the built-in functions and variables.
    pub fn new() -> Self {
        let mut defaults = Bindings::new();
        builtins::install(&mut defaults);
        Builder {
            defaults: Arc::new(defaults),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// A builder with no bindings at all.
    pub fn empty() -> Self {
        Builder {
            defaults: Arc::new(Bindings::new()),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Cap on expression nesting depth accepted by [`Builder::parse`].
    ///
    /// Brackets, prefix operators, right-associative chains and ternaries
    /// count toward the cap. Parsing, evaluation and dropping grow the stack
    /// on demand, so a raised cap costs heap memory rather than risking a
    /// stack overflow.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn defaults(&self) -> &Bindings {
        &self.defaults
    }

    /// A binding context over a snapshot of the current defaults.
    pub fn context(&self) -> Context {
        Context::new(Arc::clone(&self.defaults))
    }

    pub fn parse(&self, source: &str) -> Result<Expression, ParseError> {
        let root = Parser::new(Lexer::new(source))
            .and_then(|parser| parser.with_max_depth(self.max_depth).parse())
            .inspect_err(|e| debug!(input = source, message = %e.message, "parse failed"))?;
        debug!(source, nodes = root.node_count(), "parsed expression");
        Ok(Expression::new(root, self.context()))
    }

    /// Parse `source` and evaluate it once.
    pub fn eval(&self, source: &str) -> Result<Value, Error> {
        Ok(self.parse(source)?.eval()?)
    }
}

impl Default for Builder {
    fn default() -> Self {
        Builder::new()
    }
}

impl Bindable for Builder {
    fn bindings_mut(&mut self) -> &mut Bindings {
        Arc::make_mut(&mut self.defaults)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_is_not_copied_until_written() {
        let builder = Builder::new();
        let context = builder.context();
        assert!(std::ptr::eq(context.defaults(), builder.defaults()));
    }

    #[test]
    fn test_write_after_snapshot_detaches() {
        let mut builder = Builder::new();
        let context = builder.context();
        builder.set_value("late", 1.0);

        assert!(builder.defaults().variable("late").is_some());
        assert!(context.variable("late").is_none());
        assert!(!std::ptr::eq(context.defaults(), builder.defaults()));
    }

    #[test]
    fn test_empty_has_no_builtins() {
        let builder = Builder::empty();
        assert_eq!(builder.defaults().function_names().count(), 0);
        assert_eq!(builder.defaults().variable_names().count(), 0);
    }
}
