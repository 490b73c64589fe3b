use thiserror::Error;

use crate::{evaluator::EvalError, parser::ParseError};

/// Failure of a one-shot [`Builder::eval`](crate::Builder::eval).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}
