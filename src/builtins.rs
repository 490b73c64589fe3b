//! Functions and variables every [`Builder::new`](crate::Builder::new) starts
//! with.
//!
//! | Name                                   | Arguments | Result                 |
//! |----------------------------------------|-----------|------------------------|
//! | `true`, `false`                        | variable  | boolean                |
//! | `abs(x)`                               | 1         | double                 |
//! | `day`/`month`/`year(dt)`               | 1         | integer                |
//! | `hour`/`minute`/`second(dt)`           | 1         | integer                |
//! | `dateserial(y, m, d)`                  | 3         | date/time at midnight  |
//! | `timeserial(h, m, s)`                  | 3         | time on 0001-01-01     |
//! | `min(x, ...)`, `max(x, ...)`           | 1 or more | double                 |

use std::sync::Arc;

use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta, Timelike};

use crate::{
    context::{Bindings, Context, Function, Variable},
    evaluator::{Arity, EvalError, FunctionArgError},
    value::Value,
};

type FnResult = Result<Value, EvalError>;

/// Register the built-ins into `bindings`.
pub fn install(bindings: &mut Bindings) {
    bindings.insert_variable("true", variable(|_| Ok(Value::Boolean(true))));
    bindings.insert_variable("false", variable(|_| Ok(Value::Boolean(false))));

    bindings.insert_function("abs", function(|_, args| fn_abs(args)));

    bindings.insert_function("year", function(|_, args| date_part("year", args, |dt| dt.year().into())));
    bindings.insert_function("month", function(|_, args| date_part("month", args, |dt| dt.month().into())));
    bindings.insert_function("day", function(|_, args| date_part("day", args, |dt| dt.day().into())));
    bindings.insert_function("hour", function(|_, args| date_part("hour", args, |dt| dt.hour().into())));
    bindings.insert_function("minute", function(|_, args| date_part("minute", args, |dt| dt.minute().into())));
    bindings.insert_function("second", function(|_, args| date_part("second", args, |dt| dt.second().into())));

    bindings.insert_function("dateserial", function(|_, args| fn_dateserial(args)));
    bindings.insert_function("timeserial", function(|_, args| fn_timeserial(args)));

    bindings.insert_function("min", function(|_, args| extremum("min", args, |x, best| x < best)));
    bindings.insert_function("max", function(|_, args| extremum("max", args, |x, best| x > best)));
}

fn variable<F>(accessor: F) -> Variable
where
    F: Fn(&Context) -> FnResult + Send + Sync + 'static,
{
    Arc::new(accessor)
}

fn function<F>(accessor: F) -> Function
where
    F: Fn(&Context, &[Value]) -> FnResult + Send + Sync + 'static,
{
    Arc::new(accessor)
}

// =========================================================================
// Argument checks
// =========================================================================

fn require_args(args: &[Value], count: usize, name: &str) -> Result<(), FunctionArgError> {
    if args.len() != count {
        return Err(FunctionArgError::Count {
            name: name.to_string(),
            expected: Arity::Exactly(count),
            actual: args.len(),
        });
    }
    Ok(())
}

fn require_at_least(args: &[Value], count: usize, name: &str) -> Result<(), FunctionArgError> {
    if args.len() < count {
        return Err(FunctionArgError::Count {
            name: name.to_string(),
            expected: Arity::AtLeast(count),
            actual: args.len(),
        });
    }
    Ok(())
}

fn invalid(name: &str, message: impl Into<String>) -> EvalError {
    FunctionArgError::Invalid {
        name: name.to_string(),
        message: message.into(),
    }
    .into()
}

/// Three integer arguments, each narrowed to `T`.
fn triple<T: TryFrom<i64>>(name: &str, args: &[Value]) -> Result<[T; 3], EvalError> {
    require_args(args, 3, name)?;
    let mut parts = Vec::with_capacity(3);
    for arg in args {
        let n = arg.to_i64()?;
        let part = T::try_from(n).map_err(|_| invalid(name, format!("argument {} is out of range", n)))?;
        parts.push(part);
    }
    parts
        .try_into()
        .map_err(|_| invalid(name, "expected three arguments"))
}

// =========================================================================
// Numeric
// =========================================================================

fn fn_abs(args: &[Value]) -> FnResult {
    require_args(args, 1, "abs")?;
    Ok(Value::Double(args[0].to_f64()?.abs()))
}

fn extremum(name: &str, args: &[Value], better: fn(f64, f64) -> bool) -> FnResult {
    require_at_least(args, 1, name)?;
    let mut best = args[0].to_f64()?;
    for arg in &args[1..] {
        let x = arg.to_f64()?;
        if better(x, best) {
            best = x;
        }
    }
    Ok(Value::Double(best))
}

// =========================================================================
// Date/time
// =========================================================================

fn date_part(name: &str, args: &[Value], part: fn(&NaiveDateTime) -> i64) -> FnResult {
    require_args(args, 1, name)?;
    let dt = args[0].to_datetime()?;
    Ok(Value::Integer(part(&dt)))
}

fn fn_dateserial(args: &[Value]) -> FnResult {
    let [year, month, day]: [i32; 3] = triple("dateserial", args)?;
    let (Ok(month), Ok(day)) = (u32::try_from(month), u32::try_from(day)) else {
        return Err(invalid("dateserial", format!("{}-{}-{} is not a valid date", year, month, day)));
    };
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(Value::DateTime)
        .ok_or_else(|| invalid("dateserial", format!("{}-{}-{} is not a valid date", year, month, day)))
}

fn fn_timeserial(args: &[Value]) -> FnResult {
    let [hours, minutes, seconds]: [i64; 3] = triple("timeserial", args)?;
    let total = hours
        .checked_mul(3600)
        .and_then(|h| minutes.checked_mul(60).and_then(|m| h.checked_add(m)))
        .and_then(|hm| hm.checked_add(seconds))
        .ok_or_else(|| invalid("timeserial", "time span is out of range"))?;
    if total < 0 {
        return Err(invalid("timeserial", "time span is negative"));
    }

    let origin = NaiveDate::from_ymd_opt(1, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| invalid("timeserial", "no calendar origin"))?;
    TimeDelta::try_seconds(total)
        .and_then(|span| origin.checked_add_signed(span))
        .map(Value::DateTime)
        .ok_or_else(|| invalid("timeserial", "time span is out of range"))
}
