use std::fmt;

use chrono::NaiveDateTime;
use thiserror::Error;

/// A dynamically typed scalar produced by evaluating an expression.
///
/// Every operator works on one of the conversions below rather than on the
/// stored representation, so a variable bound to `Value::Integer(3)` and a
/// literal `3` (which evaluates to `Value::Double(3.0)`) behave the same in
/// arithmetic.
///
/// # Examples
///
/// ```
/// use sprig_expr::Value;
///
/// let n = Value::Integer(2);
/// assert_eq!(n.to_f64().unwrap(), 2.0);
/// assert!(n.to_bool().unwrap());
///
/// let b = Value::Boolean(true);
/// assert_eq!(b.to_i64().unwrap(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Floating-point number; the result of every arithmetic operator
    Double(f64),

    /// 64-bit integer (date parts, integer division)
    Integer(i64),

    /// Result of comparisons and logical operators
    Boolean(bool),

    /// Calendar date and time, without a time zone
    DateTime(NaiveDateTime),
}

/// A conversion between value representations that cannot be satisfied.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    /// The source representation has no meaning in the target one
    #[error("cannot convert {from} to {to}")]
    InvalidCast {
        from: &'static str,
        to: &'static str,
    },

    /// Text that is not a number
    #[error("'{0}' is not a valid number")]
    Format(String),

    /// A number that does not fit the target type
    #[error("{value} is out of range for {to}")]
    OutOfRange { value: f64, to: &'static str },
}

impl Value {
    /// Human-readable name of the stored representation.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Double(_) => "double",
            Value::Integer(_) => "integer",
            Value::Boolean(_) => "boolean",
            Value::DateTime(_) => "datetime",
        }
    }

    /// Convert to a double. Booleans become `1.0`/`0.0`.
    pub fn to_f64(&self) -> Result<f64, ConversionError> {
        match self {
            Value::Double(n) => Ok(*n),
            Value::Integer(n) => Ok(*n as f64),
            Value::Boolean(b) => Ok(if *b { 1.0 } else { 0.0 }),
            Value::DateTime(_) => Err(self.invalid_cast("double")),
        }
    }

    /// Convert to a 64-bit integer.
    ///
    /// Doubles are rounded to the nearest integer, ties to even, and must be
    /// finite and within `i64` range.
    pub fn to_i64(&self) -> Result<i64, ConversionError> {
        match self {
            Value::Integer(n) => Ok(*n),
            Value::Boolean(b) => Ok(i64::from(*b)),
            Value::Double(n) => {
                let rounded = n.round_ties_even();
                // i64::MAX is not representable as f64; 2^63 is the first value past it
                if rounded.is_finite() && rounded >= i64::MIN as f64 && rounded < 9.223_372_036_854_775_808e18 {
                    Ok(rounded as i64)
                } else {
                    Err(ConversionError::OutOfRange {
                        value: *n,
                        to: "integer",
                    })
                }
            }
            Value::DateTime(_) => Err(self.invalid_cast("integer")),
        }
    }

    /// Convert to a boolean. Numbers are true when non-zero.
    pub fn to_bool(&self) -> Result<bool, ConversionError> {
        match self {
            Value::Boolean(b) => Ok(*b),
            Value::Integer(n) => Ok(*n != 0),
            Value::Double(n) => Ok(*n != 0.0),
            Value::DateTime(_) => Err(self.invalid_cast("boolean")),
        }
    }

    /// Convert to a date/time. Only date/time values convert.
    pub fn to_datetime(&self) -> Result<NaiveDateTime, ConversionError> {
        match self {
            Value::DateTime(dt) => Ok(*dt),
            _ => Err(self.invalid_cast("datetime")),
        }
    }

    /// Parse the source text of a number literal.
    pub fn parse_number(text: &str) -> Result<Value, ConversionError> {
        text.parse::<f64>()
            .map(Value::Double)
            .map_err(|_| ConversionError::Format(text.to_string()))
    }

    fn invalid_cast(&self, to: &'static str) -> ConversionError {
        ConversionError::InvalidCast {
            from: self.type_name(),
            to,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Double(n) => write!(f, "{}", n),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S")),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Double(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}
