//! JSON rendering of evaluation results.
//!
//! Values map onto JSON as follows:
//!
//! - **Double** - a JSON number; NaN and the infinities have no JSON form and
//!   render as `null`
//! - **Integer** - a JSON integer
//! - **Boolean** - `true` or `false`
//! - **DateTime** - an ISO 8601 string, `"YYYY-MM-DDTHH:MM:SS"`
//!
//! # Examples
//!
//! ```
//! use sprig_expr::Value;
//! use sprig_expr::output::{to_json, to_json_pretty};
//!
//! assert_eq!(to_json(&Value::Integer(42)), "42");
//! assert_eq!(to_json(&Value::Double(1.0 / 0.0)), "null");
//!
//! // Identical for scalars
//! assert_eq!(to_json_pretty(&Value::Boolean(true)), "true");
//! ```

use serde_json::{Number, Value as Json};

use crate::value::Value;

pub struct JsonPrinter {
    pretty: bool,
}

impl JsonPrinter {
    pub fn new(pretty: bool) -> Self {
        JsonPrinter { pretty }
    }

    pub fn print(&self, value: &Value) -> String {
        let json = Json::from(value);
        if self.pretty {
            format!("{:#}", json)
        } else {
            json.to_string()
        }
    }
}

impl From<&Value> for Json {
    fn from(value: &Value) -> Self {
        match value {
            Value::Double(n) => Number::from_f64(*n).map_or(Json::Null, Json::Number),
            Value::Integer(n) => Json::Number((*n).into()),
            Value::Boolean(b) => Json::Bool(*b),
            Value::DateTime(_) => Json::String(value.to_string()),
        }
    }
}

pub fn to_json(value: &Value) -> String {
    JsonPrinter::new(false).print(value)
}

pub fn to_json_pretty(value: &Value) -> String {
    JsonPrinter::new(true).print(value)
}
