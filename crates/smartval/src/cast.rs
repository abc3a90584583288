//! Final narrowing cast to the primitive named by a field's first rule.

use crate::value::{as_f64, scalar_text};
use serde_json::{Number, Value};

/// Primitive type tags that trigger the final cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag {
    String,
    Int,
    Float,
    Bool,
}

impl TypeTag {
    /// Tag for a rule name, if it names a primitive.
    pub fn from_rule(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Self::String),
            "int" => Some(Self::Int),
            "float" => Some(Self::Float),
            "bool" => Some(Self::Bool),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
        }
    }

    /// Cast `value` to this type. The cast is total: values with no
    /// sensible reading in the target type are returned unchanged.
    pub fn cast(&self, value: Value) -> Value {
        match self {
            Self::String => match scalar_text(&value) {
                Some(text) => Value::String(text),
                None => Value::String(value.to_string()),
            },
            Self::Int => {
                if value.is_i64() || value.is_u64() {
                    return value;
                }
                match &value {
                    Value::Bool(b) => Value::from(i64::from(*b)),
                    _ => match as_f64(&value) {
                        Some(n) if n.is_finite() => Value::from(n.trunc() as i64),
                        _ => value,
                    },
                }
            }
            Self::Float => match &value {
                Value::Bool(b) => float_value(if *b { 1.0 } else { 0.0 }).unwrap_or(value),
                _ => as_f64(&value).and_then(float_value).unwrap_or(value),
            },
            Self::Bool => match &value {
                Value::Bool(_) => value,
                Value::Number(n) => Value::Bool(n.as_f64().is_some_and(|n| n != 0.0)),
                Value::String(s) => Value::Bool(matches!(
                    s.trim().to_ascii_lowercase().as_str(),
                    "1" | "true" | "on" | "yes"
                )),
                Value::Array(items) => Value::Bool(!items.is_empty()),
                Value::Object(map) => Value::Bool(!map.is_empty()),
                Value::Null => Value::Bool(false),
            },
        }
    }
}

fn float_value(n: f64) -> Option<Value> {
    Number::from_f64(n).map(Value::Number)
}
