//! Lenient coercion of model-supplied JSON arguments.
//!
//! Models are loose with JSON types: numbers arrive as strings, integers as
//! `3.0`, booleans as `"true"`. [`coerce`] normalizes a value to the
//! declared [`ParamType`] so handlers can deserialize it strictly.

use crate::error::{InvocationError, InvocationResult};
use crate::schema::ParamType;
use serde_json::{Map, Number, Value};

/// Coerce `value` to `ty`.
///
/// `key` names the argument in errors; nested elements extend it as
/// `arg1[0]` or `arg2.city`.
pub fn coerce(ty: &ParamType, key: &str, value: &Value) -> InvocationResult<Value> {
    let coerced = match (ty, value) {
        (_, Value::Null) => None,

        (ParamType::String, Value::String(_)) => Some(value.clone()),
        (ParamType::String, Value::Number(n)) => Some(Value::String(n.to_string())),
        (ParamType::String, Value::Bool(b)) => Some(Value::String(b.to_string())),

        (ParamType::Integer, Value::Number(n)) => integer_from_number(n),
        (ParamType::Integer, Value::String(s)) => integer_from_str(s.trim()),

        (ParamType::Number, Value::Number(_)) => Some(value.clone()),
        (ParamType::Number, Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number),

        (ParamType::Boolean, Value::Bool(_)) => Some(value.clone()),
        (ParamType::Boolean, Value::String(s)) => match s.trim() {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => None,
        },

        (ParamType::Array(element), Value::Array(items)) => {
            return match element.as_deref() {
                None => Ok(value.clone()),
                Some(element) => items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| coerce(element, &format!("{key}[{i}]"), item))
                    .collect::<InvocationResult<Vec<_>>>()
                    .map(Value::Array),
            };
        }

        (ParamType::Map(inner), Value::Object(fields)) => {
            return match inner.as_deref() {
                None => Ok(value.clone()),
                Some(inner) => fields
                    .iter()
                    .map(|(k, v)| Ok((k.clone(), coerce(inner, &format!("{key}.{k}"), v)?)))
                    .collect::<InvocationResult<Map<_, _>>>()
                    .map(Value::Object),
            };
        }

        (ParamType::Object, _) => Some(value.clone()),

        _ => None,
    };

    coerced.ok_or_else(|| InvocationError::TypeMismatch {
        key: key.to_string(),
        expected: ty.to_string(),
        found: json_kind(value).to_string(),
    })
}

fn integer_from_number(n: &Number) -> Option<Value> {
    if n.is_i64() || n.is_u64() {
        return Some(Value::Number(n.clone()));
    }
    let f = n.as_f64()?;
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(Value::from(f as i64))
    } else {
        None
    }
}

fn integer_from_str(s: &str) -> Option<Value> {
    if let Ok(i) = s.parse::<i64>() {
        return Some(Value::from(i));
    }
    s.parse::<u64>().ok().map(Value::from)
}

/// Short name of a JSON value's kind, used in error messages.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
