//! Parameter types and their JSON-schema rendering.
//!
//! Every capability parameter is declared with a [`ParamType`]. The type is
//! rendered into the JSON-schema fragment the model sees, and drives the
//! coercion applied to the model's arguments before the handler runs
//! (see [`crate::value::coerce`]).
//!
//! | Declared type | Schema |
//! |---|---|
//! | `String` | `{"type": "string"}` |
//! | `Integer` | `{"type": "integer"}` |
//! | `Number` | `{"type": "number"}` |
//! | `Boolean` | `{"type": "boolean"}` |
//! | `Array(None)` | `{"type": "array", "items": {}}` |
//! | `Array(Some(t))` | `{"type": "array", "items": describe(t)}` |
//! | `Map(None)` | `{"type": "object", "additionalProperties": {}}` |
//! | `Map(Some(v))` | `{"type": "object", "additionalProperties": describe(v)}` |
//! | `Object` | `{"type": "object"}` |

use serde_json::{Map, Value, json};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Declared type of a capability parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamType {
    String,
    Integer,
    Number,
    Boolean,
    /// A sequence, optionally with a known element type.
    Array(Option<Box<ParamType>>),
    /// A string-keyed mapping, optionally with a known value type.
    Map(Option<Box<ParamType>>),
    /// Any other structured value.
    Object,
}

impl ParamType {
    /// The parameter type of a Rust type.
    pub fn of<T: Describe + ?Sized>() -> Self {
        T::param_type()
    }

    pub fn array_of(element: ParamType) -> Self {
        ParamType::Array(Some(Box::new(element)))
    }

    pub fn map_of(value: ParamType) -> Self {
        ParamType::Map(Some(Box::new(value)))
    }

    /// Render the JSON-schema fragment for this type.
    pub fn describe(&self) -> Value {
        match self {
            ParamType::String => json!({"type": "string"}),
            ParamType::Integer => json!({"type": "integer"}),
            ParamType::Number => json!({"type": "number"}),
            ParamType::Boolean => json!({"type": "boolean"}),
            ParamType::Array(element) => json!({
                "type": "array",
                "items": element.as_deref().map_or_else(|| json!({}), ParamType::describe),
            }),
            ParamType::Map(value) => json!({
                "type": "object",
                "additionalProperties": value.as_deref().map_or_else(|| json!({}), ParamType::describe),
            }),
            ParamType::Object => json!({"type": "object"}),
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::String => write!(f, "string"),
            ParamType::Integer => write!(f, "integer"),
            ParamType::Number => write!(f, "number"),
            ParamType::Boolean => write!(f, "boolean"),
            ParamType::Array(None) => write!(f, "array"),
            ParamType::Array(Some(element)) => write!(f, "array<{element}>"),
            ParamType::Map(None) => write!(f, "map"),
            ParamType::Map(Some(value)) => write!(f, "map<{value}>"),
            ParamType::Object => write!(f, "object"),
        }
    }
}

/// Rust types with a known [`ParamType`].
pub trait Describe {
    fn param_type() -> ParamType;
}

macro_rules! describe_as {
    ($kind:expr => $($ty:ty),+ $(,)?) => {
        $(
            impl Describe for $ty {
                fn param_type() -> ParamType {
                    $kind
                }
            }
        )+
    };
}

describe_as!(ParamType::String => String, str, char);
describe_as!(ParamType::Integer => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
describe_as!(ParamType::Number => f32, f64);
describe_as!(ParamType::Boolean => bool);
describe_as!(ParamType::Object => Value);

impl<T: Describe + ?Sized> Describe for &T {
    fn param_type() -> ParamType {
        T::param_type()
    }
}

impl<T: Describe> Describe for Vec<T> {
    fn param_type() -> ParamType {
        ParamType::array_of(T::param_type())
    }
}

impl<T: Describe> Describe for [T] {
    fn param_type() -> ParamType {
        ParamType::array_of(T::param_type())
    }
}

impl<V: Describe, S> Describe for HashMap<String, V, S> {
    fn param_type() -> ParamType {
        ParamType::map_of(V::param_type())
    }
}

impl<V: Describe> Describe for BTreeMap<String, V> {
    fn param_type() -> ParamType {
        ParamType::map_of(V::param_type())
    }
}

/// How a declared parameter is filled at invocation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamKind {
    /// Receives the conversation context. Never visible to the model.
    Context,
    /// Filled from the model's arguments.
    Value(ParamType),
}

/// A declared capability parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub kind: ParamKind,
    pub description: Option<String>,
}

impl Param {
    /// The conversation-context parameter.
    pub fn context() -> Self {
        Self {
            kind: ParamKind::Context,
            description: None,
        }
    }

    pub fn value(ty: ParamType) -> Self {
        Self {
            kind: ParamKind::Value(ty),
            description: None,
        }
    }

    /// A value parameter typed after `T`.
    pub fn of<T: Describe + ?Sized>() -> Self {
        Self::value(ParamType::of::<T>())
    }

    /// Attach a description shown to the model.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_context(&self) -> bool {
        matches!(self.kind, ParamKind::Context)
    }

    pub fn param_type(&self) -> Option<&ParamType> {
        match &self.kind {
            ParamKind::Context => None,
            ParamKind::Value(ty) => Some(ty),
        }
    }
}

/// Property key of the visible parameter at `index`.
///
/// Context parameters do not consume an index.
pub fn argument_key(index: usize) -> String {
    format!("arg{index}")
}

/// Build the top-level parameters schema of a capability.
///
/// ```rust
/// use handoff_core::schema::{Param, ParamType, parameters_schema};
/// use serde_json::json;
///
/// let schema = parameters_schema(&[
///     Param::context(),
///     Param::value(ParamType::String).describe("ticker symbol"),
/// ]);
/// assert_eq!(schema, json!({
///     "type": "object",
///     "properties": {"arg0": {"type": "string", "description": "ticker symbol"}},
///     "required": ["arg0"],
///     "additionalProperties": false
/// }));
/// ```
pub fn parameters_schema(params: &[Param]) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for (index, (ty, description)) in params
        .iter()
        .filter_map(|p| p.param_type().map(|ty| (ty, p.description.as_deref())))
        .enumerate()
    {
        let key = argument_key(index);
        let mut fragment = ty.describe();
        if let (Some(description), Value::Object(fields)) = (description, &mut fragment) {
            fields.insert("description".to_string(), json!(description));
        }
        properties.insert(key.clone(), fragment);
        required.push(Value::String(key));
    }

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false,
    })
}
