//! Variable types, value helpers and serde defaults for template configuration.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Name → value map supplied by callers when rendering or estimating.
pub type Bindings = BTreeMap<String, Value>;

/// Declared type of a template variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VariableType {
    #[default]
    String,
    Integer,
    Float,
    Boolean,
    List,
    Object,
}

impl VariableType {
    /// All variable types, in declaration order.
    pub const ALL: [VariableType; 6] = [
        VariableType::String,
        VariableType::Integer,
        VariableType::Float,
        VariableType::Boolean,
        VariableType::List,
        VariableType::Object,
    ];

    /// Parse a variable type from its configuration name.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "string" => Some(Self::String),
            "integer" => Some(Self::Integer),
            "float" => Some(Self::Float),
            "boolean" => Some(Self::Boolean),
            "list" => Some(Self::List),
            "object" => Some(Self::Object),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::List => "list",
            Self::Object => "object",
        }
    }

    /// Whether `value` has the shape this type requires.
    ///
    /// Booleans never count as numbers; `float` accepts integers too.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Float => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::List => value.is_array(),
            Self::Object => value.is_object(),
        }
    }

    /// Base token estimate for a value of this type when nothing better is known.
    pub fn base_token_estimate(&self) -> usize {
        match self {
            Self::String => 50,
            Self::Integer => 2,
            Self::Float => 3,
            Self::Boolean => 1,
            Self::List => 100,
            Self::Object => 150,
        }
    }
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Short kind name of a JSON value, used in type mismatch messages.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

/// Text form of a value, as the template engine prints it.
///
/// Strings are verbatim, `null` is `None`, booleans are `True`/`False`,
/// containers use the engine's literal syntax.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        other => minijinja::Value::from_serialize(other).to_string(),
    }
}

/// Render a list of allowed values for messages: `[formal, casual]`.
pub fn display_enum(values: &[Value]) -> String {
    let items: Vec<String> = values.iter().map(display_value).collect();
    format!("[{}]", items.join(", "))
}

pub(crate) fn default_true() -> bool {
    true
}

pub(crate) fn default_version() -> String {
    "1.0.0".to_string()
}

pub(crate) fn default_temperature() -> f64 {
    0.7
}

pub(crate) fn default_top_p() -> f64 {
    1.0
}
