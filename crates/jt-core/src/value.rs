use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// 2^53: beyond this not every whole number is representable.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Host-side view of a value produced inside a sandbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScriptValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<ScriptValue>),
    Map(BTreeMap<String, ScriptValue>),
}

impl ScriptValue {
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[ScriptValue]> {
        match self {
            Self::Array(values) => Some(values.as_slice()),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, ScriptValue>> {
        match self {
            Self::Map(values) => Some(values),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Map(_) => "record",
        }
    }

    /// Text form used where the sandbox hands back markup or messages.
    /// `Null` has no text.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Bool(value) => Some(value.to_string()),
            Self::Number(value) => {
                if value.fract() == 0.0 && value.abs() < MAX_SAFE_INTEGER {
                    Some((*value as i64).to_string())
                } else {
                    Some(value.to_string())
                }
            }
            Self::String(value) => Some(value.clone()),
            Self::Array(_) | Self::Map(_) => Some(format!("{:?}", self)),
        }
    }
}

impl From<&str> for ScriptValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ScriptValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}
