use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::Value;

use crate::{ModelError, ModelResult};

/// Parsed unit of a command template.
///
/// Serialized untagged: a literal is a JSON string, alternatives are a JSON array
/// of strings. Deserialization goes through [`Segment::from_value`], so an empty
/// array is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Segment {
    /// Fixed text copied into every combination.
    Literal(String),
    /// Ordered set of values; each combination picks exactly one.
    Alternatives(Vec<String>),
}

impl Segment {
    pub fn literal(value: impl Into<String>) -> Self {
        Segment::Literal(value.into())
    }

    /// Build an alternatives segment, rejecting an empty value list.
    pub fn alternatives<I, S>(values: I) -> ModelResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return Err(ModelError::EmptyAlternatives);
        }
        Ok(Segment::Alternatives(values))
    }

    /// Returns the kind as a static string.
    pub fn kind(&self) -> &'static str {
        match self {
            Segment::Literal(_) => "literal",
            Segment::Alternatives(_) => "alternatives",
        }
    }

    /// Number of distinct values this segment contributes to the product.
    pub fn width(&self) -> usize {
        match self {
            Segment::Literal(_) => 1,
            Segment::Alternatives(values) => values.len(),
        }
    }

    /// Interpret a loosely-typed JSON value as a segment.
    ///
    /// Strings become literals and non-empty arrays of strings become alternatives.
    /// Anything else is reported as [`ModelError::UnsupportedSegment`].
    pub fn from_value(value: &Value) -> ModelResult<Self> {
        match value {
            Value::String(s) => Ok(Segment::Literal(s.clone())),
            Value::Array(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::String(s) => values.push(s.clone()),
                        other => {
                            return Err(ModelError::UnsupportedSegment(format!(
                                "array containing {}",
                                json_kind(other)
                            )));
                        }
                    }
                }
                Segment::alternatives(values)
            }
            other => Err(ModelError::UnsupportedSegment(json_kind(other).to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for Segment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Segment::from_value(&value).map_err(de::Error::custom)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
