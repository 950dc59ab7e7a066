use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Single environment variable assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    key: String,
    value: String,
}

impl KeyValue {
    /// Create an assignment from any string-like key and value.
    ///
    /// No validation happens here; use [`str::parse`] for user input.
    pub fn new<K, V>(key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Variable name.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Assigned value, possibly empty.
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Parses a shell-style `KEY=VALUE` assignment.
///
/// Only the first `=` separates key from value, so values may contain `=`.
/// The key must be non-empty after trimming.
///
/// # Examples
/// ```
/// use cparrun_model::KeyValue;
///
/// let kv: KeyValue = "OPTS=a=1".parse().unwrap();
/// assert_eq!(kv.key(), "OPTS");
/// assert_eq!(kv.value(), "a=1");
/// assert!("=oops".parse::<KeyValue>().is_err());
/// ```
impl FromStr for KeyValue {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((key, value)) = s.split_once('=') else {
            return Err(ModelError::InvalidAssignment(s.to_string()));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(ModelError::InvalidAssignment(s.to_string()));
        }
        Ok(Self::new(key, value))
    }
}

impl From<(&str, &str)> for KeyValue {
    fn from((key, value): (&str, &str)) -> Self {
        Self::new(key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::KeyValue;

    #[test]
    fn parses_assignment() {
        let kv: KeyValue = "FOO=bar".parse().unwrap();
        assert_eq!(kv.key(), "FOO");
        assert_eq!(kv.value(), "bar");
    }

    #[test]
    fn value_keeps_extra_equals_signs() {
        let kv: KeyValue = "OPTS=a=1,b=2".parse().unwrap();
        assert_eq!(kv.key(), "OPTS");
        assert_eq!(kv.value(), "a=1,b=2");
    }

    #[test]
    fn empty_value_is_allowed() {
        let kv: KeyValue = "EMPTY=".parse().unwrap();
        assert_eq!(kv.value(), "");
    }

    #[test]
    fn rejects_missing_separator_or_key() {
        for bad in ["FOO", "=bar", "  =x", ""] {
            assert!(
                bad.parse::<KeyValue>().is_err(),
                "expected {bad:?} to be rejected"
            );
        }
    }
}
