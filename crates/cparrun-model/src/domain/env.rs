use serde::{Deserialize, Serialize};

use crate::KeyValue;

/// Environment variables layered on top of the inherited process environment.
///
/// Stored as an ordered list; later entries win, both on lookup and when applied
/// to a child process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Env(pub Vec<KeyValue>);

impl Env {
    /// Create an empty environment.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Create an environment containing a single key–value pair.
    pub fn single<K, V>(key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self(vec![KeyValue::new(key, value)])
    }

    /// Number of entries, overridden ones included.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the environment has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over all key–value pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &KeyValue> {
        self.0.iter()
    }

    /// Get the effective value for a key (last matching entry).
    ///
    /// # Examples
    /// ```
    /// use cparrun_model::Env;
    ///
    /// let mut env = Env::single("MODE", "one");
    /// env.push("MODE", "two");
    /// assert_eq!(env.get("MODE"), Some("two"));
    /// assert_eq!(env.get("OTHER"), None);
    /// ```
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find(|kv| kv.key() == key)
            .map(|kv| kv.value())
    }

    /// Append a key–value pair.
    ///
    /// Later entries override earlier ones, both for [`Env::get`] and when the
    /// environment is applied to a child process.
    pub fn push<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.0.push(KeyValue::new(key, value));
    }

    /// Concatenate two environments; entries from `other` override `self`.
    ///
    /// Nothing is deduplicated; [`Env::get`] resolves overrides by scanning
    /// from the end.
    pub fn merged(&self, other: &Env) -> Env {
        let mut out = self.0.clone();
        out.extend(other.0.iter().cloned());
        Env(out)
    }
}

impl FromIterator<KeyValue> for Env {
    fn from_iter<I: IntoIterator<Item = KeyValue>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::Env;
    use crate::KeyValue;

    #[test]
    fn later_entries_override_earlier_ones() {
        let mut env = Env::new();
        env.push("MODE", "one");
        env.push("HOST", "a");
        env.push("MODE", "two");

        assert_eq!(env.get("MODE"), Some("two"));
        assert_eq!(env.get("HOST"), Some("a"));
        assert!(env.get("MISSING").is_none());
    }

    #[test]
    fn merged_prefers_other() {
        let base: Env = ["A=base", "B=keep"]
            .iter()
            .map(|s| s.parse::<KeyValue>().unwrap())
            .collect();
        let mut other = Env::new();
        other.push("A", "override");

        let merged = base.merged(&other);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged.get("A"), Some("override"));
        assert_eq!(merged.get("B"), Some("keep"));
    }

    #[test]
    fn serializes_as_plain_array() {
        let mut env = Env::new();
        env.push("FOO", "bar");

        let json = serde_json::to_string(&env).unwrap();
        assert_eq!(json, r#"[{"key":"FOO","value":"bar"}]"#);
    }
}
