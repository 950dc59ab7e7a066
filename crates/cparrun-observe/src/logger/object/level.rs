use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::logger::LoggerError;

/// Validated `tracing_subscriber::EnvFilter` expression.
///
/// Used at the configuration layer:
/// - stores the raw filter string (e.g. `"warn"`, `"cparrun_exec=debug,warn"`);
/// - accepts only values `EnvFilter::try_new` can parse (CLI flag, env var, config);
/// - converts into an actual `EnvFilter` on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LoggerLevel(String);

impl LoggerLevel {
    /// Creates a new `LoggerLevel` from a string-like value.
    ///
    /// Convenience wrapper around [`TryFrom<String>`].
    ///
    /// # Examples
    /// ```
    /// use cparrun_observe::LoggerLevel;
    ///
    /// let lvl = LoggerLevel::new("info").unwrap();
    /// assert_eq!(lvl.as_str(), "info");
    /// assert!(LoggerLevel::new("cparrun_exec=loud").is_err());
    /// ```
    pub fn new(s: impl Into<String>) -> Result<Self, LoggerError> {
        Self::try_from(s.into())
    }

    /// Returns the filter string exactly as it was given.
    ///
    /// # Examples
    /// ```
    /// use cparrun_observe::LoggerLevel;
    ///
    /// let lvl = "cparrun_exec=trace,warn".parse::<LoggerLevel>().unwrap();
    /// assert_eq!(lvl.as_str(), "cparrun_exec=trace,warn");
    /// ```
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Builds the `tracing_subscriber::EnvFilter` for this level.
    ///
    /// Construction already validated the string; the `warn` fallback is never
    /// reached for a value built through this type.
    ///
    /// # Examples
    /// ```
    /// use cparrun_observe::LoggerLevel;
    ///
    /// let lvl = "cparrun_core=debug,warn".parse::<LoggerLevel>().unwrap();
    /// let _filter = lvl.to_env_filter();
    /// ```
    pub fn to_env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(self.as_str()).unwrap_or_else(|_| EnvFilter::new("warn"))
    }
}

impl Default for LoggerLevel {
    fn default() -> Self {
        LoggerLevel("warn".to_string())
    }
}

impl FromStr for LoggerLevel {
    type Err = LoggerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_owned())
    }
}

impl TryFrom<String> for LoggerLevel {
    type Error = LoggerError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        match EnvFilter::try_new(&s) {
            Ok(_) => Ok(LoggerLevel(s)),
            Err(e) => Err(LoggerError::InvalidLevel(format!("{s}: {e}"))),
        }
    }
}

impl From<LoggerLevel> for String {
    fn from(l: LoggerLevel) -> Self {
        l.0
    }
}

#[cfg(test)]
mod tests {
    use super::LoggerLevel;

    #[test]
    fn accepts_valid_levels() {
        for lvl in ["info", "warn", "trace", "cparrun_exec=trace,cparrun_core=debug,warn"] {
            assert!(lvl.parse::<LoggerLevel>().is_ok(), "expected {lvl} to parse");
        }
    }

    #[test]
    fn rejects_invalid_levels() {
        for lvl in ["cparrun_exec=verbose", "x=trace,y=wat"] {
            assert!(lvl.parse::<LoggerLevel>().is_err(), "expected {lvl} to fail");
        }
    }

    #[test]
    fn serde_from_plain_string() {
        let lvl: LoggerLevel = serde_json::from_str(r#""debug""#).unwrap();
        assert_eq!(lvl.as_str(), "debug");
        assert!(serde_json::from_str::<LoggerLevel>(r#""a=nope""#).is_err());
    }

    #[test]
    fn default_is_warn_and_valid() {
        let lvl = LoggerLevel::default();
        assert_eq!(lvl.as_str(), "warn");
        let _filter = lvl.to_env_filter();
    }

    #[test]
    fn new_matches_parse() {
        let a = LoggerLevel::new("debug").unwrap();
        let b: LoggerLevel = "debug".parse().unwrap();
        assert_eq!(a.as_str(), b.as_str());
    }
}
