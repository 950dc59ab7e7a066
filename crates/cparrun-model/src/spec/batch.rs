use std::{str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{
    domain::{Env, TimeoutMs},
    error::{ModelError, ModelResult},
    kind::ShellMode,
};

/// Declarative configuration of one batch run.
///
/// `BatchSpec` describes *how* a list of commands is executed:
/// - group size (`parallel`), which also caps peak concurrency
/// - wall-clock deadline per group (`timeout_ms`)
/// - process environment and shell mediation (`env`, `shell`)
/// - what a failed spawn does to the run (`on_spawn_error`)
///
/// Missing fields fall back to [`BatchSpec::default`] when deserialized.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BatchSpec {
    /// Number of commands launched together; the next group starts only after this one resolves.
    pub parallel: usize,
    /// Deadline for each group, measured from the moment all its processes are spawned.
    pub timeout_ms: TimeoutMs,
    /// Extra variables layered over the inherited environment of every process.
    #[serde(skip_serializing_if = "Env::is_empty")]
    pub env: Env,
    pub shell: ShellMode,
    pub on_spawn_error: SpawnPolicy,
}

impl Default for BatchSpec {
    fn default() -> Self {
        Self {
            parallel: 10,
            timeout_ms: 10_000,
            env: Env::new(),
            shell: ShellMode::Auto,
            on_spawn_error: SpawnPolicy::Abort,
        }
    }
}

impl BatchSpec {
    /// Rules:
    /// - `parallel` is at least 1.
    /// - `timeout_ms` is at least 1.
    pub fn validate(&self) -> ModelResult<()> {
        if self.parallel == 0 {
            return Err(ModelError::Invalid("parallel must be at least 1".into()));
        }
        if self.timeout_ms == 0 {
            return Err(ModelError::Invalid("timeout must be positive".into()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Convert a user-facing timeout in (fractional) seconds into milliseconds.
///
/// Rejects non-finite and non-positive values; anything that rounds below one
/// millisecond is clamped up to one.
pub fn timeout_ms_from_secs(secs: f64) -> ModelResult<TimeoutMs> {
    if !secs.is_finite() || secs <= 0.0 {
        return Err(ModelError::Invalid(format!(
            "timeout must be a positive number of seconds, got {secs}"
        )));
    }
    let ms = (secs * 1000.0).round();
    if ms >= u64::MAX as f64 {
        return Err(ModelError::Invalid(format!("timeout too large: {secs}s")));
    }
    Ok((ms as TimeoutMs).max(1))
}

/// Defines what happens when a process cannot be spawned.
///
/// - `Abort`: kill the group's already running processes and fail the whole run.
/// - `Record`: store an `ERROR_SPAWN_FAILED` record for that command and continue.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpawnPolicy {
    #[default]
    Abort,
    Record,
}

impl FromStr for SpawnPolicy {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" | "fatal" => Ok(SpawnPolicy::Abort),
            "record" | "isolate" => Ok(SpawnPolicy::Record),
            other => Err(ModelError::UnknownSpawnPolicy(other.to_string())),
        }
    }
}
