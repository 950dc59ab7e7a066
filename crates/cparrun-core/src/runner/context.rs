use std::fmt;

use tracing::Span;

use cparrun_model::Env;

/// Shared context passed explicitly into parsing and execution.
///
/// Carries the base environment applied to every spawned process and the
/// tracing span all run diagnostics are recorded under.
#[derive(Clone)]
pub struct RunContext {
    env: Env,
    span: Span,
}

impl RunContext {
    pub fn new(env: Env, span: Span) -> Self {
        Self { env, span }
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Replace the environment and return updated context.
    pub fn with_env(mut self, env: Env) -> Self {
        self.env = env;
        self
    }

    /// Replace the span and return updated context.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self {
            env: Env::default(),
            span: Span::none(),
        }
    }
}

impl fmt::Debug for RunContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunContext")
            .field("env_len", &self.env.len())
            .field("span", &self.span.metadata().map(|m| m.name()))
            .finish()
    }
}

impl fmt::Display for RunContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RunContext(env_len={})", self.env.len())
    }
}
