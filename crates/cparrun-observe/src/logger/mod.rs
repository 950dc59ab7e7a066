mod config;
mod error;
mod log;
mod object;

pub use config::LoggerConfig;
pub use error::{LoggerError, LoggerResult};
pub use object::{LoggerFormat, LoggerLevel, LoggerRfc3339, LoggerTimeZone, init_local_offset};

use tracing::dispatcher::{self, DefaultGuard};

/// Installs the logger described by `cfg` as the process-wide default.
///
/// Fails with [`LoggerError::AlreadyInitialized`] if a global subscriber exists.
///
/// # Important: Local Timezone
/// For `LoggerTimeZone::Local`, call [`init_local_offset`] in `main()` before
/// any thread is spawned.
///
/// # Examples
/// ```rust
/// use cparrun_observe::{LoggerConfig, init_logger};
///
/// let config = LoggerConfig::default();
/// init_logger(&config).expect("Failed to initialize logger");
/// tracing::warn!("logger initialized");
/// ```
pub fn init_logger(cfg: &LoggerConfig) -> LoggerResult<()> {
    let dispatch = log::build_dispatch(cfg)?;
    dispatcher::set_global_default(dispatch).map_err(|_| LoggerError::AlreadyInitialized)
}

/// Installs the logger for the current thread until the returned guard is dropped.
///
/// Gives the caller an explicit init/teardown scope; useful with a
/// current-thread runtime and in tests.
///
/// ```rust
/// use cparrun_observe::{LoggerConfig, scoped_logger};
///
/// let _guard = scoped_logger(&LoggerConfig::default()).unwrap();
/// tracing::warn!("only visible while the guard lives");
/// ```
pub fn scoped_logger(cfg: &LoggerConfig) -> LoggerResult<DefaultGuard> {
    let dispatch = log::build_dispatch(cfg)?;
    Ok(dispatcher::set_default(&dispatch))
}
