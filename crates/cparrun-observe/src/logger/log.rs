use tracing::Dispatch;
use tracing_subscriber::{fmt, layer::SubscriberExt};

use crate::logger::{
    config::LoggerConfig,
    error::LoggerResult,
    object::{LoggerFormat, LoggerRfc3339},
};

/// Build the subscriber for `cfg` without installing it.
pub(crate) fn build_dispatch(cfg: &LoggerConfig) -> LoggerResult<Dispatch> {
    match cfg.format {
        LoggerFormat::Text => Ok(text(cfg)),
        LoggerFormat::Json => Ok(json(cfg)),
        LoggerFormat::Journald => journald(cfg),
    }
}

fn text(cfg: &LoggerConfig) -> Dispatch {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(cfg.should_use_color())
        .with_target(cfg.with_targets)
        .with_timer(LoggerRfc3339::new(cfg.tz));

    Dispatch::new(
        tracing_subscriber::registry()
            .with(cfg.level.to_env_filter())
            .with(layer),
    )
}

fn json(cfg: &LoggerConfig) -> Dispatch {
    let layer = fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(cfg.with_targets)
        .with_timer(LoggerRfc3339::new(cfg.tz));

    Dispatch::new(
        tracing_subscriber::registry()
            .with(cfg.level.to_env_filter())
            .with(layer),
    )
}

#[cfg(target_os = "linux")]
fn journald(cfg: &LoggerConfig) -> LoggerResult<Dispatch> {
    use crate::logger::error::LoggerError;

    let layer = tracing_journald::layer()
        .map_err(|e| LoggerError::JournaldInitFailed(e.to_string()))?
        .with_syslog_identifier("cparrun".to_string());

    Ok(Dispatch::new(
        tracing_subscriber::registry()
            .with(cfg.level.to_env_filter())
            .with(layer),
    ))
}

#[cfg(not(target_os = "linux"))]
fn journald(_cfg: &LoggerConfig) -> LoggerResult<Dispatch> {
    Err(crate::logger::error::LoggerError::JournaldNotSupported)
}

#[cfg(test)]
mod tests {
    use tracing::dispatcher;

    use super::*;

    #[test]
    fn text_and_json_dispatch_build() {
        for format in [LoggerFormat::Text, LoggerFormat::Json] {
            let cfg = LoggerConfig {
                format,
                use_color: false,
                ..Default::default()
            };
            build_dispatch(&cfg).unwrap();
        }
    }

    #[test]
    fn level_filter_applies_to_built_dispatch() {
        let cfg = LoggerConfig {
            level: "warn".parse().unwrap(),
            ..Default::default()
        };
        let dispatch = build_dispatch(&cfg).unwrap();

        dispatcher::with_default(&dispatch, || {
            assert!(tracing::enabled!(tracing::Level::WARN));
            assert!(!tracing::enabled!(tracing::Level::DEBUG));
        });
    }

    #[test]
    #[cfg(not(target_os = "linux"))]
    fn journald_is_rejected_off_linux() {
        let cfg = LoggerConfig {
            format: LoggerFormat::Journald,
            ..Default::default()
        };
        assert!(build_dispatch(&cfg).is_err());
    }
}
