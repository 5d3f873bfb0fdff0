//! Logging setup.
//!
//! Installs a `tracing` subscriber with:
//! - Console output on stderr (compact, human-readable)
//! - Optional daily-rolling file output when [`LogConfig::dir`] is set
//! - An `EnvFilter` taken from `RUST_LOG`, falling back to [`LogConfig::level`]

use crate::config::LogConfig;
use crate::error::{Result, SageError};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILES_KEPT: usize = 7;

/// Install the global subscriber. Fails if one is already installed.
pub fn try_init(cfg: &LogConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let file_layer = match &cfg.dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("sagelock")
                .filename_suffix("log")
                .max_log_files(LOG_FILES_KEPT)
                .build(dir)
                .map_err(|e| SageError::Logger(e.to_string()))?;
            Some(
                fmt::layer()
                    .with_writer(appender)
                    .with_ansi(false)
                    .with_target(true),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| SageError::Logger(e.to_string()))?;

    if let Some(dir) = &cfg.dir {
        tracing::info!(log_dir = %dir.display(), "file logging enabled");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_an_error_not_a_panic() {
        let cfg = LogConfig::default();
        // Another test may have installed a subscriber first; either way the
        // second call must fail cleanly.
        let _ = try_init(&cfg);
        assert!(matches!(try_init(&cfg), Err(SageError::Logger(_))));
    }
}
