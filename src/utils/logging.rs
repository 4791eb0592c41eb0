//! Tracing setup: stderr console output plus an optional daily rolling file.

use std::path::PathBuf;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogConfig;

pub const LOG_FILE_PREFIX: &str = "watchlens.log";

/// Log directory from the config, or `logs/` under the XDG data directory.
pub fn resolve_log_dir(config: &LogConfig) -> anyhow::Result<PathBuf> {
    match &config.log_dir {
        Some(dir) => Ok(dir.clone()),
        None => Ok(crate::config::project_dirs()?.data_dir().join("logs")),
    }
}

/// Installs the global subscriber: `RUST_LOG` wins over the configured
/// level, console output is compact, and file output rotates daily.
///
/// The returned guard flushes the file writer on drop and must be held for
/// the lifetime of the program.
pub fn init_logging(config: &LogConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .or_else(|_| EnvFilter::try_new("info"))?;

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact();

    let mut guard = None;
    let mut json_layer = None;
    let mut text_layer = None;

    if config.enable_file_logging {
        let log_dir = resolve_log_dir(config)?;
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

        let appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX);
        let (writer, worker_guard) = tracing_appender::non_blocking(appender);
        guard = Some(worker_guard);

        if config.json_file_format {
            json_layer = Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(writer),
            );
        } else {
            text_layer = Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(writer),
            );
        }
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(json_layer)
        .with(text_layer)
        .try_init()?;

    if config.enable_file_logging {
        tracing::debug!("📝 File logging enabled");
    }
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_log_dir_wins() {
        let config = LogConfig {
            log_dir: Some(PathBuf::from("/tmp/watchlens-logs")),
            ..Default::default()
        };
        assert_eq!(
            resolve_log_dir(&config).unwrap(),
            PathBuf::from("/tmp/watchlens-logs")
        );
    }
}
