//! Logging setup.
//!
//! Console output always goes to stderr so command results on stdout stay
//! machine readable. When a log directory is configured, a daily rolling
//! `leasehold.log` is written there as well.
//!
//! `RUST_LOG` takes precedence over the configured level for every layer.

use std::path::PathBuf;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

use crate::config::LogSettings;

const LOG_FILE_NAME: &str = "leasehold.log";

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Console log level
    pub level: Level,
    /// Directory for the rolling log file, if any
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            log_dir: None,
        }
    }
}

impl LoggingConfig {
    /// Create from application configuration. Unknown level names fall back to info.
    pub fn from_settings(settings: &LogSettings) -> Self {
        Self {
            level: settings.level.parse().unwrap_or(Level::INFO),
            log_dir: settings.dir.clone(),
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.level.to_string()))
    }
}

/// Keeps the file writer alive; dropping it flushes buffered output.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Initialize the global subscriber.
pub fn init_logging(config: &LoggingConfig) -> Result<LoggingGuard, Box<dyn std::error::Error>> {
    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(config.filter());
    layers.push(Box::new(console_layer));

    let mut file_guard = None;
    if let Some(log_dir) = &config.log_dir {
        std::fs::create_dir_all(log_dir)?;

        let appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_NAME);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        file_guard = Some(guard);

        let file_layer = fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .with_filter(config.filter());
        layers.push(Box::new(file_layer));
    }

    Registry::default()
        .with(layers)
        .try_init()
        .map_err(|e| format!("Failed to initialize logging: {}", e))?;

    if let Some(log_dir) = &config.log_dir {
        tracing::debug!(log_dir = %log_dir.display(), "File logging initialized");
    }

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_config_default() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, Level::INFO);
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn test_logging_config_from_settings() {
        let settings = LogSettings {
            level: "debug".to_string(),
            dir: Some(PathBuf::from("/tmp/leasehold-logs")),
        };
        let config = LoggingConfig::from_settings(&settings);
        assert_eq!(config.level, Level::DEBUG);
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/leasehold-logs")));

        let settings = LogSettings {
            level: "chatty".to_string(),
            dir: None,
        };
        assert_eq!(LoggingConfig::from_settings(&settings).level, Level::INFO);
    }
}
