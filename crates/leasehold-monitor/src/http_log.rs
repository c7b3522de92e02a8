//! HTTP response logging
//!
//! Forwards request/response metadata into `tracing` at a fixed level chosen
//! at construction. Only completed requests are logged; nothing is emitted
//! when a request is sent.

use std::time::Duration;

use reqwest::{Method, StatusCode, Url};
use tracing::Level;

/// Emit an event at a level only known at runtime
macro_rules! event_at {
    ($level:expr, $($arg:tt)+) => {
        if $level == Level::ERROR {
            tracing::error!($($arg)+)
        } else if $level == Level::WARN {
            tracing::warn!($($arg)+)
        } else if $level == Level::INFO {
            tracing::info!($($arg)+)
        } else if $level == Level::DEBUG {
            tracing::debug!($($arg)+)
        } else {
            tracing::trace!($($arg)+)
        }
    };
}

/// Logs method, host, path, status and duration of each HTTP exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpLogger {
    level: Level,
}

impl Default for HttpLogger {
    fn default() -> Self {
        Self {
            level: Level::DEBUG,
        }
    }
}

impl HttpLogger {
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    /// Build from a level name: `err`/`error`, `warn`, `info`; anything else
    /// logs at debug.
    pub fn from_level_name(name: &str) -> Self {
        let level = match name.trim().to_ascii_lowercase().as_str() {
            "err" | "error" => Level::ERROR,
            "warn" | "warning" => Level::WARN,
            "info" => Level::INFO,
            _ => Level::DEBUG,
        };
        Self { level }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    /// Record a finished request. `outcome` is the response status, or the
    /// transport error when no response arrived.
    pub fn log_response(
        &self,
        method: &Method,
        url: &Url,
        outcome: Result<StatusCode, &reqwest::Error>,
        duration: Duration,
    ) {
        let host = url.host_str().unwrap_or_default();
        let path = url.path();
        let duration_ms = duration.as_millis() as u64;

        match outcome {
            Ok(status) => event_at!(
                self.level,
                method = %method,
                host,
                path,
                status = status.as_u16(),
                duration_ms,
                "HTTP Request"
            ),
            Err(e) => event_at!(
                self.level,
                method = %method,
                host,
                path,
                status = "error",
                duration_ms,
                error = %e,
                "HTTP Request Error"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_names() {
        assert_eq!(HttpLogger::from_level_name("err").level(), Level::ERROR);
        assert_eq!(HttpLogger::from_level_name("ERROR").level(), Level::ERROR);
        assert_eq!(HttpLogger::from_level_name("warn").level(), Level::WARN);
        assert_eq!(HttpLogger::from_level_name(" info ").level(), Level::INFO);
        assert_eq!(HttpLogger::from_level_name("debug").level(), Level::DEBUG);
        assert_eq!(HttpLogger::from_level_name("verbose").level(), Level::DEBUG);
        assert_eq!(HttpLogger::default(), HttpLogger::new(Level::DEBUG));
    }

    #[test]
    fn test_log_response_without_subscriber() {
        let url = Url::parse("https://icinga.example.com:5665/v1/objects/services").unwrap();
        for level in [Level::ERROR, Level::WARN, Level::INFO, Level::DEBUG, Level::TRACE] {
            HttpLogger::new(level).log_response(
                &Method::POST,
                &url,
                Ok(StatusCode::OK),
                Duration::from_millis(12),
            );
        }
    }
}
