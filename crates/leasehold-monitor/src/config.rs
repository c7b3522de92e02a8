//! Monitoring API client configuration

use serde::Deserialize;

use crate::client::MonitorClient;
use crate::error::Result;

/// Configuration for the monitoring API client
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// API base URL, e.g. `https://icinga.example.com:5665`
    pub base_url: String,
    /// Username for basic authentication
    pub username: String,
    /// Password for basic authentication
    pub password: String,
    /// Connection timeout in milliseconds
    pub connect_timeout_ms: u64,
    /// Read timeout in milliseconds
    pub read_timeout_ms: u64,
    /// Accept self-signed certificates
    pub insecure_skip_verify: bool,
    /// Level at which completed requests are logged (`err`, `warn`, `info`, `debug`)
    pub log_level: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            base_url: "https://127.0.0.1:5665".to_string(),
            username: String::new(),
            password: String::new(),
            connect_timeout_ms: 5000,
            read_timeout_ms: 30000,
            insecure_skip_verify: false,
            log_level: "debug".to_string(),
        }
    }
}

impl MonitorConfig {
    /// Create a new config for the given base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Default::default()
        }
    }

    /// Set authentication credentials
    pub fn with_auth(mut self, username: &str, password: &str) -> Self {
        self.username = username.to_string();
        self.password = password.to_string();
        self
    }

    /// Set timeouts
    pub fn with_timeouts(mut self, connect_ms: u64, read_ms: u64) -> Self {
        self.connect_timeout_ms = connect_ms;
        self.read_timeout_ms = read_ms;
        self
    }

    /// Accept invalid TLS certificates
    pub fn with_insecure_skip_verify(mut self, skip: bool) -> Self {
        self.insecure_skip_verify = skip;
        self
    }

    /// Set the request log level
    pub fn with_log_level(mut self, level: &str) -> Self {
        self.log_level = level.to_string();
        self
    }

    /// Build a client from this config
    pub fn client(&self) -> Result<MonitorClient> {
        MonitorClient::new(self.clone())
    }
}
