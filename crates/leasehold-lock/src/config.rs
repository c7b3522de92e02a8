//! Redis connection configuration
//!
//! Builds the shared connection pool handed to RedisLockStore.

use std::time::Duration;

use deadpool_redis::{Config, Pool, PoolConfig, Runtime};
use serde::Deserialize;

use crate::error::Result;

/// Configuration for the Redis connection pool
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    /// Connection URL (default: redis://127.0.0.1:6379)
    pub url: String,

    /// Maximum pooled connections (default: 16)
    pub pool_size: usize,

    /// How long a call may wait for a free connection, in milliseconds (default: 5000ms)
    pub wait_timeout_ms: u64,

    /// Timeout for opening a new connection, in milliseconds (default: 5000ms)
    pub connect_timeout_ms: u64,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            pool_size: 16,
            wait_timeout_ms: 5000,
            connect_timeout_ms: 5000,
        }
    }
}

impl RedisConfig {
    /// Create a config for the given URL
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            ..Default::default()
        }
    }

    /// Set maximum pool size
    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }

    /// Set timeouts
    pub fn with_timeouts(mut self, wait_ms: u64, connect_ms: u64) -> Self {
        self.wait_timeout_ms = wait_ms;
        self.connect_timeout_ms = connect_ms;
        self
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_millis(self.wait_timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Build the connection pool. Connections are opened lazily on first use.
    pub fn create_pool(&self) -> Result<Pool> {
        let mut pool_config = PoolConfig::new(self.pool_size.max(1));
        pool_config.timeouts.wait = Some(self.wait_timeout());
        pool_config.timeouts.create = Some(self.connect_timeout());
        pool_config.timeouts.recycle = Some(self.connect_timeout());

        let mut config = Config::from_url(self.url.clone());
        config.pool = Some(pool_config);

        Ok(config.create_pool(Some(Runtime::Tokio1))?)
    }
}
