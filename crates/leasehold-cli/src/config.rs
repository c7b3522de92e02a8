//! Configuration management for the leasehold CLI
//!
//! Sources, lowest precedence first:
//! 1. YAML file (`conf/leasehold.yml`, or the `--config` path)
//! 2. Environment variables (`LEASEHOLD_REDIS__URL`, `LEASEHOLD_LOCK__PREFIX`, ...)
//! 3. Command line overrides

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use config::{Config, Environment, File, Map};
use serde::Deserialize;

use leasehold_lock::{DEFAULT_KEY_PREFIX, RedisConfig};
use leasehold_monitor::MonitorConfig;

/// Default configuration file, optional
pub const DEFAULT_CONFIG_FILE: &str = "conf/leasehold.yml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "LEASEHOLD";

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "leasehold", version, about = "Lease-based distributed locks over Redis")]
pub struct Cli {
    /// Configuration file (YAML, TOML or JSON)
    #[arg(short = 'c', long = "config", env = "LEASEHOLD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Redis URL, overrides `redis.url`
    #[arg(long = "redis-url")]
    pub redis_url: Option<String>,

    /// Key prefix, overrides `lock.prefix`
    #[arg(long = "prefix")]
    pub prefix: Option<String>,

    /// Log level, overrides `log.level`
    #[arg(long = "log-level")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Try to acquire a lock once
    Lock {
        /// Resource name
        name: String,
        /// Owner token; a random one is generated when omitted
        #[arg(long)]
        token: Option<String>,
        /// Lease in milliseconds, defaults to `lock.default_ttl_ms`
        #[arg(long = "ttl-ms")]
        ttl_ms: Option<u64>,
    },
    /// Release a lock held under the given token
    Unlock {
        /// Resource name
        name: String,
        /// Owner token used to acquire the lock
        #[arg(long)]
        token: String,
    },
    /// Send one request to the monitoring API
    Monitor {
        /// HTTP method
        method: String,
        /// Request path, e.g. /v1/objects/services
        path: String,
        /// JSON request body
        #[arg(long)]
        body: Option<String>,
    },
}

/// Lock protocol settings
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LockSettings {
    /// Namespace prepended to every resource name
    pub prefix: String,
    /// Lease used when a command does not give one, in milliseconds
    pub default_ttl_ms: u64,
}

impl Default for LockSettings {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_KEY_PREFIX.to_string(),
            default_ttl_ms: 30000,
        }
    }
}

impl LockSettings {
    pub fn default_ttl(&self) -> Duration {
        Duration::from_millis(self.default_ttl_ms)
    }
}

/// Logging settings
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub level: String,
    /// Directory for the rolling log file; console only when unset
    pub dir: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: None,
        }
    }
}

/// Application configuration assembled from all sources
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub redis: RedisConfig,
    pub lock: LockSettings,
    pub monitor: MonitorConfig,
    pub log: LogSettings,
}

impl AppConfig {
    /// Load from the default sources and command line overrides
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let mut overrides = Vec::new();
        if let Some(v) = &cli.redis_url {
            overrides.push(("redis.url", v.clone()));
        }
        if let Some(v) = &cli.prefix {
            overrides.push(("lock.prefix", v.clone()));
        }
        if let Some(v) = &cli.log_level {
            overrides.push(("log.level", v.clone()));
        }

        Self::from_sources(cli.config.as_deref(), None, &overrides)
    }

    /// Build from an optional config file, an environment source and overrides.
    ///
    /// `env` replaces the process environment when given.
    pub fn from_sources(
        config_file: Option<&Path>,
        env: Option<Map<String, String>>,
        overrides: &[(&str, String)],
    ) -> anyhow::Result<Self> {
        let file = match config_file {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let mut builder = Config::builder().add_source(file).add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        for (key, value) in overrides {
            builder = builder.set_override(*key, value.as_str())?;
        }

        let config = builder.build()?.try_deserialize()?;
        Ok(config)
    }
}
