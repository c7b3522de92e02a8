//! Command execution

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use serde::Serialize;
use tracing::{info, warn};

use leasehold_lock::{LockError, Locker, OwnerToken, RedisLocker, ttl_millis};
use leasehold_monitor::Method;

use crate::config::{AppConfig, Command};

/// Exit status when the lock is held by someone else or not ours to release
pub const EXIT_NOT_HELD: u8 = 1;

#[derive(Debug, Serialize)]
struct LockReport<'a> {
    name: &'a str,
    token: &'a str,
    acquired: bool,
    ttl_ms: u64,
}

#[derive(Debug, Serialize)]
struct UnlockReport<'a> {
    name: &'a str,
    released: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Run a parsed command against the configured backends
pub async fn run(command: Command, config: &AppConfig) -> anyhow::Result<ExitCode> {
    match command {
        Command::Lock {
            name,
            token,
            ttl_ms,
        } => {
            let locker = connect(config)?;
            let token = token.map(OwnerToken::new).unwrap_or_else(OwnerToken::generate);
            let ttl = ttl_ms
                .map(Duration::from_millis)
                .unwrap_or_else(|| config.lock.default_ttl());
            Ok(exit_code(lock(&locker, &name, &token, ttl).await?))
        }
        Command::Unlock { name, token } => {
            let locker = connect(config)?;
            Ok(exit_code(unlock(&locker, &name, &OwnerToken::new(token)).await?))
        }
        Command::Monitor { method, path, body } => monitor(config, &method, &path, body).await,
    }
}

fn exit_code(held: bool) -> ExitCode {
    if held {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_NOT_HELD)
    }
}

fn connect(config: &AppConfig) -> anyhow::Result<RedisLocker> {
    RedisLocker::connect(&config.redis, config.lock.prefix.clone())
        .with_context(|| format!("Failed to set up redis pool for {}", config.redis.url))
}

/// Try once to acquire `name` and print the outcome as JSON.
/// Returns whether the lock was acquired.
pub async fn lock(
    locker: &dyn Locker,
    name: &str,
    token: &OwnerToken,
    ttl: Duration,
) -> anyhow::Result<bool> {
    let acquired = locker
        .lock(name, token.as_str(), ttl)
        .await
        .with_context(|| format!("Lock attempt on '{}' failed; state unknown", name))?;

    if acquired {
        info!(name, "Lock acquired");
    } else {
        info!(name, "Lock is held by another owner");
    }

    let report = LockReport {
        name,
        token: token.as_str(),
        acquired,
        ttl_ms: ttl_millis(ttl),
    };
    println!("{}", serde_json::to_string(&report)?);

    Ok(acquired)
}

/// Release `name` held under `token` and print the outcome as JSON.
/// Returns whether the lock was released; an ownership mismatch is an
/// outcome here, not an error.
pub async fn unlock(locker: &dyn Locker, name: &str, token: &OwnerToken) -> anyhow::Result<bool> {
    let (released, error) = match locker.unlock(name, token.as_str()).await {
        Ok(()) => (true, None),
        Err(e @ LockError::OwnershipMismatch) => {
            warn!(name, "Lock is no longer held by this token");
            (false, Some(e.to_string()))
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Unlock of '{}' failed; state unknown", name));
        }
    };

    let report = UnlockReport {
        name,
        released,
        error,
    };
    println!("{}", serde_json::to_string(&report)?);

    Ok(released)
}

async fn monitor(
    config: &AppConfig,
    method: &str,
    path: &str,
    body: Option<String>,
) -> anyhow::Result<ExitCode> {
    let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
        .with_context(|| format!("Invalid HTTP method '{}'", method))?;
    let body: Option<serde_json::Value> = body
        .as_deref()
        .map(serde_json::from_str)
        .transpose()
        .context("Request body is not valid JSON")?;

    let client = config.monitor.client()?;
    let response = client.api_request(method, path, body.as_ref()).await?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use leasehold_lock::{MemoryLockStore, StoreLocker};

    use super::*;

    #[tokio::test]
    async fn test_lock_then_contend_then_unlock() {
        let store = MemoryLockStore::new();
        let locker = StoreLocker::new(store.clone(), "cli:");
        let ttl = Duration::from_secs(30);

        let owner = OwnerToken::new("owner");
        assert!(lock(&locker, "deploy", &owner, ttl).await.unwrap());
        assert_eq!(store.get("cli:deploy"), Some("owner".to_string()));

        let other = OwnerToken::new("other");
        assert!(!lock(&locker, "deploy", &other, ttl).await.unwrap());
        assert!(!unlock(&locker, "deploy", &other).await.unwrap());

        assert!(unlock(&locker, "deploy", &owner).await.unwrap());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_input_is_an_error() {
        let locker = StoreLocker::new(MemoryLockStore::new(), "cli:");
        let owner = OwnerToken::new("owner");
        assert!(lock(&locker, "", &owner, Duration::from_secs(1)).await.is_err());
        assert!(unlock(&locker, "", &owner).await.is_err());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(format!("{:?}", exit_code(true)), format!("{:?}", ExitCode::SUCCESS));
        assert_eq!(
            format!("{:?}", exit_code(false)),
            format!("{:?}", ExitCode::from(EXIT_NOT_HELD))
        );
    }
}
