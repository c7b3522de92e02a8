//! Lock protocol
//!
//! Composes the store primitives into lock semantics:
//! - `lock`: conditional create of `prefix + name` holding the owner token
//! - `unlock`: compare-and-delete against the owner token
//!
//! Each call is self-contained. Concurrent callers interact only through the
//! store's atomicity, never through shared memory in this process.

use std::time::Duration;

use async_trait::async_trait;
use deadpool_redis::Pool;
use tracing::debug;

use crate::config::RedisConfig;
use crate::error::{LockError, Result};
use crate::store::{LockStore, MemoryLockStore, RedisLockStore, ttl_millis};

/// Longest lease accepted by [`Locker::lock`]; Redis rejects `PX` values past `i64::MAX`
pub const MAX_LEASE: Duration = Duration::from_millis(i64::MAX as u64);

/// Lock/unlock operations on named resources
#[async_trait]
pub trait Locker: Send + Sync {
    /// Try to acquire `name` for `owner_token` with a lease of `ttl`.
    ///
    /// `Ok(true)` means the caller now holds the lock until it releases it or
    /// the lease expires. `Ok(false)` means someone else holds it; retrying is
    /// up to the caller. On `Err` the acquisition state is unknown.
    async fn lock(&self, name: &str, owner_token: &str, ttl: Duration) -> Result<bool>;

    /// Release `name`, but only if `owner_token` is the current holder.
    ///
    /// Returns [`LockError::OwnershipMismatch`] when the lease already
    /// expired, another owner holds the lock, or it was never held.
    async fn unlock(&self, name: &str, owner_token: &str) -> Result<()>;
}

/// Lock protocol over any [`LockStore`]
#[derive(Debug, Clone)]
pub struct StoreLocker<S> {
    store: S,
    prefix: String,
}

/// Redis-backed locker
pub type RedisLocker = StoreLocker<RedisLockStore>;

/// In-process locker, for tests and single-process use
pub type MemoryLocker = StoreLocker<MemoryLockStore>;

impl<S: LockStore> StoreLocker<S> {
    /// Create a locker over `store`, namespacing every key with `prefix`
    pub fn new(store: S, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Store key for a resource name
    pub fn key(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }

    fn validate(name: &str, owner_token: &str) -> Result<()> {
        if name.is_empty() {
            return Err(LockError::InvalidArgument(
                "resource name must not be empty".to_string(),
            ));
        }
        if owner_token.is_empty() {
            return Err(LockError::InvalidArgument(
                "owner token must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl RedisLocker {
    /// Create a locker over an existing connection pool
    pub fn from_pool(pool: Pool, prefix: impl Into<String>) -> Self {
        Self::new(RedisLockStore::new(pool), prefix)
    }

    /// Build a pool from `config` and create a locker over it
    pub fn connect(config: &RedisConfig, prefix: impl Into<String>) -> Result<Self> {
        Ok(Self::from_pool(config.create_pool()?, prefix))
    }
}

#[async_trait]
impl<S: LockStore> Locker for StoreLocker<S> {
    async fn lock(&self, name: &str, owner_token: &str, ttl: Duration) -> Result<bool> {
        Self::validate(name, owner_token)?;
        if ttl < Duration::from_millis(1) {
            return Err(LockError::InvalidArgument(format!(
                "lease must be at least 1ms, got {:?}",
                ttl
            )));
        }
        if ttl > MAX_LEASE {
            return Err(LockError::InvalidArgument(format!(
                "lease must be at most {}ms, got {:?}",
                MAX_LEASE.as_millis(),
                ttl
            )));
        }

        let key = self.key(name);
        let acquired = self.store.conditional_create(&key, owner_token, ttl).await?;

        debug!(
            key = %key,
            ttl_ms = ttl_millis(ttl),
            acquired,
            "Lock acquire attempt"
        );
        Ok(acquired)
    }

    async fn unlock(&self, name: &str, owner_token: &str) -> Result<()> {
        Self::validate(name, owner_token)?;

        let key = self.key(name);
        let deleted = self.store.compare_and_delete(&key, owner_token).await?;

        debug!(key = %key, released = deleted, "Lock release attempt");
        if !deleted {
            return Err(LockError::OwnershipMismatch);
        }
        Ok(())
    }
}
