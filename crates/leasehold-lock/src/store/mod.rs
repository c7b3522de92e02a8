//! Store adapter
//!
//! The lock protocol needs exactly two atomic primitives from the backing
//! store. Anything implementing [`LockStore`] can back a
//! [`StoreLocker`](crate::StoreLocker).

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

mod memory;
mod redis;
mod scripts;

pub use memory::MemoryLockStore;
pub use self::redis::RedisLockStore;

/// Atomic primitives a backing store must provide
#[async_trait]
pub trait LockStore: Send + Sync {
    /// Create `key = value` expiring after `ttl`, only if `key` is absent.
    ///
    /// `Ok(false)` means the key already exists. Errors are reserved for
    /// transport and store failures.
    async fn conditional_create(&self, key: &str, value: &str, ttl: Duration) -> Result<bool>;

    /// Delete `key` only if its current value equals `expected` exactly.
    ///
    /// Must run as one indivisible step at the store. `Ok(false)` means the
    /// key was absent or held a different value and was left untouched.
    async fn compare_and_delete(&self, key: &str, expected: &str) -> Result<bool>;
}

/// Lease length in whole milliseconds, as the store expects it.
///
/// Sub-millisecond parts are truncated; values past `u64::MAX` saturate.
pub fn ttl_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX)
}
