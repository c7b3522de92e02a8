//! Redis-backed lock store
//!
//! - Conditional create: `SET key value NX PX <ms>` (nil reply when the key exists)
//! - Compare-and-delete: Lua script evaluated server-side

use std::time::Duration;

use async_trait::async_trait;
use deadpool_redis::Pool;
use redis::Script;

use super::{LockStore, scripts, ttl_millis};
use crate::error::{LockError, Result};

/// Lock store over a pooled Redis connection.
///
/// Every primitive checks one connection out of the pool and hands it back
/// when the call returns, on success and error paths alike.
#[derive(Clone)]
pub struct RedisLockStore {
    pool: Pool,
    release_script: Script,
}

impl RedisLockStore {
    pub fn new(pool: Pool) -> Self {
        Self {
            pool,
            release_script: Script::new(scripts::COMPARE_AND_DELETE),
        }
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }
}

impl std::fmt::Debug for RedisLockStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = self.pool.status();
        f.debug_struct("RedisLockStore")
            .field("pool_size", &status.size)
            .field("pool_available", &status.available)
            .finish()
    }
}

#[async_trait]
impl LockStore for RedisLockStore {
    async fn conditional_create(&self, key: &str, value: &str, ttl: Duration) -> Result<bool> {
        let mut conn = self.pool.get().await?;

        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("NX")
            .arg("PX")
            .arg(ttl_millis(ttl))
            .query_async(&mut conn)
            .await?;

        match reply.as_deref() {
            Some("OK") => Ok(true),
            None => Ok(false),
            Some(other) => Err(LockError::UnexpectedReply(other.to_string())),
        }
    }

    async fn compare_and_delete(&self, key: &str, expected: &str) -> Result<bool> {
        let mut conn = self.pool.get().await?;

        // EVALSHA first, falling back to EVAL when the script is not cached
        let deleted: i64 = self
            .release_script
            .key(key)
            .arg(expected)
            .invoke_async(&mut conn)
            .await?;

        match deleted {
            1 => Ok(true),
            0 => Ok(false),
            n => Err(LockError::UnexpectedReply(format!("script returned {}", n))),
        }
    }
}
