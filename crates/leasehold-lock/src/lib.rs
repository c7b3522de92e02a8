//! Leasehold Lock - lease-based distributed mutual exclusion
//!
//! This crate provides:
//! - A store adapter exposing the two atomic primitives the protocol needs
//!   (conditional create with expiry, compare-and-delete)
//! - A Redis-backed store over a `deadpool-redis` connection pool
//! - An in-memory store with the same semantics for tests and embedding
//! - The lock protocol: key namespacing and owner-token gated release
//!
//! Correctness rests entirely on the store's atomicity. Nothing here keeps
//! shared in-process state, spawns tasks, or retries.

pub mod config;
pub mod error;
pub mod locker;
pub mod model;
pub mod store;

pub use config::RedisConfig;
pub use error::{LockError, Result};
pub use locker::{Locker, MAX_LEASE, MemoryLocker, RedisLocker, StoreLocker};
pub use model::OwnerToken;
pub use store::{LockStore, MemoryLockStore, RedisLockStore, ttl_millis};

/// Default key prefix used when none is configured
pub const DEFAULT_KEY_PREFIX: &str = "leasehold:lock:";
