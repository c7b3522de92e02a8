//! In-memory lock store
//!
//! Same two primitives as the Redis store, backed by a concurrent map. Each
//! primitive runs under the map's per-shard lock for the key, which makes it
//! atomic with respect to every other call on the same key. Expired records
//! are treated as absent. They are replaced or dropped when their key is
//! touched again, or all at once by [`MemoryLockStore::purge_expired`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use super::LockStore;
use crate::error::Result;

#[derive(Debug, Clone)]
struct LeaseRecord {
    value: String,
    /// `None` when the lease reaches past what `Instant` can represent
    expires_at: Option<Instant>,
}

impl LeaseRecord {
    fn new(value: &str, ttl: Duration) -> Self {
        Self {
            value: value.to_string(),
            expires_at: Instant::now().checked_add(ttl),
        }
    }

    fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|expires_at| Instant::now() >= expires_at)
    }
}

/// Process-local lock store.
///
/// Clones share the same records, so lockers built on clones contend with
/// each other exactly as separate processes sharing one server would.
#[derive(Debug, Clone, Default)]
pub struct MemoryLockStore {
    records: Arc<DashMap<String, LeaseRecord>>,
}

impl MemoryLockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of a live record, if any
    pub fn get(&self, key: &str) -> Option<String> {
        self.records
            .get(key)
            .filter(|record| !record.is_expired())
            .map(|record| record.value.clone())
    }

    /// Remaining lease of a live record
    pub fn remaining_ttl(&self, key: &str) -> Option<Duration> {
        self.records
            .get(key)
            .filter(|record| !record.is_expired())
            .map(|record| match record.expires_at {
                Some(expires_at) => expires_at.saturating_duration_since(Instant::now()),
                None => Duration::MAX,
            })
    }

    /// Drop every expired record and return how many were removed.
    ///
    /// Lookups already treat expired records as absent; this only reclaims
    /// memory held by names that are never touched again.
    pub fn purge_expired(&self) -> usize {
        let mut removed = 0;
        self.records.retain(|_, record| {
            let expired = record.is_expired();
            if expired {
                removed += 1;
            }
            !expired
        });
        if removed > 0 {
            debug!(removed, "Purged expired lock records");
        }
        removed
    }

    /// Number of live records
    pub fn len(&self) -> usize {
        self.records
            .iter()
            .filter(|record| !record.is_expired())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl LockStore for MemoryLockStore {
    async fn conditional_create(&self, key: &str, value: &str, ttl: Duration) -> Result<bool> {
        match self.records.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().is_expired() {
                    occupied.insert(LeaseRecord::new(value, ttl));
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(LeaseRecord::new(value, ttl));
                Ok(true)
            }
        }
    }

    async fn compare_and_delete(&self, key: &str, expected: &str) -> Result<bool> {
        let removed = self
            .records
            .remove_if(key, |_, record| !record.is_expired() && record.value == expected);

        if removed.is_none() {
            // Drop a stale record so it does not linger until the next create
            self.records.remove_if(key, |_, record| record.is_expired());
            return Ok(false);
        }

        Ok(true)
    }
}
