//! Lock data model
//!
//! A lock is never materialized in process memory. Its whole state is one
//! store record: `prefix + name` -> owner token, with a lease attached at
//! creation. The only in-process type is the owner token itself.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Opaque identifier proving who holds a lock.
///
/// Must be unique per acquisition attempt, not merely per process, so a
/// stale holder can never release a lock that was re-acquired by someone
/// else after its lease expired.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerToken(String);

impl OwnerToken {
    /// Wrap a caller-provided token
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Generate a fresh random token (UUID v4)
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for OwnerToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for OwnerToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for OwnerToken {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for OwnerToken {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
