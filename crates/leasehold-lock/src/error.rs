//! Lock error types
//!
//! Contention is not an error: `Locker::lock` returns `Ok(false)` when another
//! holder has the lock. Everything below is a real failure.

/// Error type for lock and store operations
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    /// Release did not match: the lease expired, someone else holds the lock,
    /// or the caller never held it. These cases are indistinguishable.
    #[error("unlock failed, name or unique id incorrect")]
    OwnershipMismatch,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("connection pool error: {0}")]
    Pool(#[from] deadpool_redis::PoolError),

    #[error("failed to create connection pool: {0}")]
    CreatePool(#[from] deadpool_redis::CreatePoolError),

    #[error("unexpected store reply: {0}")]
    UnexpectedReply(String),
}

impl LockError {
    /// True when the failure came from the store or its transport, meaning the
    /// outcome of the attempted operation is unknown.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            LockError::Redis(_)
                | LockError::Pool(_)
                | LockError::CreatePool(_)
                | LockError::UnexpectedReply(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, LockError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LockError::OwnershipMismatch;
        assert_eq!(
            err.to_string(),
            "unlock failed, name or unique id incorrect"
        );

        let err = LockError::InvalidArgument("owner token must not be empty".to_string());
        assert_eq!(
            err.to_string(),
            "invalid argument: owner token must not be empty"
        );

        let err = LockError::UnexpectedReply("Int(7)".to_string());
        assert_eq!(err.to_string(), "unexpected store reply: Int(7)");
    }

    #[test]
    fn test_from_redis_error() {
        let redis_err = redis::RedisError::from((redis::ErrorKind::IoError, "connection refused"));
        let err: LockError = redis_err.into();
        assert!(matches!(err, LockError::Redis(_)));
        assert!(err.is_transport());
        assert!(!LockError::OwnershipMismatch.is_transport());
    }
}
