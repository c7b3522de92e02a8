//! Server-side scripts

/// Delete KEYS[1] only when it still holds ARGV[1].
///
/// Runs atomically on the server, so no other client can acquire between the
/// comparison and the delete. Returns 1 when deleted, 0 otherwise.
pub(crate) const COMPARE_AND_DELETE: &str = r#"
if redis.call("get", KEYS[1]) == ARGV[1] then
    return redis.call("del", KEYS[1])
else
    return 0
end
"#;
