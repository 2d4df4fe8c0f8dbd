use std::collections::HashMap;

use async_trait::async_trait;

use crawlpool_core::AppResult;

/// One operation in a pipelined lease-store submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaseOp {
    /// Records or overwrites one lease entry with its Unix-second expiry.
    SetExpiry { field: String, expires_at: i64 },
    /// Removes one lease entry.
    Remove { field: String },
    /// Sets the mapping key's own TTL.
    ExpireKey { ttl_seconds: i64 },
    /// Raises the mapping key's TTL to at least `ttl_seconds`, never
    /// lowering an existing longer TTL.
    ExtendKeyTtl { ttl_seconds: i64 },
}

/// Shared ephemeral store holding the per-platform lease mappings.
///
/// `apply` submits its operations as one round trip, in order. It is not
/// required to be transactional across fields; the lease manager tolerates
/// partial application because stale entries expire on their own.
#[async_trait]
pub trait LeaseStore: Send + Sync {
    /// Reads the entire field-to-expiry mapping of one key.
    async fn read_all(&self, key: &str) -> AppResult<HashMap<String, String>>;

    /// Applies a pipeline of lease operations in one round trip.
    async fn apply(&self, key: &str, ops: &[LeaseOp]) -> AppResult<()>;

    /// Atomically sets a plain key when absent, with a TTL.
    ///
    /// Retained for legacy single-lock callers; the lease mappings do not
    /// use it.
    async fn set_if_absent(&self, key: &str, value: &str, ttl_seconds: i64) -> AppResult<bool>;
}
