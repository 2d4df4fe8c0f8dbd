//! In-memory lease store for tests and local development.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crawlpool_application::{Clock, LeaseOp, LeaseStore};
use crawlpool_core::AppResult;

struct KeyEntry {
    fields: HashMap<String, String>,
    // Unix-second deadline after which the whole mapping evicts.
    expires_at: Option<i64>,
}

/// In-memory implementation of the lease store port.
///
/// Models the Redis hash semantics the lease manager relies on: ordered
/// pipeline application, key-level TTL eviction, and GT-style TTL extension.
pub struct InMemoryLeaseStore {
    clock: Arc<dyn Clock>,
    keys: Mutex<HashMap<String, KeyEntry>>,
    values: Mutex<HashMap<String, (String, i64)>>,
}

impl InMemoryLeaseStore {
    /// Creates an empty store evaluating TTLs against the given clock.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            keys: Mutex::new(HashMap::new()),
            values: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the remaining TTL of a mapping key, if one is set.
    pub async fn remaining_ttl(&self, key: &str) -> Option<i64> {
        let now = self.clock.unix_seconds();
        self.keys
            .lock()
            .await
            .get(key)
            .and_then(|entry| entry.expires_at)
            .map(|deadline| deadline - now)
    }
}

#[async_trait]
impl LeaseStore for InMemoryLeaseStore {
    async fn read_all(&self, key: &str) -> AppResult<HashMap<String, String>> {
        let now = self.clock.unix_seconds();
        let mut keys = self.keys.lock().await;

        let Some(entry) = keys.get(key) else {
            return Ok(HashMap::new());
        };

        if entry.expires_at.is_some_and(|deadline| deadline <= now) {
            keys.remove(key);
            return Ok(HashMap::new());
        }

        Ok(entry.fields.clone())
    }

    async fn apply(&self, key: &str, ops: &[LeaseOp]) -> AppResult<()> {
        let now = self.clock.unix_seconds();
        let mut keys = self.keys.lock().await;
        let entry = keys.entry(key.to_owned()).or_insert_with(|| KeyEntry {
            fields: HashMap::new(),
            expires_at: None,
        });

        if entry.expires_at.is_some_and(|deadline| deadline <= now) {
            entry.fields.clear();
            entry.expires_at = None;
        }

        for op in ops {
            match op {
                LeaseOp::SetExpiry { field, expires_at } => {
                    entry.fields.insert(field.clone(), expires_at.to_string());
                }
                LeaseOp::Remove { field } => {
                    entry.fields.remove(field);
                }
                LeaseOp::ExpireKey { ttl_seconds } => {
                    entry.expires_at = Some(now + ttl_seconds);
                }
                LeaseOp::ExtendKeyTtl { ttl_seconds } => {
                    let proposed = now + ttl_seconds;
                    entry.expires_at = match entry.expires_at {
                        Some(current) if current >= proposed => Some(current),
                        Some(_) => Some(proposed),
                        // No TTL means the key never evicts; GT keeps it that way.
                        None => None,
                    };
                }
            }
        }

        if entry.fields.is_empty() {
            keys.remove(key);
        }

        Ok(())
    }

    async fn set_if_absent(&self, key: &str, value: &str, ttl_seconds: i64) -> AppResult<bool> {
        let now = self.clock.unix_seconds();
        let mut values = self.values.lock().await;

        if let Some((_, deadline)) = values.get(key)
            && *deadline > now
        {
            return Ok(false);
        }

        values.insert(key.to_owned(), (value.to_owned(), now + ttl_seconds));
        Ok(true)
    }
}
