//! Time-bounded exclusive account leasing.
//!
//! Acquire reads a snapshot of the platform's lease mapping, selects
//! eligible accounts status by status, and submits one pipelined write that
//! cleans expired entries, records the new leases, and refreshes the
//! mapping's own TTL. The snapshot-then-write window is serialized by a
//! per-platform mutex, so two concurrent acquires can never grant the same
//! account.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use crawlpool_core::{AppError, AppResult};
use crawlpool_domain::{Account, AccountId, CredentialSet, Platform, eligible_statuses};

use crate::account_ports::AccountInventory;
use crate::clock::Clock;
use crate::lease_ports::{LeaseOp, LeaseStore};
use crate::selector::select_available;

/// Lease count granted when the caller does not supply one.
pub const DEFAULT_LEASE_COUNT: i64 = 1;

/// Largest honored lease count per call.
pub const MAX_LEASE_COUNT: i64 = 100;

/// Count granted when the caller asks for more than [`MAX_LEASE_COUNT`].
///
/// Deployed callers rely on the over-limit request collapsing to 20 rather
/// than clamping to 100.
pub const OVERFLOW_LEASE_COUNT: i64 = 20;

/// Lease window granted when the caller does not supply one.
pub const DEFAULT_LOCK_SECONDS: i64 = 60;

/// Largest honored lease window.
pub const MAX_LOCK_SECONDS: i64 = 600;

/// Margin by which the mapping key's TTL outlives the latest lease expiry.
pub const KEY_TTL_MARGIN_SECONDS: i64 = 60;

/// Lease manager for one platform.
pub struct LeaseService<C> {
    platform: Platform,
    inventory: Arc<dyn AccountInventory<C>>,
    lease_store: Arc<dyn LeaseStore>,
    clock: Arc<dyn Clock>,
    // Serializes the snapshot-read / pipelined-write window of acquire.
    acquire_guard: Mutex<()>,
}

impl<C: CredentialSet> LeaseService<C> {
    /// Creates a lease manager over the platform's inventory and lease store.
    #[must_use]
    pub fn new(
        platform: Platform,
        inventory: Arc<dyn AccountInventory<C>>,
        lease_store: Arc<dyn LeaseStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            platform,
            inventory,
            lease_store,
            clock,
            acquire_guard: Mutex::new(()),
        }
    }

    /// Acquires up to `count` exclusive leases under the platform policy.
    ///
    /// Returns the leased accounts and the effective lock window in seconds,
    /// after clamping, so the caller can schedule its own release deadline.
    /// Fails with `NotFound` when no account is presently eligible.
    pub async fn acquire(
        &self,
        count: i64,
        lock_seconds: i64,
        policy_tag: Option<&str>,
    ) -> AppResult<(Vec<Account<C>>, i64)> {
        let count = clamp_count(count);
        let lock_seconds = clamp_lock_seconds(lock_seconds);
        let statuses = eligible_statuses(self.platform, policy_tag)?;

        let key = self.platform.occupied_key();
        let _guard = self.acquire_guard.lock().await;

        let lease_map = self.lease_store.read_all(key.as_str()).await?;
        let snapshot_now = self.clock.unix_seconds();

        let mut selected: Vec<Account<C>> = Vec::new();
        let mut expired: Vec<AccountId> = Vec::new();

        for status in statuses {
            if selected.len() as i64 >= count {
                break;
            }

            let candidates = self.inventory.find_by_status(status).await?;
            let mut selection = select_available(candidates, &lease_map, snapshot_now);
            expired.append(&mut selection.expired_ids);

            let remaining = (count as usize).saturating_sub(selected.len());
            selection.available.truncate(remaining);
            selected.append(&mut selection.available);
        }

        if selected.is_empty() {
            return Err(AppError::NotFound(format!(
                "no available {} account",
                self.platform
            )));
        }

        let now = self.clock.unix_seconds();
        let expires_at = now + lock_seconds;
        let key_expires_at = latest_expiry(&lease_map, &expired, expires_at, now);

        let mut ops = Vec::with_capacity(expired.len() + selected.len() + 1);
        for id in &expired {
            ops.push(LeaseOp::Remove {
                field: id.to_string(),
            });
        }
        for account in &selected {
            ops.push(LeaseOp::SetExpiry {
                field: account.id.to_string(),
                expires_at,
            });
        }
        ops.push(LeaseOp::ExpireKey {
            ttl_seconds: (key_expires_at - now) + KEY_TTL_MARGIN_SECONDS,
        });

        self.lease_store.apply(key.as_str(), &ops).await?;

        let ids: Vec<i64> = selected.iter().map(|account| account.id.as_i64()).collect();
        info!(
            platform = %self.platform,
            ?ids,
            lock_seconds,
            reclaimed = expired.len(),
            "accounts leased"
        );

        Ok((selected, lock_seconds))
    }

    /// Releases leases immediately or after a cooldown.
    ///
    /// A positive `cooldown_seconds` rewrites each entry with a future
    /// expiry, keeping the account unavailable while the caller backs off; a
    /// zero cooldown removes the entries outright. Idempotent either way.
    pub async fn release(&self, ids: &[AccountId], cooldown_seconds: i64) -> AppResult<()> {
        if cooldown_seconds < 0 {
            return Err(AppError::Validation(
                "delay must not be negative".to_owned(),
            ));
        }

        if ids.is_empty() {
            return Ok(());
        }

        let key = self.platform.occupied_key();
        let mut ops = Vec::with_capacity(ids.len() + 1);

        if cooldown_seconds > 0 {
            let expires_at = self.clock.unix_seconds() + cooldown_seconds;
            for id in ids {
                ops.push(LeaseOp::SetExpiry {
                    field: id.to_string(),
                    expires_at,
                });
            }
            // The mapping must outlive the cooldown; never shorten a TTL
            // that a longer outstanding lease already set.
            ops.push(LeaseOp::ExtendKeyTtl {
                ttl_seconds: cooldown_seconds + KEY_TTL_MARGIN_SECONDS,
            });
        } else {
            for id in ids {
                ops.push(LeaseOp::Remove {
                    field: id.to_string(),
                });
            }
        }

        self.lease_store.apply(key.as_str(), &ops).await?;

        info!(
            platform = %self.platform,
            ids = ?ids.iter().map(AccountId::as_i64).collect::<Vec<_>>(),
            cooldown_seconds,
            "accounts released"
        );

        Ok(())
    }
}

fn clamp_count(count: i64) -> i64 {
    if count <= 0 {
        DEFAULT_LEASE_COUNT
    } else if count > MAX_LEASE_COUNT {
        OVERFLOW_LEASE_COUNT
    } else {
        count
    }
}

fn clamp_lock_seconds(lock_seconds: i64) -> i64 {
    if lock_seconds <= 0 {
        DEFAULT_LOCK_SECONDS
    } else if lock_seconds > MAX_LOCK_SECONDS {
        MAX_LOCK_SECONDS
    } else {
        lock_seconds
    }
}

/// Latest expiry the mapping must survive: the new leases plus any entry
/// that is still outstanding after this pipeline's cleanup.
fn latest_expiry(
    lease_map: &std::collections::HashMap<String, String>,
    removed: &[AccountId],
    new_expiry: i64,
    now: i64,
) -> i64 {
    let removed: std::collections::HashSet<String> =
        removed.iter().map(ToString::to_string).collect();

    lease_map
        .iter()
        .filter(|(field, _)| !removed.contains(field.as_str()))
        .filter_map(|(_, value)| value.parse::<i64>().ok())
        .filter(|expires_at| *expires_at >= now)
        .fold(new_expiry, i64::max)
}
