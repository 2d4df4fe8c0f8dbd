//! Pure eligibility selection over a lease-mapping snapshot.

use std::collections::HashMap;

use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::warn;

use crawlpool_domain::{Account, AccountId};

/// Outcome of one selection pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<C> {
    /// Eligible accounts, shuffled.
    pub available: Vec<Account<C>>,
    /// Ids whose lease entry had already expired and may be removed.
    pub expired_ids: Vec<AccountId>,
}

/// Partitions candidates into presently eligible accounts and expired ids.
///
/// An account is eligible iff its id is absent from `lease_map` or the
/// stored expiry is strictly less than `now`. A value that does not parse as
/// a Unix-second count makes the candidate ineligible and is left in place,
/// so a foreign writer's entry is never destroyed by cleanup.
///
/// The eligible list is shuffled with a fresh clock-seeded generator so
/// concurrent workers spread across the inventory instead of all draining
/// the lowest ids.
pub fn select_available<C>(
    candidates: Vec<Account<C>>,
    lease_map: &HashMap<String, String>,
    now: i64,
) -> Selection<C> {
    let mut available = Vec::new();
    let mut expired_ids = Vec::new();

    for account in candidates {
        let Some(raw_expiry) = lease_map.get(account.id.to_string().as_str()) else {
            available.push(account);
            continue;
        };

        match raw_expiry.parse::<i64>() {
            Ok(expires_at) if expires_at < now => {
                expired_ids.push(account.id);
                available.push(account);
            }
            Ok(_) => {}
            Err(error) => {
                warn!(
                    account_id = %account.id,
                    expiry = %raw_expiry,
                    %error,
                    "skipping account with malformed lease expiry"
                );
            }
        }
    }

    let seed = Utc::now().timestamp_nanos_opt().unwrap_or_default() as u64;
    available.shuffle(&mut StdRng::seed_from_u64(seed));

    Selection {
        available,
        expired_ids,
    }
}
