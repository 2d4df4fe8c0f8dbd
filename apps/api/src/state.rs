use std::sync::Arc;

use sqlx::PgPool;

use crawlpool_application::{
    AccountInventory, AccountService, Clock, LeaseService, LeaseStore, SystemClock,
};
use crawlpool_domain::{
    CredentialSet, InstagramCredentials, Platform, TikTokCredentials, TwitterCredentials,
};
use crawlpool_infrastructure::{PostgresAccountInventory, RedisLeaseStore};

/// Services for one platform, shared across its routes.
pub struct PlatformState<C> {
    pub accounts: AccountService<C>,
    pub leases: Arc<LeaseService<C>>,
}

impl<C> Clone for PlatformState<C> {
    fn clone(&self) -> Self {
        Self {
            accounts: self.accounts.clone(),
            leases: Arc::clone(&self.leases),
        }
    }
}

impl<C: CredentialSet> PlatformState<C> {
    fn build(
        platform: Platform,
        pool: &PgPool,
        lease_store: &Arc<dyn LeaseStore>,
        clock: &Arc<dyn Clock>,
    ) -> Self {
        let inventory: Arc<dyn AccountInventory<C>> =
            Arc::new(PostgresAccountInventory::new(pool.clone(), platform));

        Self {
            accounts: AccountService::new(platform, Arc::clone(&inventory)),
            leases: Arc::new(LeaseService::new(
                platform,
                inventory,
                Arc::clone(lease_store),
                Arc::clone(clock),
            )),
        }
    }
}

/// Shared application state: one service pair per platform.
pub struct AppState {
    pub twitter: PlatformState<TwitterCredentials>,
    pub instagram: PlatformState<InstagramCredentials>,
    pub tiktok: PlatformState<TikTokCredentials>,
}

impl AppState {
    /// Wires every platform onto the shared pool, lease store and clock.
    #[must_use]
    pub fn build(pool: PgPool, redis_client: redis::Client) -> Self {
        let lease_store: Arc<dyn LeaseStore> = Arc::new(RedisLeaseStore::new(redis_client));
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        Self {
            twitter: PlatformState::build(Platform::Twitter, &pool, &lease_store, &clock),
            instagram: PlatformState::build(Platform::Instagram, &pool, &lease_store, &clock),
            tiktok: PlatformState::build(Platform::TikTok, &pool, &lease_store, &clock),
        }
    }
}
