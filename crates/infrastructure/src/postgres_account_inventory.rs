//! PostgreSQL-backed account inventory.

use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::PgPool;

use crawlpool_application::{AccountInventory, AccountListQuery, AccountPage};
use crawlpool_core::{AppError, AppResult};
use crawlpool_domain::{Account, AccountId, AccountStatus, CredentialSet, NewAccount, Platform};

/// PostgreSQL implementation of the account inventory port.
///
/// One instance per platform; the platform picks the backing table, and the
/// credential type parameter decodes that table's JSONB credential column.
pub struct PostgresAccountInventory<C> {
    pool: PgPool,
    platform: Platform,
    _credentials: PhantomData<fn() -> C>,
}

impl<C> Clone for PostgresAccountInventory<C> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            platform: self.platform,
            _credentials: PhantomData,
        }
    }
}

impl<C> PostgresAccountInventory<C> {
    /// Creates an inventory over the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool, platform: Platform) -> Self {
        Self {
            pool,
            platform,
            _credentials: PhantomData,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: i64,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
    username: String,
    email: String,
    phone: String,
    password: String,
    credentials: serde_json::Value,
    status: String,
}

impl AccountRow {
    fn into_account<C: CredentialSet>(self) -> AppResult<Account<C>> {
        let status = AccountStatus::parse(self.status.as_str()).map_err(|error| {
            AppError::Internal(format!("stored account {} is invalid: {error}", self.id))
        })?;
        let credentials = serde_json::from_value(self.credentials).map_err(|error| {
            AppError::Internal(format!(
                "failed to decode credentials for account {}: {error}",
                self.id
            ))
        })?;

        Ok(Account {
            id: AccountId::from_i64(self.id),
            created_at: self.created_at,
            updated_at: self.updated_at,
            username: self.username,
            email: self.email,
            phone: self.phone,
            password: self.password,
            credentials,
            status,
        })
    }
}

const ACCOUNT_COLUMNS: &str =
    "id, created_at, updated_at, username, email, phone, password, credentials, status";

mod crud;
mod list;
mod lookup;

#[async_trait]
impl<C: CredentialSet> AccountInventory<C> for PostgresAccountInventory<C> {
    async fn create(&self, account: NewAccount<C>) -> AppResult<Account<C>> {
        self.create_impl(account).await
    }

    async fn update(&self, account: Account<C>) -> AppResult<Account<C>> {
        self.update_impl(account).await
    }

    async fn delete(&self, id: AccountId) -> AppResult<()> {
        self.delete_impl(id).await
    }

    async fn get_by_id(&self, id: AccountId) -> AppResult<Option<Account<C>>> {
        self.get_by_id_impl(id).await
    }

    async fn get_by_username(&self, username: &str) -> AppResult<Option<Account<C>>> {
        self.get_by_username_impl(username).await
    }

    async fn list(&self, query: AccountListQuery) -> AppResult<AccountPage<C>> {
        self.list_impl(query).await
    }

    async fn find_by_status(&self, status: AccountStatus) -> AppResult<Vec<Account<C>>> {
        self.find_by_status_impl(status).await
    }
}

fn username_conflict_or_internal(error: sqlx::Error, platform: Platform) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict(format!("{platform} account username already exists"));
    }

    AppError::Internal(format!("failed to create {platform} account: {error}"))
}
