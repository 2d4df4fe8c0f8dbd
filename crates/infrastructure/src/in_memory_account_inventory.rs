//! In-memory account inventory for tests and local development.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crawlpool_application::{AccountInventory, AccountListQuery, AccountPage, SortOrder};
use crawlpool_core::{AppError, AppResult};
use crawlpool_domain::{Account, AccountId, AccountStatus, CredentialSet, NewAccount, Platform};

struct StoredRow<C> {
    account: Account<C>,
    deleted: bool,
}

/// In-memory implementation of the account inventory port.
///
/// Mirrors the PostgreSQL adapter's observable behavior, including soft
/// deletes and the username uniqueness constraint.
pub struct InMemoryAccountInventory<C> {
    platform: Platform,
    rows: Mutex<Vec<StoredRow<C>>>,
}

impl<C> InMemoryAccountInventory<C> {
    /// Creates an empty inventory.
    #[must_use]
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            rows: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl<C: CredentialSet> AccountInventory<C> for InMemoryAccountInventory<C> {
    async fn create(&self, account: NewAccount<C>) -> AppResult<Account<C>> {
        let mut rows = self.rows.lock().await;

        if rows
            .iter()
            .any(|row| !row.deleted && row.account.username == account.username)
        {
            return Err(AppError::Conflict(format!(
                "{} account username already exists",
                self.platform
            )));
        }

        let now = Utc::now();
        let stored = Account {
            id: AccountId::from_i64(rows.len() as i64 + 1),
            created_at: now,
            updated_at: now,
            username: account.username,
            email: account.email,
            phone: account.phone,
            password: account.password,
            credentials: account.credentials,
            status: account.status,
        };

        rows.push(StoredRow {
            account: stored.clone(),
            deleted: false,
        });

        Ok(stored)
    }

    async fn update(&self, mut account: Account<C>) -> AppResult<Account<C>> {
        let mut rows = self.rows.lock().await;
        let row = rows
            .iter_mut()
            .find(|row| !row.deleted && row.account.id == account.id)
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "{} account {} not found",
                    self.platform, account.id
                ))
            })?;

        account.created_at = row.account.created_at;
        account.updated_at = Utc::now();
        row.account = account.clone();

        Ok(account)
    }

    async fn delete(&self, id: AccountId) -> AppResult<()> {
        let mut rows = self.rows.lock().await;
        let row = rows
            .iter_mut()
            .find(|row| !row.deleted && row.account.id == id)
            .ok_or_else(|| {
                AppError::NotFound(format!("{} account {id} not found", self.platform))
            })?;

        row.deleted = true;
        Ok(())
    }

    async fn get_by_id(&self, id: AccountId) -> AppResult<Option<Account<C>>> {
        Ok(self
            .rows
            .lock()
            .await
            .iter()
            .find(|row| !row.deleted && row.account.id == id)
            .map(|row| row.account.clone()))
    }

    async fn get_by_username(&self, username: &str) -> AppResult<Option<Account<C>>> {
        Ok(self
            .rows
            .lock()
            .await
            .iter()
            .find(|row| !row.deleted && row.account.username == username)
            .map(|row| row.account.clone()))
    }

    async fn list(&self, query: AccountListQuery) -> AppResult<AccountPage<C>> {
        let rows = self.rows.lock().await;
        let mut matching: Vec<Account<C>> = rows
            .iter()
            .filter(|row| !row.deleted)
            .filter(|row| query.status.is_none_or(|status| row.account.status == status))
            .filter(|row| query.id.is_none_or(|id| row.account.id == id))
            .filter(|row| {
                query
                    .username_prefix
                    .as_deref()
                    .is_none_or(|prefix| row.account.username.starts_with(prefix))
            })
            .filter(|row| {
                query
                    .email_prefix
                    .as_deref()
                    .is_none_or(|prefix| row.account.email.starts_with(prefix))
            })
            .map(|row| row.account.clone())
            .collect();

        let (_, order) = query.normalized_sort();
        matching.sort_by_key(|account| account.id);
        if order == SortOrder::Descending {
            matching.reverse();
        }

        let total = matching.len() as i64;
        let accounts = matching
            .into_iter()
            .skip(query.offset().max(0) as usize)
            .take(query.page_size.max(0) as usize)
            .collect();

        Ok(AccountPage { accounts, total })
    }

    async fn find_by_status(&self, status: AccountStatus) -> AppResult<Vec<Account<C>>> {
        Ok(self
            .rows
            .lock()
            .await
            .iter()
            .filter(|row| !row.deleted && row.account.status == status)
            .map(|row| row.account.clone())
            .collect())
    }
}
