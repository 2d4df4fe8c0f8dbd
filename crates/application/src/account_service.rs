use std::sync::Arc;

use tracing::info;

use crawlpool_core::{AppError, AppResult};
use crawlpool_domain::{
    Account, AccountId, AccountPatch, AccountStatus, CredentialSet, NewAccount, Platform,
};

use crate::account_ports::{AccountInventory, AccountListQuery, AccountPage};

/// Default page size when the caller does not supply one.
const DEFAULT_PAGE_SIZE: i64 = 20;

/// Largest permitted page size.
const MAX_PAGE_SIZE: i64 = 100;

/// Input payload for account creation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateAccountInput<C> {
    pub username: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub credentials: C,
    pub status: Option<AccountStatus>,
}

/// Application service for one platform's account CRUD.
pub struct AccountService<C> {
    platform: Platform,
    inventory: Arc<dyn AccountInventory<C>>,
}

impl<C> Clone for AccountService<C> {
    fn clone(&self) -> Self {
        Self {
            platform: self.platform,
            inventory: Arc::clone(&self.inventory),
        }
    }
}

impl<C: CredentialSet> AccountService<C> {
    /// Creates a service over the given platform inventory.
    #[must_use]
    pub fn new(platform: Platform, inventory: Arc<dyn AccountInventory<C>>) -> Self {
        Self {
            platform,
            inventory,
        }
    }

    /// Creates an account after validating required fields and uniqueness.
    pub async fn create(&self, input: CreateAccountInput<C>) -> AppResult<Account<C>> {
        if input.username.is_empty() {
            return Err(AppError::Validation("username must not be empty".to_owned()));
        }
        if input.email.is_empty() {
            return Err(AppError::Validation("email must not be empty".to_owned()));
        }
        if input.password.is_empty() {
            return Err(AppError::Validation("password must not be empty".to_owned()));
        }

        let status = input.status.unwrap_or(AccountStatus::Normal);
        self.ensure_status_allowed(status)?;

        // Friendly pre-check; the partial unique index backstops races.
        if self
            .inventory
            .get_by_username(input.username.as_str())
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "{} account '{}' already exists",
                self.platform, input.username
            )));
        }

        let created = self
            .inventory
            .create(NewAccount {
                username: input.username,
                email: input.email,
                phone: input.phone,
                password: input.password,
                credentials: input.credentials,
                status,
            })
            .await?;

        info!(platform = %self.platform, account_id = %created.id, username = %created.username, "account created");
        Ok(created)
    }

    /// Merges the patch into the stored record and persists the result.
    pub async fn update(&self, id: AccountId, patch: AccountPatch<C>) -> AppResult<Account<C>> {
        if let Some(status) = patch.status {
            self.ensure_status_allowed(status)?;
        }

        let mut account = self.get(id).await?;
        account.apply(&patch);

        let updated = self.inventory.update(account).await?;
        info!(platform = %self.platform, account_id = %updated.id, "account updated");
        Ok(updated)
    }

    /// Soft-deletes one account.
    pub async fn delete(&self, id: AccountId) -> AppResult<()> {
        self.inventory.delete(id).await?;
        info!(platform = %self.platform, account_id = %id, "account deleted");
        Ok(())
    }

    /// Returns one account or `NotFound`.
    pub async fn get(&self, id: AccountId) -> AppResult<Account<C>> {
        self.inventory.get_by_id(id).await?.ok_or_else(|| {
            AppError::NotFound(format!("{} account {id} not found", self.platform))
        })
    }

    /// Returns one account by username or `NotFound`.
    pub async fn get_by_username(&self, username: &str) -> AppResult<Account<C>> {
        self.inventory
            .get_by_username(username)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "{} account '{username}' not found",
                    self.platform
                ))
            })
    }

    /// Lists accounts with the page bounds clamped to sane values.
    pub async fn list(&self, mut query: AccountListQuery) -> AppResult<AccountPage<C>> {
        if query.page_size <= 0 {
            query.page_size = DEFAULT_PAGE_SIZE;
        }
        if query.page_size > MAX_PAGE_SIZE {
            query.page_size = MAX_PAGE_SIZE;
        }
        if query.page_num <= 0 {
            query.page_num = 1;
        }

        self.inventory.list(query).await
    }

    fn ensure_status_allowed(&self, status: AccountStatus) -> AppResult<()> {
        if !self.platform.allows_status(status) {
            return Err(AppError::Validation(format!(
                "status '{status}' is not valid for {}",
                self.platform
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
