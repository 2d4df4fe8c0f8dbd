use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crawlpool_core::{AppError, AppResult};
use crawlpool_domain::{
    Account, AccountId, AccountPatch, AccountStatus, CredentialSet, InstagramCredentials,
    NewAccount, Platform, TwitterCredentials,
};

use crate::account_ports::{AccountInventory, AccountListQuery, AccountPage, SortOrder};

use super::{AccountService, CreateAccountInput};

struct StoredRow<C> {
    account: Account<C>,
    deleted: bool,
}

#[derive(Default)]
struct FakeAccountInventory<C> {
    rows: Mutex<Vec<StoredRow<C>>>,
}

impl<C: CredentialSet> FakeAccountInventory<C> {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            rows: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl<C: CredentialSet> AccountInventory<C> for FakeAccountInventory<C> {
    async fn create(&self, account: NewAccount<C>) -> AppResult<Account<C>> {
        let mut rows = self.rows.lock().await;
        let id = rows.len() as i64 + 1;
        let stored = Account {
            id: AccountId::from_i64(id),
            created_at: Utc::now(),
            updated_at: Utc::now(),
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

    async fn update(&self, account: Account<C>) -> AppResult<Account<C>> {
        let mut rows = self.rows.lock().await;
        let row = rows
            .iter_mut()
            .find(|row| !row.deleted && row.account.id == account.id)
            .ok_or_else(|| AppError::NotFound("account not found".to_owned()))?;
        row.account = account.clone();
        Ok(account)
    }

    async fn delete(&self, id: AccountId) -> AppResult<()> {
        let mut rows = self.rows.lock().await;
        let row = rows
            .iter_mut()
            .find(|row| !row.deleted && row.account.id == id)
            .ok_or_else(|| AppError::NotFound("account not found".to_owned()))?;
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
            .skip(query.offset() as usize)
            .take(query.page_size as usize)
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

fn twitter_service() -> AccountService<TwitterCredentials> {
    AccountService::new(Platform::Twitter, FakeAccountInventory::new())
}

fn create_input(username: &str) -> CreateAccountInput<TwitterCredentials> {
    CreateAccountInput {
        username: username.to_owned(),
        email: format!("{username}@example.com"),
        phone: "12345".to_owned(),
        password: "secret".to_owned(),
        credentials: TwitterCredentials::default(),
        status: None,
    }
}

#[tokio::test]
async fn create_rejects_missing_required_fields() {
    let service = twitter_service();

    for missing in ["username", "email", "password"] {
        let mut input = create_input("crawler_one");
        match missing {
            "username" => input.username = String::new(),
            "email" => input.email = String::new(),
            _ => input.password = String::new(),
        }

        let result = service.create(input).await;
        assert!(
            matches!(result, Err(AppError::Validation(_))),
            "empty {missing} should be rejected"
        );
    }
}

#[tokio::test]
async fn create_defaults_status_to_normal_and_assigns_id() {
    let service = twitter_service();

    let created = service.create(create_input("crawler_one")).await.unwrap();

    assert_eq!(created.status, AccountStatus::Normal);
    assert_eq!(created.id.as_i64(), 1);

    let fetched = service.get_by_username("crawler_one").await.unwrap();
    assert_eq!(fetched.id, created.id);
}

#[tokio::test]
async fn create_rejects_duplicate_username() {
    let service = twitter_service();
    service.create(create_input("crawler_one")).await.unwrap();

    let result = service.create(create_input("crawler_one")).await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn create_rejects_status_outside_the_platform_set() {
    let service: AccountService<InstagramCredentials> =
        AccountService::new(Platform::Instagram, FakeAccountInventory::new());

    let result = service
        .create(CreateAccountInput {
            username: "insta_one".to_owned(),
            email: "insta_one@example.com".to_owned(),
            phone: String::new(),
            password: "secret".to_owned(),
            credentials: InstagramCredentials::default(),
            status: Some(AccountStatus::Suspended),
        })
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn update_merges_only_provided_fields() {
    let service = twitter_service();
    let created = service.create(create_input("crawler_one")).await.unwrap();

    let updated = service
        .update(
            created.id,
            AccountPatch {
                credentials: TwitterCredentials {
                    authorization: "Bearer A".to_owned(),
                    ..TwitterCredentials::default()
                },
                ..AccountPatch::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.username, "crawler_one");
    assert_eq!(updated.email, "crawler_one@example.com");
    assert_eq!(updated.phone, "12345");
    assert_eq!(updated.password, "secret");
    assert_eq!(updated.credentials.authorization, "Bearer A");
}

#[tokio::test]
async fn update_unknown_account_is_not_found() {
    let service = twitter_service();

    let result = service
        .update(AccountId::from_i64(404), AccountPatch::default())
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn deleted_account_disappears_from_lookups() {
    let service = twitter_service();
    let created = service.create(create_input("crawler_one")).await.unwrap();

    service.delete(created.id).await.unwrap();

    assert!(matches!(
        service.get(created.id).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        service.delete(created.id).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn list_clamps_page_bounds() {
    let service = twitter_service();
    for index in 0..150 {
        service
            .create(create_input(format!("crawler_{index:03}").as_str()))
            .await
            .unwrap();
    }

    let default_page = service.list(AccountListQuery::default()).await.unwrap();
    assert_eq!(default_page.accounts.len(), 20);
    assert_eq!(default_page.total, 150);

    let clamped = service
        .list(AccountListQuery {
            page_size: 1_000,
            page_num: 0,
            ..AccountListQuery::default()
        })
        .await
        .unwrap();
    assert_eq!(clamped.accounts.len(), 100);
}

#[tokio::test]
async fn list_pages_cover_the_filtered_set_without_duplicates() {
    let service = twitter_service();
    for index in 0..45 {
        service
            .create(create_input(format!("crawler_{index:03}").as_str()))
            .await
            .unwrap();
    }

    let mut seen = std::collections::HashSet::new();
    for page_num in 1..=3 {
        let page = service
            .list(AccountListQuery {
                page_size: 20,
                page_num,
                ..AccountListQuery::default()
            })
            .await
            .unwrap();
        assert!(page.accounts.len() <= 20);
        for account in page.accounts {
            assert!(seen.insert(account.id), "duplicate id across pages");
        }
    }

    assert_eq!(seen.len(), 45);
}

#[tokio::test]
async fn list_applies_status_and_prefix_filters() {
    let service = twitter_service();
    service.create(create_input("alpha_one")).await.unwrap();
    service.create(create_input("alpha_two")).await.unwrap();
    let other = service.create(create_input("beta_one")).await.unwrap();
    service
        .update(
            other.id,
            AccountPatch {
                status: Some(AccountStatus::Suspended),
                ..AccountPatch::default()
            },
        )
        .await
        .unwrap();

    let by_prefix = service
        .list(AccountListQuery {
            username_prefix: Some("alpha_".to_owned()),
            ..AccountListQuery::default()
        })
        .await
        .unwrap();
    assert_eq!(by_prefix.total, 2);

    let by_status = service
        .list(AccountListQuery {
            status: Some(AccountStatus::Suspended),
            ..AccountListQuery::default()
        })
        .await
        .unwrap();
    assert_eq!(by_status.total, 1);
    assert_eq!(by_status.accounts[0].username, "beta_one");
}
