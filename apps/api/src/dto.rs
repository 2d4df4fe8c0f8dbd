//! Transport DTOs for the account endpoints.
//!
//! Absent and empty string fields both mean "leave unchanged" on update,
//! matching the field-merge semantics of the account service. Timestamps are
//! serialized as RFC 3339.

use serde::{Deserialize, Serialize};

use crawlpool_application::AccountListQuery;
use crawlpool_core::AppResult;
use crawlpool_domain::{Account, AccountId, AccountPatch, AccountStatus};

#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest<C> {
    pub username: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub credentials: Option<C>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAccountRequest<C> {
    pub username: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub credentials: Option<C>,
    pub status: Option<String>,
}

impl<C: Default> UpdateAccountRequest<C> {
    pub fn into_patch(self) -> AppResult<AccountPatch<C>> {
        Ok(AccountPatch {
            username: self.username.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            phone: self.phone.unwrap_or_default(),
            password: self.password.unwrap_or_default(),
            credentials: self.credentials.unwrap_or_default(),
            status: parse_optional_status(self.status)?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct AccountResponse<C> {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub credentials: C,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl<C> From<Account<C>> for AccountResponse<C> {
    fn from(account: Account<C>) -> Self {
        Self {
            id: account.id.as_i64(),
            username: account.username,
            email: account.email,
            phone: account.phone,
            password: account.password,
            credentials: account.credentials,
            status: account.status.as_str().to_owned(),
            created_at: account.created_at.to_rfc3339(),
            updated_at: account.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteAccountResponse {
    pub success: bool,
}

#[derive(Debug, Deserialize)]
pub struct ListAccountsParams {
    pub page_size: Option<i64>,
    pub page_num: Option<i64>,
    pub status: Option<String>,
    pub id: Option<i64>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub sort_field: Option<String>,
    pub sort_order: Option<String>,
}

impl ListAccountsParams {
    pub fn into_query(self) -> AppResult<AccountListQuery> {
        Ok(AccountListQuery {
            page_size: self.page_size.unwrap_or_default(),
            page_num: self.page_num.unwrap_or_default(),
            status: parse_optional_status(self.status)?,
            id: self.id.filter(|id| *id > 0).map(AccountId::from_i64),
            username_prefix: self.username.filter(|value| !value.is_empty()),
            email_prefix: self.email.filter(|value| !value.is_empty()),
            sort_field: self.sort_field.filter(|value| !value.is_empty()),
            sort_order: self.sort_order.filter(|value| !value.is_empty()),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ListAccountsResponse<C> {
    pub total: i64,
    pub accounts: Vec<AccountResponse<C>>,
}

#[derive(Debug, Deserialize)]
pub struct LockAccountsRequest {
    pub count: Option<i64>,
    pub lock_seconds: Option<i64>,
    #[serde(rename = "type")]
    pub account_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LockAccountsResponse<C> {
    pub lock_seconds: i64,
    pub accounts: Vec<AccountResponse<C>>,
}

#[derive(Debug, Deserialize)]
pub struct UnlockAccountsRequest {
    pub ids: Vec<i64>,
    pub delay: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct UnlockAccountsResponse {
    pub success: bool,
    pub unlocked_count: i64,
}

pub fn parse_optional_status(status: Option<String>) -> AppResult<Option<AccountStatus>> {
    status
        .filter(|value| !value.is_empty())
        .map(|value| AccountStatus::parse(value.as_str()))
        .transpose()
}
