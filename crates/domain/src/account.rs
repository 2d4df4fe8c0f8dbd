//! Account records and their merge semantics.

use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crawlpool_core::{AppError, AppResult};

use crate::credentials::CredentialSet;

/// Stable numeric identifier assigned to an account at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(i64);

impl AccountId {
    /// Creates an account identifier from a stored row id.
    #[must_use]
    pub fn from_i64(value: i64) -> Self {
        Self(value)
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for AccountId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Lifecycle status of one account.
///
/// Only `normal` accounts are leased under the default policies; Twitter
/// additionally leases `suspended` accounts for similar-style crawls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Normal,
    LoginExpired,
    Disabled,
    Deprecated,
    Suspended,
}

impl AccountStatus {
    /// Returns the storage string for this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::LoginExpired => "login_expired",
            Self::Disabled => "disabled",
            Self::Deprecated => "deprecated",
            Self::Suspended => "suspended",
        }
    }

    /// Parses a storage string into a status.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "normal" => Ok(Self::Normal),
            "login_expired" => Ok(Self::LoginExpired),
            "disabled" => Ok(Self::Disabled),
            "deprecated" => Ok(Self::Deprecated),
            "suspended" => Ok(Self::Suspended),
            _ => Err(AppError::Validation(format!(
                "unknown account status '{value}'"
            ))),
        }
    }
}

impl Display for AccountStatus {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.as_str())
    }
}

/// Persistent credential record for one identity on one platform.
#[derive(Debug, Clone, PartialEq)]
pub struct Account<C> {
    pub id: AccountId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub credentials: C,
    pub status: AccountStatus,
}

/// Payload for account creation, before an id is assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount<C> {
    pub username: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub credentials: C,
    pub status: AccountStatus,
}

/// Field-merge payload for account updates.
///
/// Empty string fields keep the stored value; non-empty fields replace it.
/// Credential sub-fields merge individually via [`CredentialSet::merge`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountPatch<C> {
    pub username: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub credentials: C,
    pub status: Option<AccountStatus>,
}

impl<C: CredentialSet> Account<C> {
    /// Applies a field-merge patch onto this record.
    pub fn apply(&mut self, patch: &AccountPatch<C>) {
        if !patch.username.is_empty() {
            self.username = patch.username.clone();
        }
        if !patch.email.is_empty() {
            self.email = patch.email.clone();
        }
        if !patch.phone.is_empty() {
            self.phone = patch.phone.clone();
        }
        if !patch.password.is_empty() {
            self.password = patch.password.clone();
        }
        self.credentials.merge(&patch.credentials);
        if let Some(status) = patch.status {
            self.status = status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::TwitterCredentials;

    fn account() -> Account<TwitterCredentials> {
        Account {
            id: AccountId::from_i64(1),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            username: "crawler_one".to_owned(),
            email: "one@example.com".to_owned(),
            phone: "12345".to_owned(),
            password: "secret".to_owned(),
            credentials: TwitterCredentials {
                authorization: "Bearer old".to_owned(),
                x_csrf_token: "token".to_owned(),
                cookie: "cookie".to_owned(),
                x_client_transaction_id: String::new(),
            },
            status: AccountStatus::Normal,
        }
    }

    #[test]
    fn status_round_trips_through_storage_string() {
        for status in [
            AccountStatus::Normal,
            AccountStatus::LoginExpired,
            AccountStatus::Disabled,
            AccountStatus::Deprecated,
            AccountStatus::Suspended,
        ] {
            assert_eq!(
                AccountStatus::parse(status.as_str()).ok(),
                Some(status),
                "status {status} should round trip"
            );
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(AccountStatus::parse("banned").is_err());
    }

    #[test]
    fn empty_patch_fields_keep_stored_values() {
        let mut stored = account();
        let patch = AccountPatch::<TwitterCredentials>::default();

        stored.apply(&patch);

        assert_eq!(stored.username, "crawler_one");
        assert_eq!(stored.email, "one@example.com");
        assert_eq!(stored.password, "secret");
        assert_eq!(stored.credentials.authorization, "Bearer old");
        assert_eq!(stored.status, AccountStatus::Normal);
    }

    #[test]
    fn non_empty_patch_fields_replace_stored_values() {
        let mut stored = account();
        let patch = AccountPatch {
            username: String::new(),
            email: "new@example.com".to_owned(),
            phone: String::new(),
            password: "rotated".to_owned(),
            credentials: TwitterCredentials {
                authorization: "Bearer new".to_owned(),
                ..TwitterCredentials::default()
            },
            status: Some(AccountStatus::Suspended),
        };

        stored.apply(&patch);

        assert_eq!(stored.username, "crawler_one");
        assert_eq!(stored.email, "new@example.com");
        assert_eq!(stored.password, "rotated");
        assert_eq!(stored.credentials.authorization, "Bearer new");
        assert_eq!(stored.credentials.cookie, "cookie");
        assert_eq!(stored.status, AccountStatus::Suspended);
    }
}
