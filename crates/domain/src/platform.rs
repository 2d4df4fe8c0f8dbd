use std::fmt::{Display, Formatter};

use crate::AccountStatus;

/// Social platform an account inventory belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Twitter,
    Instagram,
    TikTok,
}

impl Platform {
    /// Returns the lowercase platform name used in keys and routes.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Twitter => "twitter",
            Self::Instagram => "instagram",
            Self::TikTok => "tiktok",
        }
    }

    /// Returns the relational table holding this platform's accounts.
    #[must_use]
    pub fn table_name(&self) -> &'static str {
        match self {
            Self::Twitter => "twitter_accounts",
            Self::Instagram => "instagram_accounts",
            Self::TikTok => "tiktok_accounts",
        }
    }

    /// Returns the shared-store hash key recording this platform's leases.
    ///
    /// The layout is bit-exact for interoperability with existing
    /// deployments: fields are account ids, values are Unix-second expiries,
    /// both as decimal strings.
    #[must_use]
    pub fn occupied_key(&self) -> String {
        format!("{}_accounts_occupied", self.as_str())
    }

    /// Returns whether the status belongs to this platform's status set.
    ///
    /// `suspended` exists only on Twitter; the remaining statuses are shared.
    #[must_use]
    pub fn allows_status(&self, status: AccountStatus) -> bool {
        match status {
            AccountStatus::Suspended => matches!(self, Self::Twitter),
            _ => true,
        }
    }
}

impl Display for Platform {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.as_str())
    }
}
