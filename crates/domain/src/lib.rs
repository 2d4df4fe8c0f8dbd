//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod account;
mod credentials;
mod platform;
mod policy;

pub use account::{Account, AccountId, AccountPatch, AccountStatus, NewAccount};
pub use credentials::{
    CredentialSet, InstagramCredentials, TikTokCredentials, TwitterCredentials,
};
pub use platform::Platform;
pub use policy::eligible_statuses;
