//! Application services and ports.

#![forbid(unsafe_code)]

mod account_ports;
mod account_service;
mod clock;
mod lease_ports;
mod lease_service;
mod selector;

pub use account_ports::{AccountInventory, AccountListQuery, AccountPage, SortOrder};
pub use account_service::{AccountService, CreateAccountInput};
pub use clock::{Clock, SystemClock};
pub use lease_ports::{LeaseOp, LeaseStore};
pub use lease_service::{
    DEFAULT_LEASE_COUNT, DEFAULT_LOCK_SECONDS, KEY_TTL_MARGIN_SECONDS, LeaseService,
    MAX_LEASE_COUNT, MAX_LOCK_SECONDS, OVERFLOW_LEASE_COUNT,
};
pub use selector::{Selection, select_available};
