use async_trait::async_trait;

use crawlpool_core::AppResult;
use crawlpool_domain::{Account, AccountId, AccountStatus, NewAccount};

/// Columns accounts may be sorted by. Currently only the primary key.
const SORTABLE_FIELDS: &[&str] = &["id"];

/// Account listing filter and page selection.
///
/// `page_size` and `page_num` arrive pre-clamped by the account service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountListQuery {
    pub page_size: i64,
    pub page_num: i64,
    pub status: Option<AccountStatus>,
    pub id: Option<AccountId>,
    pub username_prefix: Option<String>,
    pub email_prefix: Option<String>,
    pub sort_field: Option<String>,
    pub sort_order: Option<String>,
}

/// Sort direction after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    /// Returns the SQL keyword for this direction.
    #[must_use]
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

impl AccountListQuery {
    /// Normalizes the requested sort against the allow-list.
    ///
    /// Unknown fields and unknown orders fall back to `id` ascending.
    #[must_use]
    pub fn normalized_sort(&self) -> (&'static str, SortOrder) {
        let field = self
            .sort_field
            .as_deref()
            .and_then(|requested| {
                SORTABLE_FIELDS
                    .iter()
                    .find(|allowed| **allowed == requested)
            })
            .copied()
            .unwrap_or("id");

        let order = match self.sort_order.as_deref() {
            Some("desc") => SortOrder::Descending,
            _ => SortOrder::Ascending,
        };

        (field, order)
    }

    /// Returns the row offset for the requested page.
    #[must_use]
    pub fn offset(&self) -> i64 {
        (self.page_num - 1) * self.page_size
    }
}

/// One page of accounts plus the total count matching the filter.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountPage<C> {
    pub accounts: Vec<Account<C>>,
    pub total: i64,
}

/// Durable inventory port for one platform's accounts.
///
/// All lookups observe non-deleted rows only; deletion is a soft delete that
/// keeps the row for audit.
#[async_trait]
pub trait AccountInventory<C>: Send + Sync {
    /// Persists a new account and returns the stored record with its id.
    async fn create(&self, account: NewAccount<C>) -> AppResult<Account<C>>;

    /// Writes a fully merged record back and returns the stored state.
    async fn update(&self, account: Account<C>) -> AppResult<Account<C>>;

    /// Soft-deletes one account.
    async fn delete(&self, id: AccountId) -> AppResult<()>;

    /// Looks up one account by id.
    async fn get_by_id(&self, id: AccountId) -> AppResult<Option<Account<C>>>;

    /// Looks up one account by username.
    async fn get_by_username(&self, username: &str) -> AppResult<Option<Account<C>>>;

    /// Returns one page of accounts and the total matching the filter.
    async fn list(&self, query: AccountListQuery) -> AppResult<AccountPage<C>>;

    /// Returns every account with the given status, for lease selection.
    async fn find_by_status(&self, status: AccountStatus) -> AppResult<Vec<Account<C>>>;
}
