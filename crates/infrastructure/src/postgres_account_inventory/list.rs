use sqlx::{Postgres, QueryBuilder};

use super::*;

impl<C: CredentialSet> PostgresAccountInventory<C> {
    pub(super) async fn list_impl(&self, query: AccountListQuery) -> AppResult<AccountPage<C>> {
        let mut count_builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT COUNT(*) FROM {} WHERE deleted_at IS NULL",
            self.platform.table_name(),
        ));
        push_filters(&mut count_builder, &query);

        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to count {} accounts: {error}",
                    self.platform
                ))
            })?;

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {ACCOUNT_COLUMNS} FROM {} WHERE deleted_at IS NULL",
            self.platform.table_name(),
        ));
        push_filters(&mut builder, &query);

        // Both values come from a fixed allow-list, never from the caller.
        let (sort_field, sort_order) = query.normalized_sort();
        builder.push(format!(" ORDER BY {sort_field} {}", sort_order.as_sql()));

        builder.push(" LIMIT ").push_bind(query.page_size);
        builder.push(" OFFSET ").push_bind(query.offset());

        let rows = builder
            .build_query_as::<AccountRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to list {} accounts: {error}",
                    self.platform
                ))
            })?;

        let accounts = rows
            .into_iter()
            .map(AccountRow::into_account)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(AccountPage { accounts, total })
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &AccountListQuery) {
    if let Some(status) = query.status {
        builder.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(id) = query.id {
        builder.push(" AND id = ").push_bind(id.as_i64());
    }
    if let Some(prefix) = query.username_prefix.as_deref() {
        builder
            .push(" AND username LIKE ")
            .push_bind(format!("{prefix}%"));
    }
    if let Some(prefix) = query.email_prefix.as_deref() {
        builder
            .push(" AND email LIKE ")
            .push_bind(format!("{prefix}%"));
    }
}
