use super::*;

impl<C: CredentialSet> PostgresAccountInventory<C> {
    pub(super) async fn get_by_id_impl(&self, id: AccountId) -> AppResult<Option<Account<C>>> {
        let sql = format!(
            "SELECT {ACCOUNT_COLUMNS} FROM {table} \
             WHERE id = $1 AND deleted_at IS NULL \
             LIMIT 1",
            table = self.platform.table_name(),
        );

        let row = sqlx::query_as::<_, AccountRow>(sql.as_str())
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to find {} account by id: {error}",
                    self.platform
                ))
            })?;

        row.map(AccountRow::into_account).transpose()
    }

    pub(super) async fn get_by_username_impl(
        &self,
        username: &str,
    ) -> AppResult<Option<Account<C>>> {
        let sql = format!(
            "SELECT {ACCOUNT_COLUMNS} FROM {table} \
             WHERE username = $1 AND deleted_at IS NULL \
             LIMIT 1",
            table = self.platform.table_name(),
        );

        let row = sqlx::query_as::<_, AccountRow>(sql.as_str())
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to find {} account by username: {error}",
                    self.platform
                ))
            })?;

        row.map(AccountRow::into_account).transpose()
    }

    pub(super) async fn find_by_status_impl(
        &self,
        status: AccountStatus,
    ) -> AppResult<Vec<Account<C>>> {
        let sql = format!(
            "SELECT {ACCOUNT_COLUMNS} FROM {table} \
             WHERE status = $1 AND deleted_at IS NULL",
            table = self.platform.table_name(),
        );

        let rows = sqlx::query_as::<_, AccountRow>(sql.as_str())
            .bind(status.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to load {} accounts by status: {error}",
                    self.platform
                ))
            })?;

        rows.into_iter().map(AccountRow::into_account).collect()
    }
}
