use super::*;

impl<C: CredentialSet> PostgresAccountInventory<C> {
    pub(super) async fn create_impl(&self, account: NewAccount<C>) -> AppResult<Account<C>> {
        let credentials = serde_json::to_value(&account.credentials).map_err(|error| {
            AppError::Internal(format!("failed to encode credentials: {error}"))
        })?;

        let sql = format!(
            "INSERT INTO {table} (username, email, phone, password, credentials, status) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {ACCOUNT_COLUMNS}",
            table = self.platform.table_name(),
        );

        let row = sqlx::query_as::<_, AccountRow>(sql.as_str())
            .bind(account.username)
            .bind(account.email)
            .bind(account.phone)
            .bind(account.password)
            .bind(credentials)
            .bind(account.status.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|error| username_conflict_or_internal(error, self.platform))?;

        row.into_account()
    }

    pub(super) async fn update_impl(&self, account: Account<C>) -> AppResult<Account<C>> {
        let credentials = serde_json::to_value(&account.credentials).map_err(|error| {
            AppError::Internal(format!("failed to encode credentials: {error}"))
        })?;

        let sql = format!(
            "UPDATE {table} \
             SET username = $2, email = $3, phone = $4, password = $5, \
                 credentials = $6, status = $7, updated_at = now() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {ACCOUNT_COLUMNS}",
            table = self.platform.table_name(),
        );

        let row = sqlx::query_as::<_, AccountRow>(sql.as_str())
            .bind(account.id.as_i64())
            .bind(account.username)
            .bind(account.email)
            .bind(account.phone)
            .bind(account.password)
            .bind(credentials)
            .bind(account.status.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to update {} account: {error}",
                    self.platform
                ))
            })?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "{} account {} not found",
                    self.platform, account.id
                ))
            })?;

        row.into_account()
    }

    pub(super) async fn delete_impl(&self, id: AccountId) -> AppResult<()> {
        let sql = format!(
            "UPDATE {table} \
             SET deleted_at = now(), updated_at = now() \
             WHERE id = $1 AND deleted_at IS NULL",
            table = self.platform.table_name(),
        );

        let result = sqlx::query(sql.as_str())
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to delete {} account: {error}",
                    self.platform
                ))
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "{} account {id} not found",
                self.platform
            )));
        }

        Ok(())
    }
}
