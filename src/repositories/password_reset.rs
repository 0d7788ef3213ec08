use sqlx::{SqliteConnection, SqlitePool};

use super::{RepositoryError, RepositoryResult};

const ENTITY: &str = "password reset token";

/// One-time reset tokens keyed by e-mail.
#[derive(Debug, Clone)]
pub struct PasswordResetRepository {
    pool: SqlitePool,
}

impl PasswordResetRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn exists(&self, email: &str, token: &str) -> RepositoryResult<bool> {
        let found: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM password_resets WHERE email = ? AND token = ? LIMIT 1")
                .bind(email)
                .bind(token)
                .fetch_optional(&self.pool)
                .await?;
        Ok(found.is_some())
    }

    pub async fn create(&self, email: &str, token: &str) -> RepositoryResult<()> {
        sqlx::query("INSERT INTO password_resets (email, token) VALUES (?, ?)")
            .bind(email)
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(|err| RepositoryError::not_saved(ENTITY, err))?;
        Ok(())
    }

    /// Drop every token issued for `email`; returns how many were removed
    pub async fn remove_by_email(&self, email: &str) -> RepositoryResult<u64> {
        let mut conn = self.pool.acquire().await?;
        self.remove_by_email_in(&mut conn, email).await
    }

    pub async fn remove_by_email_in(
        &self,
        conn: &mut SqliteConnection,
        email: &str,
    ) -> RepositoryResult<u64> {
        let result = sqlx::query("DELETE FROM password_resets WHERE email = ?")
            .bind(email)
            .execute(&mut *conn)
            .await
            .map_err(|err| RepositoryError::not_deleted(ENTITY, err))?;
        Ok(result.rows_affected())
    }
}
