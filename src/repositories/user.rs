use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};

use super::{RepositoryError, RepositoryResult};
use crate::domain::User;

const ENTITY: &str = "user";

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a transaction on the pool shared with the other repositories
    pub async fn begin(&self) -> RepositoryResult<Transaction<'static, Sqlite>> {
        Ok(self.pool.begin().await?)
    }

    pub async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn save(&self, user: &mut User) -> RepositoryResult<()> {
        let mut conn = self.pool.acquire().await?;
        self.save_in(&mut conn, user).await
    }

    /// Save on an existing connection, typically a transaction
    pub async fn save_in(&self, conn: &mut SqliteConnection, user: &mut User) -> RepositoryResult<()> {
        match user.id {
            None => {
                let result = sqlx::query("INSERT INTO users (name, email, password) VALUES (?, ?, ?)")
                    .bind(&user.name)
                    .bind(&user.email)
                    .bind(&user.password)
                    .execute(&mut *conn)
                    .await
                    .map_err(|err| RepositoryError::not_saved(ENTITY, err))?;
                user.id = Some(result.last_insert_rowid());
            }
            Some(id) => {
                let result =
                    sqlx::query("UPDATE users SET name = ?, email = ?, password = ? WHERE id = ?")
                        .bind(&user.name)
                        .bind(&user.email)
                        .bind(&user.password)
                        .bind(id)
                        .execute(&mut *conn)
                        .await
                        .map_err(|err| RepositoryError::not_saved(ENTITY, err))?;
                if result.rows_affected() == 0 {
                    return Err(RepositoryError::not_saved(
                        ENTITY,
                        format!("user {id} no longer exists"),
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::migrated_pool;

    #[tokio::test]
    async fn saved_user_is_found_by_email() {
        let repository = UserRepository::new(migrated_pool().await);
        let mut user = User::new("Mario", "mario@example.com", "password").unwrap();
        repository.save(&mut user).await.unwrap();

        let found = repository.find_by_email("mario@example.com").await.unwrap();
        assert_eq!(found, Some(user));
        assert_eq!(repository.find_by_email("luigi@example.com").await.unwrap(), None);
    }

    #[tokio::test]
    async fn duplicate_email_is_not_saved() {
        let repository = UserRepository::new(migrated_pool().await);
        let mut first = User::new("Mario", "mario@example.com", "password").unwrap();
        let mut second = User::new("Altro Mario", "mario@example.com", "password").unwrap();
        repository.save(&mut first).await.unwrap();

        let err = repository.save(&mut second).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotSaved { .. }));
    }
}
