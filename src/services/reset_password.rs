use thiserror::Error;

use crate::domain::{PasswordHashError, User};
use crate::repositories::{PasswordResetRepository, RepositoryError, UserRepository};

#[derive(Debug, Error)]
pub enum ResetPasswordError {
    #[error("wrong_email_or_token")]
    WrongEmailOrToken,

    #[error(transparent)]
    Hashing(#[from] PasswordHashError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for ResetPasswordError {
    fn from(err: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Query(err))
    }
}

/// Consume a reset token: check it, set the new password and revoke every
/// token of the user's e-mail.
///
/// The user update and the token removal commit together or not at all.
#[derive(Debug)]
pub struct ResetPassword {
    user: User,
    token: String,
    new_password: String,
}

impl ResetPassword {
    pub fn new(user: User, token: impl Into<String>, new_password: impl Into<String>) -> Self {
        Self {
            user,
            token: token.into(),
            new_password: new_password.into(),
        }
    }

    /// Both repositories must share one pool. Returns the updated user.
    pub async fn handle(
        self,
        users: &UserRepository,
        password_resets: &PasswordResetRepository,
    ) -> Result<User, ResetPasswordError> {
        let Self {
            mut user,
            token,
            new_password,
        } = self;

        if !password_resets.exists(user.email(), &token).await? {
            tracing::info!(email = %user.email(), "password reset rejected: unknown token");
            return Err(ResetPasswordError::WrongEmailOrToken);
        }

        user.set_new_password(&new_password)?;

        let mut tx = users.begin().await?;
        users.save_in(&mut tx, &mut user).await?;
        let revoked = password_resets
            .remove_by_email_in(&mut tx, user.email())
            .await?;
        tx.commit().await?;

        tracing::info!(email = %user.email(), revoked, "password reset completed");
        Ok(user)
    }
}
