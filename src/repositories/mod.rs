//! Storage ports over the SQLite pool. Every operation returns an explicit
//! [`RepositoryError`] instead of unwinding on expected outcomes.

use thiserror::Error;

pub mod category;
pub mod password_reset;
pub mod series;
pub mod user;

pub use category::CategoryRepository;
pub use password_reset::PasswordResetRepository;
pub use series::SeriesRepository;
pub use user::UserRepository;

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{entity} '{key}' not found")]
    NotFound { entity: &'static str, key: String },

    #[error("{entity} could not be saved: {reason}")]
    NotSaved { entity: &'static str, reason: String },

    #[error("{entity} could not be deleted: {reason}")]
    NotDeleted { entity: &'static str, reason: String },

    #[error("database query failed: {0}")]
    Query(#[from] sqlx::Error),
}

impl RepositoryError {
    pub(crate) fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub(crate) fn not_saved(entity: &'static str, reason: impl ToString) -> Self {
        let reason = reason.to_string();
        tracing::warn!(entity, %reason, "write rejected");
        Self::NotSaved { entity, reason }
    }

    pub(crate) fn not_deleted(entity: &'static str, reason: impl ToString) -> Self {
        let reason = reason.to_string();
        tracing::warn!(entity, %reason, "delete rejected");
        Self::NotDeleted { entity, reason }
    }
}
