use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("failed to hash password: {0}")]
pub struct PasswordHashError(String);

/// Registered forum member, identified by e-mail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    /// Argon2id PHC string; never the plaintext
    #[serde(skip_serializing)]
    pub password: String,
}

impl User {
    /// Unsaved user with an already hashed password.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        plain_password: &str,
    ) -> Result<Self, PasswordHashError> {
        let mut user = Self {
            id: None,
            name: name.into(),
            email: email.into(),
            password: String::new(),
        };
        user.set_new_password(plain_password)?;
        Ok(user)
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Replace the stored credential with an Argon2id hash of `plain`.
    pub fn set_new_password(&mut self, plain: &str) -> Result<(), PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|err| PasswordHashError(err.to_string()))?;
        self.password = hash.to_string();
        Ok(())
    }

    /// `false` for a wrong password and for an unreadable stored hash.
    pub fn verify_password(&self, plain: &str) -> bool {
        PasswordHash::new(&self.password)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(plain.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_password_is_hashed_and_verifiable() {
        let mut user = User::new("Mario", "mario@example.com", "vecchia-password").unwrap();
        assert!(user.password.starts_with("$argon2id$"));
        assert!(user.verify_password("vecchia-password"));

        user.set_new_password("nuova-password").unwrap();
        assert!(user.verify_password("nuova-password"));
        assert!(!user.verify_password("vecchia-password"));
    }

    #[test]
    fn password_is_never_serialized() {
        let user = User::new("Mario", "mario@example.com", "segreta").unwrap();
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["email"], "mario@example.com");
    }
}
