//! Password hashing.

use argon2::{
    Argon2,
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::rngs::OsRng;
use thiserror::Error;
use tokio::task::{self, JoinError};

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hash(password_hash::Error),

    #[error("password hashing task failed")]
    Task(#[source] JoinError),
}

/// Hash a password into an Argon2id PHC string.
///
/// Runs on the blocking pool; hashing is deliberately slow.
///
/// # Errors
///
/// Returns an error if hashing fails or the blocking task is cancelled.
pub async fn hash_password(password: String) -> Result<String, PasswordError> {
    task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(PasswordError::Hash)
    })
    .await
    .map_err(PasswordError::Task)?
}

/// Check a password against a stored PHC string.
///
/// # Errors
///
/// Returns an error if the stored hash cannot be parsed or the blocking task is cancelled. A
/// wrong password is `Ok(false)`.
pub async fn verify_password(password: String, password_hash: String) -> Result<bool, PasswordError> {
    task::spawn_blocking(move || {
        let parsed = PasswordHash::new(&password_hash).map_err(PasswordError::Hash)?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(error) => Err(PasswordError::Hash(error)),
        }
    })
    .await
    .map_err(PasswordError::Task)?
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[tokio::test]
    async fn hashed_password_verifies() -> TestResult {
        let hash = hash_password("hunter22".to_string()).await?;

        assert!(hash.starts_with("$argon2id$"), "expected an argon2id PHC string: {hash}");
        assert!(verify_password("hunter22".to_string(), hash.clone()).await?);
        assert!(!verify_password("hunter23".to_string(), hash).await?);

        Ok(())
    }

    #[tokio::test]
    async fn malformed_hash_is_an_error() {
        let result = verify_password("hunter22".to_string(), "not-a-hash".to_string()).await;

        assert!(matches!(result, Err(PasswordError::Hash(_))), "got {result:?}");
    }
}
