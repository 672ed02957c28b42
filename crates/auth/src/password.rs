//! Password hashing and validation.
//!
//! Hashing is CPU-bound, so both hash and verify run on tokio's blocking pool.

use thiserror::Error;

/// Bcrypt cost factor used when the caller does not pick one.
pub const BCRYPT_COST: u32 = bcrypt::DEFAULT_COST;

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Bcrypt only reads the first 72 bytes.
pub const MAX_PASSWORD_LENGTH: usize = 72;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("{0}")]
    Weak(String),
}

/// Hash a password with bcrypt (`cost` defaults to [`BCRYPT_COST`]).
pub async fn hash_password(password: &str, cost: Option<u32>) -> Result<String, PasswordError> {
    let password = password.to_string();
    let cost = cost.unwrap_or(BCRYPT_COST);

    tokio::task::spawn_blocking(move || {
        bcrypt::hash(password, cost).map_err(|e| PasswordError::Hashing(e.to_string()))
    })
    .await
    .map_err(|e| PasswordError::Hashing(format!("task join error: {e}")))?
}

/// Check a password against a stored bcrypt hash.
///
/// A malformed stored hash is an error, not a mismatch.
pub async fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let password = password.to_string();
    let hash = hash.to_string();

    tokio::task::spawn_blocking(move || {
        bcrypt::verify(password, &hash).map_err(|e| PasswordError::Hashing(e.to_string()))
    })
    .await
    .map_err(|e| PasswordError::Hashing(format!("task join error: {e}")))?
}

/// Length rules for new passwords.
pub fn validate_password(password: &str) -> Result<(), PasswordError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(PasswordError::Weak(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(PasswordError::Weak(format!(
            "password must be at most {MAX_PASSWORD_LENGTH} bytes"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_then_verify() {
        let hash = hash_password("admin123", Some(4)).await.unwrap();
        assert_ne!(hash, "admin123");
        assert!(verify_password("admin123", &hash).await.unwrap());
        assert!(!verify_password("admin124", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn malformed_hash_is_an_error() {
        assert!(verify_password("admin123", "not-a-bcrypt-hash").await.is_err());
    }

    #[test]
    fn length_rules() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("admin123").is_ok());
        assert!(validate_password(&"x".repeat(73)).is_err());
    }
}
