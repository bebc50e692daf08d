use bcrypt::{hash, verify, DEFAULT_COST};
use thiserror::Error;

use crate::models::validation::is_strong_password;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password does not meet strength requirements")]
    TooWeak,
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

/// Hash a password after checking strength requirements (8+ characters with
/// upper, lower, digit, and special).
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    if !is_strong_password(password) {
        return Err(PasswordError::TooWeak);
    }
    Ok(hash(password, DEFAULT_COST)?)
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, PasswordError> {
    Ok(verify(password, password_hash)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("SecurePass123!").unwrap();
        assert!(verify_password("SecurePass123!", &hash).unwrap());
        assert!(!verify_password("WrongPass123!", &hash).unwrap());
    }

    #[test]
    fn test_weak_password_rejected() {
        assert!(matches!(
            hash_password("password"),
            Err(PasswordError::TooWeak)
        ));
    }
}
