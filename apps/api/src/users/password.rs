use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use tracing::error;

use crate::errors::AppError;

/// Hashes a plain-text password with Argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    if password.is_empty() {
        return Err(AppError::Validation("Password cannot be empty".to_string()));
    }

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!(error = %e, "Argon2 password hashing failed");
            AppError::Internal(anyhow::anyhow!("Password hashing failed: {e}"))
        })
}

/// Returns `Ok(false)` on a mismatch; errors only when the stored hash is unusable.
pub fn verify_password(stored_hash: &str, provided: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| {
        error!(error = %e, "Stored password hash could not be parsed");
        AppError::Internal(anyhow::anyhow!("Invalid stored password hash: {e}"))
    })?;

    match Argon2::default().verify_password(provided.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AppError::Internal(anyhow::anyhow!(
            "Password verification failed: {e}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("Secr3tPass").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password(&hash, "Secr3tPass").unwrap());
        assert!(!verify_password(&hash, "secr3tpass").unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("Secr3tPass").unwrap();
        let b = hash_password("Secr3tPass").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_empty_password_rejected() {
        assert!(matches!(hash_password(""), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_garbage_hash_is_internal_error() {
        assert!(matches!(
            verify_password("not-a-hash", "whatever"),
            Err(AppError::Internal(_))
        ));
    }
}
