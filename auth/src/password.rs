//! Password hashing.
//!
//! Hashes are Argon2id with a random salt, stored as PHC strings so the
//! parameters travel with the hash.

use crate::error::{AuthError, Result};
use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use std::sync::OnceLock;

/// Hash a password for storage.
///
/// # Errors
///
/// Returns `AuthError::InternalError` if hashing fails.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            tracing::error!(error = %e, "Password hashing failed");
            AuthError::InternalError
        })
}

/// Check `password` against a stored PHC hash.
///
/// # Errors
///
/// Returns `AuthError::InternalError` if the stored hash cannot be parsed.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| {
        tracing::error!(error = %e, "Stored password hash is malformed");
        AuthError::InternalError
    })?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Run [`hash_password`] on the blocking pool.
///
/// # Errors
///
/// Returns `AuthError::InternalError` if hashing fails or the task panics.
pub async fn hash_password_blocking(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|_| AuthError::InternalError)?
}

/// Run [`verify_password`] on the blocking pool.
///
/// # Errors
///
/// Returns `AuthError::InternalError` if the hash is malformed or the task panics.
pub async fn verify_password_blocking(password: String, stored_hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .map_err(|_| AuthError::InternalError)?
}

/// Burn one password verification without a stored hash.
///
/// Used when the account does not exist, so that the attempt costs the same
/// as a wrong password. The result is discarded.
pub async fn verify_unknown_user(password: String) {
    let outcome = tokio::task::spawn_blocking(move || {
        placeholder_hash().map(|hash| verify_password(&password, hash))
    })
    .await;
    if !matches!(outcome, Ok(Some(Ok(false)))) {
        tracing::warn!("Placeholder password verification did not run as expected");
    }
}

/// Hash of a throwaway password, made with the same parameters as real hashes.
fn placeholder_hash() -> Option<&'static str> {
    static PLACEHOLDER: OnceLock<Option<String>> = OnceLock::new();
    PLACEHOLDER
        .get_or_init(|| hash_password("placeholder password for unknown accounts").ok())
        .as_deref()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_only_the_original_password() {
        let hash = hash_password("p1").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("p1", &hash).unwrap());
        assert!(!verify_password("p2", &hash).unwrap());
    }

    #[test]
    fn same_password_gets_different_salts() {
        assert_ne!(hash_password("p1").unwrap(), hash_password("p1").unwrap());
    }

    #[test]
    fn placeholder_hash_uses_the_same_parameters_as_real_hashes() {
        let placeholder = PasswordHash::new(placeholder_hash().unwrap()).unwrap();
        let stored = hash_password("p1").unwrap();
        let real = PasswordHash::new(&stored).unwrap();

        assert_eq!(placeholder.algorithm, real.algorithm);
        assert_eq!(placeholder.version, real.version);
        assert_eq!(placeholder.params, real.params);
        assert!(!verify_password("p1", placeholder_hash().unwrap()).unwrap());
    }

    #[test]
    fn malformed_hash_is_an_internal_error() {
        assert_eq!(
            verify_password("p1", "not-a-phc-string"),
            Err(AuthError::InternalError)
        );
    }
}
