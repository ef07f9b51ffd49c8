//! Password hashing with Argon2id, stored in PHC string format.

use std::fmt;
use std::sync::OnceLock;

use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use password_hash::{PasswordHash, SaltString};

use crate::secret::Secret;

/// Error raised while hashing a password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordError {
    message: String,
}

impl PasswordError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for PasswordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "password hashing failed: {}", self.message)
    }
}

impl std::error::Error for PasswordError {}

/// Hashes `password` with a fresh random salt.
///
/// # Errors
///
/// Returns `PasswordError` if the OS random source or the hasher fails.
pub fn hash_password(password: &Secret<String>) -> Result<String, PasswordError> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes).map_err(|e| PasswordError::new(e.to_string()))?;
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| PasswordError::new(e.to_string()))?;
    let phc = Argon2::default()
        .hash_password(password.expose_secret().as_bytes(), &salt)
        .map_err(|e| PasswordError::new(e.to_string()))?
        .to_string();
    Ok(phc)
}

/// Checks `password` against a stored PHC hash.
///
/// An unparseable hash never matches.
pub fn verify_password(hash: &str, password: &Secret<String>) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => {
            #[cfg(test)]
            counter::bump();
            Argon2::default()
                .verify_password(password.expose_secret().as_bytes(), &parsed)
                .is_ok()
        }
        Err(_) => false,
    }
}

/// Checks a login attempt against the stored hash of the named user, if any.
///
/// When there is no such user the password is still run through Argon2
/// against a throwaway hash, so both failures cost the same.
pub fn verify_login(stored_hash: Option<&str>, password: &Secret<String>) -> bool {
    match stored_hash {
        Some(hash) => verify_password(hash, password),
        None => {
            if let Some(dummy) = dummy_hash() {
                let _ = verify_password(dummy, password);
            }
            false
        }
    }
}

/// A throwaway hash, computed once per process with the same parameters as
/// [`hash_password`]. Matching it never logs anyone in.
fn dummy_hash() -> Option<&'static str> {
    static DUMMY: OnceLock<Option<String>> = OnceLock::new();
    DUMMY
        .get_or_init(|| hash_password(&Secret::new("no such user".to_string())).ok())
        .as_deref()
}
