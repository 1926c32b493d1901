//! Argon2id password hashing.
//!
//! Hashes are stored as PHC strings, which carry the algorithm
//! parameters and the salt alongside the digest.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use crate::error::GameError;

/// Hashes `password` under a fresh random salt.
///
/// # Errors
///
/// [`GameError::Internal`] if the hasher rejects its inputs.
pub fn hash_password(password: &str) -> Result<String, GameError> {
    let salt = SaltString::encode_b64(&rand::random::<[u8; 16]>())
        .map_err(|e| GameError::Internal(format!("password salt: {e}")))?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| GameError::Internal(format!("password hash: {e}")))
}

/// Checks `password` against a stored PHC string.
///
/// Unparseable hashes never verify.
#[must_use]
pub fn verify_password(password: &str, phc: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(phc) else {
        tracing::warn!("stored password hash is not a valid PHC string");
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn correct_password_verifies() {
        let Ok(stored) = hash_password("hunter22") else {
            panic!("hash failed");
        };
        assert!(stored.starts_with("$argon2id$"));
        assert!(verify_password("hunter22", &stored));
        assert!(!verify_password("hunter23", &stored));
    }

    #[test]
    fn salts_differ_per_hash() {
        let (Ok(a), Ok(b)) = (hash_password("same"), hash_password("same")) else {
            panic!("hash failed");
        };
        assert_ne!(a, b);
        assert!(verify_password("same", &a));
        assert!(verify_password("same", &b));
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify_password("anything", ""));
        assert!(!verify_password("anything", "not-a-phc-string"));
    }
}
