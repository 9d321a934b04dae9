//! Password hashing.
//!
//! New hashes are Argon2id PHC strings with a random salt. Records carried over
//! from the legacy store hold a bare hex SHA-256 digest of the password; those
//! still verify so that existing phone accounts can authenticate, and are
//! compared in constant time.
use anyhow::{anyhow, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use subtle::ConstantTimeEq;

use crate::hash::sha256_hex;

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow!("Password hashing failed: {e}"))
}

/// Returns true when `password` matches the stored hash.
///
/// An unparseable stored value never matches.
pub fn verify_password(password: &str, stored: &str) -> bool {
    if is_legacy_digest(stored) {
        let candidate = sha256_hex(password.as_bytes());
        let stored = stored.to_ascii_lowercase();
        return candidate.as_bytes().ct_eq(stored.as_bytes()).into();
    }

    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// 64 hex characters: an unsalted SHA-256 digest.
pub fn is_legacy_digest(stored: &str) -> bool {
    stored.len() == 64 && stored.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_legacy_digest_verifies() {
        let stored = sha256_hex(b"secret1");
        assert!(is_legacy_digest(&stored));
        assert!(verify_password("secret1", &stored));
        assert!(verify_password("secret1", &stored.to_ascii_uppercase()));
        assert!(!verify_password("secret2", &stored));
    }

    #[test]
    fn test_garbage_hash_never_matches() {
        assert!(!verify_password("anything", ""));
        assert!(!verify_password("anything", "not-a-hash"));
    }
}
