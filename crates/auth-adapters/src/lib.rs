//! # auth-adapters
//!
//! Argon2-based implementation of `CredentialHasher`, and the opaque
//! session-token source.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use domains::{CredentialHasher, DomainError, DomainResult, TokenSource};
use rand::RngCore;

/// Salted Argon2id password hashing.
#[derive(Default)]
pub struct Argon2Hasher;

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> DomainResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| DomainError::Storage(format!("password hashing failed: {err}")))
    }

    /// Verifies a password against a stored PHC-format hash. An unparseable
    /// stored hash counts as a mismatch.
    fn verify(&self, password: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(p) => p,
            Err(_) => return false,
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

/// Opaque bearer tokens: 128 bits of entropy, hex-encoded. No expiry; a
/// token stays valid until the next login overwrites it.
#[derive(Default)]
pub struct HexTokenSource;

impl TokenSource for HexTokenSource {
    fn issue(&self) -> String {
        let mut bytes = [0u8; 16];
        rand::rng().fill_bytes(&mut bytes);
        hex::encode(bytes)
    }
}
