//! Password digests for protected links.
//!
//! Two stored formats exist: unsalted hex SHA-256 (what the first hashed
//! records used) and argon2 PHC strings. Verification recognises either,
//! whichever hasher is configured for new links.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordVerifier};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use subtle::ConstantTimeEq;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct HashError(String);

/// Produces the digest stored in `passwordHash`.
pub trait PasswordHasher: Send + Sync + 'static {
    fn hash(&self, plaintext: &str) -> Result<String, HashError>;
}

/// Unsalted SHA-256, hex encoded.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl PasswordHasher for Sha256Hasher {
    fn hash(&self, plaintext: &str) -> Result<String, HashError> {
        Ok(sha256_hex(plaintext))
    }
}

/// Argon2id with a random salt, encoded as a PHC string.
#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher {
    params: argon2::Params,
}

impl Argon2Hasher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(params: argon2::Params) -> Self {
        Self { params }
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> Result<String, HashError> {
        use argon2::PasswordHasher as _;

        let argon2 = Argon2::new(
            argon2::Algorithm::Argon2id,
            argon2::Version::V0x13,
            self.params.clone(),
        );
        let salt = SaltString::generate(&mut OsRng);
        argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| HashError(format!("argon2: {e}")))
    }
}

/// Which hasher new password-protected links use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HasherKind {
    #[default]
    Argon2,
    Sha256,
}

impl HasherKind {
    pub fn build(self) -> Arc<dyn PasswordHasher> {
        match self {
            HasherKind::Argon2 => Arc::new(Argon2Hasher::new()),
            HasherKind::Sha256 => Arc::new(Sha256Hasher),
        }
    }
}

/// Checks `candidate` against a stored digest of either supported format.
pub fn verify_hash(stored: &str, candidate: &str) -> bool {
    if stored.starts_with("$argon2") {
        return match PasswordHash::new(stored) {
            Ok(parsed) => Argon2::default()
                .verify_password(candidate.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        };
    }

    let digest = sha256_hex(candidate);
    digest
        .as_bytes()
        .ct_eq(stored.to_ascii_lowercase().as_bytes())
        .into()
}

/// Compares a legacy plaintext password without leaking its length.
pub fn verify_plaintext(stored: &str, candidate: &str) -> bool {
    let stored = Sha256::digest(stored.as_bytes());
    let candidate = Sha256::digest(candidate.as_bytes());
    stored.as_slice().ct_eq(candidate.as_slice()).into()
}

fn sha256_hex(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}

#[cfg(test)]
pub(crate) fn fast_argon2() -> Argon2Hasher {
    let params = argon2::Params::new(8, 1, 1, None).expect("valid argon2 params");
    Argon2Hasher::with_params(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_matches_known_digest() {
        // printf 'secret' | sha256sum
        assert_eq!(
            Sha256Hasher.hash("secret").unwrap(),
            "2bb80d537b1da3e38bd30361aa855686bde0eacd7162fef6a25fe97bf527a25b"
        );
    }

    #[test]
    fn sha256_verification() {
        let stored = Sha256Hasher.hash("secret").unwrap();
        assert!(verify_hash(&stored, "secret"));
        assert!(verify_hash(&stored.to_ascii_uppercase(), "secret"));
        assert!(!verify_hash(&stored, "Secret"));
        assert!(!verify_hash(&stored, ""));
    }

    #[test]
    fn argon2_verification() {
        let stored = fast_argon2().hash("secret").unwrap();
        assert!(stored.starts_with("$argon2id$"));
        assert!(verify_hash(&stored, "secret"));
        assert!(!verify_hash(&stored, "wrong"));
    }

    #[test]
    fn argon2_salts_differ() {
        let hasher = fast_argon2();
        assert_ne!(hasher.hash("secret").unwrap(), hasher.hash("secret").unwrap());
    }

    #[test]
    fn malformed_argon2_string_never_matches() {
        assert!(!verify_hash("$argon2id$garbage", "secret"));
    }

    #[test]
    fn plaintext_comparison() {
        assert!(verify_plaintext("secret", "secret"));
        assert!(!verify_plaintext("secret", "secre"));
        assert!(!verify_plaintext("secret", "secret "));
    }
}
