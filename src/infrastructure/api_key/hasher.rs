//! Key hashers: fast SHA-256 and salted Argon2

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use sha2::{Digest, Sha256};

use crate::domain::api_key::KeyHasher;
use crate::domain::DomainError;

const SHA256_SCHEME: &str = "sha256$";

/// Unsalted SHA-256 digest, hex-encoded
///
/// Suitable for high-entropy generated secrets, where the digest doubles as
/// a lookup key.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256KeyHasher;

impl Sha256KeyHasher {
    pub fn new() -> Self {
        Self
    }

    fn digest(secret: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(secret.as_bytes());
        format!("{}{}", SHA256_SCHEME, hex::encode(hasher.finalize()))
    }
}

impl KeyHasher for Sha256KeyHasher {
    fn hash(&self, secret: &str) -> Result<String, DomainError> {
        Ok(Self::digest(secret))
    }

    fn verify(&self, secret: &str, digest: &str) -> bool {
        constant_time_compare(&Self::digest(secret), digest)
    }
}

/// Salted Argon2id digest in PHC string format
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2KeyHasher;

impl Argon2KeyHasher {
    pub fn new() -> Self {
        Self
    }
}

impl KeyHasher for Argon2KeyHasher {
    fn hash(&self, secret: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(secret.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DomainError::hashing(format!("Failed to hash API key: {}", e)))
    }

    fn verify(&self, secret: &str, digest: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(digest) else {
            return false;
        };

        Argon2::default()
            .verify_password(secret.as_bytes(), &parsed)
            .is_ok()
    }
}

/// Constant-time string comparison to prevent timing attacks
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "tc_live_0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

    #[test]
    fn test_sha256_hash_and_verify() {
        let hasher = Sha256KeyHasher::new();
        let digest = hasher.hash(SECRET).unwrap();

        assert!(digest.starts_with("sha256$"));
        assert_eq!(digest.len(), 7 + 64);
        assert!(!digest.contains(SECRET));
        assert!(hasher.verify(SECRET, &digest));
        assert!(!hasher.verify("tc_live_wrong", &digest));
    }

    #[test]
    fn test_sha256_is_deterministic() {
        let hasher = Sha256KeyHasher::new();
        assert_eq!(hasher.hash(SECRET).unwrap(), hasher.hash(SECRET).unwrap());
    }

    #[test]
    fn test_argon2_hash_and_verify() {
        let hasher = Argon2KeyHasher::new();

        let first = hasher.hash(SECRET).unwrap();
        let second = hasher.hash(SECRET).unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify(SECRET, &first));
        assert!(hasher.verify(SECRET, &second));
        assert!(!hasher.verify("tc_live_wrong", &first));
    }

    #[test]
    fn test_argon2_rejects_malformed_digest() {
        let hasher = Argon2KeyHasher::new();

        assert!(!hasher.verify(SECRET, "not-a-phc-string"));
        assert!(!hasher.verify(SECRET, ""));
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("hello", "hello"));
        assert!(!constant_time_compare("hello", "world"));
        assert!(!constant_time_compare("hello", "hell"));
    }
}
