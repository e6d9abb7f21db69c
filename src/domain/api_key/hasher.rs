//! One-way hashing contract for API key secrets

use std::fmt::Debug;

use crate::domain::DomainError;

/// Hash primitive injected into the credential service
///
/// Digests must be one-way; nothing in this crate ever reverses them.
pub trait KeyHasher: Send + Sync + Debug {
    /// Hash a secret for storage
    fn hash(&self, secret: &str) -> Result<String, DomainError>;

    /// Check a secret against a stored digest
    fn verify(&self, secret: &str, digest: &str) -> bool;
}
