//! API key store contract

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt::Debug;

use super::entity::{ApiKeyId, ApiKeyRecord, OwnerId};
use crate::domain::DomainError;

/// Outcome of a compare-and-set on `revoked_at`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasOutcome {
    /// The expected value matched and the new value was written
    Applied,
    /// The record changed concurrently; nothing was written
    Mismatch { current: Option<DateTime<Utc>> },
    /// No record matches `(owner, id)`
    Missing,
}

/// Persistence contract for API key records
///
/// Every lookup and write is scoped by owner and key id together, so a
/// tenant can never observe or touch another tenant's keys.
#[async_trait]
pub trait ApiKeyStore: Send + Sync + Debug {
    /// Persist a new record
    async fn insert(&self, record: ApiKeyRecord) -> Result<(), DomainError>;

    /// Fetch a record only if it belongs to `owner_id`
    async fn find_by_owner_and_id(
        &self,
        owner_id: &OwnerId,
        id: &ApiKeyId,
    ) -> Result<Option<ApiKeyRecord>, DomainError>;

    /// All records belonging to `owner_id`, revoked ones included
    async fn list_by_owner(&self, owner_id: &OwnerId) -> Result<Vec<ApiKeyRecord>, DomainError>;

    /// Write `new` to `revoked_at` only if it currently equals `expected`
    async fn compare_and_set_revoked_at(
        &self,
        owner_id: &OwnerId,
        id: &ApiKeyId,
        expected: Option<DateTime<Utc>>,
        new: Option<DateTime<Utc>>,
    ) -> Result<CasOutcome, DomainError>;
}
