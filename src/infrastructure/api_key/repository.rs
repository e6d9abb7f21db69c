//! In-memory API key store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::domain::api_key::{ApiKeyId, ApiKeyRecord, ApiKeyStore, CasOutcome, OwnerId};
use crate::domain::DomainError;

/// In-memory implementation of [`ApiKeyStore`]
///
/// Records are keyed by `(owner, id)`. A fault switch and an artificial
/// latency let tests exercise unavailable and slow stores.
#[derive(Debug, Default)]
pub struct InMemoryApiKeyStore {
    records: Arc<RwLock<HashMap<(OwnerId, ApiKeyId), ApiKeyRecord>>>,
    unavailable: AtomicBool,
    latency: Option<Duration>,
}

impl InMemoryApiKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every call by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make every subsequent call fail with `StoreUnavailable`
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Record a successful authentication with the key
    ///
    /// The authorization path that calls this lives outside this crate.
    pub async fn touch_last_used(
        &self,
        owner_id: &OwnerId,
        id: &ApiKeyId,
        at: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        self.enter().await?;

        let mut records = self.records.write().await;
        match records.get_mut(&(owner_id.clone(), *id)) {
            Some(record) => {
                record.record_usage(at);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Number of stored records, revoked ones included
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    async fn enter(&self) -> Result<(), DomainError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::store_unavailable(
                "In-memory store is switched off",
            ));
        }

        Ok(())
    }
}

#[async_trait]
impl ApiKeyStore for InMemoryApiKeyStore {
    async fn insert(&self, record: ApiKeyRecord) -> Result<(), DomainError> {
        self.enter().await?;

        let mut records = self.records.write().await;
        let key = (record.owner_id().clone(), *record.id());

        if records.contains_key(&key) {
            return Err(DomainError::conflict(format!(
                "API key with ID '{}' already exists",
                record.id()
            )));
        }

        records.insert(key, record);
        Ok(())
    }

    async fn find_by_owner_and_id(
        &self,
        owner_id: &OwnerId,
        id: &ApiKeyId,
    ) -> Result<Option<ApiKeyRecord>, DomainError> {
        self.enter().await?;

        let records = self.records.read().await;
        Ok(records.get(&(owner_id.clone(), *id)).cloned())
    }

    async fn list_by_owner(&self, owner_id: &OwnerId) -> Result<Vec<ApiKeyRecord>, DomainError> {
        self.enter().await?;

        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|record| record.is_owned_by(owner_id))
            .cloned()
            .collect())
    }

    async fn compare_and_set_revoked_at(
        &self,
        owner_id: &OwnerId,
        id: &ApiKeyId,
        expected: Option<DateTime<Utc>>,
        new: Option<DateTime<Utc>>,
    ) -> Result<CasOutcome, DomainError> {
        self.enter().await?;

        let mut records = self.records.write().await;
        let Some(record) = records.get_mut(&(owner_id.clone(), *id)) else {
            return Ok(CasOutcome::Missing);
        };

        if record.revoked_at() != expected {
            return Ok(CasOutcome::Mismatch {
                current: record.revoked_at(),
            });
        }

        record.set_revoked_at(new);
        Ok(CasOutcome::Applied)
    }
}
