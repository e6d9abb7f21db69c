//! API key lifecycle service
//!
//! Issues, lists, revokes and restores keys for an owner:
//!
//! ```text
//! ACTIVE --revoke--> REVOKED(t) --restore, now - t <= W--> ACTIVE
//!                    REVOKED(t) --now - t > W-----------> REVOKED_FINAL
//! ```
//!
//! Revoke and restore write through a compare-and-set on `revoked_at`, so a
//! concurrent revoke and restore on the same record cannot both win.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::CredentialSettings;
use crate::domain::api_key::{
    validate_api_key_name, ApiKeyId, ApiKeyRecord, ApiKeySecret, ApiKeyStore, ApiKeySummary,
    CasOutcome, IssuedApiKey, KeyHasher, KeyState, OwnerId, RevokedApiKey, KEY_NOT_FOUND,
};
use crate::domain::{Clock, DomainError, SystemClock};

use super::generator::SecretGenerator;

pub const DEFAULT_RESTORE_WINDOW: Duration = Duration::from_secs(10);
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Fresh reads attempted by `restore` before giving up on a contended record
const MAX_CAS_ATTEMPTS: usize = 3;

/// Longest accepted restore window
pub const MAX_RESTORE_WINDOW: Duration = Duration::from_secs(3600);

/// API key service
#[derive(Debug)]
pub struct ApiKeyService {
    store: Arc<dyn ApiKeyStore>,
    hasher: Arc<dyn KeyHasher>,
    clock: Arc<dyn Clock>,
    generator: SecretGenerator,
    restore_window: Duration,
    store_timeout: Duration,
}

impl ApiKeyService {
    /// Create a service with default generator, window and timeout
    pub fn new(store: Arc<dyn ApiKeyStore>, hasher: Arc<dyn KeyHasher>) -> Self {
        Self {
            store,
            hasher,
            clock: Arc::new(SystemClock),
            generator: SecretGenerator::default(),
            restore_window: DEFAULT_RESTORE_WINDOW,
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    /// Create a service from the `credentials` config section
    pub fn from_settings(
        store: Arc<dyn ApiKeyStore>,
        hasher: Arc<dyn KeyHasher>,
        settings: &CredentialSettings,
    ) -> Result<Self, DomainError> {
        let generator = SecretGenerator::new(&settings.key_prefix)
            .with_key_bytes(settings.key_bytes)
            .with_display_len(settings.display_prefix_len);
        generator.validate()?;

        if settings.store_timeout_ms == 0 {
            return Err(DomainError::configuration(
                "credentials.store_timeout_ms must be positive",
            ));
        }

        let restore_window = Duration::from_secs(settings.restore_window_secs);
        if restore_window > MAX_RESTORE_WINDOW {
            return Err(DomainError::configuration(format!(
                "credentials.restore_window_secs must not exceed {}",
                MAX_RESTORE_WINDOW.as_secs()
            )));
        }

        Ok(Self::new(store, hasher)
            .with_generator(generator)
            .with_restore_window(restore_window)
            .with_store_timeout(Duration::from_millis(settings.store_timeout_ms)))
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_generator(mut self, generator: SecretGenerator) -> Self {
        self.generator = generator;
        self
    }

    pub fn with_restore_window(mut self, window: Duration) -> Self {
        self.restore_window = window;
        self
    }

    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    pub fn restore_window(&self) -> Duration {
        self.restore_window
    }

    /// Issue a new unnamed key
    ///
    /// The returned secret is the only copy of the plaintext; it cannot be
    /// recovered through any other operation.
    pub async fn generate(&self, owner_id: &OwnerId) -> Result<IssuedApiKey, DomainError> {
        self.issue(owner_id, None).await
    }

    /// Issue a new key with a display name
    pub async fn generate_named(
        &self,
        owner_id: &OwnerId,
        name: &str,
    ) -> Result<IssuedApiKey, DomainError> {
        let name =
            validate_api_key_name(name).map_err(|e| DomainError::validation(e.to_string()))?;
        self.issue(owner_id, Some(name)).await
    }

    /// Active keys of `owner_id`, newest first
    pub async fn list(&self, owner_id: &OwnerId) -> Result<Vec<ApiKeySummary>, DomainError> {
        let mut records = self
            .within_deadline(self.store.list_by_owner(owner_id))
            .await?;

        records.retain(|record| record.is_active());
        records.sort_by(|a, b| b.created_at().cmp(&a.created_at()));

        debug!(owner_id = %owner_id, count = records.len(), "Listed API keys");

        Ok(records.iter().map(ApiKeySummary::from).collect())
    }

    /// Revoke a key; revoking an already revoked key succeeds unchanged
    pub async fn revoke(
        &self,
        owner_id: &OwnerId,
        id: &ApiKeyId,
    ) -> Result<RevokedApiKey, DomainError> {
        let record = self.find_owned(owner_id, id).await?;

        if let Some(revoked_at) = record.revoked_at() {
            debug!(owner_id = %owner_id, key_id = %id, "API key already revoked");
            return Ok(self.revoked(id, revoked_at));
        }

        let now = self.clock.now();
        let outcome = self
            .within_deadline(
                self.store
                    .compare_and_set_revoked_at(owner_id, id, None, Some(now)),
            )
            .await?;

        match outcome {
            CasOutcome::Applied => {
                info!(owner_id = %owner_id, key_id = %id, "API key revoked");
                Ok(self.revoked(id, now))
            }
            CasOutcome::Mismatch {
                current: Some(revoked_at),
            } => {
                debug!(owner_id = %owner_id, key_id = %id, "API key revoked concurrently");
                Ok(self.revoked(id, revoked_at))
            }
            CasOutcome::Mismatch { current: None } => Err(DomainError::conflict(
                "API key changed while revoking, try again",
            )),
            CasOutcome::Missing => Err(DomainError::not_found(KEY_NOT_FOUND)),
        }
    }

    /// Undo a revocation made less than the restore window ago
    pub async fn restore(
        &self,
        owner_id: &OwnerId,
        id: &ApiKeyId,
    ) -> Result<ApiKeySummary, DomainError> {
        for attempt in 1..=MAX_CAS_ATTEMPTS {
            let record = self.find_owned(owner_id, id).await?;
            let now = self.clock.now();

            let revoked_at = match record.state(now, self.chrono_window()) {
                KeyState::Active => return Err(DomainError::NotRevoked),
                KeyState::RevokedFinal { at } => {
                    warn!(
                        owner_id = %owner_id,
                        key_id = %id,
                        revoked_at = %at,
                        "Restore rejected: window expired"
                    );
                    return Err(DomainError::window_expired(self.restore_window));
                }
                KeyState::Revoked { at } => at,
            };

            let outcome = self
                .within_deadline(self.store.compare_and_set_revoked_at(
                    owner_id,
                    id,
                    Some(revoked_at),
                    None,
                ))
                .await?;

            match outcome {
                CasOutcome::Applied => {
                    info!(owner_id = %owner_id, key_id = %id, "API key restored");
                    let mut restored = record;
                    restored.set_revoked_at(None);
                    return Ok(ApiKeySummary::from(&restored));
                }
                CasOutcome::Mismatch { .. } => {
                    debug!(owner_id = %owner_id, key_id = %id, attempt, "Restore lost a race, re-reading");
                }
                CasOutcome::Missing => return Err(DomainError::not_found(KEY_NOT_FOUND)),
            }
        }

        warn!(owner_id = %owner_id, key_id = %id, "Restore gave up after repeated conflicts");
        Err(DomainError::conflict(
            "API key is being modified concurrently, try again",
        ))
    }

    /// Current lifecycle state of an owned key
    pub async fn state(&self, owner_id: &OwnerId, id: &ApiKeyId) -> Result<KeyState, DomainError> {
        let record = self.find_owned(owner_id, id).await?;
        Ok(record.state(self.clock.now(), self.chrono_window()))
    }

    async fn issue(
        &self,
        owner_id: &OwnerId,
        name: Option<String>,
    ) -> Result<IssuedApiKey, DomainError> {
        let generated = self.generator.generate();
        let key_hash = self.hasher.hash(&generated.key)?;

        let mut record = ApiKeyRecord::new(
            owner_id.clone(),
            key_hash,
            generated.display_prefix,
            self.clock.now(),
        );
        if let Some(name) = name {
            record = record.with_name(name);
        }

        let summary = ApiKeySummary::from(&record);
        self.within_deadline(self.store.insert(record)).await?;

        info!(owner_id = %owner_id, key_id = %summary.id, "API key issued");

        Ok(IssuedApiKey {
            summary,
            secret: ApiKeySecret::new(generated.key),
        })
    }

    async fn find_owned(
        &self,
        owner_id: &OwnerId,
        id: &ApiKeyId,
    ) -> Result<ApiKeyRecord, DomainError> {
        self.within_deadline(self.store.find_by_owner_and_id(owner_id, id))
            .await?
            .filter(|record| record.is_owned_by(owner_id))
            .ok_or_else(|| DomainError::not_found(KEY_NOT_FOUND))
    }

    fn revoked(&self, id: &ApiKeyId, revoked_at: chrono::DateTime<chrono::Utc>) -> RevokedApiKey {
        RevokedApiKey {
            id: *id,
            revoked_at,
            restorable_until: revoked_at
                .checked_add_signed(self.chrono_window())
                .unwrap_or(chrono::DateTime::<chrono::Utc>::MAX_UTC),
        }
    }

    fn chrono_window(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(
            i64::try_from(self.restore_window.as_millis()).unwrap_or(i64::MAX),
        )
    }

    async fn within_deadline<T>(
        &self,
        call: impl Future<Output = Result<T, DomainError>>,
    ) -> Result<T, DomainError> {
        match tokio::time::timeout(self.store_timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(timeout_ms = self.store_timeout.as_millis() as u64, "API key store call timed out");
                Err(DomainError::store_timeout(self.store_timeout))
            }
        }
    }
}
