//! API key entity and related types

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;

const MAX_OWNER_ID_LENGTH: usize = 255;

/// Owner-facing message for missing keys and keys owned by someone else
pub const KEY_NOT_FOUND: &str = "API key not found or access denied";

/// Verified identity of the tenant that owns a key
///
/// Supplied by the external authentication layer; this crate never checks
/// tokens itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OwnerId(String);

impl OwnerId {
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        let trimmed = id.trim();

        if trimmed.is_empty() {
            return Err(DomainError::validation("Owner ID cannot be empty"));
        }

        if trimmed.len() > MAX_OWNER_ID_LENGTH {
            return Err(DomainError::validation(format!(
                "Owner ID exceeds maximum length of {} characters",
                MAX_OWNER_ID_LENGTH
            )));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for OwnerId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OwnerId> for String {
    fn from(id: OwnerId) -> Self {
        id.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// API key identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiKeyId(Uuid);

impl ApiKeyId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ApiKeyId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for ApiKeyId {
    type Err = DomainError;

    /// Malformed ids are reported as not found, like ids owned by someone else
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| DomainError::not_found(KEY_NOT_FOUND))
    }
}

impl fmt::Display for ApiKeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Plaintext key, handed to the caller once at creation
///
/// Deliberately not `Clone`, `Serialize` or `Display`; `Debug` is redacted.
pub struct ApiKeySecret(String);

impl ApiKeySecret {
    pub(crate) fn new(secret: String) -> Self {
        Self(secret)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for ApiKeySecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKeySecret(<redacted>)")
    }
}

/// Lifecycle state of a key at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    /// Usable
    Active,
    /// Revoked, still restorable
    Revoked { at: DateTime<Utc> },
    /// Revoked beyond the restore window; terminal
    RevokedFinal { at: DateTime<Utc> },
}

impl KeyState {
    pub fn is_usable(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Persisted API key record
///
/// Records are soft-deleted through `revoked_at` and never removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKeyRecord {
    id: ApiKeyId,
    owner_id: OwnerId,
    /// One-way digest produced by the configured `KeyHasher`
    key_hash: String,
    /// Leading characters of the secret followed by an ellipsis
    key_prefix_display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    created_at: DateTime<Utc>,
    revoked_at: Option<DateTime<Utc>>,
    last_used_at: Option<DateTime<Utc>>,
}

impl ApiKeyRecord {
    pub fn new(
        owner_id: OwnerId,
        key_hash: impl Into<String>,
        key_prefix_display: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ApiKeyId::new(),
            owner_id,
            key_hash: key_hash.into(),
            key_prefix_display: key_prefix_display.into(),
            name: None,
            created_at,
            revoked_at: None,
            last_used_at: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    // Getters

    pub fn id(&self) -> &ApiKeyId {
        &self.id
    }

    pub fn owner_id(&self) -> &OwnerId {
        &self.owner_id
    }

    pub fn key_hash(&self) -> &str {
        &self.key_hash
    }

    pub fn key_prefix_display(&self) -> &str {
        &self.key_prefix_display
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn revoked_at(&self) -> Option<DateTime<Utc>> {
        self.revoked_at
    }

    pub fn last_used_at(&self) -> Option<DateTime<Utc>> {
        self.last_used_at
    }

    pub fn is_owned_by(&self, owner_id: &OwnerId) -> bool {
        &self.owner_id == owner_id
    }

    pub fn is_active(&self) -> bool {
        self.revoked_at.is_none()
    }

    /// State at `now` given the restore window
    pub fn state(&self, now: DateTime<Utc>, restore_window: Duration) -> KeyState {
        match self.revoked_at {
            None => KeyState::Active,
            Some(at) if now - at <= restore_window => KeyState::Revoked { at },
            Some(at) => KeyState::RevokedFinal { at },
        }
    }

    // Mutations, applied by stores

    pub fn set_revoked_at(&mut self, revoked_at: Option<DateTime<Utc>>) {
        self.revoked_at = revoked_at;
    }

    pub fn record_usage(&mut self, at: DateTime<Utc>) {
        self.last_used_at = Some(at);
    }
}

/// What key listings expose; never carries the hash or the secret
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiKeySummary {
    pub id: ApiKeyId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub key_prefix_display: String,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
}

impl From<&ApiKeyRecord> for ApiKeySummary {
    fn from(record: &ApiKeyRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            key_prefix_display: record.key_prefix_display.clone(),
            created_at: record.created_at,
            last_used_at: record.last_used_at,
        }
    }
}

/// Result of issuing a key: the only place the plaintext ever appears
#[derive(Debug)]
pub struct IssuedApiKey {
    pub summary: ApiKeySummary,
    pub secret: ApiKeySecret,
}

/// Result of revoking a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RevokedApiKey {
    pub id: ApiKeyId,
    pub revoked_at: DateTime<Utc>,
    /// Last instant at which `restore` still succeeds
    pub restorable_until: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> OwnerId {
        OwnerId::new("user_123").unwrap()
    }

    #[test]
    fn test_owner_id_validation() {
        assert_eq!(OwnerId::new("  user_1 ").unwrap().as_str(), "user_1");
        assert!(OwnerId::new("").is_err());
        assert!(OwnerId::new("   ").is_err());
        assert!(OwnerId::new("x".repeat(256)).is_err());
    }

    #[test]
    fn test_api_key_id_parse() {
        let id = ApiKeyId::new();
        assert_eq!(id.to_string().parse::<ApiKeyId>().unwrap(), id);

        let err = "not-a-uuid".parse::<ApiKeyId>().unwrap_err();
        assert_eq!(err, DomainError::not_found(KEY_NOT_FOUND));
        assert_eq!(err.to_string(), format!("Not found: {}", KEY_NOT_FOUND));
    }

    #[test]
    fn test_secret_debug_is_redacted() {
        let secret = ApiKeySecret::new("tc_live_abcdef".to_string());
        let debug = format!("{:?}", secret);

        assert!(!debug.contains("abcdef"));
        assert_eq!(secret.expose(), "tc_live_abcdef");
    }

    #[test]
    fn test_state_transitions_over_time() {
        let created = Utc::now();
        let window = Duration::seconds(10);
        let mut record = ApiKeyRecord::new(owner(), "hash", "tc_live_abc...", created);

        assert_eq!(record.state(created, window), KeyState::Active);

        let revoked_at = created + Duration::seconds(1);
        record.set_revoked_at(Some(revoked_at));

        assert_eq!(
            record.state(revoked_at + Duration::seconds(10), window),
            KeyState::Revoked { at: revoked_at }
        );
        assert_eq!(
            record.state(revoked_at + Duration::milliseconds(10_001), window),
            KeyState::RevokedFinal { at: revoked_at }
        );
    }

    #[test]
    fn test_summary_hides_hash() {
        let record = ApiKeyRecord::new(owner(), "argon2-digest", "tc_live_abc...", Utc::now())
            .with_name("CI");
        let summary = ApiKeySummary::from(&record);

        let json = serde_json::to_string(&summary).unwrap();
        assert!(!json.contains("argon2-digest"));
        assert!(!json.contains("owner"));
        assert!(json.contains("tc_live_abc..."));
        assert!(json.contains("\"name\":\"CI\""));
    }

    #[test]
    fn test_ownership() {
        let record = ApiKeyRecord::new(owner(), "h", "p", Utc::now());
        assert!(record.is_owned_by(&owner()));
        assert!(!record.is_owned_by(&OwnerId::new("someone_else").unwrap()));
    }
}
