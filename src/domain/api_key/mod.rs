//! API Key domain
//!
//! This module provides domain types and collaborator contracts for the
//! API key lifecycle: issue, list, revoke and time-boxed restore.

mod entity;
mod hasher;
mod repository;
mod validation;

pub use entity::{
    ApiKeyId, ApiKeyRecord, ApiKeySecret, ApiKeySummary, IssuedApiKey, KeyState, OwnerId,
    RevokedApiKey, KEY_NOT_FOUND,
};
pub use hasher::KeyHasher;
pub use repository::{ApiKeyStore, CasOutcome};
pub use validation::{validate_api_key_name, ApiKeyNameError};
