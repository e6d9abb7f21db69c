use std::time::Duration;

use thiserror::Error;

/// Core domain errors
///
/// Field and form validation never produce these; they report problems
/// through [`ValidationResult`](crate::domain::validation::ValidationResult).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Unknown validation schema: {name}")]
    UnknownSchema { name: String },

    #[error("Rate limited: retry after {}s", retry_after.as_secs())]
    RateLimited { retry_after: Duration },

    #[error("API key is not revoked")]
    NotRevoked,

    #[error("Restore window expired: keys can only be restored within {}s of revocation", window.as_secs())]
    WindowExpired { window: Duration },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Store unavailable: {message}")]
    StoreUnavailable { message: String },

    #[error("Store timed out after {}ms", timeout.as_millis())]
    StoreTimeout { timeout: Duration },

    #[error("Hashing error: {message}")]
    Hashing { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn unknown_schema(name: impl Into<String>) -> Self {
        Self::UnknownSchema { name: name.into() }
    }

    pub fn rate_limited(retry_after: Duration) -> Self {
        Self::RateLimited { retry_after }
    }

    pub fn window_expired(window: Duration) -> Self {
        Self::WindowExpired { window }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
        }
    }

    pub fn store_timeout(timeout: Duration) -> Self {
        Self::StoreTimeout { timeout }
    }

    pub fn hashing(message: impl Into<String>) -> Self {
        Self::Hashing {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Whether the caller may retry the same operation with backoff
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::StoreUnavailable { .. } | Self::StoreTimeout { .. } | Self::Conflict { .. }
        )
    }
}
