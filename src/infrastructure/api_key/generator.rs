//! API key secret generation

use rand::RngCore;

use crate::domain::DomainError;

pub const DEFAULT_KEY_PREFIX: &str = "tc_live_";
pub const DEFAULT_KEY_BYTES: usize = 32;
pub const DEFAULT_DISPLAY_PREFIX_LEN: usize = 20;

/// Fewer random bytes than this is not a credential
const MIN_KEY_BYTES: usize = 16;

const ELLIPSIS: &str = "...";

/// Freshly generated secret, not yet hashed
#[derive(Debug)]
pub struct GeneratedSecret {
    /// The full plaintext key
    pub key: String,
    /// Leading characters plus an ellipsis, safe to store and show
    pub display_prefix: String,
}

/// Generator for recognizable random secrets
#[derive(Debug, Clone)]
pub struct SecretGenerator {
    /// Fixed prefix of every key, e.g. "tc_live_"
    prefix: String,
    /// Number of random bytes, hex-encoded after the prefix
    key_bytes: usize,
    /// Characters kept in the display prefix
    display_len: usize,
}

impl SecretGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            key_bytes: DEFAULT_KEY_BYTES,
            display_len: DEFAULT_DISPLAY_PREFIX_LEN,
        }
    }

    pub fn with_key_bytes(mut self, bytes: usize) -> Self {
        self.key_bytes = bytes;
        self
    }

    pub fn with_display_len(mut self, len: usize) -> Self {
        self.display_len = len;
        self
    }

    /// Reject settings that would leak or weaken the secret
    ///
    /// The display prefix must leave at least half of the random part hidden.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.key_bytes < MIN_KEY_BYTES {
            return Err(DomainError::configuration(format!(
                "API keys need at least {} random bytes",
                MIN_KEY_BYTES
            )));
        }

        let random_chars = self.key_bytes * 2;
        let revealed = self.display_len.saturating_sub(self.prefix.len());
        if revealed * 2 > random_chars {
            return Err(DomainError::configuration(
                "Display prefix reveals too much of the API key",
            ));
        }

        Ok(())
    }

    pub fn generate(&self) -> GeneratedSecret {
        let mut random_bytes = vec![0u8; self.key_bytes];
        rand::thread_rng().fill_bytes(&mut random_bytes);

        let key = format!("{}{}", self.prefix, hex::encode(&random_bytes));
        let display_prefix = self.display_prefix(&key);

        GeneratedSecret {
            key,
            display_prefix,
        }
    }

    /// Leading characters of `key` followed by an ellipsis
    pub fn display_prefix(&self, key: &str) -> String {
        let head: String = key.chars().take(self.display_len).collect();
        format!("{}{}", head, ELLIPSIS)
    }
}

impl Default for SecretGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_PREFIX)
    }
}
