//! API key infrastructure implementations
//!
//! Secret generation, hashing, an in-memory store, and the lifecycle
//! service built on top of them.

mod generator;
mod hasher;
mod repository;
mod service;

pub use generator::{
    GeneratedSecret, SecretGenerator, DEFAULT_DISPLAY_PREFIX_LEN, DEFAULT_KEY_BYTES,
    DEFAULT_KEY_PREFIX,
};
pub use hasher::{Argon2KeyHasher, Sha256KeyHasher};
pub use repository::InMemoryApiKeyStore;
pub use service::{
    ApiKeyService, DEFAULT_RESTORE_WINDOW, DEFAULT_STORE_TIMEOUT, MAX_RESTORE_WINDOW,
};
