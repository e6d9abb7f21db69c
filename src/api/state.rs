//! Shared state handed to request handlers

use std::sync::Arc;

use crate::config::AppConfig;
use crate::domain::api_key::{ApiKeyStore, KeyHasher};
use crate::domain::security::OriginPolicy;
use crate::domain::{Clock, DomainError, SystemClock};
use crate::infrastructure::api_key::ApiKeyService;
use crate::infrastructure::rate_limit::RateLimiters;

use super::form_guard::FormSubmissionGuard;
use super::middleware::SecurityHeaders;

/// Application state, wired from configuration
#[derive(Debug, Clone)]
pub struct AppState {
    pub rate_limiters: Arc<RateLimiters>,
    pub form_guard: FormSubmissionGuard,
    pub api_keys: Arc<ApiKeyService>,
    pub origin_policy: Arc<OriginPolicy>,
    pub security_headers: SecurityHeaders,
}

impl AppState {
    /// Wire every component on the system clock
    pub fn from_config(
        config: &AppConfig,
        store: Arc<dyn ApiKeyStore>,
        hasher: Arc<dyn KeyHasher>,
    ) -> Result<Self, DomainError> {
        Self::with_clock(config, store, hasher, Arc::new(SystemClock))
    }

    /// Wire every component with an injected clock
    pub fn with_clock(
        config: &AppConfig,
        store: Arc<dyn ApiKeyStore>,
        hasher: Arc<dyn KeyHasher>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, DomainError> {
        let rate_limiters = Arc::new(RateLimiters::with_clock(&config.rate_limits, clock.clone())?);
        let form_guard = FormSubmissionGuard::new(rate_limiters.clone()).with_locale(config.locale);
        let api_keys = ApiKeyService::from_settings(store, hasher, &config.credentials)?
            .with_clock(clock);

        Ok(Self {
            rate_limiters,
            form_guard,
            api_keys: Arc::new(api_keys),
            origin_policy: Arc::new(config.security.origin_policy()?),
            security_headers: SecurityHeaders::new(&config.security.header_options())?,
        })
    }
}
