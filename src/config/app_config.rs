use serde::Deserialize;

use crate::domain::security::{OriginPolicy, SecurityHeaderOptions, DEFAULT_ALLOWED_ORIGINS};
use crate::domain::validation::Locale;
use crate::domain::{DomainError, RateLimitConfig, RouteClass};
use crate::infrastructure::api_key::{
    DEFAULT_DISPLAY_PREFIX_LEN, DEFAULT_KEY_BYTES, DEFAULT_KEY_PREFIX,
};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    /// Locale for validation messages when a caller does not pick one
    pub locale: Locale,
    pub rate_limits: RateLimitSettings,
    pub credentials: CredentialSettings,
    pub security: SecuritySettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Per-route fixed-window budgets
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RateLimitSettings {
    pub contact: RateLimitConfig,
    pub demo: RateLimitConfig,
    pub chat: RateLimitConfig,
    pub vision: RateLimitConfig,
}

impl RateLimitSettings {
    pub fn for_route(&self, route: RouteClass) -> RateLimitConfig {
        match route {
            RouteClass::Contact => self.contact,
            RouteClass::Demo => self.demo,
            RouteClass::Chat => self.chat,
            RouteClass::Vision => self.vision,
        }
    }
}

/// API key issuance and lifecycle settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CredentialSettings {
    pub key_prefix: String,
    pub key_bytes: usize,
    pub display_prefix_len: usize,
    /// How long after revocation a key can still be restored
    pub restore_window_secs: u64,
    pub store_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SecuritySettings {
    pub allowed_origins: Vec<String>,
    pub strict_csp: bool,
    pub include_hsts: bool,
    pub report_uri: Option<String>,
}

impl SecuritySettings {
    pub fn origin_policy(&self) -> Result<OriginPolicy, DomainError> {
        OriginPolicy::new(&self.allowed_origins)
    }

    pub fn header_options(&self) -> SecurityHeaderOptions {
        SecurityHeaderOptions {
            strict_csp: self.strict_csp,
            include_hsts: self.include_hsts,
            report_uri: self.report_uri.clone(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            contact: RouteClass::Contact.default_limit(),
            demo: RouteClass::Demo.default_limit(),
            chat: RouteClass::Chat.default_limit(),
            vision: RouteClass::Vision.default_limit(),
        }
    }
}

impl Default for CredentialSettings {
    fn default() -> Self {
        Self {
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            key_bytes: DEFAULT_KEY_BYTES,
            display_prefix_len: DEFAULT_DISPLAY_PREFIX_LEN,
            restore_window_secs: 10,
            store_timeout_ms: 5000,
        }
    }
}

impl Default for SecuritySettings {
    fn default() -> Self {
        Self {
            allowed_origins: DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
            strict_csp: false,
            include_hsts: true,
            report_uri: None,
        }
    }
}

impl AppConfig {
    /// Load from `config/default`, `config/local` and `APP__*` variables
    ///
    /// A `.env` file, if present, is read into the environment first.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("security.allowed_origins"),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.locale, Locale::En);
        assert_eq!(config.rate_limits.for_route(RouteClass::Demo).max_requests, 3);
        assert_eq!(config.credentials.key_prefix, "tc_live_");
        assert_eq!(config.credentials.restore_window_secs, 10);
        assert!(config.security.origin_policy().is_ok());
        assert!(config.security.header_options().include_hsts);
    }

    #[test]
    fn test_partial_sources_keep_defaults() {
        let config: AppConfig = config::Config::builder()
            .set_override("rate_limits.chat.max_requests", 50)
            .unwrap()
            .set_override("rate_limits.chat.window_ms", 30_000)
            .unwrap()
            .set_override("credentials.restore_window_secs", 30)
            .unwrap()
            .set_override("locale", "fr")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.rate_limits.chat, RateLimitConfig::new(30_000, 50));
        assert_eq!(config.rate_limits.contact.max_requests, 5);
        assert_eq!(config.credentials.restore_window_secs, 30);
        assert_eq!(config.credentials.store_timeout_ms, 5000);
        assert_eq!(config.locale, Locale::Fr);
    }

    #[test]
    fn test_invalid_origin_is_a_configuration_error() {
        let settings = SecuritySettings {
            allowed_origins: vec!["not a url".to_string()],
            ..SecuritySettings::default()
        };

        assert!(matches!(
            settings.origin_policy(),
            Err(DomainError::Configuration { .. })
        ));
    }
}
