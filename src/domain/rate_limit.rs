//! Rate limit configuration types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Longest accepted window: one day
pub const MAX_WINDOW_MS: u64 = 86_400_000;

/// Fixed-window limit: at most `max_requests` per `window_ms`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub window_ms: u64,
    pub max_requests: u32,
}

impl RateLimitConfig {
    pub fn new(window_ms: u64, max_requests: u32) -> Self {
        Self {
            window_ms,
            max_requests,
        }
    }

    /// Limit per minute
    pub fn per_minute(max_requests: u32) -> Self {
        Self::new(60_000, max_requests)
    }

    /// Window length, clamped to `MAX_WINDOW_MS`
    pub fn window(&self) -> chrono::Duration {
        let ms = self.window_ms.min(MAX_WINDOW_MS);
        chrono::Duration::milliseconds(i64::try_from(ms).unwrap_or(i64::MAX))
    }

    /// Reject configurations that could never admit a request
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.window_ms == 0 {
            return Err(DomainError::configuration("Rate limit window must be positive"));
        }

        if self.window_ms > MAX_WINDOW_MS {
            return Err(DomainError::configuration(format!(
                "Rate limit window must not exceed {} ms",
                MAX_WINDOW_MS
            )));
        }

        if self.max_requests == 0 {
            return Err(DomainError::configuration(
                "Rate limit must allow at least one request per window",
            ));
        }

        Ok(())
    }
}

/// Route classes with their own limiter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteClass {
    Contact,
    Demo,
    Chat,
    Vision,
}

impl RouteClass {
    pub const ALL: [RouteClass; 4] = [Self::Contact, Self::Demo, Self::Chat, Self::Vision];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contact => "contact",
            Self::Demo => "demo",
            Self::Chat => "chat",
            Self::Vision => "vision",
        }
    }

    /// Default budget for the route class
    pub fn default_limit(&self) -> RateLimitConfig {
        match self {
            Self::Contact => RateLimitConfig::per_minute(5),
            Self::Demo => RateLimitConfig::per_minute(3),
            Self::Chat => RateLimitConfig::per_minute(20),
            Self::Vision => RateLimitConfig::per_minute(10),
        }
    }
}

impl FromStr for RouteClass {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|route| route.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("Unknown route class: {}", s)))
    }
}

impl fmt::Display for RouteClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        assert_eq!(RouteClass::Contact.default_limit().max_requests, 5);
        assert_eq!(RouteClass::Demo.default_limit().max_requests, 3);
        assert_eq!(RouteClass::Chat.default_limit().max_requests, 20);
        assert_eq!(RouteClass::Vision.default_limit().max_requests, 10);

        for route in RouteClass::ALL {
            assert_eq!(route.default_limit().window_ms, 60_000);
            assert!(route.default_limit().validate().is_ok());
        }
    }

    #[test]
    fn test_invalid_configs() {
        assert!(RateLimitConfig::new(0, 5).validate().is_err());
        assert!(RateLimitConfig::new(1000, 0).validate().is_err());
        assert!(RateLimitConfig::new(MAX_WINDOW_MS + 1, 5).validate().is_err());
        assert!(RateLimitConfig::new(MAX_WINDOW_MS, 5).validate().is_ok());
    }

    #[test]
    fn test_window_is_clamped() {
        let config = RateLimitConfig::new(u64::MAX, 5);
        assert_eq!(config.window(), chrono::Duration::days(1));
    }

    #[test]
    fn test_route_class_parse() {
        assert_eq!("vision".parse::<RouteClass>().unwrap(), RouteClass::Vision);
        assert!("admin".parse::<RouteClass>().is_err());
    }
}
