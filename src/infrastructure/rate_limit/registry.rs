//! One limiter per route class

use std::collections::HashMap;
use std::sync::Arc;

use super::limiter::{FixedWindowRateLimiter, RateLimitDecision};
use crate::config::RateLimitSettings;
use crate::domain::{Clock, DomainError, RouteClass, SystemClock};

/// Route-class limiters sharing one clock
#[derive(Debug)]
pub struct RateLimiters {
    limiters: HashMap<RouteClass, FixedWindowRateLimiter>,
}

impl RateLimiters {
    /// Build limiters from configuration on the system clock
    pub fn from_settings(settings: &RateLimitSettings) -> Result<Self, DomainError> {
        Self::with_clock(settings, Arc::new(SystemClock))
    }

    /// Build limiters from configuration with an injected clock
    pub fn with_clock(
        settings: &RateLimitSettings,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, DomainError> {
        let mut limiters = HashMap::with_capacity(RouteClass::ALL.len());

        for route in RouteClass::ALL {
            let config = settings.for_route(route);
            config.validate().map_err(|e| match e {
                DomainError::Configuration { message } => {
                    DomainError::configuration(format!("rate_limits.{}: {}", route, message))
                }
                other => other,
            })?;
            limiters.insert(
                route,
                FixedWindowRateLimiter::with_clock(config, clock.clone()),
            );
        }

        Ok(Self { limiters })
    }

    /// Limiter for a route class
    pub fn get(&self, route: RouteClass) -> &FixedWindowRateLimiter {
        // every RouteClass is inserted at construction
        &self.limiters[&route]
    }

    /// Count a request for `key` on `route`
    pub fn check(&self, route: RouteClass, key: &str) -> RateLimitDecision {
        self.get(route).check(key)
    }

    /// Like `check`, but a rejection becomes `DomainError::RateLimited`
    pub fn enforce(&self, route: RouteClass, key: &str) -> Result<RateLimitDecision, DomainError> {
        let decision = self.check(route, key);

        if decision.allowed {
            Ok(decision)
        } else {
            Err(DomainError::rate_limited(decision.reset_in))
        }
    }

    /// Purge elapsed windows on every limiter
    pub fn purge_expired(&self) -> usize {
        self.limiters.values().map(|l| l.purge_expired()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ManualClock, RateLimitConfig};

    #[test]
    fn test_routes_have_separate_budgets() {
        let clock = Arc::new(ManualClock::starting_now());
        let limiters = RateLimiters::with_clock(&RateLimitSettings::default(), clock).unwrap();

        for _ in 0..3 {
            assert!(limiters.check(RouteClass::Demo, "1.2.3.4").allowed);
        }
        assert!(!limiters.check(RouteClass::Demo, "1.2.3.4").allowed);

        assert!(limiters.check(RouteClass::Contact, "1.2.3.4").allowed);
        assert_eq!(limiters.get(RouteClass::Chat).config().max_requests, 20);
        assert_eq!(limiters.get(RouteClass::Vision).config().max_requests, 10);
    }

    #[test]
    fn test_enforce_maps_to_rate_limited() {
        let clock = Arc::new(ManualClock::starting_now());
        let limiters = RateLimiters::with_clock(&RateLimitSettings::default(), clock).unwrap();

        for _ in 0..5 {
            limiters.enforce(RouteClass::Contact, "k").unwrap();
        }

        let err = limiters.enforce(RouteClass::Contact, "k").unwrap_err();
        assert!(matches!(err, DomainError::RateLimited { .. }));
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        let settings = RateLimitSettings {
            chat: RateLimitConfig::new(60_000, 0),
            ..RateLimitSettings::default()
        };

        let err = RateLimiters::from_settings(&settings).unwrap_err();
        assert!(matches!(err, DomainError::Configuration { .. }));
        assert!(err.to_string().contains("rate_limits.chat"));
    }

    #[test]
    fn test_oversized_window_is_rejected() {
        let settings = RateLimitSettings {
            contact: RateLimitConfig::new(u64::MAX, 5),
            ..RateLimitSettings::default()
        };

        let err = RateLimiters::from_settings(&settings).unwrap_err();
        assert!(matches!(err, DomainError::Configuration { .. }));
        assert!(err.to_string().contains("rate_limits.contact"));
    }
}
