//! CORS origin allow-list

use once_cell::sync::Lazy;
use url::Url;

use crate::domain::DomainError;

/// Production and local development origins
pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "https://tcdynamics.fr",
    "https://www.tcdynamics.fr",
    "http://localhost:8080",
    "http://localhost:3000",
    "http://localhost:5173",
];

static DEFAULT_POLICY: Lazy<OriginPolicy> = Lazy::new(OriginPolicy::default);

/// Set of origins allowed to call the API from a browser
///
/// Entries are compared as serialized `scheme://host[:port]` tuples, so
/// `https://example.com` and `https://example.com:443/` are the same origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginPolicy {
    allowed: Vec<String>,
}

impl OriginPolicy {
    /// Build a policy, rejecting entries that are not tuple origins
    pub fn new<I, S>(origins: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed = origins
            .into_iter()
            .map(|origin| {
                let origin = origin.as_ref();
                normalize(origin).ok_or_else(|| {
                    DomainError::configuration(format!("Invalid allowed origin: {}", origin))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { allowed })
    }

    /// Whether a request's `Origin` header is on the allow-list
    pub fn is_allowed(&self, origin: Option<&str>) -> bool {
        let Some(origin) = origin.map(str::trim).filter(|o| !o.is_empty()) else {
            return false;
        };

        normalize(origin).is_some_and(|candidate| self.allowed.contains(&candidate))
    }

    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }
}

impl Default for OriginPolicy {
    fn default() -> Self {
        Self {
            allowed: DEFAULT_ALLOWED_ORIGINS
                .iter()
                .filter_map(|o| normalize(o))
                .collect(),
        }
    }
}

/// Check an origin against the default allow-list
pub fn is_allowed_origin(origin: Option<&str>) -> bool {
    DEFAULT_POLICY.is_allowed(origin)
}

fn normalize(origin: &str) -> Option<String> {
    let url = Url::parse(origin).ok()?;

    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }

    let origin = url.origin();
    origin.is_tuple().then(|| origin.ascii_serialization())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_origins() {
        assert!(is_allowed_origin(Some("https://tcdynamics.fr")));
        assert!(is_allowed_origin(Some("https://www.tcdynamics.fr/")));
        assert!(is_allowed_origin(Some("https://tcdynamics.fr:443")));
        assert!(is_allowed_origin(Some("http://localhost:5173")));
    }

    #[test]
    fn test_rejected_origins() {
        assert!(!is_allowed_origin(None));
        assert!(!is_allowed_origin(Some("")));
        assert!(!is_allowed_origin(Some("   ")));
        assert!(!is_allowed_origin(Some("null")));
        assert!(!is_allowed_origin(Some("not a url")));
        assert!(!is_allowed_origin(Some("http://tcdynamics.fr")));
        assert!(!is_allowed_origin(Some("https://tcdynamics.fr:8443")));
        assert!(!is_allowed_origin(Some("https://evil-tcdynamics.fr")));
        assert!(!is_allowed_origin(Some("http://localhost:9999")));
        assert!(!is_allowed_origin(Some("file:///etc/passwd")));
    }

    #[test]
    fn test_custom_policy() {
        let policy = OriginPolicy::new(["https://app.example.com"]).unwrap();

        assert!(policy.is_allowed(Some("https://app.example.com")));
        assert!(!policy.is_allowed(Some("https://tcdynamics.fr")));
    }

    #[test]
    fn test_invalid_policy_entry() {
        let result = OriginPolicy::new(["https://ok.example.com", "nonsense"]);
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_default_policy_keeps_every_entry() {
        assert_eq!(OriginPolicy::default().allowed().len(), DEFAULT_ALLOWED_ORIGINS.len());
    }
}
