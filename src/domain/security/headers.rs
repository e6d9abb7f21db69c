//! Security response headers

use serde::Deserialize;

use super::csp::{test_csp, ContentSecurityPolicy, STANDARD_CSP, STRICT_CSP};
use crate::domain::validation::ValidationResult;

pub const HSTS_VALUE: &str = "max-age=31536000; includeSubDomains";

/// Options controlling the generated header set
#[derive(Debug, Clone, Deserialize)]
pub struct SecurityHeaderOptions {
    #[serde(default)]
    pub strict_csp: bool,
    #[serde(default = "default_true")]
    pub include_hsts: bool,
    #[serde(default)]
    pub report_uri: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Default for SecurityHeaderOptions {
    fn default() -> Self {
        Self {
            strict_csp: false,
            include_hsts: true,
            report_uri: None,
        }
    }
}

/// Header set to attach to every response
pub fn security_headers(options: &SecurityHeaderOptions) -> Vec<(&'static str, String)> {
    let base = if options.strict_csp {
        STRICT_CSP
    } else {
        STANDARD_CSP
    };

    let csp = match &options.report_uri {
        Some(uri) => ContentSecurityPolicy::parse(base)
            .with_report_uri(uri)
            .to_string(),
        None => base.to_string(),
    };

    let mut headers = vec![
        ("X-Content-Type-Options", "nosniff".to_string()),
        ("X-Frame-Options", "DENY".to_string()),
        ("X-XSS-Protection", "1; mode=block".to_string()),
        ("Referrer-Policy", "strict-origin-when-cross-origin".to_string()),
        (
            "Permissions-Policy",
            "camera=(), microphone=(), geolocation=()".to_string(),
        ),
        ("Content-Security-Policy", csp),
    ];

    if options.include_hsts {
        headers.push(("Strict-Transport-Security", HSTS_VALUE.to_string()));
    }

    headers
}

/// Check a header set for missing or weak protections
///
/// CSP problems are folded in with a `Content-Security-Policy:` tag.
pub fn validate_headers<K, V>(headers: &[(K, V)]) -> ValidationResult
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let lookup = |name: &str| {
        headers
            .iter()
            .find(|(k, _)| k.as_ref().eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_ref().trim())
    };

    let mut result = ValidationResult::ok();

    match lookup("X-Content-Type-Options") {
        Some(v) if v.eq_ignore_ascii_case("nosniff") => {}
        Some(_) => result.push_error("X-Content-Type-Options must be 'nosniff'"),
        None => result.push_error("Missing X-Content-Type-Options header"),
    }

    match lookup("X-Frame-Options") {
        Some(v) if v.eq_ignore_ascii_case("DENY") || v.eq_ignore_ascii_case("SAMEORIGIN") => {}
        Some(_) => result.push_error("X-Frame-Options must be 'DENY' or 'SAMEORIGIN'"),
        None => result.push_error("Missing X-Frame-Options header"),
    }

    if lookup("Referrer-Policy").is_none() {
        result.push_error("Missing Referrer-Policy header");
    }

    match lookup("Content-Security-Policy") {
        Some(csp) => result.merge_field("Content-Security-Policy", test_csp(csp)),
        None => result.push_error("Missing Content-Security-Policy header"),
    }

    if lookup("Strict-Transport-Security").is_none() {
        result.push_warning("Missing Strict-Transport-Security header");
    }

    result
}
