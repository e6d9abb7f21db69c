//! Browser-facing security policy: CSP, CORS origins and response headers
//!
//! These checks run at build or ops time rather than per request.

mod csp;
mod headers;
mod origin;

pub use csp::{
    standard_csp, strict_csp, test_csp, ContentSecurityPolicy, Directive, STANDARD_CSP,
    STRICT_CSP,
};
pub use headers::{security_headers, validate_headers, SecurityHeaderOptions, HSTS_VALUE};
pub use origin::{is_allowed_origin, OriginPolicy, DEFAULT_ALLOWED_ORIGINS};
