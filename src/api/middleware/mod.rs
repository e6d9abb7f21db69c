//! API middleware components

pub mod security;

pub use security::{origin_allowed, security_headers_middleware, SecurityHeaders};
