//! Request rate limiting

mod limiter;
mod registry;

pub use limiter::{FixedWindowRateLimiter, RateLimitDecision};
pub use registry::RateLimiters;
