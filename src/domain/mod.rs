//! Domain layer: pure types, validation logic and collaborator contracts

pub mod api_key;
pub mod clock;
pub mod error;
pub mod form;
pub mod rate_limit;
pub mod security;
pub mod validation;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::DomainError;
pub use rate_limit::{RateLimitConfig, RouteClass};
pub use validation::ValidationResult;
