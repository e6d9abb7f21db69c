//! API layer - transport mapping for the core checks

pub mod form_guard;
pub mod middleware;
pub mod state;
pub mod types;

pub use form_guard::FormSubmissionGuard;
pub use middleware::{origin_allowed, security_headers_middleware, SecurityHeaders};
pub use state::AppState;
pub use types::ApiError;
