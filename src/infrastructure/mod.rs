//! Infrastructure layer - concrete collaborators and stateful services

pub mod api_key;
pub mod logging;
pub mod rate_limit;
