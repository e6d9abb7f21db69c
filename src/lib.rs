//! tcd-guard
//!
//! Request validation, abuse prevention and API key lifecycle for the
//! TCDynamics public surface:
//! - Field validators and spam heuristics for the contact and demo forms
//! - Fixed-window rate limiting per route class
//! - Content-Security-Policy auditing, security headers and CORS origins
//! - API key issue, list, revoke and time-boxed restore

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
