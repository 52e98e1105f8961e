//! HTTP middleware for request processing and protection.
//!
//! Provides authentication, rate limiting, response headers and observability.

pub mod auth;
pub mod headers;
pub mod rate_limit;
pub mod tracing;
