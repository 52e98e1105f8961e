//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! validation, and business rules. Services consume repository traits and provide
//! a clean API for HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::redirect_service::RedirectService`] - Record CRUD, listing and URL forms
//! - [`services::auth_service::AuthService`] - Admin token verification

pub mod services;
