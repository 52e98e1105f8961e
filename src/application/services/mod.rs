//! Business logic services for the application layer.

pub mod auth_service;
pub mod redirect_service;

pub use auth_service::AuthService;
pub use redirect_service::{ImportOutcome, PublishedRedirect, RedirectInput, RedirectService};
