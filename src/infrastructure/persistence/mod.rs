//! Record store implementations.
//!
//! - [`PgRedirectRepository`] - PostgreSQL storage via SQLx
//! - [`MemoryRedirectRepository`] - in-process storage used when no database
//!   is configured and in tests

pub mod memory_redirect_repository;
pub mod pg_redirect_repository;

pub use memory_redirect_repository::MemoryRedirectRepository;
pub use pg_redirect_repository::PgRedirectRepository;
