//! Repository trait for redirect record storage.

use crate::domain::entities::{NewRedirect, RedirectFields, RedirectRecord};
use crate::error::AppError;
use async_trait::async_trait;

/// Storage contract for the slug → record mapping.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgRedirectRepository`] - PostgreSQL
/// - [`crate::infrastructure::persistence::MemoryRedirectRepository`] - in-process
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RedirectRepository: Send + Sync {
    /// Inserts a new record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the slug is already taken.
    async fn create(&self, new_redirect: NewRedirect) -> Result<RedirectRecord, AppError>;

    /// Finds a record by slug.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] or [`AppError::Unavailable`] on storage errors.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<RedirectRecord>, AppError>;

    /// Returns every record in insertion order.
    async fn list(&self) -> Result<Vec<RedirectRecord>, AppError>;

    /// Replaces the fields of an existing record, keeping its slug.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has this slug.
    async fn update(&self, slug: &str, fields: RedirectFields) -> Result<RedirectRecord, AppError>;

    /// Removes a record.
    ///
    /// Returns `Ok(true)` if the record existed, `Ok(false)` otherwise.
    async fn delete(&self, slug: &str) -> Result<bool, AppError>;

    /// Number of stored records.
    async fn count(&self) -> Result<i64, AppError>;

    /// Checks that the backing store answers.
    async fn ping(&self) -> Result<(), AppError>;
}
