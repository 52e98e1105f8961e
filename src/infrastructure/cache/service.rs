//! Cache service trait and error types.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::RedirectRecord;

/// Errors that can occur during cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Read-through cache for redirect records keyed by slug.
///
/// Implementations must be thread-safe and handle errors gracefully without
/// disrupting the application: a failing cache degrades to store lookups.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves a cached record.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(record))` on cache hit
    /// - `Ok(None)` on cache miss, or on error in fail-open implementations
    async fn get_record(&self, slug: &str) -> CacheResult<Option<RedirectRecord>>;

    /// Stores a record with an optional TTL in seconds.
    ///
    /// `None` uses the implementation's default TTL.
    async fn set_record(&self, record: &RedirectRecord, ttl_seconds: Option<u64>)
    -> CacheResult<()>;

    /// Removes a cached record. Called after update and delete.
    async fn invalidate(&self, slug: &str) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;
}
