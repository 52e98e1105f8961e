//! No-op cache implementation for testing or disabled caching.

use super::service::{CacheResult, CacheService};
use crate::domain::entities::RedirectRecord;
use async_trait::async_trait;
use tracing::debug;

/// A cache implementation that does nothing.
///
/// Used when `REDIS_URL` is not configured, when Redis is unreachable at
/// startup, and in the integration tests. Every lookup is a miss.
pub struct NullCache;

impl NullCache {
    pub fn new() -> Self {
        debug!("Using NullCache (caching disabled)");
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheService for NullCache {
    async fn get_record(&self, _slug: &str) -> CacheResult<Option<RedirectRecord>> {
        Ok(None)
    }

    async fn set_record(
        &self,
        _record: &RedirectRecord,
        _ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        Ok(())
    }

    async fn invalidate(&self, _slug: &str) -> CacheResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{ContentType, RedirectFields};
    use chrono::Utc;

    #[tokio::test]
    async fn test_null_cache_never_hits() {
        let cache = NullCache::new();
        let now = Utc::now();
        let record = RedirectRecord::new(
            "a".to_string(),
            RedirectFields {
                title: "A".to_string(),
                description: "d".to_string(),
                target_url: "https://example.com".to_string(),
                image_url: None,
                keywords: None,
                site_name: None,
                content_type: ContentType::default(),
            },
            now,
            now,
        );

        cache.set_record(&record, None).await.unwrap();
        assert!(cache.get_record("a").await.unwrap().is_none());
        assert!(cache.health_check().await);
    }
}
