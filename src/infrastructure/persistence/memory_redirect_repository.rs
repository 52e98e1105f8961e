//! In-process implementation of the redirect repository.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tokio::sync::RwLock;

use crate::domain::entities::{NewRedirect, RedirectFields, RedirectRecord};
use crate::domain::repositories::RedirectRepository;
use crate::error::AppError;

/// Vector-backed store that keeps records in insertion order.
///
/// Used when no database is configured and by the integration tests. Contents
/// are lost on restart.
#[derive(Default)]
pub struct MemoryRedirectRepository {
    records: RwLock<Vec<RedirectRecord>>,
}

impl MemoryRedirectRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RedirectRepository for MemoryRedirectRepository {
    async fn create(&self, new_redirect: NewRedirect) -> Result<RedirectRecord, AppError> {
        let mut records = self.records.write().await;

        if records.iter().any(|r| r.slug == new_redirect.slug) {
            return Err(AppError::conflict(
                "Slug already exists",
                json!({ "slug": new_redirect.slug }),
            ));
        }

        let now = Utc::now();
        let record = RedirectRecord::new(new_redirect.slug, new_redirect.fields, now, now);
        records.push(record.clone());

        Ok(record)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<RedirectRecord>, AppError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.slug == slug).cloned())
    }

    async fn list(&self) -> Result<Vec<RedirectRecord>, AppError> {
        Ok(self.records.read().await.clone())
    }

    async fn update(&self, slug: &str, fields: RedirectFields) -> Result<RedirectRecord, AppError> {
        let mut records = self.records.write().await;

        let record = records
            .iter_mut()
            .find(|r| r.slug == slug)
            .ok_or_else(|| AppError::not_found("Redirect not found", json!({ "slug": slug })))?;

        record.fields = fields;
        record.updated_at = Utc::now();

        Ok(record.clone())
    }

    async fn delete(&self, slug: &str) -> Result<bool, AppError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.slug != slug);
        Ok(records.len() != before)
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.records.read().await.len() as i64)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
