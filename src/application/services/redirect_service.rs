//! Redirect record management service.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::json;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use url::form_urlencoded;

use crate::domain::entities::{ContentType, NewRedirect, RedirectFields, RedirectRecord};
use crate::domain::landing_page::is_http_url;
use crate::domain::listing::{self, ListingPage, ListingQuery};
use crate::domain::repositories::RedirectRepository;
use crate::error::AppError;
use crate::infrastructure::cache::{CacheService, NullCache};
use crate::utils::slug::{generate_slug, is_reserved_slug, validate_custom_slug};

/// Unvalidated record data as submitted by the admin form, the API or the CLI.
///
/// Blank optional values are treated as absent. `slug` is only honoured on
/// create; updates always keep the existing key.
#[derive(Debug, Clone, Default)]
pub struct RedirectInput {
    pub title: String,
    pub description: String,
    pub target_url: String,
    pub image_url: Option<String>,
    pub keywords: Option<String>,
    pub site_name: Option<String>,
    pub content_type: Option<String>,
    pub slug: Option<String>,
}

impl RedirectInput {
    /// Validates the input and produces storable field values.
    ///
    /// Title and description are kept byte-for-byte; URLs are trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] listing every offending field, keyed by
    /// its API name (`title`, `desc`, `url`, `image`, `type`).
    pub fn into_fields(self) -> Result<RedirectFields, AppError> {
        let mut errors: BTreeMap<&'static str, Vec<String>> = BTreeMap::new();

        if self.title.trim().is_empty() {
            errors.entry("title").or_default().push("Title is required".into());
        }

        if self.description.trim().is_empty() {
            errors
                .entry("desc")
                .or_default()
                .push("Description is required".into());
        }

        let target_url = self.target_url.trim().to_string();
        if target_url.is_empty() {
            errors.entry("url").or_default().push("URL is required".into());
        } else if !is_http_url(&target_url) {
            errors
                .entry("url")
                .or_default()
                .push("URL must be an absolute http(s) URL".into());
        }

        let image_url = blank_to_none(self.image_url).map(|v| v.trim().to_string());
        if let Some(image) = &image_url
            && !is_http_url(image)
        {
            errors
                .entry("image")
                .or_default()
                .push("Image must be an absolute http(s) URL".into());
        }

        let content_type = match ContentType::parse(self.content_type.as_deref().unwrap_or_default())
        {
            Ok(content_type) => content_type,
            Err(reason) => {
                errors.entry("type").or_default().push(reason);
                ContentType::default()
            }
        };

        if !errors.is_empty() {
            return Err(AppError::bad_request(
                "Validation failed",
                json!({ "fields": errors }),
            ));
        }

        Ok(RedirectFields {
            title: self.title,
            description: self.description,
            target_url,
            image_url,
            keywords: blank_to_none(self.keywords),
            site_name: blank_to_none(self.site_name),
            content_type,
        })
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Result of importing one backup entry.
#[derive(Debug)]
pub enum ImportOutcome {
    Created(String),
    Updated(String),
    /// The slug exists and overwriting was not requested.
    Skipped(String),
    Failed(AppError),
}

/// A stored record together with both of its public URL forms.
#[derive(Debug, Clone)]
pub struct PublishedRedirect {
    pub record: RedirectRecord,
    /// `BASE_URL/<slug>`
    pub short_url: String,
    /// `BASE_URL/u?title=…`, renders without a store lookup.
    pub long_url: String,
}

/// Service for creating, editing and listing redirect records.
///
/// Generic over the repository so the server can hold a
/// `RedirectService<dyn RedirectRepository>` while unit tests use the mock.
pub struct RedirectService<R: RedirectRepository + ?Sized> {
    repository: Arc<R>,
    cache: Arc<dyn CacheService>,
    base_url: String,
}

impl<R: RedirectRepository + ?Sized> RedirectService<R> {
    /// Creates a new redirect service.
    ///
    /// `base_url` is the public origin used for short and long URLs; a
    /// trailing slash is ignored.
    pub fn new(repository: Arc<R>, base_url: impl Into<String>) -> Self {
        Self {
            repository,
            cache: Arc::new(NullCache::new()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Uses `cache` for landing page lookups. Update and delete invalidate
    /// the slug's entry after the store write.
    pub fn with_cache(mut self, cache: Arc<dyn CacheService>) -> Self {
        self.cache = cache;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Creates a record.
    ///
    /// The slug is the normalized custom slug when one is supplied, otherwise
    /// it is derived from the title. Existing slugs are never overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if a required field is blank, a URL is
    /// malformed, or the slug is empty or reserved.
    /// Returns [`AppError::Conflict`] if the slug is already taken.
    pub async fn create(&self, input: RedirectInput) -> Result<PublishedRedirect, AppError> {
        let custom_slug = blank_to_none(input.slug.clone());
        let fields = input.into_fields()?;

        let slug = match custom_slug {
            Some(raw) => validate_custom_slug(&raw)?,
            None => derive_slug(&fields.title)?,
        };

        if self.repository.find_by_slug(&slug).await?.is_some() {
            return Err(AppError::conflict(
                "Slug already exists",
                json!({ "slug": slug, "hint": "Supply a custom slug" }),
            ));
        }

        let record = self.repository.create(NewRedirect { slug, fields }).await?;

        metrics::counter!("redirects_created_total").increment(1);
        info!(slug = %record.slug, "Redirect created");

        Ok(self.publish(record))
    }

    /// Retrieves a record by slug.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has this slug.
    pub async fn get(&self, slug: &str) -> Result<RedirectRecord, AppError> {
        self.repository
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::not_found("Redirect not found", json!({ "slug": slug })))
    }

    /// Like [`Self::get`], returning `None` for unknown slugs.
    pub async fn find(&self, slug: &str) -> Result<Option<RedirectRecord>, AppError> {
        self.repository.find_by_slug(slug).await
    }

    /// Replaces every field of an existing record. The slug never changes.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the slug is unknown and
    /// [`AppError::Validation`] on invalid input.
    pub async fn update(
        &self,
        slug: &str,
        input: RedirectInput,
    ) -> Result<PublishedRedirect, AppError> {
        if self.repository.find_by_slug(slug).await?.is_none() {
            return Err(AppError::not_found(
                "Redirect not found",
                json!({ "slug": slug }),
            ));
        }

        let fields = input.into_fields()?;
        let record = self.repository.update(slug, fields).await?;

        self.invalidate(slug).await;

        metrics::counter!("redirects_updated_total").increment(1);
        info!(slug = %record.slug, "Redirect updated");

        Ok(self.publish(record))
    }

    /// Removes a record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the slug is unknown.
    pub async fn delete(&self, slug: &str) -> Result<(), AppError> {
        if !self.repository.delete(slug).await? {
            return Err(AppError::not_found(
                "Redirect not found",
                json!({ "slug": slug }),
            ));
        }

        self.invalidate(slug).await;

        metrics::counter!("redirects_deleted_total").increment(1);
        info!(slug, "Redirect deleted");

        Ok(())
    }

    /// Imports one `key -> record` entry of a backup file.
    ///
    /// The key is normalized like a custom slug. Existing slugs are skipped
    /// unless `overwrite` is set. Invalid entries and rejected writes become
    /// [`ImportOutcome::Failed`]; only store lookups abort the import.
    pub async fn import_entry(
        &self,
        key: &str,
        input: Result<RedirectInput, AppError>,
        overwrite: bool,
    ) -> Result<ImportOutcome, AppError> {
        let mut input = match input {
            Ok(input) => input,
            Err(e) => return Ok(ImportOutcome::Failed(e)),
        };

        let slug = match validate_custom_slug(key) {
            Ok(slug) => slug,
            Err(e) => return Ok(ImportOutcome::Failed(e)),
        };

        let exists = self.repository.find_by_slug(&slug).await?.is_some();
        if exists && !overwrite {
            return Ok(ImportOutcome::Skipped(slug));
        }

        input.slug = Some(slug.clone());
        let result = if exists {
            self.update(&slug, input).await.map(|_| ImportOutcome::Updated(slug))
        } else {
            self.create(input)
                .await
                .map(|published| ImportOutcome::Created(published.record.slug))
        };

        Ok(result.unwrap_or_else(ImportOutcome::Failed))
    }

    async fn invalidate(&self, slug: &str) {
        if let Err(e) = self.cache.invalidate(slug).await {
            warn!(error = %e, slug, "Failed to invalidate cached record");
        }
    }

    /// Read-through lookup for the landing page: cache first, then the store.
    ///
    /// A cache failure falls back to the store. Records read from the store
    /// are written back in the background.
    pub async fn find_cached(&self, slug: &str) -> Result<Option<RedirectRecord>, AppError>
    where
        R: 'static,
    {
        match self.cache.get_record(slug).await {
            Ok(Some(record)) => return Ok(Some(record)),
            Ok(None) => debug!("Cache MISS for {}", slug),
            Err(e) => error!("Cache error: {}", e),
        }

        let record = self.repository.find_by_slug(slug).await?;

        if let Some(record) = &record {
            self.spawn_write_back(record.clone());
        }

        Ok(record)
    }

    /// Caches `record`, then re-reads the store and drops the entry again if
    /// the record changed or vanished since it was read.
    ///
    /// Update and delete invalidate after their store write, so a write-back
    /// racing them is removed either by them or by this check.
    pub(crate) fn spawn_write_back(&self, record: RedirectRecord) -> JoinHandle<()>
    where
        R: 'static,
    {
        let cache = self.cache.clone();
        let repository = self.repository.clone();

        tokio::spawn(async move {
            if let Err(e) = cache.set_record(&record, None).await {
                error!("Failed to cache record: {}", e);
                return;
            }

            let current = repository.find_by_slug(&record.slug).await;
            if matches!(&current, Ok(Some(current)) if *current == record) {
                return;
            }

            debug!(slug = %record.slug, "Record changed during cache write, dropping entry");
            if let Err(e) = cache.invalidate(&record.slug).await {
                warn!(error = %e, slug = %record.slug, "Failed to drop stale cache entry");
            }
        })
    }

    /// All records in store insertion order.
    pub async fn list(&self) -> Result<Vec<RedirectRecord>, AppError> {
        self.repository.list().await
    }

    /// One filtered, sorted page of records.
    pub async fn listing(&self, query: &ListingQuery) -> Result<ListingPage, AppError> {
        let records = self.repository.list().await?;
        Ok(listing::apply(&records, query))
    }

    /// Up to `limit` other records sharing a keyword tag with `record`.
    pub async fn related(
        &self,
        record: &RedirectRecord,
        limit: usize,
    ) -> Result<Vec<RedirectRecord>, AppError> {
        let tags = record.tags();
        if tags.is_empty() {
            return Ok(Vec::new());
        }

        let records = self.repository.list().await?;
        Ok(listing::related(&records, &record.slug, &tags, limit))
    }

    pub async fn count(&self) -> Result<i64, AppError> {
        self.repository.count().await
    }

    /// Checks that the record store is reachable.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }

    /// Attaches both URL forms to a record.
    pub fn publish(&self, record: RedirectRecord) -> PublishedRedirect {
        let short_url = self.short_url(&record.slug);
        let long_url = self.long_url(&record.fields);

        PublishedRedirect {
            record,
            short_url,
            long_url,
        }
    }

    /// `BASE_URL/<slug>`.
    pub fn short_url(&self, slug: &str) -> String {
        format!("{}/{}", self.base_url, slug)
    }

    /// Parameter-mode URL carrying every field in the query string.
    ///
    /// Optional fields are only included when present; `type` is always last.
    pub fn long_url(&self, fields: &RedirectFields) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query
            .append_pair("title", &fields.title)
            .append_pair("desc", &fields.description)
            .append_pair("url", &fields.target_url);

        if let Some(image) = &fields.image_url {
            query.append_pair("image", image);
        }
        if let Some(keywords) = &fields.keywords {
            query.append_pair("keywords", keywords);
        }
        if let Some(site_name) = &fields.site_name {
            query.append_pair("site_name", site_name);
        }
        query.append_pair("type", fields.content_type.as_str());

        format!("{}/u?{}", self.base_url, query.finish())
    }
}

fn derive_slug(title: &str) -> Result<String, AppError> {
    let slug = generate_slug(title);

    if slug.is_empty() {
        return Err(AppError::bad_request(
            "Cannot derive a slug from this title",
            json!({ "title": title, "hint": "Supply a custom slug" }),
        ));
    }

    if is_reserved_slug(&slug) {
        return Err(AppError::bad_request(
            "This slug is reserved",
            json!({ "slug": slug, "hint": "Supply a custom slug" }),
        ));
    }

    Ok(slug)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockRedirectRepository;
    use chrono::Utc;

    const BASE: &str = "https://seo.example.com";

    fn input(title: &str) -> RedirectInput {
        RedirectInput {
            title: title.to_string(),
            description: "A description".to_string(),
            target_url: "https://blog.example.com/post".to_string(),
            ..Default::default()
        }
    }

    fn record(slug: &str, fields: RedirectFields) -> RedirectRecord {
        let now = Utc::now();
        RedirectRecord::new(slug.to_string(), fields, now, now)
    }

    fn service(repo: MockRedirectRepository) -> RedirectService<MockRedirectRepository> {
        RedirectService::new(Arc::new(repo), format!("{BASE}/"))
    }

    fn field_errors(err: &AppError) -> serde_json::Value {
        err.to_error_info().details["fields"].clone()
    }

    #[tokio::test]
    async fn test_create_derives_slug_from_title() {
        let mut repo = MockRedirectRepository::new();

        repo.expect_find_by_slug()
            .withf(|slug| slug == "hello-world-foo-bar")
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_create()
            .withf(|new| new.slug == "hello-world-foo-bar" && new.fields.title == "Hello, World!  Foo--Bar")
            .times(1)
            .returning(|new| Ok(record(&new.slug, new.fields)));

        let created = service(repo)
            .create(input("Hello, World!  Foo--Bar"))
            .await
            .unwrap();

        assert_eq!(created.record.slug, "hello-world-foo-bar");
        assert_eq!(created.short_url, format!("{BASE}/hello-world-foo-bar"));
        assert!(created.long_url.starts_with(&format!("{BASE}/u?title=Hello%2C+World")));
    }

    #[tokio::test]
    async fn test_create_normalizes_custom_slug() {
        let mut repo = MockRedirectRepository::new();

        repo.expect_find_by_slug().returning(|_| Ok(None));
        repo.expect_create()
            .withf(|new| new.slug == "spring-promo")
            .times(1)
            .returning(|new| Ok(record(&new.slug, new.fields)));

        let mut data = input("Anything");
        data.slug = Some("Spring Promo!".to_string());

        let created = service(repo).create(data).await.unwrap();
        assert_eq!(created.record.slug, "spring-promo");
    }

    #[tokio::test]
    async fn test_create_duplicate_slug_is_conflict() {
        let mut repo = MockRedirectRepository::new();

        repo.expect_find_by_slug()
            .times(1)
            .returning(|slug| Ok(Some(record(slug, input("Taken").into_fields().unwrap()))));
        repo.expect_create().never();

        let err = service(repo).create(input("Taken")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_create_blank_required_fields() {
        let repo = MockRedirectRepository::new();

        let err = service(repo)
            .create(RedirectInput {
                title: "  ".to_string(),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
        let fields = field_errors(&err);
        assert!(fields.get("title").is_some());
        assert!(fields.get("desc").is_some());
        assert!(fields.get("url").is_some());
    }

    #[tokio::test]
    async fn test_create_rejects_non_http_urls() {
        let repo = MockRedirectRepository::new();

        let mut data = input("Bad");
        data.target_url = "javascript:alert(1)".to_string();
        data.image_url = Some("ftp://files.example.com/a.png".to_string());

        let err = service(repo).create(data).await.unwrap_err();
        let fields = field_errors(&err);
        assert!(fields.get("url").is_some());
        assert!(fields.get("image").is_some());
    }

    #[tokio::test]
    async fn test_create_title_without_slug_characters() {
        let repo = MockRedirectRepository::new();

        let err = service(repo).create(input("!!! ???")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_create_reserved_slug_from_title() {
        let repo = MockRedirectRepository::new();

        let err = service(repo).create(input("Admin")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_create_blank_optionals_become_none() {
        let mut repo = MockRedirectRepository::new();

        repo.expect_find_by_slug().returning(|_| Ok(None));
        repo.expect_create()
            .withf(|new| {
                new.fields.image_url.is_none()
                    && new.fields.keywords.is_none()
                    && new.fields.site_name.is_none()
                    && new.fields.content_type.as_str() == "website"
            })
            .times(1)
            .returning(|new| Ok(record(&new.slug, new.fields)));

        let mut data = input("Optionals");
        data.image_url = Some(" ".to_string());
        data.keywords = Some(String::new());
        data.site_name = Some("\t".to_string());
        data.content_type = Some(String::new());

        service(repo).create(data).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_unknown_slug_is_not_found() {
        let mut repo = MockRedirectRepository::new();

        repo.expect_find_by_slug().times(1).returning(|_| Ok(None));
        repo.expect_update().never();

        let err = service(repo).update("ghost", input("x")).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_ignores_slug_in_input() {
        let mut repo = MockRedirectRepository::new();

        repo.expect_find_by_slug()
            .returning(|slug| Ok(Some(record(slug, input("Old").into_fields().unwrap()))));
        repo.expect_update()
            .withf(|slug, fields| slug == "keep-me" && fields.title == "New")
            .times(1)
            .returning(|slug, fields| Ok(record(slug, fields)));

        let mut data = input("New");
        data.slug = Some("other".to_string());

        let updated = service(repo).update("keep-me", data).await.unwrap();
        assert_eq!(updated.record.slug, "keep-me");
        assert_eq!(updated.record.fields.title, "New");
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let mut repo = MockRedirectRepository::new();
        repo.expect_delete().times(1).returning(|_| Ok(false));

        let err = service(repo).delete("ghost").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_existing() {
        let mut repo = MockRedirectRepository::new();
        repo.expect_delete()
            .withf(|slug| slug == "gone")
            .times(1)
            .returning(|_| Ok(true));

        assert!(service(repo).delete("gone").await.is_ok());
    }

    #[tokio::test]
    async fn test_related_skips_store_without_tags() {
        let mut repo = MockRedirectRepository::new();
        repo.expect_list().never();

        let current = record("a", input("A").into_fields().unwrap());
        let related = service(repo).related(&current, 3).await.unwrap();
        assert!(related.is_empty());
    }

    #[test]
    fn test_long_url_includes_only_present_optionals() {
        let svc = service(MockRedirectRepository::new());

        let mut fields = input("Ten Tips").into_fields().unwrap();
        fields.keywords = Some("seo, growth".to_string());
        fields.content_type = ContentType::parse("article").unwrap();

        let url = svc.long_url(&fields);
        assert_eq!(
            url,
            format!(
                "{BASE}/u?title=Ten+Tips&desc=A+description&url=https%3A%2F%2Fblog.example.com%2Fpost&keywords=seo%2C+growth&type=article"
            )
        );
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let svc = service(MockRedirectRepository::new());
        assert_eq!(svc.base_url(), BASE);
        assert_eq!(svc.short_url("x"), format!("{BASE}/x"));
    }

    // ─── cache ──────────────────────────────────────────────────────────────

    use crate::infrastructure::cache::{CacheError, CacheResult, MockCacheService};
    use crate::infrastructure::persistence::MemoryRedirectRepository;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    /// In-memory cache whose writes wait until `gate` is opened.
    struct GatedCache {
        entries: Mutex<HashMap<String, RedirectRecord>>,
        gate: Notify,
    }

    impl GatedCache {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                entries: Mutex::new(HashMap::new()),
                gate: Notify::new(),
            })
        }

        fn cached(&self, slug: &str) -> Option<RedirectRecord> {
            self.entries.lock().unwrap().get(slug).cloned()
        }
    }

    #[async_trait]
    impl CacheService for GatedCache {
        async fn get_record(&self, slug: &str) -> CacheResult<Option<RedirectRecord>> {
            Ok(self.cached(slug))
        }

        async fn set_record(
            &self,
            record: &RedirectRecord,
            _ttl_seconds: Option<u64>,
        ) -> CacheResult<()> {
            self.gate.notified().await;
            self.entries
                .lock()
                .unwrap()
                .insert(record.slug.clone(), record.clone());
            Ok(())
        }

        async fn invalidate(&self, slug: &str) -> CacheResult<()> {
            self.entries.lock().unwrap().remove(slug);
            Ok(())
        }

        async fn health_check(&self) -> bool {
            true
        }
    }

    fn memory_service(cache: Arc<dyn CacheService>) -> RedirectService<MemoryRedirectRepository> {
        RedirectService::new(Arc::new(MemoryRedirectRepository::new()), BASE).with_cache(cache)
    }

    #[tokio::test]
    async fn test_find_cached_hit_skips_store() {
        let hit = record("cached-page", input("Cached").into_fields().unwrap());
        let expected = hit.clone();

        let mut cache = MockCacheService::new();
        cache
            .expect_get_record()
            .withf(|slug| slug == "cached-page")
            .times(1)
            .returning(move |_| Ok(Some(hit.clone())));
        cache.expect_set_record().never();

        let mut repo = MockRedirectRepository::new();
        repo.expect_find_by_slug().never();

        let svc = service(repo).with_cache(Arc::new(cache));
        let loaded = svc.find_cached("cached-page").await.unwrap();

        assert_eq!(loaded, Some(expected));
    }

    #[tokio::test]
    async fn test_find_cached_error_falls_back_to_store() {
        let mut cache = MockCacheService::new();
        cache
            .expect_get_record()
            .returning(|_| Err(CacheError::ConnectionError("down".to_string())));
        cache.expect_set_record().never();

        let mut repo = MockRedirectRepository::new();
        repo.expect_find_by_slug()
            .times(1)
            .returning(|_| Ok(None));

        let svc = service(repo).with_cache(Arc::new(cache));

        assert!(svc.find_cached("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_invalidates_cache() {
        let mut cache = MockCacheService::new();
        cache
            .expect_invalidate()
            .withf(|slug| slug == "old-title")
            .times(1)
            .returning(|_| Ok(()));
        let svc = memory_service(Arc::new(cache));
        svc.create(input("Old Title")).await.unwrap();

        let published = svc.update("old-title", input("New Title")).await.unwrap();

        assert_eq!(published.record.fields.title, "New Title");
    }

    #[tokio::test]
    async fn test_delete_invalidates_cache() {
        let mut cache = MockCacheService::new();
        cache
            .expect_invalidate()
            .withf(|slug| slug == "cached-page")
            .times(1)
            .returning(|_| Ok(()));
        let svc = memory_service(Arc::new(cache));
        svc.create(input("Cached Page")).await.unwrap();

        assert!(svc.delete("cached-page").await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_succeeds_when_cache_is_down() {
        let mut cache = MockCacheService::new();
        cache
            .expect_invalidate()
            .returning(|_| Err(CacheError::ConnectionError("down".to_string())));
        let svc = memory_service(Arc::new(cache));
        svc.create(input("Cached Page")).await.unwrap();

        svc.delete("cached-page").await.unwrap();

        assert!(svc.find("cached-page").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_leaves_cache_alone() {
        let mut cache = MockCacheService::new();
        cache.expect_invalidate().never();
        let svc = memory_service(Arc::new(cache));

        let result = svc.delete("missing").await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_write_back_finishing_after_delete_is_dropped() {
        let cache = GatedCache::new();
        let svc = memory_service(cache.clone());
        let published = svc.create(input("Promo")).await.unwrap();

        let write_back = svc.spawn_write_back(published.record);
        svc.delete("promo").await.unwrap();
        cache.gate.notify_one();
        write_back.await.unwrap();

        assert!(cache.cached("promo").is_none());
        assert!(svc.find_cached("promo").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_write_back_finishing_after_update_is_dropped() {
        let cache = GatedCache::new();
        let svc = memory_service(cache.clone());
        let published = svc.create(input("Promo")).await.unwrap();

        let write_back = svc.spawn_write_back(published.record);
        let mut changed = input("Promo");
        changed.description = "Spring sale".to_string();
        svc.update("promo", changed).await.unwrap();
        cache.gate.notify_one();
        write_back.await.unwrap();

        assert!(cache.cached("promo").is_none());
    }

    #[tokio::test]
    async fn test_write_back_of_current_record_is_kept() {
        let cache = GatedCache::new();
        let svc = memory_service(cache.clone());
        let published = svc.create(input("Promo")).await.unwrap();

        cache.gate.notify_one();
        svc.spawn_write_back(published.record.clone()).await.unwrap();

        assert_eq!(cache.cached("promo"), Some(published.record));
    }

    // ─── import ─────────────────────────────────────────────────────────────

    fn null_memory_service() -> RedirectService<MemoryRedirectRepository> {
        memory_service(Arc::new(NullCache::new()))
    }

    #[tokio::test]
    async fn test_import_creates_under_normalized_key() {
        let svc = null_memory_service();

        let outcome = svc.import_entry("My Post", Ok(input("Anything")), false).await.unwrap();

        assert!(matches!(outcome, ImportOutcome::Created(ref slug) if slug == "my-post"));
        assert_eq!(svc.get("my-post").await.unwrap().fields.title, "Anything");
    }

    #[tokio::test]
    async fn test_import_skips_existing_normalized_key() {
        let svc = null_memory_service();
        svc.create(input("My Post")).await.unwrap();

        let outcome = svc.import_entry("My Post", Ok(input("Other")), false).await.unwrap();

        assert!(matches!(outcome, ImportOutcome::Skipped(ref slug) if slug == "my-post"));
        assert_eq!(svc.get("my-post").await.unwrap().fields.title, "My Post");
    }

    #[tokio::test]
    async fn test_import_overwrite_updates_existing() {
        let svc = null_memory_service();
        svc.create(input("My Post")).await.unwrap();

        let outcome = svc.import_entry("My Post", Ok(input("Other")), true).await.unwrap();

        assert!(matches!(outcome, ImportOutcome::Updated(ref slug) if slug == "my-post"));
        assert_eq!(svc.get("my-post").await.unwrap().fields.title, "Other");
    }

    #[tokio::test]
    async fn test_import_invalid_entry_fails_without_writing() {
        let svc = null_memory_service();
        let invalid = Err(AppError::bad_request("Validation failed", json!({})));

        let outcome = svc.import_entry("my-post", invalid, false).await.unwrap();

        assert!(matches!(outcome, ImportOutcome::Failed(AppError::Validation { .. })));
        assert_eq!(svc.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_import_reserved_key_fails() {
        let svc = null_memory_service();

        let outcome = svc.import_entry("admin", Ok(input("Admin")), true).await.unwrap();

        assert!(matches!(outcome, ImportOutcome::Failed(AppError::Validation { .. })));
    }
}
