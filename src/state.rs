//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{AuthService, RedirectService};
use crate::domain::listing::DEFAULT_PAGE_SIZE;
use crate::domain::repositories::RedirectRepository;
use crate::infrastructure::cache::CacheService;

/// Presentation settings that do not belong to any service.
#[derive(Debug, Clone)]
pub struct SiteSettings {
    /// Brand appended to every document title (`"<title> | <brand>"`).
    pub brand: String,
    /// Public origin without trailing slash, used for sitemap and robots URLs.
    pub base_url: String,
    /// Default rows per page on the admin listing.
    pub page_size: usize,
    /// Human-readable name of the record store backend, shown by `/health`.
    pub store_backend: &'static str,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            brand: "seo360".to_string(),
            base_url: "http://localhost:3000".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            store_backend: "memory",
        }
    }
}

/// Cheaply clonable handle to services and settings.
#[derive(Clone)]
pub struct AppState {
    pub redirect_service: Arc<RedirectService<dyn RedirectRepository>>,
    pub auth_service: Arc<AuthService>,
    pub cache: Arc<dyn CacheService>,
    pub site: Arc<SiteSettings>,
}

impl AppState {
    /// Wires the services around a repository and cache.
    ///
    /// `site.base_url` doubles as the origin of short and long URLs. The
    /// service shares `cache` with `/health`.
    pub fn new(
        repository: Arc<dyn RedirectRepository>,
        cache: Arc<dyn CacheService>,
        auth_service: AuthService,
        site: SiteSettings,
    ) -> Self {
        let redirect_service = Arc::new(
            RedirectService::new(repository, site.base_url.clone()).with_cache(cache.clone()),
        );

        Self {
            redirect_service,
            auth_service: Arc::new(auth_service),
            cache,
            site: Arc::new(site),
        }
    }
}
