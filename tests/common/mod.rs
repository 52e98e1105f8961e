#![allow(dead_code)]

use axum_test::TestServer;
use std::sync::Arc;
use seo_redirect::application::services::{AuthService, RedirectInput};
use seo_redirect::infrastructure::cache::NullCache;
use seo_redirect::infrastructure::persistence::MemoryRedirectRepository;
use seo_redirect::routes::app_routes;
use seo_redirect::state::{AppState, SiteSettings};

pub const TEST_TOKEN: &str = "test-admin-token-0123456789";

/// State over the in-process store with admin auth disabled.
pub fn create_test_state() -> AppState {
    build_state(AuthService::disabled())
}

/// State over the in-process store requiring [`TEST_TOKEN`].
pub fn create_protected_state() -> AppState {
    build_state(AuthService::new(Some(TEST_TOKEN)))
}

fn build_state(auth_service: AuthService) -> AppState {
    AppState::new(
        Arc::new(MemoryRedirectRepository::new()),
        Arc::new(NullCache::new()),
        auth_service,
        SiteSettings::default(),
    )
}

/// Full application router without rate limiting.
pub fn make_server(state: AppState) -> TestServer {
    TestServer::new(app_routes(state, None)).unwrap()
}

pub fn input(title: &str, keywords: Option<&str>, content_type: Option<&str>) -> RedirectInput {
    RedirectInput {
        title: title.to_string(),
        description: format!("About {title}"),
        target_url: "https://example.com/article".to_string(),
        image_url: None,
        keywords: keywords.map(str::to_string),
        site_name: None,
        content_type: content_type.map(str::to_string),
        slug: None,
    }
}

/// Creates a record through the service and returns its slug.
pub async fn create_test_redirect(
    state: &AppState,
    title: &str,
    keywords: Option<&str>,
    content_type: Option<&str>,
) -> String {
    state
        .redirect_service
        .create(input(title, keywords, content_type))
        .await
        .unwrap()
        .record
        .slug
}
