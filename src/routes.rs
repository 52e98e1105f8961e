//! Top-level router configuration combining API and web routes.
//!
//! # Route Structure
//!
//! - `GET  /`             - Home page (public)
//! - `GET  /u`            - Landing page from query parameters (public)
//! - `GET  /{slug}`       - Landing page of a stored record (public)
//! - `GET  /sitemap.xml`  - Sitemap (public)
//! - `GET  /robots.txt`   - Crawler rules (public)
//! - `GET  /health`       - Health check: record store, cache (public)
//! - `/api/*`             - JSON API (admin token required when configured)
//! - `/admin/*`           - Admin page (cookie required when configured)
//! - `/static/*`          - Static assets
//! - `/home`, `/api/sitemap` - Permanent redirects to `/` and `/sitemap.xml`
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Security headers** - Frame, sniffing and referrer policies on every response
//! - **Rate limiting** - Per-IP token bucket (configurable for proxy deployments)
//! - **Authentication** - Bearer token or cookie (API), cookie (admin page)
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::rate_limit::{self, ClientIp, RateLimitLayer};
use crate::api::middleware::{auth, headers, tracing};
use crate::state::AppState;
use crate::web;
use crate::web::middleware::web_auth;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::services::ServeDir;

/// Constructs the application router with all routes and middleware,
/// normalizing trailing slashes before routing.
pub fn app_router(state: AppState, rate_limit: Option<ClientIp>) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(app_routes(state, rate_limit))
}

/// All routes and middleware except path normalization.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `rate_limit` - how the client IP is keyed for rate limiting, or `None`
///   to serve without limits. [`ClientIp::Peer`] requires the server to be
///   started with `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn app_routes(state: AppState, rate_limit: Option<ClientIp>) -> Router {
    let public_limit = rate_limit.map(rate_limit::layer);
    let secure_limit = rate_limit.map(rate_limit::secure_layer);

    let api_router = limited(
        api::routes::protected_routes()
            .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer))
            .layer(headers::no_cache()),
        secure_limit.clone(),
    );

    let web_protected = limited(
        web::routes::protected_routes().route_layer(middleware::from_fn_with_state(
            state.clone(),
            web_auth::layer,
        )),
        secure_limit.clone(),
    );

    let web_login = limited(web::routes::login_routes(), secure_limit);
    let web_public = limited(web::routes::public_routes(), public_limit);

    let router = Router::new()
        .route("/health", get(health_handler))
        .route("/home", get(|| async { moved_permanently("/") }))
        .route(
            "/api/sitemap",
            get(|| async { moved_permanently("/sitemap.xml") }),
        )
        .nest("/api", api_router)
        .merge(web_protected)
        .merge(web_login)
        .merge(web_public)
        .nest_service("/static", ServeDir::new("static"))
        .with_state(state)
        .layer(tracing::layer());

    headers::security_headers(router)
}

fn limited(router: Router<AppState>, limit: Option<RateLimitLayer>) -> Router<AppState> {
    match limit {
        Some(layer) => router.layer(layer),
        None => router,
    }
}

/// `301 Moved Permanently`. [`axum::response::Redirect::permanent`] answers 308.
fn moved_permanently(location: &'static str) -> Response {
    (
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, location)],
    )
        .into_response()
}
