//! Web route configuration.

use crate::state::AppState;
use crate::web::handlers::{
    admin_handler, home_handler, landing_by_params_handler, landing_by_slug_handler,
    login_page_handler, login_submit_handler, logout_handler, robots_handler, sitemap_handler,
};
use axum::{
    Router,
    routing::{get, post},
};

/// Admin pages requiring the `admin_token` cookie.
///
/// Protected via [`crate::web::middleware::web_auth`].
///
/// # Endpoints
///
/// - `GET  /admin`        - Listing, create/edit form and delete buttons
/// - `POST /admin/logout` - Clear the login cookie
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/admin", get(admin_handler))
        .route("/admin/logout", post(logout_handler))
}

/// Admin login form.
///
/// - `GET  /admin/login` - Login page
/// - `POST /admin/login` - Check token, set cookie
pub fn login_routes() -> Router<AppState> {
    Router::new().route(
        "/admin/login",
        get(login_page_handler).post(login_submit_handler),
    )
}

/// Public pages.
///
/// # Endpoints
///
/// - `GET /`            - Home page
/// - `GET /u`           - Landing page from query parameters
/// - `GET /{slug}`      - Landing page of a stored record
/// - `GET /sitemap.xml` - Sitemap of all slug pages
/// - `GET /robots.txt`  - Crawler rules
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home_handler))
        .route("/u", get(landing_by_params_handler))
        .route("/sitemap.xml", get(sitemap_handler))
        .route("/robots.txt", get(robots_handler))
        .route("/{slug}", get(landing_by_slug_handler))
}
