//! API route configuration.
//!
//! Every route here sits behind [`crate::api::middleware::auth`] and answers
//! with `Cache-Control: no-cache, no-store, must-revalidate`.

use crate::api::handlers::{
    create_redirect_handler, delete_redirect_by_query_handler, delete_redirect_handler,
    get_redirect_handler, list_redirects_handler, listing_handler, update_redirect_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post},
};

/// All API routes, protected by the admin token.
///
/// # Endpoints
///
/// - `POST   /redirects`                 - Create a record
/// - `GET    /redirects`                 - All records as `slug -> record`
/// - `DELETE /redirects?slug=`           - Delete a record
/// - `GET    /redirects/{slug}`          - One record with its URLs
/// - `PUT    /redirects/{slug}`          - Replace a record's fields
/// - `DELETE /redirects/{slug}`          - Delete a record
/// - `GET    /listing`                   - Filtered/sorted/paginated records
/// - `POST   /create-redirect`           - Legacy alias of create
/// - `GET    /get-redirects`             - Legacy alias of list
/// - `DELETE /delete-redirect?slug=`     - Legacy alias of delete
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/redirects",
            get(list_redirects_handler)
                .post(create_redirect_handler)
                .delete(delete_redirect_by_query_handler),
        )
        .route(
            "/redirects/{slug}",
            get(get_redirect_handler)
                .put(update_redirect_handler)
                .delete(delete_redirect_handler),
        )
        .route("/listing", get(listing_handler))
        .route("/create-redirect", post(create_redirect_handler))
        .route("/get-redirects", get(list_redirects_handler))
        .route("/delete-redirect", delete(delete_redirect_by_query_handler))
}
