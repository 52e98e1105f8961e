//! Handlers for redirect record management (create, read, update, delete).

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::listing::{ListingParams, ListingResponse};
use crate::api::dto::redirect::{
    CreatedResponse, PublishedResponse, RedirectMap, RedirectRequest, SlugQuery,
};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a redirect record.
///
/// # Endpoint
///
/// `POST /api/redirects` (legacy alias `POST /api/create-redirect`)
///
/// The slug is derived from `title` unless `slug` is supplied. An existing
/// slug is never overwritten.
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "slug": "ten-seo-tips",
///   "short": "https://seo.example.com/ten-seo-tips",
///   "long": "https://seo.example.com/u?title=Ten+SEO+Tips&desc=...&type=article"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 if a required field is blank or malformed, 409 if the slug is taken.
pub async fn create_redirect_handler(
    State(state): State<AppState>,
    payload: Result<Json<RedirectRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let published = state.redirect_service.create(payload.into()).await?;

    Ok((StatusCode::CREATED, Json(published.into())))
}

/// Returns every record as a `slug -> record` object in insertion order.
///
/// # Endpoint
///
/// `GET /api/redirects` (legacy alias `GET /api/get-redirects`)
pub async fn list_redirects_handler(
    State(state): State<AppState>,
) -> Result<Json<RedirectMap>, AppError> {
    let records = state.redirect_service.list().await?;
    Ok(Json(RedirectMap(records)))
}

/// Returns one record with its URL forms.
///
/// # Endpoint
///
/// `GET /api/redirects/{slug}`
///
/// # Errors
///
/// Returns 404 if the slug is unknown.
pub async fn get_redirect_handler(
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<PublishedResponse>, AppError> {
    let record = state.redirect_service.get(&slug).await?;
    Ok(Json(state.redirect_service.publish(record).into()))
}

/// Replaces the fields of a record. The slug in the body, if any, is ignored.
///
/// # Endpoint
///
/// `PUT /api/redirects/{slug}`
///
/// # Cache
///
/// The cached landing page record is invalidated so the next view reflects
/// the new values.
///
/// # Errors
///
/// Returns 404 if the slug is unknown, 400 on invalid input.
pub async fn update_redirect_handler(
    Path(slug): Path<String>,
    State(state): State<AppState>,
    payload: Result<Json<RedirectRequest>, JsonRejection>,
) -> Result<Json<PublishedResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let published = state.redirect_service.update(&slug, payload.into()).await?;

    Ok(Json(published.into()))
}

/// Deletes a record by path.
///
/// # Endpoint
///
/// `DELETE /api/redirects/{slug}`
///
/// # Errors
///
/// Returns 404 if the slug is unknown.
pub async fn delete_redirect_handler(
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.redirect_service.delete(&slug).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Deletes a record by query parameter.
///
/// # Endpoint
///
/// `DELETE /api/redirects?slug=<slug>` (legacy alias `DELETE /api/delete-redirect?slug=<slug>`)
///
/// # Errors
///
/// Returns 400 if `slug` is missing, 404 if it is unknown.
pub async fn delete_redirect_by_query_handler(
    query: Result<Query<SlugQuery>, QueryRejection>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let Query(query) = query?;
    let slug = query
        .slug
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| {
            AppError::bad_request("Missing slug", json!({ "fields": { "slug": ["Slug is required"] } }))
        })?;

    state.redirect_service.delete(&slug).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Filtered, sorted, paginated record list.
///
/// # Endpoint
///
/// `GET /api/listing?q=&type=&sort=title|type|slug&order=asc|desc&page=&page_size=`
///
/// The page index is clamped into range, so a page number that became too
/// large after narrowing the filter returns the last page.
pub async fn listing_handler(
    params: Result<Query<ListingParams>, QueryRejection>,
    State(state): State<AppState>,
) -> Result<Json<ListingResponse>, AppError> {
    let Query(params) = params?;
    let query = params.to_query(state.site.page_size);
    let page = state.redirect_service.listing(&query).await?;

    Ok(Json(page.into()))
}
