//! Landing page handlers: slug mode and parameter mode.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::domain::entities::RedirectRecord;
use crate::domain::landing_page::{LandingPage, PageParams};
use crate::state::AppState;
use crate::utils::slug::is_valid_slug;
use crate::web::handlers::error_page::PageError;

const RELATED_LIMIT: usize = 3;

/// Link to another record shown under "Related".
#[derive(Debug, Clone)]
pub struct RelatedLink {
    pub href: String,
    pub title: String,
    pub type_label: String,
}

impl From<&RedirectRecord> for RelatedLink {
    fn from(record: &RedirectRecord) -> Self {
        Self {
            href: format!("/{}", record.slug),
            title: record.fields.title.clone(),
            type_label: record.fields.content_type.label(),
        }
    }
}

/// Template for `templates/landing.html`.
///
/// Every value reaches the markup through Askama's HTML escaping, including
/// the meta tag attributes.
#[derive(Template, WebTemplate)]
#[template(path = "landing.html")]
pub struct LandingTemplate {
    pub brand: String,
    pub document_title: String,
    pub page: LandingPage,
    pub related: Vec<RelatedLink>,
}

impl LandingTemplate {
    fn new(brand: &str, page: LandingPage, related: Vec<RelatedLink>) -> Self {
        Self {
            brand: brand.to_string(),
            document_title: page.document_title(brand),
            page,
            related,
        }
    }
}

/// Template for `templates/not_found.html`.
#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub brand: String,
    pub slug: String,
}

/// Renders the landing page of a stored record.
///
/// # Endpoint
///
/// `GET /{slug}`
///
/// # Request Flow
///
/// 1. Reject slugs that cannot exist (404 without a store lookup)
/// 2. Check cache for the record
/// 3. On cache miss, query the store and spawn a cache write
/// 4. Render the page with up to three related records
///
/// Unknown slugs render `not_found.html` with status 404. The page never
/// redirects on its own; the visitor follows the "Continue Reading" link.
pub async fn landing_by_slug_handler(
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, PageError> {
    let record = if is_valid_slug(&slug) {
        state.redirect_service.find_cached(&slug).await?
    } else {
        None
    };

    let Some(record) = record else {
        metrics::counter!("page_not_found_total").increment(1);
        let template = NotFoundTemplate {
            brand: state.site.brand.clone(),
            slug,
        };
        return Ok((StatusCode::NOT_FOUND, template).into_response());
    };

    let related = match state.redirect_service.related(&record, RELATED_LIMIT).await {
        Ok(records) => records.iter().map(RelatedLink::from).collect(),
        Err(e) => {
            warn!(error = %e, slug = %record.slug, "Failed to load related records");
            Vec::new()
        }
    };

    metrics::counter!("page_views_total", "mode" => "slug").increment(1);

    let page = LandingPage::from_record(&record);
    Ok(LandingTemplate::new(&state.site.brand, page, related).into_response())
}

/// Renders a landing page entirely from query parameters.
///
/// # Endpoint
///
/// `GET /u?title=&desc=&url=&image=&keywords=&site_name=&type=`
///
/// Missing values use the documented defaults (`"Redirect Page"`,
/// `"This is a redirect page"`, `/`, `website`). Nothing is read from the store.
pub async fn landing_by_params_handler(
    Query(params): Query<PageParams>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    metrics::counter!("page_views_total", "mode" => "params").increment(1);

    let page = LandingPage::from_params(&params);
    LandingTemplate::new(&state.site.brand, page, Vec::new())
}
