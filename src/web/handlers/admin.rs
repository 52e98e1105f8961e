//! Admin page: listing with filter/sort/pagination plus the create/edit form.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State, rejection::QueryRejection},
    response::IntoResponse,
};
use url::form_urlencoded;

use crate::api::dto::listing::ListingParams;
use crate::domain::entities::{ContentType, RedirectRecord};
use crate::domain::listing::{ListingQuery, SortKey, SortOrder};
use crate::error::AppError;
use crate::state::AppState;
use crate::web::handlers::error_page::PageError;

const EXCERPT_CHARS: usize = 80;
const PAGE_SIZES: [usize; 4] = [10, 25, 50, 100];

/// One table row. The raw field values travel in `data-*` attributes so the
/// edit button can fill the form without another request.
#[derive(Debug, Clone)]
pub struct AdminRow {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub excerpt: String,
    pub target_url: String,
    pub image_url: String,
    pub keywords: String,
    pub site_name: String,
    pub content_type: String,
    pub short_url: String,
    pub long_url: String,
}

/// Entry of the rows-per-page selector.
#[derive(Debug, Clone, Copy)]
pub struct PageSizeOption {
    pub value: usize,
    pub selected: bool,
}

/// Clickable column header.
#[derive(Debug, Clone)]
pub struct SortLink {
    pub label: &'static str,
    pub href: String,
    /// `"▲"`, `"▼"` or empty for inactive columns.
    pub indicator: &'static str,
}

#[derive(Template, WebTemplate)]
#[template(path = "admin.html")]
pub struct AdminTemplate {
    pub brand: String,
    pub search: String,
    pub type_filter: String,
    pub sort: String,
    pub order: String,
    pub page_size: usize,
    pub page_size_options: Vec<PageSizeOption>,
    pub type_options: Vec<String>,
    pub sort_links: Vec<SortLink>,
    pub rows: Vec<AdminRow>,
    pub total: usize,
    pub page: usize,
    pub total_pages: usize,
    pub prev_href: String,
    pub next_href: String,
    pub auth_enabled: bool,
}

/// Renders the admin page.
///
/// # Endpoint
///
/// `GET /admin?q=&type=&sort=&order=&page=&page_size=`
///
/// The listing is computed server side from the full record list on every
/// request. Mutations go through the JSON API from `static/admin.js`, which
/// reloads the page afterwards.
pub async fn admin_handler(
    params: Result<Query<ListingParams>, QueryRejection>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, PageError> {
    let Query(params) = params.map_err(AppError::from)?;
    let query = params.to_query(state.site.page_size);
    let listing = state.redirect_service.listing(&query).await?;

    // Echo the clamped values so links stay consistent.
    let query = ListingQuery {
        page: listing.page,
        page_size: listing.page_size,
        ..query
    };

    let rows = listing
        .items
        .iter()
        .map(|record| admin_row(&state, record))
        .collect();

    let prev_href = if listing.page > 1 {
        admin_href(&ListingQuery {
            page: listing.page - 1,
            ..query.clone()
        })
    } else {
        String::new()
    };

    let next_href = if listing.page < listing.total_pages {
        admin_href(&ListingQuery {
            page: listing.page + 1,
            ..query.clone()
        })
    } else {
        String::new()
    };

    Ok(AdminTemplate {
        brand: state.site.brand.clone(),
        search: query.search.clone(),
        type_filter: query.content_type.clone(),
        sort: query.sort.as_str().to_string(),
        order: query.order.as_str().to_string(),
        page_size: query.page_size,
        page_size_options: page_size_options(query.page_size),
        type_options: type_options(&query.content_type),
        sort_links: sort_links(&query),
        rows,
        total: listing.total,
        page: listing.page,
        total_pages: listing.total_pages,
        prev_href,
        next_href,
        auth_enabled: state.auth_service.is_enabled(),
    })
}

fn admin_row(state: &AppState, record: &RedirectRecord) -> AdminRow {
    let fields = &record.fields;

    AdminRow {
        slug: record.slug.clone(),
        title: fields.title.clone(),
        description: fields.description.clone(),
        excerpt: excerpt(&fields.description, EXCERPT_CHARS),
        target_url: fields.target_url.clone(),
        image_url: fields.image_url.clone().unwrap_or_default(),
        keywords: fields.keywords.clone().unwrap_or_default(),
        site_name: fields.site_name.clone().unwrap_or_default(),
        content_type: fields.content_type.to_string(),
        short_url: state.redirect_service.short_url(&record.slug),
        long_url: state.redirect_service.long_url(fields),
    }
}

/// Known content types, plus the active filter when it is not one of them.
fn type_options(active: &str) -> Vec<String> {
    let mut options: Vec<String> = ContentType::KNOWN.iter().map(|t| t.to_string()).collect();
    let active = active.trim().to_ascii_lowercase();
    if !active.is_empty() && !options.contains(&active) {
        options.push(active);
    }
    options
}

/// Fixed choices, plus the active size when it is not one of them.
fn page_size_options(active: usize) -> Vec<PageSizeOption> {
    let mut sizes = PAGE_SIZES.to_vec();
    if !sizes.contains(&active) {
        sizes.push(active);
        sizes.sort_unstable();
    }
    sizes
        .into_iter()
        .map(|value| PageSizeOption {
            value,
            selected: value == active,
        })
        .collect()
}

fn sort_links(query: &ListingQuery) -> Vec<SortLink> {
    [
        (SortKey::Title, "Title"),
        (SortKey::Type, "Type"),
        (SortKey::Slug, "Slug"),
    ]
    .into_iter()
    .map(|(key, label)| {
        let active = query.sort == key;
        let order = if active {
            query.order.reversed()
        } else {
            SortOrder::Asc
        };
        let indicator = match (active, query.order) {
            (false, _) => "",
            (true, SortOrder::Asc) => "▲",
            (true, SortOrder::Desc) => "▼",
        };

        SortLink {
            label,
            href: admin_href(&ListingQuery {
                sort: key,
                order,
                page: 1,
                ..query.clone()
            }),
            indicator,
        }
    })
    .collect()
}

/// `/admin?…` for a listing state. Blank filters are omitted.
fn admin_href(query: &ListingQuery) -> String {
    let mut qs = form_urlencoded::Serializer::new(String::new());

    if !query.search.trim().is_empty() {
        qs.append_pair("q", &query.search);
    }
    if !query.content_type.trim().is_empty() {
        qs.append_pair("type", &query.content_type);
    }
    qs.append_pair("sort", query.sort.as_str())
        .append_pair("order", query.order.as_str())
        .append_pair("page", &query.page.to_string())
        .append_pair("page_size", &query.page_size.to_string());

    format!("/admin?{}", qs.finish())
}

fn excerpt(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}…", head.trim_end())
    } else {
        head
    }
}
