//! Query parameters and response of the listing endpoint.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use crate::api::dto::redirect::RecordResponse;
use crate::domain::listing::{ListingPage, ListingQuery, SortKey, SortOrder};

/// Query parameters shared by `GET /api/listing` and `GET /admin`.
///
/// Unknown `sort`/`order` values fall back to the defaults instead of failing,
/// so stale bookmarks keep working.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct ListingParams {
    #[serde(default)]
    pub q: Option<String>,

    #[serde(default, rename = "type")]
    pub content_type: Option<String>,

    #[serde(default)]
    pub sort: Option<String>,

    #[serde(default)]
    pub order: Option<String>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<usize>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page_size: Option<usize>,
}

impl ListingParams {
    /// Converts to a [`ListingQuery`]; clamping happens in
    /// [`crate::domain::listing::apply`].
    pub fn to_query(&self, default_page_size: usize) -> ListingQuery {
        let sort = match self.sort.as_deref() {
            Some("title") => SortKey::Title,
            Some("type") => SortKey::Type,
            _ => SortKey::Slug,
        };
        let order = match self.order.as_deref() {
            Some("desc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        };

        ListingQuery {
            search: self.q.clone().unwrap_or_default(),
            content_type: self.content_type.clone().unwrap_or_default(),
            sort,
            order,
            page: self.page.unwrap_or(1),
            page_size: self.page_size.unwrap_or(default_page_size),
        }
    }
}

/// One page of the listing.
#[derive(Debug, Serialize)]
pub struct ListingResponse {
    pub items: Vec<RecordResponse>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

impl From<ListingPage> for ListingResponse {
    fn from(page: ListingPage) -> Self {
        Self {
            items: page.items.iter().map(RecordResponse::from).collect(),
            total: page.total,
            page: page.page,
            page_size: page.page_size,
            total_pages: page.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let query = ListingParams::default().to_query(10);

        assert_eq!(query, ListingQuery::default());
    }

    #[test]
    fn test_parses_sort_and_order() {
        let params = ListingParams {
            sort: Some("title".to_string()),
            order: Some("desc".to_string()),
            page: Some(3),
            page_size: Some(25),
            ..Default::default()
        };
        let query = params.to_query(10);

        assert_eq!(query.sort, SortKey::Title);
        assert_eq!(query.order, SortOrder::Desc);
        assert_eq!(query.page, 3);
        assert_eq!(query.page_size, 25);
    }

    #[test]
    fn test_unknown_sort_falls_back() {
        let params = ListingParams {
            sort: Some("created".to_string()),
            order: Some("sideways".to_string()),
            ..Default::default()
        };
        let query = params.to_query(10);

        assert_eq!(query.sort, SortKey::Slug);
        assert_eq!(query.order, SortOrder::Asc);
    }

    #[test]
    fn test_page_from_query_string() {
        let params: ListingParams =
            serde_json::from_value(serde_json::json!({ "page": "2", "type": "book" })).unwrap();

        assert_eq!(params.page, Some(2));
        assert_eq!(params.content_type.as_deref(), Some("book"));
    }
}
