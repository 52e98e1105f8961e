//! Filtering, sorting and pagination of the record list.
//!
//! Everything here is pure and operates on the full list returned by the store;
//! the admin page and `/api/listing` recompute it on every request.

use crate::domain::entities::RedirectRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 100;

/// Column used for ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Title,
    Type,
    /// Stand-in for insertion order.
    #[default]
    Slug,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Title => "title",
            SortKey::Type => "type",
            SortKey::Slug => "slug",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn reversed(&self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// Listing parameters. Blank `search`/`content_type` disable the filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub search: String,
    pub content_type: String,
    pub sort: SortKey,
    pub order: SortOrder,
    /// 1-based; clamped into range by [`apply`].
    pub page: usize,
    pub page_size: usize,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            content_type: String::new(),
            sort: SortKey::default(),
            order: SortOrder::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of filtered, sorted records.
#[derive(Debug, Clone)]
pub struct ListingPage {
    pub items: Vec<RedirectRecord>,
    /// Number of records matching the filters (all pages).
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

/// Case-insensitive substring match against slug, title and description.
pub fn matches_search(record: &RedirectRecord, needle_lower: &str) -> bool {
    if needle_lower.is_empty() {
        return true;
    }

    record.slug.to_lowercase().contains(needle_lower)
        || record.fields.title.to_lowercase().contains(needle_lower)
        || record.fields.description.to_lowercase().contains(needle_lower)
}

fn compare(a: &RedirectRecord, b: &RedirectRecord, key: SortKey) -> Ordering {
    match key {
        SortKey::Title => a
            .fields
            .title
            .to_lowercase()
            .cmp(&b.fields.title.to_lowercase()),
        SortKey::Type => a.fields.content_type.cmp(&b.fields.content_type),
        SortKey::Slug => a.slug.cmp(&b.slug),
    }
}

/// Filters, sorts and paginates `records`.
///
/// The page size is clamped to `1..=MAX_PAGE_SIZE` and the page index to
/// `1..=total_pages`, where `total_pages` is at least 1 even for an empty result.
pub fn apply(records: &[RedirectRecord], query: &ListingQuery) -> ListingPage {
    let needle = query.search.trim().to_lowercase();
    let type_filter = query.content_type.trim().to_ascii_lowercase();

    let mut filtered: Vec<&RedirectRecord> = records
        .iter()
        .filter(|r| matches_search(r, &needle))
        .filter(|r| type_filter.is_empty() || r.fields.content_type.as_str() == type_filter)
        .collect();

    filtered.sort_by(|a, b| {
        let ordering = compare(a, b, query.sort).then_with(|| a.slug.cmp(&b.slug));
        match query.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });

    let page_size = query.page_size.clamp(1, MAX_PAGE_SIZE);
    let total = filtered.len();
    let total_pages = total.div_ceil(page_size).max(1);
    let page = query.page.clamp(1, total_pages);

    let items = filtered
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .cloned()
        .collect();

    ListingPage {
        items,
        total,
        page,
        page_size,
        total_pages,
    }
}

/// Records sharing at least one keyword tag with `tags`, excluding `current_slug`.
///
/// Ordered by number of shared tags (descending), then slug.
pub fn related(
    records: &[RedirectRecord],
    current_slug: &str,
    tags: &[String],
    limit: usize,
) -> Vec<RedirectRecord> {
    let wanted: HashSet<String> = tags.iter().map(|t| t.to_lowercase()).collect();
    if wanted.is_empty() || limit == 0 {
        return Vec::new();
    }

    let mut scored: Vec<(usize, &RedirectRecord)> = records
        .iter()
        .filter(|r| r.slug != current_slug)
        .filter_map(|r| {
            let shared = r
                .tags()
                .iter()
                .map(|t| t.to_lowercase())
                .collect::<HashSet<_>>()
                .intersection(&wanted)
                .count();
            (shared > 0).then_some((shared, r))
        })
        .collect();

    scored.sort_by(|(sa, ra), (sb, rb)| sb.cmp(sa).then_with(|| ra.slug.cmp(&rb.slug)));

    scored
        .into_iter()
        .take(limit)
        .map(|(_, r)| r.clone())
        .collect()
}
