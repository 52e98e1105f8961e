//! DTOs for the redirect record endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use validator::Validate;

use crate::application::services::{PublishedRedirect, RedirectInput};
use crate::domain::entities::RedirectRecord;

/// Request body for create and update.
///
/// Field names follow the admin form: `desc`, `url`, `image`, `type`.
/// `slug` is only read on create.
///
/// ```json
/// {
///   "title": "Ten SEO Tips",
///   "desc": "Grow your traffic",
///   "url": "https://blog.example.com/seo",
///   "image": "https://cdn.example.com/cover.png",
///   "keywords": "seo, growth",
///   "site_name": "Example Blog",
///   "type": "article",
///   "slug": "seo-tips"
/// }
/// ```
#[derive(Debug, Default, Deserialize, Validate)]
pub struct RedirectRequest {
    #[validate(length(max = 300, message = "Title must be at most 300 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub desc: Option<String>,

    #[validate(length(max = 2048, message = "URL must be at most 2048 characters"))]
    pub url: Option<String>,

    #[validate(length(max = 2048, message = "Image URL must be at most 2048 characters"))]
    pub image: Option<String>,

    #[validate(length(max = 500, message = "Keywords must be at most 500 characters"))]
    pub keywords: Option<String>,

    #[validate(length(max = 200, message = "Site name must be at most 200 characters"))]
    pub site_name: Option<String>,

    #[serde(rename = "type")]
    pub content_type: Option<String>,

    #[validate(length(max = 100, message = "Slug must be at most 100 characters"))]
    pub slug: Option<String>,
}

impl From<RedirectRequest> for RedirectInput {
    fn from(req: RedirectRequest) -> Self {
        RedirectInput {
            title: req.title.unwrap_or_default(),
            description: req.desc.unwrap_or_default(),
            target_url: req.url.unwrap_or_default(),
            image_url: req.image,
            keywords: req.keywords,
            site_name: req.site_name,
            content_type: req.content_type,
            slug: req.slug,
        }
    }
}

/// Response of a successful create.
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub slug: String,
    /// Slug-based URL.
    pub short: String,
    /// Parameter-based URL.
    pub long: String,
}

impl From<PublishedRedirect> for CreatedResponse {
    fn from(published: PublishedRedirect) -> Self {
        Self {
            slug: published.record.slug,
            short: published.short_url,
            long: published.long_url,
        }
    }
}

/// JSON shape of a stored record, using the same field names as the request.
#[derive(Debug, Serialize)]
pub struct RecordResponse {
    pub slug: String,
    pub title: String,
    pub desc: String,
    pub url: String,
    pub image: Option<String>,
    pub keywords: Option<String>,
    pub site_name: Option<String>,
    #[serde(rename = "type")]
    pub content_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&RedirectRecord> for RecordResponse {
    fn from(record: &RedirectRecord) -> Self {
        let fields = &record.fields;
        Self {
            slug: record.slug.clone(),
            title: fields.title.clone(),
            desc: fields.description.clone(),
            url: fields.target_url.clone(),
            image: fields.image_url.clone(),
            keywords: fields.keywords.clone(),
            site_name: fields.site_name.clone(),
            content_type: fields.content_type.to_string(),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Record plus its URL forms, returned by read-one and update.
#[derive(Debug, Serialize)]
pub struct PublishedResponse {
    #[serde(flatten)]
    pub record: RecordResponse,
    pub short: String,
    pub long: String,
}

impl From<PublishedRedirect> for PublishedResponse {
    fn from(published: PublishedRedirect) -> Self {
        Self {
            record: RecordResponse::from(&published.record),
            short: published.short_url,
            long: published.long_url,
        }
    }
}

/// `slug -> record` object preserving store insertion order.
#[derive(Debug)]
pub struct RedirectMap(pub Vec<RedirectRecord>);

impl Serialize for RedirectMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(
            self.0
                .iter()
                .map(|record| (record.slug.as_str(), RecordResponse::from(record))),
        )
    }
}

/// `?slug=` query of the delete-by-query endpoints.
#[derive(Debug, Deserialize)]
pub struct SlugQuery {
    pub slug: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{ContentType, RedirectFields};

    fn record(slug: &str) -> RedirectRecord {
        let now = Utc::now();
        RedirectRecord::new(
            slug.to_string(),
            RedirectFields {
                title: format!("Title {slug}"),
                description: "d".to_string(),
                target_url: "https://example.com".to_string(),
                image_url: None,
                keywords: Some("a, b".to_string()),
                site_name: None,
                content_type: ContentType::parse("article").unwrap(),
            },
            now,
            now,
        )
    }

    #[test]
    fn test_request_uses_form_field_names() {
        let req: RedirectRequest = serde_json::from_str(
            r#"{"title":"T","desc":"D","url":"https://x.io","type":"book","slug":"s","image":null}"#,
        )
        .unwrap();
        let input = RedirectInput::from(req);

        assert_eq!(input.description, "D");
        assert_eq!(input.target_url, "https://x.io");
        assert_eq!(input.content_type.as_deref(), Some("book"));
        assert_eq!(input.slug.as_deref(), Some("s"));
        assert!(input.image_url.is_none());
    }

    #[test]
    fn test_request_length_limits() {
        let req = RedirectRequest {
            slug: Some("x".repeat(101)),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_record_response_shape() {
        let value = serde_json::to_value(RecordResponse::from(&record("a"))).unwrap();

        assert_eq!(value["desc"], "d");
        assert_eq!(value["url"], "https://example.com");
        assert_eq!(value["type"], "article");
        assert!(value["image"].is_null());
    }

    #[test]
    fn test_redirect_map_keeps_order() {
        let map = RedirectMap(vec![record("zeta"), record("alpha")]);
        let json = serde_json::to_string(&map).unwrap();

        let zeta = json.find("\"zeta\":").unwrap();
        let alpha = json.find("\"alpha\":").unwrap();
        assert!(zeta < alpha);
    }
}
