//! View model for the redirect landing page.
//!
//! Both rendering modes end up here: slug mode builds a [`LandingPage`] from a
//! stored [`RedirectRecord`], parameter mode from raw query values with
//! documented defaults. Templates only ever see the sanitized result.

use crate::domain::entities::{ContentType, RedirectRecord, split_keywords};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_TITLE: &str = "Redirect Page";
pub const DEFAULT_DESCRIPTION: &str = "This is a redirect page";
pub const DEFAULT_TARGET_URL: &str = "/";

/// Raw query parameters of `GET /u`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    pub title: Option<String>,
    pub desc: Option<String>,
    pub url: Option<String>,
    pub image: Option<String>,
    pub keywords: Option<String>,
    pub site_name: Option<String>,
    #[serde(rename = "type")]
    pub content_type: Option<String>,
}

/// Everything the landing template needs, already defaulted and sanitized.
///
/// Optional values are empty strings when absent so templates can test them
/// with `is_empty()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandingPage {
    pub title: String,
    pub description: String,
    pub target_url: String,
    pub image_url: String,
    pub keywords: String,
    pub tags: Vec<String>,
    pub site_name: String,
    /// `og:type` value.
    pub content_type: String,
    pub published_at: Option<DateTime<Utc>>,
}

impl LandingPage {
    /// Slug mode.
    pub fn from_record(record: &RedirectRecord) -> Self {
        let fields = &record.fields;
        Self {
            title: fields.title.clone(),
            description: fields.description.clone(),
            target_url: safe_target_url(&fields.target_url),
            image_url: fields
                .image_url
                .as_deref()
                .and_then(safe_image_url)
                .unwrap_or_default(),
            keywords: fields.keywords.clone().unwrap_or_default(),
            tags: fields.tags(),
            site_name: fields.site_name.clone().unwrap_or_default(),
            content_type: fields.content_type.to_string(),
            published_at: Some(record.created_at),
        }
    }

    /// Parameter mode. Missing or blank values fall back to the defaults.
    pub fn from_params(params: &PageParams) -> Self {
        let title = non_empty(params.title.as_deref()).unwrap_or(DEFAULT_TITLE);
        let description = non_empty(params.desc.as_deref()).unwrap_or(DEFAULT_DESCRIPTION);
        let target_url = non_empty(params.url.as_deref())
            .map(safe_target_url)
            .unwrap_or_else(|| DEFAULT_TARGET_URL.to_string());
        let image_url = non_empty(params.image.as_deref())
            .and_then(safe_image_url)
            .unwrap_or_default();
        let keywords = non_empty(params.keywords.as_deref()).unwrap_or_default();
        let site_name = non_empty(params.site_name.as_deref()).unwrap_or_default();
        let content_type =
            non_empty(params.content_type.as_deref()).unwrap_or(ContentType::DEFAULT);

        Self {
            title: title.to_string(),
            description: description.to_string(),
            target_url,
            image_url,
            keywords: keywords.to_string(),
            tags: split_keywords(keywords),
            site_name: site_name.to_string(),
            content_type: content_type.to_string(),
            published_at: None,
        }
    }

    /// `"<title> | <brand>"`.
    pub fn document_title(&self, brand: &str) -> String {
        format!("{} | {}", self.title, brand)
    }

    /// `og:type` with the first letter capitalized.
    pub fn type_label(&self) -> String {
        let mut chars = self.content_type.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Human-readable publication date, e.g. `"March 4, 2026"`.
    pub fn published_label(&self) -> String {
        self.published_at
            .map(|t| t.format("%B %-d, %Y").to_string())
            .unwrap_or_default()
    }

    /// RFC 3339 timestamp for the `<time datetime>` attribute.
    pub fn published_iso(&self) -> String {
        self.published_at
            .map(|t| t.to_rfc3339())
            .unwrap_or_default()
    }
}

/// Query values are used verbatim; only missing or empty ones get defaults.
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Returns `true` for absolute `http`/`https` URLs with a host.
pub fn is_http_url(value: &str) -> bool {
    Url::parse(value)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
        .unwrap_or(false)
}

/// Keeps absolute http(s) URLs and same-origin absolute paths; anything else
/// (`javascript:`, `data:`, protocol-relative `//host`) becomes `/`.
pub fn safe_target_url(value: &str) -> String {
    let value = value.trim();

    let same_origin_path =
        value.starts_with('/') && !value.starts_with("//") && !value.starts_with("/\\");

    if same_origin_path || is_http_url(value) {
        value.to_string()
    } else {
        DEFAULT_TARGET_URL.to_string()
    }
}

fn safe_image_url(value: &str) -> Option<String> {
    let value = value.trim();
    is_http_url(value).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::RedirectFields;

    fn params(pairs: &[(&str, &str)]) -> PageParams {
        let mut p = PageParams::default();
        for (k, v) in pairs {
            let v = Some(v.to_string());
            match *k {
                "title" => p.title = v,
                "desc" => p.desc = v,
                "url" => p.url = v,
                "image" => p.image = v,
                "keywords" => p.keywords = v,
                "site_name" => p.site_name = v,
                "type" => p.content_type = v,
                _ => unreachable!(),
            }
        }
        p
    }

    #[test]
    fn test_from_params_defaults() {
        let page = LandingPage::from_params(&PageParams::default());

        assert_eq!(page.title, DEFAULT_TITLE);
        assert_eq!(page.description, DEFAULT_DESCRIPTION);
        assert_eq!(page.target_url, "/");
        assert_eq!(page.content_type.as_str(), "website");
        assert!(page.image_url.is_empty());
        assert!(page.tags.is_empty());
        assert!(page.published_at.is_none());
    }

    #[test]
    fn test_from_params_literal_values() {
        let page = LandingPage::from_params(&params(&[
            ("title", "Ten SEO Tips"),
            ("desc", "Grow your traffic"),
            ("url", "https://blog.example.com/seo"),
            ("image", "https://cdn.example.com/a.png"),
            ("keywords", "seo, growth"),
            ("site_name", "Example Blog"),
            ("type", "article"),
        ]));

        assert_eq!(page.title, "Ten SEO Tips");
        assert_eq!(page.description, "Grow your traffic");
        assert_eq!(page.target_url, "https://blog.example.com/seo");
        assert_eq!(page.image_url, "https://cdn.example.com/a.png");
        assert_eq!(page.tags, vec!["seo", "growth"]);
        assert_eq!(page.site_name, "Example Blog");
        assert_eq!(page.type_label(), "Article");
    }

    #[test]
    fn test_from_params_empty_values_use_defaults() {
        let page = LandingPage::from_params(&params(&[("title", ""), ("type", "")]));
        assert_eq!(page.title, DEFAULT_TITLE);
        assert_eq!(page.content_type, "website");
    }

    #[test]
    fn test_from_params_whitespace_values_are_literal() {
        let page = LandingPage::from_params(&params(&[("title", "   "), ("desc", " ")]));
        assert_eq!(page.title, "   ");
        assert_eq!(page.description, " ");
    }

    #[test]
    fn test_unsafe_targets_are_replaced() {
        for bad in ["javascript:alert(1)", "data:text/html,x", "//evil.com", "ftp://x.org/f"] {
            let page = LandingPage::from_params(&params(&[("url", bad)]));
            assert_eq!(page.target_url, "/", "{bad}");
        }
    }

    #[test]
    fn test_relative_path_target_is_kept() {
        assert_eq!(safe_target_url("/pricing?plan=pro"), "/pricing?plan=pro");
    }

    #[test]
    fn test_non_http_image_is_dropped() {
        let page = LandingPage::from_params(&params(&[("image", "javascript:x")]));
        assert!(page.image_url.is_empty());
    }

    #[test]
    fn test_type_is_rendered_literally() {
        for raw in ["Article", "video movie", "<b>"] {
            let page = LandingPage::from_params(&params(&[("type", raw)]));
            assert_eq!(page.content_type, raw);
        }

        let page = LandingPage::from_params(&params(&[("type", "video.movie")]));
        assert_eq!(page.type_label(), "Video.movie");
    }

    #[test]
    fn test_from_record_keeps_exact_strings() {
        let now = Utc::now();
        let record = RedirectRecord::new(
            "a-b".to_string(),
            RedirectFields {
                title: "  Exact <Title> & more ".to_string(),
                description: "Exact description".to_string(),
                target_url: "https://example.com".to_string(),
                image_url: None,
                keywords: Some("x, y".to_string()),
                site_name: Some("Site".to_string()),
                content_type: ContentType::parse("book").unwrap(),
            },
            now,
            now,
        );

        let page = LandingPage::from_record(&record);
        assert_eq!(page.title, "  Exact <Title> & more ");
        assert_eq!(page.description, "Exact description");
        assert_eq!(page.tags, vec!["x", "y"]);
        assert_eq!(page.published_at, Some(now));
    }

    #[test]
    fn test_document_title() {
        let page = LandingPage::from_params(&params(&[("title", "Hello")]));
        assert_eq!(page.document_title("seo360"), "Hello | seo360");
    }
}
