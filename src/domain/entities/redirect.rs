//! Redirect record entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Open enumeration of Open Graph content types.
///
/// Any lowercase token made of `[a-z0-9._-]` is accepted; [`ContentType::KNOWN`]
/// only drives the choices offered in the admin form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentType(String);

impl ContentType {
    pub const DEFAULT: &'static str = "website";
    pub const KNOWN: &'static [&'static str] =
        &["website", "article", "product", "video", "book", "profile", "music"];
    pub const MAX_LENGTH: usize = 50;

    /// Parses user input. Blank input yields the default type.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when the value contains characters outside
    /// `[a-z0-9._-]` (after lower-casing) or exceeds [`Self::MAX_LENGTH`].
    pub fn parse(raw: &str) -> Result<Self, String> {
        let value = raw.trim().to_ascii_lowercase();

        if value.is_empty() {
            return Ok(Self::default());
        }

        if value.len() > Self::MAX_LENGTH {
            return Err(format!(
                "Content type must be at most {} characters",
                Self::MAX_LENGTH
            ));
        }

        if !value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '-'))
        {
            return Err("Content type may only contain letters, digits, '.', '_' and '-'".into());
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Display label with the first letter capitalized (`"article"` → `"Article"`).
    pub fn label(&self) -> String {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl Default for ContentType {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Editable part of a redirect record: everything except the slug and timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectFields {
    pub title: String,
    pub description: String,
    pub target_url: String,
    pub image_url: Option<String>,
    pub keywords: Option<String>,
    pub site_name: Option<String>,
    pub content_type: ContentType,
}

impl RedirectFields {
    /// Keyword tags: `keywords` split on commas, trimmed, empty pieces dropped.
    pub fn tags(&self) -> Vec<String> {
        split_keywords(self.keywords.as_deref().unwrap_or_default())
    }
}

/// A persisted redirect record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectRecord {
    pub slug: String,
    pub fields: RedirectFields,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RedirectRecord {
    pub fn new(
        slug: String,
        fields: RedirectFields,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            slug,
            fields,
            created_at,
            updated_at,
        }
    }

    pub fn tags(&self) -> Vec<String> {
        self.fields.tags()
    }
}

/// Input for inserting a record. The slug is already final.
#[derive(Debug, Clone)]
pub struct NewRedirect {
    pub slug: String,
    pub fields: RedirectFields,
}

/// Splits a comma-separated keyword string into trimmed, non-empty tags.
pub fn split_keywords(keywords: &str) -> Vec<String> {
    keywords
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(keywords: Option<&str>) -> RedirectFields {
        RedirectFields {
            title: "Title".to_string(),
            description: "Description".to_string(),
            target_url: "https://example.com".to_string(),
            image_url: None,
            keywords: keywords.map(str::to_string),
            site_name: None,
            content_type: ContentType::default(),
        }
    }

    #[test]
    fn test_content_type_default() {
        assert_eq!(ContentType::default().as_str(), "website");
        assert_eq!(ContentType::parse("   ").unwrap().as_str(), "website");
    }

    #[test]
    fn test_content_type_parse_normalizes_case() {
        assert_eq!(ContentType::parse(" Article ").unwrap().as_str(), "article");
        assert_eq!(ContentType::parse("video.movie").unwrap().as_str(), "video.movie");
    }

    #[test]
    fn test_content_type_parse_rejects_bad_input() {
        assert!(ContentType::parse("<script>").is_err());
        assert!(ContentType::parse("two words").is_err());
        assert!(ContentType::parse(&"x".repeat(51)).is_err());
    }

    #[test]
    fn test_content_type_label() {
        assert_eq!(ContentType::parse("book").unwrap().label(), "Book");
        assert_eq!(ContentType::default().label(), "Website");
    }

    #[test]
    fn test_tags_split_and_trim() {
        let f = fields(Some(" seo, marketing ,,growth hacking , "));
        assert_eq!(f.tags(), vec!["seo", "marketing", "growth hacking"]);
    }

    #[test]
    fn test_tags_without_keywords() {
        assert!(fields(None).tags().is_empty());
        assert!(fields(Some("")).tags().is_empty());
    }

    #[test]
    fn test_record_creation() {
        let now = Utc::now();
        let record = RedirectRecord::new("title".to_string(), fields(Some("a,b")), now, now);

        assert_eq!(record.slug, "title");
        assert_eq!(record.fields.title, "Title");
        assert_eq!(record.tags(), vec!["a", "b"]);
        assert_eq!(record.created_at, now);
    }
}
