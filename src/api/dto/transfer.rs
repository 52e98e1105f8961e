//! Backup file format used by the admin CLI import and export.
//!
//! ```json
//! {
//!   "seo-tips": {
//!     "title": "Ten SEO Tips",
//!     "desc": "Grow your traffic",
//!     "url": "https://blog.example.com/seo",
//!     "image": "https://cdn.example.com/cover.png",
//!     "keywords": "seo, growth",
//!     "site_name": "Example Blog",
//!     "type": "article"
//!   }
//! }
//! ```
//!
//! Entries keep file order in both directions, so an export re-imports in
//! store insertion order.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use validator::Validate;

use crate::api::dto::redirect::RedirectRequest;
use crate::application::services::RedirectInput;
use crate::domain::entities::RedirectRecord;
use crate::error::AppError;

/// Parsed backup file: `key -> record` in file order.
#[derive(Debug, Default)]
pub struct RedirectFile(pub Vec<(String, RedirectRequest)>);

impl RedirectFile {
    /// Validates every entry against the API length limits.
    ///
    /// The object key is the slug, so a `slug` field inside an entry is ignored.
    pub fn into_inputs(self) -> Vec<(String, Result<RedirectInput, AppError>)> {
        self.0
            .into_iter()
            .map(|(key, request)| {
                let input = request
                    .validate()
                    .map_err(AppError::from)
                    .map(|()| RedirectInput::from(request));
                (key, input)
            })
            .collect()
    }
}

impl<'de> Deserialize<'de> for RedirectFile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FileVisitor;

        impl<'de> Visitor<'de> for FileVisitor {
            type Value = RedirectFile;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a JSON object of slug -> record")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, RedirectRequest>()? {
                    entries.push(entry);
                }
                Ok(RedirectFile(entries))
            }
        }

        deserializer.deserialize_map(FileVisitor)
    }
}

/// One exported entry. Absent optional values are written as empty strings.
#[derive(Debug, Serialize)]
pub struct ExportEntry<'a> {
    pub title: &'a str,
    pub desc: &'a str,
    pub url: &'a str,
    pub image: &'a str,
    pub keywords: &'a str,
    pub site_name: &'a str,
    #[serde(rename = "type")]
    pub content_type: &'a str,
}

impl<'a> From<&'a RedirectRecord> for ExportEntry<'a> {
    fn from(record: &'a RedirectRecord) -> Self {
        let fields = &record.fields;
        Self {
            title: &fields.title,
            desc: &fields.description,
            url: &fields.target_url,
            image: fields.image_url.as_deref().unwrap_or_default(),
            keywords: fields.keywords.as_deref().unwrap_or_default(),
            site_name: fields.site_name.as_deref().unwrap_or_default(),
            content_type: fields.content_type.as_str(),
        }
    }
}

/// Records written as a backup file in the given order.
#[derive(Debug)]
pub struct ExportFile<'a>(pub &'a [RedirectRecord]);

impl Serialize for ExportFile<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(
            self.0
                .iter()
                .map(|record| (record.slug.as_str(), ExportEntry::from(record))),
        )
    }
}
