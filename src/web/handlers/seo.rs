//! `sitemap.xml` and `robots.txt`.

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use std::fmt::Write;

use crate::domain::entities::RedirectRecord;
use crate::state::AppState;
use crate::web::handlers::error_page::PageError;

/// Lists the home page and every slug page.
///
/// # Endpoint
///
/// `GET /sitemap.xml` (`GET /api/sitemap` redirects here)
///
/// Cached by clients and CDNs for one hour.
pub async fn sitemap_handler(State(state): State<AppState>) -> Result<impl IntoResponse, PageError> {
    let records = state.redirect_service.list().await?;
    let xml = build_sitemap(&state.site.base_url, &records);

    Ok((
        [
            (header::CONTENT_TYPE, "application/xml; charset=utf-8"),
            (header::CACHE_CONTROL, "public, max-age=3600, s-maxage=3600"),
        ],
        xml,
    ))
}

/// Crawler rules: everything but the admin surface, plus the sitemap link.
///
/// # Endpoint
///
/// `GET /robots.txt`
pub async fn robots_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (header::CACHE_CONTROL, "public, max-age=86400"),
        ],
        build_robots(&state.site.base_url),
    )
}

pub fn build_robots(base_url: &str) -> String {
    let mut body = String::new();
    body.push_str("User-agent: *\n");
    body.push_str("Disallow: /admin\n");
    body.push_str("Disallow: /api/\n");
    body.push_str("Allow: /\n\n");
    let _ = writeln!(body, "Sitemap: {}/sitemap.xml", base_url);
    body
}

/// Home entry first, then slug pages sorted by URL.
///
/// The home page `lastmod` is the most recent record update.
pub fn build_sitemap(base_url: &str, records: &[RedirectRecord]) -> String {
    let mut entries: Vec<(String, Option<DateTime<Utc>>)> = records
        .iter()
        .map(|r| (format!("{}/{}", base_url, r.slug), Some(r.updated_at)))
        .collect();
    entries.sort_by(|left, right| left.0.cmp(&right.0));

    let newest = records.iter().map(|r| r.updated_at).max();
    entries.insert(0, (format!("{}/", base_url), newest));

    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n");

    for (loc, lastmod) in entries {
        xml.push_str("  <url>\n");
        let _ = writeln!(xml, "    <loc>{}</loc>", escape_xml(&loc));
        if let Some(lastmod) = lastmod {
            let _ = writeln!(xml, "    <lastmod>{}</lastmod>", lastmod.format("%Y-%m-%d"));
        }
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{ContentType, RedirectFields};
    use chrono::TimeZone;

    fn record(slug: &str, day: u32) -> RedirectRecord {
        let at = Utc.with_ymd_and_hms(2026, 3, day, 12, 0, 0).unwrap();
        RedirectRecord::new(
            slug.to_string(),
            RedirectFields {
                title: slug.to_string(),
                description: "d".to_string(),
                target_url: "https://example.com".to_string(),
                image_url: None,
                keywords: None,
                site_name: None,
                content_type: ContentType::default(),
            },
            at,
            at,
        )
    }

    #[test]
    fn test_sitemap_lists_home_and_every_slug() {
        let xml = build_sitemap(
            "https://seo.example.com",
            &[record("zeta", 2), record("alpha", 9)],
        );

        let home = xml.find("<loc>https://seo.example.com/</loc>").unwrap();
        let alpha = xml.find("<loc>https://seo.example.com/alpha</loc>").unwrap();
        let zeta = xml.find("<loc>https://seo.example.com/zeta</loc>").unwrap();
        assert!(home < alpha && alpha < zeta);
        assert!(xml.contains("<lastmod>2026-03-09</lastmod>"));
        assert_eq!(xml.matches("<url>").count(), 3);
    }

    #[test]
    fn test_sitemap_empty_store() {
        let xml = build_sitemap("http://localhost:3000", &[]);
        assert!(xml.contains("<loc>http://localhost:3000/</loc>"));
        assert!(!xml.contains("<lastmod>"));
    }

    #[test]
    fn test_robots_references_sitemap() {
        let body = build_robots("https://seo.example.com");
        assert!(body.contains("Disallow: /admin\n"));
        assert!(body.contains("Disallow: /api/\n"));
        assert!(body.ends_with("Sitemap: https://seo.example.com/sitemap.xml\n"));
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a&b<c>'\""), "a&amp;b&lt;c&gt;&apos;&quot;");
    }
}
