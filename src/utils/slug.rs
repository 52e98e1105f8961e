//! Slug generation and validation.
//!
//! Slugs are the primary key of a redirect record and the path segment of its
//! short URL, so they are restricted to lowercase ASCII letters, digits and
//! single hyphens.

use crate::error::AppError;
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

/// Maximum slug length in characters.
pub const MAX_SLUG_LENGTH: usize = 100;

/// Path segments owned by the service itself.
const RESERVED_SLUGS: &[&str] = &[
    "admin", "api", "u", "health", "static", "home", "login", "sitemap", "robots",
];

static DISALLOWED_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\s-]").expect("valid regex"));
static WHITESPACE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static HYPHEN_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-+").expect("valid regex"));
static SLUG_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("valid regex"));

/// Derives a URL-safe slug from a title.
///
/// Lower-cases the input, drops everything outside `[a-z0-9\s-]`, turns
/// whitespace runs into a single hyphen, collapses repeated hyphens, trims
/// hyphens from both ends and truncates to [`MAX_SLUG_LENGTH`].
///
/// Total: any input yields a (possibly empty) string matching `^[a-z0-9-]{0,100}$`.
///
/// # Examples
///
/// ```
/// use seo_redirect::utils::slug::generate_slug;
///
/// assert_eq!(generate_slug("Hello, World!  Foo--Bar"), "hello-world-foo-bar");
/// ```
pub fn generate_slug(title: &str) -> String {
    let lowered = title.to_lowercase();
    let stripped = DISALLOWED_CHARS.replace_all(&lowered, "");
    let hyphenated = WHITESPACE_RUNS.replace_all(&stripped, "-");
    let collapsed = HYPHEN_RUNS.replace_all(&hyphenated, "-");

    let trimmed = collapsed.trim_matches(|c: char| c == '-' || c.is_whitespace());

    // Only ASCII survives the filters above, so byte truncation is char-safe.
    let truncated = if trimmed.len() > MAX_SLUG_LENGTH {
        &trimmed[..MAX_SLUG_LENGTH]
    } else {
        trimmed
    };

    truncated.trim_end_matches('-').to_string()
}

/// Returns `true` when `slug` is already in canonical form.
pub fn is_valid_slug(slug: &str) -> bool {
    slug.len() <= MAX_SLUG_LENGTH && SLUG_FORMAT.is_match(slug)
}

/// Returns `true` when `slug` collides with a route of the service.
pub fn is_reserved_slug(slug: &str) -> bool {
    RESERVED_SLUGS.contains(&slug)
}

/// Normalizes and validates a caller-supplied slug.
///
/// The value goes through [`generate_slug`] first, so `"My Promo"` becomes
/// `"my-promo"`.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if the normalized slug is empty or reserved.
pub fn validate_custom_slug(raw: &str) -> Result<String, AppError> {
    let slug = generate_slug(raw);

    if slug.is_empty() {
        return Err(AppError::bad_request(
            "Slug must contain at least one letter or digit",
            json!({ "slug": raw }),
        ));
    }

    if is_reserved_slug(&slug) {
        return Err(AppError::bad_request(
            "This slug is reserved",
            json!({ "slug": slug }),
        ));
    }

    Ok(slug)
}
