//! PostgreSQL implementation of the redirect repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{ContentType, NewRedirect, RedirectFields, RedirectRecord};
use crate::domain::repositories::RedirectRepository;
use crate::error::AppError;

/// Row shape shared by every `SELECT`/`RETURNING` below.
#[derive(Debug, FromRow)]
struct RedirectRow {
    slug: String,
    title: String,
    description: String,
    target_url: String,
    image_url: Option<String>,
    keywords: Option<String>,
    site_name: Option<String>,
    content_type: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<RedirectRow> for RedirectRecord {
    fn from(row: RedirectRow) -> Self {
        // The column only ever receives values that went through `ContentType::parse`.
        let content_type = ContentType::parse(&row.content_type).unwrap_or_default();

        RedirectRecord::new(
            row.slug,
            RedirectFields {
                title: row.title,
                description: row.description,
                target_url: row.target_url,
                image_url: row.image_url,
                keywords: row.keywords,
                site_name: row.site_name,
                content_type,
            },
            row.created_at,
            row.updated_at,
        )
    }
}

const COLUMNS: &str = "slug, title, description, target_url, image_url, keywords, site_name, \
                       content_type, created_at, updated_at";

/// PostgreSQL repository for redirect records.
///
/// Insertion order is the `id` sequence of the `redirects` table.
pub struct PgRedirectRepository {
    pool: Arc<PgPool>,
}

impl PgRedirectRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RedirectRepository for PgRedirectRepository {
    async fn create(&self, new_redirect: NewRedirect) -> Result<RedirectRecord, AppError> {
        let sql = format!(
            r#"
            INSERT INTO redirects
                (slug, title, description, target_url, image_url, keywords, site_name, content_type)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {COLUMNS}
            "#
        );

        let fields = new_redirect.fields;
        let result = sqlx::query_as::<_, RedirectRow>(&sql)
            .bind(&new_redirect.slug)
            .bind(fields.title)
            .bind(fields.description)
            .bind(fields.target_url)
            .bind(fields.image_url)
            .bind(fields.keywords)
            .bind(fields.site_name)
            .bind(fields.content_type.as_str())
            .fetch_one(self.pool.as_ref())
            .await;

        match result {
            Ok(row) => Ok(row.into()),
            Err(e)
                if e.as_database_error()
                    .is_some_and(|db| db.is_unique_violation()) =>
            {
                Err(AppError::conflict(
                    "Slug already exists",
                    json!({ "slug": new_redirect.slug }),
                ))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<RedirectRecord>, AppError> {
        let sql = format!("SELECT {COLUMNS} FROM redirects WHERE slug = $1");

        let row = sqlx::query_as::<_, RedirectRow>(&sql)
            .bind(slug)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<RedirectRecord>, AppError> {
        let sql = format!("SELECT {COLUMNS} FROM redirects ORDER BY id");

        let rows = sqlx::query_as::<_, RedirectRow>(&sql)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, slug: &str, fields: RedirectFields) -> Result<RedirectRecord, AppError> {
        let sql = format!(
            r#"
            UPDATE redirects
            SET title = $2,
                description = $3,
                target_url = $4,
                image_url = $5,
                keywords = $6,
                site_name = $7,
                content_type = $8,
                updated_at = NOW()
            WHERE slug = $1
            RETURNING {COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, RedirectRow>(&sql)
            .bind(slug)
            .bind(fields.title)
            .bind(fields.description)
            .bind(fields.target_url)
            .bind(fields.image_url)
            .bind(fields.keywords)
            .bind(fields.site_name)
            .bind(fields.content_type.as_str())
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.map(Into::into)
            .ok_or_else(|| AppError::not_found("Redirect not found", json!({ "slug": slug })))
    }

    async fn delete(&self, slug: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM redirects WHERE slug = $1")
            .bind(slug)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM redirects")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
