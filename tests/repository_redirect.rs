use sqlx::PgPool;
use std::sync::Arc;
use seo_redirect::domain::entities::{ContentType, NewRedirect, RedirectFields};
use seo_redirect::domain::repositories::RedirectRepository;
use seo_redirect::error::AppError;
use seo_redirect::infrastructure::persistence::PgRedirectRepository;

fn fields(title: &str) -> RedirectFields {
    RedirectFields {
        title: title.to_string(),
        description: format!("About {title}"),
        target_url: "https://example.com".to_string(),
        image_url: None,
        keywords: Some("seo, growth".to_string()),
        site_name: None,
        content_type: ContentType::parse("article").unwrap(),
    }
}

fn new_redirect(slug: &str) -> NewRedirect {
    NewRedirect {
        slug: slug.to_string(),
        fields: fields(slug),
    }
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_create_and_find(pool: PgPool) {
    let repo = PgRedirectRepository::new(Arc::new(pool));

    let created = repo.create(new_redirect("first")).await.unwrap();
    assert_eq!(created.slug, "first");
    assert_eq!(created.fields.content_type.as_str(), "article");

    let found = repo.find_by_slug("first").await.unwrap();
    assert_eq!(found, Some(created));

    assert!(repo.find_by_slug("missing").await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_create_duplicate_slug(pool: PgPool) {
    let repo = PgRedirectRepository::new(Arc::new(pool));

    repo.create(new_redirect("dup")).await.unwrap();
    let result = repo.create(new_redirect("dup")).await;

    assert!(matches!(result, Err(AppError::Conflict { .. })));
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_list_in_insertion_order(pool: PgPool) {
    let repo = PgRedirectRepository::new(Arc::new(pool));

    for slug in ["zeta", "alpha", "mid"] {
        repo.create(new_redirect(slug)).await.unwrap();
    }

    let slugs: Vec<String> = repo
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.slug)
        .collect();

    assert_eq!(slugs, vec!["zeta", "alpha", "mid"]);
    assert_eq!(repo.count().await.unwrap(), 3);
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_update_keeps_slug_and_bumps_timestamp(pool: PgPool) {
    let repo = PgRedirectRepository::new(Arc::new(pool));

    let created = repo.create(new_redirect("edit-me")).await.unwrap();
    let updated = repo.update("edit-me", fields("New Title")).await.unwrap();

    assert_eq!(updated.slug, "edit-me");
    assert_eq!(updated.fields.title, "New Title");
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);

    let missing = repo.update("nope", fields("x")).await;
    assert!(matches!(missing, Err(AppError::NotFound { .. })));
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_delete(pool: PgPool) {
    let repo = PgRedirectRepository::new(Arc::new(pool));

    repo.create(new_redirect("gone")).await.unwrap();

    assert!(repo.delete("gone").await.unwrap());
    assert!(!repo.delete("gone").await.unwrap());
    assert!(repo.find_by_slug("gone").await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_ping(pool: PgPool) {
    let repo = PgRedirectRepository::new(Arc::new(pool));

    assert!(repo.ping().await.is_ok());
}
