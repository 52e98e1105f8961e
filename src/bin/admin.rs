//! CLI administration tool for seo-redirect.
//!
//! Manages redirect records directly in PostgreSQL, generates admin tokens and
//! previews slugs, without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # List all records
//! cargo run --bin admin -- redirect list
//!
//! # Create a record interactively
//! cargo run --bin admin -- redirect create
//!
//! # Back up and restore
//! cargo run --bin admin -- redirect export -o redirects.json
//! cargo run --bin admin -- redirect import redirects.json
//!
//! # Preview the slug of a title
//! cargo run --bin admin -- slug "Ten SEO Tips for 2026"
//!
//! # Generate an ADMIN_TOKEN
//! cargo run --bin admin -- token generate
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or `DB_*` components: required for `redirect` and `db` commands
//! - `BASE_URL`: origin of the printed short/long URLs
//! - `REDIS_URL` or `REDIS_*` components: cache shared with the server; deletes
//!   and overwrites evict its entries
//!
//! # Import/Export Format
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

use seo_redirect::api::dto::transfer::{ExportFile, RedirectFile};
use seo_redirect::application::services::{
    AuthService, ImportOutcome, RedirectInput, RedirectService,
};
use seo_redirect::config::{Config, mask_connection_string};
use seo_redirect::domain::entities::ContentType;
use seo_redirect::infrastructure::cache::{CacheService, NullCache, RedisCache};
use seo_redirect::infrastructure::persistence::PgRedirectRepository;
use seo_redirect::utils::slug::{generate_slug, is_reserved_slug};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::path::{Path, PathBuf};
use std::sync::Arc;

type PgRedirectService = RedirectService<PgRedirectRepository>;

/// CLI tool for managing seo-redirect.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage redirect records
    Redirect {
        #[command(subcommand)]
        action: RedirectAction,
    },

    /// Show the slug a title would get
    Slug {
        /// Page title
        title: String,
    },

    /// Admin token helpers
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Record management subcommands.
#[derive(Subcommand)]
enum RedirectAction {
    /// List all records
    List,

    /// Show one record with its URLs
    Show {
        slug: String,
    },

    /// Create a record (prompts for missing values)
    Create {
        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        desc: Option<String>,

        #[arg(short, long)]
        url: Option<String>,

        #[arg(long)]
        image: Option<String>,

        #[arg(long)]
        keywords: Option<String>,

        #[arg(long)]
        site_name: Option<String>,

        /// Open Graph type (default: website)
        #[arg(long = "type")]
        content_type: Option<String>,

        /// Custom slug (derived from the title otherwise)
        #[arg(short, long)]
        slug: Option<String>,
    },

    /// Delete a record
    Delete {
        slug: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Import records from a JSON file
    Import {
        file: PathBuf,

        /// Replace the fields of slugs that already exist
        #[arg(long)]
        overwrite: bool,
    },

    /// Export all records as JSON
    Export {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Token subcommands.
#[derive(Subcommand)]
enum TokenAction {
    /// Generate a random admin token
    Generate {
        /// Print only the token
        #[arg(long)]
        raw: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Slug { title } => handle_slug(&title),
        Commands::Token { action } => handle_token_action(action),
        Commands::Redirect { action } => {
            let config = Config::from_env()?;
            let pool = connect(&config).await?;
            let cache = connect_cache(&config).await;
            let service = RedirectService::new(
                Arc::new(PgRedirectRepository::new(Arc::new(pool))),
                config.base_url,
            )
            .with_cache(cache);
            handle_redirect_action(action, &service).await
        }
        Commands::Db { action } => {
            let config = Config::from_env()?;
            let pool = connect(&config).await?;
            handle_db_action(action, &pool).await
        }
    }
}

/// Connects to the configured database and applies pending migrations.
async fn connect(config: &Config) -> Result<PgPool> {
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL (or DB_HOST/DB_USER/DB_PASSWORD/DB_NAME) must be set")?;

    let pool = PgPool::connect(database_url)
        .await
        .with_context(|| {
            format!(
                "Failed to connect to database at {}",
                mask_connection_string(database_url)
            )
        })?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    Ok(pool)
}

/// Connects to the server's Redis cache so deletes and updates evict the
/// landing page entries the server has cached.
async fn connect_cache(config: &Config) -> Arc<dyn CacheService> {
    let Some(redis_url) = &config.redis_url else {
        return Arc::new(NullCache::new());
    };

    match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
        Ok(cache) => Arc::new(cache),
        Err(e) => {
            eprintln!(
                "{} {} (cached pages may stay stale until they expire)",
                "Cache unavailable:".yellow().bold(),
                e
            );
            Arc::new(NullCache::new())
        }
    }
}

/// Dispatches record management commands.
async fn handle_redirect_action(action: RedirectAction, service: &PgRedirectService) -> Result<()> {
    match action {
        RedirectAction::List => list_redirects(service).await,
        RedirectAction::Show { slug } => show_redirect(service, &slug).await,
        RedirectAction::Create {
            title,
            desc,
            url,
            image,
            keywords,
            site_name,
            content_type,
            slug,
        } => {
            let input = RedirectInput {
                title: prompt_if_missing(title, "Title")?,
                description: prompt_if_missing(desc, "Description")?,
                target_url: prompt_if_missing(url, "Target URL")?,
                image_url: image,
                keywords,
                site_name,
                content_type,
                slug,
            };
            create_redirect(service, input).await
        }
        RedirectAction::Delete { slug, yes } => delete_redirect(service, &slug, yes).await,
        RedirectAction::Import { file, overwrite } => {
            import_redirects(service, &file, overwrite).await
        }
        RedirectAction::Export { output } => export_redirects(service, output).await,
    }
}

fn prompt_if_missing(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => Ok(Input::new().with_prompt(prompt).interact_text()?),
    }
}

/// Lists all records.
///
/// # Output Format
///
/// ```text
/// Redirects
///
///   Slug                           Type       Title
///   ──────────────────────────────────────────────────────────────────────
///   seo-tips                       article    Ten SEO Tips
/// ```
async fn list_redirects(service: &PgRedirectService) -> Result<()> {
    println!("{}", "Redirects".bright_blue().bold());
    println!();

    let records = service.list().await?;

    if records.is_empty() {
        println!("{}", "  No records found".yellow());
        println!();
        println!(
            "  Create one with: {} admin redirect create",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<30} {:<10} {}",
        "Slug".bright_white().bold(),
        "Type".bright_white().bold(),
        "Title".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for record in &records {
        println!(
            "  {:<30} {:<10} {}",
            record.slug.cyan(),
            record.fields.content_type.as_str().bright_black(),
            record.fields.title
        );
    }

    println!();
    println!(
        "  Total: {}",
        records.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

async fn show_redirect(service: &PgRedirectService, slug: &str) -> Result<()> {
    let record = service.get(slug).await?;
    let published = service.publish(record);
    let record = &published.record;
    let fields = &record.fields;

    println!("{}", record.slug.bright_blue().bold());
    println!();
    println!("  Title:     {}", fields.title.cyan());
    println!("  Desc:      {}", fields.description);
    println!("  URL:       {}", fields.target_url);
    println!("  Image:     {}", fields.image_url.as_deref().unwrap_or("-"));
    println!("  Keywords:  {}", fields.keywords.as_deref().unwrap_or("-"));
    println!("  Site name: {}", fields.site_name.as_deref().unwrap_or("-"));
    println!("  Type:      {}", fields.content_type);
    println!(
        "  Created:   {}",
        record.created_at.format("%Y-%m-%d %H:%M").to_string().bright_black()
    );
    println!(
        "  Updated:   {}",
        record.updated_at.format("%Y-%m-%d %H:%M").to_string().bright_black()
    );
    println!();
    println!("  Short: {}", published.short_url.bright_yellow());
    println!("  Long:  {}", published.long_url.bright_yellow());
    println!();

    Ok(())
}

async fn create_redirect(service: &PgRedirectService, input: RedirectInput) -> Result<()> {
    let published = service.create(input).await?;

    println!();
    println!("{}", "Redirect created".green().bold());
    println!("  Slug:  {}", published.record.slug.cyan());
    println!("  Short: {}", published.short_url.bright_yellow());
    println!("  Long:  {}", published.long_url.bright_yellow());
    println!();

    Ok(())
}

/// Deletes a record after confirmation (default: No).
async fn delete_redirect(service: &PgRedirectService, slug: &str, skip_confirm: bool) -> Result<()> {
    let record = service.get(slug).await?;

    println!("  Slug:  {}", record.slug.cyan());
    println!("  Title: {}", record.fields.title);
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this record?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".red());
            return Ok(());
        }
    }

    service.delete(slug).await?;

    println!("{}", "Redirect deleted".green().bold());
    println!();

    Ok(())
}

/// Imports a `slug -> record` JSON file in file order.
///
/// Keys are normalized like custom slugs. Existing slugs are skipped unless
/// `overwrite` is set; invalid entries are reported and skipped.
async fn import_redirects(service: &PgRedirectService, file: &Path, overwrite: bool) -> Result<()> {
    let contents = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let entries: RedirectFile =
        serde_json::from_str(&contents).context("Expected a JSON object of slug -> record")?;

    println!(
        "{} {} entries from {}",
        "Importing".bright_blue().bold(),
        entries.0.len(),
        file.display()
    );
    println!();

    let (mut created, mut updated, mut skipped, mut failed) = (0, 0, 0, 0);

    for (key, input) in entries.into_inputs() {
        match service.import_entry(&key, input, overwrite).await? {
            ImportOutcome::Created(slug) => {
                created += 1;
                println!("  {} {}", "created".green(), slug);
            }
            ImportOutcome::Updated(slug) => {
                updated += 1;
                println!("  {} {}", "updated".green(), slug);
            }
            ImportOutcome::Skipped(slug) => {
                skipped += 1;
                println!("  {} {} (exists)", "skip".yellow(), slug);
            }
            ImportOutcome::Failed(e) => {
                failed += 1;
                println!("  {} {}: {}", "fail".red(), key, e);
            }
        }
    }

    println!();
    println!(
        "  Created: {}  Updated: {}  Skipped: {}  Failed: {}",
        created.to_string().bright_green().bold(),
        updated.to_string().bright_green().bold(),
        skipped.to_string().yellow(),
        failed.to_string().red()
    );
    println!();

    Ok(())
}

/// Writes every record as a `slug -> record` JSON object in store order.
async fn export_redirects(service: &PgRedirectService, output: Option<PathBuf>) -> Result<()> {
    let records = service.list().await?;
    let json = serde_json::to_string_pretty(&ExportFile(&records))?;

    match output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "{} {} records to {}",
                "Exported".green().bold(),
                records.len(),
                path.display()
            );
        }
        None => println!("{json}"),
    }

    Ok(())
}

fn handle_slug(title: &str) -> Result<()> {
    let slug = generate_slug(title);

    if slug.is_empty() {
        println!("{}", "No slug can be derived from this title".red());
    } else if is_reserved_slug(&slug) {
        println!("{} {}", slug.yellow(), "(reserved, supply a custom slug)".red());
    } else {
        println!("{}", slug.cyan());
    }

    Ok(())
}

fn handle_token_action(action: TokenAction) -> Result<()> {
    match action {
        TokenAction::Generate { raw } => {
            let token = generate_token();

            if raw {
                println!("{token}");
                return Ok(());
            }

            let fingerprint = AuthService::new(Some(&token))
                .fingerprint()
                .unwrap_or_default()
                .to_string();

            println!("{}", "Generated admin token".bright_blue().bold());
            println!();
            println!("  Token:       {}", token.bright_yellow().bold());
            println!("  Fingerprint: {}", fingerprint.bright_black());
            println!();
            println!("{}", "Add it to your environment:".bright_white());
            println!("  ADMIN_TOKEN={}", token.bright_yellow());
            println!();
            println!("{}", "Example:".bright_white());
            println!(
                "  curl -H \"Authorization: Bearer {}\" http://localhost:3000/api/redirects",
                token.bright_yellow()
            );
            println!();
        }
    }

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let records: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM redirects")
                .fetch_one(pool)
                .await?;

            let types: Vec<(String, i64)> = sqlx::query_as(
                "SELECT content_type, COUNT(*) FROM redirects GROUP BY content_type ORDER BY 2 DESC",
            )
            .fetch_all(pool)
            .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!(
                "  Records:    {}",
                records.to_string().bright_green().bold()
            );
            for (content_type, count) in types {
                let label = ContentType::parse(&content_type)
                    .map(|t| t.label())
                    .unwrap_or(content_type);
                println!("    {:<12} {}", label, count);
            }
            println!();
        }
    }

    Ok(())
}

/// Generates a random admin token.
///
/// # Format
///
/// - Length: 48 characters
/// - Character set: A-Z, a-z, 0-9
fn generate_token() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    const TOKEN_LEN: usize = 48;

    let mut rng = rand::rng();

    (0..TOKEN_LEN)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}
