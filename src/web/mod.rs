//! Browser-facing layer: landing pages, admin page and SEO files.
//!
//! Uses Askama templates from `templates/` for server-side rendering.
//!
//! # Modules
//!
//! - [`handlers`] - Template rendering handlers
//! - [`middleware`] - Cookie authentication for admin pages
//! - [`routes`] - Web route configuration

pub mod handlers;
pub mod middleware;
pub mod routes;
