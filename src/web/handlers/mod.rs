//! HTML handlers for landing pages, the admin page and SEO files.

mod admin;
mod error_page;
mod home;
mod login;
mod pages;
mod seo;

pub use admin::admin_handler;
pub use error_page::PageError;
pub use home::home_handler;
pub use login::{login_page_handler, login_submit_handler, logout_handler};
pub use pages::{landing_by_params_handler, landing_by_slug_handler};
pub use seo::{build_robots, build_sitemap, robots_handler, sitemap_handler};
