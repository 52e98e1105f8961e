//! Domain layer containing business entities and logic.
//!
//! - [`entities`] - Redirect record data structures
//! - [`repositories`] - Data access trait definitions
//! - [`listing`] - Pure filter/sort/paginate over the record list
//! - [`landing_page`] - View model shared by both landing page modes
//!
//! The domain layer has no dependencies on infrastructure or presentation
//! layers; business rules are orchestrated by [`crate::application::services`].

pub mod entities;
pub mod landing_page;
pub mod listing;
pub mod repositories;
