//! Core domain entities.
//!
//! - [`RedirectRecord`] - a persisted slug → metadata mapping
//! - [`RedirectFields`] - the editable part of a record
//! - [`NewRedirect`] - input for inserting a record
//! - [`ContentType`] - open enumeration of Open Graph types

pub mod redirect;

pub use redirect::{ContentType, NewRedirect, RedirectFields, RedirectRecord, split_keywords};
