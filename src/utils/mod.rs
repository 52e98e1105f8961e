//! Utility functions shared across layers.
//!
//! - [`slug`] - Title → slug normalization and custom slug validation

pub mod slug;
