//! Utility functions for check implementations.

pub mod inflect;

#[doc(inline)]
pub use inflect::{camelize, classify, pluralize, singularize, tableize, underscore};
