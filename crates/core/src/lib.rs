//! `lendstore-core`: shared ids, errors and the entity trait.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, the entity marker, and the catalog error model.

pub mod entity;
pub mod error;
pub mod id;

pub use entity::Entity;
pub use error::{CatalogError, CatalogResult};
pub use id::{BorrowerName, CatalogKey};
