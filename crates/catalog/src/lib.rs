//! Catalog and lending domain module.
//!
//! This crate contains the lending state machine, implemented purely as
//! deterministic domain logic (no IO, no storage format).

pub mod catalog;
pub mod item;
mod ledger;
pub mod shared;
pub mod snapshot;

pub use catalog::{BorrowerReport, Catalog, CatalogCounts, MAX_LOANS_PER_BORROWER};
pub use item::Item;
pub use shared::SharedCatalog;
pub use snapshot::{CatalogSnapshot, SNAPSHOT_FORMAT};
