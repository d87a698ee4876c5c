//! Serializable shape of a whole catalog.
//!
//! The borrower map holds catalog keys, not item copies: each key refers to an
//! entry of `items`. Conversion to and from a live [`Catalog`](crate::Catalog)
//! is `Catalog::to_snapshot` / `Catalog::from_snapshot`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use lendstore_core::{BorrowerName, CatalogKey};

use crate::item::Item;

/// Current snapshot layout. Anything else is rejected on restore.
pub const SNAPSHOT_FORMAT: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub format: u32,
    /// Items in catalog insertion order.
    pub items: Vec<Item>,
    /// Borrower insertion order, then loan order.
    pub borrowers: IndexMap<BorrowerName, Vec<CatalogKey>>,
}

impl CatalogSnapshot {
    /// Snapshot of an empty catalog.
    pub fn empty() -> Self {
        Self {
            format: SNAPSHOT_FORMAT,
            items: Vec::new(),
            borrowers: IndexMap::new(),
        }
    }
}

impl Default for CatalogSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}
