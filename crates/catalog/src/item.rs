use serde::{Deserialize, Serialize};

use lendstore_core::{CatalogKey, Entity};

/// A lendable item.
///
/// Descriptive fields are fixed at construction. The only mutable state is the
/// availability flag, which only the owning [`Catalog`](crate::Catalog) writes:
/// a freshly built item is unavailable until the catalog admits it.
///
/// Identity is the catalog key alone (see [`Entity::same_identity`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    key: CatalogKey,
    title: String,
    creator: String,
    category: String,
    published_year: i32,
    available: bool,
}

impl Item {
    /// Build a not-yet-admitted item (`available == false`).
    pub fn new(
        key: impl Into<CatalogKey>,
        title: impl Into<String>,
        creator: impl Into<String>,
        category: impl Into<String>,
        published_year: i32,
    ) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            creator: creator.into(),
            category: category.into(),
            published_year,
            available: false,
        }
    }

    /// Same item with an explicit availability flag.
    ///
    /// Used by bulk import, where the flag comes from the source row. The catalog
    /// ignores it on admission.
    pub fn with_availability(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    pub fn key(&self) -> &CatalogKey {
        &self.key
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn creator(&self) -> &str {
        &self.creator
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn published_year(&self) -> i32 {
        self.published_year
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub(crate) fn set_available(&mut self, available: bool) {
        self.available = available;
    }
}

impl Entity for Item {
    type Id = CatalogKey;

    fn id(&self) -> &Self::Id {
        &self.key
    }
}

impl core::fmt::Display for Item {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} \"{}\" by {} [{}, {}] ({})",
            self.key,
            self.title,
            self.creator,
            self.category,
            self.published_year,
            if self.available { "available" } else { "unavailable" }
        )
    }
}
