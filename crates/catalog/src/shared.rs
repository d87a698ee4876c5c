//! Single-writer / multi-reader access boundary around a [`Catalog`].

use std::sync::{Arc, PoisonError, RwLock};

use crate::catalog::Catalog;
use crate::snapshot::CatalogSnapshot;

/// Cloneable handle serializing all catalog mutations behind one `RwLock`.
///
/// Readers may run concurrently with each other; a writer excludes everyone.
/// Catalog operations never leave partial state behind, so a guard recovered
/// from a poisoned lock still holds a consistent catalog.
#[derive(Debug, Clone, Default)]
pub struct SharedCatalog {
    inner: Arc<RwLock<Catalog>>,
}

impl SharedCatalog {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            inner: Arc::new(RwLock::new(catalog)),
        }
    }

    /// Run `f` with shared (read) access.
    pub fn read<R>(&self, f: impl FnOnce(&Catalog) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&*guard)
    }

    /// Run `f` with exclusive (write) access.
    pub fn write<R>(&self, f: impl FnOnce(&mut Catalog) -> R) -> R {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut *guard)
    }

    /// Consistent point-in-time snapshot (taken under the read lock).
    pub fn snapshot(&self) -> CatalogSnapshot {
        self.read(Catalog::to_snapshot)
    }
}

impl From<Catalog> for SharedCatalog {
    fn from(value: Catalog) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MAX_LOANS_PER_BORROWER;
    use crate::item::Item;
    use lendstore_core::CatalogError;
    use std::thread;

    #[test]
    fn concurrent_borrowers_never_share_an_item() {
        let mut catalog = Catalog::new();
        catalog
            .add_batch((0..20).map(|n| Item::new(format!("k{n}"), format!("T{n}"), "A", "G", 2000)))
            .unwrap();
        let shared = SharedCatalog::new(catalog);

        let handles: Vec<_> = ["Alice", "Bob", "Carol", "Dave"]
            .into_iter()
            .map(|borrower| {
                let shared = shared.clone();
                thread::spawn(move || {
                    let mut won = 0;
                    for n in 0..20 {
                        let title = format!("T{n}");
                        if shared.write(|c| c.borrow(&title, borrower).is_ok()) {
                            won += 1;
                        }
                    }
                    won
                })
            })
            .collect();

        let total: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

        let counts = shared.read(Catalog::counts);
        assert_eq!(counts.total_borrowed, total);
        assert!(total <= 4 * MAX_LOANS_PER_BORROWER);
        shared.read(|c| c.check_invariants()).unwrap();
    }

    #[test]
    fn failed_write_is_visible_as_error() {
        let shared = SharedCatalog::default();
        let err = shared.write(|c| c.borrow("Missing", "Alice").map(|_| ())).unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
        assert!(shared.snapshot().items.is_empty());
    }
}
