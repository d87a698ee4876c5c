use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use serde::Serialize;

use lendstore_core::{BorrowerName, CatalogError, CatalogKey, CatalogResult};

use crate::item::Item;
use crate::ledger::Ledger;
use crate::snapshot::{CatalogSnapshot, SNAPSHOT_FORMAT};

/// Maximum number of items a single borrower may hold at once.
pub const MAX_LOANS_PER_BORROWER: usize = 6;

/// Copy of the borrower -> items mapping, in borrower insertion order.
pub type BorrowerReport = IndexMap<BorrowerName, Vec<Item>>;

/// Derived totals (never stored).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CatalogCounts {
    pub total_items: usize,
    pub total_borrowed: usize,
    pub total_borrowers: usize,
}

/// The inventory and lending state machine.
///
/// Owns every [`Item`] (one arena, insertion ordered, unique by key) and the
/// borrower ledger (keys only). Whether an item is on loan is decided from the
/// ledger; the `available` flag on stored items mirrors it and is written only
/// here.
///
/// Every operation either commits its whole effect or fails without touching
/// state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    items: Vec<Item>,
    positions: HashMap<CatalogKey, usize>,
    ledger: Ledger,
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            positions: HashMap::new(),
            ledger: Ledger::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    // ---------------------------------------------------------------------
    // Admission / removal
    // ---------------------------------------------------------------------

    /// Admit a single item.
    ///
    /// Uniqueness is checked on the catalog key; the incoming availability flag
    /// is ignored. On success the item becomes available and is appended.
    pub fn add(&mut self, item: Item) -> CatalogResult<()> {
        if self.positions.contains_key(item.key()) {
            return Err(CatalogError::DuplicateKey(item.key().clone()));
        }
        self.admit(item);
        Ok(())
    }

    /// Admit a batch, all or nothing.
    ///
    /// Fails with `DuplicateKey` if a key repeats inside the batch or collides
    /// with an existing item; nothing is inserted in that case. Otherwise items
    /// are admitted in input order exactly as [`Catalog::add`] would.
    pub fn add_batch(&mut self, items: impl IntoIterator<Item = Item>) -> CatalogResult<()> {
        let items: Vec<Item> = items.into_iter().collect();

        let mut seen: HashSet<&CatalogKey> = HashSet::with_capacity(items.len());
        for item in &items {
            if self.positions.contains_key(item.key()) || !seen.insert(item.key()) {
                return Err(CatalogError::DuplicateKey(item.key().clone()));
            }
        }

        let admitted = items.len();
        for item in items {
            self.admit(item);
        }
        tracing::debug!(admitted, "batch admitted");
        Ok(())
    }

    /// Remove an item that is not on loan and hand it back detached.
    ///
    /// The detached item's availability flag is left as it was.
    pub fn remove(&mut self, key: &str) -> CatalogResult<Item> {
        let pos = self
            .positions
            .get(key)
            .copied()
            .ok_or_else(|| CatalogError::not_found(format!("no item with key '{key}'")))?;

        if let Some(holder) = self.ledger.holder_of(key) {
            return Err(CatalogError::conflict(format!(
                "item '{key}' is on loan to {holder}"
            )));
        }

        let item = self.items.remove(pos);
        self.positions.remove(key);
        for (idx, shifted) in self.items.iter().enumerate().skip(pos) {
            self.positions.insert(shifted.key().clone(), idx);
        }

        tracing::debug!(key = %item.key(), "item removed");
        Ok(item)
    }

    fn admit(&mut self, mut item: Item) {
        item.set_available(true);
        tracing::debug!(key = %item.key(), title = item.title(), "item admitted");
        self.positions.insert(item.key().clone(), self.items.len());
        self.items.push(item);
    }

    // ---------------------------------------------------------------------
    // Search (exact, case-sensitive, first match in insertion order)
    // ---------------------------------------------------------------------

    pub fn find_by_key(&self, key: &str) -> CatalogResult<&Item> {
        self.positions
            .get(key)
            .map(|&pos| &self.items[pos])
            .ok_or_else(|| CatalogError::not_found(format!("no item with key '{key}'")))
    }

    pub fn find_by_title(&self, title: &str) -> CatalogResult<&Item> {
        self.find_first(|item| item.title() == title)
            .ok_or_else(|| CatalogError::not_found(format!("no item titled '{title}'")))
    }

    pub fn find_by_creator(&self, creator: &str) -> CatalogResult<&Item> {
        self.find_first(|item| item.creator() == creator)
            .ok_or_else(|| CatalogError::not_found(format!("no item by '{creator}'")))
    }

    pub fn find_by_category(&self, category: &str) -> CatalogResult<&Item> {
        self.find_first(|item| item.category() == category)
            .ok_or_else(|| CatalogError::not_found(format!("no item in category '{category}'")))
    }

    fn find_first(&self, pred: impl Fn(&Item) -> bool) -> Option<&Item> {
        self.items.iter().find(|&item| pred(item))
    }

    fn position_by_title(&self, title: &str) -> CatalogResult<usize> {
        self.items
            .iter()
            .position(|item| item.title() == title)
            .ok_or_else(|| CatalogError::not_found(format!("no item titled '{title}'")))
    }

    // ---------------------------------------------------------------------
    // Lending
    // ---------------------------------------------------------------------

    /// Lend the first item titled `title` to `borrower`.
    ///
    /// Titles are not unique; the first match in insertion order is the one
    /// considered, even if a later item with the same title is free.
    pub fn borrow(&mut self, title: &str, borrower: &str) -> CatalogResult<&Item> {
        let pos = self.position_by_title(title)?;
        let key = self.items[pos].key().clone();

        if self.ledger.is_on_loan(key.as_str()) {
            return Err(CatalogError::unavailable(format!(
                "'{title}' ({key}) is already on loan"
            )));
        }
        if self.ledger.loan_count(borrower) >= MAX_LOANS_PER_BORROWER {
            return Err(CatalogError::BorrowLimitExceeded {
                borrower: BorrowerName::new(borrower),
                limit: MAX_LOANS_PER_BORROWER,
            });
        }

        tracing::debug!(key = %key, borrower, "item borrowed");
        self.ledger.lend(BorrowerName::new(borrower), key);
        self.items[pos].set_available(false);
        Ok(&self.items[pos])
    }

    /// Take back the first item titled `title` from `borrower`.
    ///
    /// The borrower entry disappears once its last item comes back.
    pub fn return_item(&mut self, title: &str, borrower: &str) -> CatalogResult<&Item> {
        let pos = self.position_by_title(title)?;
        let key = self.items[pos].key().clone();

        if !self.ledger.is_on_loan(key.as_str()) {
            return Err(CatalogError::not_borrowed(format!(
                "'{title}' ({key}) is not on loan"
            )));
        }
        if self.ledger.loans_of(borrower).is_none() {
            return Err(CatalogError::not_borrowed(format!(
                "{borrower} has no items on loan"
            )));
        }
        if !self.ledger.release(borrower, key.as_str()) {
            return Err(CatalogError::not_borrowed(format!(
                "'{title}' ({key}) is not on loan to {borrower}"
            )));
        }

        tracing::debug!(key = %key, borrower, "item returned");
        self.items[pos].set_available(true);
        Ok(&self.items[pos])
    }

    // ---------------------------------------------------------------------
    // Read-only projections
    // ---------------------------------------------------------------------

    /// All items, insertion order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Items not on loan, insertion order.
    pub fn available_items(&self) -> Vec<&Item> {
        self.items
            .iter()
            .filter(|item| !self.ledger.is_on_loan(item.key().as_str()))
            .collect()
    }

    /// Items on loan: borrower insertion order, then each borrower's loan order.
    pub fn borrowed_items(&self) -> Vec<&Item> {
        self.ledger
            .borrowers()
            .flat_map(|(_, keys)| keys.iter())
            .filter_map(|key| self.positions.get(key).map(|&pos| &self.items[pos]))
            .collect()
    }

    /// Items currently held by `borrower` (empty if none).
    pub fn loans_of(&self, borrower: &str) -> Vec<&Item> {
        self.ledger
            .loans_of(borrower)
            .unwrap_or_default()
            .iter()
            .filter_map(|key| self.positions.get(key).map(|&pos| &self.items[pos]))
            .collect()
    }

    /// `Some(true)` if the item exists and is free, `None` if no such key.
    pub fn is_available(&self, key: &str) -> Option<bool> {
        self.positions
            .contains_key(key)
            .then(|| !self.ledger.is_on_loan(key))
    }

    /// Owned copy of the borrower -> items mapping.
    pub fn borrower_report(&self) -> BorrowerReport {
        self.ledger
            .borrowers()
            .map(|(borrower, keys)| {
                let items = keys
                    .iter()
                    .filter_map(|key| self.positions.get(key).map(|&pos| self.items[pos].clone()))
                    .collect();
                (borrower.clone(), items)
            })
            .collect()
    }

    pub fn counts(&self) -> CatalogCounts {
        CatalogCounts {
            total_items: self.items.len(),
            total_borrowed: self.ledger.loan_total(),
            total_borrowers: self.ledger.borrower_count(),
        }
    }

    // ---------------------------------------------------------------------
    // Snapshot conversion
    // ---------------------------------------------------------------------

    pub fn to_snapshot(&self) -> CatalogSnapshot {
        CatalogSnapshot {
            format: SNAPSHOT_FORMAT,
            items: self.items.clone(),
            borrowers: self
                .ledger
                .borrowers()
                .map(|(borrower, keys)| (borrower.clone(), keys.to_vec()))
                .collect(),
        }
    }

    /// Rebuild a catalog from a snapshot, rejecting any snapshot that breaks a
    /// catalog invariant with `InvariantViolation`.
    pub fn from_snapshot(snapshot: CatalogSnapshot) -> CatalogResult<Self> {
        if snapshot.format != SNAPSHOT_FORMAT {
            return Err(CatalogError::invariant(format!(
                "unsupported snapshot format {} (expected {SNAPSHOT_FORMAT})",
                snapshot.format
            )));
        }

        let mut catalog = Catalog::new();
        for item in snapshot.items {
            if catalog.positions.contains_key(item.key()) {
                return Err(CatalogError::invariant(format!(
                    "catalog key '{}' appears more than once",
                    item.key()
                )));
            }
            catalog.positions.insert(item.key().clone(), catalog.items.len());
            catalog.items.push(item);
        }

        for (borrower, keys) in snapshot.borrowers {
            if keys.is_empty() {
                return Err(CatalogError::invariant(format!(
                    "borrower {borrower} has an empty loan list"
                )));
            }
            if keys.len() > MAX_LOANS_PER_BORROWER {
                return Err(CatalogError::invariant(format!(
                    "borrower {borrower} holds {} items (limit {MAX_LOANS_PER_BORROWER})",
                    keys.len()
                )));
            }
            for key in keys {
                if !catalog.positions.contains_key(&key) {
                    return Err(CatalogError::invariant(format!(
                        "borrower {borrower} holds unknown key '{key}'"
                    )));
                }
                if catalog.ledger.is_on_loan(key.as_str()) {
                    return Err(CatalogError::invariant(format!(
                        "key '{key}' is on loan more than once"
                    )));
                }
                catalog.ledger.lend(borrower.clone(), key);
            }
        }

        catalog.check_invariants()?;
        Ok(catalog)
    }

    /// Verify that the key index matches the arena and that every item's
    /// availability flag agrees with the ledger.
    pub fn check_invariants(&self) -> CatalogResult<()> {
        if self.positions.len() != self.items.len() {
            return Err(CatalogError::invariant("key index out of sync with items"));
        }
        for (idx, item) in self.items.iter().enumerate() {
            if self.positions.get(item.key()) != Some(&idx) {
                return Err(CatalogError::invariant(format!(
                    "key index out of sync for '{}'",
                    item.key()
                )));
            }
            let on_loan = self.ledger.is_on_loan(item.key().as_str());
            if item.is_available() == on_loan {
                return Err(CatalogError::invariant(format!(
                    "item '{}' is marked {} but is {}on loan",
                    item.key(),
                    if item.is_available() { "available" } else { "unavailable" },
                    if on_loan { "" } else { "not " }
                )));
            }
        }
        Ok(())
    }
}
