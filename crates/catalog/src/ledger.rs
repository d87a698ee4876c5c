//! Borrower ledger: who holds which catalog keys.
//!
//! The ledger stores keys, never item copies. It is the single source of truth
//! for "is this item on loan"; the availability flag on catalog items is a
//! projection of it.

use std::collections::HashMap;

use indexmap::IndexMap;

use lendstore_core::{BorrowerName, CatalogKey};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Ledger {
    /// Borrower insertion order, then per-borrower loan order. Never holds an empty list.
    loans: IndexMap<BorrowerName, Vec<CatalogKey>>,
    /// Reverse index: key -> current holder.
    holders: HashMap<CatalogKey, BorrowerName>,
}

impl Ledger {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn holder_of(&self, key: &str) -> Option<&BorrowerName> {
        self.holders.get(key)
    }

    pub(crate) fn is_on_loan(&self, key: &str) -> bool {
        self.holders.contains_key(key)
    }

    pub(crate) fn loan_count(&self, borrower: &str) -> usize {
        self.loans.get(borrower).map_or(0, Vec::len)
    }

    pub(crate) fn loans_of(&self, borrower: &str) -> Option<&[CatalogKey]> {
        self.loans.get(borrower).map(Vec::as_slice)
    }

    pub(crate) fn borrowers(&self) -> impl Iterator<Item = (&BorrowerName, &[CatalogKey])> {
        self.loans.iter().map(|(b, keys)| (b, keys.as_slice()))
    }

    pub(crate) fn borrower_count(&self) -> usize {
        self.loans.len()
    }

    pub(crate) fn loan_total(&self) -> usize {
        self.holders.len()
    }

    /// Record a loan. Caller has already checked the key is free.
    pub(crate) fn lend(&mut self, borrower: BorrowerName, key: CatalogKey) {
        debug_assert!(!self.holders.contains_key(&key));
        self.holders.insert(key.clone(), borrower.clone());
        self.loans.entry(borrower).or_default().push(key);
    }

    /// Release a loan held by `borrower`. Returns `false` (and changes nothing)
    /// if that borrower does not hold the key.
    ///
    /// A borrower whose list becomes empty is pruned; remaining borrowers keep
    /// their relative order.
    pub(crate) fn release(&mut self, borrower: &str, key: &str) -> bool {
        let Some(keys) = self.loans.get_mut(borrower) else {
            return false;
        };
        let Some(pos) = keys.iter().position(|k| k.as_str() == key) else {
            return false;
        };

        keys.remove(pos);
        if keys.is_empty() {
            self.loans.shift_remove(borrower);
        }
        self.holders.remove(key);
        true
    }
}
