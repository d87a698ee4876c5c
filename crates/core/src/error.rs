//! Domain error model.

use thiserror::Error;

use crate::id::{BorrowerName, CatalogKey};

/// Result type used across the domain layer.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog-level error.
///
/// Every catalog operation either commits its whole effect or returns one of
/// these and leaves state untouched. Persistence failures live in the
/// persistence crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// An item with the same catalog key is already present (or repeated in a batch).
    #[error("duplicate catalog key: {0}")]
    DuplicateKey(CatalogKey),

    /// No item matched the lookup.
    #[error("not found: {0}")]
    NotFound(String),

    /// The item exists but is currently on loan.
    #[error("item unavailable: {0}")]
    Unavailable(String),

    /// The item is not on loan to the given borrower (or not on loan at all).
    #[error("not borrowed: {0}")]
    NotBorrowed(String),

    /// The borrower already holds the maximum number of items.
    #[error("borrow limit exceeded: {borrower} already holds {limit} items")]
    BorrowLimitExceeded { borrower: BorrowerName, limit: usize },

    /// The operation conflicts with current state (e.g. removing an item on loan).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A value failed validation (e.g. a blank identifier).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A catalog invariant was violated (e.g. a restored snapshot is inconsistent).
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

impl CatalogError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn not_borrowed(msg: impl Into<String>) -> Self {
        Self::NotBorrowed(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }
}
