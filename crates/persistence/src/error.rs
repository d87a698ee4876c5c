use std::path::PathBuf;

use thiserror::Error;

use lendstore_core::CatalogError;

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Persistence gateway error.
///
/// These are reported to the caller, who decides the fallback (e.g. start
/// with an empty catalog on `NotFound`).
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The backing file does not exist.
    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The bytes could not be turned into a valid catalog.
    #[error("corrupt snapshot data: {0}")]
    CorruptData(String),

    /// A tabular data row could not be parsed.
    #[error("malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl PersistenceError {
    pub fn corrupt(msg: impl Into<String>) -> Self {
        Self::CorruptData(msg.into())
    }

    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }
}

impl From<CatalogError> for PersistenceError {
    /// A decoded snapshot that the catalog refuses is corrupt data.
    fn from(value: CatalogError) -> Self {
        Self::CorruptData(value.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(value: serde_json::Error) -> Self {
        Self::CorruptData(value.to_string())
    }
}
