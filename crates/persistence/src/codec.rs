//! Snapshot encodings.

use lendstore_catalog::CatalogSnapshot;

use crate::error::PersistenceResult;

/// Pluggable byte encoding for catalog snapshots.
///
/// Implementations must be deterministic: the same snapshot always encodes to
/// the same bytes. Decoding failures map to `PersistenceError::CorruptData`.
pub trait SnapshotCodec: Send + Sync {
    /// Short name for logs (e.g. "json").
    fn name(&self) -> &'static str;

    fn encode(&self, snapshot: &CatalogSnapshot) -> PersistenceResult<Vec<u8>>;

    fn decode(&self, bytes: &[u8]) -> PersistenceResult<CatalogSnapshot>;
}

/// JSON snapshot encoding (serde_json).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonCodec {
    pretty: bool,
}

impl JsonCodec {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    pub fn compact() -> Self {
        Self::new(false)
    }

    pub fn pretty() -> Self {
        Self::new(true)
    }
}

impl Default for JsonCodec {
    fn default() -> Self {
        Self::pretty()
    }
}

impl SnapshotCodec for JsonCodec {
    fn name(&self) -> &'static str {
        "json"
    }

    fn encode(&self, snapshot: &CatalogSnapshot) -> PersistenceResult<Vec<u8>> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(snapshot)?
        } else {
            serde_json::to_vec(snapshot)?
        };
        Ok(bytes)
    }

    fn decode(&self, bytes: &[u8]) -> PersistenceResult<CatalogSnapshot> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
