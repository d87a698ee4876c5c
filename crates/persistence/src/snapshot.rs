//! Whole-catalog snapshot save/load.

use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use lendstore_catalog::Catalog;

use crate::codec::{JsonCodec, SnapshotCodec};
use crate::error::{PersistenceError, PersistenceResult};

/// Encode the full catalog (items + borrower ledger) into one snapshot.
pub fn save<C: SnapshotCodec + ?Sized>(catalog: &Catalog, codec: &C) -> PersistenceResult<Vec<u8>> {
    codec.encode(&catalog.to_snapshot())
}

/// Decode a snapshot and rebuild the catalog.
///
/// Unparsable bytes and snapshots that break a catalog invariant are both
/// `CorruptData`.
pub fn load<C: SnapshotCodec + ?Sized>(bytes: &[u8], codec: &C) -> PersistenceResult<Catalog> {
    let snapshot = codec.decode(bytes)?;
    Ok(Catalog::from_snapshot(snapshot)?)
}

/// A snapshot stored in a single file.
#[derive(Debug, Clone)]
pub struct SnapshotFile<C = JsonCodec> {
    path: PathBuf,
    codec: C,
}

impl SnapshotFile<JsonCodec> {
    /// JSON snapshot file (pretty-printed).
    pub fn json(path: impl Into<PathBuf>) -> Self {
        Self::new(path, JsonCodec::default())
    }
}

impl<C: SnapshotCodec> SnapshotFile<C> {
    pub fn new(path: impl Into<PathBuf>, codec: C) -> Self {
        Self {
            path: path.into(),
            codec,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Replace the stored snapshot with the current catalog.
    ///
    /// Write-then-rename: a crash mid-write leaves the previous snapshot intact.
    pub fn save(&self, catalog: &Catalog) -> PersistenceResult<()> {
        let bytes = save(catalog, &self.codec)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let temp_path = self.temp_path();
        if let Err(err) = fs::write(&temp_path, &bytes).and_then(|()| fs::rename(&temp_path, &self.path)) {
            let _ = fs::remove_file(&temp_path);
            return Err(err.into());
        }

        tracing::info!(
            path = %self.path.display(),
            codec = self.codec.name(),
            items = catalog.len(),
            bytes = bytes.len(),
            "snapshot saved"
        );
        Ok(())
    }

    /// Read and rebuild the stored catalog.
    ///
    /// `NotFound` if the file does not exist; the caller decides whether that
    /// means "start empty".
    pub fn load(&self) -> PersistenceResult<Catalog> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(PersistenceError::NotFound(self.path.clone()));
            }
            Err(err) => return Err(err.into()),
        };

        let catalog = load(&bytes, &self.codec)?;
        tracing::info!(
            path = %self.path.display(),
            codec = self.codec.name(),
            items = catalog.len(),
            borrowers = catalog.counts().total_borrowers,
            "snapshot loaded"
        );
        Ok(catalog)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lendstore_catalog::{CatalogSnapshot, Item, SNAPSHOT_FORMAT};
    use lendstore_core::BorrowerName;

    #[test]
    fn byte_level_round_trip() {
        let mut catalog = Catalog::new();
        catalog
            .add(Item::new("123", "Brave New World", "A. Huxley", "Fiction", 1932))
            .unwrap();
        catalog.borrow("Brave New World", "Alice").unwrap();

        let codec = JsonCodec::compact();
        let bytes = save(&catalog, &codec).unwrap();
        let restored = load(&bytes, &codec).unwrap();

        assert_eq!(restored, catalog);
        assert!(!restored.find_by_key("123").unwrap().is_available());
    }

    #[test]
    fn invariant_breaking_snapshot_is_corrupt() {
        // Well-formed JSON, but Bob holds a key that does not exist.
        let bytes = br#"{"format":1,"items":[],"borrowers":{"Bob":["404"]}}"#;
        let err = load(bytes, &JsonCodec::default()).unwrap_err();
        assert!(matches!(err, PersistenceError::CorruptData(_)));
    }

    #[test]
    fn over_limit_borrower_snapshot_is_corrupt() {
        let items: Vec<Item> = (1..=7)
            .map(|n| Item::new(format!("key-{n}"), format!("Title {n}"), "Author", "Genre", 2000))
            .collect();
        let keys: Vec<_> = items.iter().map(|item| item.key().clone()).collect();
        let snapshot = CatalogSnapshot {
            format: SNAPSHOT_FORMAT,
            items,
            borrowers: [(BorrowerName::from("Alice"), keys)].into_iter().collect(),
        };

        let codec = JsonCodec::compact();
        let bytes = codec.encode(&snapshot).unwrap();
        match load(&bytes, &codec).unwrap_err() {
            PersistenceError::CorruptData(reason) => assert!(reason.contains("limit 6")),
            other => panic!("Expected CorruptData, got {other:?}"),
        }
    }

    #[test]
    fn temp_path_appends_suffix() {
        let file = SnapshotFile::json("data/library.json");
        assert_eq!(file.temp_path(), PathBuf::from("data/library.json.tmp"));
    }
}
