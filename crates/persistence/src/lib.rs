//! Persistence gateway: whole-catalog snapshots and tabular bulk import/export.
//!
//! # Files
//!
//! ```text
//! library.json       # full snapshot (items + borrower ledger), JSON by default
//! library.json.tmp   # transient; written first, then renamed over library.json
//! books.csv          # tabular bulk format, items only
//! ```
//!
//! Snapshots are replaced as a whole: the encoded bytes go to `<path>.tmp`,
//! which is then renamed over the target. Readers see either the old or the
//! new snapshot, never a mix.
//!
//! The encoding is pluggable through [`SnapshotCodec`]; [`JsonCodec`] is the
//! one shipped.

pub mod codec;
pub mod error;
pub mod snapshot;
pub mod tabular;

pub use codec::{JsonCodec, SnapshotCodec};
pub use error::{PersistenceError, PersistenceResult};
pub use snapshot::{load, save, SnapshotFile};
pub use tabular::{
    export_items, export_table, import_items, import_table, ImportOptions, TABLE_HEADER,
};
