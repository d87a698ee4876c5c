//! Session context: everything one run of the program needs, passed explicitly.

use std::path::PathBuf;

use thiserror::Error;

use lendstore_catalog::{BorrowerReport, Catalog, CatalogCounts, Item};
use lendstore_core::{CatalogError, CatalogKey};
use lendstore_persistence::{
    export_table, import_table, ImportOptions, JsonCodec, PersistenceError, SnapshotFile,
};

use crate::command::{Command, ExportScope, SearchField, HELP};
use crate::config::AppConfig;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Result of a successfully executed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Added(CatalogKey),
    Removed(Item),
    Found(Item),
    Borrowed(Item),
    Returned(Item),
    Items(Vec<Item>),
    Report(BorrowerReport),
    Counts(CatalogCounts),
    Imported(usize),
    Exported(usize),
    Saved(PathBuf),
    Help,
    Quit,
}

/// Owns the catalog plus where and how it is persisted.
#[derive(Debug)]
pub struct Session {
    catalog: Catalog,
    snapshot: SnapshotFile<JsonCodec>,
    import: ImportOptions,
    dirty: bool,
}

impl Session {
    /// Open the configured snapshot.
    ///
    /// A missing snapshot starts an empty catalog. Any other failure (notably
    /// `CorruptData`) is returned so unreadable data is never overwritten.
    pub fn open(config: &AppConfig) -> Result<Self, PersistenceError> {
        let snapshot = SnapshotFile::new(&config.data_file, JsonCodec::new(config.pretty_snapshot));

        let catalog = match snapshot.load() {
            Ok(catalog) => catalog,
            Err(PersistenceError::NotFound(path)) => {
                tracing::warn!(path = %path.display(), "no snapshot found; starting with an empty catalog");
                Catalog::new()
            }
            Err(err) => return Err(err),
        };

        Ok(Self::new(catalog, snapshot, config.import))
    }

    pub fn new(catalog: Catalog, snapshot: SnapshotFile<JsonCodec>, import: ImportOptions) -> Self {
        Self {
            catalog,
            snapshot,
            import,
            dirty: false,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Whether the catalog changed since it was last loaded or saved.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Persist the whole catalog to the session's snapshot file.
    pub fn save(&mut self) -> Result<(), PersistenceError> {
        self.snapshot.save(&self.catalog)?;
        self.dirty = false;
        Ok(())
    }

    /// Run one command against the session.
    ///
    /// `Quit` saves before returning.
    pub fn execute(&mut self, command: Command) -> Result<Outcome, SessionError> {
        let outcome = match command {
            Command::Add(item) => {
                let key = item.key().clone();
                self.catalog.add(item)?;
                self.dirty = true;
                Outcome::Added(key)
            }
            Command::Remove(key) => {
                let item = self.catalog.remove(key.as_str())?;
                self.dirty = true;
                Outcome::Removed(item)
            }
            Command::Find(field, value) => {
                let found = match field {
                    SearchField::Key => self.catalog.find_by_key(&value),
                    SearchField::Title => self.catalog.find_by_title(&value),
                    SearchField::Creator => self.catalog.find_by_creator(&value),
                    SearchField::Category => self.catalog.find_by_category(&value),
                }?;
                Outcome::Found(found.clone())
            }
            Command::Borrow { title, borrower } => {
                let item = self.catalog.borrow(&title, borrower.as_str())?.clone();
                self.dirty = true;
                Outcome::Borrowed(item)
            }
            Command::Return { title, borrower } => {
                let item = self.catalog.return_item(&title, borrower.as_str())?.clone();
                self.dirty = true;
                Outcome::Returned(item)
            }
            Command::ListItems => Outcome::Items(self.catalog.items().to_vec()),
            Command::ListAvailable => Outcome::Items(cloned(self.catalog.available_items())),
            Command::ListBorrowed => Outcome::Items(cloned(self.catalog.borrowed_items())),
            Command::Report => Outcome::Report(self.catalog.borrower_report()),
            Command::Counts => Outcome::Counts(self.catalog.counts()),
            Command::Import(path) => {
                let items = import_table(&path, self.import)?;
                let count = items.len();
                self.catalog.add_batch(items)?;
                self.dirty |= count > 0;
                Outcome::Imported(count)
            }
            Command::Export(scope, path) => {
                let written = match scope {
                    ExportScope::All => export_table(self.catalog.items(), &path)?,
                    ExportScope::Available => export_table(self.catalog.available_items(), &path)?,
                };
                Outcome::Exported(written)
            }
            Command::Save => {
                self.save()?;
                Outcome::Saved(self.snapshot.path().to_path_buf())
            }
            Command::Help => Outcome::Help,
            Command::Quit => {
                self.save()?;
                Outcome::Quit
            }
        };
        Ok(outcome)
    }
}

fn cloned(items: Vec<&Item>) -> Vec<Item> {
    items.into_iter().cloned().collect()
}

impl core::fmt::Display for Outcome {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Outcome::Added(key) => write!(f, "added {key}"),
            Outcome::Removed(item) => write!(f, "removed {item}"),
            Outcome::Found(item) => write!(f, "{item}"),
            Outcome::Borrowed(item) => write!(f, "borrowed {item}"),
            Outcome::Returned(item) => write!(f, "returned {item}"),
            Outcome::Items(items) if items.is_empty() => write!(f, "(none)"),
            Outcome::Items(items) => {
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            Outcome::Report(report) if report.is_empty() => write!(f, "(no borrowers)"),
            Outcome::Report(report) => {
                for (idx, (borrower, items)) in report.iter().enumerate() {
                    if idx > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{borrower}:")?;
                    for item in items {
                        write!(f, "\n  {item}")?;
                    }
                }
                Ok(())
            }
            Outcome::Counts(c) => write!(
                f,
                "items: {}, borrowed: {}, borrowers: {}",
                c.total_items, c.total_borrowed, c.total_borrowers
            ),
            Outcome::Imported(n) => write!(f, "imported {n} items"),
            Outcome::Exported(n) => write!(f, "exported {n} items"),
            Outcome::Saved(path) => write!(f, "saved to {}", path.display()),
            Outcome::Help => f.write_str(HELP),
            Outcome::Quit => write!(f, "saved; bye"),
        }
    }
}
