//! The pantry store: an ordered in-memory item list mirrored to one CSV file.
//!
//! Every mutating operation rewrites the whole file before returning, so the
//! file and the in-memory list agree whenever control is back with the
//! caller. There is no locking; two processes writing the same file race and
//! the last writer wins.

use crate::codec::{self, CodecError};
use crate::error::ErrorCode;
use crate::model::{Item, ItemId, NewItem, StoredItem};
use crate::normalize::normalize_at;
use chrono::{Local, NaiveDate};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Data file used when nothing else is configured.
pub const DEFAULT_DATA_FILE: &str = "pantry_data.csv";

/// Suggested file name for exports.
pub const EXPORT_FILE_NAME: &str = "pantry_export.csv";

/// Media type of exported bytes.
pub const EXPORT_CONTENT_TYPE: &str = "text/csv";

/// Errors surfaced by store mutations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Persist(#[from] CodecError),
}

impl StoreError {
    /// Machine-readable code associated with this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Persist(err) => err.code(),
        }
    }

    /// Optional remediation hint.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        self.code().hint()
    }
}

/// Non-fatal conditions reported back to the caller instead of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Warning {
    EmptyName,
    NothingSelected,
}

impl Warning {
    /// Stable identifier for JSON output.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::EmptyName => "empty_name",
            Self::NothingSelected => "nothing_selected",
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => f.write_str("Please enter an item name."),
            Self::NothingSelected => f.write_str("No items selected to delete."),
        }
    }
}

/// Result of [`Store::add`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added(StoredItem),
    Rejected(Warning),
}

/// Result of [`Store::remove_ids`] and [`Store::remove_matching`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The selection was applied and the file rewritten.
    Removed {
        count: usize,
        /// Selected ids that did not name a stored item.
        unknown: Vec<ItemId>,
    },
    Rejected(Warning),
}

/// A serialized copy of the store, ready to hand to a download or a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub file_name: &'static str,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Read and normalize the data file, using today's local date for blank
/// expiry cells.
///
/// Never fails. A missing file, an unreadable file, and a malformed file all
/// produce an empty list; the latter two are logged.
#[must_use]
pub fn load(path: &Path) -> Vec<Item> {
    load_at(path, Local::now().date_naive())
}

/// [`load`] with an explicit fallback date.
#[must_use]
pub fn load_at(path: &Path, today: NaiveDate) -> Vec<Item> {
    match codec::read_path(path) {
        Ok(Some(raws)) => {
            let items = normalize_at(&raws, today);
            debug!(path = %path.display(), count = items.len(), "loaded pantry items");
            items
        }
        Ok(None) => {
            debug!(path = %path.display(), "no data file yet");
            Vec::new()
        }
        Err(err) => {
            warn!(
                path = %path.display(),
                code = %err.code(),
                error = %err,
                "data file unreadable, starting empty"
            );
            Vec::new()
        }
    }
}

/// Owned handle on the item list and its backing file.
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    entries: Vec<StoredItem>,
    next_id: ItemId,
}

impl Store {
    /// Open the store backed by `path`, loading whatever it holds.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::open_at(path, Local::now().date_naive())
    }

    /// [`Store::open`] with an explicit fallback date for blank expiry cells.
    pub fn open_at(path: impl Into<PathBuf>, today: NaiveDate) -> Self {
        let path = path.into();
        let items = load_at(&path, today);
        let mut store = Self {
            path,
            entries: Vec::with_capacity(items.len()),
            next_id: ItemId::new(1),
        };
        for item in items {
            store.push(item);
        }
        store
    }

    fn push(&mut self, item: Item) -> StoredItem {
        let stored = StoredItem {
            id: self.next_id,
            item,
        };
        self.next_id = self.next_id.next();
        self.entries.push(stored.clone());
        stored
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored records in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[StoredItem] {
        &self.entries
    }

    /// Copies of the stored items, without ids.
    #[must_use]
    pub fn items(&self) -> Vec<Item> {
        self.entries.iter().map(|e| e.item.clone()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&StoredItem> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Overwrite the backing file with the current list.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persist`] if the file cannot be written.
    pub fn save(&self) -> Result<(), StoreError> {
        codec::write_path(&self.path, &self.items())?;
        debug!(path = %self.path.display(), count = self.entries.len(), "saved pantry items");
        Ok(())
    }

    /// Append an item and persist.
    ///
    /// A name that is empty after trimming is rejected with
    /// [`Warning::EmptyName`] and leaves the store untouched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persist`] if the file cannot be written. The
    /// item stays in memory in that case.
    pub fn add(&mut self, new_item: NewItem) -> Result<AddOutcome, StoreError> {
        let Some(item) = new_item.into_item() else {
            return Ok(AddOutcome::Rejected(Warning::EmptyName));
        };
        let stored = self.push(item);
        self.save()?;
        info!(id = %stored.id, name = %stored.item.name, "added item");
        Ok(AddOutcome::Added(stored))
    }

    /// Remove the records with the selected ids and persist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persist`] if the file cannot be written.
    pub fn remove_ids(&mut self, ids: &[ItemId]) -> Result<RemoveOutcome, StoreError> {
        if ids.is_empty() {
            return Ok(RemoveOutcome::Rejected(Warning::NothingSelected));
        }

        let selected: HashSet<ItemId> = ids.iter().copied().collect();
        let mut unknown: Vec<ItemId> = selected
            .iter()
            .copied()
            .filter(|id| self.get(*id).is_none())
            .collect();
        unknown.sort_unstable();

        let before = self.entries.len();
        self.entries.retain(|e| !selected.contains(&e.id));
        let count = before - self.entries.len();

        self.save()?;
        info!(count, "removed items by id");
        Ok(RemoveOutcome::Removed { count, unknown })
    }

    /// Remove every record value-equal to any of `targets` and persist.
    ///
    /// Records that were entered separately but hold identical values are
    /// indistinguishable here: all of them go.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persist`] if the file cannot be written.
    pub fn remove_matching(&mut self, targets: &[Item]) -> Result<RemoveOutcome, StoreError> {
        if targets.is_empty() {
            return Ok(RemoveOutcome::Rejected(Warning::NothingSelected));
        }

        let before = self.entries.len();
        self.entries.retain(|e| !targets.contains(&e.item));
        let count = before - self.entries.len();

        self.save()?;
        info!(count, "removed items by value");
        Ok(RemoveOutcome::Removed {
            count,
            unknown: Vec::new(),
        })
    }

    /// Drop every item and delete the backing file.
    ///
    /// Failing to delete the file is logged and otherwise ignored; the
    /// in-memory list is cleared regardless.
    pub fn clear(&mut self) {
        self.entries.clear();
        match fs::remove_file(&self.path) {
            Ok(()) => info!(path = %self.path.display(), "cleared pantry"),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!("cleared pantry (no data file)");
            }
            Err(err) => warn!(
                path = %self.path.display(),
                error = %err,
                "could not delete data file"
            ),
        }
    }

    /// Serialize the full list in the data file format.
    #[must_use]
    pub fn export(&self) -> Export {
        Export {
            file_name: EXPORT_FILE_NAME,
            content_type: EXPORT_CONTENT_TYPE,
            bytes: codec::write_items(&self.items()).into_bytes(),
        }
    }
}
