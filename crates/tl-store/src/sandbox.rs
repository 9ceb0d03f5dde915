use std::collections::BTreeMap;

use tl_types::LedgerIndex;
use tracing::trace;

use crate::changes::{EntryChange, WriteSet};
use crate::config::LedgerConfig;
use crate::entry::LedgerEntry;
use crate::error::{StoreError, StoreResult};
use crate::traits::ReadView;

/// Working view of one transition.
///
/// Reads fall through to the base view unless this sandbox already touched
/// the index. Writes never reach the base: they accumulate here and leave
/// only through [`Sandbox::into_write_set`]. Dropping the sandbox discards
/// every write.
pub struct Sandbox<'a> {
    base: &'a dyn ReadView,
    items: BTreeMap<LedgerIndex, EntryChange>,
}

impl<'a> Sandbox<'a> {
    pub fn new(base: &'a dyn ReadView) -> Self {
        Self {
            base,
            items: BTreeMap::new(),
        }
    }

    /// Insert a new entry at its own index.
    ///
    /// Fails with [`StoreError::AlreadyExists`] if the index is occupied.
    pub fn create(&mut self, entry: LedgerEntry) -> StoreResult<()> {
        let index = entry.index();
        if self.exists(&index)? {
            return Err(StoreError::AlreadyExists(index));
        }
        // Re-creating over an erased base entry is a modification of it.
        let change = match self.items.get(&index) {
            Some(EntryChange::Deleted) => EntryChange::Modified(entry),
            _ => EntryChange::Created(entry),
        };
        trace!(index = %index.short_hex(), "sandbox create");
        self.items.insert(index, change);
        Ok(())
    }

    /// Replace an existing entry.
    ///
    /// Fails with [`StoreError::NotFound`] if nothing is stored at its index.
    pub fn modify(&mut self, entry: LedgerEntry) -> StoreResult<()> {
        let index = entry.index();
        if !self.exists(&index)? {
            return Err(StoreError::NotFound(index));
        }
        let change = match self.items.get(&index) {
            Some(EntryChange::Created(_)) => EntryChange::Created(entry),
            _ => EntryChange::Modified(entry),
        };
        trace!(index = %index.short_hex(), "sandbox modify");
        self.items.insert(index, change);
        Ok(())
    }

    /// Remove an existing entry.
    ///
    /// Fails with [`StoreError::NotFound`] if nothing is stored at `index`.
    pub fn delete(&mut self, index: &LedgerIndex) -> StoreResult<()> {
        if !self.exists(index)? {
            return Err(StoreError::NotFound(*index));
        }
        if let Some(EntryChange::Created(_)) = self.items.get(index) {
            self.items.remove(index);
        } else if self.base.exists(index)? {
            self.items.insert(*index, EntryChange::Deleted);
        } else {
            self.items.remove(index);
        }
        trace!(index = %index.short_hex(), "sandbox delete");
        Ok(())
    }

    /// Number of indexes this sandbox has written.
    pub fn touched(&self) -> usize {
        self.items.len()
    }

    /// Consume the sandbox and return its writes.
    pub fn into_write_set(self) -> WriteSet {
        WriteSet::from_changes(self.items)
    }
}

impl ReadView for Sandbox<'_> {
    fn read(&self, index: &LedgerIndex) -> StoreResult<Option<LedgerEntry>> {
        match self.items.get(index) {
            Some(EntryChange::Created(entry)) | Some(EntryChange::Modified(entry)) => {
                Ok(Some(entry.clone()))
            }
            Some(EntryChange::Deleted) => Ok(None),
            None => self.base.read(index),
        }
    }

    fn config(&self) -> &LedgerConfig {
        self.base.config()
    }
}
