//! Transaction-scoped state view.
//!
//! A [`ScopedState`] is what one transaction's execution sees: it may only
//! touch the keys the transaction declared, each value must fit the chunk
//! budget declared for its key, and writes are buffered until
//! [`commit`](ScopedState::commit). Dropping the view without committing
//! discards every write.

use std::cell::Cell;
use std::collections::{BTreeMap, HashMap};

use dataverse_core::keys::chunks_for;
use dataverse_core::{DeclaredKey, StorageKey};

use crate::error::{Result, StoreError};
use crate::traits::{StateMut, StateRead};

/// A write-buffering view over `base`, limited to declared keys.
pub struct ScopedState<'a, S: StateMut + ?Sized> {
    base: &'a mut S,
    declared: HashMap<StorageKey, u16>,
    pending: BTreeMap<StorageKey, Vec<u8>>,
    reads: Cell<usize>,
}

impl<'a, S: StateMut + ?Sized> ScopedState<'a, S> {
    /// Open a view over `base` permitting access to `declared` keys only.
    pub fn new(base: &'a mut S, declared: impl IntoIterator<Item = DeclaredKey>) -> Self {
        Self {
            base,
            declared: declared
                .into_iter()
                .map(|d| (d.key, d.max_chunks))
                .collect(),
            pending: BTreeMap::new(),
            reads: Cell::new(0),
        }
    }

    fn budget(&self, key: &StorageKey) -> Result<u16> {
        self.declared
            .get(key)
            .copied()
            .ok_or_else(|| StoreError::UndeclaredKey(key.to_string()))
    }

    /// Number of reads served so far.
    pub fn reads(&self) -> usize {
        self.reads.get()
    }

    /// Flush buffered writes to the base state. Returns the number written.
    pub fn commit(self) -> Result<usize> {
        let count = self.pending.len();
        for (key, value) in self.pending {
            self.base.put(key, value)?;
        }
        Ok(count)
    }

    /// Drop all buffered writes.
    pub fn discard(self) {}
}

impl<S: StateMut + ?Sized> StateRead for ScopedState<'_, S> {
    fn get(&self, key: &StorageKey) -> Result<Option<Vec<u8>>> {
        self.budget(key)?;
        self.reads.set(self.reads.get() + 1);
        if let Some(value) = self.pending.get(key) {
            return Ok(Some(value.clone()));
        }
        self.base.get(key)
    }
}

impl<S: StateMut + ?Sized> StateMut for ScopedState<'_, S> {
    fn put(&mut self, key: StorageKey, value: Vec<u8>) -> Result<()> {
        let max = self.budget(&key)?;
        let chunks = chunks_for(value.len());
        if chunks > max as usize {
            return Err(StoreError::ChunkLimitExceeded {
                key: key.to_string(),
                chunks,
                max,
            });
        }
        self.pending.insert(key, value);
        Ok(())
    }
}
