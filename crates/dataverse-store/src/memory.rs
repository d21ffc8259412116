//! In-memory implementations of the state and index traits.
//!
//! [`MemoryState`] backs the in-process ledger. [`MemoryIndex`] has the same
//! semantics as the SQLite index but keeps everything in memory.

use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use bytes::Bytes;

use dataverse_core::StorageKey;

use crate::error::{Result, StoreError};
use crate::traits::{
    AttestationEntry, IndexStore, InsertResult, NotarizationEntry, RegistrationEntry, StateMut,
    StateRead,
};

/// Ordered in-memory key-value state.
#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    entries: BTreeMap<StorageKey, Vec<u8>>,
}

impl MemoryState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&StorageKey, &Vec<u8>)> {
        self.entries.iter()
    }
}

impl StateRead for MemoryState {
    fn get(&self, key: &StorageKey) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.get(key).cloned())
    }
}

impl StateMut for MemoryState {
    fn put(&mut self, key: StorageKey, value: Vec<u8>) -> Result<()> {
        self.entries.insert(key, value);
        Ok(())
    }
}

/// In-memory secondary index.
///
/// Thread-safe via RwLock; the write lock makes check-and-insert atomic.
pub struct MemoryIndex {
    inner: RwLock<MemoryIndexInner>,
}

#[derive(Default)]
struct MemoryIndexInner {
    /// Registrations by content id.
    registrations: HashMap<Bytes, RegistrationEntry>,

    /// Attestations by machine address.
    attestations: HashMap<Bytes, AttestationEntry>,

    /// Notarizations by data content id.
    notarizations: HashMap<Bytes, NotarizationEntry>,
}

impl MemoryIndex {
    /// Create a new empty in-memory index.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryIndexInner::default()),
        }
    }
}

impl Default for MemoryIndex {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(e: PoisonError<T>) -> StoreError {
    tracing::warn!("memory index lock poisoned");
    StoreError::Poisoned(e.to_string())
}

#[async_trait]
impl IndexStore for MemoryIndex {
    async fn insert_registration(&self, entry: &RegistrationEntry) -> Result<InsertResult> {
        let mut inner = self.inner.write().map_err(poisoned)?;
        if inner.registrations.contains_key(&entry.content_id) {
            return Ok(InsertResult::AlreadyExists);
        }
        inner
            .registrations
            .insert(entry.content_id.clone(), entry.clone());
        Ok(InsertResult::Inserted)
    }

    async fn get_registration(&self, content_id: &[u8]) -> Result<Option<RegistrationEntry>> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner.registrations.get(content_id).cloned())
    }

    async fn upsert_attestation(&self, entry: &AttestationEntry) -> Result<()> {
        let mut inner = self.inner.write().map_err(poisoned)?;
        inner
            .attestations
            .insert(entry.machine_address.clone(), entry.clone());
        Ok(())
    }

    async fn get_attestation(&self, machine_address: &[u8]) -> Result<Option<AttestationEntry>> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner.attestations.get(machine_address).cloned())
    }

    async fn upsert_notarization(&self, entry: &NotarizationEntry) -> Result<()> {
        let mut inner = self.inner.write().map_err(poisoned)?;
        inner
            .notarizations
            .insert(entry.data_content_id.clone(), entry.clone());
        Ok(())
    }

    async fn get_notarization(
        &self,
        data_content_id: &[u8],
    ) -> Result<Option<NotarizationEntry>> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner.notarizations.get(data_content_id).cloned())
    }
}
