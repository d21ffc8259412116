//! Store traits: the ledger's keyed byte-state and the secondary index.
//!
//! [`StateRead`]/[`StateMut`] are the interface the host ledger supplies to
//! the write and read paths. They are synchronous: execution never suspends.
//!
//! [`IndexStore`] is the off-ledger mirror keyed by content identifier. It is
//! async and must make `insert_registration` atomic per content id.

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;

use dataverse_core::{StorageKey, TxId};

use crate::error::Result;

/// Read access to ledger state.
pub trait StateRead {
    /// Get the value stored under `key`.
    fn get(&self, key: &StorageKey) -> Result<Option<Vec<u8>>>;
}

/// Mutable ledger state, scoped to one transaction's execution.
pub trait StateMut: StateRead {
    /// Store `value` under `key`, replacing any previous value.
    fn put(&mut self, key: StorageKey, value: Vec<u8>) -> Result<()>;
}

impl<S: StateRead + ?Sized> StateRead for &S {
    fn get(&self, key: &StorageKey) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }
}

impl<S: StateRead + ?Sized> StateRead for &mut S {
    fn get(&self, key: &StorageKey) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }
}

impl<S: StateMut + ?Sized> StateMut for &mut S {
    fn put(&mut self, key: StorageKey, value: Vec<u8>) -> Result<()> {
        (**self).put(key, value)
    }
}

/// Result of inserting a unique index entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertResult {
    /// Entry was inserted.
    Inserted,
    /// An entry with the same content id already exists (left untouched).
    AlreadyExists,
}

/// A confirmed machine registration, keyed by content id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationEntry {
    pub content_id: Bytes,
    pub tx_id: TxId,
}

/// A confirmed machine attestation, keyed by machine address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttestationEntry {
    pub machine_address: Bytes,
    pub content_id: Bytes,
    pub category: Bytes,
    pub manufacturer: Bytes,
    pub tx_id: TxId,
}

/// A confirmed data notarization, keyed by data content id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotarizationEntry {
    pub data_content_id: Bytes,
    pub owner_address: Bytes,
    pub tx_id: TxId,
}

/// The secondary index: a content-id keyed mirror of confirmed facts.
///
/// # Design Notes
///
/// - **Unique registrations**: `insert_registration` is an atomic
///   check-and-insert; concurrent callers for one content id see exactly one
///   `Inserted`.
/// - **Upserts**: attestations (by machine address) and notarizations (by
///   data content id) are idempotent upserts; the latest write wins.
/// - Content ids and addresses are opaque bytes compared for exact equality.
#[async_trait]
pub trait IndexStore: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Registrations
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert a registration unless one exists for the same content id.
    async fn insert_registration(&self, entry: &RegistrationEntry) -> Result<InsertResult>;

    /// Get the registration for a content id.
    async fn get_registration(&self, content_id: &[u8]) -> Result<Option<RegistrationEntry>>;

    // ─────────────────────────────────────────────────────────────────────────
    // Attestations
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert or replace the attestation for a machine address.
    async fn upsert_attestation(&self, entry: &AttestationEntry) -> Result<()>;

    /// Get the attestation for a machine address.
    async fn get_attestation(&self, machine_address: &[u8]) -> Result<Option<AttestationEntry>>;

    // ─────────────────────────────────────────────────────────────────────────
    // Notarizations
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert or replace the notarization for a data content id.
    async fn upsert_notarization(&self, entry: &NotarizationEntry) -> Result<()>;

    /// Get the notarization for a data content id.
    async fn get_notarization(&self, data_content_id: &[u8])
        -> Result<Option<NotarizationEntry>>;

    /// Check whether a data content id has been notarized.
    async fn has_notarization(&self, data_content_id: &[u8]) -> Result<bool> {
        Ok(self.get_notarization(data_content_id).await?.is_some())
    }
}
