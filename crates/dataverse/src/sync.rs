//! The secondary index synchronizer.
//!
//! The ledger is only queryable by transaction id. The synchronizer keeps a
//! content-id keyed mirror of confirmed facts and gates each submission on
//! it:
//!
//! - `register` requires the content id to be unknown to the index
//! - `attest` requires a confirmed registration of its content id
//! - `notarize` requires a confirmed attestation of its owner address
//!
//! The index is written only after the ledger accepted the fact. If that
//! write fails, the ledger stays authoritative and the error is logged; the
//! index catches up on a later re-synchronization.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use bytes::Bytes;

use dataverse_core::{
    data_content_id, Action, AttestedMachine, NotarizedData, RegisteredMachine, TxId,
};
use dataverse_store::{
    AttestationEntry, IndexStore, InsertResult, NotarizationEntry, RegistrationEntry,
};

use crate::config::DataverseConfig;
use crate::error::{Result, SyncError};
use crate::ledger::{Ledger, TxOutcome};

/// Keeps a secondary index in step with a ledger.
pub struct Synchronizer<I: IndexStore, L: Ledger> {
    /// The secondary index.
    index: Arc<I>,
    /// The ledger facts are submitted to.
    ledger: Arc<L>,
    /// Data type tag attached to notarizations.
    data_type: Bytes,
    /// Content ids with a registration in flight.
    pending: Mutex<HashSet<Bytes>>,
}

impl<I: IndexStore, L: Ledger> Synchronizer<I, L> {
    /// Create a synchronizer with the default configuration.
    pub fn new(index: I, ledger: L) -> Self {
        Self::with_config(index, ledger, &DataverseConfig::default())
    }

    /// Create a synchronizer using `config`.
    pub fn with_config(index: I, ledger: L, config: &DataverseConfig) -> Self {
        Self::from_shared(Arc::new(index), Arc::new(ledger), config)
    }

    /// Create a synchronizer over handles shared with other components.
    pub fn from_shared(index: Arc<I>, ledger: Arc<L>, config: &DataverseConfig) -> Self {
        Self {
            index,
            ledger,
            data_type: Bytes::from(config.notarize_data_type.clone()),
            pending: Mutex::new(HashSet::new()),
        }
    }

    /// Get the index reference.
    pub fn index(&self) -> &I {
        &self.index
    }

    /// Get the ledger reference.
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Submissions
    // ─────────────────────────────────────────────────────────────────────────

    /// Register a machine content id.
    ///
    /// Fails with `AlreadyExists` if the index already holds the content id
    /// or another registration of it is in flight on this synchronizer.
    /// Callers on separate synchronizers sharing one index may all reach the
    /// ledger; exactly one wins the index insert.
    pub async fn register(&self, content_id: impl Into<Bytes>) -> Result<TxId> {
        let content_id = content_id.into();

        let Some(_reservation) = Reservation::acquire(&self.pending, &content_id) else {
            tracing::debug!(content_id = %lossy(&content_id), "registration already in flight");
            return Err(SyncError::AlreadyExists(lossy(&content_id)));
        };

        // Checked under the reservation, so a registration that finished
        // while this one waited is always seen.
        if self.index.get_registration(&content_id).await?.is_some() {
            return Err(SyncError::AlreadyExists(lossy(&content_id)));
        }

        let confirmed = self
            .submit(RegisteredMachine::new(content_id.clone()).into())
            .await?;

        let entry = RegistrationEntry {
            content_id: content_id.clone(),
            tx_id: confirmed,
        };
        match self.index.insert_registration(&entry).await {
            Ok(InsertResult::Inserted) => {
                tracing::debug!(content_id = %lossy(&content_id), tx_id = %confirmed, "registration indexed");
                Ok(confirmed)
            }
            Ok(InsertResult::AlreadyExists) => {
                tracing::warn!(content_id = %lossy(&content_id), tx_id = %confirmed, "registration lost index race");
                Err(SyncError::AlreadyExists(lossy(&content_id)))
            }
            Err(e) => {
                tracing::warn!(tx_id = %confirmed, error = %e, "index write failed after ledger commit");
                Ok(confirmed)
            }
        }
    }

    /// Attest a machine against a registered content id.
    ///
    /// Fails with `NotRegistered` before anything is submitted if the content
    /// id has no confirmed registration.
    pub async fn attest(
        &self,
        machine_address: impl Into<Bytes>,
        category: impl Into<Bytes>,
        manufacturer: impl Into<Bytes>,
        content_id: impl Into<Bytes>,
    ) -> Result<TxId> {
        let fact = AttestedMachine::new(machine_address, category, manufacturer, content_id);

        if self.index.get_registration(&fact.content_id).await?.is_none() {
            return Err(SyncError::NotRegistered(lossy(&fact.content_id)));
        }

        let confirmed = self.submit(fact.clone().into()).await?;

        let entry = AttestationEntry {
            machine_address: fact.machine_address,
            content_id: fact.content_id,
            category: fact.category,
            manufacturer: fact.manufacturer,
            tx_id: confirmed,
        };
        match self.index.upsert_attestation(&entry).await {
            Ok(()) => tracing::debug!(tx_id = %confirmed, "attestation indexed"),
            Err(e) => {
                tracing::warn!(tx_id = %confirmed, error = %e, "index write failed after ledger commit")
            }
        }
        Ok(confirmed)
    }

    /// Notarize a data content id for an attested owner.
    ///
    /// The notarization references the owner's attesting transaction. Fails
    /// with `UnknownOwner` if the owner address has no confirmed attestation.
    pub async fn notarize(
        &self,
        owner_address: impl Into<Bytes>,
        data_content_id: impl Into<Bytes>,
    ) -> Result<TxId> {
        let owner_address = owner_address.into();
        let data_content_id = data_content_id.into();

        let Some(attestation) = self.index.get_attestation(&owner_address).await? else {
            return Err(SyncError::UnknownOwner(lossy(&owner_address)));
        };

        let fact = NotarizedData::new(
            attestation.tx_id.as_bytes().to_vec(),
            owner_address.clone(),
            data_content_id.clone(),
            self.data_type.clone(),
        );
        let confirmed = self.submit(fact.into()).await?;

        let entry = NotarizationEntry {
            data_content_id,
            owner_address,
            tx_id: confirmed,
        };
        match self.index.upsert_notarization(&entry).await {
            Ok(()) => tracing::debug!(tx_id = %confirmed, "notarization indexed"),
            Err(e) => {
                tracing::warn!(tx_id = %confirmed, error = %e, "index write failed after ledger commit")
            }
        }
        Ok(confirmed)
    }

    /// Derive the content id of `data` and notarize it.
    ///
    /// Returns the transaction id and the derived content id.
    pub async fn notarize_data(
        &self,
        owner_address: impl Into<Bytes>,
        data: &[u8],
    ) -> Result<(TxId, String)> {
        let cid = data_content_id(data);
        let tx_id = self.notarize(owner_address, cid.clone()).await?;
        Ok((tx_id, cid))
    }

    async fn submit(&self, action: Action) -> Result<TxId> {
        let TxOutcome { tx_id, kind, outcome } = self.ledger.submit(action).await?;
        match outcome.rejection {
            None => Ok(tx_id),
            Some(reason) => {
                tracing::warn!(%kind, %tx_id, %reason, "ledger rejected fact");
                Err(SyncError::Rejected(reason))
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lookups
    // ─────────────────────────────────────────────────────────────────────────

    /// The registering transaction for a content id.
    pub async fn get_registration(&self, content_id: &[u8]) -> Result<Option<TxId>> {
        Ok(self
            .index
            .get_registration(content_id)
            .await?
            .map(|entry| entry.tx_id))
    }

    /// The latest attestation for a machine address.
    pub async fn attestation_by_address(
        &self,
        machine_address: &[u8],
    ) -> Result<Option<AttestationEntry>> {
        Ok(self.index.get_attestation(machine_address).await?)
    }

    /// The latest notarization for a data content id.
    pub async fn notarization(&self, data_content_id: &[u8]) -> Result<Option<NotarizationEntry>> {
        Ok(self.index.get_notarization(data_content_id).await?)
    }

    /// Whether a data content id has been notarized.
    pub async fn verify(&self, data_content_id: &[u8]) -> Result<bool> {
        Ok(self.index.has_notarization(data_content_id).await?)
    }

    /// Derive the content id of `data` and check it has been notarized.
    pub async fn verify_data(&self, data: &[u8]) -> Result<bool> {
        self.verify(data_content_id(data).as_bytes()).await
    }
}

/// Holds a content id in the pending set until dropped.
struct Reservation<'a> {
    pending: &'a Mutex<HashSet<Bytes>>,
    content_id: Bytes,
}

impl<'a> Reservation<'a> {
    fn acquire(pending: &'a Mutex<HashSet<Bytes>>, content_id: &Bytes) -> Option<Self> {
        let inserted = pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(content_id.clone());
        inserted.then(|| Self {
            pending,
            content_id: content_id.clone(),
        })
    }
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.content_id);
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
