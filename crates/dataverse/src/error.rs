//! Error types for Dataverse.

use dataverse_core::{DecodeError, FactKind, RejectReason, TxId};
use dataverse_store::StoreError;
use thiserror::Error;

/// An execution fault. Aborts the enclosing transaction.
///
/// Validation rejections are not execution faults; they are reported through
/// [`Outcome`](crate::Outcome).
#[derive(Debug, Error)]
pub enum ExecuteError {
    /// The state write failed.
    #[error("state write failed: {0}")]
    Store(#[from] StoreError),
}

/// Errors from the read path.
#[derive(Debug, Error)]
pub enum QueryError {
    /// No fact of this kind was stored by the transaction.
    #[error("{kind} not found for transaction {tx_id}")]
    NotFound { kind: FactKind, tx_id: TxId },

    /// Stored bytes failed to decode. Only this crate writes them, so this
    /// is an internal consistency fault.
    #[error("stored {kind} for transaction {tx_id} is corrupt: {source}")]
    Corrupt {
        kind: FactKind,
        tx_id: TxId,
        #[source]
        source: DecodeError,
    },

    /// State read failed.
    #[error("state read failed: {0}")]
    Store(#[from] StoreError),
}

/// Errors from submitting to a ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Execution aborted; nothing was committed.
    #[error("transaction aborted: {0}")]
    Aborted(#[from] ExecuteError),

    /// Ledger state failure outside execution.
    #[error("ledger storage error: {0}")]
    Store(#[from] StoreError),
}

/// Errors from the secondary index synchronizer.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The content id is already registered.
    #[error("content id already registered: {0}")]
    AlreadyExists(String),

    /// Attestation names a content id with no confirmed registration.
    #[error("content id not registered: {0}")]
    NotRegistered(String),

    /// Notarization names an owner with no confirmed attestation.
    #[error("no attested machine for owner: {0}")]
    UnknownOwner(String),

    /// The ledger accepted the transaction but rejected the fact.
    #[error("fact rejected: {0}")]
    Rejected(RejectReason),

    /// Ledger submission failed.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Index read failed.
    #[error("index error: {0}")]
    Store(#[from] StoreError),
}

/// Errors loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),

    /// The configured index could not be opened.
    #[error("failed to open index: {0}")]
    Index(#[from] StoreError),
}

/// Result type for synchronizer operations.
pub type Result<T> = std::result::Result<T, SyncError>;
