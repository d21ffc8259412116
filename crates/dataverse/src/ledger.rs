//! Ledger hosts: where actions are executed and committed.
//!
//! The synchronizer only needs [`Ledger::submit`]. [`LocalLedger`] is an
//! in-process host over [`MemoryState`]: it assigns transaction ids, runs
//! each action inside a [`ScopedState`] limited to the action's declared
//! keys, and commits only when execution did not abort.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde::Serialize;

use dataverse_core::{
    Action, AttestedMachine, FactKind, NotarizedData, RegisteredMachine, TxId,
};
use dataverse_store::{MemoryState, ScopedState, StoreError};

use crate::error::{LedgerError, QueryError};
use crate::execute::{execute, Outcome};
use crate::query::{self, Record};

/// Domain separator mixed into locally assigned transaction ids.
const TX_ID_DOMAIN: &[u8] = b"dataverse.local.tx.v1";

/// The recorded result of one committed transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TxOutcome {
    pub tx_id: TxId,
    pub kind: FactKind,
    pub outcome: Outcome,
}

impl TxOutcome {
    /// Whether the fact was stored.
    pub fn is_accepted(&self) -> bool {
        self.outcome.is_accepted()
    }
}

/// A ledger that executes actions and reports their outcome.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Submit an action. Returns once the transaction is committed.
    ///
    /// A rejected fact is a committed transaction with a rejection outcome;
    /// only aborts are errors.
    async fn submit(&self, action: Action) -> Result<TxOutcome, LedgerError>;
}

/// In-process ledger over an in-memory state.
pub struct LocalLedger {
    salt: [u8; 32],
    inner: Mutex<LedgerInner>,
}

#[derive(Default)]
struct LedgerInner {
    state: MemoryState,
    nonce: u64,
    outcomes: HashMap<TxId, TxOutcome>,
}

impl LocalLedger {
    /// Create a ledger with a random transaction id salt.
    pub fn new() -> Self {
        Self::with_salt(rand::random())
    }

    /// Create a ledger with a fixed salt. Transaction ids are then
    /// deterministic for a given submission sequence.
    pub fn with_salt(salt: [u8; 32]) -> Self {
        Self {
            salt,
            inner: Mutex::new(LedgerInner::default()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, LedgerInner>, StoreError> {
        self.inner.lock().map_err(|e| {
            tracing::warn!("local ledger lock poisoned");
            StoreError::Poisoned(e.to_string())
        })
    }

    fn tx_id(&self, action_bytes: &[u8], nonce: u64) -> TxId {
        let mut hasher = blake3::Hasher::new();
        hasher.update(TX_ID_DOMAIN);
        hasher.update(&self.salt);
        hasher.update(action_bytes);
        hasher.update(&nonce.to_be_bytes());
        TxId::from_bytes(*hasher.finalize().as_bytes())
    }

    /// Execute and commit `action` synchronously.
    pub fn apply(&self, action: &Action) -> Result<TxOutcome, LedgerError> {
        let mut guard = self.lock()?;
        let inner = &mut *guard;

        let tx_id = self.tx_id(&action.encode(), inner.nonce);
        inner.nonce += 1;

        let mut scoped = ScopedState::new(&mut inner.state, action.state_keys(&tx_id));
        let outcome = match execute(action, &tx_id, &mut scoped) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(%tx_id, kind = %action.kind(), error = %e, "transaction aborted");
                scoped.discard();
                return Err(e.into());
            }
        };
        scoped.commit()?;

        let result = TxOutcome {
            tx_id,
            kind: action.kind(),
            outcome,
        };
        inner.outcomes.insert(tx_id, result);
        tracing::debug!(%tx_id, kind = %action.kind(), accepted = outcome.is_accepted(), "transaction committed");
        Ok(result)
    }

    /// The outcome recorded for `tx_id`, if it was committed here.
    pub fn outcome(&self, tx_id: &TxId) -> Result<Option<TxOutcome>, StoreError> {
        Ok(self.lock()?.outcomes.get(tx_id).copied())
    }

    /// Number of committed transactions.
    pub fn tx_count(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.outcomes.len())
    }

    /// Number of keys in ledger state.
    pub fn state_len(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.state.len())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Read path
    // ─────────────────────────────────────────────────────────────────────────

    /// The registration stored by `tx_id`.
    pub fn registration(&self, tx_id: &TxId) -> Result<Record<RegisteredMachine>, QueryError> {
        query::registration(&self.lock()?.state, tx_id)
    }

    /// The attestation stored by `tx_id`.
    pub fn attestation(&self, tx_id: &TxId) -> Result<Record<AttestedMachine>, QueryError> {
        query::attestation(&self.lock()?.state, tx_id)
    }

    /// The notarization stored by `tx_id`.
    pub fn notarization(&self, tx_id: &TxId) -> Result<Record<NotarizedData>, QueryError> {
        query::notarization(&self.lock()?.state, tx_id)
    }
}

impl Default for LocalLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Ledger for LocalLedger {
    async fn submit(&self, action: Action) -> Result<TxOutcome, LedgerError> {
        self.apply(&action)
    }
}
