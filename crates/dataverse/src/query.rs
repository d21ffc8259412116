//! The read path: key lookup, decode, typed record.

use serde::Serialize;

use dataverse_core::{
    decode, state_key, AttestedMachine, Fact, NotarizedData, RegisteredMachine, StorageKey, TxId,
};
use dataverse_store::StateRead;

use crate::error::QueryError;

/// A stored fact together with where it lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record<F> {
    /// The transaction that stored the fact.
    pub tx_id: TxId,
    /// The state key it is stored under.
    pub key: StorageKey,
    pub fact: F,
}

/// Look up the `F` stored by `tx_id`.
///
/// Returns `Ok(None)` when the transaction stored no such fact. Bytes that
/// are present but fail to decode are reported as [`QueryError::Corrupt`].
pub fn query<F, S>(state: &S, tx_id: &TxId) -> Result<Option<Record<F>>, QueryError>
where
    F: Fact,
    S: StateRead + ?Sized,
{
    let key = state_key(F::KIND, tx_id);
    let Some(bytes) = state.get(&key)? else {
        return Ok(None);
    };

    let fact = decode::<F>(&bytes).map_err(|source| {
        tracing::error!(kind = %F::KIND, %key, error = %source, "stored fact failed to decode");
        QueryError::Corrupt {
            kind: F::KIND,
            tx_id: *tx_id,
            source,
        }
    })?;

    Ok(Some(Record {
        tx_id: *tx_id,
        key,
        fact,
    }))
}

/// Like [`query`], but a missing fact is [`QueryError::NotFound`].
pub fn resolve<F, S>(state: &S, tx_id: &TxId) -> Result<Record<F>, QueryError>
where
    F: Fact,
    S: StateRead + ?Sized,
{
    query(state, tx_id)?.ok_or(QueryError::NotFound {
        kind: F::KIND,
        tx_id: *tx_id,
    })
}

/// The registration stored by `tx_id`.
pub fn registration<S: StateRead + ?Sized>(
    state: &S,
    tx_id: &TxId,
) -> Result<Record<RegisteredMachine>, QueryError> {
    resolve(state, tx_id)
}

/// The attestation stored by `tx_id`.
pub fn attestation<S: StateRead + ?Sized>(
    state: &S,
    tx_id: &TxId,
) -> Result<Record<AttestedMachine>, QueryError> {
    resolve(state, tx_id)
}

/// The notarization stored by `tx_id`.
pub fn notarization<S: StateRead + ?Sized>(
    state: &S,
    tx_id: &TxId,
) -> Result<Record<NotarizedData>, QueryError> {
    resolve(state, tx_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execute::execute_fact;
    use dataverse_core::{DecodeError, FactKind};
    use dataverse_store::{MemoryState, StateMut};

    #[test]
    fn test_query_after_execute() {
        let mut state = MemoryState::new();
        let tx = TxId::from_bytes([1; 32]);
        let fact = RegisteredMachine::new("bafy001");
        execute_fact(&fact, &tx, &mut state).unwrap();

        let record = registration(&state, &tx).unwrap();
        assert_eq!(record.fact, fact);
        assert_eq!(record.tx_id, tx);
        assert_eq!(record.key, state_key(FactKind::Register, &tx));
    }

    #[test]
    fn test_unknown_tx_is_not_found() {
        let state = MemoryState::new();
        let tx = TxId::from_bytes([9; 32]);

        assert!(query::<AttestedMachine, _>(&state, &tx).unwrap().is_none());
        assert!(matches!(
            attestation(&state, &tx),
            Err(QueryError::NotFound {
                kind: FactKind::Attest,
                ..
            })
        ));
    }

    #[test]
    fn test_wrong_kind_is_not_found() {
        let mut state = MemoryState::new();
        let tx = TxId::from_bytes([1; 32]);
        execute_fact(&RegisteredMachine::new("bafy001"), &tx, &mut state).unwrap();

        assert!(matches!(
            notarization(&state, &tx),
            Err(QueryError::NotFound { .. })
        ));
    }

    #[test]
    fn test_corrupt_bytes_distinguished_from_missing() {
        let mut state = MemoryState::new();
        let tx = TxId::from_bytes([2; 32]);
        state
            .put(state_key(FactKind::Register, &tx), vec![0, 0, 0, 9, 1])
            .unwrap();

        match registration(&state, &tx) {
            Err(QueryError::Corrupt { source, .. }) => {
                assert!(matches!(source, DecodeError::Truncated { .. }));
            }
            other => panic!("expected corrupt, got {:?}", other),
        }
    }
}
