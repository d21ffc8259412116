//! Action: the closed set of fact-carrying transaction payloads.
//!
//! The host ledger dispatches on the action type id; here that is a plain
//! `match` over [`Action`], so adding a kind is a compile error everywhere it
//! is not handled.

use serde::{Deserialize, Serialize};

use crate::canonical::{Reader, Writer};
use crate::error::{DecodeError, RejectReason};
use crate::fact::{AttestedMachine, Fact, FactKind, NotarizedData, RegisteredMachine};
use crate::keys::{max_chunks, state_key};
use crate::types::{StorageKey, TxId};

/// Flat compute charge for a registration.
pub const REGISTER_COMPUTE_UNITS: u64 = 5;

/// Flat compute charge for an attestation.
pub const ATTEST_COMPUTE_UNITS: u64 = 10;

/// Flat compute charge for a notarization.
pub const NOTARIZE_COMPUTE_UNITS: u64 = 10;

/// Static compute charge for `kind`.
///
/// Independent of field lengths: billing precision is traded for a
/// predictable fee quote.
pub const fn compute_units(kind: FactKind) -> u64 {
    match kind {
        FactKind::Register => REGISTER_COMPUTE_UNITS,
        FactKind::Attest => ATTEST_COMPUTE_UNITS,
        FactKind::Notarize => NOTARIZE_COMPUTE_UNITS,
    }
}

/// A state key the action may write, with its declared chunk budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredKey {
    pub key: StorageKey,
    pub max_chunks: u16,
}

/// One submitted fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    Register(RegisteredMachine),
    Attest(AttestedMachine),
    Notarize(NotarizedData),
}

impl Action {
    /// The fact kind carried.
    pub fn kind(&self) -> FactKind {
        match self {
            Action::Register(_) => FactKind::Register,
            Action::Attest(_) => FactKind::Attest,
            Action::Notarize(_) => FactKind::Notarize,
        }
    }

    /// Validate the carried fact.
    pub fn validate(&self) -> Result<(), RejectReason> {
        match self {
            Action::Register(f) => f.validate(),
            Action::Attest(f) => f.validate(),
            Action::Notarize(f) => f.validate(),
        }
    }

    /// Encoded size of the carried fact (without the type id).
    pub fn fact_size(&self) -> usize {
        match self {
            Action::Register(f) => f.size(),
            Action::Attest(f) => f.size(),
            Action::Notarize(f) => f.size(),
        }
    }

    /// Static compute charge.
    pub fn compute_units(&self) -> u64 {
        compute_units(self.kind())
    }

    /// Keys this action may write when executed as `tx_id`.
    pub fn state_keys(&self, tx_id: &TxId) -> Vec<DeclaredKey> {
        let kind = self.kind();
        vec![DeclaredKey {
            key: state_key(kind, tx_id),
            max_chunks: max_chunks(kind),
        }]
    }

    /// Wire form: `type_id || fact`.
    pub fn encode(&self) -> Vec<u8> {
        let mut w = Writer::with_capacity(1 + self.fact_size());
        w.put_u8(self.kind().type_id());
        match self {
            Action::Register(f) => f.encode_to(&mut w),
            Action::Attest(f) => f.encode_to(&mut w),
            Action::Notarize(f) => f.encode_to(&mut w),
        }
        w.into_vec()
    }

    /// Decode the wire form produced by [`Action::encode`].
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(bytes);
        let type_id = r.get_u8()?;
        let kind = FactKind::from_type_id(type_id).ok_or(DecodeError::UnknownAction(type_id))?;
        let action = match kind {
            FactKind::Register => Action::Register(RegisteredMachine::decode_from(&mut r)?),
            FactKind::Attest => Action::Attest(AttestedMachine::decode_from(&mut r)?),
            FactKind::Notarize => Action::Notarize(NotarizedData::decode_from(&mut r)?),
        };
        r.finish()?;
        Ok(action)
    }
}

impl From<RegisteredMachine> for Action {
    fn from(f: RegisteredMachine) -> Self {
        Action::Register(f)
    }
}

impl From<AttestedMachine> for Action {
    fn from(f: AttestedMachine) -> Self {
        Action::Attest(f)
    }
}

impl From<NotarizedData> for Action {
    fn from(f: NotarizedData) -> Self {
        Action::Notarize(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_wire_roundtrip() {
        let actions = vec![
            Action::from(RegisteredMachine::new(b"bafy001".to_vec())),
            Action::from(AttestedMachine::new(
                vec![b'A'; 44],
                b"sensor".to_vec(),
                b"Acme".to_vec(),
                vec![b'b'; 66],
            )),
            Action::from(NotarizedData::new(vec![1u8; 32], vec![b'A'; 44], b"bafydata".to_vec(), b"t".to_vec())),
        ];
        for action in actions {
            let bytes = action.encode();
            assert_eq!(bytes[0], action.kind().type_id());
            assert_eq!(bytes.len(), 1 + action.fact_size());
            assert_eq!(Action::decode(&bytes).unwrap(), action);
        }
    }

    #[test]
    fn test_unknown_type_id() {
        assert_eq!(Action::decode(&[9, 0, 0, 0, 0]), Err(DecodeError::UnknownAction(9)));
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(Action::decode(&[]), Err(DecodeError::Truncated { .. })));
    }

    #[test]
    fn test_declared_keys() {
        let tx = TxId::from_bytes([7; 32]);
        let action = Action::from(RegisteredMachine::new(b"x".to_vec()));
        let keys = action.state_keys(&tx);
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].key, state_key(FactKind::Register, &tx));
        assert_eq!(keys[0].max_chunks, max_chunks(FactKind::Register));
    }

    #[test]
    fn test_flat_compute_units() {
        let small = Action::from(RegisteredMachine::new(b"x".to_vec()));
        let large = Action::from(RegisteredMachine::new(vec![b'x'; 256]));
        assert_eq!(small.compute_units(), large.compute_units());
        assert_eq!(small.compute_units(), REGISTER_COMPUTE_UNITS);
    }
}
