//! Facts: the three immutable record kinds written to the ledger.
//!
//! Every fact is a flat record of byte fields. Field declaration order is the
//! canonical encoding order; see [`crate::canonical`].

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::canonical::{Reader, Writer};
use crate::error::{DecodeError, RejectReason};

/// Exact length of a machine address.
pub const MACHINE_ADDRESS_LEN: usize = 44;

/// Upper bound on a machine category.
pub const MAX_MACHINE_CATEGORY_LEN: usize = 100;

/// Upper bound on a machine manufacturer.
pub const MAX_MACHINE_MANUFACTURER_LEN: usize = 100;

/// Exact length of the content id carried by an attestation.
pub const MACHINE_CONTENT_ID_LEN: usize = 66;

/// Upper bound on a registered machine content id.
pub const MAX_REGISTER_CONTENT_ID_LEN: usize = 256;

/// Upper bound on a notarization's attestation transaction reference.
pub const MAX_ATTESTATION_REF_LEN: usize = 64;

/// Upper bound on a notarization owner address.
pub const MAX_OWNER_ADDRESS_LEN: usize = 64;

/// Upper bound on a notarized data content id.
pub const MAX_DATA_CONTENT_ID_LEN: usize = 128;

/// Upper bound on a notarized data type tag.
pub const MAX_DATA_TYPE_LEN: usize = 128;

/// Discriminator for the three fact kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum FactKind {
    /// Machine firmware/image registration.
    Register = 0,
    /// Machine address attestation.
    Attest = 1,
    /// Data notarization.
    Notarize = 2,
}

impl FactKind {
    /// All kinds, in type-id order.
    pub const ALL: [FactKind; 3] = [FactKind::Register, FactKind::Attest, FactKind::Notarize];

    /// Convert to the action type id.
    pub fn type_id(self) -> u8 {
        self as u8
    }

    /// Try to parse from an action type id.
    pub fn from_type_id(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Register),
            1 => Some(Self::Attest),
            2 => Some(Self::Notarize),
            _ => None,
        }
    }

    /// Short lowercase name, also used as the storage namespace.
    pub fn name(self) -> &'static str {
        match self {
            FactKind::Register => "register",
            FactKind::Attest => "attest",
            FactKind::Notarize => "notarize",
        }
    }
}

impl fmt::Display for FactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Behaviour shared by all fact kinds.
///
/// `size` must equal the length of the bytes written by `encode_to`; the
/// host ledger bills on the reported size.
pub trait Fact: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// The kind this record belongs to.
    const KIND: FactKind;

    /// Check field shapes. Pure, no allocation.
    fn validate(&self) -> Result<(), RejectReason>;

    /// Exact encoded length in bytes.
    fn size(&self) -> usize;

    /// Append the canonical encoding.
    fn encode_to(&self, w: &mut Writer);

    /// Read one record from the front of `r`.
    fn decode_from(r: &mut Reader<'_>) -> Result<Self, DecodeError>;
}

/// A registered machine content id (firmware/image hash reference).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredMachine {
    pub machine_content_id: Bytes,
}

impl RegisteredMachine {
    pub fn new(machine_content_id: impl Into<Bytes>) -> Self {
        Self {
            machine_content_id: machine_content_id.into(),
        }
    }
}

/// A physical machine address bound to manufacturer, category and content id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestedMachine {
    pub machine_address: Bytes,
    pub category: Bytes,
    pub manufacturer: Bytes,
    pub content_id: Bytes,
}

impl AttestedMachine {
    pub fn new(
        machine_address: impl Into<Bytes>,
        category: impl Into<Bytes>,
        manufacturer: impl Into<Bytes>,
        content_id: impl Into<Bytes>,
    ) -> Self {
        Self {
            machine_address: machine_address.into(),
            category: category.into(),
            manufacturer: manufacturer.into(),
            content_id: content_id.into(),
        }
    }
}

/// A data content id bound to an owner and a prior attestation transaction.
///
/// `attestation_tx_ref` is an opaque reference. It is never dereferenced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotarizedData {
    pub attestation_tx_ref: Bytes,
    pub owner_address: Bytes,
    pub data_content_id: Bytes,
    pub data_type: Bytes,
}

impl NotarizedData {
    pub fn new(
        attestation_tx_ref: impl Into<Bytes>,
        owner_address: impl Into<Bytes>,
        data_content_id: impl Into<Bytes>,
        data_type: impl Into<Bytes>,
    ) -> Self {
        Self {
            attestation_tx_ref: attestation_tx_ref.into(),
            owner_address: owner_address.into(),
            data_content_id: data_content_id.into(),
            data_type: data_type.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_type_id_roundtrip() {
        for kind in FactKind::ALL {
            assert_eq!(FactKind::from_type_id(kind.type_id()), Some(kind));
        }
        assert_eq!(FactKind::from_type_id(3), None);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(FactKind::Register.to_string(), "register");
        assert_eq!(FactKind::Attest.to_string(), "attest");
        assert_eq!(FactKind::Notarize.to_string(), "notarize");
    }

    #[test]
    fn test_fact_json_shape() {
        let fact = RegisteredMachine::new(b"bafy".to_vec());
        let json = serde_json::to_value(&fact).unwrap();
        assert!(json.get("machine_content_id").is_some());
    }
}
