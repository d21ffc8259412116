//! Error types for Dataverse Core.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a fact failed validation.
///
/// A rejection is a transaction outcome, not an execution fault: it is
/// recorded with its fixed [`output`](RejectReason::output) payload and the
/// transaction is still charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum RejectReason {
    #[error("machine address length invalid")]
    MachineAddressLengthInvalid,

    #[error("machine category too large")]
    MachineCategoryTooLarge,

    #[error("machine manufacturer too large")]
    MachineManufacturerTooLarge,

    #[error("content id length invalid")]
    ContentIdLengthInvalid,

    #[error("content id missing")]
    ContentIdMissing,

    #[error("content id too large")]
    ContentIdTooLarge,

    #[error("owner address empty")]
    OwnerAddressEmpty,

    #[error("owner address too large")]
    OwnerAddressTooLarge,

    #[error("attestation reference too large")]
    AttestationRefTooLarge,

    #[error("data type too large")]
    DataTypeTooLarge,
}

impl RejectReason {
    /// All reasons, in declaration order.
    pub const ALL: [RejectReason; 10] = [
        RejectReason::MachineAddressLengthInvalid,
        RejectReason::MachineCategoryTooLarge,
        RejectReason::MachineManufacturerTooLarge,
        RejectReason::ContentIdLengthInvalid,
        RejectReason::ContentIdMissing,
        RejectReason::ContentIdTooLarge,
        RejectReason::OwnerAddressEmpty,
        RejectReason::OwnerAddressTooLarge,
        RejectReason::AttestationRefTooLarge,
        RejectReason::DataTypeTooLarge,
    ];

    /// The fixed failure payload recorded as the transaction output.
    pub const fn output(self) -> &'static [u8] {
        match self {
            RejectReason::MachineAddressLengthInvalid => b"machine address length invalid",
            RejectReason::MachineCategoryTooLarge => b"machine category is too large",
            RejectReason::MachineManufacturerTooLarge => b"machine manufacturer is too large",
            RejectReason::ContentIdLengthInvalid => b"machine CID length invalid",
            RejectReason::ContentIdMissing => b"Machine CID Not Provided",
            RejectReason::ContentIdTooLarge => b"content id is too large",
            RejectReason::OwnerAddressEmpty => b"data owner address not provided",
            RejectReason::OwnerAddressTooLarge => b"data owner address is too large",
            RejectReason::AttestationRefTooLarge => b"attestation tx reference is too large",
            RejectReason::DataTypeTooLarge => b"data type is too large",
        }
    }

    /// Recover a reason from its failure payload.
    pub fn from_output(output: &[u8]) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.output() == output)
    }
}

/// Errors raised while decoding stored fact bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The input ended before a length prefix or field body was complete.
    #[error("truncated input: needed {needed} bytes, {available} available")]
    Truncated { needed: usize, available: usize },

    /// Bytes remained after the last field was decoded.
    #[error("{0} trailing bytes after last field")]
    TrailingBytes(usize),

    /// A length prefix exceeded the field's static upper bound.
    #[error("field {field} length {len} exceeds maximum {max}")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    /// The action type id is not one of the known fact kinds.
    #[error("unknown action type id: {0}")]
    UnknownAction(u8),
}
