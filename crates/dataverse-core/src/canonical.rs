//! Canonical byte encoding for facts.
//!
//! Each fact is a fixed sequence of length-prefixed byte fields:
//!
//! ```text
//! field := len:u32be || bytes[len]
//! fact  := field*      (declaration order, no header, no padding)
//! ```
//!
//! The encoding is deterministic and has exactly one valid form per fact, so
//! `decode(encode(f)) == f` and `size(f) == encode(f).len()` hold for every
//! fact. The decoder rejects truncated input, over-long fields and trailing
//! bytes instead of returning partial records.
//!
//! **CRITICAL**: This encoding is FROZEN. Stored state depends on it.

use bytes::Bytes;

use crate::error::{DecodeError, RejectReason};
use crate::fact::{
    AttestedMachine, Fact, FactKind, NotarizedData, RegisteredMachine, MACHINE_ADDRESS_LEN,
    MACHINE_CONTENT_ID_LEN, MAX_ATTESTATION_REF_LEN, MAX_DATA_CONTENT_ID_LEN, MAX_DATA_TYPE_LEN,
    MAX_MACHINE_CATEGORY_LEN, MAX_MACHINE_MANUFACTURER_LEN, MAX_OWNER_ADDRESS_LEN,
    MAX_REGISTER_CONTENT_ID_LEN,
};
use crate::validation::{validate_attestation, validate_notarization, validate_registration};

/// Width of the length prefix in front of every field.
pub const LEN_PREFIX: usize = 4;

/// Encoded length of one byte field.
pub const fn bytes_len(field: &[u8]) -> usize {
    LEN_PREFIX + field.len()
}

/// Encode a fact to its canonical bytes.
pub fn encode<F: Fact>(fact: &F) -> Vec<u8> {
    let mut w = Writer::with_capacity(fact.size());
    fact.encode_to(&mut w);
    w.into_vec()
}

/// Decode a fact from exactly `bytes`.
pub fn decode<F: Fact>(bytes: &[u8]) -> Result<F, DecodeError> {
    let mut r = Reader::new(bytes);
    let fact = F::decode_from(&mut r)?;
    r.finish()?;
    Ok(fact)
}

/// Append-only buffer for canonical encoding.
#[derive(Debug, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Write a single raw byte (used for the action type id).
    pub fn put_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    /// Write a length-prefixed byte field.
    ///
    /// Field lengths are bounded well below `u32::MAX` by validation.
    pub fn put_bytes(&mut self, field: &[u8]) {
        self.buf.extend_from_slice(&(field.len() as u32).to_be_bytes());
        self.buf.extend_from_slice(field);
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }
}

/// Cursor over canonical bytes.
#[derive(Debug)]
pub struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        let available = self.remaining();
        if available < n {
            return Err(DecodeError::Truncated {
                needed: n,
                available,
            });
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Read a single raw byte.
    pub fn get_u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take(1)?[0])
    }

    /// Read a length-prefixed byte field of at most `max` bytes.
    ///
    /// The bound is checked before the body is copied.
    pub fn get_bytes(&mut self, field: &'static str, max: usize) -> Result<Bytes, DecodeError> {
        let prefix = self.take(LEN_PREFIX)?;
        let len = u32::from_be_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]) as usize;
        if len > max {
            return Err(DecodeError::FieldTooLong { field, len, max });
        }
        Ok(Bytes::copy_from_slice(self.take(len)?))
    }

    /// Require that every byte was consumed.
    pub fn finish(&self) -> Result<(), DecodeError> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(DecodeError::TrailingBytes(n)),
        }
    }
}

impl Fact for RegisteredMachine {
    const KIND: FactKind = FactKind::Register;

    fn validate(&self) -> Result<(), RejectReason> {
        validate_registration(self)
    }

    fn size(&self) -> usize {
        bytes_len(&self.machine_content_id)
    }

    fn encode_to(&self, w: &mut Writer) {
        w.put_bytes(&self.machine_content_id);
    }

    fn decode_from(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            machine_content_id: r.get_bytes("machine_content_id", MAX_REGISTER_CONTENT_ID_LEN)?,
        })
    }
}

impl Fact for AttestedMachine {
    const KIND: FactKind = FactKind::Attest;

    fn validate(&self) -> Result<(), RejectReason> {
        validate_attestation(self)
    }

    fn size(&self) -> usize {
        bytes_len(&self.machine_address)
            + bytes_len(&self.category)
            + bytes_len(&self.manufacturer)
            + bytes_len(&self.content_id)
    }

    fn encode_to(&self, w: &mut Writer) {
        w.put_bytes(&self.machine_address);
        w.put_bytes(&self.category);
        w.put_bytes(&self.manufacturer);
        w.put_bytes(&self.content_id);
    }

    fn decode_from(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            machine_address: r.get_bytes("machine_address", MACHINE_ADDRESS_LEN)?,
            category: r.get_bytes("category", MAX_MACHINE_CATEGORY_LEN)?,
            manufacturer: r.get_bytes("manufacturer", MAX_MACHINE_MANUFACTURER_LEN)?,
            content_id: r.get_bytes("content_id", MACHINE_CONTENT_ID_LEN)?,
        })
    }
}

impl Fact for NotarizedData {
    const KIND: FactKind = FactKind::Notarize;

    fn validate(&self) -> Result<(), RejectReason> {
        validate_notarization(self)
    }

    fn size(&self) -> usize {
        bytes_len(&self.attestation_tx_ref)
            + bytes_len(&self.owner_address)
            + bytes_len(&self.data_content_id)
            + bytes_len(&self.data_type)
    }

    fn encode_to(&self, w: &mut Writer) {
        w.put_bytes(&self.attestation_tx_ref);
        w.put_bytes(&self.owner_address);
        w.put_bytes(&self.data_content_id);
        w.put_bytes(&self.data_type);
    }

    fn decode_from(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            attestation_tx_ref: r.get_bytes("attestation_tx_ref", MAX_ATTESTATION_REF_LEN)?,
            owner_address: r.get_bytes("owner_address", MAX_OWNER_ADDRESS_LEN)?,
            data_content_id: r.get_bytes("data_content_id", MAX_DATA_CONTENT_ID_LEN)?,
            data_type: r.get_bytes("data_type", MAX_DATA_TYPE_LEN)?,
        })
    }
}

/// Worst-case encoded size of a valid fact of `kind`.
pub const fn max_size(kind: FactKind) -> usize {
    match kind {
        FactKind::Register => LEN_PREFIX + MAX_REGISTER_CONTENT_ID_LEN,
        FactKind::Attest => {
            4 * LEN_PREFIX
                + MACHINE_ADDRESS_LEN
                + MAX_MACHINE_CATEGORY_LEN
                + MAX_MACHINE_MANUFACTURER_LEN
                + MACHINE_CONTENT_ID_LEN
        }
        FactKind::Notarize => {
            4 * LEN_PREFIX
                + MAX_ATTESTATION_REF_LEN
                + MAX_OWNER_ADDRESS_LEN
                + MAX_DATA_CONTENT_ID_LEN
                + MAX_DATA_TYPE_LEN
        }
    }
}
