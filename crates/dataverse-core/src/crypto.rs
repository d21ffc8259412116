//! Content-id derivation: SHA-256 hashing and CIDv1 rendering.
//!
//! Content ids are opaque to the ledger. This module only exists so that
//! off-ledger callers can derive the id of a piece of data the same way the
//! IPFS ecosystem does (CIDv1, raw codec, sha2-256, base32-lower multibase).

use sha2::{Digest, Sha256};
use std::fmt;

/// CID version byte.
const CID_V1: u8 = 0x01;
/// Multicodec for raw binary.
const CODEC_RAW: u8 = 0x55;
/// Multihash code for sha2-256.
const MULTIHASH_SHA2_256: u8 = 0x12;
/// Multibase prefix for base32-lower.
const MULTIBASE_BASE32: char = 'b';

/// A 32-byte SHA-256 hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sha256Hash(pub [u8; 32]);

impl Sha256Hash {
    /// Compute the SHA-256 hash of data.
    pub fn hash(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self(hasher.finalize().into())
    }

    /// Get raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Render as a CIDv1 over raw bytes.
    ///
    /// Format: `b` + base32lower(0x01 || 0x55 || 0x12 || 0x20 || hash)
    pub fn to_raw_cid(&self) -> String {
        let mut cid_bytes = Vec::with_capacity(36);
        cid_bytes.push(CID_V1);
        cid_bytes.push(CODEC_RAW);
        cid_bytes.push(MULTIHASH_SHA2_256);
        cid_bytes.push(32);
        cid_bytes.extend_from_slice(&self.0);

        let mut out = String::with_capacity(59);
        out.push(MULTIBASE_BASE32);
        out.push_str(&base32_encode(&cid_bytes));
        out
    }
}

impl fmt::Debug for Sha256Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SHA256({}...)", &self.to_hex()[..8])
    }
}

impl AsRef<[u8]> for Sha256Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Derive the content id of a piece of data.
pub fn data_content_id(data: &[u8]) -> String {
    Sha256Hash::hash(data).to_raw_cid()
}

// RFC 4648 Base32 encoding (lowercase, no padding)
fn base32_encode(data: &[u8]) -> String {
    const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz234567";
    let mut result = String::with_capacity((data.len() * 8).div_ceil(5));
    let mut buffer: u64 = 0;
    let mut bits_in_buffer = 0;

    for &byte in data {
        buffer = (buffer << 8) | (byte as u64);
        bits_in_buffer += 8;

        while bits_in_buffer >= 5 {
            bits_in_buffer -= 5;
            let index = ((buffer >> bits_in_buffer) & 0x1f) as usize;
            result.push(ALPHABET[index] as char);
        }
    }

    if bits_in_buffer > 0 {
        let index = ((buffer << (5 - bits_in_buffer)) & 0x1f) as usize;
        result.push(ALPHABET[index] as char);
    }

    result
}
