//! State key derivation.
//!
//! A fact lives under `<namespace>:<txid>` where the namespace is the fact
//! kind. The namespaces are distinct and none is a prefix of another, and
//! the txid is fixed-width, so keys never collide across kinds and are
//! injective in the txid within a kind.

use crate::canonical::max_size;
use crate::fact::FactKind;
use crate::types::{StorageKey, TxId};

/// The host ledger's unit of stored-value accounting, in bytes.
pub const CHUNK_SIZE: usize = 64;

/// Namespace prefix for a fact kind.
pub const fn namespace(kind: FactKind) -> &'static [u8] {
    match kind {
        FactKind::Register => b"register:",
        FactKind::Attest => b"attest:",
        FactKind::Notarize => b"notarize:",
    }
}

/// Derive the storage key of the fact of `kind` created by `tx_id`.
pub fn state_key(kind: FactKind, tx_id: &TxId) -> StorageKey {
    let ns = namespace(kind);
    let mut key = Vec::with_capacity(ns.len() + TxId::LEN);
    key.extend_from_slice(ns);
    key.extend_from_slice(tx_id.as_bytes());
    StorageKey::from_vec(key)
}

/// Declared upper bound, in chunks, on the value stored for `kind`.
///
/// Always covers the worst-case encoded size of a valid fact.
pub const fn max_chunks(kind: FactKind) -> u16 {
    max_size(kind).div_ceil(CHUNK_SIZE) as u16
}

/// Number of chunks a value of `len` bytes occupies.
pub const fn chunks_for(len: usize) -> usize {
    len.div_ceil(CHUNK_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_layout() {
        let tx = TxId::from_bytes([0x11; 32]);
        let key = state_key(FactKind::Attest, &tx);
        assert_eq!(&key.as_bytes()[..7], b"attest:");
        assert_eq!(&key.as_bytes()[7..], &[0x11u8; 32]);
        assert_eq!(key.to_string(), format!("attest:{}", tx.to_hex()));
    }

    #[test]
    fn test_kinds_never_share_a_key() {
        let tx = TxId::from_bytes([0x22; 32]);
        let keys: Vec<_> = FactKind::ALL.iter().map(|k| state_key(*k, &tx)).collect();
        assert_ne!(keys[0], keys[1]);
        assert_ne!(keys[1], keys[2]);
        assert_ne!(keys[0], keys[2]);
    }

    #[test]
    fn test_namespaces_are_prefix_free() {
        for a in FactKind::ALL {
            for b in FactKind::ALL {
                if a != b {
                    assert!(!namespace(a).starts_with(namespace(b)));
                }
            }
        }
    }

    #[test]
    fn test_max_chunks_cover_worst_case() {
        assert_eq!(max_chunks(FactKind::Register), 5);
        assert_eq!(max_chunks(FactKind::Attest), 6);
        assert_eq!(max_chunks(FactKind::Notarize), 7);
        for kind in FactKind::ALL {
            assert!(max_chunks(kind) as usize * CHUNK_SIZE >= max_size(kind));
        }
    }

    #[test]
    fn test_chunks_for() {
        assert_eq!(chunks_for(0), 0);
        assert_eq!(chunks_for(1), 1);
        assert_eq!(chunks_for(64), 1);
        assert_eq!(chunks_for(65), 2);
    }
}
