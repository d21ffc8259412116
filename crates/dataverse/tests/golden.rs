//! Golden test vectors for cross-implementation verification.
//!
//! Every implementation must produce identical:
//! - fact bytes (length-prefixed fields, declaration order)
//! - action bytes (type id followed by the fact)
//! - storage keys (namespace followed by the raw transaction id)
//! - data content ids

use dataverse::core::{max_chunks, max_size, state_key, CHUNK_SIZE};
use dataverse::store::{MemoryState, StateRead};
use dataverse::{data_content_id, execute, Action, FactKind, RejectReason, TxId};
use dataverse_testkit::vectors::{all_vectors, attest_key_hex, ATTEST_KEY_HEX};

#[test]
fn stored_bytes_match_vectors() {
    for (i, vector) in all_vectors().into_iter().enumerate() {
        let mut state = MemoryState::new();
        let tx = TxId::from_bytes([i as u8; 32]);

        let outcome = execute(&vector.action, &tx, &mut state).unwrap();
        assert!(outcome.is_accepted(), "{}", vector.name);

        let stored = state
            .get(&state_key(vector.action.kind(), &tx))
            .unwrap()
            .unwrap();
        assert_eq!(hex::encode(stored), vector.expected_fact_hex, "{}", vector.name);
        assert_eq!(hex::encode(vector.action.encode()), vector.action_hex());
    }
}

#[test]
fn storage_key_layout() {
    assert_eq!(attest_key_hex(), ATTEST_KEY_HEX);

    let tx = TxId::from_bytes([0xAB; 32]);
    for kind in FactKind::ALL {
        let key = state_key(kind, &tx);
        let mut expected = format!("{}:", kind.name()).into_bytes();
        expected.extend_from_slice(tx.as_bytes());
        assert_eq!(key.as_bytes(), expected.as_slice());
    }
}

#[test]
fn chunk_declarations() {
    assert_eq!(CHUNK_SIZE, 64);
    assert_eq!(max_size(FactKind::Register), 260);
    assert_eq!(max_size(FactKind::Attest), 326);
    assert_eq!(max_size(FactKind::Notarize), 400);
    assert_eq!(max_chunks(FactKind::Register), 5);
    assert_eq!(max_chunks(FactKind::Attest), 6);
    assert_eq!(max_chunks(FactKind::Notarize), 7);
}

#[test]
fn action_type_ids() {
    let ids: Vec<u8> = all_vectors()
        .iter()
        .map(|v| v.action.encode()[0])
        .collect();
    assert_eq!(ids, vec![0, 1, 2, 2]);
}

#[test]
fn data_content_id_vectors() {
    assert_eq!(
        data_content_id(b"hello"),
        "bafkreibm6jg3ux5qumhcn2b3flc3tyu6dmlb4xa7u5bf44yegnrjhc4yeq"
    );
    assert_eq!(data_content_id(b"").len(), 59);
}

#[test]
fn failure_payloads() {
    let expected: [(RejectReason, &[u8]); 4] = [
        (RejectReason::MachineAddressLengthInvalid, b"machine address length invalid"),
        (RejectReason::ContentIdMissing, b"Machine CID Not Provided"),
        (RejectReason::ContentIdLengthInvalid, b"machine CID length invalid"),
        (RejectReason::OwnerAddressEmpty, b"data owner address not provided"),
    ];
    for (reason, payload) in expected {
        assert_eq!(reason.output(), payload);
        assert_eq!(RejectReason::from_output(payload), Some(reason));
    }
}

#[test]
fn decode_rejects_unknown_type() {
    let mut bytes = all_vectors()[0].action.encode();
    bytes[0] = 7;
    assert!(Action::decode(&bytes).is_err());
}
