//! Golden test vectors for deterministic verification.
//!
//! Each vector pins the exact encoded bytes of a reference fact. Any change
//! to field order, length prefixes, or type ids breaks them.

use serde::Serialize;

use dataverse::DEFAULT_NOTARIZE_DATA_TYPE;
use dataverse_core::{state_key, Action, AttestedMachine, NotarizedData, RegisteredMachine, TxId};

/// A golden test vector.
#[derive(Debug, Clone, Serialize)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// The reference action.
    pub action: Action,
    /// Expected fact encoding (hex), without the action type id.
    pub expected_fact_hex: &'static str,
}

impl GoldenVector {
    /// Expected action wire form (hex): type id followed by the fact.
    pub fn action_hex(&self) -> String {
        format!("{:02x}{}", self.action.kind().type_id(), self.expected_fact_hex)
    }
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "registration of bafy001",
            action: RegisteredMachine::new("bafy001").into(),
            expected_fact_hex: "0000000762616679303031",
        },
        GoldenVector {
            name: "attestation of sensor by Acme",
            action: AttestedMachine::new(vec![b'A'; 44], "sensor", "Acme", vec![b'b'; 66]).into(),
            expected_fact_hex: concat!(
                "0000002c",
                "41414141414141414141414141414141414141414141",
                "41414141414141414141414141414141414141414141",
                "00000006",
                "73656e736f72",
                "00000004",
                "41636d65",
                "00000042",
                "62626262626262626262626262626262626262626262",
                "62626262626262626262626262626262626262626262",
                "62626262626262626262626262626262626262626262",
            ),
        },
        GoldenVector {
            name: "notarization with default data type",
            action: NotarizedData::new(
                vec![0x11u8; 32],
                vec![b'A'; 44],
                "bafydata",
                DEFAULT_NOTARIZE_DATA_TYPE,
            )
            .into(),
            expected_fact_hex: concat!(
                "00000020",
                "1111111111111111111111111111111111111111111111111111111111111111",
                "0000002c",
                "41414141414141414141414141414141414141414141",
                "41414141414141414141414141414141414141414141",
                "00000008",
                "6261667964617461",
                "00000022",
                "2f6461746176657273652e61737365742e4d73674e6f746172697a65644173736574",
            ),
        },
        GoldenVector {
            name: "notarization with empty optional fields",
            action: NotarizedData::new(Vec::<u8>::new(), "o", "c", Vec::<u8>::new()).into(),
            expected_fact_hex: "00000000000000016f000000016300000000",
        },
    ]
}

/// The key an attestation by transaction `[0x11; 32]` is stored under (hex).
pub const ATTEST_KEY_HEX: &str =
    "6174746573743a1111111111111111111111111111111111111111111111111111111111111111";

/// Verify all golden vectors against the encoder.
///
/// Returns `(name, matches, actual_hex)` per vector.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let actual = hex::encode(v.action.encode());
            let matches = actual == v.action_hex();
            (v.name.to_string(), matches, actual)
        })
        .collect()
}

/// The attestation key vector, recomputed.
pub fn attest_key_hex() -> String {
    hex::encode(
        state_key(dataverse_core::FactKind::Attest, &TxId::from_bytes([0x11; 32])).as_bytes(),
    )
}

/// Serialize all vectors as JSON for other implementations.
pub fn vectors_json() -> serde_json::Result<String> {
    #[derive(Serialize)]
    struct Exported {
        name: &'static str,
        kind: &'static str,
        action_hex: String,
    }

    let exported: Vec<Exported> = all_vectors()
        .iter()
        .map(|v| Exported {
            name: v.name,
            kind: v.action.kind().name(),
            action_hex: v.action_hex(),
        })
        .collect();
    serde_json::to_string_pretty(&exported)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_vectors_match() {
        for (name, matches, actual) in verify_all_vectors() {
            assert!(matches, "vector '{}' encoded as {}", name, actual);
        }
    }

    #[test]
    fn test_vectors_decode_to_their_action() {
        for vector in all_vectors() {
            let bytes = hex::decode(vector.action_hex()).unwrap();
            assert_eq!(Action::decode(&bytes).unwrap(), vector.action, "{}", vector.name);
        }
    }

    #[test]
    fn test_vectors_are_valid() {
        for vector in all_vectors() {
            assert!(vector.action.validate().is_ok(), "{}", vector.name);
        }
    }

    #[test]
    fn test_attest_key() {
        assert_eq!(attest_key_hex(), ATTEST_KEY_HEX);
    }

    #[test]
    fn test_json_export() {
        let json = vectors_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), all_vectors().len());
        assert_eq!(parsed[0]["action_hex"], "000000000762616679303031");
    }
}
