//! Proptest generators for property-based testing.

use proptest::prelude::*;

use dataverse_core::fact::{
    MACHINE_ADDRESS_LEN, MACHINE_CONTENT_ID_LEN, MAX_ATTESTATION_REF_LEN, MAX_DATA_CONTENT_ID_LEN,
    MAX_DATA_TYPE_LEN, MAX_MACHINE_CATEGORY_LEN, MAX_MACHINE_MANUFACTURER_LEN,
    MAX_OWNER_ADDRESS_LEN, MAX_REGISTER_CONTENT_ID_LEN,
};
use dataverse_core::{Action, AttestedMachine, FactKind, NotarizedData, RegisteredMachine, TxId};

/// Generate a random TxId.
pub fn tx_id() -> impl Strategy<Value = TxId> {
    any::<[u8; 32]>().prop_map(TxId::from_bytes)
}

/// Generate a FactKind.
pub fn fact_kind() -> impl Strategy<Value = FactKind> {
    prop_oneof![
        Just(FactKind::Register),
        Just(FactKind::Attest),
        Just(FactKind::Notarize),
    ]
}

/// Generate bytes with length in `range`.
pub fn bytes_in(range: std::ops::RangeInclusive<usize>) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), range)
}

/// Generate a registration that passes validation.
pub fn valid_registration() -> impl Strategy<Value = RegisteredMachine> {
    bytes_in(1..=MAX_REGISTER_CONTENT_ID_LEN).prop_map(RegisteredMachine::new)
}

/// Generate an attestation that passes validation.
pub fn valid_attestation() -> impl Strategy<Value = AttestedMachine> {
    (
        bytes_in(MACHINE_ADDRESS_LEN..=MACHINE_ADDRESS_LEN),
        bytes_in(0..=MAX_MACHINE_CATEGORY_LEN),
        bytes_in(0..=MAX_MACHINE_MANUFACTURER_LEN),
        bytes_in(MACHINE_CONTENT_ID_LEN..=MACHINE_CONTENT_ID_LEN),
    )
        .prop_map(|(address, category, manufacturer, cid)| {
            AttestedMachine::new(address, category, manufacturer, cid)
        })
}

/// Generate a notarization that passes validation.
pub fn valid_notarization() -> impl Strategy<Value = NotarizedData> {
    (
        bytes_in(0..=MAX_ATTESTATION_REF_LEN),
        bytes_in(1..=MAX_OWNER_ADDRESS_LEN),
        bytes_in(1..=MAX_DATA_CONTENT_ID_LEN),
        bytes_in(0..=MAX_DATA_TYPE_LEN),
    )
        .prop_map(|(reference, owner, cid, data_type)| {
            NotarizedData::new(reference, owner, cid, data_type)
        })
}

/// Generate an action carrying a valid fact of any kind.
pub fn valid_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        valid_registration().prop_map(Action::from),
        valid_attestation().prop_map(Action::from),
        valid_notarization().prop_map(Action::from),
    ]
}

/// Generate an attestation with field lengths on both sides of every bound.
pub fn any_attestation() -> impl Strategy<Value = AttestedMachine> {
    (
        bytes_in(MACHINE_ADDRESS_LEN - 2..=MACHINE_ADDRESS_LEN + 2),
        bytes_in(0..=MAX_MACHINE_CATEGORY_LEN + 2),
        bytes_in(0..=MAX_MACHINE_MANUFACTURER_LEN + 2),
        bytes_in(MACHINE_CONTENT_ID_LEN - 2..=MACHINE_CONTENT_ID_LEN + 2),
    )
        .prop_map(|(address, category, manufacturer, cid)| {
            AttestedMachine::new(address, category, manufacturer, cid)
        })
}

/// A valid fact paired with a transaction id.
#[derive(Debug, Clone)]
pub struct ValidFact {
    pub tx_id: TxId,
    pub action: Action,
}

impl Arbitrary for ValidFact {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (tx_id(), valid_action())
            .prop_map(|(tx_id, action)| ValidFact { tx_id, action })
            .boxed()
    }
}
