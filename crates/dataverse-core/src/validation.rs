//! Fact validation: per-field shape checks.
//!
//! Fixed-width identifiers are checked for exact length, free-text fields
//! for an upper bound only. The first failing field decides the reason.

use crate::error::RejectReason;
use crate::fact::{
    AttestedMachine, NotarizedData, RegisteredMachine, MACHINE_ADDRESS_LEN,
    MACHINE_CONTENT_ID_LEN, MAX_ATTESTATION_REF_LEN, MAX_DATA_CONTENT_ID_LEN, MAX_DATA_TYPE_LEN,
    MAX_MACHINE_CATEGORY_LEN, MAX_MACHINE_MANUFACTURER_LEN, MAX_OWNER_ADDRESS_LEN,
    MAX_REGISTER_CONTENT_ID_LEN,
};

/// Validate a machine registration.
pub fn validate_registration(fact: &RegisteredMachine) -> Result<(), RejectReason> {
    if fact.machine_content_id.is_empty() {
        return Err(RejectReason::ContentIdMissing);
    }
    if fact.machine_content_id.len() > MAX_REGISTER_CONTENT_ID_LEN {
        return Err(RejectReason::ContentIdTooLarge);
    }
    Ok(())
}

/// Validate a machine attestation.
///
/// Category and manufacturer may be empty.
pub fn validate_attestation(fact: &AttestedMachine) -> Result<(), RejectReason> {
    if fact.machine_address.len() != MACHINE_ADDRESS_LEN {
        return Err(RejectReason::MachineAddressLengthInvalid);
    }
    if fact.category.len() > MAX_MACHINE_CATEGORY_LEN {
        return Err(RejectReason::MachineCategoryTooLarge);
    }
    if fact.manufacturer.len() > MAX_MACHINE_MANUFACTURER_LEN {
        return Err(RejectReason::MachineManufacturerTooLarge);
    }
    if fact.content_id.len() != MACHINE_CONTENT_ID_LEN {
        return Err(RejectReason::ContentIdLengthInvalid);
    }
    Ok(())
}

/// Validate a data notarization.
///
/// The attestation reference is only bounded; it may be empty and is never
/// resolved.
pub fn validate_notarization(fact: &NotarizedData) -> Result<(), RejectReason> {
    if fact.owner_address.is_empty() {
        return Err(RejectReason::OwnerAddressEmpty);
    }
    if fact.data_content_id.is_empty() {
        return Err(RejectReason::ContentIdMissing);
    }
    if fact.owner_address.len() > MAX_OWNER_ADDRESS_LEN {
        return Err(RejectReason::OwnerAddressTooLarge);
    }
    if fact.attestation_tx_ref.len() > MAX_ATTESTATION_REF_LEN {
        return Err(RejectReason::AttestationRefTooLarge);
    }
    if fact.data_content_id.len() > MAX_DATA_CONTENT_ID_LEN {
        return Err(RejectReason::ContentIdTooLarge);
    }
    if fact.data_type.len() > MAX_DATA_TYPE_LEN {
        return Err(RejectReason::DataTypeTooLarge);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attestation(addr: usize, cat: usize, mfr: usize, cid: usize) -> AttestedMachine {
        AttestedMachine::new(vec![b'A'; addr], vec![b'c'; cat], vec![b'm'; mfr], vec![b'b'; cid])
    }

    #[test]
    fn test_valid_attestation() {
        assert_eq!(validate_attestation(&attestation(44, 6, 4, 66)), Ok(()));
    }

    #[test]
    fn test_machine_address_length() {
        for len in [0, 43, 45, 88] {
            assert_eq!(
                validate_attestation(&attestation(len, 6, 4, 66)),
                Err(RejectReason::MachineAddressLengthInvalid),
                "address len {}",
                len
            );
        }
    }

    #[test]
    fn test_address_ok_reports_later_field() {
        // A 44-byte address passes; the bad content id is what gets reported.
        assert_eq!(
            validate_attestation(&attestation(44, 6, 4, 65)),
            Err(RejectReason::ContentIdLengthInvalid)
        );
    }

    #[test]
    fn test_content_id_length() {
        for len in [0, 65, 67] {
            assert_eq!(
                validate_attestation(&attestation(44, 6, 4, len)),
                Err(RejectReason::ContentIdLengthInvalid)
            );
        }
    }

    #[test]
    fn test_free_text_bounds() {
        assert_eq!(validate_attestation(&attestation(44, 100, 100, 66)), Ok(()));
        assert_eq!(validate_attestation(&attestation(44, 0, 0, 66)), Ok(()));
        assert_eq!(
            validate_attestation(&attestation(44, 101, 4, 66)),
            Err(RejectReason::MachineCategoryTooLarge)
        );
        assert_eq!(
            validate_attestation(&attestation(44, 4, 101, 66)),
            Err(RejectReason::MachineManufacturerTooLarge)
        );
    }

    #[test]
    fn test_check_order() {
        assert_eq!(
            validate_attestation(&attestation(1, 101, 101, 1)),
            Err(RejectReason::MachineAddressLengthInvalid)
        );
        assert_eq!(
            validate_attestation(&attestation(44, 101, 101, 1)),
            Err(RejectReason::MachineCategoryTooLarge)
        );
    }

    #[test]
    fn test_registration() {
        assert_eq!(
            validate_registration(&RegisteredMachine::new(Vec::<u8>::new())),
            Err(RejectReason::ContentIdMissing)
        );
        assert_eq!(validate_registration(&RegisteredMachine::new(vec![1u8; 256])), Ok(()));
        assert_eq!(
            validate_registration(&RegisteredMachine::new(vec![1u8; 257])),
            Err(RejectReason::ContentIdTooLarge)
        );
    }

    #[test]
    fn test_notarization_owner_required() {
        let fact = NotarizedData::new(vec![0u8; 32], Vec::<u8>::new(), b"bafydata".to_vec(), Vec::<u8>::new());
        assert_eq!(validate_notarization(&fact), Err(RejectReason::OwnerAddressEmpty));
    }

    #[test]
    fn test_notarization_content_id_required() {
        let fact = NotarizedData::new(vec![0u8; 32], vec![b'A'; 44], Vec::<u8>::new(), Vec::<u8>::new());
        assert_eq!(validate_notarization(&fact), Err(RejectReason::ContentIdMissing));
    }

    #[test]
    fn test_notarization_empty_ref_accepted() {
        let fact = NotarizedData::new(Vec::<u8>::new(), vec![b'A'; 44], b"bafydata".to_vec(), Vec::<u8>::new());
        assert_eq!(validate_notarization(&fact), Ok(()));
    }

    #[test]
    fn test_notarization_bounds() {
        let base = NotarizedData::new(vec![0u8; 32], vec![b'A'; 44], b"bafydata".to_vec(), b"t".to_vec());

        let mut f = base.clone();
        f.owner_address = vec![b'A'; 65].into();
        assert_eq!(validate_notarization(&f), Err(RejectReason::OwnerAddressTooLarge));

        let mut f = base.clone();
        f.attestation_tx_ref = vec![0u8; 65].into();
        assert_eq!(validate_notarization(&f), Err(RejectReason::AttestationRefTooLarge));

        let mut f = base.clone();
        f.data_content_id = vec![b'b'; 129].into();
        assert_eq!(validate_notarization(&f), Err(RejectReason::ContentIdTooLarge));

        let mut f = base;
        f.data_type = vec![b't'; 129].into();
        assert_eq!(validate_notarization(&f), Err(RejectReason::DataTypeTooLarge));
    }
}
