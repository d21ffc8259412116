//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use bytes::Bytes;
use rand::distributions::Alphanumeric;
use rand::Rng;

use dataverse::{LocalLedger, Synchronizer, TxId};
use dataverse_core::fact::{MACHINE_ADDRESS_LEN, MACHINE_CONTENT_ID_LEN};
use dataverse_store::MemoryIndex;

/// An in-memory ledger and index behind a synchronizer.
pub struct TestFixture {
    pub sync: Synchronizer<MemoryIndex, LocalLedger>,
}

impl TestFixture {
    /// Create a new fixture with a random ledger salt.
    pub fn new() -> Self {
        Self {
            sync: Synchronizer::new(MemoryIndex::new(), LocalLedger::new()),
        }
    }

    /// Create with deterministic transaction ids.
    pub fn with_salt(salt: [u8; 32]) -> Self {
        Self {
            sync: Synchronizer::new(MemoryIndex::new(), LocalLedger::with_salt(salt)),
        }
    }

    /// Get the ledger.
    pub fn ledger(&self) -> &LocalLedger {
        self.sync.ledger()
    }

    /// Register and attest machine `n`. Returns its address and the
    /// attesting transaction id.
    ///
    /// Panics if either step fails.
    pub async fn attested_machine(&self, n: u8) -> (Bytes, TxId) {
        let address = machine_address(n);
        let content_id = machine_content_id(&format!("bafy{:03}", n));

        self.sync
            .register(content_id.clone())
            .await
            .expect("register fixture machine");
        let tx_id = self
            .sync
            .attest(address.clone(), "sensor", "Acme", content_id)
            .await
            .expect("attest fixture machine");

        (address, tx_id)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A 44-byte machine address, distinct per `n` modulo 26.
pub fn machine_address(n: u8) -> Bytes {
    Bytes::from(vec![b'A' + n % 26; MACHINE_ADDRESS_LEN])
}

/// A random 44-byte alphanumeric machine address.
pub fn random_machine_address() -> Bytes {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(MACHINE_ADDRESS_LEN)
        .collect::<Vec<u8>>()
        .into()
}

/// `label` right-padded with `'0'` to a 66-byte machine content id.
///
/// Panics if `label` is longer than 66 bytes.
pub fn machine_content_id(label: &str) -> Bytes {
    assert!(label.len() <= MACHINE_CONTENT_ID_LEN, "label too long");
    let mut cid = label.as_bytes().to_vec();
    cid.resize(MACHINE_CONTENT_ID_LEN, b'0');
    Bytes::from(cid)
}
