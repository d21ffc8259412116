//! # Dataverse
//!
//! Ledger-recorded facts about machines and the data they produce.
//!
//! ## Overview
//!
//! Three kinds of immutable fact are recorded:
//!
//! - **Registration**: a machine firmware/image content id
//! - **Attestation**: a 44-byte machine address bound to a category,
//!   manufacturer and 66-byte content id
//! - **Notarization**: a data content id bound to an owner and to the
//!   owner's attesting transaction
//!
//! Each fact is validated, encoded and stored under a key derived from its
//! kind and transaction id ([`execute`]), and read back by transaction id
//! ([`query`]). The [`Synchronizer`] mirrors confirmed facts into a
//! content-id keyed index and gates submissions on it.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dataverse::{DataverseConfig, LocalLedger, Synchronizer};
//!
//! async fn example() {
//!     let config = DataverseConfig::from_json_file("dataverse.json").unwrap();
//!     let index = config.open_index().unwrap();
//!     let sync = Synchronizer::with_config(index, LocalLedger::new(), &config);
//!
//!     let machine_cid = vec![b'b'; 66];
//!     sync.register(machine_cid.clone()).await.unwrap();
//!     sync.attest(vec![b'A'; 44], "sensor", "Acme", machine_cid).await.unwrap();
//!
//!     let (_tx_id, cid) = sync.notarize_data(vec![b'A'; 44], b"reading").await.unwrap();
//!     assert!(sync.verify(cid.as_bytes()).await.unwrap());
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `dataverse::core` - fact schema, validation, encoding, keys
//! - `dataverse::store` - ledger state abstraction and the secondary index

pub mod config;
pub mod error;
pub mod execute;
pub mod ledger;
pub mod query;
pub mod sync;

// Re-export component crates
pub use dataverse_core as core;
pub use dataverse_store as store;

pub use config::{DataverseConfig, DEFAULT_NOTARIZE_DATA_TYPE};
pub use error::{ConfigError, ExecuteError, LedgerError, QueryError, Result, SyncError};
pub use execute::{execute, execute_fact, Outcome};
pub use ledger::{Ledger, LocalLedger, TxOutcome};
pub use query::{query, resolve, Record};
pub use sync::Synchronizer;

// Re-export commonly used core types
pub use dataverse_core::{
    data_content_id, Action, AttestedMachine, DecodeError, Fact, FactKind, NotarizedData,
    RegisteredMachine, RejectReason, StorageKey, TxId,
};
