//! # Dataverse Core
//!
//! Pure primitives for Dataverse: the fact schema, validation, canonical
//! encoding, and state key derivation.
//!
//! This crate contains no I/O, no storage, no networking.
//!
//! ## Key Types
//!
//! - [`RegisteredMachine`], [`AttestedMachine`], [`NotarizedData`] - the three facts
//! - [`Fact`] - validate / size / encode / decode, shared by all facts
//! - [`Action`] - tagged union submitted to the ledger
//! - [`TxId`] - ledger-assigned transaction identifier
//! - [`StorageKey`] - namespaced key derived from (kind, txid)
//!
//! ## Canonical Encoding
//!
//! Facts are encoded as length-prefixed byte fields in declaration order.
//! See [`canonical`] module.

pub mod action;
pub mod canonical;
pub mod crypto;
pub mod error;
pub mod fact;
pub mod keys;
pub mod types;
pub mod validation;

pub use action::{compute_units, Action, DeclaredKey};
pub use canonical::{decode, encode, max_size};
pub use crypto::{data_content_id, Sha256Hash};
pub use error::{DecodeError, RejectReason};
pub use fact::{AttestedMachine, Fact, FactKind, NotarizedData, RegisteredMachine};
pub use keys::{max_chunks, state_key, CHUNK_SIZE};
pub use types::{StorageKey, TxId};
pub use validation::{validate_attestation, validate_notarization, validate_registration};
