//! # Dataverse Store
//!
//! State and index storage for Dataverse.
//!
//! ## Overview
//!
//! Two storage concerns live here:
//!
//! - **Ledger state**: the keyed byte-state the host ledger hands to the
//!   write and read paths, behind [`StateRead`]/[`StateMut`]. [`ScopedState`]
//!   limits one transaction to its declared keys and chunk budgets.
//! - **Secondary index**: the content-id keyed mirror of confirmed facts,
//!   behind the async [`IndexStore`] trait. [`SqliteIndex`] persists it and
//!   [`MemoryIndex`] keeps it in memory for tests.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bytes::Bytes;
//! use dataverse_core::TxId;
//! use dataverse_store::{IndexStore, InsertResult, RegistrationEntry, SqliteIndex};
//!
//! async fn example() {
//!     let index = SqliteIndex::open_memory().unwrap();
//!
//!     let entry = RegistrationEntry {
//!         content_id: Bytes::from_static(b"bafy..."),
//!         tx_id: TxId::ZERO,
//!     };
//!     let result = index.insert_registration(&entry).await.unwrap();
//!     assert_eq!(result, InsertResult::Inserted);
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Unique registrations**: a second registration of a content id returns
//!   `AlreadyExists` and leaves the first untouched
//! - **Buffered writes**: a [`ScopedState`] only reaches the base state on commit

pub mod error;
pub mod memory;
pub mod migration;
pub mod scoped;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::{MemoryIndex, MemoryState};
pub use scoped::ScopedState;
pub use sqlite::SqliteIndex;
pub use traits::{
    AttestationEntry, IndexStore, InsertResult, NotarizationEntry, RegistrationEntry, StateMut,
    StateRead,
};
