//! # Dataverse Testkit
//!
//! Testing utilities for Dataverse.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: reference facts with their exact encoded bytes
//! - **Generators**: Proptest strategies for valid and arbitrary facts
//! - **Fixtures**: an in-memory ledger and index wired to a synchronizer
//!
//! ## Golden Vectors
//!
//! ```rust
//! use dataverse_testkit::vectors::all_vectors;
//!
//! for vector in all_vectors() {
//!     assert_eq!(hex::encode(vector.action.encode()), vector.action_hex());
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use dataverse_testkit::generators::valid_action;
//!
//! proptest! {
//!     #[test]
//!     fn valid_actions_validate(action in valid_action()) {
//!         prop_assert!(action.validate().is_ok());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use dataverse_testkit::fixtures::TestFixture;
//!
//! # async fn example() {
//! let fixture = TestFixture::new();
//! let (address, _attest_tx) = fixture.attested_machine(0).await;
//! fixture.sync.notarize(address, "bafydata").await.unwrap();
//! # }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{machine_address, machine_content_id, random_machine_address, TestFixture};
pub use generators::{valid_action, ValidFact};
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector};
