// Path: crates/cac-test-utils/src/lib.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! # Certificate Authority Core Test Utilities
//!
//! Deterministic fixtures, a seeded RNG, RSA keypair generation, and
//! in-memory collaborator-contract doubles for testing the `cac-*`
//! crates without a real database, HTTP layer, or filesystem-backed
//! key vault.

pub mod doubles;
pub mod fixtures;
pub mod keys;
pub mod randomness;

pub use doubles::{
    InMemoryCertificateStore, InMemoryDirectoryService, InMemoryEventPublisher,
    InMemoryKeyResolver, InMemoryRecordStore,
};
pub use fixtures::Fixtures;
pub use keys::PrincipalKeyPair;
pub use randomness::TestRng;
