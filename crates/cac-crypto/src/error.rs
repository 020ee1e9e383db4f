//! Local error type for the `cac-crypto` crate.

// Re-export the canonical error type from the shared types crate, the
// same boundary drawn between a crypto crate and its shared error
// crate throughout this workspace.
pub use cac_types::CryptoError;
