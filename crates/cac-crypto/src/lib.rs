//! # Pet Certificate Authority — Crypto Crate Lints
//!
//! This crate enforces a strict set of lints to ensure high-quality,
//! panic-free, and well-documented code. Panics are disallowed in
//! non-test code to promote robust error handling.
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::indexing_slicing
    )
)]
//! # Certificate Authority Core Cryptography
//!
//! Key custody (KeyVault), digest (Hasher), and RSA signing (Signer)
//! for the pet certificate issuance pipeline.

pub mod algorithms;
pub mod error;
pub mod key_store;
pub mod sign;
pub mod vault;

pub use algorithms::hash::sha256_hex;
pub use error::CryptoError;
pub use sign::rsa::{PrivateKeyHandle, PublicKey, Signer};
pub use vault::KeyVault;

#[cfg(test)]
mod tests {
    #[test]
    fn test_crypto_canary() {}
}
