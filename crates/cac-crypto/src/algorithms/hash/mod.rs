//! Deterministic cryptographic digest over canonical bytes.

use sha2::{Digest, Sha256};

/// Computes the SHA-256 digest of `bytes` and returns it as lower-case
/// hex. Pure, total, and has no side effects other than CPU time —
/// the only failure mode is OOM, which Rust surfaces as an abort, not
/// a `Result`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    hex::encode(digest)
}
