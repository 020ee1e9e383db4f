//! C3 Signer: RSA-SHA256-PKCS#1v1.5 detached signatures.
//!
//! PKCS#1 v1.5 is picked over PSS because it is deterministic — the
//! same key and message always produce the same signature bytes,
//! which keeps the "both signatures cover the same hash" contract
//! simple to reason about and test.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePublicKey};
use rsa::signature::{Signer as SigSigner, Verifier as SigVerifier};
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;

use crate::error::CryptoError;

/// An opaque, decrypted private key handle. `RsaPrivateKey` zeroizes
/// its internal limbs on drop, so this wrapper adds no extra
/// bookkeeping — it exists to keep the raw key type out of callers'
/// hands.
#[derive(Clone)]
pub struct PrivateKeyHandle {
    pub(crate) key: RsaPrivateKey,
}

impl PrivateKeyHandle {
    pub fn from_rsa(key: RsaPrivateKey) -> Self {
        Self { key }
    }

    /// Derives the matching public key, used when a caller has only a
    /// private key handle but needs to self-verify.
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            key: RsaPublicKey::from(&self.key),
        }
    }
}

/// An RSA public key, SubjectPublicKeyInfo-encoded on the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey {
    pub(crate) key: RsaPublicKey,
}

impl PublicKey {
    /// `KeyVault::resolve_public_from_pem`: parses a
    /// SubjectPublicKeyInfo PEM document.
    pub fn from_pem(pem: &str) -> Result<Self, CryptoError> {
        RsaPublicKey::from_public_key_pem(pem)
            .map(|key| Self { key })
            .map_err(|_| CryptoError::KeyFormatInvalid)
    }

    /// Same as [`Self::from_pem`] but over raw bytes, for collaborator
    /// contracts that hand back `Vec<u8>`.
    pub fn from_pem_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let pem = std::str::from_utf8(bytes).map_err(|_| CryptoError::KeyFormatInvalid)?;
        Self::from_pem(pem)
    }

    pub fn to_pem(&self) -> Result<String, CryptoError> {
        self.key
            .to_public_key_pem(rsa::pkcs8::LineEnding::LF)
            .map_err(|_| CryptoError::KeyFormatInvalid)
    }
}

/// Parses an (unencrypted) PKCS#8 PEM private key directly. Most
/// callers go through [`crate::vault::KeyVault`], which handles the
/// passphrase-encrypted case; this is exposed for key-generation
/// tooling and tests.
pub fn private_key_from_pkcs8_pem(pem: &str) -> Result<PrivateKeyHandle, CryptoError> {
    RsaPrivateKey::from_pkcs8_pem(pem)
        .map(PrivateKeyHandle::from_rsa)
        .map_err(|_| CryptoError::KeyFormatInvalid)
}

/// Signer: produces and verifies detached signatures using KeyVault
/// keys.
pub struct Signer;

impl Signer {
    /// Signs `data` and returns the base64-encoded signature. Fails
    /// with `SignatureGenerationFailed` if the underlying RSA
    /// operation errors.
    pub fn sign(handle: &PrivateKeyHandle, data: &[u8]) -> Result<String, CryptoError> {
        let signing_key = SigningKey::<Sha256>::new(handle.key.clone());
        let signature = signing_key
            .try_sign(data)
            .map_err(|e| CryptoError::SignatureGenerationFailed(e.to_string()))?;
        Ok(BASE64.encode(signature.to_vec()))
    }

    /// Verifies a base64-encoded detached signature against `data`.
    /// Total: returns `false` for invalid base64, a wrong key, or
    /// tampered data — it never panics or returns an `Err`.
    pub fn verify(public_key: &PublicKey, data: &[u8], signature_b64: &str) -> bool {
        let Ok(sig_bytes) = BASE64.decode(signature_b64) else {
            return false;
        };
        let Ok(signature) = Signature::try_from(sig_bytes.as_slice()) else {
            return false;
        };
        let verifying_key = VerifyingKey::<Sha256>::new(public_key.key.clone());
        verifying_key.verify(data, &signature).is_ok()
    }
}

#[cfg(test)]
mod tests;
