//! Encrypted-at-rest private key loading.
//!
//! Private key material is stored as an industry-standard
//! password-encrypted PKCS#8 PEM document on disk — the same format
//! `openssl genpkey -aes256` produces. This module owns the
//! filesystem read and the passphrase-gated decrypt; it never caches
//! anything (caching belongs to [`crate::vault::KeyVault`]).

use std::path::Path;

use rsa::pkcs8::DecodePrivateKey;
use rsa::RsaPrivateKey;
use zeroize::Zeroize;

use crate::error::CryptoError;
use crate::sign::rsa::PrivateKeyHandle;

/// Reads an encrypted PKCS#8 PEM file and decrypts it with
/// `passphrase`. Maps a wrong password or corrupt file to
/// `KeyDecryptionFailed`; a missing or unparseable PEM container to
/// `KeyFormatInvalid`. Never returns a partially constructed key on
/// failure.
pub fn load_encrypted_private_key(
    path: &Path,
    passphrase: &str,
) -> Result<PrivateKeyHandle, CryptoError> {
    let mut pem = std::fs::read_to_string(path).map_err(|_| CryptoError::KeyNotFound)?;

    let key_result = RsaPrivateKey::from_pkcs8_encrypted_pem(&pem, passphrase.as_bytes());
    // The PEM text holds the encrypted key material; it has no further
    // use past this point and is zeroized rather than left for the
    // allocator to reclaim whenever it likes.
    pem.zeroize();
    let key = key_result.map_err(|_| CryptoError::KeyDecryptionFailed)?;

    Ok(PrivateKeyHandle::from_rsa(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;
    use rsa::pkcs8::{EncodePrivateKey, LineEnding};
    use tempfile::NamedTempFile;

    fn write_encrypted_key(passphrase: &str) -> NamedTempFile {
        let key = RsaPrivateKey::new(&mut OsRng, 2048).expect("generate key");
        let pem = key
            .to_pkcs8_encrypted_pem(&mut OsRng, passphrase, LineEnding::LF)
            .expect("encode encrypted pem");

        let file = NamedTempFile::new().expect("tempfile");
        std::fs::write(file.path(), pem.as_bytes()).expect("write pem");
        file
    }

    #[test]
    fn roundtrip_with_correct_passphrase() {
        let file = write_encrypted_key("correct horse battery staple");
        let handle = load_encrypted_private_key(file.path(), "correct horse battery staple");
        assert!(handle.is_ok());
    }

    #[test]
    fn wrong_passphrase_fails_without_panicking() {
        let file = write_encrypted_key("the-real-password");
        let result = load_encrypted_private_key(file.path(), "a-guess");
        assert!(matches!(result, Err(CryptoError::KeyDecryptionFailed)));
    }

    #[test]
    fn missing_file_is_key_not_found() {
        let result = load_encrypted_private_key(Path::new("/nonexistent/key.pem"), "whatever");
        assert!(matches!(result, Err(CryptoError::KeyNotFound)));
    }
}
