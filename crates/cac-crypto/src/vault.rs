//! Resolves, decrypts, and caches asymmetric key material for a Vet
//! or Clinic principal.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use cac_types::Role;

use crate::error::CryptoError;
use crate::key_store;
use crate::sign::rsa::{PrivateKeyHandle, PublicKey};

/// Where a principal's private key PEM lives, relative to
/// [`VaultConfig::base_dir`] unless already absolute.
#[derive(Debug, Clone)]
pub struct KeyLocation {
    pub principal_id: i64,
    pub role: Role,
    pub private_key_path: PathBuf,
    pub public_key_path: PathBuf,
}

/// Explicit, caller-constructed configuration — no ambient globals.
#[derive(Debug, Clone)]
pub struct VaultConfig {
    pub base_dir: PathBuf,
}

impl VaultConfig {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn resolve(&self, relative: &Path) -> PathBuf {
        if relative.is_absolute() {
            relative.to_path_buf()
        } else {
            self.base_dir.join(relative)
        }
    }
}

/// A process-wide cache of decrypted private-key handles, invalidated
/// on rotation and zeroed on eviction or shutdown. A plain
/// `RwLock<HashMap<_>>` is proportionate here — unlike a hot, highly
/// concurrent state map, this cache is small and read-mostly, so
/// `dashmap` would be more machinery than the access pattern needs
/// (see DESIGN.md).
pub struct KeyVault {
    config: VaultConfig,
    cache: RwLock<HashMap<(i64, Role), PrivateKeyHandle>>,
}

impl KeyVault {
    pub fn new(config: VaultConfig) -> Self {
        Self {
            config,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Decrypts and caches a principal's private key handle. Returns
    /// the cached handle on a repeat call with the same identity,
    /// without re-touching disk or re-running the KDF.
    pub fn load_private(
        &self,
        principal_id: i64,
        role: Role,
        private_key_path: &Path,
        password: &str,
    ) -> Result<PrivateKeyHandle, CryptoError> {
        let key = (principal_id, role);
        if let Some(handle) = self
            .cache
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&key)
        {
            return Ok(handle.clone());
        }

        let resolved = self.config.resolve(private_key_path);
        let handle = key_store::load_encrypted_private_key(&resolved, password)?;

        self.cache
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key, handle.clone());

        Ok(handle)
    }

    /// Loads a principal's public key from a SubjectPublicKeyInfo PEM
    /// file. Never cached by identity — public keys are cheap to
    /// re-parse and unlike private handles carry no secret to
    /// protect.
    pub fn load_public(&self, public_key_path: &Path) -> Result<PublicKey, CryptoError> {
        let resolved = self.config.resolve(public_key_path);
        let pem = std::fs::read_to_string(&resolved).map_err(|_| CryptoError::KeyNotFound)?;
        PublicKey::from_pem(&pem)
    }

    /// Parses a SubjectPublicKeyInfo PEM document supplied inline
    /// (e.g. over the wire, base64-wrapped) rather than read from disk
    /// (`resolve_public_from_pem`).
    pub fn resolve_public_from_pem(&self, pem_b64: &str) -> Result<PublicKey, CryptoError> {
        use base64::engine::general_purpose::STANDARD as BASE64;
        use base64::Engine;

        let pem_bytes = BASE64
            .decode(pem_b64)
            .map_err(|_| CryptoError::KeyFormatInvalid)?;
        PublicKey::from_pem_bytes(&pem_bytes)
    }

    /// Invalidates a cached private-key handle, e.g. after the
    /// principal rotates their key pair. The evicted
    /// `PrivateKeyHandle` is dropped here, which zeroizes its RSA
    /// limbs.
    pub fn invalidate(&self, principal_id: i64, role: Role) {
        self.cache
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&(principal_id, role));
    }

    /// Resolves a relative key path against the vault's configured
    /// base directory (KeyResolver::absolute_path_of).
    pub fn absolute_path_of(&self, relative: &Path) -> PathBuf {
        self.config.resolve(relative)
    }
}
