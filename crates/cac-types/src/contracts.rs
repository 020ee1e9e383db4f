//! Collaborator contracts. These are interfaces only — CAC
//! consumes them but owns no production implementation; user/clinic/
//! pet CRUD, HTTP transport, and DB wiring live entirely on the other
//! side of these traits.

use chrono::NaiveDate;
use std::path::{Path, PathBuf};

use crate::error::CacError;
use crate::model::{Certificate, CertificateGenerated, ClinicSummary, MedicalRecord, Pet, Role, VetSummary};

/// Read/write access to medical records.
pub trait RecordStore: Send + Sync {
    /// All signed Rabies-vaccine records for a pet, newest first.
    fn find_signed_rabies_desc(&self, pet_id: i64) -> Result<Vec<MedicalRecord>, CacError>;

    /// All signed `AnnualCheck` records since `cutoff`, newest first.
    fn find_signed_checkups_since_desc(
        &self,
        pet_id: i64,
        cutoff: NaiveDate,
    ) -> Result<Vec<MedicalRecord>, CacError>;

    /// Idempotently flips a record's `immutable` flag to `true`.
    fn mark_immutable(&self, record_id: i64) -> Result<(), CacError>;

    /// Fetches a single record by id (used by `RecordSignBinding` and
    /// by the issuance pipeline to re-read the selected evidence inside
    /// the transaction).
    fn find_by_id(&self, record_id: i64) -> Result<Option<MedicalRecord>, CacError>;
}

/// Certificate persistence with the two uniqueness constraints: one
/// certificate per medical record, and globally unique certificate
/// numbers.
pub trait CertificateStore: Send + Sync {
    fn exists_for_record(&self, record_id: i64) -> Result<bool, CacError>;

    fn find_by_number(&self, number: &str) -> Result<Option<Certificate>, CacError>;

    /// Enforces both unique constraints; implementations translate a
    /// storage-level uniqueness violation into the matching
    /// `CacError` variant. Returns the persisted certificate with its
    /// store-assigned `id` filled in, since callers need the
    /// generated primary key for the issuance view and the
    /// `CertificateGenerated` event.
    fn insert(&self, certificate: Certificate) -> Result<Certificate, CacError>;
}

/// Resolves principal key material. Returns raw PEM bytes rather than
/// a concrete key type so this crate does not need to depend on
/// `cac-crypto`; `cac-core` bridges the two.
pub trait KeyResolver: Send + Sync {
    fn public_key_of(&self, principal_id: i64, role: Role) -> Result<Vec<u8>, CacError>;

    fn absolute_path_of(&self, relative: &Path) -> PathBuf;

    /// Resolves the vault-relative (or absolute) path to a principal's
    /// encrypted private key PEM. Added alongside `public_key_of` and
    /// `absolute_path_of` because `CertificateService` must locate
    /// each principal's private key before it can call
    /// `KeyVault::load_private`, and no other contract covers it.
    fn private_key_path_of(&self, principal_id: i64, role: Role) -> PathBuf;
}

/// Resolves the pet/vet/clinic facts the issuance pipeline needs but
/// does not own; added here since the state machine requires
/// resolving all three and no other contract covers it.
pub trait DirectoryService: Send + Sync {
    fn resolve_pet(&self, pet_id: i64) -> Result<Pet, CacError>;
    fn resolve_vet(&self, vet_id: i64) -> Result<VetSummary, CacError>;
    fn resolve_clinic(&self, clinic_id: i64) -> Result<ClinicSummary, CacError>;
}

/// Best-effort, asynchronous publication of the `CertificateGenerated`
/// event. Failure is logged by the caller and never rolls back the
/// issuance transaction.
pub trait EventPublisher: Send + Sync {
    fn publish(&self, event: CertificateGenerated) -> Result<(), String>;
}
