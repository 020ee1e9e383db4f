//! In-memory implementations of the collaborator contracts from
//! `cac_types::contracts`. CAC ships no production implementation of
//! these traits; these doubles exist purely so the core crates and
//! the CLI demo can be exercised without a real database.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use cac_types::{
    CacError, CertificateGenerated, CertificateStore, ClinicSummary, DirectoryService,
    EventPublisher, KeyResolver, MedicalRecord, Pet, RecordStore, Role, VetSummary,
};
use chrono::NaiveDate;

use cac_types::Certificate;

/// Seeded, append-only in-memory `MedicalRecord` store.
#[derive(Default)]
pub struct InMemoryRecordStore {
    records: Mutex<Vec<MedicalRecord>>,
}

impl InMemoryRecordStore {
    pub fn new(records: Vec<MedicalRecord>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    fn records(&self) -> std::sync::MutexGuard<'_, Vec<MedicalRecord>> {
        self.records.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl RecordStore for InMemoryRecordStore {
    fn find_signed_rabies_desc(&self, pet_id: i64) -> Result<Vec<MedicalRecord>, CacError> {
        let mut matches: Vec<MedicalRecord> = self
            .records()
            .iter()
            .filter(|r| {
                r.pet_id == pet_id
                    && r.is_signed()
                    && r.vaccine.as_ref().is_some_and(|v| v.is_rabies_vaccine)
            })
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matches)
    }

    fn find_signed_checkups_since_desc(
        &self,
        pet_id: i64,
        cutoff: NaiveDate,
    ) -> Result<Vec<MedicalRecord>, CacError> {
        use cac_types::RecordType;
        let mut matches: Vec<MedicalRecord> = self
            .records()
            .iter()
            .filter(|r| {
                r.pet_id == pet_id
                    && r.is_signed()
                    && r.record_type == RecordType::AnnualCheck
                    && r.created_at.date_naive() >= cutoff
            })
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matches)
    }

    fn mark_immutable(&self, record_id: i64) -> Result<(), CacError> {
        if let Some(record) = self.records().iter_mut().find(|r| r.id == record_id) {
            record.immutable = true;
        }
        Ok(())
    }

    fn find_by_id(&self, record_id: i64) -> Result<Option<MedicalRecord>, CacError> {
        Ok(self.records().iter().find(|r| r.id == record_id).cloned())
    }
}

/// In-memory `Certificate` store enforcing both uniqueness
/// constraints: one certificate per medical record, and globally
/// unique certificate numbers.
#[derive(Default)]
pub struct InMemoryCertificateStore {
    certificates: Mutex<Vec<Certificate>>,
}

impl InMemoryCertificateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Certificate> {
        self.certificates
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }
}

impl CertificateStore for InMemoryCertificateStore {
    fn exists_for_record(&self, record_id: i64) -> Result<bool, CacError> {
        Ok(self
            .certificates
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .iter()
            .any(|c| c.medical_record_id == record_id))
    }

    fn find_by_number(&self, number: &str) -> Result<Option<Certificate>, CacError> {
        Ok(self
            .certificates
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .iter()
            .find(|c| c.certificate_number == number)
            .cloned())
    }

    fn insert(&self, mut certificate: Certificate) -> Result<Certificate, CacError> {
        let mut guard = self.certificates.lock().unwrap_or_else(|p| p.into_inner());
        if guard
            .iter()
            .any(|c| c.certificate_number == certificate.certificate_number)
        {
            return Err(CacError::CertificateNumberAlreadyExists(
                certificate.certificate_number,
            ));
        }
        if guard
            .iter()
            .any(|c| c.medical_record_id == certificate.medical_record_id)
        {
            return Err(CacError::CertificateAlreadyExistsForRecord(
                certificate.medical_record_id,
            ));
        }
        certificate.id = guard.len() as i64 + 1;
        guard.push(certificate.clone());
        Ok(certificate)
    }
}

/// Seeded in-memory directory of pets, vets, and clinics.
#[derive(Default)]
pub struct InMemoryDirectoryService {
    pets: Vec<Pet>,
    vets: Vec<VetSummary>,
    clinics: Vec<ClinicSummary>,
}

impl InMemoryDirectoryService {
    pub fn new(pets: Vec<Pet>, vets: Vec<VetSummary>, clinics: Vec<ClinicSummary>) -> Self {
        Self {
            pets,
            vets,
            clinics,
        }
    }
}

impl DirectoryService for InMemoryDirectoryService {
    fn resolve_pet(&self, pet_id: i64) -> Result<Pet, CacError> {
        self.pets
            .iter()
            .find(|p| p.id == pet_id)
            .cloned()
            .ok_or(CacError::PetNotFound(pet_id))
    }

    fn resolve_vet(&self, vet_id: i64) -> Result<VetSummary, CacError> {
        self.vets
            .iter()
            .find(|v| v.id == vet_id)
            .cloned()
            .ok_or(CacError::VetNotFound(vet_id))
    }

    fn resolve_clinic(&self, clinic_id: i64) -> Result<ClinicSummary, CacError> {
        self.clinics
            .iter()
            .find(|c| c.id == clinic_id)
            .cloned()
            .ok_or(CacError::ClinicNotFound(clinic_id))
    }
}

/// Records every published event in memory instead of delivering it
/// anywhere, so tests can assert on what would have been published.
#[derive(Default)]
pub struct InMemoryEventPublisher {
    events: Mutex<Vec<CertificateGenerated>>,
}

impl InMemoryEventPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn published(&self) -> Vec<CertificateGenerated> {
        self.events.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }
}

impl EventPublisher for InMemoryEventPublisher {
    fn publish(&self, event: CertificateGenerated) -> Result<(), String> {
        self.events
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(event);
        Ok(())
    }
}

/// Resolves principal key material by a fixed filename convention
/// under a configured base directory: `{role}-{id}.key.pem` /
/// `{role}-{id}.pub.pem`. A real deployment would track each
/// principal's key path explicitly; this double exists so
/// the CLI demo and integration tests can generate throwaway keys with
/// `cac_test_utils::keys::PrincipalKeyPair` and resolve them the same
/// way `KeyVault` expects.
pub struct InMemoryKeyResolver {
    base_dir: PathBuf,
}

impl InMemoryKeyResolver {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn role_label(role: Role) -> &'static str {
        match role {
            Role::Vet => "vet",
            Role::Clinic => "clinic",
        }
    }

    fn relative_private_path(&self, principal_id: i64, role: Role) -> PathBuf {
        PathBuf::from(format!("{}-{principal_id}.key.pem", Self::role_label(role)))
    }

    fn relative_public_path(&self, principal_id: i64, role: Role) -> PathBuf {
        PathBuf::from(format!("{}-{principal_id}.pub.pem", Self::role_label(role)))
    }
}

impl KeyResolver for InMemoryKeyResolver {
    fn public_key_of(&self, principal_id: i64, role: Role) -> Result<Vec<u8>, CacError> {
        let path = self.absolute_path_of(&self.relative_public_path(principal_id, role));
        std::fs::read(&path).map_err(|e| {
            log::error!("failed to read public key at {}: {e}", path.display());
            CacError::IssuanceFailed
        })
    }

    fn absolute_path_of(&self, relative: &Path) -> PathBuf {
        if relative.is_absolute() {
            relative.to_path_buf()
        } else {
            self.base_dir.join(relative)
        }
    }

    fn private_key_path_of(&self, principal_id: i64, role: Role) -> PathBuf {
        self.relative_private_path(principal_id, role)
    }
}
