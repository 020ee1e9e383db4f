//! C6 CertificateService: orchestrates issuance end-to-end, enforcing
//! uniqueness and immutability.

use chrono::{NaiveDate, Utc};

use cac_crypto::{sha256_hex, KeyVault, Signer};
use cac_types::{
    CacError, Certificate, CertificateGenerated, CertificateStore, CertificateView,
    DirectoryService, EventPublisher, KeyResolver, PetStatus, RecordStore, Role,
};

use crate::evidence;
use crate::payload_builder;

/// Issuance input ("Issuance input").
#[derive(Debug, Clone)]
pub struct IssueRequest {
    pub pet_id: i64,
    pub certificate_number: String,
    pub vet_private_key_password: String,
    pub clinic_private_key_password: String,
}

/// Orchestrates §4.6's state machine over the collaborator contracts.
/// Holds no state of its own beyond borrowed references — every
/// dependency is passed in explicitly at construction, matching the
/// "no ambient globals" design note.
pub struct CertificateService<'a> {
    records: &'a dyn RecordStore,
    certificates: &'a dyn CertificateStore,
    directory: &'a dyn DirectoryService,
    keys: &'a dyn KeyResolver,
    vault: &'a KeyVault,
    events: &'a dyn EventPublisher,
}

impl<'a> CertificateService<'a> {
    pub fn new(
        records: &'a dyn RecordStore,
        certificates: &'a dyn CertificateStore,
        directory: &'a dyn DirectoryService,
        keys: &'a dyn KeyResolver,
        vault: &'a KeyVault,
        events: &'a dyn EventPublisher,
    ) -> Self {
        Self {
            records,
            certificates,
            directory,
            keys,
            vault,
            events,
        }
    }

    /// Runs the full issuance state machine. `today` is
    /// threaded through explicitly for the same reason as in
    /// `evidence::select` — determinism without an ambient clock.
    pub fn issue(
        &self,
        request: IssueRequest,
        generating_vet_id: i64,
        today: NaiveDate,
    ) -> Result<CertificateView, CacError> {
        log::debug!(
            "issuing certificate {} for pet {} by vet {generating_vet_id}",
            request.certificate_number,
            request.pet_id
        );

        if request.certificate_number.trim().is_empty() {
            return Err(CacError::CertificateNumberBlank);
        }
        if request.pet_id <= 0 {
            return Err(CacError::PetIdMissing);
        }

        let vet = self.directory.resolve_vet(generating_vet_id)?;
        let pet = self.directory.resolve_pet(request.pet_id)?;
        self.authorize(&pet, &vet)?;
        let clinic = self.directory.resolve_clinic(vet.clinic_id)?;

        let (rabies_record, _checkup_record) = evidence::select(self.records, pet.id, today)?;

        // Number check runs first deliberately: a caller retrying the same
        // request after a failed issuance should see the certificate-number
        // conflict rather than the per-record conflict when both fire at
        // once.
        if self
            .certificates
            .find_by_number(&request.certificate_number)?
            .is_some()
        {
            log::warn!(
                "certificate number {} already exists",
                request.certificate_number
            );
            return Err(CacError::CertificateNumberAlreadyExists(
                request.certificate_number,
            ));
        }
        if self.certificates.exists_for_record(rabies_record.id)? {
            log::warn!(
                "certificate already exists for record {}",
                rabies_record.id
            );
            return Err(CacError::CertificateAlreadyExistsForRecord(rabies_record.id));
        }

        let issuance_timestamp = Utc::now();
        let payload = payload_builder::build(
            &pet,
            &request.certificate_number,
            &clinic,
            &rabies_record,
            issuance_timestamp,
        )?;
        let payload_json = payload_builder::canonicalize(&payload).map_err(|e| {
            log::error!("payload serialization failed: {e}");
            CacError::IssuanceFailed
        })?;
        let payload_hash = sha256_hex(payload_json.as_bytes());

        let vet_signature = self.sign_as(
            generating_vet_id,
            Role::Vet,
            &request.vet_private_key_password,
            payload_hash.as_bytes(),
        )?;
        let clinic_signature = self.sign_as(
            clinic.id,
            Role::Clinic,
            &request.clinic_private_key_password,
            payload_hash.as_bytes(),
        )?;

        let certificate = Certificate {
            id: 0,
            certificate_number: request.certificate_number.clone(),
            pet_id: pet.id,
            medical_record_id: rabies_record.id,
            generator_vet_id: generating_vet_id,
            issuing_clinic_id: clinic.id,
            created_at: issuance_timestamp,
            payload_json: payload_json.clone(),
            payload_hash,
            vet_signature,
            clinic_signature,
            initial_eu_entry_expiry_date: pet.last_eu_entry_date,
            travel_validity_end_date: pet.last_eu_exit_date,
        };
        // `insert` must succeed first: `mark_immutable` is a monotonic
        // false-to-true flip with no setter to undo it, so flipping it
        // before the certificate is durably stored would leave the
        // record permanently immutable with nothing to show for it if
        // the insert then failed.
        let certificate = self.certificates.insert(certificate)?;
        self.records.mark_immutable(rabies_record.id)?;

        log::info!(
            "issued certificate {} for pet {}",
            certificate.certificate_number,
            certificate.pet_id
        );

        if let Err(e) = self.events.publish(CertificateGenerated {
            cert_id: certificate.id,
            pet_id: certificate.pet_id,
            owner_id: pet.owner_id,
            vet_id: generating_vet_id,
            cert_number: certificate.certificate_number.clone(),
            at: issuance_timestamp,
        }) {
            log::warn!("failed to publish CertificateGenerated event: {e}");
        }

        Ok(CertificateView {
            certificate,
            pet: cac_types::PetSummary {
                id: pet.id,
                name: pet.name,
                species: pet.species,
                breed: pet.breed,
                microchip: pet.microchip,
                birth_date: pet.birth_date,
            },
            vet,
            clinic,
        })
    }

    /// Authorization precondition: the pet must be Active
    /// and associated with a vet from the same clinic that issues.
    fn authorize(&self, pet: &cac_types::Pet, vet: &cac_types::VetSummary) -> Result<(), CacError> {
        if pet.status != PetStatus::Active {
            return Err(CacError::PetNotActive(pet.id));
        }
        let attending_vet = self.directory.resolve_vet(pet.attending_vet_id)?;
        if attending_vet.clinic_id != vet.clinic_id {
            return Err(CacError::Unauthorized);
        }
        Ok(())
    }

    fn sign_as(
        &self,
        principal_id: i64,
        role: Role,
        password: &str,
        data: &[u8],
    ) -> Result<String, CacError> {
        let path = self.keys.private_key_path_of(principal_id, role);
        let handle = self
            .vault
            .load_private(principal_id, role, &path, password)
            .map_err(|e| {
                log::error!("key load failed for principal {principal_id}: {e}");
                CacError::IssuanceFailed
            })?;
        Signer::sign(&handle, data).map_err(|e| {
            log::error!("signing failed for principal {principal_id}: {e}");
            CacError::IssuanceFailed
        })
    }
}
