//! Core data model: Pet, MedicalRecord, Vaccine, Certificate and their
//! read-only projections used in the issuance view.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a `Pet`. Externally managed; only `Active` pets
/// may have certificates issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PetStatus {
    Pending,
    Active,
    Inactive,
}

/// A principal role for key resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Vet,
    Clinic,
}

/// Pet identity and travel dates. CAC only reads this; ownership and
/// CRUD live outside the CAC boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub species: String,
    pub breed: String,
    pub microchip: String,
    pub birth_date: Option<NaiveDate>,
    pub status: PetStatus,
    pub last_eu_entry_date: Option<NaiveDate>,
    pub last_eu_exit_date: Option<NaiveDate>,
    /// The vet currently associated with this pet, used by the
    /// issuance authorization precondition.
    pub attending_vet_id: i64,
}

/// The kind of clinical event a `MedicalRecord` documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordType {
    FirstVisit,
    AnnualCheck,
    Vaccine,
    Illness,
    Urgency,
    Other,
}

/// Vaccine details embedded in a `MedicalRecord` when `record_type ==
/// Vaccine`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vaccine {
    pub name: String,
    /// Validity period in years. Must be `>= 0` to be eligible
    /// evidence; negative or absent values are skipped.
    pub validity_years: i64,
    pub laboratory: String,
    pub batch_number: String,
    pub is_rabies_vaccine: bool,
    pub vaccination_date: NaiveDate,
}

/// A clinical event for a pet. Once `immutable` flips to `true`, its
/// content fields are frozen for the record's lifetime — this crate
/// does not expose a setter that can flip it back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalRecord {
    pub id: i64,
    pub pet_id: i64,
    pub creator_user_id: i64,
    pub clinic_id: i64,
    pub record_type: RecordType,
    pub created_at: DateTime<Utc>,
    pub description: Option<String>,
    pub vaccine: Option<Vaccine>,
    pub vet_signature: Option<String>,
    pub immutable: bool,
}

impl MedicalRecord {
    /// "Signed" means a non-empty detached vet signature.
    pub fn is_signed(&self) -> bool {
        self.vet_signature.as_deref().is_some_and(|s| !s.is_empty())
    }
}


/// An immutable, uniquely numbered certificate record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certificate {
    pub id: i64,
    pub certificate_number: String,
    pub pet_id: i64,
    pub medical_record_id: i64,
    pub generator_vet_id: i64,
    pub issuing_clinic_id: i64,
    pub created_at: DateTime<Utc>,
    pub payload_json: String,
    pub payload_hash: String,
    pub vet_signature: String,
    pub clinic_signature: String,
    pub initial_eu_entry_expiry_date: Option<NaiveDate>,
    pub travel_validity_end_date: Option<NaiveDate>,
}

/// Read-only pet projection embedded in the issuance view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetSummary {
    pub id: i64,
    pub name: String,
    pub species: String,
    pub breed: String,
    pub microchip: String,
    pub birth_date: Option<NaiveDate>,
}

/// Read-only vet projection embedded in the issuance view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VetSummary {
    pub id: i64,
    pub name: String,
    pub clinic_id: i64,
}

/// Read-only clinic projection embedded in the issuance view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicSummary {
    pub id: i64,
    pub name: String,
    pub country: String,
}

/// The full issuance output: the persisted `Certificate` plus the
/// summaries the caller supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificateView {
    pub certificate: Certificate,
    pub pet: PetSummary,
    pub vet: VetSummary,
    pub clinic: ClinicSummary,
}

/// Event published on successful issuance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificateGenerated {
    pub cert_id: i64,
    pub pet_id: i64,
    pub owner_id: i64,
    pub vet_id: i64,
    pub cert_number: String,
    pub at: DateTime<Utc>,
}
