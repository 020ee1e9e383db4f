//! The canonical certificate payload.
//!
//! Defined as plain `serde`-derived structs rather than a dynamic
//! map: struct field serialization follows declaration order for both
//! `serde_json` and `serde_cbor`, which is what makes the byte-stable
//! field order the QR round-trip depends on hold without hand-rolled
//! ordering logic.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const CERT_TYPE: &str = "PET_VACCINATION_CERT_V1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssuerFacts {
    pub id: i64,
    pub name: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectFacts {
    #[serde(rename = "petId")]
    pub pet_id: i64,
    #[serde(rename = "petName")]
    pub pet_name: String,
    pub species: String,
    pub breed: String,
    pub microchip: String,
    #[serde(rename = "birthDate")]
    pub birth_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaccineFacts {
    pub name: String,
    #[serde(rename = "validityYears")]
    pub validity_years: i64,
    pub laboratory: String,
    #[serde(rename = "batchNumber")]
    pub batch_number: String,
    #[serde(rename = "isRabiesVaccine")]
    pub is_rabies_vaccine: bool,
    #[serde(rename = "vaccinationDate")]
    pub vaccination_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventFacts {
    #[serde(rename = "recordId")]
    pub record_id: i64,
    #[serde(rename = "recordType")]
    pub record_type: String,
    pub vaccine: VaccineFacts,
}

/// The field-for-field canonical certificate payload shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalPayload {
    #[serde(rename = "certType")]
    pub cert_type: String,
    /// Epoch milliseconds, encoded as an integer rather than a string.
    #[serde(rename = "issuanceTimestamp")]
    pub issuance_timestamp: i64,
    #[serde(rename = "certificateNumber")]
    pub certificate_number: String,
    pub issuer: IssuerFacts,
    pub subject: SubjectFacts,
    pub event: EventFacts,
}
