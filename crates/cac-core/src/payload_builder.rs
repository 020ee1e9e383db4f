//! Assembles the stable, JSON-serializable certificate payload.

use cac_types::{
    CacError, CanonicalPayload, ClinicSummary, CryptoError, EventFacts, IssuerFacts, MedicalRecord,
    Pet, SubjectFacts, VaccineFacts, CERT_TYPE,
};
use chrono::{DateTime, Utc};

/// Builds the canonical payload from resolved pet, issuer, and
/// evidence facts. The only failure mode is an internal-invariant
/// violation — a rabies record reaching this stage without a vaccine
/// block — which evidence selection is supposed to make unreachable;
/// it is still checked explicitly rather than assumed, since an
/// `Option` match costs nothing and a silent panic here would be far
/// worse than an opaque error.
pub fn build(
    pet: &Pet,
    certificate_number: &str,
    clinic: &ClinicSummary,
    rabies_record: &MedicalRecord,
    issuance_timestamp: DateTime<Utc>,
) -> Result<CanonicalPayload, CacError> {
    let vaccine = rabies_record
        .vaccine
        .as_ref()
        .ok_or(CacError::IssuanceFailed)?;

    Ok(CanonicalPayload {
        cert_type: CERT_TYPE.to_string(),
        issuance_timestamp: issuance_timestamp.timestamp_millis(),
        certificate_number: certificate_number.to_string(),
        issuer: IssuerFacts {
            id: clinic.id,
            name: clinic.name.clone(),
            country: clinic.country.clone(),
        },
        subject: SubjectFacts {
            pet_id: pet.id,
            pet_name: pet.name.clone(),
            species: pet.species.clone(),
            breed: pet.breed.clone(),
            microchip: pet.microchip.clone(),
            birth_date: pet.birth_date,
        },
        event: EventFacts {
            record_id: rabies_record.id,
            record_type: format!("{:?}", rabies_record.record_type),
            vaccine: VaccineFacts {
                name: vaccine.name.clone(),
                validity_years: vaccine.validity_years,
                laboratory: vaccine.laboratory.clone(),
                batch_number: vaccine.batch_number.clone(),
                is_rabies_vaccine: vaccine.is_rabies_vaccine,
                vaccination_date: vaccine.vaccination_date,
            },
        },
    })
}

/// Serializes a payload to its canonical JSON byte sequence. Struct
/// field order is fixed by declaration order in `cac_types::payload`,
/// so two calls with identical inputs are byte-identical.
pub fn canonicalize(payload: &CanonicalPayload) -> Result<String, CryptoError> {
    serde_json::to_string(payload).map_err(|e| CryptoError::PayloadSerializationFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cac_types::{PetStatus, RecordType, Vaccine};
    use chrono::NaiveDate;

    fn sample_pet() -> Pet {
        Pet {
            id: 42,
            owner_id: 7,
            name: "Rex".to_string(),
            species: "dog".to_string(),
            breed: "Labrador".to_string(),
            microchip: "982000123456789".to_string(),
            birth_date: NaiveDate::from_ymd_opt(2020, 5, 1),
            status: PetStatus::Active,
            last_eu_entry_date: None,
            last_eu_exit_date: None,
            attending_vet_id: 11,
        }
    }

    fn sample_record() -> MedicalRecord {
        MedicalRecord {
            id: 101,
            pet_id: 42,
            creator_user_id: 11,
            clinic_id: 1,
            record_type: RecordType::Vaccine,
            created_at: Utc::now(),
            description: None,
            vaccine: Some(Vaccine {
                name: "Rabisin".to_string(),
                validity_years: 1,
                laboratory: "Boehringer".to_string(),
                batch_number: "BX-777".to_string(),
                is_rabies_vaccine: true,
                vaccination_date: Utc::now().date_naive(),
            }),
            vet_signature: Some("sig".to_string()),
            immutable: false,
        }
    }

    fn sample_clinic() -> ClinicSummary {
        ClinicSummary {
            id: 1,
            name: "Clinica Central".to_string(),
            country: "ES".to_string(),
        }
    }

    #[test]
    fn build_is_deterministic_byte_for_byte() {
        let pet = sample_pet();
        let record = sample_record();
        let clinic = sample_clinic();
        let ts = Utc::now();

        let a = build(&pet, "AHC-0001", &clinic, &record, ts).expect("build a");
        let b = build(&pet, "AHC-0001", &clinic, &record, ts).expect("build b");

        let json_a = canonicalize(&a).expect("canonicalize a");
        let json_b = canonicalize(&b).expect("canonicalize b");
        assert_eq!(json_a, json_b);
    }

    #[test]
    fn canonical_json_preserves_declared_field_order() {
        let pet = sample_pet();
        let record = sample_record();
        let clinic = sample_clinic();

        let payload = build(&pet, "AHC-0001", &clinic, &record, Utc::now()).expect("build");
        let json = canonicalize(&payload).expect("canonicalize");

        let cert_type_pos = json.find("\"certType\"").expect("certType present");
        let timestamp_pos = json
            .find("\"issuanceTimestamp\"")
            .expect("issuanceTimestamp present");
        let number_pos = json
            .find("\"certificateNumber\"")
            .expect("certificateNumber present");
        let issuer_pos = json.find("\"issuer\"").expect("issuer present");
        let subject_pos = json.find("\"subject\"").expect("subject present");
        let event_pos = json.find("\"event\"").expect("event present");

        assert!(cert_type_pos < timestamp_pos);
        assert!(timestamp_pos < number_pos);
        assert!(number_pos < issuer_pos);
        assert!(issuer_pos < subject_pos);
        assert!(subject_pos < event_pos);
    }

    #[test]
    fn build_rejects_a_rabies_record_without_a_vaccine_block() {
        let pet = sample_pet();
        let mut record = sample_record();
        record.vaccine = None;
        let clinic = sample_clinic();

        let err = build(&pet, "AHC-0001", &clinic, &record, Utc::now()).unwrap_err();
        assert!(matches!(err, CacError::IssuanceFailed));
    }
}
