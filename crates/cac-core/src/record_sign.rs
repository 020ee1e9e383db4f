//! C9 RecordSignBinding: signs a `MedicalRecord` on creation by the
//! attending veterinarian.

use std::path::Path;

use cac_crypto::{KeyVault, Signer};
use cac_types::{CryptoError, MedicalRecord, Role};

/// Builds the stable signable string for a record:
/// `"petId=<p>|vetId=<v>|type=<t>|createdAt=<iso>|vaccine=<name|batch|validityYears>"`,
/// with the vaccine segment omitted entirely when the record carries
/// none.
pub fn signable_string(record: &MedicalRecord) -> String {
    let mut signable = format!(
        "petId={}|vetId={}|type={}|createdAt={}",
        record.pet_id,
        record.creator_user_id,
        record_type_label(record),
        record.created_at.to_rfc3339(),
    );

    if let Some(vaccine) = &record.vaccine {
        signable.push_str(&format!(
            "|vaccine={}|{}|{}",
            vaccine.name, vaccine.batch_number, vaccine.validity_years
        ));
    }

    signable
}

fn record_type_label(record: &MedicalRecord) -> &'static str {
    use cac_types::RecordType;
    match record.record_type {
        RecordType::FirstVisit => "FirstVisit",
        RecordType::AnnualCheck => "AnnualCheck",
        RecordType::Vaccine => "Vaccine",
        RecordType::Illness => "Illness",
        RecordType::Urgency => "Urgency",
        RecordType::Other => "Other",
    }
}

/// Computes and produces the detached `vetSignature` for a newly
/// created record, loading the attending vet's private key through
/// the vault.
pub fn sign_record(
    vault: &KeyVault,
    vet_id: i64,
    vet_private_key_path: &Path,
    vet_password: &str,
    record: &MedicalRecord,
) -> Result<String, CryptoError> {
    let handle = vault.load_private(vet_id, Role::Vet, vet_private_key_path, vet_password)?;
    Signer::sign(&handle, signable_string(record).as_bytes())
}
