//! Picks the unique valid Rabies vaccine record and the most recent
//! qualifying annual checkup for a pet.

use chrono::{Months, NaiveDate};

use cac_types::{CacError, MedicalRecord, RecordStore};

/// Selects the rabies-vaccine record and the annual-checkup record
/// that ground a certificate's eligibility. `today` is threaded
/// through explicitly rather than read from the wall clock, keeping
/// the selection deterministic under test.
pub fn select(
    records: &dyn RecordStore,
    pet_id: i64,
    today: NaiveDate,
) -> Result<(MedicalRecord, MedicalRecord), CacError> {
    let rabies = select_rabies(records, pet_id, today)?;
    let checkup = select_checkup(records, pet_id, today)?;
    Ok((rabies, checkup))
}

fn select_rabies(
    records: &dyn RecordStore,
    pet_id: i64,
    today: NaiveDate,
) -> Result<MedicalRecord, CacError> {
    let mut candidates = records.find_signed_rabies_desc(pet_id)?;
    sort_newest_first_highest_id(&mut candidates);

    for record in &candidates {
        let Some(vaccine) = record.vaccine.as_ref() else {
            log::warn!("record {} has no vaccine block, skipping", record.id);
            continue;
        };
        if vaccine.validity_years < 0 {
            log::warn!(
                "record {} has negative validityYears, skipping",
                record.id
            );
            continue;
        }
        let Some(expiry) = expiry_date(record.created_at.date_naive(), vaccine.validity_years)
        else {
            log::warn!(
                "record {} has a validity period that overflows the calendar, skipping",
                record.id
            );
            continue;
        };
        if expiry >= today {
            return Ok(record.clone());
        }
    }

    Err(CacError::MissingValidRabiesVaccine(pet_id))
}

fn select_checkup(
    records: &dyn RecordStore,
    pet_id: i64,
    today: NaiveDate,
) -> Result<MedicalRecord, CacError> {
    let cutoff = today
        .checked_sub_months(Months::new(12))
        .unwrap_or(NaiveDate::MIN);

    let mut candidates = records.find_signed_checkups_since_desc(pet_id, cutoff)?;
    sort_newest_first_highest_id(&mut candidates);

    candidates
        .into_iter()
        .next()
        .ok_or(CacError::MissingRecentCheckup(pet_id, cutoff))
}

/// Ties on `createdAt` are broken by picking the highest id, enforced
/// here rather than trusted to the store, since `RecordStore`
/// implementations are outside this crate's control.
fn sort_newest_first_highest_id(records: &mut [MedicalRecord]) {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}

fn expiry_date(vaccination_date: NaiveDate, validity_years: i64) -> Option<NaiveDate> {
    let months = u32::try_from(validity_years).ok()?.checked_mul(12)?;
    vaccination_date.checked_add_months(Months::new(months))
}
