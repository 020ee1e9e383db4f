//! Test fixtures for reproducible tests.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use cac_types::{ClinicSummary, MedicalRecord, Pet, PetStatus, RecordType, Vaccine, VetSummary};
use chrono::{DateTime, Duration, Utc};

/// Test fixture manager for golden files (e.g. recorded HC1 strings).
pub struct Fixtures {
    /// Base directory for fixtures
    base_dir: PathBuf,
}

impl Fixtures {
    /// Create a new fixtures manager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> io::Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    /// Get a fixture file path
    pub fn path<P: AsRef<Path>>(&self, relative_path: P) -> PathBuf {
        self.base_dir.join(relative_path)
    }

    /// Read a fixture file
    pub fn read<P: AsRef<Path>>(&self, relative_path: P) -> io::Result<Vec<u8>> {
        let path = self.path(relative_path);
        fs::read(path)
    }

    /// Read a fixture file as a string
    pub fn read_string<P: AsRef<Path>>(&self, relative_path: P) -> io::Result<String> {
        let path = self.path(relative_path);
        fs::read_to_string(path)
    }

    /// Write data to a fixture file
    pub fn write<P: AsRef<Path>, C: AsRef<[u8]>>(
        &self,
        relative_path: P,
        contents: C,
    ) -> io::Result<()> {
        let path = self.path(relative_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)
    }

    /// Create a temporary fixture directory
    pub fn create_dir<P: AsRef<Path>>(&self, relative_path: P) -> io::Result<PathBuf> {
        let path = self.path(relative_path);
        fs::create_dir_all(&path)?;
        Ok(path)
    }

    /// Check if a fixture file exists
    pub fn exists<P: AsRef<Path>>(&self, relative_path: P) -> bool {
        self.path(relative_path).exists()
    }

    /// Remove a fixture file or directory
    pub fn remove<P: AsRef<Path>>(&self, relative_path: P) -> io::Result<()> {
        let path = self.path(relative_path);
        if path.is_dir() {
            fs::remove_dir_all(path)
        } else {
            fs::remove_file(path)
        }
    }
}

/// Sample domain objects matching the seed scenarios in the testable
/// properties section: Pet P#42 (Active, attended by Vet V#11 of
/// Clinic K#1), a signed Rabies vaccine record, and a signed annual
/// checkup.
pub struct SampleFixtures;

impl SampleFixtures {
    pub fn pet() -> Pet {
        Pet {
            id: 42,
            owner_id: 7,
            name: "Rex".to_string(),
            species: "dog".to_string(),
            breed: "Labrador".to_string(),
            microchip: "982000123456789".to_string(),
            birth_date: chrono::NaiveDate::from_ymd_opt(2020, 5, 1),
            status: PetStatus::Active,
            last_eu_entry_date: None,
            last_eu_exit_date: None,
            attending_vet_id: 11,
        }
    }

    pub fn vet() -> VetSummary {
        VetSummary {
            id: 11,
            name: "Dr. Ana Ruiz".to_string(),
            clinic_id: 1,
        }
    }

    pub fn clinic() -> ClinicSummary {
        ClinicSummary {
            id: 1,
            name: "Clinica Central".to_string(),
            country: "ES".to_string(),
        }
    }

    /// A signed rabies-vaccine record created `days_ago` days in the
    /// past, valid for `validity_years`.
    pub fn rabies_record(id: i64, days_ago: i64, validity_years: i64) -> MedicalRecord {
        let created_at = days_before_now(days_ago);
        MedicalRecord {
            id,
            pet_id: 42,
            creator_user_id: 11,
            clinic_id: 1,
            record_type: RecordType::Vaccine,
            created_at,
            description: None,
            vaccine: Some(Vaccine {
                name: "Rabisin".to_string(),
                validity_years,
                laboratory: "Boehringer".to_string(),
                batch_number: "BX-777".to_string(),
                is_rabies_vaccine: true,
                vaccination_date: created_at.date_naive(),
            }),
            vet_signature: Some("fixture-signature".to_string()),
            immutable: false,
        }
    }

    /// A signed annual-checkup record created `days_ago` days in the
    /// past.
    pub fn checkup_record(id: i64, days_ago: i64) -> MedicalRecord {
        MedicalRecord {
            id,
            pet_id: 42,
            creator_user_id: 11,
            clinic_id: 1,
            record_type: RecordType::AnnualCheck,
            created_at: days_before_now(days_ago),
            description: Some("Routine annual checkup".to_string()),
            vaccine: None,
            vet_signature: Some("fixture-signature".to_string()),
            immutable: false,
        }
    }
}

fn days_before_now(days: i64) -> DateTime<Utc> {
    Utc::now() - Duration::days(days)
}
