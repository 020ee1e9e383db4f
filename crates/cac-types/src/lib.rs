//! Core data structures, error taxonomy, and collaborator trait
//! contracts for the pet Certificate Authority Core.
//!
//! This crate has no crypto, storage, or transport dependencies of its
//! own — it is the shared vocabulary the other `cac-*` crates build
//! on, the same way `ioi-types` anchors the kernel's crate graph.

pub mod contracts;
pub mod error;
pub mod model;
pub mod payload;

pub use contracts::{CertificateStore, DirectoryService, EventPublisher, KeyResolver, RecordStore};
pub use error::{CacError, CryptoError, ErrorCode, QrError, TokenError};
pub use model::{
    Certificate, CertificateGenerated, CertificateView, ClinicSummary, MedicalRecord, Pet,
    PetStatus, PetSummary, RecordType, Role, Vaccine, VetSummary,
};
pub use payload::{CanonicalPayload, EventFacts, IssuerFacts, SubjectFacts, VaccineFacts, CERT_TYPE};
