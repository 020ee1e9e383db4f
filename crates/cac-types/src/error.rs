//! Error taxonomy for the Certificate Authority Core.
//!
//! Each enum covers one concern and implements [`ErrorCode`] so callers
//! get a stable, machine-readable identifier independent of the
//! `Display` message (which may carry interpolated, non-stable detail).

use chrono::NaiveDate;
use thiserror::Error;

/// A stable, machine-readable string code for an error variant.
pub trait ErrorCode {
    fn code(&self) -> &'static str;
}

/// Business-rule and orchestration errors raised by certificate
/// issuance (input-shape, not-found, eligibility, uniqueness,
/// immutability categories).
#[derive(Debug, Error)]
pub enum CacError {
    #[error("certificateNumber must not be blank")]
    CertificateNumberBlank,

    #[error("petId is required")]
    PetIdMissing,

    #[error("pet {0} not found")]
    PetNotFound(i64),

    #[error("pet {0} is not Active")]
    PetNotActive(i64),

    #[error("vet {0} not found")]
    VetNotFound(i64),

    #[error("clinic {0} not found")]
    ClinicNotFound(i64),

    #[error("medical record {0} not found")]
    RecordNotFound(i64),

    #[error("the caller is not authorized to issue for this pet/clinic")]
    Unauthorized,

    #[error("pet {0} has no valid rabies vaccine record")]
    MissingValidRabiesVaccine(i64),

    #[error("pet {0} has no annual checkup since {1}")]
    MissingRecentCheckup(i64, NaiveDate),

    #[error("certificate number {0} already exists")]
    CertificateNumberAlreadyExists(String),

    #[error("a certificate already exists for medical record {0}")]
    CertificateAlreadyExistsForRecord(i64),

    #[error("medical record {0} is immutable")]
    RecordImmutable(i64),

    /// Opaque failure surfaced to the caller when a crypto or
    /// persistence error aborts the issuance transaction. The real
    /// cause is logged internally and never echoed here.
    #[error("certificate issuance failed")]
    IssuanceFailed,
}

impl ErrorCode for CacError {
    fn code(&self) -> &'static str {
        match self {
            Self::CertificateNumberBlank => "CAC_CERTIFICATE_NUMBER_BLANK",
            Self::PetIdMissing => "CAC_PET_ID_MISSING",
            Self::PetNotFound(_) => "CAC_PET_NOT_FOUND",
            Self::PetNotActive(_) => "CAC_PET_NOT_ACTIVE",
            Self::VetNotFound(_) => "CAC_VET_NOT_FOUND",
            Self::ClinicNotFound(_) => "CAC_CLINIC_NOT_FOUND",
            Self::RecordNotFound(_) => "CAC_RECORD_NOT_FOUND",
            Self::Unauthorized => "CAC_UNAUTHORIZED",
            Self::MissingValidRabiesVaccine(_) => "CAC_MISSING_VALID_RABIES_VACCINE",
            Self::MissingRecentCheckup(_, _) => "CAC_MISSING_RECENT_CHECKUP",
            Self::CertificateNumberAlreadyExists(_) => "CAC_CERTIFICATE_NUMBER_ALREADY_EXISTS",
            Self::CertificateAlreadyExistsForRecord(_) => "CAC_CERTIFICATE_ALREADY_EXISTS_FOR_RECORD",
            Self::RecordImmutable(_) => "CAC_RECORD_IMMUTABLE",
            Self::IssuanceFailed => "CAC_ISSUANCE_FAILED",
        }
    }
}

/// Cryptographic errors (Crypto category).
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("key not found for principal")]
    KeyNotFound,

    #[error("key decryption failed")]
    KeyDecryptionFailed,

    #[error("key material is not in the expected format")]
    KeyFormatInvalid,

    #[error("signature generation failed: {0}")]
    SignatureGenerationFailed(String),

    #[error("signature verification failed")]
    SignatureVerificationFailed,

    #[error("payload serialization failed: {0}")]
    PayloadSerializationFailed(String),
}

impl ErrorCode for CryptoError {
    fn code(&self) -> &'static str {
        match self {
            Self::KeyNotFound => "CRYPTO_KEY_NOT_FOUND",
            Self::KeyDecryptionFailed => "CRYPTO_KEY_DECRYPTION_FAILED",
            Self::KeyFormatInvalid => "CRYPTO_KEY_FORMAT_INVALID",
            Self::SignatureGenerationFailed(_) => "CRYPTO_SIGNATURE_GENERATION_FAILED",
            Self::SignatureVerificationFailed => "CRYPTO_SIGNATURE_VERIFICATION_FAILED",
            Self::PayloadSerializationFailed(_) => "CRYPTO_PAYLOAD_SERIALIZATION_FAILED",
        }
    }
}

/// HC1/CBOR/COSE/Zlib/Base45 transport errors (Transport
/// category).
#[derive(Debug, Error)]
pub enum QrError {
    #[error("malformed QR input: {0}")]
    MalformedQrInput(String),

    #[error("base45 decode error: {0}")]
    Base45DecodeError(String),

    #[error("zlib inflate error: {0}")]
    InflateError(String),

    #[error("CBOR parse error: {0}")]
    CborParseError(String),
}

impl ErrorCode for QrError {
    fn code(&self) -> &'static str {
        match self {
            Self::MalformedQrInput(_) => "QR_MALFORMED_INPUT",
            Self::Base45DecodeError(_) => "QR_BASE45_DECODE_ERROR",
            Self::InflateError(_) => "QR_INFLATE_ERROR",
            Self::CborParseError(_) => "QR_CBOR_PARSE_ERROR",
        }
    }
}

/// Delegated-access-token errors.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("invalid temporary access token")]
    InvalidTemporaryToken,
}

impl ErrorCode for TokenError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidTemporaryToken => "TOKEN_INVALID_TEMPORARY_TOKEN",
        }
    }
}
