// Path: crates/cac-core/tests/issuance_e2e.rs
//! End-to-end coverage of the §4.6 issuance state machine against real
//! RSA keys, real in-memory stores, and the QR/token crates — the
//! seed scenarios from(S1-S8).

use cac_core::{CertificateService, IssueRequest};
use cac_crypto::vault::{KeyVault, VaultConfig};
use cac_crypto::{sha256_hex, PublicKey, Signer};
use cac_test_utils::fixtures::SampleFixtures;
use cac_test_utils::keys::PrincipalKeyPair;
use cac_test_utils::{
    InMemoryCertificateStore, InMemoryDirectoryService, InMemoryEventPublisher,
    InMemoryKeyResolver, InMemoryRecordStore,
};
use cac_tokens::DelegatedAccessTokens;
use cac_types::{CacError, KeyResolver, Role};
use chrono::{Duration, NaiveDate, Utc};

const VET_PASSPHRASE: &str = "vet-passphrase";
const CLINIC_PASSPHRASE: &str = "clinic-passphrase";

/// Writes freshly generated demo keypairs for vet #11 and clinic #1
/// under `base_dir`, in the layout `InMemoryKeyResolver` expects.
fn write_demo_keys(resolver: &InMemoryKeyResolver, base_dir: &std::path::Path) {
    let _ = base_dir;
    for (id, role, passphrase) in [
        (11, Role::Vet, VET_PASSPHRASE),
        (1, Role::Clinic, CLINIC_PASSPHRASE),
    ] {
        let pair = PrincipalKeyPair::generate(passphrase);
        let private_path = resolver.absolute_path_of(&resolver.private_key_path_of(id, role));
        std::fs::write(&private_path, pair.encrypted_private_pem)
            .expect("write private key fixture");

        let public_relative = match role {
            Role::Vet => "vet-11.pub.pem",
            Role::Clinic => "clinic-1.pub.pem",
        };
        std::fs::write(base_dir.join(public_relative), pair.public_pem)
            .expect("write public key fixture");
    }
}

struct Harness {
    _scratch: tempfile::TempDir,
    key_resolver: InMemoryKeyResolver,
    vault: KeyVault,
    records: InMemoryRecordStore,
    certificates: InMemoryCertificateStore,
    directory: InMemoryDirectoryService,
    events: InMemoryEventPublisher,
}

impl Harness {
    fn new() -> Self {
        let scratch = tempfile::tempdir().expect("scratch dir");
        let key_resolver = InMemoryKeyResolver::new(scratch.path());
        write_demo_keys(&key_resolver, scratch.path());
        let vault = KeyVault::new(VaultConfig::new(scratch.path()));

        let records = InMemoryRecordStore::new(vec![
            SampleFixtures::rabies_record(101, 30, 1),
            SampleFixtures::checkup_record(102, 60),
        ]);
        let directory = InMemoryDirectoryService::new(
            vec![SampleFixtures::pet()],
            vec![SampleFixtures::vet()],
            vec![SampleFixtures::clinic()],
        );

        Self {
            _scratch: scratch,
            key_resolver,
            vault,
            records,
            certificates: InMemoryCertificateStore::new(),
            directory,
            events: InMemoryEventPublisher::new(),
        }
    }

    fn service(&self) -> CertificateService<'_> {
        CertificateService::new(
            &self.records,
            &self.certificates,
            &self.directory,
            &self.key_resolver,
            &self.vault,
            &self.events,
        )
    }

    fn issue(&self, certificate_number: &str) -> Result<cac_types::CertificateView, CacError> {
        self.service().issue(
            IssueRequest {
                pet_id: 42,
                certificate_number: certificate_number.to_string(),
                vet_private_key_password: VET_PASSPHRASE.to_string(),
                clinic_private_key_password: CLINIC_PASSPHRASE.to_string(),
            },
            11,
            Utc::now().date_naive(),
        )
    }

    fn vet_public_key(&self) -> PublicKey {
        let bytes = self.key_resolver.public_key_of(11, Role::Vet).expect("vet public key");
        PublicKey::from_pem(std::str::from_utf8(&bytes).expect("utf8 pem")).expect("parse pem")
    }

    fn clinic_public_key(&self) -> PublicKey {
        let bytes = self
            .key_resolver
            .public_key_of(1, Role::Clinic)
            .expect("clinic public key");
        PublicKey::from_pem(std::str::from_utf8(&bytes).expect("utf8 pem")).expect("parse pem")
    }
}

/// S1: a clean issuance marks the originating record immutable and
/// produces a certificate whose hash and both signatures verify
/// (spec invariants 1-3).
#[test]
fn s1_successful_issuance_produces_a_verifiable_double_signed_certificate() {
    let harness = Harness::new();
    let view = harness.issue("AHC-0001").expect("issuance should succeed");

    assert_eq!(view.certificate.medical_record_id, 101);
    assert_eq!(view.certificate.certificate_number, "AHC-0001");

    let record = harness
        .records
        .find_by_id(101)
        .expect("lookup")
        .expect("record exists");
    assert!(record.immutable, "originating record must become immutable");

    let recomputed_hash = sha256_hex(view.certificate.payload_json.as_bytes());
    assert_eq!(recomputed_hash, view.certificate.payload_hash);

    assert!(Signer::verify(
        &harness.vet_public_key(),
        view.certificate.payload_hash.as_bytes(),
        &view.certificate.vet_signature,
    ));
    assert!(Signer::verify(
        &harness.clinic_public_key(),
        view.certificate.payload_hash.as_bytes(),
        &view.certificate.clinic_signature,
    ));

    assert_eq!(harness.events.published().len(), 1);
    assert_eq!(harness.events.published()[0].cert_number, "AHC-0001");
}

/// S2: reissuing the exact same (record, certificateNumber) pair from
/// S1 violates both uniqueness constraints at once;pins the
/// certificate-number violation as the one that must surface.
#[test]
fn s2_duplicate_certificate_number_is_rejected() {
    let harness = Harness::new();
    harness.issue("AHC-0001").expect("first issuance succeeds");

    let err = harness.issue("AHC-0001").unwrap_err();
    assert!(matches!(
        err,
        CacError::CertificateNumberAlreadyExists(ref n) if n == "AHC-0001"
    ));
}

/// S3: a second issuance against the same record with a different
/// number is rejected as a per-record duplicate.
#[test]
fn s3_duplicate_per_record_is_rejected() {
    let harness = Harness::new();
    harness.issue("AHC-0001").expect("first issuance succeeds");

    let err = harness.issue("AHC-0002").unwrap_err();
    assert!(matches!(
        err,
        CacError::CertificateAlreadyExistsForRecord(101)
    ));
}

/// S4: a pet with no signed rabies record cannot be issued a
/// certificate.
#[test]
fn s4_missing_valid_rabies_vaccine_is_rejected() {
    let harness = Harness::new();
    // Replace the eligible record set with an unsigned rabies record.
    let records = InMemoryRecordStore::new(vec![{
        let mut r = SampleFixtures::rabies_record(201, 10, 1);
        r.vet_signature = None;
        r
    }]);
    let service = CertificateService::new(
        &records,
        &harness.certificates,
        &harness.directory,
        &harness.key_resolver,
        &harness.vault,
        &harness.events,
    );

    let err = service
        .issue(
            IssueRequest {
                pet_id: 42,
                certificate_number: "AHC-9999".to_string(),
                vet_private_key_password: VET_PASSPHRASE.to_string(),
                clinic_private_key_password: CLINIC_PASSPHRASE.to_string(),
            },
            11,
            Utc::now().date_naive(),
        )
        .unwrap_err();
    assert!(matches!(err, CacError::MissingValidRabiesVaccine(42)));
}

/// S6: a pet with a valid rabies record but no recent annual checkup
/// cannot be issued a certificate.
#[test]
fn s6_missing_recent_checkup_is_rejected() {
    let harness = Harness::new();
    let records = InMemoryRecordStore::new(vec![
        SampleFixtures::rabies_record(301, 10, 3),
        SampleFixtures::checkup_record(302, 400),
    ]);
    let service = CertificateService::new(
        &records,
        &harness.certificates,
        &harness.directory,
        &harness.key_resolver,
        &harness.vault,
        &harness.events,
    );

    let err = service
        .issue(
            IssueRequest {
                pet_id: 42,
                certificate_number: "AHC-7777".to_string(),
                vet_private_key_password: VET_PASSPHRASE.to_string(),
                clinic_private_key_password: CLINIC_PASSPHRASE.to_string(),
            },
            11,
            Utc::now().date_naive(),
        )
        .unwrap_err();
    assert!(matches!(err, CacError::MissingRecentCheckup(42, _)));
}

/// S7: the issued certificate's canonical payload survives the full
/// HC1 QR round-trip and both signatures still verify; tampering the
/// decoded payload breaks at least one verification.
#[test]
fn s7_qr_round_trip_preserves_signatures_and_detects_tampering() {
    let harness = Harness::new();
    let view = harness.issue("AHC-0001").expect("issuance should succeed");

    let payload: cac_types::CanonicalPayload =
        serde_json::from_str(&view.certificate.payload_json).expect("parse canonical payload");

    let hc1 = cac_qr::encode(
        &payload,
        &view.certificate.vet_signature,
        &view.certificate.clinic_signature,
    );
    assert!(hc1.starts_with("HC1:"));

    let decoded = cac_qr::decode(&hc1).expect("decode HC1 string");
    assert_eq!(decoded.payload_json, view.certificate.payload_json);

    let recomputed_hash = sha256_hex(decoded.payload_json.as_bytes());
    assert_eq!(recomputed_hash, view.certificate.payload_hash);
    assert!(Signer::verify(
        &harness.vet_public_key(),
        recomputed_hash.as_bytes(),
        &decoded.vet_signature,
    ));
    assert!(Signer::verify(
        &harness.clinic_public_key(),
        recomputed_hash.as_bytes(),
        &decoded.clinic_signature,
    ));

    let mut tampered_payload = decoded.payload.clone();
    tampered_payload.subject.pet_name = "Someone Else's Pet".to_string();
    let tampered_json = serde_json::to_string(&tampered_payload).expect("serialize tampered");
    let tampered_hash = sha256_hex(tampered_json.as_bytes());

    assert_ne!(tampered_hash, recomputed_hash);
    assert!(!Signer::verify(
        &harness.vet_public_key(),
        tampered_hash.as_bytes(),
        &decoded.vet_signature,
    ));
    assert!(!Signer::verify(
        &harness.clinic_public_key(),
        tampered_hash.as_bytes(),
        &decoded.clinic_signature,
    ));
}

/// S8: a delegated access token minted for the pet can be validated
/// within its lifetime and is rejected once expired.
#[test]
fn s8_delegated_token_lifecycle() {
    let tokens = DelegatedAccessTokens::new(b"server-held-secret".to_vec());

    let token = tokens.mint(42, Duration::hours(1));
    assert_eq!(tokens.validate(&token).expect("valid within lifetime"), 42);

    let now = Utc::now();
    let claims = serde_json::json!({
        "sub": "pet-records",
        "petId": 42,
        "iat": (now - Duration::hours(2)).timestamp(),
        "exp": (now - Duration::hours(1)).timestamp(),
    });
    let expired = jsonwebtoken::encode(
        &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(b"server-held-secret"),
    )
    .expect("encode expired token");
    assert!(tokens.validate(&expired).is_err());
}

/// Invariant 8's upper bound: requesting a cutoff date beyond the
/// calendar's representable range still resolves rather than panics
/// (defensive regression for `Months::new()` overflow in EvidenceSelector).
#[test]
fn far_future_today_does_not_panic_evidence_selection() {
    let harness = Harness::new();
    let far_future = NaiveDate::MAX;
    let result = harness.service().issue(
        IssueRequest {
            pet_id: 42,
            certificate_number: "AHC-FAR".to_string(),
            vet_private_key_password: VET_PASSPHRASE.to_string(),
            clinic_private_key_password: CLINIC_PASSPHRASE.to_string(),
        },
        11,
        far_future,
    );
    assert!(matches!(
        result,
        Err(CacError::MissingValidRabiesVaccine(42))
    ));
}
