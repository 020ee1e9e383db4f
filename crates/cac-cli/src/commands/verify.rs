//! `cac verify`: recomputes a stored certificate's hash and checks both
//! detached signatures against the referenced principals' public keys
//! (spec invariants 2 and 3, §4.6 "Verifiers recompute `h`...").

use std::path::PathBuf;

use anyhow::{Context, Result};
use cac_crypto::{sha256_hex, PublicKey, Signer};
use cac_types::{Certificate, CertificateView};
use clap::Args;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Path to the certificate JSON, as produced by `cac issue` (either
    /// a bare `Certificate` or a full `CertificateView`).
    #[arg(long)]
    certificate: PathBuf,

    /// Path to the generating vet's public key PEM.
    #[arg(long)]
    vet_public_key: PathBuf,

    /// Path to the issuing clinic's public key PEM.
    #[arg(long)]
    clinic_public_key: PathBuf,
}

#[derive(Debug, Serialize)]
struct VerifyReport {
    hash_matches: bool,
    vet_signature_valid: bool,
    clinic_signature_valid: bool,
    overall_valid: bool,
}

pub fn run(args: VerifyArgs) -> Result<()> {
    let certificate = read_certificate(&args.certificate)?;

    let recomputed_hash = sha256_hex(certificate.payload_json.as_bytes());
    let hash_matches = recomputed_hash == certificate.payload_hash;

    let vet_key = load_public_key(&args.vet_public_key)?;
    let clinic_key = load_public_key(&args.clinic_public_key)?;

    let vet_signature_valid = Signer::verify(
        &vet_key,
        certificate.payload_hash.as_bytes(),
        &certificate.vet_signature,
    );
    let clinic_signature_valid = Signer::verify(
        &clinic_key,
        certificate.payload_hash.as_bytes(),
        &certificate.clinic_signature,
    );

    let report = VerifyReport {
        hash_matches,
        vet_signature_valid,
        clinic_signature_valid,
        overall_valid: hash_matches && vet_signature_valid && clinic_signature_valid,
    };

    println!("{}", serde_json::to_string_pretty(&report)?);

    if !report.overall_valid {
        anyhow::bail!("certificate {} failed verification", certificate.certificate_number);
    }
    Ok(())
}

fn read_certificate(path: &PathBuf) -> Result<Certificate> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;

    if let Ok(view) = serde_json::from_str::<CertificateView>(&text) {
        return Ok(view.certificate);
    }
    serde_json::from_str::<Certificate>(&text)
        .with_context(|| format!("{} is neither a Certificate nor a CertificateView", path.display()))
}

fn load_public_key(path: &PathBuf) -> Result<PublicKey> {
    let pem = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    PublicKey::from_pem(&pem).map_err(|e| anyhow::anyhow!("invalid public key at {}: {e}", path.display()))
}
