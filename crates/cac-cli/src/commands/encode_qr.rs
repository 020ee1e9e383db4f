//! `cac encode-qr`: wraps a certificate's canonical payload and both
//! detached signatures into an `"HC1:..."` transport string (spec
//! §4.7 encoding pipeline).

use std::path::PathBuf;

use anyhow::{Context, Result};
use cac_types::{CanonicalPayload, Certificate, CertificateView};
use clap::Args;

#[derive(Args, Debug)]
pub struct EncodeQrArgs {
    /// Path to the certificate JSON, as produced by `cac issue`.
    #[arg(long)]
    certificate: PathBuf,
}

pub fn run(args: EncodeQrArgs) -> Result<()> {
    let text = std::fs::read_to_string(&args.certificate)
        .with_context(|| format!("reading {}", args.certificate.display()))?;

    let certificate = if let Ok(view) = serde_json::from_str::<CertificateView>(&text) {
        view.certificate
    } else {
        serde_json::from_str::<Certificate>(&text).with_context(|| {
            format!(
                "{} is neither a Certificate nor a CertificateView",
                args.certificate.display()
            )
        })?
    };

    let payload: CanonicalPayload = serde_json::from_str(&certificate.payload_json)
        .context("payload_json did not parse as a CanonicalPayload")?;

    let hc1 = cac_qr::encode(&payload, &certificate.vet_signature, &certificate.clinic_signature);
    println!("{hc1}");
    Ok(())
}
