//! `cac decode-qr`: the inverse of `encode-qr` — parses an `"HC1:..."`
//! string back into its canonical payload and two detached signatures
//! (decoding pipeline). Trust still rests with the caller
//! re-running `cac verify`-style signature checks; this command only
//! exposes what the transport envelope carried.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct DecodeQrArgs {
    /// The `"HC1:..."` transport string to decode.
    hc1: String,
}

#[derive(Debug, Serialize)]
struct DecodedReport {
    payload_json: String,
    vet_signature: String,
    clinic_signature: String,
}

pub fn run(args: DecodeQrArgs) -> Result<()> {
    let decoded =
        cac_qr::decode(&args.hc1).map_err(|e| anyhow::anyhow!("decode failed: {e}"))?;

    let report = DecodedReport {
        payload_json: decoded.payload_json,
        vet_signature: decoded.vet_signature,
        clinic_signature: decoded.clinic_signature,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
