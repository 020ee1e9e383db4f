//! C7 QrCodec: encodes and decodes the HC1 transport string (spec
//! §4.7):
//!
//! `"HC1:" + Base45(Zlib(COSE_Sign(CBOR(payload))))`
//!
//! The CBOR/COSE structure is informational for offline display; trust
//! is carried entirely by the two detached RSA signatures over the
//! canonical JSON hash. Decoding therefore hands
//! the caller the parsed [`CanonicalPayload`] plus the two raw
//! signature strings and lets them re-run [`cac_crypto`]-style
//! verification themselves — this crate depends only on `cac-types`.

use std::io::{Read, Write};

use cac_types::CanonicalPayload;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use serde_cbor::Value as Cbor;

pub use cac_types::QrError;

const HC1_PREFIX: &str = "HC1:";

/// Fixed COSE algorithm label for this closed trust domain (spec
/// §4.10 / §9(c)): RSASSA-PKCS1-v1_5 with SHA-256 has no entry in the
/// standard COSE algorithm registry, so a private-use identifier is
/// registered and kept stable across every certificate this system
/// issues rather than misrepresenting the scheme as `PS256`.
const COSE_ALG_LABEL: i128 = 1;
const COSE_ALG_RS256_PRIVATE_USE: i128 = -65537;

/// The result of decoding an HC1 string: the canonical payload plus
/// the two detached signatures, still base64-encoded exactly as
/// stored on the `Certificate` (decoding pipeline).
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedCertificate {
    pub payload: CanonicalPayload,
    /// Byte-identical to the JSON the issuer hashed, reconstructed
    /// from the typed CBOR payload (see module docs).
    pub payload_json: String,
    pub vet_signature: String,
    pub clinic_signature: String,
}

fn cose_signature_entry(raw_signature: &[u8]) -> Cbor {
    Cbor::Array(vec![
        Cbor::Bytes(protected_header_bytes()),
        Cbor::Map(Default::default()),
        Cbor::Bytes(raw_signature.to_vec()),
    ])
}

fn protected_header_bytes() -> Vec<u8> {
    let mut map = std::collections::BTreeMap::new();
    map.insert(
        Cbor::Integer(COSE_ALG_LABEL),
        Cbor::Integer(COSE_ALG_RS256_PRIVATE_USE),
    );
    serde_cbor::to_vec(&Cbor::Map(map)).unwrap_or_default()
}

/// Encodes a certificate's canonical payload and its two detached,
/// base64-encoded signatures into an `"HC1:..."` transport string.
/// Panics if `payload` cannot be serialized to CBOR — that is a
/// programming error, never a runtime condition for well-formed
/// `CanonicalPayload` values.
pub fn encode(payload: &CanonicalPayload, vet_signature_b64: &str, clinic_signature_b64: &str) -> String {
    let payload_cbor =
        serde_cbor::to_vec(payload).expect("CanonicalPayload must always be CBOR-serializable");

    let vet_raw = decode_base64_or_panic(vet_signature_b64);
    let clinic_raw = decode_base64_or_panic(clinic_signature_b64);

    let cose_sign = Cbor::Array(vec![
        Cbor::Bytes(protected_header_bytes()),
        Cbor::Map(Default::default()),
        Cbor::Bytes(payload_cbor),
        Cbor::Array(vec![
            cose_signature_entry(&vet_raw),
            cose_signature_entry(&clinic_raw),
        ]),
    ]);

    let cose_bytes =
        serde_cbor::to_vec(&cose_sign).expect("COSE_Sign structure must always serialize");

    let compressed = zlib_deflate(&cose_bytes);
    let base45 = base45::encode(&compressed);

    format!("{HC1_PREFIX}{base45}")
}

fn decode_base64_or_panic(value: &str) -> Vec<u8> {
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine;
    BASE64
        .decode(value)
        .expect("signatures passed to encode must be valid base64")
}

fn zlib_deflate(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    // Writing to an in-memory Vec-backed encoder cannot fail.
    encoder
        .write_all(bytes)
        .expect("in-memory zlib encode cannot fail");
    encoder.finish().expect("in-memory zlib encode cannot fail")
}

/// Decodes an `"HC1:..."` transport string (decoding
/// pipeline). Every malformed-input case is a recoverable `QrError`,
/// never a panic.
pub fn decode(hc1: &str) -> Result<DecodedCertificate, QrError> {
    let base45_part = hc1.strip_prefix(HC1_PREFIX).ok_or_else(|| {
        log::warn!("HC1 decode rejected: missing \"HC1:\" prefix");
        QrError::MalformedQrInput("missing HC1: prefix".to_string())
    })?;

    let compressed = base45::decode(base45_part).map_err(|e| {
        log::warn!("HC1 decode rejected: base45 decode failed: {e}");
        QrError::Base45DecodeError(e.to_string())
    })?;

    let cose_bytes = zlib_inflate(&compressed)?;

    let cose_sign: Cbor = serde_cbor::from_slice(&cose_bytes).map_err(|e| {
        log::warn!("HC1 decode rejected: top-level COSE_Sign CBOR parse failed: {e}");
        QrError::CborParseError(format!("top-level COSE_Sign: {e}"))
    })?;

    let elements = match cose_sign {
        Cbor::Array(items) if items.len() == 4 => items,
        _ => {
            return Err(QrError::CborParseError(
                "expected a 4-element COSE_Sign array".to_string(),
            ))
        }
    };

    let payload_bytes = match &elements[2] {
        Cbor::Bytes(b) => b.clone(),
        _ => {
            return Err(QrError::CborParseError(
                "COSE_Sign payload must be a byte string".to_string(),
            ))
        }
    };

    let payload: CanonicalPayload = serde_cbor::from_slice(&payload_bytes)
        .map_err(|e| QrError::CborParseError(format!("certificate payload: {e}")))?;

    let payload_json = serde_json::to_string(&payload)
        .map_err(|e| QrError::CborParseError(format!("re-serializing payload to JSON: {e}")))?;

    let signatures = match &elements[3] {
        Cbor::Array(items) if items.len() == 2 => items,
        _ => {
            return Err(QrError::CborParseError(
                "expected exactly two COSE signature structures".to_string(),
            ))
        }
    };

    let vet_signature = extract_signature_b64(&signatures[0])?;
    let clinic_signature = extract_signature_b64(&signatures[1])?;

    Ok(DecodedCertificate {
        payload,
        payload_json,
        vet_signature,
        clinic_signature,
    })
}

fn extract_signature_b64(value: &Cbor) -> Result<String, QrError> {
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine;

    let Cbor::Array(fields) = value else {
        return Err(QrError::CborParseError(
            "COSE signature structure must be an array".to_string(),
        ));
    };
    let Some(Cbor::Bytes(raw)) = fields.get(2) else {
        return Err(QrError::CborParseError(
            "COSE signature structure missing signature bytes".to_string(),
        ));
    };
    Ok(BASE64.encode(raw))
}

fn zlib_inflate(bytes: &[u8]) -> Result<Vec<u8>, QrError> {
    let mut decoder = ZlibDecoder::new(bytes);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out).map_err(|e| {
        log::warn!("HC1 decode rejected: zlib inflate failed: {e}");
        QrError::InflateError(e.to_string())
    })?;
    Ok(out)
}
