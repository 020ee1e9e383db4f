use super::*;
use rand::rngs::OsRng;
use rsa::RsaPrivateKey;

const BITS: usize = 2048;

fn test_keypair() -> PrivateKeyHandle {
    let key = RsaPrivateKey::new(&mut OsRng, BITS).expect("key generation");
    PrivateKeyHandle::from_rsa(key)
}

#[test]
fn sign_then_verify_succeeds() {
    let handle = test_keypair();
    let message = b"rabies vaccine certificate digest";

    let signature = Signer::sign(&handle, message).expect("sign");
    let public_key = handle.public_key();

    assert!(Signer::verify(&public_key, message, &signature));
}

#[test]
fn signing_is_deterministic() {
    let handle = test_keypair();
    let message = b"same message every time";

    let sig_a = Signer::sign(&handle, message).expect("sign a");
    let sig_b = Signer::sign(&handle, message).expect("sign b");

    assert_eq!(sig_a, sig_b);
}

#[test]
fn verify_rejects_wrong_key() {
    let handle_a = test_keypair();
    let handle_b = test_keypair();
    let message = b"Test message";

    let signature = Signer::sign(&handle_a, message).expect("sign");
    assert!(!Signer::verify(&handle_b.public_key(), message, &signature));
}

#[test]
fn verify_rejects_tampered_message() {
    let handle = test_keypair();
    let message = b"Original message";
    let tampered = b"Tampered message!";

    let signature = Signer::sign(&handle, message).expect("sign");
    let public_key = handle.public_key();

    assert!(Signer::verify(&public_key, message, &signature));
    assert!(!Signer::verify(&public_key, tampered, &signature));
}

#[test]
fn verify_is_total_on_garbage_input() {
    let handle = test_keypair();
    let public_key = handle.public_key();

    assert!(!Signer::verify(&public_key, b"data", "not-valid-base64!!"));
    assert!(!Signer::verify(&public_key, b"data", ""));
}

#[test]
fn pem_roundtrip_preserves_verification() {
    let handle = test_keypair();
    let message = b"pem roundtrip";
    let signature = Signer::sign(&handle, message).expect("sign");

    let pem = handle.public_key().to_pem().expect("encode pem");
    let reloaded = PublicKey::from_pem(&pem).expect("decode pem");

    assert!(Signer::verify(&reloaded, message, &signature));
}
