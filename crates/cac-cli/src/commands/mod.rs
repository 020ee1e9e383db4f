pub mod decode_qr;
pub mod encode_qr;
pub mod issue;
pub mod mint_token;
pub mod read_delegated;
pub mod verify;

/// Demo passphrases for the throwaway keypairs `issue` generates. Never
/// used for anything a real deployment would rely on — a production
/// `KeyResolver`/`KeyVault` pairing lives entirely outside CAC.
pub const DEMO_VET_PASSPHRASE: &str = "demo-vet-passphrase";
pub const DEMO_CLINIC_PASSPHRASE: &str = "demo-clinic-passphrase";
