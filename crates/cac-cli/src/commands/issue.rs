//! `cac issue`: runs the full C6 issuance pipeline against the demo pet
//! fixture (`cac_test_utils::fixtures::SampleFixtures`), generating
//! fresh vet/clinic keypairs on the fly so the command works with no
//! prior setup.

use std::path::PathBuf;

use anyhow::{Context, Result};
use cac_core::{CertificateService, IssueRequest};
use cac_crypto::vault::{KeyVault, VaultConfig};
use cac_test_utils::fixtures::SampleFixtures;
use cac_test_utils::keys::PrincipalKeyPair;
use cac_test_utils::{
    InMemoryCertificateStore, InMemoryDirectoryService, InMemoryEventPublisher,
    InMemoryKeyResolver, InMemoryRecordStore,
};
use cac_types::{KeyResolver, Role};
use chrono::Utc;
use clap::Args;

use super::{DEMO_CLINIC_PASSPHRASE, DEMO_VET_PASSPHRASE};

#[derive(Args, Debug)]
pub struct IssueArgs {
    /// The certificate number to mint (must be unique).
    #[arg(long)]
    certificate_number: String,

    /// Directory to write generated demo keys and the resulting
    /// certificate JSON into. Defaults to a fresh temporary directory.
    #[arg(long)]
    base_dir: Option<PathBuf>,

    /// Where to write the issued certificate view as JSON. Prints to
    /// stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

pub fn run(args: IssueArgs) -> Result<()> {
    let scratch;
    let base_dir = match &args.base_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).context("creating --base-dir")?;
            dir.clone()
        }
        None => {
            scratch = tempfile::tempdir().context("creating scratch key directory")?;
            scratch.path().to_path_buf()
        }
    };

    let key_resolver = InMemoryKeyResolver::new(&base_dir);
    generate_demo_keys(&key_resolver, &base_dir)?;

    let pet = SampleFixtures::pet();
    let vet = SampleFixtures::vet();
    let clinic = SampleFixtures::clinic();
    let records = InMemoryRecordStore::new(vec![
        SampleFixtures::rabies_record(101, 30, 1),
        SampleFixtures::checkup_record(102, 60),
    ]);
    let certificates = InMemoryCertificateStore::new();
    let directory = InMemoryDirectoryService::new(vec![pet], vec![vet], vec![clinic]);
    let vault = KeyVault::new(VaultConfig::new(&base_dir));
    let events = InMemoryEventPublisher::new();

    let service = CertificateService::new(
        &records,
        &certificates,
        &directory,
        &key_resolver,
        &vault,
        &events,
    );

    let request = IssueRequest {
        pet_id: 42,
        certificate_number: args.certificate_number,
        vet_private_key_password: DEMO_VET_PASSPHRASE.to_string(),
        clinic_private_key_password: DEMO_CLINIC_PASSPHRASE.to_string(),
    };

    let view = service
        .issue(request, 11, Utc::now().date_naive())
        .map_err(|e| anyhow::anyhow!("issuance failed: {e}"))?;

    log::info!(
        "published {} event(s); demo keys live under {}",
        events.published().len(),
        base_dir.display()
    );

    let json = serde_json::to_string_pretty(&view).context("serializing certificate view")?;
    match args.out {
        Some(path) => std::fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?,
        None => println!("{json}"),
    }

    Ok(())
}

fn generate_demo_keys(resolver: &InMemoryKeyResolver, base_dir: &std::path::Path) -> Result<()> {
    write_principal_keys(resolver, base_dir, 11, Role::Vet, DEMO_VET_PASSPHRASE)?;
    write_principal_keys(resolver, base_dir, 1, Role::Clinic, DEMO_CLINIC_PASSPHRASE)?;
    Ok(())
}

fn write_principal_keys(
    resolver: &InMemoryKeyResolver,
    base_dir: &std::path::Path,
    principal_id: i64,
    role: Role,
    passphrase: &str,
) -> Result<()> {
    let pair = PrincipalKeyPair::generate(passphrase);

    let private_path = resolver.absolute_path_of(&resolver.private_key_path_of(principal_id, role));
    std::fs::write(&private_path, pair.encrypted_private_pem)
        .with_context(|| format!("writing {}", private_path.display()))?;

    let public_relative = match role {
        Role::Vet => format!("vet-{principal_id}.pub.pem"),
        Role::Clinic => format!("clinic-{principal_id}.pub.pem"),
    };
    let public_path = base_dir.join(public_relative);
    std::fs::write(&public_path, pair.public_pem)
        .with_context(|| format!("writing {}", public_path.display()))?;

    Ok(())
}
