//! `cac read-delegated`: validates a delegated access token and lists
//! the claimed pet's signed records ("Once validated, the
//! caller may read only records where `vetSignature` is non-empty for
//! the claimed petId.").

use anyhow::Result;
use cac_test_utils::fixtures::SampleFixtures;
use cac_test_utils::InMemoryRecordStore;
use cac_tokens::DelegatedAccessTokens;
use cac_types::RecordStore;
use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct ReadDelegatedArgs {
    /// The delegated access token to validate.
    #[arg(long)]
    token: String,

    /// HMAC secret the token was signed with.
    #[arg(long, default_value = "demo-delegated-token-secret")]
    secret: String,
}

#[derive(Debug, Serialize)]
struct AccessibleRecord {
    id: i64,
    record_type: String,
    created_at: String,
}

pub fn run(args: ReadDelegatedArgs) -> Result<()> {
    let tokens = DelegatedAccessTokens::new(args.secret.into_bytes());
    let pet_id = tokens
        .validate(&args.token)
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    // Demo-only: the same fixed fixture the `issue` command mints
    // against. A real deployment resolves records through its own
    // RecordStore, not this in-memory double.
    let store = InMemoryRecordStore::new(vec![
        SampleFixtures::rabies_record(101, 30, 1),
        SampleFixtures::checkup_record(102, 60),
    ]);

    let far_future_cutoff = NaiveDate::from_ymd_opt(1, 1, 1).unwrap_or(NaiveDate::MIN);
    let mut accessible: Vec<AccessibleRecord> = store
        .find_signed_rabies_desc(pet_id)?
        .into_iter()
        .chain(store.find_signed_checkups_since_desc(pet_id, far_future_cutoff)?)
        .map(|r| AccessibleRecord {
            id: r.id,
            record_type: format!("{:?}", r.record_type),
            created_at: r.created_at.to_rfc3339(),
        })
        .collect();
    accessible.sort_by_key(|r| r.id);

    println!("petId={pet_id}");
    println!("{}", serde_json::to_string_pretty(&accessible)?);
    Ok(())
}
