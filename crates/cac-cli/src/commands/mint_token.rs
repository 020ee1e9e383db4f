//! `cac mint-token`: mints a delegated, pet-scoped read token (spec
//! §4.8). Accepts either a simple `<n><unit>` duration (`1h`, `30m`,
//! `7d`) or a minimal ISO-8601 duration (`PT1H`, `PT30M`), matching the
//! `"PT1H"` form used inscenario S8.

use anyhow::{bail, Context, Result};
use cac_tokens::DelegatedAccessTokens;
use chrono::Duration;
use clap::Args;

#[derive(Args, Debug)]
pub struct MintTokenArgs {
    /// The pet to scope the token's read access to.
    #[arg(long)]
    pet_id: i64,

    /// Requested token lifetime, e.g. "1h", "30m", "7d", or "PT1H".
    /// Clamped to 7 days by `DelegatedAccessTokens::mint`.
    #[arg(long, default_value = "1h")]
    duration: String,

    /// HMAC secret the token is signed with. A real deployment holds
    /// this server-side only; defaults to a fixed demo value here.
    #[arg(long, default_value = "demo-delegated-token-secret")]
    secret: String,
}

pub fn run(args: MintTokenArgs) -> Result<()> {
    let duration = parse_duration(&args.duration).with_context(|| {
        format!("could not parse duration '{}' (expected e.g. '1h', '30m', '7d', or 'PT1H')", args.duration)
    })?;

    let tokens = DelegatedAccessTokens::new(args.secret.into_bytes());
    let token = tokens.mint(args.pet_id, duration);

    println!("{token}");
    Ok(())
}

/// Parses `"<n><unit>"` (`s`/`m`/`h`/`d`) or a minimal ISO-8601
/// duration of the form `"PT<n>H"`/`"PT<n>M"`/`"PT<n>S"`.
fn parse_duration(input: &str) -> Result<Duration> {
    if let Some(iso) = input.strip_prefix("PT") {
        return parse_iso8601_time_duration(iso);
    }

    let (digits, unit) = input.split_at(
        input
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(input.len()),
    );
    let amount: i64 = digits.parse::<i64>().context("expected a leading integer")?;

    match unit {
        "s" => Ok(Duration::seconds(amount)),
        "m" => Ok(Duration::minutes(amount)),
        "h" => Ok(Duration::hours(amount)),
        "d" => Ok(Duration::days(amount)),
        other => bail!("unknown duration unit '{other}'"),
    }
}

fn parse_iso8601_time_duration(iso: &str) -> Result<Duration> {
    let mut total = Duration::zero();
    let mut digits = String::new();

    for ch in iso.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }
        let amount: i64 = digits.parse::<i64>().context("expected a leading integer in ISO-8601 duration")?;
        digits.clear();
        total = total
            + match ch {
                'H' => Duration::hours(amount),
                'M' => Duration::minutes(amount),
                'S' => Duration::seconds(amount),
                other => bail!("unsupported ISO-8601 duration designator '{other}'"),
            };
    }

    if !digits.is_empty() {
        bail!("ISO-8601 duration '{iso}' is missing a trailing designator");
    }
    Ok(total)
}
