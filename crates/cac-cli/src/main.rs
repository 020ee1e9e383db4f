//! # Certificate Authority Core CLI
//!
//! Operator-facing binary wired to the in-memory demo stores from
//! `cac-test-utils`. A thin composition layer over the library crates
//! rather than a reimplementation of them.
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::indexing_slicing
    )
)]

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::*;

#[derive(Parser, Debug)]
#[command(
    name = "cac",
    version,
    about = "Operator CLI for the pet Certificate Authority Core.",
    long_about = "Issues, verifies, and transports pet vaccination certificates against the in-memory demo stores. Not a production deployment tool — see cac-core/cac-crypto/cac-qr/cac-tokens for the library crates."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Issue a certificate for the demo pet against freshly generated vet/clinic keys.
    Issue(issue::IssueArgs),

    /// Verify a previously issued certificate's hash and both signatures.
    Verify(verify::VerifyArgs),

    /// Encode a certificate's canonical payload into an HC1 QR transport string.
    EncodeQr(encode_qr::EncodeQrArgs),

    /// Decode an HC1 QR transport string back into its payload and signatures.
    DecodeQr(decode_qr::DecodeQrArgs),

    /// Mint a short-lived delegated pet-records read token.
    MintToken(mint_token::MintTokenArgs),

    /// Validate a delegated token and list the pet's signed records.
    ReadDelegated(read_delegated::ReadDelegatedArgs),
}

fn main() -> Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Issue(args) => issue::run(args),
        Commands::Verify(args) => verify::run(args),
        Commands::EncodeQr(args) => encode_qr::run(args),
        Commands::DecodeQr(args) => decode_qr::run(args),
        Commands::MintToken(args) => mint_token::run(args),
        Commands::ReadDelegated(args) => read_delegated::run(args),
    }
}
