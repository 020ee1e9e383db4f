//! # Certificate Authority Core — Issuance Orchestration
//!
//! Ties `cac-crypto`'s key custody and signing together with the
//! collaborator contracts from `cac-types` to implement the full
//! issuance pipeline: evidence selection (C5), canonical payload
//! construction (C4), issuance orchestration (C6), and record signing
//! on creation (C9).
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::indexing_slicing
    )
)]

pub mod evidence;
pub mod payload_builder;
pub mod record_sign;
pub mod service;

pub use service::{CertificateService, IssueRequest};
