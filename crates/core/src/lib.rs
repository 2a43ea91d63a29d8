//! # Backfill Core
//!
//! Drives a LIMS HTTP API to backfill test results for one patient's assignments.
//!
//! This crate contains the run itself and everything it needs:
//! - [`BackfillConfig`]: settings resolved once at startup
//! - [`LimsClient`]: the single reusable HTTP client
//! - [`Backfiller`]: the linear pass over assignments
//! - [`BackfillReport`]: per-assignment outcomes and their console lines
//!
//! **No process concerns**: argument parsing, `.env` loading, logging setup and exit codes belong
//! in the `lims-backfill` binary. Wire models live in `lims-types`.

pub mod backfill;
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod outcome;

pub use backfill::Backfiller;
pub use client::{LimsClient, SessionToken, SubmitResponse};
pub use config::{BackfillConfig, Credentials};
pub use error::{BackfillError, BackfillResult};
pub use outcome::{AssignmentOutcome, AssignmentReport, BackfillReport};
