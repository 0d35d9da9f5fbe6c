//! Client and write/verify tooling for an HTTP table store.
//!
//! The store exposes `POST /tables/{table}` and `GET /tables/{table}`
//! (plus `POST /frame` for CSV frames). This crate only drives it.

pub mod client;
pub mod error;
pub mod frame;
pub mod harness;
pub mod load;
pub mod record;

pub use client::{TablesClient, UUID_HEADER, WriteOutcome};
pub use error::ClientError;
pub use frame::{CsvFrame, FrameRng, generate_frame};
pub use harness::{
    BatchReport, ReadPolicy, VerifyReport, generate_batch, read_back, run_verify, verify_count,
    write_batch_concurrently, write_sequential,
};
pub use load::{LoadPlan, LoadReport, run_load};
pub use record::{Record, TableName};
