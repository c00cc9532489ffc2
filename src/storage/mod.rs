//! # Chunked File Storage
//!
//! Splits arbitrary-length byte streams into fixed-size chunk records and a
//! final file-summary record, persisted through a pluggable storage sink.
//!
//! ## Components
//! - **Types**: the `Chunk` and `FileRecord` persistence records
//! - **Sink**: the capability seam storage backends implement
//! - **Id**: upload identifier generation
//! - **Upload**: the chunked upload stream state machine
//! - **Bucket**: configuration-bound stream construction
//! - **Memory**: in-process reference sink for tests and tooling
//! - **Reassemble**: invariant-checking reconstruction of uploaded bytes
//!
//! ## Upload States
//! ```text
//!                 close(), file record acked
//! Accumulating ──────────────────────────────▶ Closed
//!      │
//!      │ abort(), or any sink failure
//!      ▼
//!   Aborted
//! ```
//! Chunk flushes happen inside `write` and `close` without leaving
//! `Accumulating`. Both `Closed` and `Aborted` are terminal; further writes
//! fail with `AlreadyClosed`.
//!
//! ## Storage Invariants
//! - Chunk `n` values for one upload form the dense sequence `0..k`
//! - Concatenating chunk data by ascending `n` reproduces the uploaded bytes
//! - Every chunk except possibly the last is exactly `chunk_size` long
//! - A file record exists if and only if its upload completed; chunks without
//!   one are orphans awaiting caller-side cleanup

pub mod bucket;
pub mod id;
pub mod memory;
pub mod reassemble;
pub mod sink;
pub mod types;
pub mod upload;
