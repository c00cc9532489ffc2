//! # docframe
//!
//! Wire-protocol framing and chunked document storage core for database
//! client drivers.
//!
//! The crate covers the two byte-level jobs a driver core owes its callers:
//! putting request/response messages on the wire and cutting large binary
//! uploads into fixed-size chunk records.
//!
//! ## Features
//!
//! - Length-prefixed message frames with a fixed 16-byte header
//! - Payload and batch sections delegating documents to pluggable codecs
//! - Incremental frame assembly through tokio-util's codec framework
//! - Chunked uploads closing with exactly one file record per stream
//! - In-memory record sink and a reassembly check for stored chunks
//!
//! ## Architecture
//!
//! Two independent pipelines share the error and configuration layers:
//!
//! ```text
//! Wire:    byte stream ⇄ MessageFramer ⇄ MessageCodec ⇄ Message
//! Storage: writes → ChunkedUploadStream → RecordSink → chunk + file records
//! ```
//!
//! ## Round Trip
//!
//! ```rust
//! use docframe::core::header::HEADER_SIZE;
//! use docframe::{Message, MessageCodec, MessageHeader, RawDocument, RawDocumentCodec};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let codec = MessageCodec::new(RawDocumentCodec);
//! let document = RawDocument::from_payload(b"\x10\x20\x30")?;
//! let frame = codec.serialize(&Message::new(7, document))?;
//!
//! let header = MessageHeader::from_bytes(&frame[..HEADER_SIZE])?;
//! let decoded = codec.deserialize(&header, &frame[HEADER_SIZE..])?;
//! assert_eq!(decoded.request_id, 7);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod core;
pub mod error;
pub mod storage;

pub use crate::config::BucketConfig;
pub use crate::core::codec::MessageFramer;
pub use crate::core::document::{DocumentCodec, JsonDocumentCodec, RawDocument, RawDocumentCodec};
pub use crate::core::header::{MessageHeader, OpCode};
pub use crate::core::message::{Message, MessageCodec, Section};
pub use crate::error::{
    ConfigError, DocumentError, ProtocolError, ReassemblyError, Result, UploadError,
};
pub use crate::storage::bucket::{Bucket, UploadOptions};
pub use crate::storage::id::{FileId, IdGenerator, RandomIdGenerator};
pub use crate::storage::memory::MemorySink;
pub use crate::storage::reassemble::reassemble;
pub use crate::storage::sink::RecordSink;
pub use crate::storage::types::{Chunk, FileRecord};
pub use crate::storage::upload::ChunkedUploadStream;
