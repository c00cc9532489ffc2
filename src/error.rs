//! # Error Types
//!
//! Error handling for the framing and storage cores.
//!
//! This module defines every error variant the crate can surface, from wire
//! decode failures to storage-sink rejections during a chunked upload.
//!
//! ## Error Categories
//! - **Wire Errors**: malformed frames, unknown section tags, truncated buffers
//! - **Document Errors**: collaborator-level encode/decode failures
//! - **Upload Errors**: storage-sink rejections and use-after-close
//! - **Reassembly Errors**: chunk sequences that violate the storage invariants
//! - **Configuration Errors**: invalid bucket or codec settings
//!
//! All errors implement `std::error::Error` for interoperability.
//!
//! ## Example Usage
//! ```rust
//! use docframe::core::document::RawDocumentCodec;
//! use docframe::core::header::{MessageHeader, OpCode};
//! use docframe::core::message::MessageCodec;
//! use docframe::error::ProtocolError;
//!
//! let codec = MessageCodec::new(RawDocumentCodec);
//! let header = MessageHeader {
//!     message_length: 21,
//!     request_id: 1,
//!     response_to: 0,
//!     op_code: OpCode::Message,
//! };
//!
//! // A body that ends in the middle of a section is rejected, never guessed at.
//! let err = codec.deserialize(&header, &[0, 0, 0, 0, 0]).unwrap_err();
//! assert!(matches!(err, ProtocolError::Truncated { .. }));
//! ```

use std::io;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
/// Static strings are borrowed, avoiding heap allocations for common error cases.
pub mod constants {
    /// Bucket configuration: chunk size of zero
    pub const ERR_CHUNK_SIZE_ZERO: &str = "Chunk size must be greater than 0";
    /// Bucket configuration: empty bucket name
    pub const ERR_BUCKET_NAME_EMPTY: &str = "Bucket name cannot be empty";
    /// Bucket configuration: bucket name containing a destination separator
    pub const ERR_BUCKET_NAME_DOTTED: &str =
        "Bucket name cannot contain '.' (reserved for destination suffixes)";

    /// Wire encode: identifier with an embedded NUL
    pub const ERR_IDENTIFIER_NUL: &str = "identifier contains an interior NUL byte";
    /// Wire decode: identifier bytes that are not UTF-8
    pub const ERR_IDENTIFIER_UTF8: &str = "identifier bytes are not valid UTF-8";

    /// Document codec misbehavior: decode claimed zero bytes
    pub const ERR_CODEC_ZERO_CONSUMED: &str = "document codec reported zero consumed bytes";
    /// Document codec misbehavior: decode claimed more bytes than it was given
    pub const ERR_CODEC_OVERCONSUMED: &str =
        "document codec reported more consumed bytes than were available";
}

/// Primary error type for wire-level framing operations.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Underlying I/O failure while reading or writing a frame.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Header fields that cannot describe a valid frame.
    #[error("Invalid message header")]
    InvalidHeader,

    /// Op-code this codec does not speak.
    #[error("Unsupported op-code: {0}")]
    UnsupportedOpCode(u32),

    /// Frame larger than the configured maximum.
    #[error("Message too large: {0} bytes")]
    OversizedMessage(usize),

    /// Unknown section tag byte in the message body.
    #[error("Invalid section kind {kind:#04x} at offset {offset}")]
    InvalidSectionKind {
        /// The tag byte that was read.
        kind: u8,
        /// Body-relative offset of the tag byte.
        offset: usize,
    },

    /// A length field points past the end of the buffer.
    #[error("Truncated message: declared length runs past the buffer at offset {offset}")]
    Truncated {
        /// Body-relative offset where decoding could not continue.
        offset: usize,
    },

    /// Batch identifier that is not NUL-free UTF-8.
    #[error("Invalid section identifier: {0}")]
    InvalidIdentifier(String),

    /// A document codec rejected a section payload.
    #[error("Document codec error: {0}")]
    Document(String),
}

/// Collaborator-level error raised by a [`DocumentCodec`](crate::core::document::DocumentCodec).
///
/// The message codec maps these into [`ProtocolError`] at the offset where the
/// document was being decoded.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The buffer ends before the document does.
    #[error("Document truncated: need {needed} bytes, have {available}")]
    Truncated {
        /// Bytes the document claims to span.
        needed: usize,
        /// Bytes actually available.
        available: usize,
    },

    /// Document bytes that do not parse under this codec.
    #[error("Malformed document: {0}")]
    Malformed(String),
}

/// Errors surfaced by a [`ChunkedUploadStream`](crate::storage::upload::ChunkedUploadStream).
#[derive(Error, Debug)]
pub enum UploadError {
    /// The storage sink rejected a chunk or file insert. The upload is aborted;
    /// `chunks_persisted` records how many chunks were already acknowledged so
    /// the caller can reconcile or garbage-collect them.
    #[error("Storage sink rejected insert after {chunks_persisted} persisted chunk(s): {source}")]
    SinkWriteFailed {
        /// Chunks the sink had already acknowledged before the failure.
        chunks_persisted: u32,
        /// The sink's own error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A write or close was issued after the stream reached a terminal state.
    #[error("Upload stream is already closed")]
    AlreadyClosed,
}

/// Errors raised while verifying and reassembling a persisted chunk sequence.
#[derive(Error, Debug)]
pub enum ReassemblyError {
    /// A sequence number with no chunk record.
    #[error("Missing chunk n={n}")]
    MissingChunk {
        /// First sequence number that has no chunk.
        n: u32,
    },

    /// Two chunk records share a sequence number.
    #[error("Duplicate chunk n={n}")]
    DuplicateChunk {
        /// The repeated sequence number.
        n: u32,
    },

    /// A non-final chunk whose payload is not exactly the recorded chunk size,
    /// or a final chunk that is empty or oversized.
    #[error("Chunk n={n} has {len} bytes, expected {expected}")]
    WrongChunkSize {
        /// Sequence number of the offending chunk.
        n: u32,
        /// Payload length found.
        len: usize,
        /// Chunk size recorded on the file.
        expected: usize,
    },

    /// Concatenated chunks do not add up to the recorded file length.
    #[error("Reassembled length {actual} does not match file record length {expected}")]
    LengthMismatch {
        /// Length recorded on the file.
        expected: u64,
        /// Length of the reassembled bytes.
        actual: u64,
    },
}

/// Invalid bucket, stream, or codec configuration.
#[derive(Error, Debug)]
#[error("Configuration error: {0}")]
pub struct ConfigError(pub String);

/// Type alias for Results using ProtocolError
pub type Result<T> = std::result::Result<T, ProtocolError>;
