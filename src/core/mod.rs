//! # Core Wire Components
//!
//! Low-level message framing, codecs, and binary layout.
//!
//! This module provides the wire foundation for the client: the fixed message
//! header, the section-based message body, and a stream codec for framing
//! whole messages over byte streams.
//!
//! ## Components
//! - **Header**: fixed 16-byte message header with length and op-code
//! - **Message**: flag word plus one or more typed payload sections
//! - **Document**: pluggable codec seam for the documents sections carry
//! - **Codec**: Tokio codec for framing messages over byte streams
//!
//! ## Wire Format
//! ```text
//! [Header(16)] [Flags(4, LE)] [Section...]
//!
//! Section kind 0: [0x00] [Document]
//! Section kind 1: [0x01] [Length(4, LE)] [Identifier] [0x00] [Document...]
//! ```
//! Every document is self-length-prefixed: its leading little-endian `u32`
//! counts the whole encoding, prefix included. A kind-1 length counts
//! everything after the tag byte, its own four bytes included.
//!
//! ## Hardening
//! - Maximum message size: 48MB (prevents memory exhaustion)
//! - Length validation before any allocation or slice
//! - Unknown section tags and op-codes are rejected, never skipped

pub mod codec;
pub mod document;
pub mod header;
pub mod message;
