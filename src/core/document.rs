//! # Document Codec Seam
//!
//! Messages and file metadata carry *documents* — self-describing payload
//! values this crate never interprets. Encoding is pluggable behind
//! [`DocumentCodec`] so the framing layer has zero coupling to a concrete
//! document format.
//!
//! ## Encoding Contract
//! Every encoded document is self-length-prefixed: the first four bytes are a
//! little-endian `u32` counting the **entire** encoding, prefix included. A
//! decoder therefore always knows where one document ends and the next begins
//! without separators.
//!
//! Two implementations ship with the crate:
//! - [`RawDocumentCodec`]: passes through caller-supplied, already-encoded
//!   bytes. Useful for relays and byte-exact tests.
//! - [`JsonDocumentCodec`]: UTF-8 JSON behind the length prefix. The
//!   self-describing reference codec used by the crate's own tests and demos.

use crate::error::DocumentError;

/// Length in bytes of the document length prefix.
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Capability seam for encoding and decoding individual documents.
///
/// Implementations must honor the length-prefix contract described in the
/// module docs: `encode` output starts with a little-endian `u32` equal to the
/// output's total length, and `decode` consumes exactly that many bytes.
pub trait DocumentCodec {
    /// The document value this codec produces and consumes.
    type Document;

    /// Encode one document to its self-length-prefixed byte form.
    fn encode(&self, document: &Self::Document) -> Result<Vec<u8>, DocumentError>;

    /// Decode one document from the front of `bytes`, returning the value and
    /// the number of bytes consumed.
    fn decode(&self, bytes: &[u8]) -> Result<(Self::Document, usize), DocumentError>;
}

/// Read and sanity-check the length prefix at the front of `bytes`.
fn read_prefix(bytes: &[u8]) -> Result<usize, DocumentError> {
    if bytes.len() < LENGTH_PREFIX_SIZE {
        return Err(DocumentError::Truncated {
            needed: LENGTH_PREFIX_SIZE,
            available: bytes.len(),
        });
    }

    let declared = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
    if declared < LENGTH_PREFIX_SIZE {
        return Err(DocumentError::Malformed(format!(
            "declared length {declared} is smaller than the length prefix itself"
        )));
    }
    if declared > bytes.len() {
        return Err(DocumentError::Truncated {
            needed: declared,
            available: bytes.len(),
        });
    }

    Ok(declared)
}

/// An already-encoded document: opaque bytes carrying a valid length prefix.
///
/// Construction validates the prefix once; afterwards the bytes travel through
/// the framing layer untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument(Vec<u8>);

impl RawDocument {
    /// Wrap pre-encoded bytes, validating that the leading length prefix
    /// matches the total length.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, DocumentError> {
        let declared = read_prefix(&bytes)?;
        if declared != bytes.len() {
            return Err(DocumentError::Malformed(format!(
                "declared length {declared} does not match actual length {}",
                bytes.len()
            )));
        }
        Ok(Self(bytes))
    }

    /// Build a document from an unprefixed payload, computing the prefix.
    pub fn from_payload(payload: &[u8]) -> Result<Self, DocumentError> {
        let total = LENGTH_PREFIX_SIZE + payload.len();
        let declared = u32::try_from(total)
            .map_err(|_| DocumentError::Malformed(format!("document too large: {total} bytes")))?;

        let mut bytes = Vec::with_capacity(total);
        bytes.extend_from_slice(&declared.to_le_bytes());
        bytes.extend_from_slice(payload);
        Ok(Self(bytes))
    }

    /// Full encoded form, length prefix included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The bytes after the length prefix.
    pub fn payload(&self) -> &[u8] {
        &self.0[LENGTH_PREFIX_SIZE..]
    }
}

/// Passthrough codec over [`RawDocument`] values.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawDocumentCodec;

impl DocumentCodec for RawDocumentCodec {
    type Document = RawDocument;

    fn encode(&self, document: &Self::Document) -> Result<Vec<u8>, DocumentError> {
        Ok(document.as_bytes().to_vec())
    }

    fn decode(&self, bytes: &[u8]) -> Result<(Self::Document, usize), DocumentError> {
        let declared = read_prefix(bytes)?;
        // Prefix already validated against the slice; skip re-checking.
        Ok((RawDocument(bytes[..declared].to_vec()), declared))
    }
}

/// UTF-8 JSON documents behind the length prefix.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDocumentCodec;

impl DocumentCodec for JsonDocumentCodec {
    type Document = serde_json::Value;

    fn encode(&self, document: &Self::Document) -> Result<Vec<u8>, DocumentError> {
        let body = serde_json::to_vec(document)
            .map_err(|e| DocumentError::Malformed(format!("JSON encode failed: {e}")))?;

        let total = LENGTH_PREFIX_SIZE + body.len();
        let declared = u32::try_from(total)
            .map_err(|_| DocumentError::Malformed(format!("document too large: {total} bytes")))?;

        let mut bytes = Vec::with_capacity(total);
        bytes.extend_from_slice(&declared.to_le_bytes());
        bytes.extend_from_slice(&body);
        Ok(bytes)
    }

    fn decode(&self, bytes: &[u8]) -> Result<(Self::Document, usize), DocumentError> {
        let declared = read_prefix(bytes)?;
        let value = serde_json::from_slice(&bytes[LENGTH_PREFIX_SIZE..declared])
            .map_err(|e| DocumentError::Malformed(format!("JSON decode failed: {e}")))?;
        Ok((value, declared))
    }
}
